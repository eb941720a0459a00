//! Snapshot of the exact predicate calls a filtering build makes, to catch
//! changes in call order, reported depth or candidate contents.

use alloc::{string::String, vec::Vec};

use insta::assert_snapshot;
use serde_json::json;

use super::utils::{describe, filter};
use crate::ParseEventKind;

#[test]
fn snapshot_predicate_calls() {
    let mut calls: Vec<String> = Vec::new();
    let doc = filter(json!({"a": [1, {"b": null}], "c": "x"}), |depth, kind, candidate| {
        calls.push(describe(depth, kind, candidate));
        !(kind == ParseEventKind::Value && candidate.as_node().is_some_and(|n| n.is_null()))
    });

    assert_snapshot!(calls.join("\n"), @r#"
    0 ObjectStart
    1 Key "a"
    1 ArrayStart
    2 Value Some(Unsigned(1))
    2 ObjectStart
    3 Key "b"
    3 Value Some(Null)
    2 ObjectEnd Some(Object({}))
    1 ArrayEnd Some(Array([Unsigned(1), Object({})]))
    1 Key "c"
    1 Value Some(String("x"))
    0 ObjectEnd Some(Object({"a": Array([Unsigned(1), Object({})]), "c": String("x")}))
    "#);
    assert_snapshot!(alloc::format!("{:?}", doc.to_value()), @r#"Some(Object({"a": Array([Unsigned(1), Object({})]), "c": String("x")}))"#);
}
