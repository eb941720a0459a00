use alloc::{string::ToString, vec::Vec};

use serde_json::json;

use super::utils::{build, filter, from_json};
use crate::{Document, DomBuilder, EventSink, NO_LIMIT, NodeValue, ParseEventKind, Value};

#[test]
fn new_document_is_null() {
    let doc = Document::new();
    assert!(doc.root().is_null());
    assert_eq!(doc.len(), 1);
    assert!(!doc.is_empty());
    assert!(!doc.is_discarded());
    assert_eq!(doc.to_value(), Some(Value::Null));
}

#[test]
fn navigation() {
    let doc = build(json!({"list": [10, -20, 1.5], "name": "n", "flag": false}));
    let root = doc.root();
    assert!(root.is_object());
    assert_eq!(root.len(), 3);

    let list = root.get("list").unwrap();
    assert!(list.is_array());
    assert_eq!(list.at(0).and_then(|n| n.as_u64()), Some(10));
    assert_eq!(list.at(0).and_then(|n| n.as_i64()), Some(10));
    assert_eq!(list.at(1).and_then(|n| n.as_i64()), Some(-20));
    assert_eq!(list.at(1).and_then(|n| n.as_u64()), None);
    assert_eq!(list.at(2).and_then(|n| n.as_f64()), Some(1.5));
    assert!(list.at(3).is_none());

    assert_eq!(root.get("name").and_then(|n| n.as_str()), Some("n"));
    assert_eq!(root.get("flag").and_then(|n| n.as_bool()), Some(false));
    assert!(root.get("missing").is_none());
    assert!(list.get("name").is_none());

    let keys: Vec<_> = root.members().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, ["list", "name", "flag"]);
    assert_eq!(list.elements().count(), 3);
    assert_eq!(root.elements().count(), 0);
}

#[test]
fn get_by_id() {
    let doc = build(json!([true]));
    let element = doc.root().at(0).unwrap();
    let again = doc.get(element.id()).unwrap();
    assert_eq!(again.value(), &NodeValue::Boolean(true));
    assert!(Document::new().get(element.id()).is_none());
}

#[test]
fn get_rejects_freed_ids() {
    let mut rejected = None;
    let doc = filter(json!({"a": 1, "b": 2}), |_, kind, candidate| {
        let node = candidate.as_node().filter(|_| kind == ParseEventKind::Value);
        match node.and_then(|n| n.as_u64()) {
            Some(2) => {
                rejected = node.map(|n| n.id());
                false
            }
            _ => true,
        }
    });
    let rejected = rejected.unwrap();
    assert!(doc.get(rejected).is_none());
    assert_eq!(doc.to_value(), Some(from_json(json!({"a": 1}))));

    let kept = doc.root().get("a").unwrap().id();
    assert!(doc.get(kept).is_some());
}

#[test]
fn clear_resets_to_null() {
    let mut doc = build(json!({"a": [1, 2]}));
    assert_eq!(doc.len(), 4);
    doc.clear();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.to_value(), Some(Value::Null));
}

#[test]
fn to_value_preserves_member_order() {
    let input = json!({"z": 1, "a": 2, "m": 3});
    let doc = build(input.clone());
    assert_eq!(doc.to_value(), Some(from_json(input)));
    let value = doc.to_value().unwrap();
    let Value::Object(map) = value else {
        panic!("expected an object");
    };
    let keys: Vec<_> = map.keys().cloned().collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[cfg(not(miri))]
#[test]
fn to_value_handles_deep_nesting() {
    const DEPTH: usize = 200_000;

    let mut doc = Document::new();
    let mut builder = DomBuilder::new(&mut doc);
    for _ in 0..DEPTH {
        assert_eq!(builder.start_array(NO_LIMIT), Ok(true));
    }
    for _ in 0..DEPTH {
        assert_eq!(builder.end_array(), Ok(true));
    }
    drop(builder);
    assert_eq!(doc.len(), DEPTH);

    // Taken apart one level at a time; dropping it whole would recurse.
    let mut value = doc.to_value().unwrap();
    let mut depth = 0;
    while let Value::Array(mut elements) = value {
        assert!(elements.len() <= 1);
        depth += 1;
        value = elements.pop().unwrap_or_default();
    }
    assert_eq!(depth, DEPTH);
    assert_eq!(value, Value::Null);
}
