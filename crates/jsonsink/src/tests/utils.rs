use alloc::{string::String, vec::Vec};

use crate::{
    Candidate, Document, DomBuilder, Event, FilteringBuilder, NodeRef, NodeValue, ParseEventKind,
    SourceLocation, Value, replay,
};

/// Converts a `serde_json` value, keeping integer signedness the way a
/// tokenizer reports it: non-negative integers are unsigned.
pub(crate) fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::Unsigned(u)
            } else if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else {
                Value::Float(n.as_f64().unwrap())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(a) => a.into_iter().map(from_json).collect(),
        serde_json::Value::Object(o) => o.into_iter().map(|(k, v)| (k, from_json(v))).collect(),
    }
}

pub(crate) fn events(json: serde_json::Value) -> Vec<Event> {
    from_json(json).to_events()
}

/// Stamps each event with a location whose byte position is its index.
pub(crate) fn located(events: Vec<Event>) -> Vec<(SourceLocation, Event)> {
    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| (SourceLocation::new(i, 0, i), event))
        .collect()
}

pub(crate) fn build(json: serde_json::Value) -> Document {
    let mut doc = Document::new();
    replay(&mut DomBuilder::new(&mut doc), events(json)).unwrap();
    doc
}

pub(crate) fn filter<F>(json: serde_json::Value, callback: F) -> Document
where
    F: FnMut(usize, ParseEventKind, Candidate<'_>) -> bool,
{
    let mut doc = Document::new();
    replay(&mut FilteringBuilder::new(&mut doc, callback), events(json)).unwrap();
    doc
}

/// Number of nodes reachable from the root, the root included.
pub(crate) fn reachable(doc: &Document) -> usize {
    let mut count = 0;
    let mut pending: Vec<NodeRef<'_>> = alloc::vec![doc.root()];
    while let Some(node) = pending.pop() {
        count += 1;
        pending.extend(node.elements());
        pending.extend(node.members().map(|(_, member)| member));
    }
    count
}

/// Whether any node below the root is a discard placeholder.
pub(crate) fn has_poison_below_root(doc: &Document) -> bool {
    let root = doc.root();
    let mut pending: Vec<NodeRef<'_>> = root.elements().collect();
    pending.extend(root.members().map(|(_, member)| member));
    while let Some(node) = pending.pop() {
        if matches!(node.value(), NodeValue::Discarded) {
            return true;
        }
        pending.extend(node.elements());
        pending.extend(node.members().map(|(_, member)| member));
    }
    false
}

/// The keys of every object in `value`, in document order.
///
/// `Value` equality ignores member order; compare these to check it.
pub(crate) fn key_order(value: &Value) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut pending = alloc::vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(elements) => pending.extend(elements.iter().rev()),
            Value::Object(members) => {
                out.push(members.keys().cloned().collect());
                pending.extend(members.values().rev());
            }
            _ => {}
        }
    }
    out
}

/// Renders predicate calls one per line, for snapshots.
pub(crate) fn describe(depth: usize, kind: ParseEventKind, candidate: Candidate<'_>) -> String {
    use core::fmt::Write;

    let mut line = String::new();
    write!(line, "{depth} {kind:?}").unwrap();
    match candidate {
        Candidate::Pending => {}
        Candidate::Key(key) => write!(line, " {key:?}").unwrap(),
        Candidate::Node(node) => write!(line, " {:?}", node.to_value()).unwrap(),
    }
    line
}
