#![no_main]

use arbitrary::Arbitrary;
use jsonsink::{
    Acceptor, Document, DomBuilder, FilteringBuilder, Map, NodeRef, NodeValue, Value, replay,
};
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Structured input: a value to replay and a seed for the filter's choices.
#[derive(Debug, Arbitrary)]
struct Input {
    value: FuzzValue,
    seed: u64,
    /// Chance, out of 256, that the filter keeps what it is offered.
    keep_odds: u8,
    sized: bool,
}

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Array(Vec<FuzzValue>),
    Object(Vec<(String, FuzzValue)>),
}

impl From<FuzzValue> for Value {
    fn from(value: FuzzValue) -> Self {
        match value {
            FuzzValue::Null => Value::Null,
            FuzzValue::Boolean(b) => Value::Boolean(b),
            FuzzValue::Integer(i) => Value::Integer(i),
            FuzzValue::Unsigned(u) => Value::Unsigned(u),
            // NaN never compares equal; the tree itself would still be fine
            FuzzValue::Float(f) if f.is_finite() => Value::Float(f),
            FuzzValue::Float(_) => Value::Null,
            FuzzValue::String(s) => Value::String(s),
            FuzzValue::Array(a) => a.into_iter().map(Value::from).collect(),
            FuzzValue::Object(o) => Value::Object(
                o.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

fn live_nodes(root: NodeRef<'_>, poisoned: &mut usize) -> usize {
    let mut count = 0;
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        count += 1;
        if node.id() != root.id() && matches!(node.value(), NodeValue::Discarded) {
            *poisoned += 1;
        }
        pending.extend(node.elements());
        pending.extend(node.members().map(|(_, member)| member));
    }
    count
}

fuzz_target!(|input: Input| {
    let value = Value::from(input.value);
    let events = if input.sized {
        value.to_sized_events()
    } else {
        value.to_events()
    };

    assert_eq!(replay(&mut Acceptor, events.clone()), Ok(true));

    let mut doc = Document::new();
    assert_eq!(replay(&mut DomBuilder::new(&mut doc), events.clone()), Ok(true));
    let built = doc.to_value();
    assert!(
        built.as_ref() == Some(&value),
        "plain build differs: {}",
        serde_json::to_string(&built).unwrap_or_default()
    );

    let mut rng = StdRng::seed_from_u64(input.seed);
    let keep_odds = input.keep_odds;
    let mut filtered = Document::new();
    let mut builder = FilteringBuilder::new(&mut filtered, |_, _, _| {
        rng.random::<u8>() <= keep_odds
    });
    assert_eq!(replay(&mut builder, events), Ok(true));

    let mut poisoned = 0;
    let reachable = live_nodes(filtered.root(), &mut poisoned);
    assert_eq!(poisoned, 0, "discard placeholder left in a completed tree");
    assert_eq!(reachable, filtered.len(), "unreachable nodes left in the arena");
});
