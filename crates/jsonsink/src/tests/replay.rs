use alloc::{string::ToString, vec::Vec};

use serde_json::json;

use super::utils::from_json;
use crate::{Error, ErrorKind, Event, EventSink, NO_LIMIT, SinkResult, replay};

/// Counts calls and stops on the `stop_at`-th one.
#[derive(Default)]
struct Counter {
    calls: usize,
    stop_at: usize,
    errors: Vec<(u16, ErrorKind)>,
}

impl EventSink for Counter {
    fn null(&mut self) -> SinkResult {
        self.calls += 1;
        Ok(self.calls != self.stop_at)
    }

    fn number_unsigned(&mut self, _value: u64) -> SinkResult {
        self.calls += 1;
        Ok(self.calls != self.stop_at)
    }

    fn parse_error(&mut self, _last_token: &str, error: &Error) -> SinkResult {
        self.errors.push((error.id(), error.kind()));
        Ok(false)
    }
}

#[test]
fn text_events_use_unknown_sizes() {
    let value = from_json(json!({"a": [1]}));
    assert_eq!(
        value.to_events(),
        [
            Event::StartObject(NO_LIMIT),
            Event::Key("a".to_string()),
            Event::StartArray(NO_LIMIT),
            Event::Unsigned(1),
            Event::EndArray,
            Event::EndObject,
        ]
    );
}

#[test]
fn sized_events_carry_lengths() {
    let value = from_json(json!({"a": [1, 2], "b": {}}));
    let starts: Vec<_> = value
        .to_sized_events()
        .into_iter()
        .filter_map(|event| match event {
            Event::StartObject(len) | Event::StartArray(len) => Some(len),
            _ => None,
        })
        .collect();
    assert_eq!(starts, [2, 2, 0]);
}

#[test]
fn float_events_carry_their_text() {
    let value = from_json(json!(0.25));
    assert_eq!(
        value.to_events(),
        [Event::Float {
            value: 0.25,
            raw: "0.25".to_string()
        }]
    );
}

#[test]
fn stops_at_the_first_refusal() {
    let mut counter = Counter {
        stop_at: 2,
        ..Default::default()
    };
    let stream = [Event::Null, Event::Unsigned(1), Event::Null, Event::Null];
    assert_eq!(replay(&mut counter, stream), Ok(false));
    assert_eq!(counter.calls, 2);
    assert!(counter.errors.is_empty());
}

#[test]
fn error_event_reaches_parse_error_and_stops() {
    let mut counter = Counter::default();
    let stream = [
        Event::Null,
        Event::Error {
            last_token: "x".to_string(),
            error: Error::parse_error(101, "syntax error", Default::default()),
        },
        Event::Null,
    ];
    assert_eq!(replay(&mut counter, stream), Ok(false));
    assert_eq!(counter.calls, 1);
    assert_eq!(counter.errors, [(101, ErrorKind::Parse)]);
}

#[test]
fn works_through_trait_objects() {
    let mut counter = Counter::default();
    let sink: &mut dyn EventSink = &mut counter;
    assert_eq!(replay(sink, [Event::Null, Event::Null]), Ok(true));
    assert_eq!(counter.calls, 2);
}
