use alloc::string::ToString;

use serde_json::json;

use super::utils::events;
use crate::{Acceptor, Error, Event, EventSink, SourceLocation, replay};

#[test]
fn accepts_every_event() {
    let mut acceptor = Acceptor;
    let stream = events(json!({"a": [1, -2, 3.5, "s", null, true], "b": {}}));
    assert_eq!(replay(&mut acceptor, stream), Ok(true));
}

#[test]
fn accepts_streams_no_builder_would() {
    // Unbalanced on purpose: the acceptor keeps no state to check against.
    let stream = [Event::EndArray, Event::Key("k".to_string()), Event::EndObject];
    assert_eq!(replay(&mut Acceptor, stream), Ok(true));
}

#[test]
fn stops_on_parse_error() {
    let mut acceptor = Acceptor;
    let error = Error::parse_error(101, "unexpected end of input", SourceLocation::default());
    assert_eq!(acceptor.parse_error("", &error), Ok(false));

    let stream = [
        Event::StartArray(crate::NO_LIMIT),
        Event::Error {
            last_token: "[".to_string(),
            error,
        },
        Event::EndArray,
    ];
    assert_eq!(replay(&mut acceptor, stream), Ok(false));
}
