//! An in-memory producer.
//!
//! [`replay`] feeds recorded [`Event`]s to a sink the way a parser would:
//! one call per event, stopping at the first `Ok(false)` or `Err`. An
//! [`Event::Error`] stands for malformed input and is delivered through
//! [`EventSink::parse_error`], after which replay stops.

use alloc::{format, string::String, vec::Vec};

use crate::{
    error::Error,
    location::SourceLocation,
    sink::{EventSink, NO_LIMIT, SinkResult},
    value::Value,
};

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// [`EventSink::null`].
    Null,
    /// [`EventSink::boolean`].
    Boolean(bool),
    /// [`EventSink::number_integer`].
    Integer(i64),
    /// [`EventSink::number_unsigned`].
    Unsigned(u64),
    /// [`EventSink::number_float`].
    Float {
        /// The parsed number.
        value: f64,
        /// Its token text.
        raw: String,
    },
    /// [`EventSink::string`].
    String(String),
    /// Opens an object with the given size hint.
    StartObject(usize),
    /// [`EventSink::key`].
    Key(String),
    /// [`EventSink::end_object`].
    EndObject,
    /// Opens an array with the given size hint.
    StartArray(usize),
    /// [`EventSink::end_array`].
    EndArray,
    /// The producer hit malformed input after reading `last_token`.
    Error {
        /// Text of the last token read.
        last_token: String,
        /// What went wrong.
        error: Error,
    },
}

/// Feeds `events` to `sink` without source locations.
///
/// Returns `Ok(true)` if every event was accepted.
///
/// # Errors
///
/// Returns the first error the sink raises.
///
/// # Examples
///
/// ```
/// use jsonsink::{Acceptor, Event, replay};
///
/// let events = [Event::StartArray(1), Event::Null, Event::EndArray];
/// assert_eq!(replay(&mut Acceptor, events), Ok(true));
/// ```
pub fn replay<S, I>(sink: &mut S, events: I) -> SinkResult
where
    S: EventSink + ?Sized,
    I: IntoIterator<Item = Event>,
{
    replay_at(
        sink,
        events
            .into_iter()
            .map(|event| (SourceLocation::default(), event)),
    )
}

/// Feeds located `events` to `sink` through the `_at` methods.
///
/// # Errors
///
/// Returns the first error the sink raises.
pub fn replay_at<S, I>(sink: &mut S, events: I) -> SinkResult
where
    S: EventSink + ?Sized,
    I: IntoIterator<Item = (SourceLocation, Event)>,
{
    for (loc, event) in events {
        let proceed = match event {
            Event::Null => sink.null_at(loc)?,
            Event::Boolean(value) => sink.boolean_at(value, loc)?,
            Event::Integer(value) => sink.number_integer_at(value, loc)?,
            Event::Unsigned(value) => sink.number_unsigned_at(value, loc)?,
            Event::Float { value, raw } => sink.number_float_at(value, &raw, loc)?,
            Event::String(mut value) => sink.string_at(&mut value, loc)?,
            Event::StartObject(len) => sink.start_object_at(len, loc)?,
            Event::Key(mut key) => sink.key_at(&mut key, loc)?,
            Event::EndObject => sink.end_object_at(loc)?,
            Event::StartArray(len) => sink.start_array_at(len, loc)?,
            Event::EndArray => sink.end_array_at(loc)?,
            Event::Error { last_token, error } => {
                let result = sink.parse_error(&last_token, &error)?;
                debug_assert!(!result, "parse_error must not ask to continue");
                return Ok(false);
            }
        };
        if !proceed {
            return Ok(false);
        }
    }
    Ok(true)
}

impl Value {
    /// The events a text parser would produce for this value, with
    /// [`NO_LIMIT`] size hints.
    #[must_use]
    pub fn to_events(&self) -> Vec<Event> {
        let mut out = Vec::new();
        push_events(self, false, &mut out);
        out
    }

    /// The events a binary decoder would produce for this value, with exact
    /// container sizes.
    #[must_use]
    pub fn to_sized_events(&self) -> Vec<Event> {
        let mut out = Vec::new();
        push_events(self, true, &mut out);
        out
    }
}

fn push_events(value: &Value, sized: bool, out: &mut Vec<Event>) {
    let hint = |len: usize| if sized { len } else { NO_LIMIT };
    match value {
        Value::Null => out.push(Event::Null),
        Value::Boolean(b) => out.push(Event::Boolean(*b)),
        Value::Integer(i) => out.push(Event::Integer(*i)),
        Value::Unsigned(u) => out.push(Event::Unsigned(*u)),
        Value::Float(f) => out.push(Event::Float {
            value: *f,
            raw: format!("{f}"),
        }),
        Value::String(s) => out.push(Event::String(s.clone())),
        Value::Array(elements) => {
            out.push(Event::StartArray(hint(elements.len())));
            for element in elements {
                push_events(element, sized, out);
            }
            out.push(Event::EndArray);
        }
        Value::Object(members) => {
            out.push(Event::StartObject(hint(members.len())));
            for (key, member) in members {
                out.push(Event::Key(key.clone()));
                push_events(member, sized, out);
            }
            out.push(Event::EndObject);
        }
    }
}
