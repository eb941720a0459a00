#![allow(missing_docs, dead_code)]

use jsonsink::{Error, EventSink, SinkResult, SourceLocation, Value};

/// Converts a `serde_json` value; non-negative integers become unsigned.
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(Value::Unsigned)
            .or_else(|| n.as_i64().map(Value::Integer))
            .unwrap_or_else(|| Value::Float(n.as_f64().unwrap())),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(a) => a.into_iter().map(from_json).collect(),
        serde_json::Value::Object(o) => o.into_iter().map(|(k, v)| (k, from_json(v))).collect(),
    }
}

/// Passes events to `inner` until `events_left` runs out, then refuses.
///
/// Every refused event counts, so a producer that ignored the refusal would
/// be caught by `refused > 1`.
pub struct Countdown<S> {
    pub inner: S,
    pub events_left: usize,
    pub refused: usize,
    pub parse_errors: usize,
}

impl<S: EventSink> Countdown<S> {
    pub fn new(inner: S, events_left: usize) -> Self {
        Self {
            inner,
            events_left,
            refused: 0,
            parse_errors: 0,
        }
    }

    fn tick(&mut self, forward: impl FnOnce(&mut S) -> SinkResult) -> SinkResult {
        if self.events_left == 0 {
            self.refused += 1;
            return Ok(false);
        }
        self.events_left -= 1;
        forward(&mut self.inner)
    }
}

impl<S: EventSink> EventSink for Countdown<S> {
    fn parse_error(&mut self, last_token: &str, error: &Error) -> SinkResult {
        self.parse_errors += 1;
        self.inner.parse_error(last_token, error)
    }

    fn null_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.null_at(loc))
    }

    fn boolean_at(&mut self, value: bool, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.boolean_at(value, loc))
    }

    fn number_integer_at(&mut self, value: i64, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.number_integer_at(value, loc))
    }

    fn number_unsigned_at(&mut self, value: u64, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.number_unsigned_at(value, loc))
    }

    fn number_float_at(&mut self, value: f64, raw: &str, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.number_float_at(value, raw, loc))
    }

    fn string_at(&mut self, value: &mut String, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.string_at(value, loc))
    }

    fn start_object_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.start_object_at(len, loc))
    }

    fn key_at(&mut self, key: &mut String, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.key_at(key, loc))
    }

    fn end_object_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.end_object_at(loc))
    }

    fn start_array_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.start_array_at(len, loc))
    }

    fn end_array_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.tick(|s| s.end_array_at(loc))
    }
}
