use alloc::string::String;

use crate::{
    error::Error,
    sink::{EventSink, SinkResult},
};

/// A sink that builds nothing and accepts every event.
///
/// Drive a producer into it to check well-formedness alone: the producer's
/// overall success is the answer, since any syntax error reaches
/// [`EventSink::parse_error`], which stops.
///
/// ```
/// use jsonsink::{Acceptor, EventSink};
///
/// let mut acceptor = Acceptor;
/// assert_eq!(acceptor.start_array(jsonsink::NO_LIMIT), Ok(true));
/// assert_eq!(acceptor.end_array(), Ok(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Acceptor;

impl EventSink for Acceptor {
    fn null(&mut self) -> SinkResult {
        Ok(true)
    }

    fn boolean(&mut self, _value: bool) -> SinkResult {
        Ok(true)
    }

    fn number_integer(&mut self, _value: i64) -> SinkResult {
        Ok(true)
    }

    fn number_unsigned(&mut self, _value: u64) -> SinkResult {
        Ok(true)
    }

    fn number_float(&mut self, _value: f64, _raw: &str) -> SinkResult {
        Ok(true)
    }

    fn string(&mut self, _value: &mut String) -> SinkResult {
        Ok(true)
    }

    fn start_object(&mut self, _len: usize) -> SinkResult {
        Ok(true)
    }

    fn key(&mut self, _key: &mut String) -> SinkResult {
        Ok(true)
    }

    fn end_object(&mut self) -> SinkResult {
        Ok(true)
    }

    fn start_array(&mut self, _len: usize) -> SinkResult {
        Ok(true)
    }

    fn end_array(&mut self) -> SinkResult {
        Ok(true)
    }

    fn parse_error(&mut self, _last_token: &str, _error: &Error) -> SinkResult {
        Ok(false)
    }
}
