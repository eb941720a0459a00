//! The event-sink contract between a producer and its consumers.
//!
//! A producer (tokenizer, binary decoder, [`replay`](crate::replay)) reads
//! input and calls one [`EventSink`] method per structural event. Each method
//! answers whether the producer should keep going. Producers call the `_at`
//! methods, which carry a [`SourceLocation`]; by default each `_at` method
//! forwards to its positionless counterpart, so a sink that does not care about
//! locations only overrides the short forms.
//!
//! The producer guarantees the following grammar:
//!
//! - `key` occurs only while the innermost open container is an object, and
//!   only immediately before the value (or nested container) it labels;
//! - `end_object`/`end_array` close exactly the innermost container, never
//!   while a key is waiting for its value;
//! - the stream carries exactly one top-level value.
//!
//! When a method returns `Ok(false)` because the input is malformed, the
//! producer stops and calls [`EventSink::parse_error`] exactly once. A sink
//! that stops for its own reasons (the event was the last one it wanted) just
//! returns `Ok(false)` and the producer stops silently.

use alloc::string::String;

use crate::{error::Error, location::SourceLocation};

/// Size hint passed to `start_object`/`start_array` when the producer cannot
/// know the element count in advance, as is always the case for JSON text.
pub const NO_LIMIT: usize = usize::MAX;

/// Result of every sink method: `Ok(true)` to continue, `Ok(false)` to stop,
/// `Err` when the sink raises.
pub type SinkResult = Result<bool, Error>;

/// The granularity at which a filtering predicate is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseEventKind {
    /// An object is about to be built.
    ObjectStart,
    /// An object has been fully built.
    ObjectEnd,
    /// An array is about to be built.
    ArrayStart,
    /// An array has been fully built.
    ArrayEnd,
    /// An object key was read.
    Key,
    /// A scalar value was read.
    Value,
}

/// A consumer of structural parse events.
///
/// All methods have defaults that accept everything, so implementors override
/// only what they need. The trait is object safe; producers may hold a
/// `&mut dyn EventSink`.
#[allow(unused_variables)]
pub trait EventSink {
    /// A `null` was read.
    ///
    /// # Errors
    ///
    /// Sinks that raise return their error here and in every other method.
    fn null(&mut self) -> SinkResult {
        Ok(true)
    }

    /// A boolean was read.
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn boolean(&mut self, value: bool) -> SinkResult {
        Ok(true)
    }

    /// A negative (or signed) integer was read.
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn number_integer(&mut self, value: i64) -> SinkResult {
        Ok(true)
    }

    /// A non-negative integer was read.
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn number_unsigned(&mut self, value: u64) -> SinkResult {
        Ok(true)
    }

    /// A floating-point number was read; `raw` is its token text.
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn number_float(&mut self, value: f64, raw: &str) -> SinkResult {
        Ok(true)
    }

    /// A string was read. The sink may take the payload with
    /// [`core::mem::take`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn string(&mut self, value: &mut String) -> SinkResult {
        Ok(true)
    }

    /// An object was opened; `len` is its member count or [`NO_LIMIT`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn start_object(&mut self, len: usize) -> SinkResult {
        Ok(true)
    }

    /// An object key was read. The sink may take the payload.
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn key(&mut self, key: &mut String) -> SinkResult {
        Ok(true)
    }

    /// The innermost object was closed.
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn end_object(&mut self) -> SinkResult {
        Ok(true)
    }

    /// An array was opened; `len` is its element count or [`NO_LIMIT`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn start_array(&mut self, len: usize) -> SinkResult {
        Ok(true)
    }

    /// The innermost array was closed.
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn end_array(&mut self) -> SinkResult {
        Ok(true)
    }

    /// The producer hit malformed input.
    ///
    /// Called exactly once, after a sink method returned `Ok(false)` because
    /// of the error. Must not return `Ok(true)`.
    ///
    /// # Errors
    ///
    /// Sinks using [`ErrorPolicy::Raise`](crate::ErrorPolicy::Raise) return
    /// the error.
    fn parse_error(&mut self, last_token: &str, error: &Error) -> SinkResult {
        Ok(false)
    }

    /// Located form of [`EventSink::null`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn null_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.null()
    }

    /// Located form of [`EventSink::boolean`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn boolean_at(&mut self, value: bool, loc: SourceLocation) -> SinkResult {
        self.boolean(value)
    }

    /// Located form of [`EventSink::number_integer`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn number_integer_at(&mut self, value: i64, loc: SourceLocation) -> SinkResult {
        self.number_integer(value)
    }

    /// Located form of [`EventSink::number_unsigned`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn number_unsigned_at(&mut self, value: u64, loc: SourceLocation) -> SinkResult {
        self.number_unsigned(value)
    }

    /// Located form of [`EventSink::number_float`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn number_float_at(&mut self, value: f64, raw: &str, loc: SourceLocation) -> SinkResult {
        self.number_float(value, raw)
    }

    /// Located form of [`EventSink::string`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn string_at(&mut self, value: &mut String, loc: SourceLocation) -> SinkResult {
        self.string(value)
    }

    /// Located form of [`EventSink::start_object`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn start_object_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        self.start_object(len)
    }

    /// Located form of [`EventSink::key`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn key_at(&mut self, key: &mut String, loc: SourceLocation) -> SinkResult {
        self.key(key)
    }

    /// Located form of [`EventSink::end_object`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn end_object_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.end_object()
    }

    /// Located form of [`EventSink::start_array`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn start_array_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        self.start_array(len)
    }

    /// Located form of [`EventSink::end_array`].
    ///
    /// # Errors
    ///
    /// See [`EventSink::null`].
    fn end_array_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.end_array()
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn null(&mut self) -> SinkResult {
        (**self).null()
    }
    fn boolean(&mut self, value: bool) -> SinkResult {
        (**self).boolean(value)
    }
    fn number_integer(&mut self, value: i64) -> SinkResult {
        (**self).number_integer(value)
    }
    fn number_unsigned(&mut self, value: u64) -> SinkResult {
        (**self).number_unsigned(value)
    }
    fn number_float(&mut self, value: f64, raw: &str) -> SinkResult {
        (**self).number_float(value, raw)
    }
    fn string(&mut self, value: &mut String) -> SinkResult {
        (**self).string(value)
    }
    fn start_object(&mut self, len: usize) -> SinkResult {
        (**self).start_object(len)
    }
    fn key(&mut self, key: &mut String) -> SinkResult {
        (**self).key(key)
    }
    fn end_object(&mut self) -> SinkResult {
        (**self).end_object()
    }
    fn start_array(&mut self, len: usize) -> SinkResult {
        (**self).start_array(len)
    }
    fn end_array(&mut self) -> SinkResult {
        (**self).end_array()
    }
    fn parse_error(&mut self, last_token: &str, error: &Error) -> SinkResult {
        (**self).parse_error(last_token, error)
    }
    fn null_at(&mut self, loc: SourceLocation) -> SinkResult {
        (**self).null_at(loc)
    }
    fn boolean_at(&mut self, value: bool, loc: SourceLocation) -> SinkResult {
        (**self).boolean_at(value, loc)
    }
    fn number_integer_at(&mut self, value: i64, loc: SourceLocation) -> SinkResult {
        (**self).number_integer_at(value, loc)
    }
    fn number_unsigned_at(&mut self, value: u64, loc: SourceLocation) -> SinkResult {
        (**self).number_unsigned_at(value, loc)
    }
    fn number_float_at(&mut self, value: f64, raw: &str, loc: SourceLocation) -> SinkResult {
        (**self).number_float_at(value, raw, loc)
    }
    fn string_at(&mut self, value: &mut String, loc: SourceLocation) -> SinkResult {
        (**self).string_at(value, loc)
    }
    fn start_object_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        (**self).start_object_at(len, loc)
    }
    fn key_at(&mut self, key: &mut String, loc: SourceLocation) -> SinkResult {
        (**self).key_at(key, loc)
    }
    fn end_object_at(&mut self, loc: SourceLocation) -> SinkResult {
        (**self).end_object_at(loc)
    }
    fn start_array_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        (**self).start_array_at(len, loc)
    }
    fn end_array_at(&mut self, loc: SourceLocation) -> SinkResult {
        (**self).end_array_at(loc)
    }
}
