use alloc::{string::String, vec::Vec};
use core::mem;

use crate::{
    document::{Document, Members, NodeId, NodeValue},
    error::Error,
    location::SourceLocation,
    options::BuilderOptions,
    sink::{EventSink, NO_LIMIT, SinkResult},
};

/// Builds a [`Document`] from every event it receives.
///
/// The container stack holds the id of each open array or object, innermost
/// last. When it is empty, the next completed value replaces the root;
/// otherwise values are appended to the innermost array, or stored in the
/// member slot created by the preceding key.
///
/// # Examples
///
/// ```
/// use jsonsink::{Document, DomBuilder, EventSink, Value};
///
/// let mut doc = Document::new();
/// let mut builder = DomBuilder::new(&mut doc);
/// builder.start_object(jsonsink::NO_LIMIT)?;
/// builder.key(&mut "a".to_string())?;
/// builder.number_unsigned(1)?;
/// builder.end_object()?;
///
/// let value = doc.to_value().unwrap();
/// assert_eq!(value.get("a"), Some(&Value::Unsigned(1)));
/// # Ok::<(), jsonsink::Error>(())
/// ```
#[derive(Debug)]
pub struct DomBuilder<'a> {
    doc: &'a mut Document,
    stack: Vec<NodeId>,
    object_element: Option<NodeId>,
    errored: bool,
    options: BuilderOptions,
}

impl<'a> DomBuilder<'a> {
    /// Creates a builder writing into `doc` with default options.
    pub fn new(doc: &'a mut Document) -> Self {
        Self::with_options(doc, BuilderOptions::default())
    }

    /// Creates a builder writing into `doc`.
    pub fn with_options(doc: &'a mut Document, options: BuilderOptions) -> Self {
        Self {
            doc,
            stack: Vec::new(),
            object_element: None,
            errored: false,
            options,
        }
    }

    /// Returns `true` once a parse error was reported or a size limit tripped.
    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.errored
    }

    /// Number of containers currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Stores `value` where the grammar says the next value goes.
    ///
    /// Returns `None` only if a value arrives inside an object without a key,
    /// which the producer grammar rules out.
    fn handle_value(&mut self, value: NodeValue, loc: SourceLocation) -> Option<NodeId> {
        let Some(&parent) = self.stack.last() else {
            return Some(self.doc.set_root(value, loc));
        };
        if matches!(self.doc.value(parent), NodeValue::Array(..)) {
            return self.doc.push_element(parent, value, loc);
        }
        debug_assert!(self.doc.value(parent).is_container());
        debug_assert!(self.object_element.is_some(), "object value without a key");
        let slot = self.object_element.take()?;
        self.doc.set(slot, value, loc);
        Some(slot)
    }

    fn start_container(&mut self, value: NodeValue, len: usize, loc: SourceLocation) -> SinkResult {
        let container = if matches!(value, NodeValue::Array(..)) {
            "array"
        } else {
            "object"
        };
        if let Some(id) = self.handle_value(value, loc) {
            self.stack.push(id);
        }

        if len != NO_LIMIT && len > self.options.max_container_len {
            let error = Error::excessive_size(container, len, loc);
            tracing::debug!(
                len,
                limit = self.options.max_container_len,
                %loc,
                "container size limit exceeded"
            );
            return self.fail(&error);
        }
        Ok(true)
    }

    fn fail(&mut self, error: &Error) -> SinkResult {
        self.errored = true;
        self.options.error_policy.apply(error)
    }
}

impl EventSink for DomBuilder<'_> {
    fn null(&mut self) -> SinkResult {
        self.null_at(SourceLocation::default())
    }

    fn boolean(&mut self, value: bool) -> SinkResult {
        self.boolean_at(value, SourceLocation::default())
    }

    fn number_integer(&mut self, value: i64) -> SinkResult {
        self.number_integer_at(value, SourceLocation::default())
    }

    fn number_unsigned(&mut self, value: u64) -> SinkResult {
        self.number_unsigned_at(value, SourceLocation::default())
    }

    fn number_float(&mut self, value: f64, raw: &str) -> SinkResult {
        self.number_float_at(value, raw, SourceLocation::default())
    }

    fn string(&mut self, value: &mut String) -> SinkResult {
        self.string_at(value, SourceLocation::default())
    }

    fn start_object(&mut self, len: usize) -> SinkResult {
        self.start_object_at(len, SourceLocation::default())
    }

    fn key(&mut self, key: &mut String) -> SinkResult {
        self.key_at(key, SourceLocation::default())
    }

    fn end_object(&mut self) -> SinkResult {
        self.end_object_at(SourceLocation::default())
    }

    fn start_array(&mut self, len: usize) -> SinkResult {
        self.start_array_at(len, SourceLocation::default())
    }

    fn end_array(&mut self) -> SinkResult {
        self.end_array_at(SourceLocation::default())
    }

    fn parse_error(&mut self, last_token: &str, error: &Error) -> SinkResult {
        tracing::debug!(id = error.id(), kind = %error.kind(), last_token, "parse error reported");
        self.fail(error)
    }

    fn null_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.handle_value(NodeValue::Null, loc);
        Ok(true)
    }

    fn boolean_at(&mut self, value: bool, loc: SourceLocation) -> SinkResult {
        self.handle_value(NodeValue::Boolean(value), loc);
        Ok(true)
    }

    fn number_integer_at(&mut self, value: i64, loc: SourceLocation) -> SinkResult {
        self.handle_value(NodeValue::Integer(value), loc);
        Ok(true)
    }

    fn number_unsigned_at(&mut self, value: u64, loc: SourceLocation) -> SinkResult {
        self.handle_value(NodeValue::Unsigned(value), loc);
        Ok(true)
    }

    fn number_float_at(&mut self, value: f64, _raw: &str, loc: SourceLocation) -> SinkResult {
        self.handle_value(NodeValue::Float(value), loc);
        Ok(true)
    }

    fn string_at(&mut self, value: &mut String, loc: SourceLocation) -> SinkResult {
        self.handle_value(NodeValue::String(mem::take(value)), loc);
        Ok(true)
    }

    fn start_object_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        self.start_container(NodeValue::Object(Members::default()), len, loc)
    }

    fn key_at(&mut self, key: &mut String, loc: SourceLocation) -> SinkResult {
        debug_assert!(!self.stack.is_empty(), "key outside of an object");
        if let Some(&object) = self.stack.last() {
            self.object_element = self
                .doc
                .member_slot(object, mem::take(key), NodeValue::Null, loc)
                .map(|(_, slot)| slot);
        }
        Ok(true)
    }

    fn end_object_at(&mut self, _loc: SourceLocation) -> SinkResult {
        self.stack.pop();
        Ok(true)
    }

    fn start_array_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        self.start_container(NodeValue::Array(Vec::new()), len, loc)
    }

    fn end_array_at(&mut self, _loc: SourceLocation) -> SinkResult {
        self.stack.pop();
        Ok(true)
    }
}
