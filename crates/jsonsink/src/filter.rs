//! A document builder that consults a predicate for every event.
//!
//! [`FilteringBuilder`] asks its callback whether to keep each container (as
//! it opens and again once it is complete), each key, and each scalar. A
//! container rejected when it opens is never built: everything inside it is
//! skipped without allocating. A container rejected once complete is replaced
//! by a discard placeholder, which its parent erases as soon as control
//! returns to it. A rejected key drops the value that follows it.
//!
//! The predicate sees the nesting depth of the event. For starts, keys and
//! values that is the number of containers open when the event arrives; for
//! ends it is the depth of the container being closed, so a start and its
//! matching end report the same depth.

use alloc::{string::String, vec, vec::Vec};
use core::mem;

use crate::{
    document::{Document, Members, NodeId, NodeRef, NodeValue},
    error::Error,
    location::SourceLocation,
    options::BuilderOptions,
    sink::{EventSink, NO_LIMIT, ParseEventKind, SinkResult},
};

/// What the predicate is asked about.
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    /// A container that has not been built yet.
    Pending,
    /// An object key.
    Key(&'a str),
    /// A scalar just read, or a container just completed.
    Node(NodeRef<'a>),
}

impl<'a> Candidate<'a> {
    /// The key text, for [`Candidate::Key`].
    #[must_use]
    pub fn as_key(&self) -> Option<&'a str> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }

    /// The node, for [`Candidate::Node`].
    #[must_use]
    pub fn as_node(&self) -> Option<NodeRef<'a>> {
        match self {
            Self::Node(node) => Some(*node),
            _ => None,
        }
    }
}

/// Where the next value goes.
#[derive(Debug, Clone, Copy)]
enum Destination {
    Root,
    Element(NodeId),
    /// The member at position `index` of `object`, holding a placeholder.
    Member {
        object: NodeId,
        index: usize,
        slot: NodeId,
    },
    /// The key in front of the value was rejected.
    Nowhere,
}

/// Builds a [`Document`] from the events its predicate accepts.
///
/// The predicate has the signature
/// `FnMut(depth, ParseEventKind, Candidate<'_>) -> bool`.
///
/// # Examples
///
/// Keep everything except members named `"secret"`:
///
/// ```
/// use jsonsink::{Document, EventSink, FilteringBuilder, ParseEventKind, Value};
///
/// let mut doc = Document::new();
/// let mut builder = FilteringBuilder::new(&mut doc, |_depth, kind, candidate| {
///     !(kind == ParseEventKind::Key && candidate.as_key() == Some("secret"))
/// });
/// builder.start_object(2)?;
/// builder.key(&mut "secret".to_string())?;
/// builder.string(&mut "hunter2".to_string())?;
/// builder.key(&mut "user".to_string())?;
/// builder.string(&mut "alice".to_string())?;
/// builder.end_object()?;
///
/// let value = doc.to_value().unwrap();
/// assert_eq!(value.get("secret"), None);
/// assert_eq!(value.get("user"), Some(&Value::from("alice")));
/// # Ok::<(), jsonsink::Error>(())
/// ```
pub struct FilteringBuilder<'a, F> {
    doc: &'a mut Document,
    /// Open containers, innermost last; `None` for a discarded one.
    stack: Vec<Option<NodeId>>,
    /// Keep flag of each open container, over a permanent `true` for the
    /// top level.
    keep_stack: Vec<bool>,
    /// Position of each open container among its parent's members.
    member_stack: Vec<Option<usize>>,
    /// Keep flag of each key still waiting for its value.
    key_keep_stack: Vec<bool>,
    /// Position and placeholder node of the member the pending key created.
    object_element: Option<(usize, NodeId)>,
    errored: bool,
    options: BuilderOptions,
    callback: F,
}

impl<'a, F> FilteringBuilder<'a, F> {
    /// Creates a builder writing into `doc` with default options.
    pub fn new(doc: &'a mut Document, callback: F) -> Self
    where
        F: FnMut(usize, ParseEventKind, Candidate<'_>) -> bool,
    {
        Self::with_options(doc, BuilderOptions::default(), callback)
    }

    /// Creates a builder writing into `doc`.
    pub fn with_options(doc: &'a mut Document, options: BuilderOptions, callback: F) -> Self
    where
        F: FnMut(usize, ParseEventKind, Candidate<'_>) -> bool,
    {
        Self {
            doc,
            stack: Vec::new(),
            keep_stack: vec![true],
            member_stack: Vec::new(),
            key_keep_stack: Vec::new(),
            object_element: None,
            errored: false,
            options,
            callback,
        }
    }

    /// Returns `true` once a parse error was reported or a size limit tripped.
    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.errored
    }

    /// Number of containers currently open, discarded ones included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<F> FilteringBuilder<'_, F>
where
    F: FnMut(usize, ParseEventKind, Candidate<'_>) -> bool,
{
    /// Whether the innermost open container (or the top level) is being
    /// built.
    fn enclosing_kept(&self) -> bool {
        let kept = self.keep_stack.last().copied().unwrap_or(false);
        debug_assert_eq!(
            kept,
            self.stack.last().is_none_or(Option::is_some),
            "keep flags out of step with the container stack"
        );
        kept
    }

    /// Works out where the next value goes, consuming the pending key.
    ///
    /// Only called while the enclosing container is kept.
    fn destination(&mut self) -> Destination {
        let Some(&Some(parent)) = self.stack.last() else {
            return Destination::Root;
        };
        if matches!(self.doc.value(parent), NodeValue::Array(..)) {
            return Destination::Element(parent);
        }
        let key_kept = self.key_keep_stack.pop();
        debug_assert!(key_kept.is_some(), "object value without a key");
        match (key_kept, self.object_element.take()) {
            (Some(true), Some((index, slot))) => Destination::Member {
                object: parent,
                index,
                slot,
            },
            _ => Destination::Nowhere,
        }
    }

    /// Stores a new node at `destination`.
    fn place(
        &mut self,
        destination: Destination,
        value: NodeValue,
        loc: SourceLocation,
    ) -> Option<NodeId> {
        match destination {
            Destination::Root => Some(self.doc.set_root(value, loc)),
            Destination::Element(array) => self.doc.push_element(array, value, loc),
            Destination::Member { slot, .. } => {
                self.doc.set(slot, value, loc);
                Some(slot)
            }
            Destination::Nowhere => None,
        }
    }

    /// Moves the detached node `id` to `destination`.
    fn attach(&mut self, destination: Destination, id: NodeId) {
        match destination {
            Destination::Root => {
                let root = self.doc.root_id();
                self.doc.adopt(root, id);
            }
            Destination::Element(array) => self.doc.push_node(array, id),
            Destination::Member { slot, .. } => self.doc.adopt(slot, id),
            Destination::Nowhere => self.doc.release(id),
        }
    }

    /// Cleans up after the value bound for `destination` was rejected.
    fn abandon(&mut self, destination: Destination) {
        match destination {
            Destination::Root => {
                let root = self.doc.root_id();
                self.doc.discard(root);
            }
            Destination::Member {
                object,
                index,
                slot,
            } => {
                self.doc.erase_discarded(object, slot, Some(index));
            }
            Destination::Element(_) | Destination::Nowhere => {}
        }
    }

    /// Handles a scalar. `make` runs only when the value can still be kept.
    fn handle_value(&mut self, make: impl FnOnce() -> NodeValue, loc: SourceLocation) {
        if !self.enclosing_kept() {
            return;
        }
        let depth = self.stack.len();
        let destination = self.destination();
        let id = self.doc.alloc(make(), loc);
        let candidate = Candidate::Node(self.doc.node_ref(id));
        let keep = (self.callback)(depth, ParseEventKind::Value, candidate);
        if keep && !matches!(destination, Destination::Nowhere) {
            self.attach(destination, id);
        } else {
            tracing::trace!(depth, %loc, "value discarded");
            self.doc.release(id);
            self.abandon(destination);
        }
    }

    fn start_container(
        &mut self,
        kind: ParseEventKind,
        make: impl FnOnce() -> NodeValue,
        len: usize,
        loc: SourceLocation,
    ) -> SinkResult {
        let depth = self.stack.len();
        let mut id = None;
        let mut member = None;
        if self.enclosing_kept() {
            let destination = self.destination();
            let keep = (self.callback)(depth, kind, Candidate::Pending);
            if keep {
                id = self.place(destination, make(), loc);
            }
            if id.is_none() {
                tracing::trace!(depth, %loc, ?kind, "container discarded at open");
                self.abandon(destination);
            } else if let Destination::Member { index, .. } = destination {
                member = Some(index);
            }
        }
        self.keep_stack.push(id.is_some());
        self.member_stack.push(member);
        self.stack.push(id);

        if id.is_some() && len != NO_LIMIT && len > self.options.max_container_len {
            let container = if kind == ParseEventKind::ArrayStart {
                "array"
            } else {
                "object"
            };
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

    fn end_container(&mut self, kind: ParseEventKind, loc: SourceLocation) -> SinkResult {
        debug_assert!(!self.stack.is_empty(), "end without a matching start");
        let depth = self.stack.len().saturating_sub(1);
        self.keep_stack.pop();
        let member = self.member_stack.pop().flatten();
        let Some(id) = self.stack.pop().flatten() else {
            return Ok(true);
        };
        let keep = (self.callback)(depth, kind, Candidate::Node(self.doc.node_ref(id)));
        if !keep {
            tracing::trace!(depth, %loc, ?kind, "container discarded at close");
            self.doc.discard(id);
            // the top level keeps its discarded root
            if let Some(&Some(parent)) = self.stack.last() {
                self.doc.erase_discarded(parent, id, member);
            }
        }
        Ok(true)
    }

    fn fail(&mut self, error: &Error) -> SinkResult {
        self.errored = true;
        self.options.error_policy.apply(error)
    }
}

impl<F> core::fmt::Debug for FilteringBuilder<'_, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FilteringBuilder")
            .field("stack", &self.stack)
            .field("keep_stack", &self.keep_stack)
            .field("member_stack", &self.member_stack)
            .field("key_keep_stack", &self.key_keep_stack)
            .field("object_element", &self.object_element)
            .field("errored", &self.errored)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<F> EventSink for FilteringBuilder<'_, F>
where
    F: FnMut(usize, ParseEventKind, Candidate<'_>) -> bool,
{
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
        self.handle_value(|| NodeValue::Null, loc);
        Ok(true)
    }

    fn boolean_at(&mut self, value: bool, loc: SourceLocation) -> SinkResult {
        self.handle_value(|| NodeValue::Boolean(value), loc);
        Ok(true)
    }

    fn number_integer_at(&mut self, value: i64, loc: SourceLocation) -> SinkResult {
        self.handle_value(|| NodeValue::Integer(value), loc);
        Ok(true)
    }

    fn number_unsigned_at(&mut self, value: u64, loc: SourceLocation) -> SinkResult {
        self.handle_value(|| NodeValue::Unsigned(value), loc);
        Ok(true)
    }

    fn number_float_at(&mut self, value: f64, _raw: &str, loc: SourceLocation) -> SinkResult {
        self.handle_value(|| NodeValue::Float(value), loc);
        Ok(true)
    }

    fn string_at(&mut self, value: &mut String, loc: SourceLocation) -> SinkResult {
        self.handle_value(|| NodeValue::String(mem::take(value)), loc);
        Ok(true)
    }

    fn start_object_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        self.start_container(
            ParseEventKind::ObjectStart,
            || NodeValue::Object(Members::default()),
            len,
            loc,
        )
    }

    fn key_at(&mut self, key: &mut String, loc: SourceLocation) -> SinkResult {
        // Keys inside a discarded object are not even offered.
        let Some(&Some(object)) = self.stack.last() else {
            debug_assert!(!self.stack.is_empty(), "key outside of an object");
            return Ok(true);
        };
        let depth = self.stack.len();
        let keep = (self.callback)(depth, ParseEventKind::Key, Candidate::Key(key.as_str()));
        self.key_keep_stack.push(keep);
        self.object_element = if keep {
            self.doc
                .member_slot(object, mem::take(key), NodeValue::Discarded, loc)
        } else {
            tracing::trace!(depth, %loc, key = key.as_str(), "key discarded");
            None
        };
        Ok(true)
    }

    fn end_object_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.end_container(ParseEventKind::ObjectEnd, loc)
    }

    fn start_array_at(&mut self, len: usize, loc: SourceLocation) -> SinkResult {
        self.start_container(
            ParseEventKind::ArrayStart,
            || NodeValue::Array(Vec::new()),
            len,
            loc,
        )
    }

    fn end_array_at(&mut self, loc: SourceLocation) -> SinkResult {
        self.end_container(ParseEventKind::ArrayEnd, loc)
    }
}
