//! Arena-backed JSON document.
//!
//! Every node of a [`Document`] lives in one growable `Vec`; arrays and
//! objects refer to their children by [`NodeId`]. Builders keep a stack of
//! ids into the arena rather than references, so growing a container never
//! invalidates an insertion point.
//!
//! Removing a subtree (overwriting a container, erasing a rejected child)
//! returns its slots to a free list that later allocations reuse.

use alloc::{string::String, vec::Vec};
use core::mem;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::{
    location::SourceLocation,
    value::{Map, Value},
};

/// Object members in insertion order, mapping keys to child nodes.
pub type Members = IndexMap<String, NodeId, FxBuildHasher>;

/// Index into a document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The contents of one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NodeValue {
    /// `null`.
    #[default]
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// A signed integer.
    Integer(i64),
    /// A non-negative integer.
    Unsigned(u64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    String(String),
    /// Element ids in order.
    Array(Vec<NodeId>),
    /// Member ids by key, in insertion order.
    Object(Members),
    /// Placeholder for content a filter rejected. A completed tree only ever
    /// holds it at the root, when the whole document was rejected.
    Discarded,
}

impl NodeValue {
    /// Returns `true` for the discard placeholder.
    #[must_use]
    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }

    /// Returns `true` for arrays and objects.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(..) | Self::Object(..))
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    value: NodeValue,
    location: SourceLocation,
}

/// A JSON document stored in a node arena.
///
/// A document always has a root node, `null` until something is built.
///
/// # Examples
///
/// ```
/// use jsonsink::{DomBuilder, Document, EventSink, Value};
///
/// let mut doc = Document::new();
/// let mut builder = DomBuilder::new(&mut doc);
/// builder.start_array(1).unwrap();
/// builder.boolean(true).unwrap();
/// builder.end_array().unwrap();
///
/// assert_eq!(doc.to_value(), Some(Value::Array(vec![Value::Boolean(true)])));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// The most children one array or object can hold.
    pub const MAX_CONTAINER_LEN: usize =
        isize::MAX.unsigned_abs() / mem::size_of::<NodeId>();

    /// Creates a document whose root is `null`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: alloc::vec![Node::default()],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    /// The id of the root node.
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// A handle on the root node.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: self.root,
        }
    }

    /// A handle on node `id`, if it is in use.
    ///
    /// Ids of removed nodes yield `None` until the slot is reused, after
    /// which they refer to the new node. Checking takes time proportional to
    /// the number of free slots.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len() && !self.free.contains(&id)).then_some(NodeRef { doc: self, id })
    }

    /// Returns `true` when a filter rejected the whole document.
    #[must_use]
    pub fn is_discarded(&self) -> bool {
        self.value(self.root).is_discarded()
    }

    /// Number of nodes currently in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Always `false`: a document has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Resets the document to a single `null` root, keeping its capacity.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = Node::default();
        self.free.clear();
        self.root = NodeId(0);
    }

    /// Copies the document into an owned [`Value`].
    ///
    /// Returns `None` if the root was discarded.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        self.root().to_value()
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn value(&self, id: NodeId) -> &NodeValue {
        &self.nodes[id.0].value
    }

    // ─── construction, used by the builders ──────────────────────────────

    /// Stores `value` in a fresh slot.
    pub(crate) fn alloc(&mut self, value: NodeValue, location: SourceLocation) -> NodeId {
        let node = Node { value, location };
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = node;
            id
        } else {
            let id = NodeId(self.nodes.len());
            self.nodes.push(node);
            id
        }
    }

    /// Overwrites node `id`, releasing whatever subtree it held.
    pub(crate) fn set(&mut self, id: NodeId, value: NodeValue, location: SourceLocation) {
        let old = mem::replace(&mut self.nodes[id.0], Node { value, location });
        self.release_value(old.value);
    }

    /// Overwrites the root.
    pub(crate) fn set_root(&mut self, value: NodeValue, location: SourceLocation) -> NodeId {
        self.set(self.root, value, location);
        self.root
    }

    /// Appends a new element to array `array`.
    ///
    /// Returns `None` if `array` is not an array.
    pub(crate) fn push_element(
        &mut self,
        array: NodeId,
        value: NodeValue,
        location: SourceLocation,
    ) -> Option<NodeId> {
        if !matches!(self.value(array), NodeValue::Array(..)) {
            return None;
        }
        let child = self.alloc(value, location);
        if let NodeValue::Array(ids) = &mut self.nodes[array.0].value {
            ids.push(child);
        }
        Some(child)
    }

    /// Appends the detached node `child` to array `array`.
    pub(crate) fn push_node(&mut self, array: NodeId, child: NodeId) {
        if let NodeValue::Array(ids) = &mut self.nodes[array.0].value {
            ids.push(child);
        } else {
            debug_assert!(false, "push_node target is not an array");
            self.release(child);
        }
    }

    /// Moves the detached node `source` into `target`, releasing what
    /// `target` held. `source`'s slot is freed.
    pub(crate) fn adopt(&mut self, target: NodeId, source: NodeId) {
        let node = mem::take(&mut self.nodes[source.0]);
        self.free.push(source);
        let old = mem::replace(&mut self.nodes[target.0], node);
        self.release_value(old.value);
    }

    /// Finds or creates the member `key` of object `object` and sets it to
    /// `placeholder`. An existing member keeps its position.
    ///
    /// Returns the member's position and node, or `None` if `object` is not
    /// an object.
    pub(crate) fn member_slot(
        &mut self,
        object: NodeId,
        key: String,
        placeholder: NodeValue,
        location: SourceLocation,
    ) -> Option<(usize, NodeId)> {
        let existing = match self.value(object) {
            NodeValue::Object(members) => members
                .get_full(&key)
                .map(|(index, _, &slot)| (index, slot)),
            _ => return None,
        };
        if let Some((index, slot)) = existing {
            self.set(slot, placeholder, location);
            return Some((index, slot));
        }
        let slot = self.alloc(placeholder, location);
        let NodeValue::Object(members) = &mut self.nodes[object.0].value else {
            return None;
        };
        let (index, _) = members.insert_full(key, slot);
        Some((index, slot))
    }

    /// Replaces node `id` with the discard placeholder.
    pub(crate) fn discard(&mut self, id: NodeId) {
        let location = self.node(id).location;
        self.set(id, NodeValue::Discarded, location);
    }

    /// Removes the discarded child `child` from `parent` and frees it.
    ///
    /// `member` is the child's position when `parent` is an object; array
    /// children are always the last element. No other child of `parent` may
    /// be discarded.
    pub(crate) fn erase_discarded(
        &mut self,
        parent: NodeId,
        child: NodeId,
        member: Option<usize>,
    ) -> bool {
        debug_assert!(self.value(child).is_discarded());
        debug_assert!(
            match self.value(parent) {
                NodeValue::Array(ids) => self.discarded_count(ids.iter()),
                NodeValue::Object(members) => self.discarded_count(members.values()),
                _ => 0,
            } <= 1,
            "more than one discarded sibling"
        );
        let removed = match &mut self.nodes[parent.0].value {
            NodeValue::Array(ids) if ids.last() == Some(&child) => ids.pop(),
            NodeValue::Object(members) => member
                .filter(|&index| members.get_index(index).is_some_and(|(_, &id)| id == child))
                .and_then(|index| members.shift_remove_index(index))
                .map(|(_, id)| id),
            _ => None,
        };
        debug_assert!(removed.is_some(), "discarded child not found where expected");
        if let Some(id) = removed {
            self.release(id);
        }
        removed.is_some()
    }

    fn discarded_count<'i>(&self, ids: impl Iterator<Item = &'i NodeId>) -> usize {
        ids.filter(|&&id| self.value(id).is_discarded()).count()
    }

    /// Frees node `id` and its whole subtree.
    pub(crate) fn release(&mut self, id: NodeId) {
        let node = mem::take(&mut self.nodes[id.0]);
        self.free.push(id);
        self.release_value(node.value);
    }

    fn release_value(&mut self, value: NodeValue) {
        let mut pending = Vec::new();
        push_children(value, &mut pending);
        while let Some(id) = pending.pop() {
            let node = mem::take(&mut self.nodes[id.0]);
            self.free.push(id);
            push_children(node.value, &mut pending);
        }
    }
}

/// `None` for the discard placeholder.
fn scalar_value(value: &NodeValue) -> Option<Value> {
    let value = match value {
        NodeValue::Null => Value::Null,
        NodeValue::Boolean(b) => Value::Boolean(*b),
        NodeValue::Integer(n) => Value::Integer(*n),
        NodeValue::Unsigned(n) => Value::Unsigned(*n),
        NodeValue::Float(n) => Value::Float(*n),
        NodeValue::String(s) => Value::String(s.clone()),
        NodeValue::Array(_) | NodeValue::Object(_) | NodeValue::Discarded => return None,
    };
    Some(value)
}

/// A container being copied by [`NodeRef::to_value`].
enum Partial<'a> {
    Array(Vec<Value>, core::slice::Iter<'a, NodeId>),
    /// The key is that of the child being copied.
    Object(Map, indexmap::map::Iter<'a, String, NodeId>, Option<&'a str>),
}

impl<'a> Partial<'a> {
    fn next_child(&mut self) -> Option<NodeId> {
        match self {
            Self::Array(_, ids) => ids.next().copied(),
            Self::Object(_, members, key) => {
                let (k, &id) = members.next()?;
                *key = Some(k.as_str());
                Some(id)
            }
        }
    }

    fn accept(&mut self, value: Value) {
        match self {
            Self::Array(out, _) => out.push(value),
            Self::Object(out, _, key) => {
                if let Some(key) = key.take() {
                    out.insert(String::from(key), value);
                }
            }
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Array(out, _) => Value::Array(out),
            Self::Object(out, ..) => Value::Object(out),
        }
    }
}

fn push_children(value: NodeValue, out: &mut Vec<NodeId>) {
    match value {
        NodeValue::Array(ids) => out.extend(ids),
        NodeValue::Object(members) => out.extend(members.into_values()),
        _ => {}
    }
}

/// A borrowed handle on one node of a [`Document`].
///
/// Filtering predicates receive these to inspect what was just built.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The node's id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's contents.
    #[must_use]
    pub fn value(&self) -> &'a NodeValue {
        self.doc.value(self.id)
    }

    /// Where the event that built this node was read.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.doc.node(self.id).location
    }

    /// Returns `true` for `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.value(), NodeValue::Null)
    }

    /// Returns `true` for arrays.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.value(), NodeValue::Array(..))
    }

    /// Returns `true` for objects.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.value(), NodeValue::Object(..))
    }

    /// Returns `true` for the discard placeholder.
    #[must_use]
    pub fn is_discarded(&self) -> bool {
        self.value().is_discarded()
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.value() {
            NodeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The number as `i64`, if it is an integer that fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.value() {
            NodeValue::Integer(n) => Some(*n),
            NodeValue::Unsigned(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// The number as `u64`, if it is a non-negative integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.value() {
            NodeValue::Unsigned(n) => Some(*n),
            NodeValue::Integer(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// The number, if this is a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.value() {
            NodeValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self.value() {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Number of children; zero for scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.value() {
            NodeValue::Array(ids) => ids.len(),
            NodeValue::Object(members) => members.len(),
            _ => 0,
        }
    }

    /// Returns `true` if the node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The member `key`, if this is an object that has it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeRef<'a>> {
        match self.value() {
            NodeValue::Object(members) => members.get(key).map(|&id| self.child(id)),
            _ => None,
        }
    }

    /// The element at `index`, if this is an array that long.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<NodeRef<'a>> {
        match self.value() {
            NodeValue::Array(ids) => ids.get(index).map(|&id| self.child(id)),
            _ => None,
        }
    }

    /// Iterates over array elements; empty for anything else.
    pub fn elements(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        let doc = self.doc;
        let ids: &'a [NodeId] = match self.value() {
            NodeValue::Array(ids) => ids,
            _ => &[],
        };
        ids.iter().map(move |&id| NodeRef { doc, id })
    }

    /// Iterates over object members in insertion order; empty for anything
    /// else.
    pub fn members(&self) -> impl Iterator<Item = (&'a str, NodeRef<'a>)> + use<'a> {
        let doc = self.doc;
        let members = match self.value() {
            NodeValue::Object(members) => Some(members),
            _ => None,
        };
        members
            .into_iter()
            .flat_map(|m| m.iter())
            .map(move |(k, &id)| (k.as_str(), NodeRef { doc, id }))
    }

    /// Copies the subtree into an owned [`Value`].
    ///
    /// Returns `None` for a discarded node; discarded children are skipped.
    /// Works with an explicit stack, so nesting depth is bounded only by
    /// memory.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        let doc = self.doc;
        let mut stack: Vec<Partial<'a>> = Vec::new();
        let mut current = self.id;
        loop {
            let mut finished = match doc.value(current) {
                NodeValue::Array(ids) => {
                    stack.push(Partial::Array(Vec::with_capacity(ids.len()), ids.iter()));
                    None
                }
                NodeValue::Object(members) => {
                    let map =
                        Map::with_capacity_and_hasher(members.len(), FxBuildHasher::default());
                    stack.push(Partial::Object(map, members.iter(), None));
                    None
                }
                scalar => Some(scalar_value(scalar)),
            };
            // Hand finished values up until some container has a child left.
            loop {
                let Some(top) = stack.last_mut() else {
                    return finished.flatten();
                };
                if let Some(value) = finished.take().flatten() {
                    top.accept(value);
                }
                if let Some(next) = top.next_child() {
                    current = next;
                    break;
                }
                finished = stack.pop().map(|done| Some(done.into_value()));
            }
        }
    }

    fn child(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef { doc: self.doc, id }
    }
}

impl core::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("value", self.value())
            .finish()
    }
}
