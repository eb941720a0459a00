//! Event sinks for streaming JSON producers.
//!
//! A producer (a text tokenizer, a binary decoder, or [`replay`]) reports what
//! it reads as calls on an [`EventSink`]. This crate provides the sinks:
//!
//! - [`DomBuilder`] builds a [`Document`] from every event;
//! - [`FilteringBuilder`] builds only what a predicate keeps, skipping
//!   rejected subtrees without allocating for them;
//! - [`Acceptor`] builds nothing and is used to validate input.
//!
//! Documents are arenas of nodes addressed by [`NodeId`]. A finished document
//! converts into an owned [`Value`].
//!
//! ```
//! use jsonsink::{Document, DomBuilder, Value, replay};
//!
//! let input: Value = [Value::from(1u64), Value::from("two")].into_iter().collect();
//!
//! let mut doc = Document::new();
//! replay(&mut DomBuilder::new(&mut doc), input.to_events())?;
//! assert_eq!(doc.to_value(), Some(input));
//! # Ok::<(), jsonsink::Error>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod acceptor;
mod document;
mod dom;
mod error;
mod filter;
mod location;
mod options;
mod replay;
mod sink;
mod value;

#[cfg(test)]
mod tests;

pub use acceptor::Acceptor;
pub use document::{Document, Members, NodeId, NodeRef, NodeValue};
pub use dom::DomBuilder;
pub use error::{EXCESSIVE_SIZE_ID, Error, ErrorKind, ErrorPolicy};
pub use filter::{Candidate, FilteringBuilder};
pub use location::SourceLocation;
pub use options::BuilderOptions;
pub use replay::{Event, replay, replay_at};
pub use sink::{EventSink, NO_LIMIT, ParseEventKind, SinkResult};
pub use value::{Array, Map, Value};
