//! Storage abstraction consumed by the query pipeline.
//!
//! This module provides a `Graph` trait that abstracts over triple storage,
//! allowing the query layer to run against any backend: the in-memory
//! `MemoryGraph`, or a simulated graph with fault injection in tests.
//!
//! # Design
//!
//! The trait is a minimal abstraction over three primitives:
//! - Triple lookup where any position may be a wildcard (`None`)
//! - Node existence across all positions
//! - Emptiness
//!
//! Lookups return a pull-based `TripleCursor`. A cursor holds whatever the
//! backend needs to produce its results and must be closed by its owner.

use crate::types::{Node, Triple};

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error.
    Io(std::io::Error),
    /// Injected fault for simulation.
    InjectedFault(String),
    /// Corruption detected.
    Corruption(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InjectedFault(msg) => write!(f, "injected fault: {msg}"),
            Self::Corruption(msg) => write!(f, "corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A pull-based cursor over stored triples.
///
/// # Post-conditions
///
/// - After `next_triple` returns `Ok(None)` it keeps returning `Ok(None)`.
/// - After `close`, `next_triple` returns `Ok(None)` and the backend has
///   released everything the cursor held.
pub trait TripleCursor {
    /// Get the next matching triple.
    fn next_triple(&mut self) -> Result<Option<Triple>, StorageError>;

    /// Release the cursor. Idempotent.
    fn close(&mut self);
}

/// Boxed cursor for dynamic dispatch.
pub type BoxedTripleCursor<'a> = Box<dyn TripleCursor + 'a>;

/// A graph of stored triples.
///
/// Lookups never mutate the graph. Every `find` is independent: calling it
/// again with the same arguments restarts the sequence.
pub trait Graph {
    /// Find all stored triples matching `(subject, predicate, object)`.
    ///
    /// `None` in any position is a wildcard. Only concrete nodes are
    /// meaningful as lookup keys.
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
    ) -> Result<BoxedTripleCursor<'_>, StorageError>;

    /// True iff some stored triple has `node` in subject, predicate or
    /// object position.
    ///
    /// For fluid nodes (see [`Node::is_fluid`]) either answer is acceptable.
    fn contains_node(&self, node: &Node) -> Result<bool, StorageError>;

    /// True iff the graph holds no explicit triples.
    fn is_empty(&self) -> Result<bool, StorageError>;
}

/// Check whether a stored triple matches a lookup.
#[must_use]
pub fn lookup_matches(
    triple: &Triple,
    subject: Option<&Node>,
    predicate: Option<&Node>,
    object: Option<&Node>,
) -> bool {
    subject.is_none_or(|s| *s == triple.subject)
        && predicate.is_none_or(|p| *p == triple.predicate)
        && object.is_none_or(|o| *o == triple.object)
}
