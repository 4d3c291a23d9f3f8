//! Lazy node sequences returned by direct lookups.

use std::collections::HashSet;

use crate::query::{IterState, QueryError};
use crate::storage::BoxedTripleCursor;
use crate::types::{Node, Triple};

/// A lazy stream of nodes. Same lifecycle as
/// [`crate::query::QueryIterator`].
pub trait NodeIterator {
    /// Pull the next node, or `Ok(None)` at end of stream.
    fn next_node(&mut self) -> Result<Option<Node>, QueryError>;

    /// Release the underlying storage cursor. Idempotent.
    fn close(&mut self);
}

/// Boxed node iterator for dynamic dispatch.
pub type BoxedNodeIterator<'a> = Box<dyn NodeIterator + 'a>;

/// Drain a node iterator into a vector and close it.
pub fn collect_nodes(mut iter: BoxedNodeIterator<'_>) -> Result<Vec<Node>, QueryError> {
    let mut nodes = Vec::new();
    loop {
        match iter.next_node() {
            Ok(Some(node)) => nodes.push(node),
            Ok(None) => break,
            Err(e) => {
                iter.close();
                return Err(e);
            }
        }
    }
    iter.close();
    Ok(nodes)
}

/// Which position of each triple to report.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Position {
    Subject,
    Object,
}

impl Position {
    fn take(self, triple: Triple) -> Node {
        match self {
            Self::Subject => triple.subject,
            Self::Object => triple.object,
        }
    }
}

/// One position of every triple from a cursor, without repeats.
pub(crate) struct DistinctNodes<'a> {
    cursor: BoxedTripleCursor<'a>,
    position: Position,
    seen: HashSet<Node>,
    state: IterState,
}

impl<'a> DistinctNodes<'a> {
    pub(crate) fn new(cursor: BoxedTripleCursor<'a>, position: Position) -> Self {
        Self {
            cursor,
            position,
            seen: HashSet::new(),
            state: IterState::Open,
        }
    }
}

impl NodeIterator for DistinctNodes<'_> {
    fn next_node(&mut self) -> Result<Option<Node>, QueryError> {
        if !self.state.check_pull()? {
            return Ok(None);
        }
        while let Some(triple) = self.cursor.next_triple()? {
            let node = self.position.take(triple);
            if !self.seen.contains(&node) {
                self.seen.insert(node.clone_value());
                return Ok(Some(node));
            }
        }
        self.cursor.close();
        self.state = IterState::Exhausted;
        Ok(None)
    }

    fn close(&mut self) {
        if self.state == IterState::Closed {
            return;
        }
        self.cursor.close();
        self.seen.clear();
        self.state = IterState::Closed;
    }
}
