//! In-memory triple storage.
//!
//! Triples live in a slot vector; three position indexes map each node to the
//! slots holding it in subject, predicate and object position. A lookup walks
//! the shortest applicable index list and filters lazily.

use std::collections::HashMap;

use crate::storage::io::{BoxedTripleCursor, Graph, StorageError, TripleCursor, lookup_matches};
use crate::types::{Node, Triple};

/// An in-memory graph with set semantics.
///
/// # Invariants
///
/// - Every occupied slot is listed exactly once in each position index.
/// - No two occupied slots hold equal triples.
/// - `len` equals the number of occupied slots.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    slots: Vec<Option<Triple>>,
    slot_of: HashMap<Triple, usize>,
    subjects: HashMap<Node, Vec<usize>>,
    predicates: HashMap<Node, Vec<usize>>,
    objects: HashMap<Node, Vec<usize>>,
    len: usize,
}

impl MemoryGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from triples.
    #[must_use]
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            graph.add(triple);
        }
        graph
    }

    /// Add a triple. Returns false if it was already present.
    ///
    /// # Pre-conditions
    ///
    /// The triple must be concrete; patterns are never stored.
    pub fn add(&mut self, triple: Triple) -> bool {
        debug_assert!(triple.is_concrete(), "only concrete triples are stored");
        if self.slot_of.contains_key(&triple) {
            return false;
        }

        let slot = self.slots.len();
        push_index(&mut self.subjects, &triple.subject, slot);
        push_index(&mut self.predicates, &triple.predicate, slot);
        push_index(&mut self.objects, &triple.object, slot);
        self.slot_of.insert(triple.clone_value(), slot);
        self.slots.push(Some(triple));
        self.len += 1;
        true
    }

    /// Remove a triple. Returns false if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        let Some(slot) = self.slot_of.remove(triple) else {
            return false;
        };
        drop_index(&mut self.subjects, &triple.subject, slot);
        drop_index(&mut self.predicates, &triple.predicate, slot);
        drop_index(&mut self.objects, &triple.object, slot);
        self.slots[slot] = None;
        self.len -= 1;
        true
    }

    /// Check if a concrete triple is stored.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.slot_of.contains_key(triple)
    }

    /// Number of stored triples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// All stored triples, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.slots.iter().flatten()
    }

    fn candidates(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
    ) -> Candidates<'_> {
        let lookups = [
            subject.map(|s| self.subjects.get(s)),
            predicate.map(|p| self.predicates.get(p)),
            object.map(|o| self.objects.get(o)),
        ];

        let mut best: Option<&Vec<usize>> = None;
        for lookup in lookups.into_iter().flatten() {
            let Some(list) = lookup else {
                // A bound position with no index entry can never match.
                return Candidates::Empty;
            };
            if best.is_none_or(|b| list.len() < b.len()) {
                best = Some(list);
            }
        }

        match best {
            Some(list) => Candidates::Indexed(list.iter()),
            None => Candidates::All(0..self.slots.len()),
        }
    }
}

fn push_index(index: &mut HashMap<Node, Vec<usize>>, node: &Node, slot: usize) {
    if let Some(list) = index.get_mut(node) {
        list.push(slot);
    } else {
        index.insert(node.clone_value(), vec![slot]);
    }
}

fn drop_index(index: &mut HashMap<Node, Vec<usize>>, node: &Node, slot: usize) {
    if let Some(list) = index.get_mut(node) {
        list.retain(|s| *s != slot);
        if list.is_empty() {
            index.remove(node);
        }
    }
}

/// Slots a cursor still has to visit.
enum Candidates<'a> {
    Indexed(std::slice::Iter<'a, usize>),
    All(std::ops::Range<usize>),
    Empty,
}

impl Iterator for Candidates<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Self::Indexed(iter) => iter.next().copied(),
            Self::All(range) => range.next(),
            Self::Empty => None,
        }
    }
}

/// Cursor over a `MemoryGraph` lookup.
pub struct MemoryCursor<'a> {
    graph: &'a MemoryGraph,
    candidates: Candidates<'a>,
    subject: Option<Node>,
    predicate: Option<Node>,
    object: Option<Node>,
}

impl TripleCursor for MemoryCursor<'_> {
    fn next_triple(&mut self) -> Result<Option<Triple>, StorageError> {
        for slot in self.candidates.by_ref() {
            let Some(triple) = self.graph.slots.get(slot).and_then(Option::as_ref) else {
                continue;
            };
            if lookup_matches(
                triple,
                self.subject.as_ref(),
                self.predicate.as_ref(),
                self.object.as_ref(),
            ) {
                return Ok(Some(triple.clone_value()));
            }
        }
        Ok(None)
    }

    fn close(&mut self) {
        self.candidates = Candidates::Empty;
    }
}

impl Graph for MemoryGraph {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
    ) -> Result<BoxedTripleCursor<'_>, StorageError> {
        Ok(Box::new(MemoryCursor {
            graph: self,
            candidates: self.candidates(subject, predicate, object),
            subject: subject.map(Node::clone_value),
            predicate: predicate.map(Node::clone_value),
            object: object.map(Node::clone_value),
        }))
    }

    fn contains_node(&self, node: &Node) -> Result<bool, StorageError> {
        Ok(self.subjects.contains_key(node)
            || self.predicates.contains_key(node)
            || self.objects.contains_key(node))
    }

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len == 0)
    }
}
