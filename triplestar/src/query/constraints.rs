//! The residual constraint graph.
//!
//! Holds the pattern triples of a query that no stage has matched yet.
//! Patterns are the vertices; two patterns are adjacent when they share a
//! variable. The graph only ever shrinks: a plan takes patterns out to
//! match them, and stages may absorb patterns they evaluate themselves.

use crate::query::context::Mapping;
use crate::types::Triple;

/// Residual, not yet matched, pattern triples.
#[derive(Debug, Default)]
pub struct ConstraintGraph {
    patterns: Vec<Triple>,
}

impl ConstraintGraph {
    /// Create an empty constraint graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a constraint graph over the given patterns.
    #[must_use]
    pub const fn from_patterns(patterns: Vec<Triple>) -> Self {
        Self { patterns }
    }

    /// Number of residual patterns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if every pattern has been accounted for.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The residual patterns.
    #[must_use]
    pub fn patterns(&self) -> &[Triple] {
        &self.patterns
    }

    /// Check whether patterns `a` and `b` share a variable.
    #[must_use]
    pub fn shares_variable(&self, a: usize, b: usize) -> bool {
        let (Some(left), Some(right)) = (self.patterns.get(a), self.patterns.get(b)) else {
            return false;
        };
        left.variables().into_iter().any(|v| right.mentions(v))
    }

    /// Indexes of the patterns adjacent to pattern `index`.
    #[must_use]
    pub fn neighbours(&self, index: usize) -> Vec<usize> {
        (0..self.patterns.len())
            .filter(|&other| other != index && self.shares_variable(index, other))
            .collect()
    }

    /// Remove and return the pattern to match next.
    ///
    /// Prefers the first pattern sharing a variable with what is already
    /// bound, so joins stay connected. With nothing connected, takes the
    /// pattern with the most neighbours, the first one on ties.
    pub fn take_next(&mut self, mapping: &Mapping) -> Option<Triple> {
        if self.patterns.is_empty() {
            return None;
        }
        let index = self
            .patterns
            .iter()
            .position(|p| p.variables().into_iter().any(|v| mapping.has_index(v)))
            .unwrap_or_else(|| self.most_connected());
        Some(self.patterns.remove(index))
    }

    fn most_connected(&self) -> usize {
        let mut best = (0, 0);
        for index in 0..self.patterns.len() {
            let degree = self.neighbours(index).len();
            if degree > best.1 {
                best = (index, degree);
            }
        }
        best.0
    }

    /// Remove and return every pattern accepted by `absorb`.
    ///
    /// A pattern is either removed whole or left untouched.
    pub fn absorb_where<F>(&mut self, mut absorb: F) -> Vec<Triple>
    where
        F: FnMut(&Triple) -> bool,
    {
        let mut absorbed = Vec::new();
        let mut kept = Vec::with_capacity(self.patterns.len());
        for pattern in self.patterns.drain(..) {
            if absorb(&pattern) {
                absorbed.push(pattern);
            } else {
                kept.push(pattern);
            }
        }
        self.patterns = kept;
        absorbed
    }
}
