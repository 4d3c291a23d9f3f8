//! The triple statement type.

use std::fmt;

use super::node::{Node, Var};

/// A complete triple (subject, predicate, object).
///
/// Any position may independently be concrete, a variable, the wildcard, or
/// a triple term. Only concrete triples are ever stored.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    /// The subject.
    pub subject: Node,
    /// The predicate.
    pub predicate: Node,
    /// The object.
    pub object: Node,
}

impl Triple {
    /// Create a new triple.
    #[must_use]
    pub const fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Check whether the subject or object holds a triple term.
    ///
    /// Predicate position is covered by
    /// [`Triple::has_predicate_triple_term`].
    #[must_use]
    pub const fn has_triple_term(&self) -> bool {
        self.subject.is_triple_term() || self.object.is_triple_term()
    }

    /// Check whether a triple term sits in predicate position anywhere in
    /// this triple, including inside nested triple terms.
    #[must_use]
    pub fn has_predicate_triple_term(&self) -> bool {
        if self.predicate.is_triple_term() {
            return true;
        }
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(Node::as_triple)
            .any(Self::has_predicate_triple_term)
    }

    /// Deepest triple-term nesting found in any position.
    #[must_use]
    pub fn triple_term_depth(&self) -> usize {
        self.subject
            .triple_term_depth()
            .max(self.predicate.triple_term_depth())
            .max(self.object.triple_term_depth())
    }

    /// True if all positions are concrete.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.subject.is_concrete() && self.predicate.is_concrete() && self.object.is_concrete()
    }

    /// All variables mentioned in this triple, at any depth, in order of
    /// first occurrence.
    #[must_use]
    pub fn variables(&self) -> Vec<&Var> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables<'a>(&'a self, vars: &mut Vec<&'a Var>) {
        for node in [&self.subject, &self.predicate, &self.object] {
            match node {
                Node::Variable(v) => {
                    if !vars.contains(&v) {
                        vars.push(v);
                    }
                }
                Node::Triple(t) => t.collect_variables(vars),
                _ => {}
            }
        }
    }

    /// Check if a variable occurs anywhere in this triple.
    #[must_use]
    pub fn mentions(&self, var: &Var) -> bool {
        self.variables().contains(&var)
    }

    /// Create a copy of this triple.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            subject: self.subject.clone_value(),
            predicate: self.predicate.clone_value(),
            object: self.object.clone_value(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}
