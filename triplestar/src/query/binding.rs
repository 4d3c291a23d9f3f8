//! Variable bindings produced by the query pipeline.
//!
//! A `Binding` holds the current assignment of query variables to nodes.
//! Stages never mutate a binding they received: they copy it and extend the
//! copy, so every binding's lineage only ever grows.

use std::collections::HashMap;

use crate::types::{Node, Triple, Var};

/// A finite partial map from variables to concrete nodes.
///
/// # Invariants
///
/// - Every bound node is concrete.
/// - A variable, once bound, is never rebound to a different node.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Binding {
    /// Map from variables to their bound values.
    bindings: HashMap<Var, Node>,
}

impl Binding {
    /// Create a new empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable to a value.
    ///
    /// Returns true if the variable is now bound to `value`: either it was
    /// unbound, or it was already bound to an equal node. Returns false and
    /// leaves the binding untouched if it was bound to something else.
    pub fn bind(&mut self, variable: &Var, value: Node) -> bool {
        debug_assert!(value.is_concrete(), "only concrete nodes are bound");
        if let Some(existing) = self.bindings.get(variable) {
            return *existing == value;
        }
        self.bindings.insert(variable.clone_value(), value);
        true
    }

    /// Get the value bound to a variable.
    #[must_use]
    pub fn get(&self, variable: &Var) -> Option<&Node> {
        self.bindings.get(variable)
    }

    /// Check if a variable is bound.
    #[must_use]
    pub fn contains(&self, variable: &Var) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Get the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the binding has no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get an iterator over all assignments.
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Node)> {
        self.bindings.iter()
    }

    /// Keep only the given variables.
    #[must_use]
    pub fn project(&self, variables: &[Var]) -> Self {
        let bindings = variables
            .iter()
            .filter_map(|v| self.bindings.get(v).map(|n| (v.clone_value(), n.clone_value())))
            .collect();
        Self { bindings }
    }

    /// Replace bound variables in a node, descending into triple terms.
    #[must_use]
    pub fn substitute_node(&self, node: &Node) -> Node {
        match node {
            Node::Variable(v) => self
                .bindings
                .get(v)
                .map_or_else(|| node.clone_value(), Node::clone_value),
            Node::Triple(t) => Node::triple(self.substitute(t)),
            _ => node.clone_value(),
        }
    }

    /// Replace bound variables in every position of a triple.
    #[must_use]
    pub fn substitute(&self, triple: &Triple) -> Triple {
        Triple::new(
            self.substitute_node(&triple.subject),
            self.substitute_node(&triple.predicate),
            self.substitute_node(&triple.object),
        )
    }

    /// Create a copy of this binding.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        let mut bindings = HashMap::with_capacity(self.bindings.len());
        for (var, value) in &self.bindings {
            bindings.insert(var.clone_value(), value.clone_value());
        }
        Self { bindings }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<(&Var, &Node)> = self.bindings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "(")?;
        for (i, (var, node)) in entries.into_iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{var}={node}")?;
        }
        write!(f, ")")
    }
}
