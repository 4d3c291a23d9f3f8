//! Query shapes handed to a `QueryHandler`.
//!
//! - `Query` - a conjunction of triple patterns plus triple-term assignments,
//!   compiled into a binding plan
//! - `PatternGraph` - a set of triple patterns matched as a whole subgraph

use crate::config::EngineConfig;
use crate::query::error::PatternError;
use crate::types::{Node, Triple, Var};

/// A conjunctive triple-pattern query.
///
/// # Example
///
/// ```
/// use triplestar::query::Query;
/// use triplestar::types::{Node, Triple};
///
/// // Find ?x such that << :a :p ?x >> :r :d, and name the matched triple ?t.
/// let inner = Triple::new(Node::uri("a"), Node::uri("p"), Node::var("x"));
/// let query = Query::new()
///     .where_pattern(Triple::new(
///         Node::triple(inner.clone_value()),
///         Node::uri("r"),
///         Node::uri("d"),
///     ))
///     .bind_triple_term("t", inner);
/// assert_eq!(query.where_patterns.len(), 1);
/// ```
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Query {
    /// Required patterns (conjunction).
    pub where_patterns: Vec<Triple>,
    /// Assign the triple each binding grounds a pattern to a variable,
    /// applied after all `where_patterns`.
    pub triple_term_binds: Vec<(Var, Triple)>,
}

impl Query {
    /// Create a new empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a where pattern.
    #[must_use]
    pub fn where_pattern(mut self, pattern: Triple) -> Self {
        self.where_patterns.push(pattern);
        self
    }

    /// Match `pattern` and bind the matched triple to `var`.
    #[must_use]
    pub fn bind_triple_term(mut self, var: impl Into<String>, pattern: Triple) -> Self {
        self.triple_term_binds.push((Var::new(var), pattern));
        self
    }

    /// Every pattern in the query, where patterns first.
    pub fn all_patterns(&self) -> impl Iterator<Item = &Triple> {
        self.where_patterns
            .iter()
            .chain(self.triple_term_binds.iter().map(|(_, t)| t))
    }

    /// Check whether `var` can be bound by executing this query.
    #[must_use]
    pub fn can_bind(&self, var: &Var) -> bool {
        self.all_patterns().any(|t| t.mentions(var))
            || self.triple_term_binds.iter().any(|(v, _)| v == var)
    }

    /// Reject patterns that can never execute.
    ///
    /// # Errors
    ///
    /// - `EmptyPattern` if there is nothing to match
    /// - `ReservedVariableName` if a user variable uses the synthetic prefix
    /// - `TripleTermInPredicate` if a triple term is used as a predicate
    /// - `NestingTooDeep` if triple terms nest beyond the configured limit
    /// - `UnboundResultVariable` if a result variable occurs nowhere
    pub fn validate(&self, result_vars: &[Var], config: &EngineConfig) -> Result<(), PatternError> {
        if self.where_patterns.is_empty() && self.triple_term_binds.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        let assigned = self.triple_term_binds.iter().map(|(v, _)| v);
        for var in result_vars.iter().chain(assigned) {
            if var.is_synthetic() {
                return Err(PatternError::ReservedVariableName(var.clone_value()));
            }
        }

        for pattern in self.all_patterns() {
            if let Some(var) = pattern.variables().into_iter().find(|v| v.is_synthetic()) {
                return Err(PatternError::ReservedVariableName(var.clone_value()));
            }
            if pattern.has_predicate_triple_term() {
                return Err(PatternError::TripleTermInPredicate);
            }
            let depth = pattern.triple_term_depth();
            if depth > config.max_triple_term_depth {
                return Err(PatternError::NestingTooDeep {
                    depth,
                    limit: config.max_triple_term_depth,
                });
            }
        }

        if let Some(var) = result_vars.iter().find(|v| !self.can_bind(v)) {
            return Err(PatternError::UnboundResultVariable(var.clone_value()));
        }
        Ok(())
    }

    /// Create a copy of this query.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            where_patterns: self.where_patterns.iter().map(Triple::clone_value).collect(),
            triple_term_binds: self
                .triple_term_binds
                .iter()
                .map(|(v, t)| (v.clone_value(), t.clone_value()))
                .collect(),
        }
    }
}

/// A graph-shaped pattern: triples whose variables are shared across the
/// whole shape.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PatternGraph {
    triples: Vec<Triple>,
}

impl PatternGraph {
    /// Create an empty pattern graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pattern graph from triples.
    #[must_use]
    pub fn from_triples(triples: Vec<Triple>) -> Self {
        Self { triples }
    }

    /// Add a pattern triple.
    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    /// The pattern triples.
    #[must_use]
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Distinct variables of the shape, in order of first occurrence.
    #[must_use]
    pub fn variables(&self) -> Vec<Var> {
        let mut vars: Vec<Var> = Vec::new();
        for var in self.triples.iter().flat_map(Triple::variables) {
            if !vars.contains(var) {
                vars.push(var.clone_value());
            }
        }
        vars
    }

    /// Reject shapes that can never execute. See [`Query::validate`].
    ///
    /// # Errors
    ///
    /// Returns the first pattern-shape error found.
    pub fn validate(&self, config: &EngineConfig) -> Result<(), PatternError> {
        let query = Query {
            where_patterns: self.triples.iter().map(Triple::clone_value).collect(),
            triple_term_binds: Vec::new(),
        };
        query.validate(&self.variables(), config)
    }

    /// The binding query equivalent to this shape.
    ///
    /// Wildcards, including those inside triple terms, become distinct
    /// synthetic variables (`~any0`, `~any1`, ...) so every matched triple
    /// can be rebuilt from a binding.
    #[must_use]
    pub fn to_query(&self) -> Query {
        let mut wildcards = 0;
        let where_patterns = self
            .triples
            .iter()
            .map(|t| name_triple_wildcards(t, &mut wildcards))
            .collect();
        Query {
            where_patterns,
            triple_term_binds: Vec::new(),
        }
    }
}

fn name_triple_wildcards(triple: &Triple, count: &mut usize) -> Triple {
    Triple::new(
        name_wildcards(&triple.subject, count),
        name_wildcards(&triple.predicate, count),
        name_wildcards(&triple.object, count),
    )
}

fn name_wildcards(node: &Node, count: &mut usize) -> Node {
    match node {
        Node::Any => {
            let var = Var::new(format!("{}any{count}", Var::SYNTHETIC_PREFIX));
            *count += 1;
            Node::Variable(var)
        }
        Node::Triple(t) => Node::triple(name_triple_wildcards(t, count)),
        _ => node.clone_value(),
    }
}
