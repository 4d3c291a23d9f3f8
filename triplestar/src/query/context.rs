//! Per-execution state threaded through the query pipeline.
//!
//! An `ExecutionContext` lives for exactly one execution of a plan. It owns
//! the synthetic variable allocator, the `Mapping` of variables bound so far
//! and the residual `ConstraintGraph`. Nothing in it is shared between
//! executions, so concurrent executions can never hand out colliding
//! variable names.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::handler::{QueryHandler, Stage};
use crate::query::constraints::ConstraintGraph;
use crate::query::error::QueryError;
use crate::query::var_alloc::VarAlloc;
use crate::types::{Triple, Var};

/// The variables bound by the stages built so far, each with a slot index.
///
/// Every binding flowing out of the most recent stage binds at least these
/// variables.
#[derive(Debug, Default)]
pub struct Mapping {
    index_of: HashMap<Var, usize>,
    vars: Vec<Var>,
}

impl Mapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a variable as bound, returning its slot.
    ///
    /// Idempotent: a known variable keeps its slot.
    pub fn new_index(&mut self, var: &Var) -> usize {
        if let Some(&index) = self.index_of.get(var) {
            return index;
        }
        let index = self.vars.len();
        self.index_of.insert(var.clone_value(), index);
        self.vars.push(var.clone_value());
        index
    }

    /// Check if a variable is bound upstream.
    #[must_use]
    pub fn has_index(&self, var: &Var) -> bool {
        self.index_of.contains_key(var)
    }

    /// Check whether every variable of `triple` is bound upstream.
    #[must_use]
    pub fn covers(&self, triple: &Triple) -> bool {
        triple.variables().into_iter().all(|v| self.has_index(v))
    }

    /// Bound variables in slot order.
    #[must_use]
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if nothing is bound yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// State for one execution of a query plan.
pub struct ExecutionContext<'a> {
    handler: &'a dyn QueryHandler,
    config: EngineConfig,
    var_alloc: VarAlloc,
    mapping: Mapping,
    constraints: ConstraintGraph,
}

impl<'a> ExecutionContext<'a> {
    /// Create a context for one execution against `handler`.
    #[must_use]
    pub fn new(handler: &'a dyn QueryHandler, config: EngineConfig) -> Self {
        Self {
            handler,
            config,
            var_alloc: VarAlloc::new(),
            mapping: Mapping::new(),
            constraints: ConstraintGraph::new(),
        }
    }

    /// Seed the residual constraint graph.
    #[must_use]
    pub fn with_constraints(mut self, constraints: ConstraintGraph) -> Self {
        self.constraints = constraints;
        self
    }

    /// The storage-facing handler of this execution.
    #[must_use]
    pub fn handler(&self) -> &'a dyn QueryHandler {
        self.handler
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Allocate a fresh synthetic variable.
    pub fn alloc_var(&mut self) -> Result<Var, QueryError> {
        self.var_alloc.alloc_var()
    }

    /// The synthetic variable allocator.
    #[must_use]
    pub const fn var_alloc(&self) -> &VarAlloc {
        &self.var_alloc
    }

    /// Variables bound by the stages built so far.
    #[must_use]
    pub const fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Record a variable bound by a step that is not a storage stage.
    pub fn note_bound(&mut self, var: &Var) {
        self.mapping.new_index(var);
    }

    /// The residual constraint graph.
    #[must_use]
    pub const fn constraints(&self) -> &ConstraintGraph {
        &self.constraints
    }

    /// Take the next residual pattern to match, if any.
    pub fn take_next_constraint(&mut self) -> Option<Triple> {
        self.constraints.take_next(&self.mapping)
    }

    /// Ask the handler for a stage matching `patterns`.
    ///
    /// The handler updates this context's mapping and may absorb residual
    /// constraints.
    pub fn pattern_stage(&mut self, patterns: &[Triple]) -> Box<dyn Stage<'a> + 'a> {
        self.handler
            .pattern_stage(&mut self.mapping, &mut self.constraints, patterns)
    }
}
