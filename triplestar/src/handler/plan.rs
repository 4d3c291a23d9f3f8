//! Prepared query plans.
//!
//! A plan is compiled once by a `QueryHandler` and may be executed any
//! number of times. Each execution gets its own `ExecutionContext`, so
//! executions never share synthetic variables or constraint state.

use crate::config::EngineConfig;
use crate::query::{
    BoxedQueryIterator, ConstraintGraph, ExecutionContext, PatternGraph, Query, QueryError,
    QueryIterProject, QueryIterSingleton, collect_bindings, match_triple_star, rdf_star_triple,
};
use crate::storage::MemoryGraph;
use crate::types::{Triple, Var};

use super::QueryHandler;

/// A compiled binding query.
pub trait BindingQueryPlan<'a> {
    /// Start one execution. Nothing is read from storage until the returned
    /// stream is pulled.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline cannot be built, for example when
    /// the synthetic variable space is exhausted.
    fn execute_bindings(&self) -> Result<BoxedQueryIterator<'a>, QueryError>;

    /// Variables reported in each result binding.
    fn result_vars(&self) -> &[Var];
}

/// A compiled structural match.
pub trait TreeQueryPlan {
    /// Run the match and return every instantiated pattern triple.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails during matching.
    fn execute_tree(&self) -> Result<MemoryGraph, QueryError>;
}

/// Binding plan that matches patterns in constraint-graph order.
pub struct SimpleBindingQueryPlan<'a> {
    handler: &'a dyn QueryHandler,
    config: EngineConfig,
    query: Query,
    result_vars: Vec<Var>,
}

impl<'a> SimpleBindingQueryPlan<'a> {
    /// Create a plan. `query` must already be validated.
    #[must_use]
    pub const fn new(
        handler: &'a dyn QueryHandler,
        config: EngineConfig,
        query: Query,
        result_vars: Vec<Var>,
    ) -> Self {
        Self {
            handler,
            config,
            query,
            result_vars,
        }
    }

    fn seed_constraints(&self) -> ConstraintGraph {
        ConstraintGraph::from_patterns(
            self.query
                .where_patterns
                .iter()
                .map(Triple::clone_value)
                .collect(),
        )
    }
}

impl<'a> BindingQueryPlan<'a> for SimpleBindingQueryPlan<'a> {
    fn execute_bindings(&self) -> Result<BoxedQueryIterator<'a>, QueryError> {
        let mut ctx =
            ExecutionContext::new(self.handler, self.config).with_constraints(self.seed_constraints());

        let mut chain = QueryIterSingleton::root();
        while let Some(pattern) = ctx.take_next_constraint() {
            chain = rdf_star_triple(chain, &pattern, &mut ctx)?;
        }
        for (var, pattern) in &self.query.triple_term_binds {
            chain = match_triple_star(chain, var, pattern, &mut ctx)?;
        }

        tracing::debug!(
            "built pipeline: {} bound vars, {} synthetic",
            ctx.mapping().len(),
            ctx.var_alloc().allocated()
        );
        let vars = self.result_vars.iter().map(Var::clone_value).collect();
        Ok(Box::new(QueryIterProject::new(chain, vars)))
    }

    fn result_vars(&self) -> &[Var] {
        &self.result_vars
    }
}

/// Tree plan that runs the shape as a binding query over all its variables
/// and instantiates every pattern triple per result.
pub struct SimpleTreeQueryPlan<'a> {
    pattern: PatternGraph,
    bindings: SimpleBindingQueryPlan<'a>,
}

impl<'a> SimpleTreeQueryPlan<'a> {
    /// Create a plan. `pattern` must already be validated.
    #[must_use]
    pub fn new(handler: &'a dyn QueryHandler, config: EngineConfig, pattern: PatternGraph) -> Self {
        let query = pattern.to_query();
        let mut vars: Vec<Var> = Vec::new();
        for var in query.where_patterns.iter().flat_map(Triple::variables) {
            if !vars.contains(var) {
                vars.push(var.clone_value());
            }
        }
        Self {
            pattern: PatternGraph::from_triples(
                query.where_patterns.iter().map(Triple::clone_value).collect(),
            ),
            bindings: SimpleBindingQueryPlan::new(handler, config, query, vars),
        }
    }
}

impl TreeQueryPlan for SimpleTreeQueryPlan<'_> {
    fn execute_tree(&self) -> Result<MemoryGraph, QueryError> {
        let results = collect_bindings(self.bindings.execute_bindings()?)?;
        let mut matched = MemoryGraph::new();
        for binding in &results {
            for pattern in self.pattern.triples() {
                matched.add(binding.substitute(pattern));
            }
        }
        tracing::debug!(
            "tree match: {} results, {} triples",
            results.len(),
            matched.len()
        );
        Ok(matched)
    }
}
