//! A `QueryHandler` for any `Graph`.

use crate::config::EngineConfig;
use crate::query::{ConstraintGraph, Mapping, PatternError, PatternGraph, Query};
use crate::storage::{Graph, StorageError};
use crate::types::{Node, Triple, Var};

use super::nodes::{DistinctNodes, Position};
use super::{
    BindingQueryPlan, BoxedNodeIterator, PatternStage, QueryHandler, SimpleBindingQueryPlan,
    SimpleTreeQueryPlan, Stage, TreeQueryPlan,
};

/// Answers queries directly from a [`Graph`]'s triple lookup.
pub struct SimpleQueryHandler<G> {
    graph: G,
    config: EngineConfig,
}

impl<G: Graph> SimpleQueryHandler<G> {
    /// Create a handler with the default configuration.
    pub fn new(graph: G) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    /// Create a handler with an explicit configuration.
    pub const fn with_config(graph: G, config: EngineConfig) -> Self {
        Self { graph, config }
    }

    /// The underlying storage.
    pub const fn graph(&self) -> &G {
        &self.graph
    }

    /// The engine configuration used by every plan of this handler.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl<G: Graph> QueryHandler for SimpleQueryHandler<G> {
    fn prepare_bindings<'a>(
        &'a self,
        query: &Query,
        result_vars: &[Var],
    ) -> Result<Box<dyn BindingQueryPlan<'a> + 'a>, PatternError> {
        query.validate(result_vars, &self.config)?;
        tracing::debug!(
            "prepared binding plan: {} patterns, {} triple-term assignments, {} result vars",
            query.where_patterns.len(),
            query.triple_term_binds.len(),
            result_vars.len()
        );
        Ok(Box::new(SimpleBindingQueryPlan::new(
            self,
            self.config,
            query.clone_value(),
            result_vars.iter().map(Var::clone_value).collect(),
        )))
    }

    fn pattern_stage<'a>(
        &'a self,
        mapping: &mut Mapping,
        constraints: &mut ConstraintGraph,
        patterns: &[Triple],
    ) -> Box<dyn Stage<'a> + 'a> {
        for var in patterns.iter().flat_map(Triple::variables) {
            mapping.new_index(var);
        }

        let absorbed = if self.config.absorb_constraints {
            constraints.absorb_where(|c| !c.has_triple_term() && mapping.covers(c))
        } else {
            Vec::new()
        };
        if !absorbed.is_empty() {
            tracing::debug!(
                "stage absorbed {} of {} residual constraints",
                absorbed.len(),
                absorbed.len() + constraints.len()
            );
        }

        Box::new(PatternStage::new(
            &self.graph,
            patterns.iter().map(Triple::clone_value).collect(),
            absorbed,
        ))
    }

    fn prepare_tree<'a>(
        &'a self,
        pattern: &PatternGraph,
    ) -> Result<Box<dyn TreeQueryPlan + 'a>, PatternError> {
        pattern.validate(&self.config)?;
        tracing::debug!("prepared tree plan: {} patterns", pattern.triples().len());
        let pattern = PatternGraph::from_triples(pattern.triples().iter().map(Triple::clone_value).collect());
        Ok(Box::new(SimpleTreeQueryPlan::new(self, self.config, pattern)))
    }

    fn objects_for<'a>(
        &'a self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
    ) -> Result<BoxedNodeIterator<'a>, StorageError> {
        let cursor = self.graph.find(subject, predicate, None)?;
        Ok(Box::new(DistinctNodes::new(cursor, Position::Object)))
    }

    fn subjects_for<'a>(
        &'a self,
        predicate: Option<&Node>,
        object: Option<&Node>,
    ) -> Result<BoxedNodeIterator<'a>, StorageError> {
        let cursor = self.graph.find(None, predicate, object)?;
        Ok(Box::new(DistinctNodes::new(cursor, Position::Subject)))
    }

    fn contains_node(&self, node: &Node) -> Result<bool, StorageError> {
        self.graph.contains_node(node)
    }

    fn is_empty(&self) -> Result<bool, StorageError> {
        self.graph.is_empty()
    }
}
