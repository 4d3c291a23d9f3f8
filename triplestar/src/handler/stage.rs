//! Pipeline stages that match triple patterns against storage.

use crate::query::{
    BoxedQueryIterator, QueryError, QueryIterRepeatApply, QueryIterSingleton, QueryIterTriplePattern,
};
use crate::storage::Graph;
use crate::types::Triple;

/// One matching step of a query pipeline.
///
/// A stage is built by [`super::QueryHandler::pattern_stage`] and consumed
/// by `deliver`, which chains it onto the incoming binding stream. Every
/// outgoing binding extends an incoming one; an incoming binding whose
/// patterns match nothing produces no output.
pub trait Stage<'a> {
    /// Chain this stage onto `input`.
    fn deliver(self: Box<Self>, input: BoxedQueryIterator<'a>) -> BoxedQueryIterator<'a>;
}

/// Matches its own patterns, then any residual constraints it absorbed, as
/// a chain of flat storage lookups run once per incoming binding.
pub struct PatternStage<'a> {
    graph: &'a dyn Graph,
    patterns: Vec<Triple>,
    absorbed: Vec<Triple>,
}

impl<'a> PatternStage<'a> {
    /// Create a stage over `graph`.
    #[must_use]
    pub const fn new(graph: &'a dyn Graph, patterns: Vec<Triple>, absorbed: Vec<Triple>) -> Self {
        Self {
            graph,
            patterns,
            absorbed,
        }
    }

    /// Patterns this stage was asked to match.
    #[must_use]
    pub fn patterns(&self) -> &[Triple] {
        &self.patterns
    }

    /// Residual constraints taken over from the constraint graph.
    #[must_use]
    pub fn absorbed(&self) -> &[Triple] {
        &self.absorbed
    }
}

impl<'a> Stage<'a> for PatternStage<'a> {
    fn deliver(self: Box<Self>, input: BoxedQueryIterator<'a>) -> BoxedQueryIterator<'a> {
        let Self {
            graph,
            patterns,
            absorbed,
        } = *self;
        Box::new(QueryIterRepeatApply::new(
            input,
            move |binding| -> Result<BoxedQueryIterator<'a>, QueryError> {
                let seed: BoxedQueryIterator<'a> = Box::new(QueryIterSingleton::new(binding));
                Ok(patterns.iter().chain(&absorbed).fold(seed, |chain, pattern| -> BoxedQueryIterator<'a> {
                    Box::new(QueryIterTriplePattern::new(chain, graph, pattern.clone_value()))
                }))
            },
        ))
    }
}
