//! The capability contract between storage and the query pipeline.
//!
//! A `QueryHandler` is everything the pipeline needs from a storage backend:
//!
//! - compile queries into reusable plans (`prepare_bindings`, `prepare_tree`)
//! - build one storage-matching [`Stage`] at a time (`pattern_stage`)
//! - direct lookups (`objects_for`, `subjects_for`)
//! - existence checks (`contains_node`, `is_empty`)
//!
//! [`SimpleQueryHandler`] implements it for any [`crate::storage::Graph`].
//!
//! # Example
//!
//! ```
//! use triplestar::handler::{QueryHandler, SimpleQueryHandler};
//! use triplestar::query::{Query, collect_bindings};
//! use triplestar::storage::MemoryGraph;
//! use triplestar::types::{Node, Triple, Var};
//!
//! let graph = MemoryGraph::from_triples([
//!     Triple::new(Node::uri("a"), Node::uri("p"), Node::uri("b")),
//! ]);
//! let handler = SimpleQueryHandler::new(graph);
//!
//! let query = Query::new().where_pattern(Triple::new(
//!     Node::uri("a"),
//!     Node::uri("p"),
//!     Node::var("x"),
//! ));
//! let x = Var::new("x");
//! let plan = handler.prepare_bindings(&query, &[x.clone_value()]).unwrap();
//! let results = collect_bindings(plan.execute_bindings().unwrap()).unwrap();
//! assert_eq!(results[0].get(&x), Some(&Node::uri("b")));
//! ```

mod nodes;
mod plan;
mod simple;
mod stage;

pub use nodes::{BoxedNodeIterator, NodeIterator, collect_nodes};
pub use plan::{BindingQueryPlan, SimpleBindingQueryPlan, SimpleTreeQueryPlan, TreeQueryPlan};
pub use simple::SimpleQueryHandler;
pub use stage::{PatternStage, Stage};

use crate::query::{ConstraintGraph, Mapping, PatternError, PatternGraph, Query};
use crate::storage::StorageError;
use crate::types::{Node, Triple, Var};

/// Storage capabilities required by the query pipeline.
///
/// Object safe: the pipeline holds handlers as `&dyn QueryHandler`.
pub trait QueryHandler {
    /// Compile `query` into a plan reporting `result_vars`.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if the query can never execute, for example
    /// when a result variable is bound by no pattern.
    fn prepare_bindings<'a>(
        &'a self,
        query: &Query,
        result_vars: &[Var],
    ) -> Result<Box<dyn BindingQueryPlan<'a> + 'a>, PatternError>;

    /// Build one stage matching `patterns`.
    ///
    /// Records the variables the stage binds in `mapping` and may remove
    /// from `constraints` the patterns it evaluates itself. Does not touch
    /// storage: probing starts when the delivered stream is pulled.
    fn pattern_stage<'a>(
        &'a self,
        mapping: &mut Mapping,
        constraints: &mut ConstraintGraph,
        patterns: &[Triple],
    ) -> Box<dyn Stage<'a> + 'a>;

    /// Compile a structural match of the whole `pattern` shape.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if the shape can never execute.
    fn prepare_tree<'a>(
        &'a self,
        pattern: &PatternGraph,
    ) -> Result<Box<dyn TreeQueryPlan + 'a>, PatternError>;

    /// Distinct objects of triples matching `(subject, predicate, *)`.
    ///
    /// `None` is a wildcard.
    fn objects_for<'a>(
        &'a self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
    ) -> Result<BoxedNodeIterator<'a>, StorageError>;

    /// Distinct subjects of triples matching `(*, predicate, object)`.
    ///
    /// `None` is a wildcard.
    fn subjects_for<'a>(
        &'a self,
        predicate: Option<&Node>,
        object: Option<&Node>,
    ) -> Result<BoxedNodeIterator<'a>, StorageError>;

    /// True iff some stored triple has `node` as its subject, predicate or
    /// object.
    ///
    /// Only top-level positions count: a node that occurs only inside a
    /// stored triple term is not reported. Unreliable for fluid (blank)
    /// nodes.
    fn contains_node(&self, node: &Node) -> Result<bool, StorageError>;

    /// True iff storage holds no explicit triples.
    fn is_empty(&self) -> Result<bool, StorageError>;
}
