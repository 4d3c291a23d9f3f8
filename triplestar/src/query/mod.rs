//! Query execution over a `QueryHandler`.
//!
//! This module provides the pieces a query pipeline is built from:
//! - Bindings (`Binding`) and the lazy binding streams carrying them
//! - Per-execution state: synthetic variables, bound-variable mapping and
//!   the residual constraint graph
//! - The triple-term resolver, which rewrites patterns containing embedded
//!   triples into chains of flat storage matches
//!
//! # Example
//!
//! ```
//! use triplestar::handler::{QueryHandler, SimpleQueryHandler};
//! use triplestar::query::{Query, collect_bindings};
//! use triplestar::storage::MemoryGraph;
//! use triplestar::types::{Node, Triple, Var};
//!
//! let asserted = Triple::new(Node::uri("a"), Node::uri("p"), Node::uri("b"));
//! let graph = MemoryGraph::from_triples([
//!     asserted.clone_value(),
//!     Triple::new(Node::triple(asserted), Node::uri("r"), Node::uri("d")),
//! ]);
//! let handler = SimpleQueryHandler::new(graph);
//!
//! // << :a :p ?x >> :r :d
//! let inner = Triple::new(Node::uri("a"), Node::uri("p"), Node::var("x"));
//! let query = Query::new().where_pattern(Triple::new(
//!     Node::triple(inner),
//!     Node::uri("r"),
//!     Node::uri("d"),
//! ));
//!
//! let x = Var::new("x");
//! let plan = handler.prepare_bindings(&query, &[x.clone_value()]).unwrap();
//! let results = collect_bindings(plan.execute_bindings().unwrap()).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].get(&x), Some(&Node::uri("b")));
//! ```

pub mod binding;
pub mod constraints;
pub mod context;
pub mod error;
pub mod iterator;
pub mod pattern;
pub mod resolver;
pub mod var_alloc;

pub use binding::Binding;
pub use constraints::ConstraintGraph;
pub use context::{ExecutionContext, Mapping};
pub use error::{PatternError, QueryError};
pub use iterator::{
    BoxedQueryIterator, IterState, QueryIterAddTripleTerm, QueryIterProject,
    QueryIterRepeatApply, QueryIterSingleton, QueryIterTriplePattern, QueryIterator,
    collect_bindings,
};
pub use pattern::{PatternGraph, Query};
pub use resolver::{match_triple_star, rdf_star_triple};
pub use var_alloc::VarAlloc;
