//! A query engine for graphs whose triples may themselves be terms.
//!
//! Life of a query:
//! 1. The caller builds a `Query` (or a `PatternGraph`) of triple patterns
//! 2. A `QueryHandler` validates it and prepares a reusable plan
//! 3. Each execution of the plan takes patterns from the constraint graph
//!    one at a time:
//!     - Flat patterns become a single storage `Stage`
//!     - Patterns with embedded triples are rewritten by the resolver into
//!       a chain of stages, one per embedded triple, each binding a
//!       synthetic variable
//! 4. The caller pulls bindings lazily and closes the stream when done
//!
//! System components:
//!  - `types` - nodes, variables and triples
//!  - `storage` - the `Graph` lookup contract and an in-memory graph
//!  - `handler` - the `QueryHandler` capability contract, stages and plans
//!  - `query` - bindings, binding streams and the triple-term resolver
//!  - `simulation` - fault-injecting graph wrapper for deterministic tests

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod handler;
pub mod query;
pub mod simulation;
pub mod storage;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, EngineConfig};
