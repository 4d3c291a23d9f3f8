//! Graph term types shared by storage and the query pipeline.
//!
//! - `Var` - a named query variable
//! - `Node` - any graph term, including a triple used as a term
//! - `Triple` - an ordered (subject, predicate, object) statement

pub mod node;
pub mod triple;

pub use node::{Node, Var};
pub use triple::Triple;
