//! Triple storage consumed by the query pipeline.
//!
//! The query layer only sees the [`Graph`] trait. `MemoryGraph` is the
//! bundled backend; other engines plug in by implementing `Graph`.
//!
//! # Usage
//!
//! ```
//! use triplestar::storage::{Graph, MemoryGraph};
//! use triplestar::types::{Node, Triple};
//!
//! let mut graph = MemoryGraph::new();
//! graph.add(Triple::new(Node::uri("a"), Node::uri("p"), Node::uri("b")));
//!
//! let mut cursor = graph.find(Some(&Node::uri("a")), None, None)?;
//! while let Some(triple) = cursor.next_triple()? {
//!     println!("{triple}");
//! }
//! cursor.close();
//! # Ok::<(), triplestar::storage::StorageError>(())
//! ```

mod io;
mod memory;

pub use io::{BoxedTripleCursor, Graph, StorageError, TripleCursor, lookup_matches};
pub use memory::{MemoryCursor, MemoryGraph};
