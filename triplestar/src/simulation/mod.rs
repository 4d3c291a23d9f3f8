//! Deterministic simulation support for tests.
//!
//! All randomness is seeded: given the same seed, the same lookups fail and
//! results come back in the same order.
//!
//! # Usage
//!
//! ```
//! use triplestar::simulation::{FaultConfig, SimulatedGraph};
//! use triplestar::storage::{Graph, MemoryGraph};
//!
//! let sim = SimulatedGraph::with_config(MemoryGraph::new(), 12345, FaultConfig::failing_finds());
//! assert!(sim.find(None, None, None).is_err());
//! assert_eq!(sim.stats().injected_errors, 1);
//! ```

mod graph;

pub use graph::{FaultConfig, SimulatedGraph, SimulatedGraphStats};
