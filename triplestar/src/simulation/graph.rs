//! A graph wrapper for deterministic testing.
//!
//! `SimulatedGraph` wraps any `Graph` and adds:
//! - Fault injection on lookups and on cursor reads
//! - Cursor accounting, so tests can prove every cursor was closed
//! - Optional seeded shuffling of lookup results, so tests can prove
//!   results do not depend on storage order

use std::cell::{Cell, RefCell};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::storage::{BoxedTripleCursor, Graph, StorageError, TripleCursor};
use crate::types::{Node, Triple};

/// Configuration for fault injection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultConfig {
    /// Probability that a lookup fails outright (0.0 - 1.0).
    pub find_error_rate: f64,
    /// Probability that a cursor read fails (0.0 - 1.0).
    pub read_error_rate: f64,
}

impl FaultConfig {
    /// Create a fault config with no faults (for baseline testing).
    #[must_use]
    pub fn no_faults() -> Self {
        Self::default()
    }

    /// Every read fails.
    #[must_use]
    pub const fn failing_reads() -> Self {
        Self {
            find_error_rate: 0.0,
            read_error_rate: 1.0,
        }
    }

    /// Every lookup fails.
    #[must_use]
    pub const fn failing_finds() -> Self {
        Self {
            find_error_rate: 1.0,
            read_error_rate: 0.0,
        }
    }
}

/// Statistics about simulated graph operations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedGraphStats {
    /// Number of lookups started.
    pub finds: u64,
    /// Number of triples handed out by cursors.
    pub reads: u64,
    /// Cursors opened and not yet closed.
    pub open_cursors: u64,
    /// Number of injected errors.
    pub injected_errors: u64,
}

/// Wraps a graph with seeded fault injection and cursor accounting.
///
/// # Thread Safety
///
/// Not thread-safe. Lookups take `&self`, so the RNG and the statistics use
/// interior mutability.
pub struct SimulatedGraph<G> {
    inner: G,
    fault_config: FaultConfig,
    shuffle: bool,
    rng: RefCell<StdRng>,
    stats: Cell<SimulatedGraphStats>,
}

impl<G: Graph> SimulatedGraph<G> {
    /// Wrap `inner` without faults.
    ///
    /// The seed ensures deterministic behavior - the same seed will
    /// produce the same sequence of faults and shuffles.
    #[must_use]
    pub fn new(inner: G, seed: u64) -> Self {
        Self::with_config(inner, seed, FaultConfig::default())
    }

    /// Wrap `inner` with custom fault configuration.
    #[must_use]
    pub fn with_config(inner: G, seed: u64, fault_config: FaultConfig) -> Self {
        Self {
            inner,
            fault_config,
            shuffle: false,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            stats: Cell::new(SimulatedGraphStats::default()),
        }
    }

    /// Return lookup results in a seeded random order.
    #[must_use]
    pub const fn shuffled(mut self) -> Self {
        self.shuffle = true;
        self
    }

    /// The wrapped graph.
    #[must_use]
    pub const fn inner(&self) -> &G {
        &self.inner
    }

    /// Get the current statistics.
    #[must_use]
    pub fn stats(&self) -> SimulatedGraphStats {
        self.stats.get()
    }

    fn update_stats(&self, update: impl FnOnce(&mut SimulatedGraphStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Check if a fault should be injected based on the given rate.
    fn should_inject_fault(&self, rate: f64) -> bool {
        if rate <= 0.0 {
            return false;
        }
        self.rng.borrow_mut().random::<f64>() < rate
    }

    fn inject(&self, what: &str) -> StorageError {
        self.update_stats(|s| s.injected_errors += 1);
        tracing::warn!("injecting simulated {what} error");
        StorageError::InjectedFault(format!("simulated {what} error"))
    }

    fn check_find(&self) -> Result<(), StorageError> {
        self.update_stats(|s| s.finds += 1);
        if self.should_inject_fault(self.fault_config.find_error_rate) {
            return Err(self.inject("find"));
        }
        Ok(())
    }

    fn drain_shuffled(&self, mut cursor: BoxedTripleCursor<'_>) -> Result<Vec<Triple>, StorageError> {
        let mut triples = Vec::new();
        let drained = loop {
            match cursor.next_triple() {
                Ok(Some(triple)) => triples.push(triple),
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        cursor.close();
        drained?;
        triples.shuffle(&mut *self.rng.borrow_mut());
        Ok(triples)
    }
}

impl<G: Graph> Graph for SimulatedGraph<G> {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
    ) -> Result<BoxedTripleCursor<'_>, StorageError> {
        self.check_find()?;
        let cursor = self.inner.find(subject, predicate, object)?;
        let source = if self.shuffle {
            Source::Buffered(self.drain_shuffled(cursor)?.into_iter())
        } else {
            Source::Live(cursor)
        };
        self.update_stats(|s| s.open_cursors += 1);
        Ok(Box::new(SimulatedCursor {
            graph: self,
            source,
            closed: false,
        }))
    }

    fn contains_node(&self, node: &Node) -> Result<bool, StorageError> {
        self.check_find()?;
        self.inner.contains_node(node)
    }

    fn is_empty(&self) -> Result<bool, StorageError> {
        self.check_find()?;
        self.inner.is_empty()
    }
}

enum Source<'a> {
    Live(BoxedTripleCursor<'a>),
    Buffered(std::vec::IntoIter<Triple>),
}

/// Cursor handed out by a `SimulatedGraph`.
struct SimulatedCursor<'a, G> {
    graph: &'a SimulatedGraph<G>,
    source: Source<'a>,
    closed: bool,
}

impl<G: Graph> TripleCursor for SimulatedCursor<'_, G> {
    fn next_triple(&mut self) -> Result<Option<Triple>, StorageError> {
        if self.closed {
            return Ok(None);
        }
        if self.graph.should_inject_fault(self.graph.fault_config.read_error_rate) {
            return Err(self.graph.inject("read"));
        }
        let next = match &mut self.source {
            Source::Live(cursor) => cursor.next_triple()?,
            Source::Buffered(triples) => triples.next(),
        };
        if next.is_some() {
            self.graph.update_stats(|s| s.reads += 1);
        }
        Ok(next)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Source::Live(cursor) = &mut self.source {
            cursor.close();
        }
        self.closed = true;
        self.graph
            .update_stats(|s| s.open_cursors = s.open_cursors.saturating_sub(1));
    }
}
