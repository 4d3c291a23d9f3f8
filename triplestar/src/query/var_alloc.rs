//! Synthetic variable allocation.

use crate::query::error::QueryError;
use crate::types::Var;

/// Issues fresh variables for one query execution.
///
/// Names are `~t0`, `~t1`, ... The `~` prefix is rejected in user patterns at
/// preparation, so allocated variables never collide with user variables, and
/// the counter guarantees they never collide with each other. Each execution
/// owns its own allocator; nothing is shared between executions.
#[derive(Debug, Default)]
pub struct VarAlloc {
    next: u32,
}

impl VarAlloc {
    /// Create an allocator starting at `~t0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh variable.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::VarAllocExhausted` once the counter space is used
    /// up. This is unreachable for any realistic pattern.
    pub fn alloc_var(&mut self) -> Result<Var, QueryError> {
        let n = self.next;
        self.next = n.checked_add(1).ok_or(QueryError::VarAllocExhausted)?;
        let var = Var::new(format!("{}t{n}", Var::SYNTHETIC_PREFIX));
        tracing::trace!("allocated synthetic variable {var}");
        Ok(var)
    }

    /// Number of variables issued so far.
    #[must_use]
    pub const fn allocated(&self) -> usize {
        self.next as usize
    }

    #[cfg(test)]
    pub(crate) const fn starting_at(next: u32) -> Self {
        Self { next }
    }
}
