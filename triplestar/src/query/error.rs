//! Errors raised while preparing or running a query.

use crate::storage::StorageError;
use crate::types::Var;

/// A pattern that can never be executed as written.
///
/// Raised at plan preparation, before any storage access.
#[derive(Debug, PartialEq, Eq)]
pub enum PatternError {
    /// The query has no patterns at all.
    EmptyPattern,
    /// A requested result variable does not occur in any pattern.
    UnboundResultVariable(Var),
    /// A user pattern uses a name reserved for engine-allocated variables.
    ReservedVariableName(Var),
    /// A triple term was found in predicate position.
    TripleTermInPredicate,
    /// Triple terms are nested deeper than the configured limit.
    NestingTooDeep { depth: usize, limit: usize },
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPattern => write!(f, "query has no patterns"),
            Self::UnboundResultVariable(v) => {
                write!(f, "result variable {v} is not bound by any pattern")
            }
            Self::ReservedVariableName(v) => {
                write!(f, "variable {v} uses a reserved name")
            }
            Self::TripleTermInPredicate => {
                write!(f, "triple terms are not supported in predicate position")
            }
            Self::NestingTooDeep { depth, limit } => {
                write!(f, "triple terms nested {depth} deep (limit {limit})")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Errors that can occur during query execution.
#[derive(Debug)]
pub enum QueryError {
    /// Storage failed underneath a stream.
    Storage(StorageError),
    /// The pattern could not be executed.
    Pattern(PatternError),
    /// A pull was made on a closed iterator.
    IteratorClosed,
    /// The synthetic variable allocator ran out of names.
    VarAllocExhausted,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage error: {e}"),
            Self::Pattern(e) => write!(f, "pattern error: {e}"),
            Self::IteratorClosed => write!(f, "iterator is closed"),
            Self::VarAllocExhausted => write!(f, "synthetic variable allocator exhausted"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::Pattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for QueryError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<PatternError> for QueryError {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}
