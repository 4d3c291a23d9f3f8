//! Graph terms and query variables.

use std::fmt;

use super::triple::Triple;

/// A query variable.
///
/// Names beginning with [`Var::SYNTHETIC_PREFIX`] are reserved for variables
/// allocated by the engine itself and never appear in user patterns.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: String,
}

/// Short alias used throughout the query pipeline.
pub type Var = Variable;

impl Variable {
    /// First character of every engine-allocated variable name.
    pub const SYNTHETIC_PREFIX: char = '~';

    /// Create a new variable.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The variable name, without the leading `?`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this variable was allocated by the engine.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.name.starts_with(Self::SYNTHETIC_PREFIX)
    }

    /// Create a copy of this variable.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            name: self.name.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// A graph term.
///
/// Equality and hashing are structural: two triple terms are equal iff
/// their wrapped triples are equal, recursively.
///
/// # Invariants
///
/// - Stored triples only contain concrete nodes (`Uri`, `Literal`, `Blank`,
///   and `Triple` terms built from those).
/// - `Variable` and `Any` only appear in patterns.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Node {
    /// A named resource.
    Uri(String),
    /// A literal value, kept as its lexical form.
    Literal(String),
    /// A blank node. Its identity is only stable within one storage.
    Blank(String),
    /// A variable to be bound.
    Variable(Var),
    /// Matches anything.
    Any,
    /// A triple used as a term.
    Triple(Box<Triple>),
}

impl Node {
    /// Create a URI node.
    #[must_use]
    pub fn uri(s: impl Into<String>) -> Self {
        Self::Uri(s.into())
    }

    /// Create a literal node.
    #[must_use]
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(s.into())
    }

    /// Create a blank node.
    #[must_use]
    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    /// Create a variable node.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(Var::new(name))
    }

    /// Wrap a triple as a term.
    #[must_use]
    pub fn triple(triple: Triple) -> Self {
        Self::Triple(Box::new(triple))
    }

    /// True for nodes that may be stored: no variables or wildcards at any depth.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Uri(_) | Self::Literal(_) | Self::Blank(_) => true,
            Self::Variable(_) | Self::Any => false,
            Self::Triple(t) => t.is_concrete(),
        }
    }

    /// Check if this is a variable.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Check if this is the wildcard.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Check if this is a triple term.
    #[must_use]
    pub const fn is_triple_term(&self) -> bool {
        matches!(self, Self::Triple(_))
    }

    /// Blank nodes are fluid: their identity may change between calls.
    #[must_use]
    pub const fn is_fluid(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    /// Get the variable if this is one.
    #[must_use]
    pub const fn as_var(&self) -> Option<&Var> {
        match self {
            Self::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Get the wrapped triple if this is a triple term.
    #[must_use]
    pub fn as_triple(&self) -> Option<&Triple> {
        match self {
            Self::Triple(t) => Some(&**t),
            _ => None,
        }
    }

    /// How many triple terms are nested inside one another at this position.
    ///
    /// Plain terms have depth 0, `<< a p b >>` has depth 1.
    #[must_use]
    pub fn triple_term_depth(&self) -> usize {
        match self {
            Self::Triple(t) => 1 + t.triple_term_depth(),
            _ => 0,
        }
    }

    /// The concrete form of this node for a storage lookup.
    ///
    /// Variables, wildcards and triple terms that still hold variables
    /// become `None`, the lookup wildcard.
    #[must_use]
    pub fn as_lookup(&self) -> Option<&Self> {
        if self.is_concrete() { Some(self) } else { None }
    }

    /// Create a copy of this node.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        match self {
            Self::Uri(s) => Self::Uri(s.as_str().to_owned()),
            Self::Literal(s) => Self::Literal(s.as_str().to_owned()),
            Self::Blank(s) => Self::Blank(s.as_str().to_owned()),
            Self::Variable(v) => Self::Variable(v.clone_value()),
            Self::Any => Self::Any,
            Self::Triple(t) => Self::Triple(Box::new(t.clone_value())),
        }
    }
}

impl From<Var> for Node {
    fn from(var: Var) -> Self {
        Self::Variable(var)
    }
}

impl From<Triple> for Node {
    fn from(triple: Triple) -> Self {
        Self::triple(triple)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(s) => write!(f, "<{s}>"),
            Self::Literal(s) => write!(f, "\"{s}\""),
            Self::Blank(s) => write!(f, "_:{s}"),
            Self::Variable(v) => write!(f, "{v}"),
            Self::Any => write!(f, "ANY"),
            Self::Triple(t) => write!(f, "<< {} {} {} >>", t.subject, t.predicate, t.object),
        }
    }
}
