//! Engine configuration module.
//!
//! This module provides configuration loading for the query engine from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `TRIPLESTAR_MAX_TRIPLE_TERM_DEPTH`: Deepest triple-term nesting a pattern may use (default: `32`)
//! - `TRIPLESTAR_ABSORB_CONSTRAINTS`: Whether stages absorb residual patterns (default: `true`)
//!
//! # Invariants
//!
//! - `max_triple_term_depth` is always at least 1

/// Query engine configuration.
///
/// Carried by a query handler and copied into every execution context.
///
/// # Post-conditions
///
/// When constructed via `from_env()`, `max_triple_term_depth >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest triple-term nesting accepted in a pattern.
    /// Deeper patterns are rejected at preparation.
    pub max_triple_term_depth: usize,
    /// Whether a pattern stage may take over residual patterns it can
    /// evaluate with the variables already bound.
    pub absorb_constraints: bool,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_triple_term_depth: Self::DEFAULT_MAX_TRIPLE_TERM_DEPTH,
            absorb_constraints: true,
        }
    }
}

impl EngineConfig {
    /// Default nesting limit for triple terms.
    pub const DEFAULT_MAX_TRIPLE_TERM_DEPTH: usize = 32;

    const DEPTH_VAR: &'static str = "TRIPLESTAR_MAX_TRIPLE_TERM_DEPTH";
    const ABSORB_VAR: &'static str = "TRIPLESTAR_ABSORB_CONSTRAINTS";

    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TRIPLESTAR_MAX_TRIPLE_TERM_DEPTH` is set but not a positive integer
    /// - `TRIPLESTAR_ABSORB_CONSTRAINTS` is set but not a boolean
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_triple_term_depth = match lookup(Self::DEPTH_VAR) {
            Some(value) => parse_depth(&value)?,
            None => Self::DEFAULT_MAX_TRIPLE_TERM_DEPTH,
        };
        let absorb_constraints = match lookup(Self::ABSORB_VAR) {
            Some(value) => parse_flag(Self::ABSORB_VAR, &value)?,
            None => true,
        };

        Ok(Self {
            max_triple_term_depth,
            absorb_constraints,
        })
    }
}

fn parse_depth(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(depth) if depth >= 1 => Ok(depth),
        _ => Err(ConfigError::InvalidValue {
            name: EngineConfig::DEPTH_VAR.to_string(),
            message: format!("'{value}' is not a positive integer"),
        }),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a boolean"),
        }),
    }
}
