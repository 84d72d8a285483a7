//! Error types for the gridmdp crate.

use thiserror::Error;

/// Errors surfaced while building or solving a grid-world MDP.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MdpError {
    /// The grid, discount factor, or special-state configuration is unusable.
    /// Raised at model-build time, before any table is constructed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A transition or reward table violates the model invariants, or the
    /// inputs handed to a solver phase do not agree in dimension or carry
    /// a policy row that is not a probability distribution.
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// The outer improvement loop exceeded its hard cap. Policy iteration on
    /// a finite MDP must reach a stable policy within the cap, so this is an
    /// internal invariant violation, not a normal outcome.
    #[error("policy iteration did not stabilize within {limit} improvement steps")]
    IterationLimit { limit: usize },
}

impl MdpError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        MdpError::InvalidConfiguration(msg.into())
    }

    pub fn malformed_model(msg: impl Into<String>) -> Self {
        MdpError::MalformedModel(msg.into())
    }

    pub fn iteration_limit(limit: usize) -> Self {
        MdpError::IterationLimit { limit }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, MdpError>;
