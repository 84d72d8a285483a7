//! Policy iteration: evaluation, greedy improvement, and the driver that
//! alternates them until the policy is stable.

pub mod evaluation;
pub mod improvement;
pub mod iteration;

pub use evaluation::evaluate;
pub use improvement::{action_value, improve};
pub use iteration::solve;

use crate::policy::{Policy, ValueFunction};

/// Evaluation sweeps per iteration when the caller does not override it.
pub const DEFAULT_EVALUATION_SWEEPS: usize = 15;

/// Configuration options for the policy iteration driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyIterationConfig {
    /// In-place evaluation sweeps per iteration. A hard budget, not a
    /// convergence tolerance.
    pub evaluation_sweeps: usize,
    /// Cap on improvement steps before the driver gives up with
    /// [`crate::error::MdpError::IterationLimit`]. `None` means
    /// `num_states * num_actions`.
    pub max_improvements: Option<usize>,
    /// Whether obstacle states are terminal. When false they are swept
    /// and improved like ordinary states.
    pub exclude_obstacles: bool,
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self {
            evaluation_sweeps: DEFAULT_EVALUATION_SWEEPS,
            max_improvements: None,
            exclude_obstacles: true,
        }
    }
}

/// Result of a converged policy iteration run.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyIterationResult {
    /// The stable policy. Deterministic on every non-terminal state.
    pub policy: Policy,
    /// Evaluation of the stable policy, on the 0.1 lattice.
    pub values: ValueFunction,
    /// Improvement steps taken, including the final stable one.
    pub improvements: usize,
}

#[cfg(test)]
mod tests;
