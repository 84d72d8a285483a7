//! Policy iteration for grid-world Markov decision processes: model
//! builders, iterative policy evaluation with in-place sweeps, and greedy
//! improvement with deterministic tie-breaking.

pub mod error;
pub mod grid;
pub mod model;
pub mod policy;
pub mod solver;

pub use error::{MdpError, Result};
pub use grid::{Action, GridSpec};
pub use model::{GridMdp, RewardConfig, RewardModel, TransitionModel};
pub use policy::{Policy, ValueFunction};
pub use solver::{solve, PolicyIterationConfig, PolicyIterationResult};
