//! Reward tables keyed by `(state, action, successor)` triples.
//!
//! The grid builder fills the table densely: every triple gets the step
//! reward, then the self-transitions of terminal cells are overwritten so
//! that absorbing in place costs nothing.

use std::collections::HashMap;

use crate::error::{MdpError, Result};
use crate::grid::{Action, GridSpec};

/// Reward constants used by the grid builder.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RewardConfig {
    /// Reward for every ordinary transition; negative values price each
    /// move.
    pub step_reward: f64,
    /// Reward for the goal's self-transitions.
    pub goal_reward: f64,
    /// Reward for an obstacle's self-transitions.
    pub obstacle_reward: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig {
            step_reward: -1.0,
            goal_reward: 0.0,
            obstacle_reward: 0.0,
        }
    }
}

/// Immediate rewards for every `(state, action, successor)` triple.
///
/// # Examples
///
/// ```
/// use gridmdp::grid::{Action, GridSpec};
/// use gridmdp::model::{RewardConfig, RewardModel};
///
/// let spec = GridSpec::new(2, 2).unwrap();
/// let rewards = RewardModel::grid_rewards(&spec, 3, &[], &RewardConfig::default());
/// assert_eq!(rewards.reward(0, Action::Right, 1).unwrap(), -1.0);
/// // Absorbing at the goal is free.
/// assert_eq!(rewards.reward(3, Action::Down, 3).unwrap(), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RewardModel {
    rewards: HashMap<(usize, Action, usize), f64>,
    num_states: usize,
}

impl RewardModel {
    /// Builds the dense reward table for a rectangular grid.
    ///
    /// Every triple starts at `config.step_reward`. The self-transitions
    /// of the goal get `config.goal_reward` and those of each obstacle get
    /// `config.obstacle_reward`, for every action. Only self-transitions
    /// are overwritten, so stepping into a terminal cell still pays the
    /// step reward.
    pub fn grid_rewards(
        spec: &GridSpec,
        goal: usize,
        obstacles: &[usize],
        config: &RewardConfig,
    ) -> Self {
        let n = spec.num_states();
        let mut rewards = HashMap::with_capacity(n * Action::ALL.len() * n);
        for from in 0..n {
            for action in Action::ALL {
                for to in 0..n {
                    rewards.insert((from, action, to), config.step_reward);
                }
            }
        }
        for action in Action::ALL {
            rewards.insert((goal, action, goal), config.goal_reward);
            for &obstacle in obstacles {
                rewards.insert((obstacle, action, obstacle), config.obstacle_reward);
            }
        }
        RewardModel {
            rewards,
            num_states: n,
        }
    }

    /// Wraps a caller-supplied table covering `num_states` states.
    ///
    /// # Errors
    /// Returns [`MdpError::MalformedModel`] if any key references a state
    /// outside `0..num_states`.
    pub fn from_table(
        rewards: HashMap<(usize, Action, usize), f64>,
        num_states: usize,
    ) -> Result<Self> {
        let model = RewardModel {
            rewards,
            num_states,
        };
        model.validate()?;
        Ok(model)
    }

    /// Number of states the table covers.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Number of `(state, action, successor)` entries.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Reward for the triple, if the table has an entry for it.
    pub fn get(&self, from: usize, action: Action, to: usize) -> Option<f64> {
        self.rewards.get(&(from, action, to)).copied()
    }

    /// Reward for the triple.
    ///
    /// # Errors
    /// Returns [`MdpError::MalformedModel`] when the entry is missing, so
    /// a hole in the table surfaces as an error instead of a silent zero.
    pub fn reward(&self, from: usize, action: Action, to: usize) -> Result<f64> {
        self.get(from, action, to).ok_or_else(|| {
            MdpError::malformed_model(format!(
                "no reward entry for state {} action '{}' successor {}",
                from, action, to
            ))
        })
    }

    /// Checks that every key references states inside the model.
    ///
    /// # Errors
    /// Returns [`MdpError::MalformedModel`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        if self.num_states == 0 {
            return Err(MdpError::malformed_model("reward table covers no states"));
        }
        for &(from, action, to) in self.rewards.keys() {
            if from >= self.num_states || to >= self.num_states {
                return Err(MdpError::malformed_model(format!(
                    "reward entry ({}, '{}', {}) references a state outside 0..{}",
                    from, action, to, self.num_states
                )));
            }
        }
        Ok(())
    }
}
