//! Markov decision process models for rectangular grid worlds.
//!
//! [`GridMdp`] bundles the grid geometry with the transition and reward
//! tables and the discount factor. The solver in [`crate::solver`] only
//! reads the model; building and validating it happens here.

pub mod rewards;
pub mod transitions;

pub use rewards::{RewardConfig, RewardModel};
pub use transitions::TransitionModel;

use crate::error::{MdpError, Result};
use crate::grid::{Action, GridSpec};

/// A grid-world MDP: geometry, dynamics, rewards, and discount factor.
///
/// The goal cell and any obstacle cells are terminal. Their outgoing
/// dynamics still exist in the transition model, but the solver freezes
/// their values at zero and never rewrites their policy rows.
///
/// # Examples
///
/// ```
/// use gridmdp::model::GridMdp;
///
/// let mdp = GridMdp::new(4, 4, 15, vec![], 0.9).unwrap();
/// assert_eq!(mdp.num_states(), 16);
/// assert_eq!(mdp.non_terminal_states(true), (0..15).collect::<Vec<_>>());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridMdp {
    spec: GridSpec,
    transitions: TransitionModel,
    rewards: RewardModel,
    discount: f64,
    goal: usize,
    obstacles: Vec<usize>,
}

impl GridMdp {
    /// Builds the standard grid world: deterministic clamped movement,
    /// default rewards, one goal cell, optional obstacle cells.
    ///
    /// # Errors
    /// Returns [`MdpError::InvalidConfiguration`] for a zero-sized grid,
    /// an out-of-range goal or obstacle, a goal that is also an obstacle,
    /// or a discount factor outside `[0, 1)`.
    pub fn new(
        rows: usize,
        cols: usize,
        goal: usize,
        obstacles: Vec<usize>,
        discount: f64,
    ) -> Result<Self> {
        Self::with_reward_config(rows, cols, goal, obstacles, discount, &RewardConfig::default())
    }

    /// Like [`GridMdp::new`] but with caller-chosen reward constants.
    ///
    /// # Errors
    /// Same conditions as [`GridMdp::new`].
    pub fn with_reward_config(
        rows: usize,
        cols: usize,
        goal: usize,
        obstacles: Vec<usize>,
        discount: f64,
        reward_config: &RewardConfig,
    ) -> Result<Self> {
        let spec = GridSpec::new(rows, cols)?;
        let obstacles = normalize_terminals(&spec, goal, obstacles)?;
        check_discount(discount)?;
        let transitions = TransitionModel::deterministic_grid(&spec);
        let rewards = RewardModel::grid_rewards(&spec, goal, &obstacles, reward_config);
        Ok(GridMdp {
            spec,
            transitions,
            rewards,
            discount,
            goal,
            obstacles,
        })
    }

    /// Assembles an MDP from caller-supplied tables.
    ///
    /// # Errors
    /// Returns [`MdpError::InvalidConfiguration`] for bad terminals or
    /// discount, and [`MdpError::MalformedModel`] if the tables fail
    /// [`GridMdp::validate`].
    pub fn from_parts(
        spec: GridSpec,
        transitions: TransitionModel,
        rewards: RewardModel,
        goal: usize,
        obstacles: Vec<usize>,
        discount: f64,
    ) -> Result<Self> {
        let obstacles = normalize_terminals(&spec, goal, obstacles)?;
        check_discount(discount)?;
        let mdp = GridMdp {
            spec,
            transitions,
            rewards,
            discount,
            goal,
            obstacles,
        };
        mdp.validate()?;
        Ok(mdp)
    }

    /// Cross-checks the tables against the grid.
    ///
    /// Verifies that both tables cover exactly the grid's states, that
    /// every transition row is a distribution, and that every transition
    /// with nonzero probability has a reward entry.
    ///
    /// # Errors
    /// Returns [`MdpError::MalformedModel`] describing the first problem
    /// found.
    pub fn validate(&self) -> Result<()> {
        let n = self.spec.num_states();
        if self.transitions.num_states() != n {
            return Err(MdpError::malformed_model(format!(
                "transition model covers {} states but the grid has {}",
                self.transitions.num_states(),
                n
            )));
        }
        if self.rewards.num_states() != n {
            return Err(MdpError::malformed_model(format!(
                "reward table covers {} states but the grid has {}",
                self.rewards.num_states(),
                n
            )));
        }
        self.transitions.validate()?;
        self.rewards.validate()?;
        for action in Action::ALL {
            for from in 0..n {
                for (to, &p) in self.transitions.row(action, from).iter().enumerate() {
                    if p > 0.0 && self.rewards.get(from, action, to).is_none() {
                        return Err(MdpError::malformed_model(format!(
                            "reachable transition ({}, '{}', {}) has no reward entry",
                            from, action, to
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// All states except the terminals, in ascending order.
    ///
    /// The goal is always excluded. Obstacles are excluded when
    /// `exclude_obstacles` is set, which is how the solver treats them.
    pub fn non_terminal_states(&self, exclude_obstacles: bool) -> Vec<usize> {
        (0..self.spec.num_states())
            .filter(|&s| s != self.goal && !(exclude_obstacles && self.obstacles.contains(&s)))
            .collect()
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn transitions(&self) -> &TransitionModel {
        &self.transitions
    }

    pub fn rewards(&self) -> &RewardModel {
        &self.rewards
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn goal(&self) -> usize {
        self.goal
    }

    /// Obstacle states, sorted and deduplicated.
    pub fn obstacles(&self) -> &[usize] {
        &self.obstacles
    }

    pub fn num_states(&self) -> usize {
        self.spec.num_states()
    }
}

/// Range-checks the terminals and returns the obstacles sorted with
/// duplicates removed.
fn normalize_terminals(
    spec: &GridSpec,
    goal: usize,
    mut obstacles: Vec<usize>,
) -> Result<Vec<usize>> {
    if !spec.contains(goal) {
        return Err(MdpError::invalid_configuration(format!(
            "goal state {} outside {}x{} grid",
            goal,
            spec.rows(),
            spec.cols()
        )));
    }
    for &obstacle in &obstacles {
        if !spec.contains(obstacle) {
            return Err(MdpError::invalid_configuration(format!(
                "obstacle state {} outside {}x{} grid",
                obstacle,
                spec.rows(),
                spec.cols()
            )));
        }
        if obstacle == goal {
            return Err(MdpError::invalid_configuration(format!(
                "state {} cannot be both goal and obstacle",
                obstacle
            )));
        }
    }
    obstacles.sort_unstable();
    obstacles.dedup();
    Ok(obstacles)
}

fn check_discount(discount: f64) -> Result<()> {
    if !(0.0..1.0).contains(&discount) {
        return Err(MdpError::invalid_configuration(format!(
            "discount factor must be in [0, 1), got {}",
            discount
        )));
    }
    Ok(())
}
