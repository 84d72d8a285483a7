//! Policies and value functions over the flattened state space.
//!
//! A policy row is the action distribution for one state, stored in
//! [`Action::ALL`] order. Deterministic policies are the special case of
//! one-hot rows; the improvement step always produces that shape.

use rand::Rng;

use crate::error::{MdpError, Result};
use crate::grid::Action;

/// A stochastic policy: one action distribution per state.
///
/// # Examples
///
/// ```
/// use gridmdp::grid::Action;
/// use gridmdp::policy::Policy;
///
/// let mut policy = Policy::uniform(4);
/// assert_eq!(policy.prob(0, Action::Left), 0.25);
///
/// policy.set_action(0, Action::Down);
/// assert_eq!(policy.action(0), Some(Action::Down));
/// assert_eq!(policy.prob(0, Action::Left), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Policy {
    /// `probs[s][a.index()]` is the probability of taking `a` in `s`.
    probs: Vec<[f64; 4]>,
}

impl Policy {
    /// The uniform-random policy: every action equally likely everywhere.
    pub fn uniform(num_states: usize) -> Self {
        let p = 1.0 / Action::ALL.len() as f64;
        Policy {
            probs: vec![[p; 4]; num_states],
        }
    }

    /// A deterministic policy with one uniformly drawn action per state.
    pub fn random<R: Rng + ?Sized>(num_states: usize, rng: &mut R) -> Self {
        let mut policy = Policy {
            probs: vec![[0.0; 4]; num_states],
        };
        for state in 0..num_states {
            let action = Action::ALL[rng.gen_range(0..Action::ALL.len())];
            policy.set_action(state, action);
        }
        policy
    }

    /// A deterministic policy from one action per state.
    pub fn from_actions(actions: &[Action]) -> Self {
        let mut policy = Policy {
            probs: vec![[0.0; 4]; actions.len()],
        };
        for (state, &action) in actions.iter().enumerate() {
            policy.set_action(state, action);
        }
        policy
    }

    /// Number of states the policy covers.
    pub fn num_states(&self) -> usize {
        self.probs.len()
    }

    /// Probability of taking `action` in `state`.
    pub fn prob(&self, state: usize, action: Action) -> f64 {
        self.probs[state][action.index()]
    }

    /// The full action distribution for `state`, in [`Action::ALL`] order.
    pub fn action_probabilities(&self, state: usize) -> &[f64; 4] {
        &self.probs[state]
    }

    /// The action a one-hot row selects, or `None` if the row is
    /// stochastic.
    pub fn action(&self, state: usize) -> Option<Action> {
        let row = &self.probs[state];
        let mut chosen = None;
        for action in Action::ALL {
            let p = row[action.index()];
            if p == 1.0 {
                if chosen.is_some() {
                    return None;
                }
                chosen = Some(action);
            } else if p != 0.0 {
                return None;
            }
        }
        chosen
    }

    /// Makes the row for `state` one-hot on `action`.
    pub fn set_action(&mut self, state: usize, action: Action) {
        let mut row = [0.0; 4];
        row[action.index()] = 1.0;
        self.probs[state] = row;
    }

    /// Replaces the full distribution for `state`.
    pub fn set_action_probabilities(&mut self, state: usize, probs: [f64; 4]) {
        self.probs[state] = probs;
    }

    /// Checks that the rows for `states` are probability distributions.
    ///
    /// # Errors
    /// Returns [`MdpError::MalformedModel`] naming the first row that has
    /// an out-of-range entry or does not sum to one.
    pub fn validate_rows(&self, states: &[usize]) -> Result<()> {
        for &state in states {
            if state >= self.probs.len() {
                return Err(MdpError::malformed_model(format!(
                    "policy covers {} states but state {} was requested",
                    self.probs.len(),
                    state
                )));
            }
            let row = &self.probs[state];
            let mut sum = 0.0;
            for &p in row {
                if !(0.0..=1.0).contains(&p) {
                    return Err(MdpError::malformed_model(format!(
                        "policy probability {} out of range for state {}",
                        p, state
                    )));
                }
                sum += p;
            }
            if (sum - 1.0).abs() > 1e-9 {
                return Err(MdpError::malformed_model(format!(
                    "policy row for state {} sums to {}, expected 1",
                    state, sum
                )));
            }
        }
        Ok(())
    }
}

/// Expected discounted return per state.
///
/// Starts at zero everywhere; the evaluator rewrites non-terminal entries
/// in place and leaves terminal entries untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueFunction {
    values: Vec<f64>,
}

impl ValueFunction {
    /// An all-zero value function over `num_states` states.
    pub fn zeros(num_states: usize) -> Self {
        ValueFunction {
            values: vec![0.0; num_states],
        }
    }

    pub fn num_states(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, state: usize) -> f64 {
        self.values[state]
    }

    pub fn set(&mut self, state: usize, value: f64) {
        self.values[state] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
