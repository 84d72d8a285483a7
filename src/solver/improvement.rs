//! Greedy policy improvement.
//!
//! For each non-terminal state the improver computes the action values
//! under the current value function, then rewrites the policy row to be
//! one-hot on the best action. Ties go to the action listed first in
//! [`Action::ALL`], so the result never depends on map iteration order.

use crate::error::Result;
use crate::grid::Action;
use crate::model::GridMdp;
use crate::policy::{Policy, ValueFunction};
use crate::solver::evaluation::check_inputs;

/// The action value `Q(s, a)` of taking `action` in `state` and following
/// `values` afterwards:
///
/// ```text
/// Q(s, a) = sum_s' P_a(s, s') * (R(s, a, s') + discount * V(s'))
/// ```
///
/// # Errors
/// Returns [`crate::error::MdpError::MalformedModel`] if a reachable
/// successor has no reward entry.
pub fn action_value(
    mdp: &GridMdp,
    values: &ValueFunction,
    state: usize,
    action: Action,
) -> Result<f64> {
    let mut q = 0.0;
    for (to, &p) in mdp.transitions().row(action, state).iter().enumerate() {
        if p == 0.0 {
            continue;
        }
        let reward = mdp.rewards().reward(state, action, to)?;
        q += p * (reward + mdp.discount() * values.get(to));
    }
    Ok(q)
}

/// One greedy improvement step over `non_terminal`.
///
/// Returns `(stable, new_policy)`. The new policy is a fresh object:
/// rows for states outside `non_terminal` are copied from `current`
/// unchanged, rows inside are one-hot on the argmax action, with ties
/// broken by [`Action::ALL`] order. `stable` is true only if every
/// rewritten row equals the corresponding row of `current` as a full
/// action distribution, so a stochastic `current` can never be stable.
///
/// Neither `values` nor `current` is mutated.
///
/// # Errors
/// Same entry contract as [`crate::solver::evaluate`].
pub fn improve(
    values: &ValueFunction,
    mdp: &GridMdp,
    non_terminal: &[usize],
    current: &Policy,
) -> Result<(bool, Policy)> {
    check_inputs(mdp, non_terminal, current, values)?;
    let mut new_policy = current.clone();
    let mut stable = true;
    for &state in non_terminal {
        let mut best_action = Action::ALL[0];
        let mut best_q = f64::NEG_INFINITY;
        for action in Action::ALL {
            let q = action_value(mdp, values, state, action)?;
            if q > best_q {
                best_q = q;
                best_action = action;
            }
        }
        new_policy.set_action(state, best_action);
        if new_policy.action_probabilities(state) != current.action_probabilities(state) {
            stable = false;
        }
    }
    Ok((stable, new_policy))
}
