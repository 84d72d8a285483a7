//! Iterative policy evaluation with in-place sweeps.
//!
//! Values are updated in place while sweeping the non-terminal states in
//! ascending order, so later states in a sweep see the values written
//! earlier in the same sweep. This is the Gauss-Seidel update order; a
//! double-buffered (Jacobi) sweep is numerically different before full
//! convergence and is not offered.

use crate::error::{MdpError, Result};
use crate::grid::Action;
use crate::model::GridMdp;
use crate::policy::{Policy, ValueFunction};

/// Rounds a value to one decimal place.
///
/// Every value the evaluator stores passes through this quantization, so
/// the stored value function always lives on a 0.1 lattice.
pub(crate) fn quantize(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Checks the shared entry contract of [`evaluate`] and
/// [`crate::solver::improve`].
pub(crate) fn check_inputs(
    mdp: &GridMdp,
    non_terminal: &[usize],
    policy: &Policy,
    values: &ValueFunction,
) -> Result<()> {
    mdp.validate()?;
    let n = mdp.num_states();
    if policy.num_states() != n {
        return Err(MdpError::malformed_model(format!(
            "policy covers {} states but the model has {}",
            policy.num_states(),
            n
        )));
    }
    if values.num_states() != n {
        return Err(MdpError::malformed_model(format!(
            "value function covers {} states but the model has {}",
            values.num_states(),
            n
        )));
    }
    for &state in non_terminal {
        if !mdp.spec().contains(state) {
            return Err(MdpError::malformed_model(format!(
                "non-terminal state {} outside the model's {} states",
                state, n
            )));
        }
    }
    policy.validate_rows(non_terminal)
}

/// Runs `sweeps` in-place evaluation sweeps of `policy` over
/// `non_terminal`, mutating `values`.
///
/// Each sweep recomputes, for every state `s` in `non_terminal` in the
/// order given,
///
/// ```text
/// V(s) = sum_a policy(s, a) * sum_s' P_a(s, s') * (R(s, a, s') + discount * V(s'))
/// ```
///
/// and stores the result rounded to one decimal place. States outside
/// `non_terminal` are never written, which is how terminal states stay
/// pinned at their initial values.
///
/// The sweep count is a hard budget. No convergence tolerance is checked;
/// callers that need a tighter approximation pass more sweeps.
///
/// # Errors
/// Returns [`MdpError::MalformedModel`] if the model fails validation, if
/// the policy or value function does not cover the model's states, if any
/// entry of `non_terminal` is out of range, or if a policy row over
/// `non_terminal` is not a probability distribution.
///
/// # Examples
///
/// ```
/// use gridmdp::grid::Action;
/// use gridmdp::model::GridMdp;
/// use gridmdp::policy::{Policy, ValueFunction};
/// use gridmdp::solver::evaluate;
///
/// // Two cells, goal on the right, policy walks into the goal.
/// let mdp = GridMdp::new(1, 2, 1, vec![], 0.9).unwrap();
/// let policy = Policy::from_actions(&[Action::Right, Action::Right]);
/// let mut values = ValueFunction::zeros(2);
/// evaluate(&policy, &mdp, &[0], &mut values, 15).unwrap();
/// assert_eq!(values.get(0), -1.0);
/// assert_eq!(values.get(1), 0.0);
/// ```
pub fn evaluate(
    policy: &Policy,
    mdp: &GridMdp,
    non_terminal: &[usize],
    values: &mut ValueFunction,
    sweeps: usize,
) -> Result<()> {
    check_inputs(mdp, non_terminal, policy, values)?;
    let discount = mdp.discount();
    for sweep in 0..sweeps {
        for &state in non_terminal {
            let mut new_value = 0.0;
            for action in Action::ALL {
                let action_prob = policy.prob(state, action);
                if action_prob == 0.0 {
                    continue;
                }
                let mut expected = 0.0;
                for (to, &p) in mdp.transitions().row(action, state).iter().enumerate() {
                    if p == 0.0 {
                        continue;
                    }
                    let reward = mdp.rewards().reward(state, action, to)?;
                    expected += p * (reward + discount * values.get(to));
                }
                new_value += action_prob * expected;
            }
            values.set(state, quantize(new_value));
        }
        log::trace!(
            "evaluation sweep {}/{}: values {:?}",
            sweep + 1,
            sweeps,
            values.as_slice()
        );
    }
    Ok(())
}
