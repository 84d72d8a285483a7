//! The policy iteration driver.
//!
//! Alternates evaluation and improvement until improvement reports a
//! stable policy. Termination is guaranteed for a valid model because the
//! policy space is finite and improvement never decreases value, but a
//! hard cap on improvement steps turns a broken invariant into a typed
//! error instead of a hang.

use crate::error::{MdpError, Result};
use crate::grid::Action;
use crate::model::GridMdp;
use crate::policy::{Policy, ValueFunction};
use crate::solver::{evaluation, improvement, PolicyIterationConfig, PolicyIterationResult};

/// Runs policy iteration on `mdp` starting from `initial_policy`.
///
/// The value function starts at zero and is carried across iterations, so
/// each evaluation phase refines the values left by the previous one. The
/// returned values are the evaluation of the stable policy.
///
/// The improvement cap defaults to `num_states * num_actions` when
/// `config.max_improvements` is `None`.
///
/// # Errors
/// - [`MdpError::InvalidConfiguration`] / [`MdpError::MalformedModel`]
///   under the entry contracts of [`crate::solver::evaluate`] and
///   [`crate::solver::improve`], or if the improvement cap is zero.
/// - [`MdpError::IterationLimit`] if the policy is still changing when
///   the cap is reached.
///
/// # Examples
///
/// ```
/// use gridmdp::model::GridMdp;
/// use gridmdp::policy::Policy;
/// use gridmdp::solver::{solve, PolicyIterationConfig};
///
/// let mdp = GridMdp::new(4, 4, 15, vec![], 0.9).unwrap();
/// let initial = Policy::uniform(16);
/// let result = solve(&mdp, &initial, &PolicyIterationConfig::default()).unwrap();
/// assert!(result.improvements <= 16 * 4);
/// assert_eq!(result.values.get(15), 0.0);
/// ```
pub fn solve(
    mdp: &GridMdp,
    initial_policy: &Policy,
    config: &PolicyIterationConfig,
) -> Result<PolicyIterationResult> {
    let limit = config
        .max_improvements
        .unwrap_or(mdp.num_states() * Action::ALL.len());
    if limit == 0 {
        return Err(MdpError::invalid_configuration(
            "improvement cap must be positive",
        ));
    }
    let non_terminal = mdp.non_terminal_states(config.exclude_obstacles);
    let mut policy = initial_policy.clone();
    let mut values = ValueFunction::zeros(mdp.num_states());
    let mut improvements = 0;
    loop {
        evaluation::evaluate(
            &policy,
            mdp,
            &non_terminal,
            &mut values,
            config.evaluation_sweeps,
        )?;
        let (stable, new_policy) = improvement::improve(&values, mdp, &non_terminal, &policy)?;
        improvements += 1;
        policy = new_policy;
        if stable {
            log::debug!("policy stable after {} improvement steps", improvements);
            return Ok(PolicyIterationResult {
                policy,
                values,
                improvements,
            });
        }
        if improvements >= limit {
            return Err(MdpError::iteration_limit(limit));
        }
        log::debug!("improvement step {} changed the policy", improvements);
    }
}
