use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::MdpError;
use crate::grid::Action;
use crate::model::GridMdp;
use crate::policy::{Policy, ValueFunction};
use crate::solver::{evaluate, improve, solve, PolicyIterationConfig};

/// Values of the 4x4 corner-goal world under the optimal policy, on the
/// 0.1 lattice: a state `d` moves from the goal is worth
/// `-(1 - 0.9^d) / 0.1` rounded outward by the sweep quantization.
const CORNER_GOAL_VALUES: [f64; 16] = [
    -4.7, -4.1, -3.4, -2.7, //
    -4.1, -3.4, -2.7, -1.9, //
    -3.4, -2.7, -1.9, -1.0, //
    -2.7, -1.9, -1.0, 0.0,
];

fn corner_goal_mdp() -> GridMdp {
    GridMdp::new(4, 4, 15, vec![], 0.9).unwrap()
}

/// The optimal action in the 4x4 corner-goal world with ties broken in
/// enumeration order: right everywhere except the goal column, which
/// heads down.
fn corner_goal_action(state: usize) -> Action {
    if state % 4 == 3 {
        Action::Down
    } else {
        Action::Right
    }
}

#[test]
fn test_corner_goal_scenario() {
    let mdp = corner_goal_mdp();
    let result = solve(&mdp, &Policy::uniform(16), &PolicyIterationConfig::default()).unwrap();

    assert!(result.improvements <= mdp.num_states() * Action::ALL.len());
    for (state, &want) in CORNER_GOAL_VALUES.iter().enumerate() {
        assert_eq!(result.values.get(state), want, "value of state {}", state);
    }
    for state in mdp.non_terminal_states(true) {
        assert_eq!(
            result.policy.action(state),
            Some(corner_goal_action(state)),
            "action of state {}",
            state
        );
    }
}

#[test]
fn test_corner_goal_values_track_distance() {
    let mdp = corner_goal_mdp();
    let result = solve(&mdp, &Policy::uniform(16), &PolicyIterationConfig::default()).unwrap();
    let spec = mdp.spec();
    for a in 0..16 {
        for b in 0..16 {
            if spec.manhattan_distance(a, 15) <= spec.manhattan_distance(b, 15) {
                assert!(
                    result.values.get(a) >= result.values.get(b),
                    "state {} is closer to the goal than {} but worth less",
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn test_random_initial_policies_reach_the_same_fixed_point() {
    let mdp = corner_goal_mdp();
    let config = PolicyIterationConfig::default();
    let baseline = solve(&mdp, &Policy::uniform(16), &config).unwrap();
    for seed in 0..5 {
        let initial = Policy::random(16, &mut ChaCha8Rng::seed_from_u64(seed));
        let result = solve(&mdp, &initial, &config).unwrap();
        // The goal row is never rewritten, so it keeps whatever the
        // initial policy put there; convergence is judged on the
        // non-terminal rows.
        for state in mdp.non_terminal_states(true) {
            assert_eq!(
                result.policy.action(state),
                baseline.policy.action(state),
                "seed {}, state {}",
                seed,
                state
            );
        }
        assert_eq!(
            result.policy.action_probabilities(15),
            initial.action_probabilities(15),
            "seed {}",
            seed
        );
        assert_eq!(result.values, baseline.values, "seed {}", seed);
    }
}

#[test]
fn test_improvement_never_decreases_values() {
    // Strict case: walking into the wall evaluates to -8.0, the improved
    // policy walks into the goal and evaluates to -1.0.
    let mdp = GridMdp::new(1, 2, 1, vec![], 0.9).unwrap();
    let before = Policy::from_actions(&[Action::Left, Action::Left]);
    let mut values = ValueFunction::zeros(2);
    evaluate(&before, &mdp, &[0], &mut values, 15).unwrap();
    assert_eq!(values.get(0), -8.0);
    let (_, after) = improve(&values, &mdp, &[0], &before).unwrap();
    evaluate(&after, &mdp, &[0], &mut values, 15).unwrap();
    assert_eq!(values.get(0), -1.0);

    // Same property on the 4x4 world, one improvement step at a time.
    let mdp = corner_goal_mdp();
    let non_terminal = mdp.non_terminal_states(true);
    let policy = Policy::uniform(16);
    let mut values = ValueFunction::zeros(16);
    evaluate(&policy, &mdp, &non_terminal, &mut values, 15).unwrap();
    let before = values.clone();
    let (_, improved) = improve(&values, &mdp, &non_terminal, &policy).unwrap();
    evaluate(&improved, &mdp, &non_terminal, &mut values, 15).unwrap();
    for &state in &non_terminal {
        assert!(
            values.get(state) >= before.get(state),
            "improvement lowered state {} from {} to {}",
            state,
            before.get(state),
            values.get(state)
        );
    }
}

#[test]
fn test_stable_result_is_idempotent() {
    let mdp = corner_goal_mdp();
    let result = solve(&mdp, &Policy::uniform(16), &PolicyIterationConfig::default()).unwrap();
    let non_terminal = mdp.non_terminal_states(true);
    let (stable, again) = improve(&result.values, &mdp, &non_terminal, &result.policy).unwrap();
    assert!(stable);
    assert_eq!(again, result.policy);
}

#[test]
fn test_iteration_cap_surfaces_as_error() {
    let mdp = corner_goal_mdp();
    let config = PolicyIterationConfig {
        max_improvements: Some(1),
        ..PolicyIterationConfig::default()
    };
    // A uniform start can never be stable after one improvement: the
    // rewritten rows are one-hot.
    assert_eq!(
        solve(&mdp, &Policy::uniform(16), &config),
        Err(MdpError::IterationLimit { limit: 1 })
    );
}

#[test]
fn test_zero_iteration_cap_rejected() {
    let mdp = corner_goal_mdp();
    let config = PolicyIterationConfig {
        max_improvements: Some(0),
        ..PolicyIterationConfig::default()
    };
    assert!(matches!(
        solve(&mdp, &Policy::uniform(16), &config),
        Err(MdpError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_obstacle_next_to_goal_keeps_policy_and_far_values() {
    let config = PolicyIterationConfig::default();
    let plain = solve(&corner_goal_mdp(), &Policy::uniform(16), &config).unwrap();
    let mdp = GridMdp::new(4, 4, 15, vec![11], 0.9).unwrap();
    let blocked = solve(&mdp, &Policy::uniform(16), &config).unwrap();

    // The obstacle sits on the goal column, so the greedy direction of
    // every surviving state is unchanged.
    for state in mdp.non_terminal_states(true) {
        assert_eq!(
            blocked.policy.action(state),
            plain.policy.action(state),
            "action of state {}",
            state
        );
    }
    // States that were already at least as close to the goal as to the
    // obstacle keep their exact values; the rest absorb at the obstacle
    // and can only gain.
    for state in [12, 13, 14, 15] {
        assert_eq!(blocked.values.get(state), plain.values.get(state));
    }
    for state in 0..16 {
        assert!(blocked.values.get(state) >= plain.values.get(state));
    }
    // The obstacle itself is frozen: value zero, policy row untouched.
    assert_eq!(blocked.values.get(11), 0.0);
    assert_eq!(blocked.policy.action(11), None);

    let expected = [
        -4.1, -3.4, -2.7, -1.9, //
        -3.4, -2.7, -1.9, -1.0, //
        -2.7, -1.9, -1.0, 0.0, //
        -2.7, -1.9, -1.0, 0.0,
    ];
    for (state, &want) in expected.iter().enumerate() {
        assert_eq!(blocked.values.get(state), want, "value of state {}", state);
    }
}

#[test]
fn test_obstacle_swept_as_ordinary_state_when_not_excluded() {
    // 1x3 strip, goal on the right, obstacle in the middle. When the
    // obstacle is not treated as terminal, its zero-reward self-loop is
    // preferable to paying for a step into the goal, and the quantized
    // self-loop value bottoms out at -0.5.
    let mdp = GridMdp::new(1, 3, 2, vec![1], 0.9).unwrap();
    let config = PolicyIterationConfig {
        exclude_obstacles: false,
        ..PolicyIterationConfig::default()
    };
    let result = solve(&mdp, &Policy::uniform(3), &config).unwrap();
    assert_eq!(result.values.get(0), -1.5);
    assert_eq!(result.values.get(1), -0.5);
    assert_eq!(result.values.get(2), 0.0);
    assert_eq!(result.policy.action(0), Some(Action::Right));
    assert_eq!(result.policy.action(1), Some(Action::Up));

    let frozen = solve(&mdp, &Policy::uniform(3), &PolicyIterationConfig::default()).unwrap();
    assert_eq!(frozen.values.get(0), -1.0);
    assert_eq!(frozen.values.get(1), 0.0);
    assert_eq!(frozen.policy.action(1), None);
}

#[test]
fn test_single_sweep_budget_still_converges_policy() {
    // One sweep per evaluation phase is a legal configuration. On the
    // 1x2 world the run is exactly traceable: the first sweep leaves
    // state 0 at -1.0, the first improvement turns the row one-hot on
    // right, and the second improvement confirms it.
    let mdp = GridMdp::new(1, 2, 1, vec![], 0.9).unwrap();
    let config = PolicyIterationConfig {
        evaluation_sweeps: 1,
        ..PolicyIterationConfig::default()
    };
    let result = solve(&mdp, &Policy::uniform(2), &config).unwrap();
    assert_eq!(result.improvements, 2);
    assert_eq!(result.policy.action(0), Some(Action::Right));
    assert_eq!(result.values.get(0), -1.0);
    assert_eq!(result.values.get(1), 0.0);
}
