//! Per-action transition matrices.
//!
//! The model stores one `num_states x num_states` stochastic matrix per
//! action. Row `s` of the matrix for action `a` is the distribution over
//! successor states when `a` is taken in `s`.

use ndarray::{Array2, ArrayView1};

use crate::error::{MdpError, Result};
use crate::grid::{Action, GridSpec};

/// Tolerance when checking that a transition row sums to one.
pub(crate) const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Transition probabilities for every action of a finite MDP.
///
/// # Examples
///
/// ```
/// use gridmdp::grid::{Action, GridSpec};
/// use gridmdp::model::TransitionModel;
///
/// let spec = GridSpec::new(2, 2).unwrap();
/// let transitions = TransitionModel::deterministic_grid(&spec);
/// // State 0 is the top-left corner: moving left bounces off the wall.
/// assert_eq!(transitions.probability(Action::Left, 0, 0), 1.0);
/// assert_eq!(transitions.probability(Action::Right, 0, 1), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionModel {
    /// One matrix per action, indexed by [`Action::index`].
    matrices: Vec<Array2<f64>>,
}

impl TransitionModel {
    /// Builds the deterministic movement model for a rectangular grid.
    ///
    /// Each row is one-hot: taking `a` in `s` reaches `spec.step(s, a)`
    /// with probability one. Moves that would leave the grid keep the
    /// state in place, so boundary rows put their mass on the diagonal.
    pub fn deterministic_grid(spec: &GridSpec) -> Self {
        let n = spec.num_states();
        let mut matrices = Vec::with_capacity(Action::ALL.len());
        for action in Action::ALL {
            let mut matrix = Array2::<f64>::zeros((n, n));
            for state in 0..n {
                matrix[[state, spec.step(state, action)]] = 1.0;
            }
            matrices.push(matrix);
        }
        TransitionModel { matrices }
    }

    /// Wraps caller-supplied matrices, one per action in [`Action::ALL`]
    /// order.
    ///
    /// # Errors
    /// Returns [`MdpError::MalformedModel`] if the matrix count is not
    /// four, any matrix is not square, the matrices disagree on size, or
    /// any row is not a probability distribution.
    pub fn from_matrices(matrices: Vec<Array2<f64>>) -> Result<Self> {
        let model = TransitionModel { matrices };
        model.validate()?;
        Ok(model)
    }

    /// Number of states the model covers.
    pub fn num_states(&self) -> usize {
        self.matrices.first().map_or(0, |m| m.nrows())
    }

    /// The full matrix for one action.
    pub fn matrix(&self, action: Action) -> &Array2<f64> {
        &self.matrices[action.index()]
    }

    /// Successor distribution for taking `action` in `from`.
    pub fn row(&self, action: Action, from: usize) -> ArrayView1<'_, f64> {
        self.matrices[action.index()].row(from)
    }

    /// Probability of landing in `to` when taking `action` in `from`.
    pub fn probability(&self, action: Action, from: usize, to: usize) -> f64 {
        self.matrices[action.index()][[from, to]]
    }

    /// Checks the structural invariants of the model.
    ///
    /// # Errors
    /// Returns [`MdpError::MalformedModel`] naming the first offending
    /// action and row.
    pub fn validate(&self) -> Result<()> {
        if self.matrices.len() != Action::ALL.len() {
            return Err(MdpError::malformed_model(format!(
                "expected {} transition matrices, got {}",
                Action::ALL.len(),
                self.matrices.len()
            )));
        }
        let n = self.num_states();
        if n == 0 {
            return Err(MdpError::malformed_model(
                "transition matrices cover no states",
            ));
        }
        for action in Action::ALL {
            let matrix = &self.matrices[action.index()];
            if matrix.nrows() != n || matrix.ncols() != n {
                return Err(MdpError::malformed_model(format!(
                    "transition matrix for '{}' is {}x{}, expected {}x{}",
                    action,
                    matrix.nrows(),
                    matrix.ncols(),
                    n,
                    n
                )));
            }
            for (state, row) in matrix.rows().into_iter().enumerate() {
                let mut sum = 0.0;
                for &p in row {
                    if !(0.0..=1.0).contains(&p) {
                        return Err(MdpError::malformed_model(format!(
                            "transition probability {} out of range in row {} of '{}'",
                            p, state, action
                        )));
                    }
                    sum += p;
                }
                if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                    return Err(MdpError::malformed_model(format!(
                        "transition row {} of '{}' sums to {}, expected 1",
                        state, action, sum
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rows_are_one_hot_distributions() {
        let spec = GridSpec::new(3, 3).unwrap();
        let transitions = TransitionModel::deterministic_grid(&spec);
        assert!(transitions.validate().is_ok());
        for action in Action::ALL {
            for state in 0..spec.num_states() {
                let row = transitions.row(action, state);
                assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
                assert_eq!(row.iter().filter(|&&p| p == 1.0).count(), 1);
            }
        }
    }

    #[test]
    fn test_interior_and_boundary_targets() {
        let spec = GridSpec::new(3, 3).unwrap();
        let transitions = TransitionModel::deterministic_grid(&spec);
        let center = spec.state_at(1, 1);
        assert_eq!(transitions.probability(Action::Right, center, spec.state_at(1, 2)), 1.0);
        assert_eq!(transitions.probability(Action::Up, center, spec.state_at(0, 1)), 1.0);
        // Top-right corner: up and right are self-transitions.
        let corner = spec.state_at(0, 2);
        assert_eq!(transitions.probability(Action::Up, corner, corner), 1.0);
        assert_eq!(transitions.probability(Action::Right, corner, corner), 1.0);
        assert_eq!(transitions.probability(Action::Down, corner, spec.state_at(1, 2)), 1.0);
    }

    #[test]
    fn test_from_matrices_rejects_bad_row_mass() {
        let spec = GridSpec::new(2, 2).unwrap();
        let good = TransitionModel::deterministic_grid(&spec);
        let mut matrices: Vec<Array2<f64>> =
            Action::ALL.iter().map(|&a| good.matrix(a).clone()).collect();
        matrices[0][[1, 0]] = 0.5;
        assert!(matches!(
            TransitionModel::from_matrices(matrices),
            Err(MdpError::MalformedModel(_))
        ));
    }

    #[test]
    fn test_from_matrices_rejects_shape_mismatch() {
        let matrices = vec![
            Array2::<f64>::eye(4),
            Array2::<f64>::eye(4),
            Array2::<f64>::eye(4),
            Array2::<f64>::eye(3),
        ];
        assert!(matches!(
            TransitionModel::from_matrices(matrices),
            Err(MdpError::MalformedModel(_))
        ));
    }

    #[test]
    fn test_from_matrices_rejects_wrong_count() {
        let matrices = vec![Array2::<f64>::eye(4); 3];
        assert!(matches!(
            TransitionModel::from_matrices(matrices),
            Err(MdpError::MalformedModel(_))
        ));
    }

    #[test]
    fn test_from_matrices_rejects_negative_probability() {
        let spec = GridSpec::new(2, 2).unwrap();
        let good = TransitionModel::deterministic_grid(&spec);
        let mut matrices: Vec<Array2<f64>> =
            Action::ALL.iter().map(|&a| good.matrix(a).clone()).collect();
        // Keep the row summing to one so only the range check can fire.
        matrices[2][[0, 0]] = -0.5;
        matrices[2][[0, 1]] = 1.5;
        assert!(matches!(
            TransitionModel::from_matrices(matrices),
            Err(MdpError::MalformedModel(_))
        ));
    }
}
