//! Grid geometry: the rectangular state space and the four movement actions.
//!
//! States are flattened row-major: the cell at `(row, col)` is state
//! `row * cols + col`. All tables in this crate are indexed by that state id.

use crate::error::{MdpError, Result};

/// The four movement actions of the grid world.
///
/// The order of [`Action::ALL`] is part of the solver contract: greedy
/// improvement breaks Q-value ties in favor of the action listed first,
/// and policy rows store probabilities in the same order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Right,
    Left,
    Up,
    Down,
}

impl Action {
    /// Every action, in the fixed enumeration (and tie-break) order.
    pub const ALL: [Action; 4] = [Action::Right, Action::Left, Action::Up, Action::Down];

    /// Position of this action inside [`Action::ALL`].
    pub fn index(self) -> usize {
        match self {
            Action::Right => 0,
            Action::Left => 1,
            Action::Up => 2,
            Action::Down => 3,
        }
    }

    /// Row/column displacement of one move in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Right => (0, 1),
            Action::Left => (0, -1),
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
        }
    }

    /// Lowercase name, used in log lines and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Action::Right => "right",
            Action::Left => "left",
            Action::Up => "up",
            Action::Down => "down",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Dimensions of a rectangular grid world.
///
/// # Examples
///
/// ```
/// use gridmdp::grid::{Action, GridSpec};
///
/// let spec = GridSpec::new(4, 4).unwrap();
/// assert_eq!(spec.num_states(), 16);
/// assert_eq!(spec.state_at(1, 2), 6);
/// assert_eq!(spec.cell_of(6), (1, 2));
/// // Moving off the right edge leaves the state unchanged.
/// assert_eq!(spec.step(3, Action::Right), 3);
/// assert_eq!(spec.step(2, Action::Right), 3);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridSpec {
    rows: usize,
    cols: usize,
}

impl GridSpec {
    /// Creates a grid specification.
    ///
    /// # Errors
    /// Returns [`MdpError::InvalidConfiguration`] if either dimension is
    /// zero or the state count `rows * cols` overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MdpError::invalid_configuration(format!(
                "grid dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        if rows.checked_mul(cols).is_none() {
            return Err(MdpError::invalid_configuration(format!(
                "grid {}x{} state count overflows usize",
                rows, cols
            )));
        }
        Ok(GridSpec { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of states (`rows * cols`).
    pub fn num_states(&self) -> usize {
        self.rows * self.cols
    }

    /// State id of the cell at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the cell lies outside the grid.
    pub fn state_at(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) outside {}x{} grid",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// `(row, col)` cell of a state id.
    ///
    /// # Panics
    /// Panics if `state` is out of range.
    pub fn cell_of(&self, state: usize) -> (usize, usize) {
        assert!(
            state < self.num_states(),
            "state {} outside {}x{} grid",
            state,
            self.rows,
            self.cols
        );
        (state / self.cols, state % self.cols)
    }

    /// Whether `state` is a valid state id for this grid.
    pub fn contains(&self, state: usize) -> bool {
        state < self.num_states()
    }

    /// Deterministic successor of `state` under `action`: one cell in the
    /// action's direction, or `state` itself if that would leave the grid.
    ///
    /// # Panics
    /// Panics if `state` is out of range.
    pub fn step(&self, state: usize, action: Action) -> usize {
        let (row, col) = self.cell_of(state);
        let (dr, dc) = action.delta();
        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        let off_grid = new_row < 0
            || new_row >= self.rows as isize
            || new_col < 0
            || new_col >= self.cols as isize;
        if off_grid {
            state
        } else {
            self.state_at(new_row as usize, new_col as usize)
        }
    }

    /// Moves (shortest path length) between two states, ignoring obstacles.
    pub fn manhattan_distance(&self, a: usize, b: usize) -> usize {
        let (ar, ac) = self.cell_of(a);
        let (br, bc) = self.cell_of(b);
        ar.abs_diff(br) + ac.abs_diff(bc)
    }
}
