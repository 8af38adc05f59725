//! Board metrics shared by all features.
//!
//! [`BoardAnalysis`] walks the settled cells once and records every measurement the
//! feature list needs, so scoring a board with any number of features costs a single
//! `O(width × height)` pass. The board itself is never modified.

use blockfall_engine::Board;

/// Largest height difference between adjacent columns that is not treated as a well.
pub const WELL_TOLERANCE: usize = 4;

/// Points credited per row that is missing exactly one cell.
pub const TETRIS_POTENTIAL_PER_ROW: usize = 10;

/// Column inspected by the six-three stack measurement.
pub const SIX_THREE_COLUMN: usize = 6;

/// Metrics of a board state.
///
/// Heights are measured from the floor: a column whose topmost filled cell is in
/// row `y` has height `board height - y`, and an empty column has height 0.
///
/// # Example
///
/// ```
/// use blockfall_engine::Board;
/// use blockfall_evaluator::board_analysis::BoardAnalysis;
///
/// let board = Board::from_ascii(
///     "
///     ....
///     .#..
///     .#..
///     ###.#
///     ",
/// )
/// .unwrap();
/// let analysis = BoardAnalysis::from_board(&board);
/// assert_eq!(analysis.column_heights(), &[1, 3, 0, 1]);
/// assert_eq!(analysis.greatest_height(), 3);
/// assert_eq!(analysis.bumpiness(), 2 + 3 + 1);
/// assert_eq!(analysis.tetris_potential(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardAnalysis {
    width: usize,
    holes: usize,
    filled_count: usize,
    column_heights: Vec<usize>,
    lines_cleared: usize,
    tetris_potential: usize,
    six_three_stack: i64,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let width = board.width();
        let height = board.height();
        let mut holes = 0;
        let mut filled_count = 0;
        let mut column_heights = vec![0; width];
        let mut lines_cleared = 0;
        let mut tetris_potential = 0;
        let mut six_three_stack = 0;

        for y in 0..height {
            let line_full = board.line_full(y);
            if line_full {
                lines_cleared += 1;
            }
            let mut empty_in_row = 0;
            for (x, column_height) in column_heights.iter_mut().enumerate() {
                if board.is_occupied(x, y) {
                    filled_count += 1;
                    if *column_height == 0 {
                        *column_height = height - y;
                    }
                    if x == SIX_THREE_COLUMN {
                        six_three_stack += if line_full { -1 } else { 1 };
                    }
                } else {
                    empty_in_row += 1;
                    if y > 0 && board.is_occupied(x, y - 1) {
                        holes += 1;
                    }
                }
            }
            if empty_in_row == 1 {
                tetris_potential += TETRIS_POTENTIAL_PER_ROW;
            }
        }

        Self {
            width,
            holes,
            filled_count,
            column_heights,
            lines_cleared,
            tetris_potential,
            six_three_stack,
        }
    }

    /// Empty cells whose immediate upper neighbour is filled.
    #[must_use]
    pub fn holes(&self) -> usize {
        self.holes
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.filled_count
    }

    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        &self.column_heights
    }

    #[must_use]
    pub fn greatest_height(&self) -> usize {
        self.column_heights.iter().copied().max().unwrap_or(0)
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        self.column_heights
            .windows(2)
            .map(|pair| pair[0].abs_diff(pair[1]))
            .sum()
    }

    /// Rows that are completely filled.
    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    /// `1` if any adjacent height difference exceeds [`WELL_TOLERANCE`], otherwise `0`.
    #[must_use]
    pub fn well_penalty(&self) -> usize {
        usize::from(
            self.column_heights
                .windows(2)
                .any(|pair| pair[0].abs_diff(pair[1]) > WELL_TOLERANCE),
        )
    }

    /// [`TETRIS_POTENTIAL_PER_ROW`] for every row missing exactly one cell.
    #[must_use]
    pub fn tetris_potential(&self) -> usize {
        self.tetris_potential
    }

    /// Columns without any filled cell.
    #[must_use]
    pub fn empty_columns(&self) -> usize {
        self.column_heights.iter().filter(|h| **h == 0).count()
    }

    /// Filled cells in column [`SIX_THREE_COLUMN`]: +1 in rows that are not full, -1 in
    /// full rows. Always 0 on boards narrower than the column.
    #[must_use]
    pub fn six_three_stack(&self) -> i64 {
        self.six_three_stack
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }
}
