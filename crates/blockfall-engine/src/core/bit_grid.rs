use std::fmt;

use crate::core::piece::Piece;

/// Error returned when a grid cannot be built with the requested dimensions.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardSizeError {
    #[display("board must be at least {min}x{min}, got {width}x{height}", min = BitGrid::MIN_SIZE)]
    TooSmall { width: usize, height: usize },
    #[display("board width must be at most {}, got {width}", BitGrid::MAX_WIDTH)]
    TooWide { width: usize },
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Single row of the grid stored as a bitmask, bit `x` set when column `x` is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct BitRow {
    bits: u64,
}

impl BitRow {
    const EMPTY: Self = Self { bits: 0 };

    #[inline]
    fn is_cell_occupied(self, x: usize) -> bool {
        (self.bits >> x) & 1 != 0
    }

    #[inline]
    fn occupy(&mut self, x: usize) {
        self.bits |= 1 << x;
    }

    #[inline]
    fn vacate(&mut self, x: usize) {
        self.bits &= !(1 << x);
    }

    #[inline]
    fn occupied_count(self) -> usize {
        self.bits.count_ones() as usize
    }
}

/// Settled cells of a board with fixed, runtime-chosen dimensions.
///
/// Each row is a `u64` bitmask, so widths up to [`BitGrid::MAX_WIDTH`] are supported.
/// Row `0` is the top of the board. Cloning is a cheap value copy, which is what the
/// lookahead search relies on.
#[derive(Clone, PartialEq, Eq)]
pub struct BitGrid {
    width: usize,
    row_mask: u64,
    rows: Vec<BitRow>,
}

impl BitGrid {
    pub const MAX_WIDTH: usize = 64;
    pub const MIN_SIZE: usize = 4;

    /// Creates an empty grid.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardSizeError> {
        if width < Self::MIN_SIZE || height < Self::MIN_SIZE {
            return Err(BoardSizeError::TooSmall { width, height });
        }
        if width > Self::MAX_WIDTH {
            return Err(BoardSizeError::TooWide { width });
        }
        let row_mask = if width == Self::MAX_WIDTH {
            u64::MAX
        } else {
            (1 << width) - 1
        };
        Ok(Self {
            width,
            row_mask,
            rows: vec![BitRow::EMPTY; height],
        })
    }

    /// Creates a grid from ASCII art, rows listed top to bottom.
    ///
    /// `#` is an occupied cell and `.` an empty one; other characters are ignored and
    /// blank lines are skipped. All rows must have the same number of cells.
    ///
    /// ```
    /// use blockfall_engine::BitGrid;
    ///
    /// let grid = BitGrid::from_ascii(
    ///     "
    ///     ....
    ///     ....
    ///     #...
    ///     ###.#
    ///     ",
    /// )
    /// .unwrap();
    /// assert_eq!((grid.width(), grid.height()), (4, 4));
    /// assert!(grid.is_occupied(0, 2));
    /// assert_eq!(grid.filled_count(), 4);
    /// ```
    pub fn from_ascii(art: &str) -> Result<Self, BoardSizeError> {
        let lines: Vec<Vec<bool>> = art
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| *c == '#' || *c == '.')
                    .map(|c| c == '#')
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();
        let width = lines.first().map_or(0, Vec::len);
        let mut grid = Self::new(width, lines.len())?;
        for (y, cells) in lines.iter().enumerate() {
            if cells.len() != width {
                return Err(BoardSizeError::RaggedRow {
                    row: y,
                    expected: width,
                    found: cells.len(),
                });
            }
            for (x, _) in cells.iter().enumerate().filter(|(_, c)| **c) {
                grid.occupy(x, y);
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether `(x, y)` is occupied. Out-of-range coordinates are empty.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && self.rows.get(y).is_some_and(|row| row.is_cell_occupied(x))
    }

    /// Marks `(x, y)` as occupied.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    pub fn occupy(&mut self, x: usize, y: usize) {
        assert!(x < self.width, "column {x} out of range");
        self.rows[y].occupy(x);
    }

    pub fn vacate(&mut self, x: usize, y: usize) {
        if x < self.width
            && let Some(row) = self.rows.get_mut(y)
        {
            row.vacate(x);
        }
    }

    /// Returns whether every cell of row `y` is occupied.
    #[must_use]
    pub fn line_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.bits & self.row_mask == self.row_mask)
    }

    /// Number of empty cells in row `y`.
    #[must_use]
    pub fn empty_count_in_row(&self, y: usize) -> usize {
        self.rows
            .get(y)
            .map_or(0, |row| self.width - row.occupied_count())
    }

    /// Total number of occupied cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.rows.iter().map(|row| row.occupied_count()).sum()
    }

    /// Iterates occupied cells as `(x, y)`, row by row from the top.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(y, row)| {
            (0..self.width)
                .filter(move |x| row.is_cell_occupied(*x))
                .map(move |x| (x, y))
        })
    }

    /// Converts signed board coordinates into an in-range `(x, y)` index.
    #[must_use]
    pub fn index_of(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|x| *x < self.width)?;
        let y = usize::try_from(y).ok().filter(|y| *y < self.height())?;
        Some((x, y))
    }

    /// Checks whether the piece leaves the grid or overlaps an occupied cell.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.cells().into_iter().any(|(x, y)| {
            self.index_of(x, y)
                .is_none_or(|(x, y)| self.is_occupied(x, y))
        })
    }

    /// Settles the piece's cells onto the grid.
    ///
    /// Cells outside the grid are ignored; callers only settle non-colliding pieces.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if let Some((x, y)) = self.index_of(x, y) {
                self.occupy(x, y);
            }
        }
    }

    /// Number of rows that are completely occupied.
    #[must_use]
    pub fn full_row_count(&self) -> usize {
        (0..self.height()).filter(|y| self.line_full(*y)).count()
    }

    /// Removes full rows, shifting the rows above them down, and returns how many
    /// rows were removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let height = self.height();
        let mut count = 0;
        for y in (0..height).rev() {
            if self.line_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BitRow::EMPTY);
        count
    }
}

impl fmt::Debug for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitGrid {}x{}", self.width, self.height())?;
        for y in 0..self.height() {
            for x in 0..self.width {
                f.write_str(if self.is_occupied(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
