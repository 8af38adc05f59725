use std::fmt;

use crate::{
    PieceCollisionError,
    core::{
        bit_grid::{BitGrid, BoardSizeError},
        piece::{Piece, PieceKind},
    },
};

use super::{
    action::{Action, Direction, Rotation},
    game_stats::GameStats,
    piece_buffer::{PieceBuffer, PieceSeed},
};

/// A playing field with settled cells, an optional falling piece and an optional
/// preview of the next piece.
///
/// Every movement of the falling piece is followed by one gravity step; a gravity
/// step that cannot descend locks the piece. Rows completed by a lock are scored
/// immediately but stay on the board until the next action, so an evaluator looking
/// at the board right after a placement can still see them through
/// [`Board::line_full`].
///
/// Cloning a board is a full value copy, including the piece generator, so a clone
/// can be explored freely without affecting the original.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Direction, PieceSeed};
///
/// let mut board = Board::with_seed(10, 24, PieceSeed::from(1)).unwrap();
/// let before = board.stats().placed_pieces();
/// board.move_piece(Direction::Drop);
/// assert_eq!(board.stats().placed_pieces(), before + 1);
/// assert!(board.falling().is_some());
/// ```
#[derive(Clone)]
pub struct Board {
    grid: BitGrid,
    falling: Option<Piece>,
    next: Option<PieceKind>,
    piece_buffer: Option<PieceBuffer>,
    stats: GameStats,
    discards_left: usize,
    bombs_left: usize,
    game_over: bool,
}

impl Board {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 24;
    pub const DEFAULT_DISCARDS: usize = 10;
    pub const DEFAULT_BOMBS: usize = 5;

    /// Creates an empty board with no falling piece, no preview and no piece
    /// generator. Pieces are supplied with [`Board::spawn_piece`] and
    /// [`Board::set_next`].
    pub fn new(width: usize, height: usize) -> Result<Self, BoardSizeError> {
        Ok(Self::from_grid(BitGrid::new(width, height)?))
    }

    /// Creates an empty board fed by a seeded 7-bag generator.
    ///
    /// The first piece is already falling and the second is in the preview.
    pub fn with_seed(width: usize, height: usize, seed: PieceSeed) -> Result<Self, BoardSizeError> {
        let mut buffer = PieceBuffer::with_seed(seed);
        let falling = buffer.pop_next();
        let next = buffer.pop_next();
        let mut board = Self::from_grid(BitGrid::new(width, height)?);
        board.piece_buffer = Some(buffer);
        board.next = Some(next);
        board.spawn(falling);
        Ok(board)
    }

    /// Creates a board from ASCII art (see [`BitGrid::from_ascii`]) with no falling piece.
    pub fn from_ascii(art: &str) -> Result<Self, BoardSizeError> {
        Ok(Self::from_grid(BitGrid::from_ascii(art)?))
    }

    fn from_grid(grid: BitGrid) -> Self {
        Self {
            grid,
            falling: None,
            next: None,
            piece_buffer: None,
            stats: GameStats::default(),
            discards_left: Self::DEFAULT_DISCARDS,
            bombs_left: Self::DEFAULT_BOMBS,
            game_over: false,
        }
    }

    /// Replaces the discard and bomb allowances.
    #[must_use]
    pub fn with_limits(mut self, discards: usize, bombs: usize) -> Self {
        self.discards_left = discards;
        self.bombs_left = bombs;
        self
    }

    /// Puts a new piece of `kind` at the spawn position, replacing any falling piece.
    pub fn spawn_piece(&mut self, kind: PieceKind) -> Result<(), PieceCollisionError> {
        let piece = Piece::spawned(kind, self.width());
        if self.grid.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling = Some(piece);
        Ok(())
    }

    pub fn set_next(&mut self, next: Option<PieceKind>) {
        self.next = next;
    }

    #[must_use]
    pub fn falling(&self) -> Option<&Piece> {
        self.falling.as_ref()
    }

    #[must_use]
    pub fn next(&self) -> Option<PieceKind> {
        self.next
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Settled cells, excluding the falling piece.
    #[must_use]
    pub fn grid(&self) -> &BitGrid {
        &self.grid
    }

    /// Iterates the settled cells as `(x, y)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.grid.cells()
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.grid.is_occupied(x, y)
    }

    #[must_use]
    pub fn line_full(&self, y: usize) -> bool {
        self.grid.line_full(y)
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn discards_left(&self) -> usize {
        self.discards_left
    }

    #[must_use]
    pub fn bombs_left(&self) -> usize {
        self.bombs_left
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Applies a single action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move(direction) => self.move_piece(direction),
            Action::Rotate(rotation) => self.rotate(rotation),
            Action::Discard => self.discard(),
            Action::Bomb => self.bomb(),
        }
    }

    /// Moves the falling piece. Does nothing when no piece is falling.
    pub fn move_piece(&mut self, direction: Direction) {
        let Some(piece) = self.begin_action() else {
            return;
        };
        match direction {
            Direction::Left | Direction::Right => {
                let moved = if direction == Direction::Left {
                    piece.left()
                } else {
                    piece.right()
                };
                if !self.grid.is_colliding(&moved) {
                    self.falling = Some(moved);
                }
                self.gravity_step();
            }
            Direction::Down => self.gravity_step(),
            Direction::Drop => {
                self.falling = Some(self.resting_position(piece));
                self.lock();
            }
        }
    }

    /// Rotates the falling piece, trying simple wall kicks when the rotated piece
    /// collides, then applies one gravity step.
    pub fn rotate(&mut self, rotation: Rotation) {
        let Some(piece) = self.begin_action() else {
            return;
        };
        let rotated = match rotation {
            Rotation::Clockwise => piece.rotated_right(),
            Rotation::Anticlockwise => piece.rotated_left(),
        };
        let placed = std::iter::once(rotated)
            .chain(rotated.kick_candidates())
            .find(|candidate| !self.grid.is_colliding(candidate));
        if let Some(placed) = placed {
            self.falling = Some(placed);
        }
        self.gravity_step();
    }

    /// Replaces the falling piece with the preview piece.
    ///
    /// Does nothing when no discards are left or there is nothing to swap in.
    pub fn discard(&mut self) {
        if self.discards_left == 0 || self.next.is_none() {
            return;
        }
        if self.begin_action().is_none() {
            return;
        }
        self.discards_left -= 1;
        self.falling = None;
        self.spawn_next();
    }

    /// Drops the falling piece as a bomb: instead of settling, it clears every
    /// settled cell within one cell (including diagonals) of where it lands.
    pub fn bomb(&mut self) {
        if self.bombs_left == 0 {
            return;
        }
        let Some(piece) = self.begin_action() else {
            return;
        };
        self.bombs_left -= 1;
        let resting = self.resting_position(piece);
        for (cx, cy) in resting.cells() {
            for (dx, dy) in (-1..=1).flat_map(|dx| (-1..=1).map(move |dy| (dx, dy))) {
                if let Some((x, y)) = self.grid.index_of(cx + dx, cy + dy) {
                    self.grid.vacate(x, y);
                }
            }
        }
        self.stats.record_detonation();
        self.falling = None;
        self.spawn_next();
    }

    /// Removes rows completed by the previous lock and returns the falling piece if
    /// the action can proceed.
    fn begin_action(&mut self) -> Option<Piece> {
        if self.game_over {
            return None;
        }
        if self.grid.clear_full_rows() > 0
            && let Some(piece) = self.falling
            && self.grid.is_colliding(&piece)
        {
            self.falling = None;
            self.game_over = true;
        }
        self.falling
    }

    fn gravity_step(&mut self) {
        let Some(piece) = self.falling else {
            return;
        };
        let lowered = piece.down();
        if self.grid.is_colliding(&lowered) {
            self.lock();
        } else {
            self.falling = Some(lowered);
        }
    }

    fn resting_position(&self, mut piece: Piece) -> Piece {
        while !self.grid.is_colliding(&piece.down()) {
            piece = piece.down();
        }
        piece
    }

    fn lock(&mut self) {
        let Some(piece) = self.falling.take() else {
            return;
        };
        self.grid.fill_piece(&piece);
        self.stats.record_lock(self.grid.full_row_count());
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let Some(kind) = self.next.take() else {
            return;
        };
        self.next = self.piece_buffer.as_mut().map(PieceBuffer::pop_next);
        self.spawn(kind);
    }

    fn spawn(&mut self, kind: PieceKind) {
        if self.spawn_piece(kind).is_err() {
            self.falling = None;
            self.game_over = true;
        }
    }
}

impl fmt::Display for Board {
    /// Renders settled cells as `#`, the falling piece as `@` and empty cells as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let falling = self.falling.map(|piece| piece.cells()).unwrap_or_default();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let is_falling = falling
                    .iter()
                    .any(|cell| self.grid.index_of(cell.0, cell.1) == Some((x, y)));
                let c = if is_falling {
                    '@'
                } else if self.is_occupied(x, y) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {}x{} falling={:?} next={:?} score={} game_over={}",
            self.width(),
            self.height(),
            self.falling.map(|piece| piece.kind()),
            self.next,
            self.stats.score(),
            self.game_over,
        )?;
        fmt::Display::fmt(self, f)
    }
}
