use arrayvec::ArrayVec;

/// A falling piece (tetromino) with anchor position, rotation, and kind.
///
/// Pieces are immutable values: movement and rotation return new `Piece` instances,
/// and the [`Board`](crate::Board) decides whether the result is legal.
///
/// # Coordinate System
///
/// - The anchor is the top-left corner of the piece's 4×4 bounding box
/// - X increases rightward (columns), Y increases downward (rows)
/// - The anchor may lie outside the board while every occupied cell is inside
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawned(PieceKind::T, 10);
/// let moved = piece.right();
/// let rotated = moved.rotated_right();
/// assert_eq!(rotated.rotation().as_u8(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Piece {
    /// Creates a piece in spawn orientation, horizontally centered on a board of
    /// `board_width` columns, touching the top row.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub fn spawned(kind: PieceKind, board_width: usize) -> Self {
        let x = (board_width as i32 - 4) / 2;
        Self {
            position: PiecePosition::new(x, 0),
            rotation: PieceRotation::default(),
            kind,
        }
    }

    #[must_use]
    pub fn with_position(self, position: PiecePosition) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the board coordinates of the four occupied cells, in row-major order
    /// of the bounding box.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(i32, i32), 4> {
        self.kind
            .occupied_offsets(self.rotation)
            .map(|(dx, dy)| (self.position.x + dx, self.position.y + dy))
            .collect()
    }

    /// Returns the column of the leftmost occupied cell.
    #[must_use]
    pub fn min_x(&self) -> i32 {
        self.cells()
            .iter()
            .map(|(x, _)| *x)
            .min()
            .unwrap_or(self.position.x)
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.translated(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.translated(1, 0)
    }

    #[must_use]
    pub fn up(&self) -> Self {
        self.translated(0, -1)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.translated(0, 1)
    }

    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_left(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_left(),
            ..*self
        }
    }

    /// Candidate positions tried, in order, when a rotation collides.
    ///
    /// This is a simplified wall kick rather than the full Super Rotation System:
    /// up, right, down, left.
    #[must_use]
    pub fn kick_candidates(&self) -> [Self; 4] {
        [self.up(), self.right(), self.down(), self.left()]
    }

    fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: PiecePosition::new(self.position.x + dx, self.position.y + dy),
            ..*self
        }
    }
}

/// Anchor position of a piece's 4×4 bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° anticlockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_left(self) -> Self {
        PieceRotation((self.0 + 3) % 4)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Shape identity of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All piece kinds in declaration order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the occupied offsets inside the 4×4 bounding box for `rotation`.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        let shape = &PIECE_SHAPES[self as usize][rotation.as_usize()];
        (0..4).flat_map(move |dy| {
            (0..4).filter_map(move |dx| shape[dy][dx].then_some((dx as i32, dy as i32)))
        })
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Piece shape as a 4×4 occupancy grid, indexed `[y][x]`.
type PieceShape = [[bool; 4]; 4];

/// Generates all 4 rotation states of a shape by rotating 90° clockwise.
///
/// `size` is the effective size of the piece (4 for I, 2 for O, 3 otherwise).
const fn shape_rotations(size: usize, shape: PieceShape) -> [PieceShape; 4] {
    let mut rotates = [shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_shape = [[false; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                new_shape[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_shape;
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rotation_has_four_cells() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::spawned(kind, 10);
            for _ in 0..4 {
                assert_eq!(piece.cells().len(), 4, "{kind} at {:?}", piece.rotation());
                piece = piece.rotated_right();
            }
        }
    }

    #[test]
    fn test_rotation_wraps_around() {
        let piece = Piece::spawned(PieceKind::T, 10);
        let full_turn = piece
            .rotated_right()
            .rotated_right()
            .rotated_right()
            .rotated_right();
        assert_eq!(full_turn, piece);
        assert_eq!(piece.rotated_left().rotated_right(), piece);
    }

    #[test]
    fn test_t_piece_rotates_clockwise() {
        // spawn: nub up; one clockwise turn: nub right
        let piece = Piece::spawned(PieceKind::T, 10).with_position(PiecePosition::new(0, 0));
        let rotated: Vec<_> = piece.rotated_right().cells().into_iter().collect();
        assert_eq!(rotated, vec![(1, 0), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_spawn_is_centered() {
        let piece = Piece::spawned(PieceKind::O, 10);
        let cells: Vec<_> = piece.cells().into_iter().collect();
        assert_eq!(cells, vec![(3, 0), (4, 0), (3, 1), (4, 1)]);
        assert_eq!(piece.min_x(), 3);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('x'), None);
    }
}
