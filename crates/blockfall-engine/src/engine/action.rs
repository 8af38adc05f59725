/// Horizontal or downward movement of the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Direction {
    Left,
    Right,
    /// One gravity step.
    Down,
    /// Hard drop: fall to rest and lock immediately.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rotation {
    Clockwise,
    Anticlockwise,
}

/// A single input the board accepts.
///
/// A player answers each turn with a sequence of actions; an empty sequence means
/// the player stays idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Action {
    #[display("move {_0}")]
    Move(Direction),
    #[display("rotate {_0}")]
    Rotate(Rotation),
    /// Replace the falling piece with the preview piece.
    #[display("discard")]
    Discard,
    /// Turn the falling piece into a bomb that clears its surroundings on landing.
    #[display("bomb")]
    Bomb,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}

impl From<Rotation> for Action {
    fn from(rotation: Rotation) -> Self {
        Action::Rotate(rotation)
    }
}
