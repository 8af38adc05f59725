//! Turning a target column and rotation into an action sequence.
//!
//! [`enumerate_placement`] plays the moves on a private copy of the board, so the
//! returned board is exactly what the real board will look like after the returned
//! actions are applied to it.

use std::cmp::Ordering;

use blockfall_engine::{Action, Board, Direction, Piece, Rotation};

/// The outcome of steering the falling piece toward a target.
#[derive(Debug, Clone)]
pub struct Placement {
    actions: Vec<Action>,
    board: Board,
    degenerate: bool,
}

impl Placement {
    /// Actions executed, in order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Board after the actions, with rows completed by the lock still present.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whether the piece locked before reaching the target column and rotation.
    ///
    /// The actions still describe what happened and the board is still valid; the
    /// placement just is not the one that was asked for.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    #[must_use]
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

/// Steers the falling piece to leftmost column `target_x` with `rotations` clockwise
/// turns and drops it.
///
/// Rotations are applied first, then one-column translations toward the target, then
/// a hard drop. Every step is followed by gravity, so the piece may lock on the way;
/// the sequence then stops early and the placement is [degenerate]. A blocked
/// translation is retried on the next step, letting the piece slide under overhangs;
/// a target that stays out of reach ends in a lock.
///
/// Without a falling piece the action list is empty and the board is an unchanged copy.
///
/// [degenerate]: Placement::is_degenerate
///
/// # Example
///
/// ```
/// use blockfall_engine::{Action, Board, Direction, PieceKind};
/// use blockfall_evaluator::placement::enumerate_placement;
///
/// let mut board = Board::new(10, 24).unwrap();
/// board.spawn_piece(PieceKind::O).unwrap();
/// let placement = enumerate_placement(&board, 0, 0);
/// assert_eq!(placement.actions().len(), 4);
/// assert_eq!(placement.actions()[3], Action::Move(Direction::Drop));
/// assert!(placement.board().is_occupied(0, 23));
/// assert!(board.falling().is_some());
/// ```
#[must_use]
pub fn enumerate_placement(board: &Board, target_x: i32, rotations: u8) -> Placement {
    let mut sandbox = Sandbox::new(board.clone());
    if sandbox.board.falling().is_none() {
        return sandbox.finish(false);
    }

    for _ in 0..rotations {
        sandbox.apply(Action::Rotate(Rotation::Clockwise));
        if sandbox.locked() {
            return sandbox.finish(true);
        }
    }

    while let Some(x) = sandbox.board.falling().map(Piece::min_x) {
        let direction = match x.cmp(&target_x) {
            Ordering::Less => Direction::Right,
            Ordering::Greater => Direction::Left,
            Ordering::Equal => break,
        };
        sandbox.apply(Action::Move(direction));
        if sandbox.locked() {
            return sandbox.finish(true);
        }
    }

    sandbox.apply(Action::Move(Direction::Drop));
    sandbox.finish(false)
}

struct Sandbox {
    board: Board,
    actions: Vec<Action>,
    placed_before: usize,
}

impl Sandbox {
    fn new(board: Board) -> Self {
        let placed_before = board.stats().placed_pieces();
        Self {
            board,
            actions: Vec::new(),
            placed_before,
        }
    }

    fn apply(&mut self, action: Action) {
        self.board.apply(action);
        self.actions.push(action);
    }

    /// A lock always bumps the placed-piece counter, even when the next piece spawns
    /// immediately.
    fn locked(&self) -> bool {
        self.board.stats().placed_pieces() != self.placed_before
            || self.board.falling().is_none()
    }

    fn finish(self, degenerate: bool) -> Placement {
        Placement {
            actions: self.actions,
            board: self.board,
            degenerate,
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;

    use super::*;

    fn board_with(art: &str, kind: PieceKind) -> Board {
        let mut board = Board::from_ascii(art).unwrap();
        board.spawn_piece(kind).unwrap();
        board
    }

    #[test]
    fn test_no_falling_piece_yields_no_actions() {
        let board = Board::new(10, 24).unwrap();
        let placement = enumerate_placement(&board, 3, 2);
        assert!(placement.actions().is_empty());
        assert!(!placement.is_degenerate());
        assert_eq!(placement.board().cells().count(), 0);
    }

    #[test]
    fn test_rotate_then_translate_then_drop() {
        let mut board = Board::new(10, 24).unwrap();
        board.spawn_piece(PieceKind::I).unwrap();
        let placement = enumerate_placement(&board, 9, 1);
        // rotated I is vertical in column 5
        assert_eq!(
            placement.actions(),
            &[
                Action::Rotate(Rotation::Clockwise),
                Action::Move(Direction::Right),
                Action::Move(Direction::Right),
                Action::Move(Direction::Right),
                Action::Move(Direction::Right),
                Action::Move(Direction::Drop),
            ]
        );
        for y in 20..24 {
            assert!(placement.board().is_occupied(9, y));
        }
    }

    #[test]
    fn test_unreachable_target_keeps_pushing_until_lock() {
        let mut board = Board::new(10, 24).unwrap();
        board.spawn_piece(PieceKind::O).unwrap();
        let placement = enumerate_placement(&board, 9, 0);
        // the O reaches the wall at column 8 and falls one row per move until it rests
        assert!(placement.is_degenerate());
        assert_eq!(placement.actions().len(), 23);
        assert!(
            placement
                .actions()
                .iter()
                .all(|a| *a == Action::Move(Direction::Right))
        );
        assert!(placement.board().is_occupied(8, 23));
        assert!(placement.board().is_occupied(9, 23));
    }

    #[test]
    fn test_slides_under_overhang_to_target() {
        let board = board_with(
            "
            .....#....
            .....#....
            .....#....
            .....#....
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ",
            PieceKind::O,
        );
        let placement = enumerate_placement(&board, 8, 0);
        assert!(!placement.is_degenerate());
        let (last, moves) = placement.actions().split_last().unwrap();
        assert_eq!(*last, Action::Move(Direction::Drop));
        assert_eq!(moves, &[Action::Move(Direction::Right); 9]);
        for x in [8, 9] {
            assert!(placement.board().is_occupied(x, 10));
            assert!(placement.board().is_occupied(x, 11));
        }
        assert!(!placement.board().is_occupied(3, 11));
    }

    #[test]
    fn test_lock_before_target_is_degenerate() {
        let board = board_with(
            "
            ......
            ......
            ......
            ......
            ",
            PieceKind::O,
        );
        // the O spawns at column 1 and locks on the floor during the third move
        let placement = enumerate_placement(&board, 5, 0);
        assert!(placement.is_degenerate());
        assert_eq!(placement.actions().len(), 3);
        assert_eq!(placement.board().stats().placed_pieces(), 1);
        assert!(placement.board().falling().is_none());
    }

    #[test]
    fn test_replaying_actions_reproduces_board() {
        let mut board = board_with(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            #.....#...
            ##..####.#
            ",
            PieceKind::T,
        );
        board.set_next(Some(PieceKind::L));
        for x in 0..10 {
            for r in 0..4 {
                let placement = enumerate_placement(&board, x, r);
                let mut replay = board.clone();
                for action in placement.actions() {
                    replay.apply(*action);
                }
                assert_eq!(replay.to_string(), placement.board().to_string(), "x={x} r={r}");
            }
        }
    }
}
