//! Two-ply lookahead search over placements.
//!
//! # How It Works
//!
//! 1. **Ply 1** - For every target column `x` (ascending) and rotation count `r` in
//!    `0..4`, steer the falling piece with [`enumerate_placement`]
//! 2. **Ply 2** - When the board shows a preview piece and it is falling after the
//!    first placement, enumerate every placement of it too and keep the best score
//! 3. **Select** - The ply-1 candidate with the highest value wins; ties keep the
//!    earliest candidate
//!
//! Without a preview (or when the first placement ends the game) the board after the
//! first placement is scored directly.
//!
//! The search depth is fixed. Each candidate is explored on its own board copy and
//! thrown away afterwards, so the caller's board is never touched.

use blockfall_engine::{Action, Board};

use crate::{
    heuristic::{BoardEvaluator, HeuristicEvaluator},
    placement::{Placement, enumerate_placement},
};

/// Number of distinct rotation counts tried per column.
pub const ROTATIONS: u8 = 4;

/// The best action sequence found for the current piece.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    actions: Vec<Action>,
    score: f64,
}

impl SearchResult {
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Value of the plan: the best ply-2 score, or the ply-1 score without lookahead.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

#[derive(Debug, Clone)]
pub struct MoveSearch<E = HeuristicEvaluator> {
    evaluator: E,
}

impl<E> MoveSearch<E>
where
    E: BoardEvaluator,
{
    #[must_use]
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    #[must_use]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Finds the best action sequence for the falling piece, or `None` when no piece
    /// is falling.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{Board, PieceKind};
    /// use blockfall_evaluator::{heuristic::HeuristicEvaluator, search::MoveSearch};
    ///
    /// let search = MoveSearch::new(HeuristicEvaluator::baseline());
    /// let mut board = Board::new(10, 24).unwrap();
    /// assert!(search.best_plan(&board).is_none());
    ///
    /// board.spawn_piece(PieceKind::O).unwrap();
    /// board.set_next(Some(PieceKind::I));
    /// let plan = search.best_plan(&board).unwrap();
    /// assert!(!plan.actions().is_empty());
    /// ```
    #[must_use]
    pub fn best_plan(&self, board: &Board) -> Option<SearchResult> {
        board.falling()?;
        let lookahead = board.next().is_some();

        let mut best: Option<SearchResult> = None;
        for first in placements(board) {
            let score = if lookahead && first.board().falling().is_some() {
                self.best_follow_up_score(first.board())
            } else {
                self.evaluator.evaluate(first.board())
            };
            if best.as_ref().is_none_or(|best| score > best.score) {
                best = Some(SearchResult {
                    actions: first.into_actions(),
                    score,
                });
            }
        }
        best
    }

    fn best_follow_up_score(&self, board: &Board) -> f64 {
        placements(board)
            .map(|second| self.evaluator.evaluate(second.board()))
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Every `(x, r)` placement of the falling piece, column-major.
fn placements(board: &Board) -> impl Iterator<Item = Placement> + '_ {
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let width = board.width() as i32;
    (0..width).flat_map(move |x| (0..ROTATIONS).map(move |r| enumerate_placement(board, x, r)))
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Direction, PieceKind};

    use super::*;

    #[derive(Debug)]
    struct ConstantEvaluator;

    impl BoardEvaluator for ConstantEvaluator {
        fn evaluate(&self, _board: &Board) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let search = MoveSearch::new(ConstantEvaluator);
        let mut board = Board::new(10, 24).unwrap();
        board.spawn_piece(PieceKind::T).unwrap();
        let plan = search.best_plan(&board).unwrap();
        assert_eq!(plan.actions(), enumerate_placement(&board, 0, 0).actions());
        assert!((plan.score() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fills_gap_to_complete_line() {
        let mut board = Board::from_ascii(
            "
            ....
            ....
            ....
            ....
            ##..
            ##..
            ",
        )
        .unwrap();
        board.spawn_piece(PieceKind::O).unwrap();
        let search = MoveSearch::new(HeuristicEvaluator::baseline());
        let plan = search.best_plan(&board).unwrap();
        let mut after = board.clone();
        for action in plan.actions() {
            after.apply(*action);
        }
        assert_eq!(after.stats().cleared_lines(), 2);
    }

    #[test]
    fn test_lookahead_uses_preview() {
        let mut board = Board::new(10, 24).unwrap();
        board.spawn_piece(PieceKind::O).unwrap();
        board.set_next(Some(PieceKind::O));
        let search = MoveSearch::new(HeuristicEvaluator::baseline());
        let plan = search.best_plan(&board).unwrap();
        // two O pieces against the left wall: 1000 - 8 filled - 2 height - 0.1 * 2 bumpiness
        assert!((plan.score() - 989.8).abs() < 1e-9, "score = {}", plan.score());
        assert_eq!(plan.actions().last(), Some(&Action::Move(Direction::Drop)));
    }

    #[test]
    fn test_search_does_not_mutate_board() {
        let mut board = Board::new(10, 24).unwrap();
        board.spawn_piece(PieceKind::S).unwrap();
        board.set_next(Some(PieceKind::Z));
        let before = board.to_string();
        let _ = MoveSearch::new(HeuristicEvaluator::baseline()).best_plan(&board);
        assert_eq!(board.to_string(), before);
        assert_eq!(board.stats().placed_pieces(), 0);
    }
}
