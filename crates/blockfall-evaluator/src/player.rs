//! Strategies that decide what to do with the falling piece.

use std::fmt;

use blockfall_engine::{Action, Board, Direction, Rotation};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    heuristic::{BoardEvaluator, HeuristicEvaluator},
    search::MoveSearch,
};

/// A decision strategy.
///
/// `choose_action` answers a board with the actions to apply next. An empty sequence
/// means the player stays idle, which is always the answer when no piece is falling.
pub trait Player: fmt::Debug {
    fn choose_action(&mut self, board: &Board) -> Vec<Action>;
}

impl<P> Player for Box<P>
where
    P: Player + ?Sized,
{
    fn choose_action(&mut self, board: &Board) -> Vec<Action> {
        self.as_mut().choose_action(board)
    }
}

/// Plays the full plan found by the two-ply [`MoveSearch`].
#[derive(Debug, Clone)]
pub struct LookaheadPlayer<E = HeuristicEvaluator> {
    search: MoveSearch<E>,
}

impl LookaheadPlayer {
    /// Player using the hand-tuned baseline weights.
    #[must_use]
    pub fn baseline() -> Self {
        Self::new(HeuristicEvaluator::baseline())
    }
}

impl<E> LookaheadPlayer<E>
where
    E: BoardEvaluator,
{
    #[must_use]
    pub fn new(evaluator: E) -> Self {
        Self {
            search: MoveSearch::new(evaluator),
        }
    }

    #[must_use]
    pub fn search(&self) -> &MoveSearch<E> {
        &self.search
    }
}

impl<E> Player for LookaheadPlayer<E>
where
    E: BoardEvaluator,
{
    fn choose_action(&mut self, board: &Board) -> Vec<Action> {
        let Some(plan) = self.search.best_plan(board) else {
            return vec![];
        };
        tracing::trace!(score = plan.score(), actions = plan.actions().len(), "chose plan");
        plan.into_actions()
    }
}

const MOVES: [Action; 5] = [
    Action::Move(Direction::Left),
    Action::Move(Direction::Right),
    Action::Move(Direction::Down),
    Action::Rotate(Rotation::Anticlockwise),
    Action::Rotate(Rotation::Clockwise),
];

const SPECIALS: [Action; 2] = [Action::Discard, Action::Bomb];

/// Picks one random action per turn.
///
/// With probability [`RandomPlayer::SPECIAL_PROBABILITY`] the action is a discard or a
/// bomb, otherwise a movement or rotation.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: Pcg32,
}

impl RandomPlayer {
    pub const SPECIAL_PROBABILITY: f64 = 0.03;

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn choose_action(&mut self, board: &Board) -> Vec<Action> {
        if board.falling().is_none() {
            return vec![];
        }
        let pool: &[Action] = if self.rng.random_bool(Self::SPECIAL_PROBABILITY) {
            &SPECIALS
        } else {
            &MOVES
        };
        vec![pool[self.rng.random_range(0..pool.len())]]
    }
}
