//! Decision making for the falling-block game.
//!
//! ```text
//! Session (fitness: cumulative game score)
//!     ↓ uses
//! Player (strategy: which actions to apply)
//!     ↓ uses
//! Move Search (two-ply lookahead over placements)
//!     ↓ uses
//! Placement Enumerator + Heuristic Evaluator (score one board)
//! ```
//!
//! - [`board_analysis`] - one-pass board metrics
//! - [`board_feature`] - ordered list of named features read from the metrics
//! - [`heuristic`] - weighted sum of features ([`HeuristicEvaluator`], [`WeightVector`])
//! - [`placement`] - action sequence toward a target column and rotation
//! - [`search`] - best plan for the falling piece ([`MoveSearch`])
//! - [`player`] - [`Player`] strategies
//! - [`session`] - complete simulated games
//!
//! # Example
//!
//! ```
//! use blockfall_engine::PieceSeed;
//! use blockfall_evaluator::{LookaheadPlayer, SessionConfig, play_session};
//!
//! let config = SessionConfig {
//!     max_pieces: 10,
//!     ..SessionConfig::default()
//! };
//! let mut board = config.new_board(PieceSeed::from(3)).unwrap();
//! let outcome = play_session(&mut board, &mut LookaheadPlayer::baseline(), config.max_pieces);
//! assert_eq!(outcome.placed_pieces, 10);
//! ```

pub use self::{
    heuristic::{BoardEvaluator, EvaluatorError, HeuristicEvaluator, WeightVector},
    player::{LookaheadPlayer, Player, RandomPlayer},
    search::{MoveSearch, SearchResult},
    session::{SessionConfig, SessionOutcome, play_session},
};

pub mod board_analysis;
pub mod board_feature;
pub mod heuristic;
pub mod placement;
pub mod player;
pub mod search;
pub mod session;
