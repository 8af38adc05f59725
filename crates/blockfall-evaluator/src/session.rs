//! Full game sessions: the fitness oracle of weight evolution.
//!
//! A session lets a [`Player`] act on a board until the game is over, the player goes
//! idle, or the configured number of pieces has been placed. The cumulative game score
//! of the session is what the optimizer maximizes.

use blockfall_engine::{Board, BoardSizeError, PieceSeed};
use serde::{Deserialize, Serialize};

use crate::player::Player;

/// Board dimensions and limits of a single session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    /// Session ends once this many pieces have been placed.
    pub max_pieces: usize,
    pub discards: usize,
    pub bombs: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: Board::DEFAULT_WIDTH,
            height: Board::DEFAULT_HEIGHT,
            max_pieces: 400,
            discards: Board::DEFAULT_DISCARDS,
            bombs: Board::DEFAULT_BOMBS,
        }
    }
}

impl SessionConfig {
    /// Creates the starting board of a session whose pieces follow `seed`.
    pub fn new_board(&self, seed: PieceSeed) -> Result<Board, BoardSizeError> {
        Ok(Board::with_seed(self.width, self.height, seed)?.with_limits(self.discards, self.bombs))
    }
}

/// Final statistics of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub score: usize,
    pub placed_pieces: usize,
    pub cleared_lines: usize,
    /// Locks by number of rows completed (0 to 4).
    pub clears_by_size: [usize; 5],
    pub game_over: bool,
}

impl SessionOutcome {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let stats = board.stats();
        Self {
            score: stats.score(),
            placed_pieces: stats.placed_pieces(),
            cleared_lines: stats.cleared_lines(),
            clears_by_size: *stats.clears_by_size(),
            game_over: board.is_game_over(),
        }
    }
}

/// Plays on `board` until the game ends, the player goes idle or `max_pieces` pieces
/// have been placed.
pub fn play_session<P>(board: &mut Board, player: &mut P, max_pieces: usize) -> SessionOutcome
where
    P: Player + ?Sized,
{
    while !board.is_game_over() && board.stats().placed_pieces() < max_pieces {
        let actions = player.choose_action(board);
        if actions.is_empty() {
            break;
        }
        for action in actions {
            board.apply(action);
        }
    }
    let outcome = SessionOutcome::from_board(board);
    tracing::trace!(
        score = outcome.score,
        pieces = outcome.placed_pieces,
        game_over = outcome.game_over,
        "session finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{LookaheadPlayer, RandomPlayer};

    fn small_config() -> SessionConfig {
        SessionConfig {
            width: 6,
            height: 10,
            max_pieces: 30,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_session_stops_at_piece_limit() {
        let config = SessionConfig {
            max_pieces: 5,
            ..SessionConfig::default()
        };
        let mut board = config.new_board(PieceSeed::from(1)).unwrap();
        let outcome = play_session(&mut board, &mut LookaheadPlayer::baseline(), config.max_pieces);
        assert_eq!(outcome.placed_pieces, 5);
        assert!(!outcome.game_over);
    }

    #[test]
    fn test_sessions_are_deterministic() {
        let config = small_config();
        let play = || {
            let mut board = config.new_board(PieceSeed::from(11)).unwrap();
            play_session(&mut board, &mut LookaheadPlayer::baseline(), config.max_pieces)
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_random_player_session_terminates() {
        let config = small_config();
        let mut board = config.new_board(PieceSeed::from(2)).unwrap();
        let outcome = play_session(&mut board, &mut RandomPlayer::new(2), config.max_pieces);
        assert!(outcome.game_over || outcome.placed_pieces == config.max_pieces);
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: SessionConfig = serde_json::from_str(r#"{"width": 8}"#).unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 24);
        assert_eq!(config.max_pieces, 400);
    }

    #[test]
    fn test_invalid_board_size_is_reported() {
        let config = SessionConfig {
            width: 100,
            ..SessionConfig::default()
        };
        assert_eq!(
            config.new_board(PieceSeed::from(0)).unwrap_err(),
            BoardSizeError::TooWide { width: 100 }
        );
    }
}
