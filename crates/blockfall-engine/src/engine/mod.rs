//! Game rules layered on top of the core data structures.
//!
//! - [`Board`] - the playing field: settled cells, falling piece, preview, statistics
//! - [`Action`] - inputs accepted by the board
//! - [`GameStats`] - score and line clear counters
//! - [`PieceBuffer`] / [`PieceSeed`] - seeded 7-bag piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`Board`] with a seed (first piece falling, second in preview)
//! 2. A player applies actions; each movement is followed by one gravity step
//! 3. A lock settles the piece, scores completed rows and spawns the preview
//! 4. Completed rows disappear at the start of the next action
//! 5. Repeat until a newly spawned piece collides (game over)

pub use self::{action::*, board::*, game_stats::*, piece_buffer::*};

mod action;
mod board;
mod game_stats;
mod piece_buffer;
