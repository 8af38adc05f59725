//! Falling-block board simulator.
//!
//! A small, deterministic game implementation used as the playing field for the
//! search agent and as the fitness oracle for weight evolution. There is no
//! rendering and no timing: the board advances only when an action is applied.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when spawning")]
pub struct PieceCollisionError;
