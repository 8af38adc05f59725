pub use self::{bit_grid::*, piece::*};

pub(crate) mod bit_grid;
pub(crate) mod piece;
