pub use self::{hex_board::*, stone::*};

pub(crate) mod hex_board;
pub(crate) mod stone;

/// Largest shape in the table; sizes the fixed-capacity cell buffers.
pub const MAX_STONE_CELLS: usize = 6;
