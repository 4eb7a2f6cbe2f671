mod board;
mod movegen;
mod moves;
pub mod valuation;

pub use board::{Board, Cell, Player, DIRECTIONS};
pub use moves::{Move, Square, BOARD_SIZE};
pub use valuation::{PieceWeights, ValuationFn};
