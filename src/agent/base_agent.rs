use crate::{Board, Move};

/// A move-selection strategy. `legal_moves` is the full legal move list of the side the agent plays on
/// `board`; the returned move is one of them, or `None` if the list is empty. A single candidate is returned
/// without searching.
pub trait Agent {
    fn select_move(&mut self, board: &Board, legal_moves: &[Move]) -> Option<Move>;
}
