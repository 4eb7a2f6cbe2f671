//! Checkers decision engine.
//!
//! The [`checkers`] module holds the board, the legal move enumerator with forced and maximal jumps, and the
//! static valuations. On top of it sit two independent move pickers: a depth-limited minimax search with
//! alpha-beta pruning ([`MinimaxAgent`]) and Monte Carlo tree search with UCB1 selection ([`MctsAgent`]).
//!
//! ```
//! use checkers::{Agent, Board, MinimaxAgent, MinimaxConfig, Player};
//!
//! let board = Board::new();
//! let moves = board.legal_moves(Player::Dark);
//!
//! let mut agent = MinimaxAgent::new(Player::Dark, MinimaxConfig::default().with_depth(4)).unwrap();
//! let chosen = agent.select_move(&board, &moves).unwrap();
//!
//! assert!(moves.contains(&chosen));
//! ```

mod agent;
pub mod checkers;
pub mod error;
pub mod mcts;
pub mod minimax;

pub use agent::Agent;
pub use checkers::{Board, Cell, Move, Player, Square};
pub use error::{ConfigError, ParseBoardError};
pub use mcts::{MctsAgent, MctsConfig};
pub use minimax::{MinimaxAgent, MinimaxConfig};
