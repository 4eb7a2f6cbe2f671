use crate::agent::Agent;
use crate::error::ConfigError;
use crate::{Board, Move, Player};

use super::search::{minimax_search, MinimaxConfig};

pub struct MinimaxAgent {
    player: Player,

    config: MinimaxConfig,
}

impl MinimaxAgent {
    pub fn new(player: Player, config: MinimaxConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(MinimaxAgent { player, config })
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }
}

impl Agent for MinimaxAgent {
    fn select_move(&mut self, board: &Board, legal_moves: &[Move]) -> Option<Move> {
        match legal_moves {
            [] => None,
            // nothing to search for
            [only] => Some(only.clone()),
            _ => minimax_search(board, self.player, legal_moves, &self.config).map(|(move_, _)| move_),
        }
    }
}

/*====================================================================================================================*/
