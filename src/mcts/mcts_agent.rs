use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::Agent;
use crate::error::ConfigError;
use crate::{Board, Move, Player};

use super::search::{MctsConfig, MctsSearch};

pub struct MctsAgent<R: Rng = StdRng> {
    player: Player,

    config: MctsConfig,

    rng: R,
}

impl MctsAgent<StdRng> {
    /// agent with an entropy-seeded generator
    pub fn new(player: Player, config: MctsConfig) -> Result<Self, ConfigError> {
        MctsAgent::with_rng(player, config, StdRng::from_entropy())
    }
}

impl<R: Rng> MctsAgent<R> {
    pub fn with_rng(player: Player, config: MctsConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(MctsAgent { player, config, rng })
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl<R: Rng> Agent for MctsAgent<R> {
    fn select_move(&mut self, board: &Board, legal_moves: &[Move]) -> Option<Move> {
        match legal_moves {
            [] => None,
            [only] => Some(only.clone()),
            // a new tree every turn; the config was validated on construction
            _ => MctsSearch::new(board, self.player, self.config)
                .ok()
                .and_then(|mut search| search.run(legal_moves, &mut self.rng)),
        }
    }
}

/*====================================================================================================================*/
