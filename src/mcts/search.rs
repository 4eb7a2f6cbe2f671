use rand::Rng;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::{Board, Move, Player};

use super::node::{NodeId, SearchTree};

/*====================================================================================================================*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    /// select, expand, simulate, backpropagate cycles per decision
    pub iterations: u32,
    /// weight of the exploration term of UCB1
    pub exploration: f64,
    /// plies without a capture after which a playout counts as a draw
    pub draw_plies: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            iterations: 1000,
            exploration: std::f64::consts::SQRT_2,
            draw_plies: 40,
        }
    }
}

impl MctsConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_draw_plies(mut self, draw_plies: u32) -> Self {
        self.draw_plies = draw_plies;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !(self.exploration.is_finite() && self.exploration >= 0.0) {
            return Err(ConfigError::InvalidExploration(self.exploration));
        }
        if self.draw_plies == 0 {
            return Err(ConfigError::ZeroDrawPlies);
        }

        Ok(())
    }
}

/*====================================================================================================================*/

/// Result of a playout, seen from the side that moved into the simulated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

/*====================================================================================================================*/

pub struct MctsSearch {
    config: MctsConfig,

    tree: SearchTree,
}

impl MctsSearch {
    /// fresh search for `player`, who is about to move on `board`
    pub fn new(board: &Board, player: Player, config: MctsConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(MctsSearch {
            config,
            tree: SearchTree::new(board.clone(), player),
        })
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Grows the tree for `config.iterations` cycles and returns the move of the most played root child, or
    /// `None` if there are no moves. The root's children are exactly `legal_moves`.
    pub fn run<R: Rng>(&mut self, legal_moves: &[Move], rng: &mut R) -> Option<Move> {
        if legal_moves.is_empty() {
            return None;
        }

        let root = self.tree.root();

        for _ in 0..self.config.iterations {
            let leaf = self.select();

            // the root is only a leaf in the first cycle, it takes the caller's moves instead of its own
            let expanded = if leaf == root && self.tree[root].is_leaf() {
                self.tree.expand(root, legal_moves);
                true
            } else {
                self.expand(leaf)
            };

            let simulated = if expanded {
                self.best_child(leaf).unwrap_or(leaf)
            } else {
                leaf
            };

            let outcome = self.simulate(simulated, rng);
            self.backpropagate(simulated, outcome);
        }

        let best = self.most_played()?;

        for (i, (_, child)) in self.tree.children(root).enumerate() {
            trace!(
                child = i,
                wins = child.wins(),
                playouts = child.playouts(),
                win_rate = child.win_rate(),
                "move {}",
                child.move_taken().map(ToString::to_string).unwrap_or_default()
            );
        }

        let best_node = &self.tree[best];
        debug!(
            iterations = self.config.iterations,
            nodes = self.tree.len(),
            playouts = best_node.playouts(),
            win_rate = best_node.win_rate(),
            "mcts picked {}",
            best_node.move_taken().map(ToString::to_string).unwrap_or_default()
        );

        best_node.move_taken().cloned()
    }

    /// follow the highest UCB1 child down to a leaf
    fn select(&self) -> NodeId {
        let mut node = self.tree.root();

        while let Some(child) = self.best_child(node) {
            node = child;
        }

        node
    }

    fn ucb(&self, id: NodeId) -> f64 {
        let node = &self.tree[id];

        if node.playouts() == 0 {
            return f64::INFINITY;
        }

        let parent_playouts = node
            .parent()
            .map(|parent| self.tree[parent].playouts())
            .unwrap_or_default() as f64;

        let playouts = node.playouts() as f64;

        node.wins() / playouts + self.config.exploration * (parent_playouts.ln() / playouts).sqrt()
    }

    /// child with the highest UCB1 value, the first one on ties; `None` for a leaf
    fn best_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;

        for &child in self.tree[id].children() {
            let value = self.ucb(child);

            if best.is_none() || value > best_value {
                best = Some(child);
                best_value = value;
            }
        }

        best
    }

    /// Adds a child per move of the leaf's side to move. Returns false if that side is stuck, the leaf is
    /// terminal then and stays a leaf.
    fn expand(&mut self, leaf: NodeId) -> bool {
        let node = &self.tree[leaf];
        let legal_moves = node.board().legal_moves(node.enemy());

        if legal_moves.is_empty() {
            return false;
        }

        self.tree.expand(leaf, &legal_moves);

        true
    }

    /// Random playout from a copy of the node's board, the node's side to move starts.
    fn simulate<R: Rng>(&self, id: NodeId, rng: &mut R) -> Outcome {
        let node = &self.tree[id];

        let mut board = node.board().clone();
        let sides = [node.enemy(), node.player()];

        let mut ply = 0;
        let mut plies_to_draw = self.config.draw_plies;
        let mut pieces = board.count_pieces();

        loop {
            let legal_moves = board.legal_moves(sides[ply % 2]);

            if legal_moves.is_empty() {
                // the side that got stuck has lost
                return if ply % 2 == 0 { Outcome::Win } else { Outcome::Lose };
            }

            let move_ = &legal_moves[rng.gen_range(0..legal_moves.len())];
            board.apply_move(move_);

            let pieces_after = board.count_pieces();

            if pieces_after < pieces {
                plies_to_draw = self.config.draw_plies;
                pieces = pieces_after;
            } else {
                plies_to_draw = plies_to_draw.saturating_sub(1);
                if plies_to_draw == 0 {
                    return Outcome::Draw;
                }
            }

            ply += 1;
        }
    }

    /// Credits `outcome` along the path from `id` to the root. The sides alternate along the path, so the
    /// simulated node and every second ancestor share its player.
    fn backpropagate(&mut self, id: NodeId, outcome: Outcome) {
        let path: Vec<NodeId> = self.tree.path_to_root(id).collect();

        for (depth, node_id) in path.into_iter().enumerate() {
            let node = self.tree.get_mut(node_id);

            match outcome {
                Outcome::Win if depth % 2 == 0 => node.add_win(),
                Outcome::Lose if depth % 2 == 1 => node.add_win(),
                Outcome::Draw => node.add_draw(),
                _ => {}
            }

            node.add_playout();
        }
    }

    /// root child with the most playouts, the first one on ties
    fn most_played(&self) -> Option<NodeId> {
        let mut best = None;
        let mut best_playouts = 0;

        for (id, child) in self.tree.children(self.tree.root()) {
            if best.is_none() || child.playouts() > best_playouts {
                best = Some(id);
                best_playouts = child.playouts();
            }
        }

        best
    }
}

/// One-shot MCTS decision for `player` among `legal_moves` on `board`.
pub fn mcts_search<R: Rng>(
    board: &Board,
    player: Player,
    legal_moves: &[Move],
    config: &MctsConfig,
    rng: &mut R,
) -> Result<Option<Move>, ConfigError> {
    Ok(MctsSearch::new(board, player, *config)?.run(legal_moves, rng))
}

/*====================================================================================================================*/
