use std::sync::{Arc, Mutex};
use std::time::Instant;

use threadpool::ThreadPool;
use tracing::debug;

use crate::checkers::valuation::{king_pressure_valuation, LOSS, WIN};
use crate::checkers::{PieceWeights, ValuationFn};
use crate::error::ConfigError;
use crate::{Board, Move, Player};

/*====================================================================================================================*/

#[derive(Clone, Copy)]
pub struct MinimaxConfig {
    /// plies searched below the current position; nodes at this depth take the static valuation
    pub depth: u32,
    pub weights: PieceWeights,
    pub valuation_fn: ValuationFn,
    pub alpha_beta_prune: bool,
    /// worker threads the root moves are spread over; 1 searches on the calling thread
    pub threads: usize,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        MinimaxConfig {
            depth: 8,
            weights: PieceWeights::default(),
            valuation_fn: king_pressure_valuation,
            alpha_beta_prune: true,
            threads: 1,
        }
    }
}

impl std::fmt::Debug for MinimaxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinimaxConfig")
            .field("depth", &self.depth)
            .field("weights", &self.weights)
            .field("alpha_beta_prune", &self.alpha_beta_prune)
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}

impl MinimaxConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_weights(mut self, weights: PieceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_valuation_fn(mut self, valuation_fn: ValuationFn) -> Self {
        self.valuation_fn = valuation_fn;
        self
    }

    pub fn with_alpha_beta_pruning(mut self, alpha_beta_prune: bool) -> Self {
        self.alpha_beta_prune = alpha_beta_prune;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// one worker per logical core
    pub fn with_all_cores(self) -> Self {
        self.with_threads(num_cpus::get())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let PieceWeights { man, king } = self.weights;

        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if !(man.is_finite() && king.is_finite() && man > 0.0 && king > 0.0) {
            return Err(ConfigError::InvalidWeights { man, king });
        }

        Ok(())
    }
}

/*====================================================================================================================*/

struct MinimaxWorker {
    config: MinimaxConfig,

    // the side the search picks a move for; values are always from its point of view
    player: Player,

    total_nodes_visited: u64,
}

impl MinimaxWorker {
    fn new(config: MinimaxConfig, player: Player) -> Self {
        MinimaxWorker {
            config,
            player,
            total_nodes_visited: 0,
        }
    }

    /// Value of `board` with `to_move` on turn, `depth` plies below the root.
    fn minimax(&mut self, board: &Board, to_move: Player, depth: u32, alpha: f64, beta: f64) -> f64 {
        self.total_nodes_visited += 1;

        let legal_moves = board.legal_moves(to_move);

        // a stuck side has lost, no matter what the valuation would say
        if legal_moves.is_empty() {
            return if to_move == self.player { LOSS } else { WIN };
        }

        if depth >= self.config.depth {
            return (self.config.valuation_fn)(board, self.player, &self.config.weights);
        }

        let maximizing = to_move == self.player;

        let mut best_value = if maximizing { f64::NEG_INFINITY } else { f64::INFINITY };
        let mut alpha = alpha;
        let mut beta = beta;

        for move_ in legal_moves.iter() {
            let mut board_after_move = board.clone();
            board_after_move.apply_move(move_);

            let value = self.minimax(&board_after_move, !to_move, depth + 1, alpha, beta);

            if maximizing {
                if value > best_value {
                    best_value = value;
                }
                if self.config.alpha_beta_prune {
                    if best_value >= beta {
                        // beta cutoff: the minimizing parent already has something better
                        return best_value;
                    }
                    alpha = alpha.max(best_value);
                }
            } else {
                if value < best_value {
                    best_value = value;
                }
                if self.config.alpha_beta_prune {
                    if best_value <= alpha {
                        // alpha cutoff
                        return best_value;
                    }
                    beta = beta.min(best_value);
                }
            }
        }

        best_value
    }

    /// value of playing `move_` on `board`, searched with the full window
    fn evaluate_root_move(&mut self, board: &Board, move_: &Move) -> f64 {
        let mut board_after_move = board.clone();
        board_after_move.apply_move(move_);

        self.minimax(&board_after_move, !self.player, 1, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// index and value of the best root move; the first of equally good moves wins
    fn search_root(&mut self, board: &Board, legal_moves: &[Move]) -> (usize, f64) {
        let mut best_index = 0;
        let mut best_value = f64::NEG_INFINITY;

        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        for (i, move_) in legal_moves.iter().enumerate() {
            let mut board_after_move = board.clone();
            board_after_move.apply_move(move_);

            let value = self.minimax(&board_after_move, !self.player, 1, alpha, beta);

            if value > best_value {
                best_index = i;
                best_value = value;
            }

            if self.config.alpha_beta_prune {
                if best_value >= beta {
                    break;
                }
                alpha = alpha.max(best_value);
            }
        }

        (best_index, best_value)
    }
}

/*====================================================================================================================*/

// every root move gets its own job and a full window; picking the first maximum afterwards gives the same
// move and value as the sequential search
fn search_root_parallel(board: &Board, player: Player, legal_moves: &[Move], config: MinimaxConfig) -> (usize, f64, u64) {
    let pool = ThreadPool::new(config.threads.min(legal_moves.len()));

    let values = Arc::new(Mutex::new(vec![f64::NEG_INFINITY; legal_moves.len()]));
    let nodes_visited = Arc::new(Mutex::new(0u64));

    for (i, move_) in legal_moves.iter().enumerate() {
        let board = board.clone();
        let move_ = move_.clone();
        let values = Arc::clone(&values);
        let nodes_visited = Arc::clone(&nodes_visited);

        pool.execute(move || {
            let mut worker = MinimaxWorker::new(config, player);
            let value = worker.evaluate_root_move(&board, &move_);

            if let Ok(mut values) = values.lock() {
                values[i] = value;
            }
            if let Ok(mut nodes_visited) = nodes_visited.lock() {
                *nodes_visited += worker.total_nodes_visited;
            }
        });
    }

    pool.join();

    let values = values.lock().map(|values| values.clone()).unwrap_or_default();
    let nodes_visited = nodes_visited.lock().map(|n| *n).unwrap_or_default();

    let mut best_index = 0;
    let mut best_value = f64::NEG_INFINITY;

    for (i, &value) in values.iter().enumerate() {
        if value > best_value {
            best_index = i;
            best_value = value;
        }
    }

    (best_index, best_value, nodes_visited)
}

/// Depth-limited minimax over `legal_moves`, the moves `player` has on `board`. Returns the chosen move and
/// its value from `player`'s point of view, or `None` if there is nothing to choose from.
pub fn minimax_search(board: &Board, player: Player, legal_moves: &[Move], config: &MinimaxConfig) -> Option<(Move, f64)> {
    if legal_moves.is_empty() {
        return None;
    }

    let start_t = Instant::now();

    let (best_index, best_value, nodes_visited) = if config.threads > 1 && legal_moves.len() > 1 {
        search_root_parallel(board, player, legal_moves, *config)
    } else {
        let mut worker = MinimaxWorker::new(*config, player);
        let (best_index, best_value) = worker.search_root(board, legal_moves);
        (best_index, best_value, worker.total_nodes_visited)
    };

    let best_move = legal_moves[best_index].clone();

    debug!(
        player = %player,
        depth = config.depth,
        alpha_beta_prune = config.alpha_beta_prune,
        threads = config.threads,
        nodes = nodes_visited,
        nps = nodes_visited as f64 / start_t.elapsed().as_secs_f64().max(f64::EPSILON),
        "minimax picked {} with value {:.4}",
        best_move,
        best_value
    );

    Some((best_move, best_value))
}

/*====================================================================================================================*/

#[cfg(test)]
mod tests {
    use super::{minimax_search, MinimaxConfig, MinimaxWorker};
    use crate::checkers::valuation::{material_valuation, LOSS, WIN};
    use crate::checkers::PieceWeights;
    use crate::error::ConfigError;
    use crate::{Board, Move, Player};

    fn parse(s: &str) -> Board {
        s.parse().unwrap()
    }

    // plain recursive minimax with no window at all, written independently of the worker
    fn reference_minimax(board: &Board, player: Player, to_move: Player, depth: u32, config: &MinimaxConfig) -> f64 {
        let moves = board.legal_moves(to_move);

        if moves.is_empty() {
            return if to_move == player { LOSS } else { WIN };
        }
        if depth >= config.depth {
            return (config.valuation_fn)(board, player, &config.weights);
        }

        let values = moves.iter().map(|move_| {
            let mut next = board.clone();
            next.apply_move(move_);
            reference_minimax(&next, player, !to_move, depth + 1, config)
        });

        if to_move == player {
            values.fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.fold(f64::INFINITY, f64::min)
        }
    }

    fn reference_search(board: &Board, player: Player, config: &MinimaxConfig) -> (Move, f64) {
        let moves = board.legal_moves(player);
        let mut best = (moves[0].clone(), f64::NEG_INFINITY);

        for move_ in moves.iter() {
            let mut next = board.clone();
            next.apply_move(move_);
            let value = reference_minimax(&next, player, !player, 1, config);

            if value > best.1 {
                best = (move_.clone(), value);
            }
        }

        best
    }

    const MIDGAME: &str = "
        ........
        .d.d....
        d.d...d.
        ...l.d..
        ..l.....
        .l...l.l
        ....l...
        ........
    ";

    #[test]
    fn test_pruning_matches_exhaustive_search() {
        let positions = [Board::new(), parse(MIDGAME)];

        for board in positions.iter() {
            for depth in 1..=3 {
                for player in [Player::Dark, Player::Light] {
                    let moves = board.legal_moves(player);

                    let pruned = MinimaxConfig::default().with_depth(depth);
                    let exhaustive = pruned.with_alpha_beta_pruning(false);

                    let (pruned_move, pruned_value) = minimax_search(board, player, &moves, &pruned).unwrap();
                    let (full_move, full_value) = minimax_search(board, player, &moves, &exhaustive).unwrap();
                    let (reference_move, reference_value) = reference_search(board, player, &exhaustive);

                    assert_eq!(pruned_move, full_move, "depth {} for {}", depth, player);
                    assert_eq!(pruned_value, full_value);
                    assert_eq!(full_move, reference_move);
                    assert_eq!(full_value, reference_value);
                }
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let board = parse(MIDGAME);
        let moves = board.legal_moves(Player::Dark);

        let sequential = MinimaxConfig::default().with_depth(3);
        let parallel = sequential.with_threads(4);

        assert_eq!(
            minimax_search(&board, Player::Dark, &moves, &sequential),
            minimax_search(&board, Player::Dark, &moves, &parallel)
        );
    }

    #[test]
    fn test_takes_winning_capture() {
        // capturing the last light piece ends the game; the other move only shuffles
        let board = parse(
            "
            ........
            ........
            ........
            ........
            ........
            .....d..
            ......l.
            ........
        ",
        );

        let moves = vec![
            Move::from_coords(&[(5, 5), (6, 4)]),
            Move::from_coords(&[(5, 5), (7, 7)]),
        ];

        let config = MinimaxConfig::default().with_depth(4);
        let (best_move, value) = minimax_search(&board, Player::Dark, &moves, &config).unwrap();

        assert_eq!(best_move, moves[1]);
        assert_eq!(value, WIN);
    }

    // the light man is still on the board, but both diagonals are taken and the capture over (6, 2) would
    // land on (5, 3)
    const LIGHT_BLOCKED: &str = "
        ........
        ........
        ........
        ........
        ........
        ...d....
        d.d.....
        .l......
    ";

    #[test]
    fn test_blocked_side_is_decided_at_depth_limit() {
        let blocked = parse(LIGHT_BLOCKED);
        let config = MinimaxConfig::default().with_depth(1).with_valuation_fn(material_valuation);

        assert!(blocked.legal_moves(Player::Light).is_empty());
        assert_eq!(blocked.count_pieces_of(Player::Light), 1);

        // on its own the valuation only sees a small material edge
        let estimate = material_valuation(&blocked, Player::Dark, &config.weights);
        assert!(estimate > 0.0 && estimate < WIN);

        let mut dark = MinimaxWorker::new(config, Player::Dark);
        let value = dark.minimax(&blocked, Player::Light, config.depth, f64::NEG_INFINITY, f64::INFINITY);
        assert_eq!(value, WIN);

        let mut light = MinimaxWorker::new(config, Player::Light);
        let value = light.minimax(&blocked, Player::Light, config.depth, f64::NEG_INFINITY, f64::INFINITY);
        assert_eq!(value, LOSS);

        // the same position reached from the root: walling the man in is the one ply searched
        let before = parse(
            "
            ........
            ........
            ........
            ........
            ........
            .d.d....
            d.......
            .l......
        ",
        );
        let walling = Move::from_coords(&[(5, 1), (6, 2)]);

        let mut after = before.clone();
        after.apply_move(&walling);
        assert_eq!(after, blocked);

        let (_, value) = minimax_search(&before, Player::Dark, &[walling], &config).unwrap();
        assert_eq!(value, WIN);
    }

    #[test]
    fn test_stuck_opponent_is_win_without_descending() {
        // after dark's only capture light has nothing left
        let board = parse(
            "
            ........
            ........
            ..d.....
            ...l....
            ........
            ........
            ........
            ........
        ",
        );

        let moves = board.legal_moves(Player::Dark);
        let config = MinimaxConfig::default().with_depth(8).with_valuation_fn(material_valuation);

        let mut after = board.clone();
        after.apply_move(&moves[0]);
        assert!(after.legal_moves(Player::Light).is_empty());

        let (_, value) = minimax_search(&board, Player::Dark, &moves, &config).unwrap();
        assert_eq!(value, WIN);
    }

    #[test]
    fn test_avoids_losing_move() {
        // moving right walks into a capture that wipes dark out; moving left is safe for now
        let board = parse(
            "
            ........
            ........
            ........
            ........
            ..d.....
            ........
            ....l...
            ........
        ",
        );

        let moves = board.legal_moves(Player::Dark);
        assert_eq!(
            moves,
            vec![Move::from_coords(&[(4, 2), (5, 1)]), Move::from_coords(&[(4, 2), (5, 3)])]
        );

        let config = MinimaxConfig::default().with_depth(2);
        let (best_move, value) = minimax_search(&board, Player::Dark, &moves, &config).unwrap();

        assert_eq!(best_move, moves[0]);
        assert!(value > LOSS);
    }

    #[test]
    fn test_first_of_equal_moves_wins() {
        let board = Board::new();
        let moves = board.legal_moves(Player::Dark);

        // at depth 1 nothing is captured yet, every opening move is worth the same
        let config = MinimaxConfig::default().with_depth(1);
        let (best_move, value) = minimax_search(&board, Player::Dark, &moves, &config).unwrap();

        assert_eq!(best_move, moves[0]);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_empty_move_list() {
        let config = MinimaxConfig::default();
        assert_eq!(minimax_search(&Board::new(), Player::Dark, &[], &config), None);
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(MinimaxConfig::default().validate(), Ok(()));
        assert_eq!(MinimaxConfig::default().with_depth(0).validate(), Err(ConfigError::ZeroDepth));
        assert_eq!(MinimaxConfig::default().with_threads(0).validate(), Err(ConfigError::ZeroThreads));

        let weights = PieceWeights { man: 1.0, king: -3.0 };
        assert_eq!(
            MinimaxConfig::default().with_weights(weights).validate(),
            Err(ConfigError::InvalidWeights { man: 1.0, king: -3.0 })
        );

        assert!(MinimaxConfig::default().with_all_cores().threads >= 1);
    }
}
