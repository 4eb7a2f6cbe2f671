use super::{Board, Cell, Player, Square};

/// Static evaluation of a position from `player`'s point of view, in [-1, 1].
pub type ValuationFn = fn(&Board, Player, &PieceWeights) -> f64;

pub const WIN: f64 = 1.0;
pub const LOSS: f64 = -1.0;

// pieces each side starts with; bounds the material one side can ever have
const MAX_PIECES: f64 = 12.0;

/*====================================================================================================================*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceWeights {
    pub man: f64,
    pub king: f64,
}

impl Default for PieceWeights {
    fn default() -> Self {
        PieceWeights { man: 1.0, king: 3.0 }
    }
}

impl PieceWeights {
    pub fn of(&self, cell: Cell) -> f64 {
        match cell {
            Cell::Empty => 0.0,
            _ if cell.is_king() => self.king,
            _ => self.man,
        }
    }

    /// material of twelve pieces of the heavier kind, the most one side can own
    pub fn max_material(&self) -> f64 {
        MAX_PIECES * self.man.max(self.king)
    }
}

/*====================================================================================================================*/

struct Material {
    score: f64,
    own_pieces: usize,
    enemy_pieces: usize,
}

fn material(board: &Board, player: Player, weights: &PieceWeights) -> Material {
    let mut material = Material {
        score: 0.0,
        own_pieces: 0,
        enemy_pieces: 0,
    };

    for square in Square::playable() {
        let cell = board.get(square);

        match cell.owner() {
            Some(owner) if owner == player => {
                material.score += weights.of(cell);
                material.own_pieces += 1;
            }
            Some(_) => {
                material.score -= weights.of(cell);
                material.enemy_pieces += 1;
            }
            None => {}
        }
    }

    material
}

// a side without pieces has lost whatever the material count says
fn decided(material: &Material) -> Option<f64> {
    if material.own_pieces == 0 {
        Some(LOSS)
    } else if material.enemy_pieces == 0 {
        Some(WIN)
    } else {
        None
    }
}

fn normalise(score: f64, weights: &PieceWeights) -> f64 {
    (score / weights.max_material()).clamp(LOSS, WIN)
}

/// Signed material count: own pieces add their weight, enemy pieces subtract it.
pub fn material_valuation(board: &Board, player: Player, weights: &PieceWeights) -> f64 {
    let material = material(board, player, weights);

    if let Some(value) = decided(&material) {
        return value;
    }

    normalise(material.score, weights)
}

/// Material plus a pressure bonus: while ahead on pieces, every own king adds the inverse Manhattan distance
/// to its nearest enemy piece, which pulls winning kings toward the remaining enemies instead of idling.
pub fn king_pressure_valuation(board: &Board, player: Player, weights: &PieceWeights) -> f64 {
    let material = material(board, player, weights);

    if let Some(value) = decided(&material) {
        return value;
    }

    let mut score = material.score;

    if material.own_pieces > material.enemy_pieces {
        let enemies: Vec<Square> = board.pieces(!player).collect();

        for king in board.pieces(player).filter(|&square| board.get(square).is_king()) {
            if let Some(nearest) = enemies.iter().map(|&enemy| king.manhattan_distance(enemy)).min() {
                score += 1.0 / nearest as f64;
            }
        }
    }

    normalise(score, weights)
}

/*====================================================================================================================*/
