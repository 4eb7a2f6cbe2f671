use super::board::{Board, Player};
use super::moves::{Move, Square};

impl Board {
    /// All legal moves for `player`. Captures are forced: as soon as any piece can jump, only jump sequences
    /// are returned, and every jump sequence runs as far as it can. An empty list means the player is stuck.
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut has_jump = false;

        for square in self.pieces(player) {
            let jumps = self.legal_jumps_from(square);

            if !jumps.is_empty() {
                // first jump found anywhere: drop the simple moves collected so far
                if !has_jump {
                    moves.clear();
                    has_jump = true;
                }
                moves.extend(jumps);
            } else if !has_jump {
                moves.extend(self.steps_from(square));
            }
        }

        moves
    }

    /// simple one-cell moves of the piece on `square`
    fn steps_from(&self, square: Square) -> impl Iterator<Item = Move> + '_ {
        self.get(square)
            .directions()
            .iter()
            .filter_map(move |&(d_row, d_col)| square.offset(d_row, d_col, 1))
            .filter(move |&to| self.get(to).is_empty())
            .map(move |to| Move::new(vec![square, to]))
    }

    /// Landing square of a capture from `from` along `(d_row, d_col)`: the neighbour has to hold an enemy of
    /// `owner` and the cell beyond it has to be empty.
    fn jump_target(&self, from: Square, owner: Player, d_row: i8, d_col: i8) -> Option<Square> {
        let over = from.offset(d_row, d_col, 1)?;
        let to = from.offset(d_row, d_col, 2)?;

        if self.get(over).owner() == Some(!owner) && self.get(to).is_empty() {
            Some(to)
        } else {
            None
        }
    }

    /// maximal jump sequences of the piece on `square`, empty if it can't capture
    pub fn legal_jumps_from(&self, square: Square) -> Vec<Move> {
        let piece = self.get(square);

        let Some(owner) = piece.owner() else {
            return Vec::new();
        };

        let mut scratch = self.clone();
        let mut path = vec![square];
        let mut candidates = Vec::new();

        scratch.collect_jumps(owner, piece.directions(), &mut path, &mut candidates);

        retain_maximal(&mut candidates);

        candidates.into_iter().map(Move::new).collect()
    }

    /// Depth-first search over chained captures. Every path reached is pushed as a candidate, the board is
    /// restored to its pre-branch state before the next direction is tried. The piece keeps the directions
    /// it started the turn with, so a man crowned mid-chain stops there.
    fn collect_jumps(
        &mut self,
        owner: Player,
        directions: &[(i8, i8)],
        path: &mut Vec<Square>,
        candidates: &mut Vec<Vec<Square>>,
    ) {
        let from = path[path.len() - 1];

        for &(d_row, d_col) in directions {
            let Some(to) = self.jump_target(from, owner, d_row, d_col) else {
                continue;
            };

            let snapshot = self.clone();

            self.apply_step(from, to);
            path.push(to);
            candidates.push(path.clone());

            self.collect_jumps(owner, directions, path, candidates);

            path.pop();
            *self = snapshot;
        }
    }
}

// drop every candidate that is a strict prefix of another one, i.e. a jump that could have kept going
fn retain_maximal(candidates: &mut Vec<Vec<Square>>) {
    let maximal: Vec<bool> = candidates
        .iter()
        .map(|path| {
            !candidates
                .iter()
                .any(|other| other.len() > path.len() && other.starts_with(path))
        })
        .collect();

    let mut keep = maximal.into_iter();
    candidates.retain(|_| keep.next().unwrap_or(false));
}

/*====================================================================================================================*/

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::checkers::{Board, Cell, Move, Player, Square};

    fn parse(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn assert_no_prefixes(moves: &[Move]) {
        for a in moves {
            for b in moves {
                assert!(!a.is_prefix_of(b), "{} is a partial version of {}", a, b);
            }
        }
    }

    #[test]
    fn test_opening_moves() {
        let board = Board::new();

        let dark_moves = board.legal_moves(Player::Dark);
        assert_eq!(dark_moves.len(), 7);
        assert!(dark_moves.iter().all(|m| m.from().row == 2 && m.to().row == 3 && !m.is_jump()));
        assert_eq!(dark_moves[0], Move::from_coords(&[(2, 0), (3, 1)]));

        let light_moves = board.legal_moves(Player::Light);
        assert_eq!(light_moves.len(), 7);
        assert!(light_moves.iter().all(|m| m.from().row == 5 && m.to().row == 4));
    }

    #[test]
    fn test_forced_capture() {
        // one dark man can jump, the others have plenty of simple moves
        let board = parse(
            "
            ........
            ........
            d.d...d.
            ...l....
            ........
            ........
            ........
            ........
        ",
        );

        let moves = board.legal_moves(Player::Dark);

        assert_eq!(moves, vec![Move::from_coords(&[(2, 2), (4, 4)])]);
        assert!(moves.iter().all(Move::is_jump));
    }

    #[test]
    fn test_capture_found_late_discards_earlier_steps() {
        // the light man on row 1 is scanned first and has two simple moves, the capturing man comes last
        let board = parse(
            "
            ........
            .l......
            ........
            ........
            ........
            .....d..
            ......l.
            ........
        ",
        );

        let moves = board.legal_moves(Player::Light);

        assert_eq!(moves, vec![Move::from_coords(&[(6, 6), (4, 4)])]);
    }

    #[test]
    fn test_double_jump_is_maximal() {
        let board = parse(
            "
            ........
            .d......
            ..l.....
            ........
            ....l...
            ........
            ........
            ........
        ",
        );

        let moves = board.legal_moves(Player::Dark);

        assert_eq!(moves, vec![Move::from_coords(&[(1, 1), (3, 3), (5, 5)])]);
        assert!(!moves.contains(&Move::from_coords(&[(1, 1), (3, 3)])));
    }

    #[test]
    fn test_branching_triple_jump() {
        // after the first capture dark can turn left (one more capture) or right (two more)
        let board = parse(
            "
            ....d...
            ...l....
            ........
            .l.l....
            ........
            .....l..
            ........
            ........
        ",
        );

        let moves = board.legal_moves(Player::Dark);

        let expected: HashSet<Move> = [
            Move::from_coords(&[(0, 4), (2, 2), (4, 0)]),
            Move::from_coords(&[(0, 4), (2, 2), (4, 4), (6, 6)]),
        ]
        .into_iter()
        .collect();

        assert_eq!(moves.len(), 2);
        assert_eq!(moves.iter().cloned().collect::<HashSet<Move>>(), expected);
        assert_no_prefixes(&moves);
    }

    #[test]
    fn test_king_jumps_backwards() {
        let board = parse(
            "
            ........
            ........
            ........
            ........
            ....l...
            ........
            ..l.....
            .D......
        ",
        );

        // the king captures toward its own back row
        let moves = board.legal_moves(Player::Dark);

        assert_eq!(moves, vec![Move::from_coords(&[(7, 1), (5, 3), (3, 5)])]);

        // a man next to the same light piece can't capture it backwards
        let mut man_board = board.clone();
        man_board.set_piece(Square::new(7, 1), Cell::Empty);
        man_board.set_piece(Square::new(5, 5), Cell::DarkMan);

        let moves = man_board.legal_moves(Player::Dark);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| !m.is_jump()));
    }

    #[test]
    fn test_man_stops_when_crowned() {
        // as a king it could go on over (6, 6), but the jump ends on the promotion row
        let board = parse(
            "
            ........
            ........
            ........
            ........
            ........
            ...d....
            ....l.l.
            ........
        ",
        );

        let moves = board.legal_moves(Player::Dark);
        assert_eq!(moves, vec![Move::from_coords(&[(5, 3), (7, 5)])]);

        let mut after = board.clone();
        after.apply_move(&moves[0]);
        assert_eq!(after.piece_at(7, 5), Cell::DarkKing);
        assert_eq!(after.piece_at(6, 6), Cell::LightMan);
    }

    #[test]
    fn test_no_pieces_no_moves() {
        let board = parse(
            "
            ........
            ........
            ........
            ...d....
            ........
            ........
            ........
            ........
        ",
        );

        assert!(board.legal_moves(Player::Light).is_empty());
        assert!(!board.legal_moves(Player::Dark).is_empty());
    }

    #[test]
    fn test_blocked_pieces_have_no_moves() {
        // both diagonals of the light man are taken and the only capture lands on an occupied cell
        let board = parse(
            "
            ........
            ........
            ........
            ........
            ........
            ...d....
            d.d.....
            .l......
        ",
        );

        assert!(board.legal_moves(Player::Light).is_empty());
        assert_eq!(board.count_pieces_of(Player::Light), 1);
    }

    #[test]
    fn test_legality_closure_over_random_games() {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let mut board = Board::new();
            let mut player = Player::Dark;

            for _ in 0..120 {
                let moves = board.legal_moves(player);
                if moves.is_empty() {
                    break;
                }

                assert_no_prefixes(&moves);
                assert!(moves.iter().all(|m| m.is_jump()) || moves.iter().all(|m| !m.is_jump()));

                let move_ = moves.choose(&mut rng).unwrap();
                let before = board.count_pieces();

                assert_eq!(board.get(move_.from()).owner(), Some(player));
                assert!(move_.squares()[1..].iter().all(|&sq| board.get(sq).is_empty() || sq == move_.from()));

                board.apply_move(move_);

                let landed = board.get(move_.to());
                assert_eq!(landed.owner(), Some(player));
                assert!(move_.squares().iter().all(Square::is_playable));
                if move_.to().row == player.promotion_row() {
                    assert!(landed.is_king());
                }

                let captured = if move_.is_jump() { move_.squares().len() - 1 } else { 0 };
                assert_eq!(board.count_pieces(), before - captured);

                player = !player;
            }
        }
    }
}
