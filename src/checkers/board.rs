use std::fmt::Display;
use std::str::FromStr;

use super::moves::{Move, Square, BOARD_SIZE};
use crate::error::ParseBoardError;

/*====================================================================================================================*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Dark,
    Light,
}

// flip the player, i.e. Dark -> Light and Light -> Dark
impl std::ops::Not for Player {
    type Output = Player;

    fn not(self) -> Self::Output {
        match self {
            Player::Dark => Player::Light,
            Player::Light => Player::Dark,
        }
    }
}

impl Player {
    /// the row a man of this colour is crowned on
    pub fn promotion_row(&self) -> u8 {
        match self {
            Player::Dark => BOARD_SIZE - 1,
            Player::Light => 0,
        }
    }

    /// the two diagonals pointing at the opponent's side
    pub fn forward_directions(&self) -> &'static [(i8, i8)] {
        match self {
            Player::Dark => &DIRECTIONS[..2],
            Player::Light => &DIRECTIONS[2..],
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Dark => write!(f, "Dark"),
            Player::Light => write!(f, "Light"),
        }
    }
}

/// All four diagonals. Dark's forward pair comes first, Light's second.
pub static DIRECTIONS: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];

/*====================================================================================================================*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    DarkMan,
    DarkKing,
    LightMan,
    LightKing,
}

impl Cell {
    pub fn king(player: Player) -> Self {
        match player {
            Player::Dark => Cell::DarkKing,
            Player::Light => Cell::LightKing,
        }
    }

    pub fn owner(&self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::DarkMan | Cell::DarkKing => Some(Player::Dark),
            Cell::LightMan | Cell::LightKing => Some(Player::Light),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }

    pub fn is_king(&self) -> bool {
        matches!(self, Cell::DarkKing | Cell::LightKing)
    }

    /// diagonals this piece may move and jump along; empty for an empty cell
    pub fn directions(&self) -> &'static [(i8, i8)] {
        match self.owner() {
            None => &DIRECTIONS[..0],
            Some(_) if self.is_king() => &DIRECTIONS[..],
            Some(player) => player.forward_directions(),
        }
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::DarkMan => 'd',
            Cell::DarkKing => 'D',
            Cell::LightMan => 'l',
            Cell::LightKing => 'L',
        }
    }

    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Cell::Empty),
            'd' => Some(Cell::DarkMan),
            'D' => Some(Cell::DarkKing),
            'l' => Some(Cell::LightMan),
            'L' => Some(Cell::LightKing),
            _ => None,
        }
    }
}

/*====================================================================================================================*/

// rows of men each side starts with
const SETUP_ROWS: u8 = 3;

/// 8x8 checkers board. Row 0 is Dark's back row, row 7 is Light's.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// standard opening position: 12 dark men on rows 0..3, 12 light men on rows 5..8
    pub fn new() -> Self {
        let mut board = Board::empty();

        for square in Square::playable() {
            if square.row < SETUP_ROWS {
                board.set_piece(square, Cell::DarkMan);
            } else if square.row >= BOARD_SIZE - SETUP_ROWS {
                board.set_piece(square, Cell::LightMan);
            }
        }

        board
    }

    pub fn empty() -> Self {
        Board {
            cells: [[Cell::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    pub fn piece_at(&self, row: u8, col: u8) -> Cell {
        self.cells[row as usize][col as usize]
    }

    pub fn get(&self, square: Square) -> Cell {
        self.piece_at(square.row, square.col)
    }

    pub fn set_piece(&mut self, square: Square, cell: Cell) {
        self.cells[square.row as usize][square.col as usize] = cell;
    }

    /// Applies every step of the move in order. The move is assumed to be legal on this board; applying it
    /// a second time corrupts the position, so clone before trying alternatives.
    pub fn apply_move(&mut self, move_: &Move) {
        for (from, to) in move_.steps() {
            self.apply_step(from, to);
        }
    }

    /// Moves the piece on `from` to `to`, removes the jumped piece if the step is a capture and crowns a man
    /// that lands on its promotion row.
    pub(crate) fn apply_step(&mut self, from: Square, to: Square) {
        let piece = self.get(from);

        if from.row.abs_diff(to.row) == 2 && from.col.abs_diff(to.col) == 2 {
            let captured = Square::new((from.row + to.row) / 2, (from.col + to.col) / 2);
            self.set_piece(captured, Cell::Empty);
        }

        self.set_piece(from, Cell::Empty);
        self.set_piece(to, piece);

        if let Some(player) = piece.owner() {
            if !piece.is_king() && to.row == player.promotion_row() {
                self.set_piece(to, Cell::king(player));
            }
        }
    }

    /// number of pieces of both colours; a drop between two positions means a capture happened
    pub fn count_pieces(&self) -> usize {
        Square::playable().filter(|&square| !self.get(square).is_empty()).count()
    }

    pub fn count_pieces_of(&self, player: Player) -> usize {
        self.pieces(player).count()
    }

    /// squares holding a piece of `player`, row-major
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Square> + '_ {
        Square::playable().filter(move |&square| self.get(square).owner() == Some(player))
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board(\n{}\n)", self)
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|line| !line.is_empty()).collect();

        if rows.len() != BOARD_SIZE as usize {
            return Err(ParseBoardError::RowCount { found: rows.len() });
        }

        let mut board = Board::empty();

        for (row, line) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != BOARD_SIZE as usize {
                return Err(ParseBoardError::RowWidth { row, found: width });
            }

            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::from_char(ch).ok_or(ParseBoardError::UnknownCell { ch, row, col })?;

                if cell.is_empty() {
                    continue;
                }

                let square = Square::new(row as u8, col as u8);

                if !square.is_playable() {
                    return Err(ParseBoardError::NonPlayableCell { row, col });
                }

                if let Some(player) = cell.owner() {
                    if !cell.is_king() && square.row == player.promotion_row() {
                        return Err(ParseBoardError::ManOnPromotionRow { row, col });
                    }
                }

                board.set_piece(square, cell);
            }
        }

        Ok(board)
    }
}

/*====================================================================================================================*/
