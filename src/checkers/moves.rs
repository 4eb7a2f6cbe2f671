use std::fmt::{Debug, Display};

pub const BOARD_SIZE: u8 = 8;

/*====================================================================================================================*/

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Square { row, col }
    }

    /// Half the grid never holds a piece: only cells with matching row and column parity are played on.
    pub fn is_playable(&self) -> bool {
        self.row % 2 == self.col % 2
    }

    /// Square `steps` cells away along `(d_row, d_col)`, or `None` if that leaves the board.
    pub fn offset(&self, d_row: i8, d_col: i8, steps: i8) -> Option<Square> {
        let row = self.row as i8 + d_row * steps;
        let col = self.col as i8 + d_col * steps;

        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn manhattan_distance(&self, other: Square) -> u8 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// all playable squares in row-major order
    pub fn playable() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
            .filter(Square::is_playable)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Square({}, {})", self.row, self.col)
    }
}

/*====================================================================================================================*/

/// A single step or a chain of captures, stored as the squares the piece visits.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Move {
    squares: Vec<Square>,
}

impl Move {
    pub fn new(squares: Vec<Square>) -> Self {
        assert!(squares.len() >= 2, "A move needs at least a start and a target square");

        Move { squares }
    }

    pub fn from_coords(coords: &[(u8, u8)]) -> Self {
        Move::new(coords.iter().map(|&(row, col)| Square::new(row, col)).collect())
    }

    pub fn from(&self) -> Square {
        self.squares[0]
    }

    pub fn to(&self) -> Square {
        self.squares[self.squares.len() - 1]
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// consecutive (from, to) pairs, one per step of the chain
    pub fn steps(&self) -> impl Iterator<Item = (Square, Square)> + '_ {
        self.squares.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn is_jump(&self) -> bool {
        self.steps()
            .all(|(from, to)| from.row.abs_diff(to.row) == 2 && from.col.abs_diff(to.col) == 2)
    }

    pub fn is_prefix_of(&self, other: &Move) -> bool {
        self.squares.len() < other.squares.len() && other.squares.starts_with(&self.squares)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, square) in self.squares.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", square)?;
        }

        Ok(())
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Move({})", self)
    }
}

/*====================================================================================================================*/
