//! From→to move flyweights.
//!
//! Every pair of squares has a canonical entry in the [`MOVES`] table. A move
//! carries no piece or flag information; castling is expressed as the king
//! moving onto its own rook (`e1-h1`), en passant and promotion are inferred
//! from the position when the move is applied.

use std::fmt;
use std::str::FromStr;

use crate::board::square::{Square, SQUARES};
use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
}

pub static MOVES: [[Move; 64]; 64] = build_moves();

const fn build_moves() -> [[Move; 64]; 64] {
    let mut table = [[Move {
        from: SQUARES[0],
        to: SQUARES[0],
    }; 64]; 64];
    let mut from = 0usize;

    while from < 64 {
        let mut to = 0usize;
        while to < 64 {
            table[from][to] = Move {
                from: SQUARES[from],
                to: SQUARES[to],
            };
            to += 1;
        }
        from += 1;
    }

    table
}

impl Move {
    #[inline]
    pub fn new(from: Square, to: Square) -> Move {
        MOVES[from.index()][to.index()]
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Extend the destination by one step, keeping the origin. Returns `None`
    /// when the step leaves the board.
    #[inline]
    pub fn step(self, d_row: i8, d_col: i8) -> Option<Move> {
        self.to.offset(d_row, d_col).map(|to| Move::new(self.from, to))
    }

    /// Parse a move code such as `e2-e4`.
    pub fn parse(code: &str) -> Result<Move, ValidationError> {
        let (from, to) = code
            .split_once('-')
            .ok_or_else(|| ValidationError::InvalidMove(code.to_owned()))?;
        let from = Square::parse(from).map_err(|_| ValidationError::InvalidMove(code.to_owned()))?;
        let to = Square::parse(to).map_err(|_| ValidationError::InvalidMove(code.to_owned()))?;
        Ok(Move::new(from, to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}
