//! Board square flyweights and algebraic coordinate conversions.
//!
//! All 64 squares live in the precomputed [`SQUARES`] table. Indexing follows
//! `0 == a1`, `7 == h1`, `63 == h8`: the row is the rank minus one and the
//! column is the file. Equality is by coordinate.

use std::fmt;
use std::str::FromStr;

use crate::board::square_set::SquareSet;
use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

pub const SQUARES: [Square; 64] = build_squares();

const fn build_squares() -> [Square; 64] {
    let mut table = [Square { row: 0, col: 0 }; 64];
    let mut index = 0usize;

    while index < 64 {
        table[index] = Square {
            row: (index / 8) as u8,
            col: (index % 8) as u8,
        };
        index += 1;
    }

    table
}

/// Unit steps along ranks and files.
pub const STRAIGHT_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Unit steps along diagonals.
pub const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl Square {
    /// Square at `row`/`col`, or `None` off the board.
    #[inline]
    pub const fn at(row: i8, col: i8) -> Option<Square> {
        if row < 0 || row > 7 || col < 0 || col > 7 {
            None
        } else {
            Some(SQUARES[(row as usize) * 8 + col as usize])
        }
    }

    /// Square for a linear index. Indices wrap at 64.
    #[inline]
    pub const fn from_index(index: usize) -> Square {
        SQUARES[index & 63]
    }

    #[inline]
    pub const fn index(self) -> usize {
        (self.row as usize) * 8 + self.col as usize
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Square reached by moving `d_row`/`d_col`, or `None` when that leaves the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        Square::at(self.row as i8 + d_row, self.col as i8 + d_col)
    }

    /// Same rank or same file.
    #[inline]
    pub fn is_straight(self, other: Square) -> bool {
        self != other && (self.row == other.row || self.col == other.col)
    }

    /// Same diagonal or anti-diagonal.
    #[inline]
    pub fn is_diagonal(self, other: Square) -> bool {
        self != other && self.row.abs_diff(other.row) == self.col.abs_diff(other.col)
    }

    /// Either straight or diagonal.
    #[inline]
    pub fn is_aligned(self, other: Square) -> bool {
        self.is_straight(other) || self.is_diagonal(other)
    }

    /// Unit step leading from `self` towards an aligned `other`.
    pub fn direction_to(self, other: Square) -> Option<(i8, i8)> {
        if !self.is_aligned(other) {
            return None;
        }

        let d_row = (other.row as i8 - self.row as i8).signum();
        let d_col = (other.col as i8 - self.col as i8).signum();
        Some((d_row, d_col))
    }

    /// Squares strictly between `self` and an aligned `other`; empty otherwise.
    pub fn between(self, other: Square) -> SquareSet {
        let mut out = SquareSet::EMPTY;
        let Some((d_row, d_col)) = self.direction_to(other) else {
            return out;
        };

        let mut current = self.offset(d_row, d_col);
        while let Some(square) = current {
            if square == other {
                break;
            }
            out.insert(square);
            current = square.offset(d_row, d_col);
        }

        out
    }

    /// Parse long algebraic notation such as `e4`.
    pub fn parse(code: &str) -> Result<Square, ValidationError> {
        let bytes = code.as_bytes();
        if bytes.len() != 2 {
            return Err(ValidationError::InvalidSquare(code.to_owned()));
        }

        let file = bytes[0];
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(ValidationError::InvalidSquare(code.to_owned()));
        }

        Ok(SQUARES[((rank - b'1') as usize) * 8 + (file - b'a') as usize])
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file_char = char::from(b'a' + self.col);
        let rank_char = char::from(b'1' + self.row);
        write!(f, "{file_char}{rank_char}")
    }
}

impl FromStr for Square {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::parse(s)
    }
}
