//! Core colour and piece-kind enums shared by every rule subsystem.

use std::fmt;

use crate::errors::ValidationError;

/// Side to move, and owner of every piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn advance for this colour.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row holding this colour's pieces at the start of the game.
    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    #[inline]
    pub const fn code(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            _ => Err(ValidationError::InvalidSideToMove(code.to_owned())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Piece kind without any per-piece state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Rook token written by the description generator. `Rook` is accepted on
/// input as well.
pub const ROOK_CODE: &str = "Rock";

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Whether this kind slides along ranks and files.
    #[inline]
    pub const fn slides_straight(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    /// Whether this kind slides along diagonals.
    #[inline]
    pub const fn slides_diagonally(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }

    #[inline]
    pub const fn is_minor(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }

    pub const fn code(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => ROOK_CODE,
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code {
            "Pawn" => Ok(PieceKind::Pawn),
            "Knight" => Ok(PieceKind::Knight),
            "Bishop" => Ok(PieceKind::Bishop),
            "Rook" | "Rock" => Ok(PieceKind::Rook),
            "Queen" => Ok(PieceKind::Queen),
            "King" => Ok(PieceKind::King),
            _ => Err(ValidationError::UnknownPieceCode(code.to_owned())),
        }
    }
}
