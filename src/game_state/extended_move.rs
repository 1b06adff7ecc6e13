//! Fully annotated record of an applied move.
//!
//! Together with the board as it stands after the move, an [`ExtendedMove`]
//! holds everything needed to undo that move exactly and to analyse the
//! check it may have given incrementally.

use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board::square_set::SquareSet;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::game_status::GameStatus;
use crate::pieces::piece::Piece;

/// The castling rook and where it ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRook {
    /// The rook as it stood before castling.
    pub rook: Piece,
    pub destination: Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedMove {
    /// The move as requested; `e1-h1` style for castling.
    pub mv: Move,
    pub mover: Color,
    /// Square the moving piece left.
    pub origin: Square,
    /// Square the moving piece ended on, normalised for castling.
    pub destination: Square,
    /// Piece taken on `destination`.
    pub captured: Option<Piece>,
    /// Pawn removed by an en passant capture.
    pub en_passant_victim: Option<Piece>,
    pub castling: Option<CastlingRook>,
    /// Kind the pawn was replaced with, if the move promoted.
    pub promotion: Option<PieceKind>,
    /// Pawns flagged as just double-stepped before the move.
    pub prior_en_passant: SquareSet,
    pub prior_halfmove_clock: u32,
    pub prior_status: GameStatus,
}

impl ExtendedMove {
    #[inline]
    pub fn is_castling(&self) -> bool {
        self.castling.is_some()
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.en_passant_victim.is_some()
    }

    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || self.en_passant_victim.is_some()
    }
}
