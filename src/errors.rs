//! Errors used throughout the rules engine.
//!
//! Two classes of failure exist:
//!
//! - [`ValidationError`] covers malformed external input: description text,
//!   square or move codes, FEN strings, out-of-range Chess960 indices and
//!   promotion choices that are not one of the four legal replacements. These
//!   are recoverable and suitable for presenting to end users.
//! - [`ProtocolViolation`] covers a consumer breaking the move/undo protocol:
//!   moving from an empty square, moving the wrong colour, applying a move that
//!   is not legal, or undoing with an empty stack. These indicate an
//!   integration bug and are not intended to be recovered from.
//!
//! Both wrap into [`ChessError`], the single error type returned by fallible
//! game operations.

use thiserror::Error;

use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::game_state::chess_types::{Color, PieceKind};

/// Malformed input supplied from outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A square code was not a file `a..h` followed by a rank `1..8`.
    #[error("invalid square code: {0:?}")]
    InvalidSquare(String),

    /// A move code was not of the form `<from>-<to>`.
    #[error("invalid move code: {0:?}")]
    InvalidMove(String),

    /// The side-to-move token was neither `white` nor `black`.
    #[error("invalid side to move: {0:?}")]
    InvalidSideToMove(String),

    /// The halfmove clock was not a non-negative integer.
    #[error("invalid halfmove clock: {0:?}")]
    InvalidHalfmoveClock(String),

    /// A leading description field was absent.
    #[error("description is missing the {0}")]
    MissingField(&'static str),

    /// A piece token named an unknown piece kind.
    #[error("unknown piece code: {0:?}")]
    UnknownPieceCode(String),

    /// A piece token had the wrong shape or an unparsable extra field.
    #[error("malformed piece token: {0:?}")]
    MalformedPiece(String),

    /// Two piece tokens named the same square.
    #[error("square {0} is occupied twice")]
    DuplicateSquare(Square),

    /// Every position needs exactly one king per colour.
    #[error("expected exactly one {color} king, found {count}")]
    KingCount { color: Color, count: usize },

    /// Pawns can never stand on the first or last rank.
    #[error("pawn placed on back rank square {0}")]
    PawnOnBackRank(Square),

    /// Chess960 start positions are numbered `0..960`.
    #[error("Chess960 index {0} is out of range 0..960")]
    Chess960IndexOutOfRange(u32),

    /// The promotion collaborator answered with a piece a pawn cannot become.
    #[error("invalid promotion choice: {0:?}")]
    InvalidPromotionChoice(PieceKind),

    /// A FEN string could not be interpreted.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

/// The caller broke the move/undo protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    /// A move started on a square without a piece.
    #[error("no piece on {0}")]
    EmptySquare(Square),

    /// A move tried to relocate a piece of the side not on move.
    #[error("piece on {square} is {found}, but {expected} is to move")]
    WrongColor {
        square: Square,
        found: Color,
        expected: Color,
    },

    /// The move is not in the legal move set of the current position.
    #[error("move {0} is not legal in the current position")]
    IllegalMove(Move),

    /// `undo` was called with nothing left to undo.
    #[error("undo requested with an empty move stack")]
    EmptyUndoStack,
}

/// Unified error type for fallible engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),
}

impl ChessError {
    /// True for internal precondition violations, which callers should treat
    /// as fatal rather than retry.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, ChessError::Protocol(_))
    }
}

pub type ChessResult<T> = Result<T, ChessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classes_are_distinguishable() {
        let validation: ChessError = ValidationError::Chess960IndexOutOfRange(960).into();
        let protocol: ChessError = ProtocolViolation::EmptyUndoStack.into();

        assert!(!validation.is_protocol_violation());
        assert!(protocol.is_protocol_violation());
        assert_eq!(
            validation.to_string(),
            "Chess960 index 960 is out of range 0..960"
        );
    }
}
