//! Game description parser.
//!
//! Grammar: `<white|black> <halfmove clock> <piece token>*`, tokens separated
//! by any run of whitespace. Piece tokens are `Kind-color-square[-extra]`, see
//! [`Piece::from_code`]. A parsed position must hold exactly one king per
//! colour, no square twice and no pawn on the first or last rank.

use crate::board_store::board::Board;
use crate::errors::ValidationError;
use crate::game_state::chess_types::Color;
use crate::pieces::piece::Piece;

/// Position and clocks read from a description.
#[derive(Debug, Clone)]
pub struct GameDescription {
    pub board: Board,
    pub side_to_move: Color,
    pub halfmove_clock: u32,
}

pub fn parse_description(text: &str) -> Result<GameDescription, ValidationError> {
    let mut parts = text.split_whitespace();

    let side_part = parts.next().ok_or(ValidationError::MissingField("side to move"))?;
    let clock_part = parts.next().ok_or(ValidationError::MissingField("halfmove clock"))?;

    let side_to_move = Color::from_code(side_part)
        .map_err(|_| ValidationError::InvalidSideToMove(side_part.to_owned()))?;
    let halfmove_clock = clock_part
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidHalfmoveClock(clock_part.to_owned()))?;

    let mut board = Board::empty();
    for token in parts {
        let piece = Piece::from_code(token)?;
        if board.piece_at(piece.square()).is_some() {
            return Err(ValidationError::DuplicateSquare(piece.square()));
        }
        board.place(piece);
    }
    validate_position(&board)?;

    Ok(GameDescription {
        board,
        side_to_move,
        halfmove_clock,
    })
}

/// Exactly one king per colour and no pawn on the first or last rank.
pub(crate) fn validate_position(board: &Board) -> Result<(), ValidationError> {
    if let Some(pawn) = board
        .pieces()
        .find(|piece| piece.is_pawn() && matches!(piece.square().row(), 0 | 7))
    {
        return Err(ValidationError::PawnOnBackRank(pawn.square()));
    }

    for color in Color::ALL {
        let count = board.pieces_of(color).filter(|piece| piece.is_king()).count();
        if count != 1 {
            return Err(ValidationError::KingCount { color, count });
        }
    }

    Ok(())
}
