//! FEN-to-position parser.
//!
//! Builds a [`GameDescription`] from a Forsyth-Edwards Notation string. The
//! engine keeps no separate castling-rights or en passant fields, so both are
//! mapped onto piece flags:
//!
//! - a king with at least one right gets zero steps, otherwise one;
//! - a rook named by a right gets zero steps, every other rook one. `K`/`Q`
//!   pick the outermost rook on that side of the king, `A`-`H` and `a`-`h`
//!   name the rook's file directly (Shredder-FEN);
//! - the en passant target flags the pawn standing just past it.

use crate::board::square::Square;
use crate::board_store::board::Board;
use crate::errors::ValidationError;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::pieces::piece::Piece;
use crate::utils::description_parser::{validate_position, GameDescription};

pub fn parse_fen(fen: &str) -> Result<GameDescription, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidFen(message);
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout".to_owned()))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move".to_owned()))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights".to_owned()))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en passant square".to_owned()))?;
    let halfmove_part = parts.next().ok_or_else(|| invalid("missing halfmove clock".to_owned()))?;
    let fullmove_part = parts.next().ok_or_else(|| invalid("missing fullmove number".to_owned()))?;

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields".to_owned()));
    }

    let mut board = parse_board(board_part)?;
    let side_to_move = parse_side_to_move(side_part)?;
    apply_castling_rights(castling_part, &mut board)?;
    apply_en_passant_square(en_passant_part, &mut board)?;

    let halfmove_clock = halfmove_part
        .parse::<u32>()
        .map_err(|_| invalid(format!("invalid halfmove clock: {halfmove_part}")))?;
    fullmove_part
        .parse::<u32>()
        .map_err(|_| invalid(format!("invalid fullmove number: {fullmove_part}")))?;

    validate_position(&board)?;

    Ok(GameDescription {
        board,
        side_to_move,
        halfmove_clock,
    })
}

fn parse_board(board_part: &str) -> Result<Board, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidFen(message);
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks".to_owned()));
    }

    let mut board = Board::empty();
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7usize.saturating_sub(fen_rank_idx);
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as usize;
                continue;
            }

            let (color, kind) = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(format!("invalid piece character '{ch}' in board layout")))?;

            if file >= 8 {
                return Err(invalid("board rank has too many files".to_owned()));
            }

            let square = Square::from_index(board_rank * 8 + file);
            // Rooks and kings start as moved; castling rights reset them.
            let piece = match kind {
                PieceKind::Rook => Piece::rook(color, square, 1),
                PieceKind::King => Piece::king(color, square, 1, false),
                _ => Piece::new(kind, color, square),
            };
            board.place(piece);
            file += 1;
        }

        if file != 8 {
            return Err(invalid("board rank does not sum to 8 files".to_owned()));
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ValidationError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ValidationError::InvalidFen(format!(
            "invalid side-to-move field: {side_part}"
        ))),
    }
}

fn apply_castling_rights(castling_part: &str, board: &mut Board) -> Result<(), ValidationError> {
    if castling_part == "-" {
        return Ok(());
    }

    for ch in castling_part.chars() {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let back = color.back_row() as usize;
        let king = board
            .king_square(color)
            .filter(|square| square.row() as usize == back)
            .ok_or_else(|| {
                ValidationError::InvalidFen(format!("castling right '{ch}' without a king on the back rank"))
            })?;

        let rook_file = match ch.to_ascii_lowercase() {
            'k' => outermost_rook(board, color, king, (king.col() + 1..8).rev()),
            'q' => outermost_rook(board, color, king, 0..king.col()),
            file @ 'a'..='h' => Some(file as u8 - b'a'),
            _ => None,
        };
        let rook_square = rook_file
            .map(|file| Square::from_index(back * 8 + file as usize))
            .filter(|&square| {
                board
                    .piece_at(square)
                    .is_some_and(|piece| piece.kind() == PieceKind::Rook && piece.color() == color)
            })
            .ok_or_else(|| ValidationError::InvalidFen(format!("castling right '{ch}' has no rook")))?;

        board.place(Piece::rook(color, rook_square, 0));
        let castled = board.piece_at(king).is_some_and(|piece| piece.has_castled());
        board.place(Piece::king(color, king, 0, castled));
    }

    Ok(())
}

fn outermost_rook(
    board: &Board,
    color: Color,
    king: Square,
    files: impl Iterator<Item = u8>,
) -> Option<u8> {
    let back = king.row() as usize;
    files.into_iter().find(|&file| {
        board
            .piece_at(Square::from_index(back * 8 + file as usize))
            .is_some_and(|piece| piece.kind() == PieceKind::Rook && piece.color() == color)
    })
}

fn apply_en_passant_square(en_passant_part: &str, board: &mut Board) -> Result<(), ValidationError> {
    if en_passant_part == "-" {
        return Ok(());
    }

    let target = Square::parse(en_passant_part)?;
    let (pawn_color, pawn_row) = match target.row() {
        2 => (Color::White, 3),
        5 => (Color::Black, 4),
        _ => {
            return Err(ValidationError::InvalidFen(format!(
                "en passant square {target} is not on rank 3 or 6"
            )))
        }
    };

    let pawn_square = Square::from_index(pawn_row * 8 + target.col() as usize);
    let flagged = board
        .piece_at(pawn_square)
        .filter(|piece| piece.is_pawn() && piece.color() == pawn_color)
        .map(|piece| Piece::pawn(piece.color(), pawn_square, true))
        .ok_or_else(|| {
            ValidationError::InvalidFen(format!("no pawn passed over en passant square {target}"))
        })?;
    board.place(flagged);

    Ok(())
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let lower = ch.to_ascii_lowercase();
    let piece = match lower {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, piece))
}
