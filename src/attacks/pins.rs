//! Pin detection and pin/check move filtering.
//!
//! A piece is pinned ("passively bound") when it shares a line with its own
//! king, nothing stands between them, and the first piece beyond it, away
//! from the king, is an enemy slider moving along that line. A pinned piece
//! may only move along the king-attacker line, the attacker's square included.
//!
//! [`is_bound`] folds the current [`CheckStatus`] into that rule: with a single
//! check a move must also capture or block the attacker, with a double check
//! only the king may move, and the king itself may never step onto an
//! attacked square.

use crate::attacks::check_detection::{is_attacked, is_attacked_with_lifted};
use crate::attacks::check_status::CheckStatus;
use crate::board::square::Square;
use crate::board::square_set::SquareSet;
use crate::board_store::board::Board;
use crate::game_state::chess_types::Color;
use crate::pieces::king::is_castling_move;
use crate::pieces::pawn::en_passant_victim;
use crate::pieces::piece::Piece;
use crate::pieces::sliding::first_occupied;

/// Squares the piece on `square` may still occupy when pinned: everything
/// from the king (exclusive) to the pinning attacker (inclusive). `None` when
/// the piece is not pinned.
pub fn pin_line(board: &Board, square: Square, color: Color) -> Option<SquareSet> {
    let king = board.king_square(color)?;
    let (d_row, d_col) = king.direction_to(square)?;

    if king.between(square).iter().any(|between| board.piece_at(between).is_some()) {
        return None;
    }

    let attacker_square = first_occupied(board, square, d_row, d_col)?;
    let attacker = board.piece_at(attacker_square)?;
    let straight = d_row == 0 || d_col == 0;
    let matches_line = if straight {
        attacker.kind().slides_straight()
    } else {
        attacker.kind().slides_diagonally()
    };
    if attacker.color() == color || !matches_line {
        return None;
    }

    let mut line = king.between(attacker_square);
    line.insert(attacker_square);
    Some(line)
}

/// Whether `piece` is pinned to its own king.
pub fn is_passive_bound(board: &Board, piece: &Piece) -> bool {
    !piece.is_king() && pin_line(board, piece.square(), piece.color()).is_some()
}

/// Whether moving `piece` to the reachable square `to` is forbidden.
pub fn is_bound(board: &Board, piece: &Piece, to: Square) -> bool {
    let color = piece.color();
    let enemy = color.opposite();

    if piece.is_king() {
        if is_castling_move(piece, to, board) {
            // The castling path itself is checked by reachability.
            return board.check_status(color).is_check();
        }
        return is_attacked_with_lifted(board, to, enemy, SquareSet::single(piece.square()));
    }

    let status = board.check_status(color);
    if status.is_double_check() {
        return true;
    }

    if piece.is_pawn() {
        if let Some(victim) = en_passant_victim(piece, to, board) {
            return en_passant_exposes_king(board, piece, to, victim);
        }
    }

    if let Some(line) = pin_line(board, piece.square(), color) {
        if !line.contains(to) {
            return true;
        }
    }

    match status {
        CheckStatus::Single { blocking } => !blocking.contains(to),
        CheckStatus::NoCheck | CheckStatus::Double => false,
    }
}

/// En passant removes two pieces from one rank, so it is checked by playing
/// it out on a scratch board.
fn en_passant_exposes_king(board: &Board, pawn: &Piece, to: Square, victim: Square) -> bool {
    let Some(king) = board.king_square(pawn.color()) else {
        return false;
    };

    let mut scratch = board.clone();
    scratch.take(victim);
    if let Some(mut capturer) = scratch.take(pawn.square()) {
        capturer.set_square(to);
        scratch.place(capturer);
    }
    is_attacked(&scratch, king, pawn.color().opposite())
}
