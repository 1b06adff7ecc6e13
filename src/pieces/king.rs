//! King movement and Chess960 castling reachability.
//!
//! Castling is encoded as the king moving onto one of its own unmoved rooks on
//! the back row. Whatever the start files, the king ends on the g- or c-file
//! and the rook on the f- or d-file, depending on which side the rook stood.
//! A castle is reachable when:
//!
//! - neither king nor rook has moved;
//! - every square the king and rook travel over, destinations included, is
//!   empty apart from the two castling pieces;
//! - the king is not in check and no square it stands on along the way is
//!   attacked once both castling pieces are lifted off the board.

use crate::attacks::check_detection::{is_attacked, is_attacked_with_lifted};
use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board::square_set::SquareSet;
use crate::board_store::board::Board;
use crate::pieces::piece::Piece;

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

#[inline]
pub fn is_adjacent(from: Square, to: Square) -> bool {
    from != to && from.row().abs_diff(to.row()) <= 1 && from.col().abs_diff(to.col()) <= 1
}

/// Normalised post-castle squares `(king, rook)` for a king on `king_square`
/// castling with the rook on `rook_square`.
pub fn castling_destinations(king_square: Square, rook_square: Square) -> (Square, Square) {
    let row_start = king_square.row() as usize * 8;
    if rook_square.col() > king_square.col() {
        (Square::from_index(row_start + 6), Square::from_index(row_start + 5))
    } else {
        (Square::from_index(row_start + 2), Square::from_index(row_start + 3))
    }
}

/// The rook `king` would castle with by moving onto `to`, ignoring path checks.
pub fn castling_partner<'a>(king: &Piece, to: Square, board: &'a Board) -> Option<&'a Piece> {
    if !king.is_king() || !king.can_castle() || king.square().row() != king.color().back_row() {
        return None;
    }
    let rook = board.piece_at(to)?;
    let eligible = rook.color() == king.color()
        && rook.kind() == crate::game_state::chess_types::PieceKind::Rook
        && rook.can_castle()
        && to.row() == king.square().row();
    eligible.then_some(rook)
}

/// Whether `king` moving onto `to` is a castle in the current position.
pub fn is_castling_move(king: &Piece, to: Square, board: &Board) -> bool {
    castling_partner(king, to, board).is_some()
}

fn castling_reachable(king: &Piece, rook_square: Square, board: &Board) -> bool {
    if castling_partner(king, rook_square, board).is_none() {
        return false;
    }
    let (king_dest, rook_dest) = castling_destinations(king.square(), rook_square);
    castling_path_is_clear(board, king.square(), rook_square, king_dest, rook_dest)
        && castling_path_is_safe(board, king, rook_square, king_dest)
}

fn castling_path_is_clear(
    board: &Board,
    king_square: Square,
    rook_square: Square,
    king_dest: Square,
    rook_dest: Square,
) -> bool {
    let row_start = king_square.row() as usize * 8;
    let spans = [
        (king_square.col(), king_dest.col()),
        (rook_square.col(), rook_dest.col()),
    ];

    for (a, b) in spans {
        for col in a.min(b)..=a.max(b) {
            let square = Square::from_index(row_start + col as usize);
            if square != king_square && square != rook_square && board.piece_at(square).is_some() {
                return false;
            }
        }
    }

    true
}

fn castling_path_is_safe(board: &Board, king: &Piece, rook_square: Square, king_dest: Square) -> bool {
    let enemy = king.color().opposite();
    let from = king.square();
    if is_attacked(board, from, enemy) {
        return false;
    }

    let mut lifted = SquareSet::single(from);
    lifted.insert(rook_square);

    let distance = from.col().abs_diff(king_dest.col());
    if distance <= 1 {
        // Adjacent file or no king movement: only the landing square is new.
        return !is_attacked_with_lifted(board, king_dest, enemy, lifted);
    }

    let row_start = from.row() as usize * 8;
    let step: i8 = if king_dest.col() > from.col() { 1 } else { -1 };
    let mut col = from.col() as i8;
    while col != king_dest.col() as i8 {
        col += step;
        let square = Square::from_index(row_start + col as usize);
        if is_attacked_with_lifted(board, square, enemy, lifted) {
            return false;
        }
    }

    true
}

pub fn is_reachable(king: &Piece, to: Square, board: &Board) -> bool {
    if is_adjacent(king.square(), to)
        && board
            .piece_at(to)
            .map_or(true, |target| target.color() != king.color())
    {
        return true;
    }
    castling_reachable(king, to, board)
}

pub fn collect_reachable(king: &Piece, board: &Board, out: &mut Vec<Move>) {
    let from = king.square();
    for (d_row, d_col) in KING_OFFSETS {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        if board
            .piece_at(to)
            .map_or(true, |target| target.color() != king.color())
        {
            out.push(Move::new(from, to));
        }
    }

    if !king.can_castle() {
        return;
    }
    let row_start = from.row() as usize * 8;
    for col in 0..8 {
        let rook_square = Square::from_index(row_start + col);
        if castling_reachable(king, rook_square, board) {
            out.push(Move::new(from, rook_square));
        }
    }
}
