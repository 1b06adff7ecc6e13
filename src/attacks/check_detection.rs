//! Stateless attack detection over a board snapshot.
//!
//! Scans outward from the target square: the four diagonals for bishops and
//! queens, the four ranks/files for rooks and queens, the knight jumps, the
//! king ring and the two pawn-attack squares. Squares in a `lifted` set are
//! treated as empty, which lets callers test a king's destination with the
//! king itself (and, when castling, its rook) taken off the board.

use crate::board::square::{Square, DIAGONAL_DIRECTIONS, STRAIGHT_DIRECTIONS};
use crate::board::square_set::SquareSet;
use crate::board_store::board::Board;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::pieces::king::{is_adjacent, KING_OFFSETS};
use crate::pieces::knight::{jumps_to, KNIGHT_OFFSETS};
use crate::pieces::pawn;
use crate::pieces::piece::Piece;

#[inline]
fn occupant(board: &Board, square: Square, lifted: SquareSet) -> Option<&Piece> {
    if lifted.contains(square) {
        None
    } else {
        board.piece_at(square)
    }
}

/// Whether any piece of `by` attacks `square`.
#[inline]
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    is_attacked_with_lifted(board, square, by, SquareSet::EMPTY)
}

pub fn is_attacked_with_lifted(board: &Board, square: Square, by: Color, lifted: SquareSet) -> bool {
    let mut found = Vec::new();
    scan_attackers(board, square, by, lifted, true, &mut found);
    !found.is_empty()
}

/// Squares of every piece of `by` attacking `square`.
pub fn attackers_of(board: &Board, square: Square, by: Color, lifted: SquareSet) -> Vec<Square> {
    let mut found = Vec::with_capacity(2);
    scan_attackers(board, square, by, lifted, false, &mut found);
    found
}

/// Whether the king standing on `king_square` is attacked by the other side.
pub fn is_check(board: &Board, king_square: Square) -> bool {
    match board.piece_at(king_square) {
        Some(king) => is_attacked(board, king_square, king.color().opposite()),
        None => false,
    }
}

fn scan_attackers(
    board: &Board,
    square: Square,
    by: Color,
    lifted: SquareSet,
    first_only: bool,
    found: &mut Vec<Square>,
) {
    let report = |hit: Square, found: &mut Vec<Square>| -> bool {
        found.push(hit);
        first_only
    };

    for (directions, straight) in [(&DIAGONAL_DIRECTIONS, false), (&STRAIGHT_DIRECTIONS, true)] {
        for &(d_row, d_col) in directions {
            let mut current = square.offset(d_row, d_col);
            while let Some(step) = current {
                if let Some(piece) = occupant(board, step, lifted) {
                    let kind = piece.kind();
                    let slides = if straight {
                        kind.slides_straight()
                    } else {
                        kind.slides_diagonally()
                    };
                    if piece.color() == by && slides && report(step, found) {
                        return;
                    }
                    break;
                }
                current = step.offset(d_row, d_col);
            }
        }
    }

    for (d_row, d_col) in KNIGHT_OFFSETS {
        let Some(step) = square.offset(d_row, d_col) else {
            continue;
        };
        if let Some(piece) = occupant(board, step, lifted) {
            if piece.color() == by && piece.kind() == PieceKind::Knight && report(step, found) {
                return;
            }
        }
    }

    for (d_row, d_col) in KING_OFFSETS {
        let Some(step) = square.offset(d_row, d_col) else {
            continue;
        };
        if let Some(piece) = occupant(board, step, lifted) {
            if piece.color() == by && piece.is_king() && report(step, found) {
                return;
            }
        }
    }

    for d_col in [-1i8, 1] {
        let Some(step) = square.offset(-by.forward(), d_col) else {
            continue;
        };
        if let Some(piece) = occupant(board, step, lifted) {
            if piece.color() == by && piece.is_pawn() && report(step, found) {
                return;
            }
        }
    }
}

/// Whether `attacker` attacks `target` on the current board, regardless of
/// what stands on `target`.
pub fn piece_attacks(board: &Board, attacker: &Piece, target: Square) -> bool {
    let from = attacker.square();
    let kind = attacker.kind();
    match kind {
        PieceKind::Pawn => pawn::attacks(attacker.color(), from, target),
        PieceKind::Knight => jumps_to(from, target),
        PieceKind::King => is_adjacent(from, target),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            let aligned = (kind.slides_straight() && from.is_straight(target))
                || (kind.slides_diagonally() && from.is_diagonal(target));
            aligned
                && from
                    .between(target)
                    .iter()
                    .all(|square| board.piece_at(square).is_none())
        }
    }
}
