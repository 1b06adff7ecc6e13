//! Knight movement over the eight (±1,±2)/(±2,±1) jumps.

use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board_store::board::Board;
use crate::pieces::piece::Piece;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

#[inline]
pub fn jumps_to(from: Square, to: Square) -> bool {
    let d_row = from.row().abs_diff(to.row());
    let d_col = from.col().abs_diff(to.col());
    (d_row == 1 && d_col == 2) || (d_row == 2 && d_col == 1)
}

pub fn is_reachable(piece: &Piece, to: Square, board: &Board) -> bool {
    jumps_to(piece.square(), to)
        && board
            .piece_at(to)
            .map_or(true, |target| target.color() != piece.color())
}

pub fn collect_reachable(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    let from = piece.square();
    for (d_row, d_col) in KNIGHT_OFFSETS {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        if board
            .piece_at(to)
            .map_or(true, |target| target.color() != piece.color())
        {
            out.push(Move::new(from, to));
        }
    }
}
