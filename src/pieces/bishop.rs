//! Bishop movement: diagonal rays.

use crate::board::chess_move::Move;
use crate::board::square::{Square, DIAGONAL_DIRECTIONS};
use crate::board_store::board::Board;
use crate::pieces::piece::Piece;
use crate::pieces::sliding::{cast_rays, ray_reaches};

pub fn is_reachable(piece: &Piece, to: Square, board: &Board) -> bool {
    ray_reaches(board, piece.square(), to, piece.color(), false)
}

pub fn collect_reachable(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    cast_rays(board, piece.square(), piece.color(), &DIAGONAL_DIRECTIONS, out);
}
