//! Rook movement: rank and file rays.
//!
//! Castling is initiated by the king, so the rook itself only needs its
//! step counter, which [`crate::pieces::piece::Piece::can_castle`] reads.

use crate::board::chess_move::Move;
use crate::board::square::{Square, STRAIGHT_DIRECTIONS};
use crate::board_store::board::Board;
use crate::pieces::piece::Piece;
use crate::pieces::sliding::{cast_rays, ray_reaches};

pub fn is_reachable(piece: &Piece, to: Square, board: &Board) -> bool {
    ray_reaches(board, piece.square(), to, piece.color(), true)
}

pub fn collect_reachable(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    cast_rays(board, piece.square(), piece.color(), &STRAIGHT_DIRECTIONS, out);
}
