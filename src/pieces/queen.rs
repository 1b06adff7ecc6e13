//! Queen movement, delegated to a bishop ray set and a rook ray set.

use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board_store::board::Board;
use crate::pieces::piece::Piece;
use crate::pieces::{bishop, rook};

pub fn is_reachable(piece: &Piece, to: Square, board: &Board) -> bool {
    bishop::is_reachable(piece, to, board) || rook::is_reachable(piece, to, board)
}

pub fn collect_reachable(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    bishop::collect_reachable(piece, board, out);
    rook::collect_reachable(piece, board, out);
}
