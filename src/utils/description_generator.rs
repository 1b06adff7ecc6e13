//! Game description serializer.
//!
//! Writes the side to move, the halfmove clock and every piece token in
//! square index order (a1, b1, ..., h8), single-space separated. The output
//! parses back to the same position with
//! [`crate::utils::description_parser::parse_description`].

use crate::board_store::board::Board;
use crate::game_state::chess_types::Color;

pub fn generate_description(board: &Board, side_to_move: Color, halfmove_clock: u32) -> String {
    let mut out = String::with_capacity(16 + board.piece_count() * 20);
    out.push_str(side_to_move.code());
    out.push(' ');
    out.push_str(&halfmove_clock.to_string());

    for piece in board.pieces() {
        out.push(' ');
        out.push_str(&piece.to_string());
    }

    out
}
