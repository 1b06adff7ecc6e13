//! Ray casting shared by bishops, rooks and queens.
//!
//! Rays stop at the first occupied square, which is included when it holds an
//! enemy piece and excluded when it holds a friendly one.

use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board_store::board::Board;
use crate::game_state::chess_types::Color;

pub fn cast_rays(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(d_row, d_col) in directions {
        let mut current = from.offset(d_row, d_col);
        while let Some(square) = current {
            match board.piece_at(square) {
                None => out.push(Move::new(from, square)),
                Some(piece) => {
                    if piece.color() != color {
                        out.push(Move::new(from, square));
                    }
                    break;
                }
            }
            current = square.offset(d_row, d_col);
        }
    }
}

/// Whether a slider of `color` on `from` reaches `to`. `straight` selects
/// rank/file movement, otherwise diagonal.
pub fn ray_reaches(board: &Board, from: Square, to: Square, color: Color, straight: bool) -> bool {
    let aligned = if straight {
        from.is_straight(to)
    } else {
        from.is_diagonal(to)
    };
    if !aligned {
        return false;
    }

    if from.between(to).iter().any(|square| board.piece_at(square).is_some()) {
        return false;
    }

    board
        .piece_at(to)
        .map_or(true, |target| target.color() != color)
}

/// First occupied square walking from `from` in one direction.
pub fn first_occupied(board: &Board, from: Square, d_row: i8, d_col: i8) -> Option<Square> {
    let mut current = from.offset(d_row, d_col);
    while let Some(square) = current {
        if board.piece_at(square).is_some() {
            return Some(square);
        }
        current = square.offset(d_row, d_col);
    }
    None
}
