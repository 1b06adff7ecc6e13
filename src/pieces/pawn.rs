//! Pawn movement.
//!
//! One step forward onto an empty square, two steps from the start row when
//! both squares are empty, diagonal captures onto enemy pieces, and en passant
//! onto the empty square behind an enemy pawn flagged as just double-stepped.
//! Promotion is resolved when the move is applied, not here.

use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board_store::board::Board;
use crate::game_state::chess_types::Color;
use crate::pieces::piece::Piece;

#[inline]
pub const fn start_row(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

#[inline]
pub const fn promotion_row(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

/// Whether a pawn of `color` moving onto `to` promotes.
#[inline]
pub fn is_promotion(color: Color, to: Square) -> bool {
    to.row() == promotion_row(color)
}

/// Whether a pawn of `color` on `from` attacks `target` diagonally.
#[inline]
pub fn attacks(color: Color, from: Square, target: Square) -> bool {
    target.row() as i8 - from.row() as i8 == color.forward() && from.col().abs_diff(target.col()) == 1
}

/// Square of the pawn captured by `pawn` en passant on `to`, if that move is
/// an en passant capture. Always `None` when `pawn` is not a pawn.
pub fn en_passant_victim(pawn: &Piece, to: Square, board: &Board) -> Option<Square> {
    let from = pawn.square();
    if !pawn.is_pawn() || !attacks(pawn.color(), from, to) || board.piece_at(to).is_some() {
        return None;
    }

    let victim_square = Square::at(from.row() as i8, to.col() as i8)?;
    let victim = board.piece_at(victim_square)?;
    (victim.color() != pawn.color() && victim.is_en_passant_target()).then_some(victim_square)
}

pub fn is_reachable(pawn: &Piece, to: Square, board: &Board) -> bool {
    let from = pawn.square();
    let color = pawn.color();
    let forward = color.forward();

    if to.col() == from.col() {
        let Some(one) = from.offset(forward, 0) else {
            return false;
        };
        if board.piece_at(one).is_some() {
            return false;
        }
        if to == one {
            return true;
        }
        return from.row() == start_row(color)
            && from.offset(2 * forward, 0) == Some(to)
            && board.piece_at(to).is_none();
    }

    if !attacks(color, from, to) {
        return false;
    }
    match board.piece_at(to) {
        Some(target) => target.color() != color,
        None => en_passant_victim(pawn, to, board).is_some(),
    }
}

pub fn collect_reachable(pawn: &Piece, board: &Board, out: &mut Vec<Move>) {
    let from = pawn.square();
    let color = pawn.color();
    let forward = color.forward();

    if let Some(one) = from.offset(forward, 0) {
        if board.piece_at(one).is_none() {
            out.push(Move::new(from, one));
            if from.row() == start_row(color) {
                if let Some(two) = one.offset(forward, 0) {
                    if board.piece_at(two).is_none() {
                        out.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for d_col in [-1i8, 1] {
        let Some(to) = from.offset(forward, d_col) else {
            continue;
        };
        let capturable = match board.piece_at(to) {
            Some(target) => target.color() != color,
            None => en_passant_victim(pawn, to, board).is_some(),
        };
        if capturable {
            out.push(Move::new(from, to));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::board::square::Square;
    use crate::utils::description_parser::parse_description;

    fn targets(description: &str, square: &str) -> Vec<String> {
        let game = parse_description(description).expect("fixture should parse");
        let pawn = game
            .board
            .piece_at(Square::parse(square).expect("square parses"))
            .expect("pawn present");
        let mut out: Vec<String> = pawn
            .reachable_moves(&game.board)
            .iter()
            .map(|mv| mv.to().to_string())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn pushes_from_start_row() {
        let moves = targets("white 0 King-white-e1-0 Pawn-white-e2-false King-black-e8-0", "e2");
        assert_eq!(moves, vec!["e3", "e4"]);
    }

    #[test]
    fn double_step_needs_both_squares_empty() {
        let moves = targets(
            "white 0 King-white-e1-0 Pawn-white-e2-false Knight-black-e4 King-black-e8-0",
            "e2",
        );
        assert_eq!(moves, vec!["e3"]);

        let blocked = targets(
            "white 0 King-white-e1-0 Pawn-white-e2-false Knight-black-e3 King-black-e8-0",
            "e2",
        );
        assert!(blocked.is_empty());
    }

    #[test]
    fn captures_diagonally_and_en_passant() {
        let moves = targets(
            "black 0 Pawn-white-c4-true Pawn-black-b4-false Knight-white-a3 King-white-e1-0 King-black-e8-0",
            "b4",
        );
        assert_eq!(moves, vec!["a3", "b3", "c3"]);
    }

    #[test]
    fn no_en_passant_without_flag() {
        let moves = targets(
            "black 0 Pawn-white-c4-false Pawn-black-b4-false King-white-e1-0 King-black-e8-0",
            "b4",
        );
        assert_eq!(moves, vec!["b3"]);
    }
}
