//! Full and incremental check analysis.
//!
//! The full variant collects every attacker of the king. The incremental
//! variant uses the move just applied and only examines the squares that can
//! have started a check: the moved piece on its destination, sliding lines
//! opened through vacated squares, the rook's post-castle square, and for
//! promotions the king's own rank.

use crate::attacks::check_detection::{attackers_of, piece_attacks};
use crate::attacks::check_status::CheckStatus;
use crate::board::square::Square;
use crate::board::square_set::SquareSet;
use crate::board_store::board::Board;
use crate::game_state::chess_types::Color;
use crate::game_state::extended_move::ExtendedMove;
use crate::pieces::sliding::first_occupied;

/// Check status of `color`'s king from scratch.
pub fn analyze_check(board: &Board, color: Color) -> CheckStatus {
    let Some(king) = board.king_square(color) else {
        return CheckStatus::NoCheck;
    };
    let attackers = attackers_of(board, king, color.opposite(), SquareSet::EMPTY);
    status_from_attackers(king, board, &attackers)
}

/// Check status of the side that did not make `last`, which must be the move
/// that produced `board`.
pub fn analyze_check_after(board: &Board, last: &ExtendedMove) -> CheckStatus {
    let attacker_color = last.mover;
    let Some(king) = board.king_square(attacker_color.opposite()) else {
        return CheckStatus::NoCheck;
    };

    let mut candidates = SquareSet::single(last.destination);
    add_discovered(board, king, last.origin, attacker_color, &mut candidates);

    if let Some(victim) = last.en_passant_victim {
        add_discovered(board, king, victim.square(), attacker_color, &mut candidates);
    }

    if let Some(castling) = last.castling {
        candidates.insert(castling.destination);
        add_discovered(board, king, castling.rook.square(), attacker_color, &mut candidates);
    }

    if last.is_promotion() {
        // A promotion can pair a new rook or queen attack with one along the
        // king's rank, so both directions of that rank are scanned.
        for d_col in [-1i8, 1] {
            if let Some(square) = first_occupied(board, king, 0, d_col) {
                candidates.insert(square);
            }
        }
    }

    let attackers: Vec<Square> = candidates
        .iter()
        .filter(|&square| {
            board.piece_at(square).is_some_and(|piece| {
                piece.color() == attacker_color && piece_attacks(board, piece, king)
            })
        })
        .collect();

    status_from_attackers(king, board, &attackers)
}

/// Add the sliding piece found by looking from `king` through `vacated`.
fn add_discovered(
    board: &Board,
    king: Square,
    vacated: Square,
    attacker_color: Color,
    candidates: &mut SquareSet,
) {
    let Some((d_row, d_col)) = king.direction_to(vacated) else {
        return;
    };
    let Some(square) = first_occupied(board, king, d_row, d_col) else {
        return;
    };
    let Some(piece) = board.piece_at(square) else {
        return;
    };

    let straight = d_row == 0 || d_col == 0;
    let slides = if straight {
        piece.kind().slides_straight()
    } else {
        piece.kind().slides_diagonally()
    };
    if piece.color() == attacker_color && slides {
        candidates.insert(square);
    }
}

pub fn status_from_attackers(king: Square, board: &Board, attackers: &[Square]) -> CheckStatus {
    match attackers {
        [] => CheckStatus::NoCheck,
        [attacker] => {
            let mut blocking = SquareSet::single(*attacker);
            let slides = board.piece_at(*attacker).is_some_and(|piece| {
                piece.kind().slides_straight() || piece.kind().slides_diagonally()
            });
            if slides {
                blocking = blocking.union(king.between(*attacker));
            }
            CheckStatus::Single { blocking }
        }
        _ => CheckStatus::Double,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_move::Move;
    use crate::game_state::game_state::Game;
    use crate::utils::description_parser::parse_description;

    fn sq(code: &str) -> Square {
        Square::parse(code).expect("test square should parse")
    }

    #[test]
    fn single_slider_check_includes_interposition_squares() {
        let game = parse_description("white 0 King-white-e1-0 Rock-black-e5-1 King-black-a8-0")
            .expect("fixture should parse");
        let status = analyze_check(&game.board, Color::White);
        let blocking = status.blocking_squares();

        assert!(status.is_check());
        assert!(!status.is_double_check());
        assert_eq!(blocking.len(), 4);
        for code in ["e2", "e3", "e4", "e5"] {
            assert!(blocking.contains(sq(code)), "{code} should block or capture");
        }
    }

    #[test]
    fn knight_check_is_captured_only() {
        let game = parse_description("white 0 King-white-e1-0 Knight-black-f3 King-black-a8-0")
            .expect("fixture should parse");
        let status = analyze_check(&game.board, Color::White);
        assert_eq!(status.blocking_squares(), SquareSet::single(sq("f3")));
    }

    #[test]
    fn double_check_has_no_blocking_squares() {
        let game = parse_description(
            "white 0 King-white-e1-0 Rock-black-e8-1 Knight-black-d3 King-black-a8-0",
        )
        .expect("fixture should parse");
        let status = analyze_check(&game.board, Color::White);
        assert!(status.is_double_check());
        assert!(status.blocking_squares().is_empty());
    }

    #[test]
    fn no_check_has_empty_set() {
        let game = Game::new();
        let status = analyze_check(game.board(), Color::White);
        assert_eq!(status, CheckStatus::NoCheck);
        assert!(status.blocking_squares().is_empty());
    }

    fn assert_incremental_matches_full(description: &str) {
        let mut game = Game::deserialize(description).expect("fixture should parse");
        for mv in game.legal_moves() {
            game.apply_move(mv).expect("legal move should apply");
            let last = *game.last_extended_move().expect("a move was applied");
            let incremental = analyze_check_after(game.board(), &last);
            let full = analyze_check(game.board(), game.side_to_move());
            assert_eq!(incremental, full, "{description} after {mv}");
            game.undo().expect("undo should succeed");
        }
    }

    #[test]
    fn incremental_analysis_matches_full_analysis() {
        for description in [
            // discovered check by moving the bishop off the rook's file
            "white 0 King-white-a1-0 Bishop-white-e4 Rock-white-e2-1 King-black-e8-0",
            // double check after en passant opens the rook's file
            "white 0 King-white-a1-0 Rock-white-e1-1 Pawn-white-e5-false Pawn-black-f5-true King-black-e7-0",
            // promotions next to a back-rank rook
            "white 0 King-white-a1-0 Pawn-white-c7-false Rock-white-a8-1 Knight-black-b8 King-black-e8-0",
            // castling rook gives check
            "white 0 King-white-e1-0 Rock-white-h1-0 King-black-f8-0",
            // Chess960 castle with the king staying on its square
            "white 0 Rock-white-b1-0 King-white-c1-0 King-black-d8-0",
        ] {
            assert_incremental_matches_full(description);
        }
    }

    #[test]
    fn en_passant_discovers_double_check() {
        let mut game = Game::deserialize(
            "white 0 King-white-a1-0 Rock-white-e1-1 Pawn-white-e5-false Pawn-black-f5-true King-black-e7-0",
        )
        .expect("fixture should parse");
        game.apply_move(Move::parse("e5-f6").expect("move parses"))
            .expect("en passant should apply");

        let status = game.board().check_status(Color::Black);
        assert!(status.is_double_check());
        let last = game.last_extended_move().expect("a move was applied");
        assert!(last.is_en_passant());
    }
}
