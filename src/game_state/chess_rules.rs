//! Canonical chess-rule constants and the tunable draw rules.
//!
//! This module stores static rule-related literals such as the standard
//! starting position description, together with [`RulesConfig`], the
//! thresholds a [`crate::game_state::game_state::Game`] uses to classify
//! draws.

use crate::game_state::chess_types::PieceKind;

/// Standard chess starting position in the game description format.
pub const STARTING_POSITION_DESCRIPTION: &str = "white 0 \
    Rock-white-a1-0 Knight-white-b1 Bishop-white-c1 Queen-white-d1 \
    King-white-e1-0 Bishop-white-f1 Knight-white-g1 Rock-white-h1-0 \
    Pawn-white-a2-false Pawn-white-b2-false Pawn-white-c2-false Pawn-white-d2-false \
    Pawn-white-e2-false Pawn-white-f2-false Pawn-white-g2-false Pawn-white-h2-false \
    Pawn-black-a7-false Pawn-black-b7-false Pawn-black-c7-false Pawn-black-d7-false \
    Pawn-black-e7-false Pawn-black-f7-false Pawn-black-g7-false Pawn-black-h7-false \
    Rock-black-a8-0 Knight-black-b8 Bishop-black-c8 Queen-black-d8 \
    King-black-e8-0 Bishop-black-f8 Knight-black-g8 Rock-black-h8-0";

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const CHESS960_POSITION_COUNT: u32 = 960;

/// Chess960 index of the orthodox arrangement.
pub const STANDARD_CHESS960_INDEX: u32 = 518;

/// Kinds a pawn may promote to.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
];

#[inline]
pub fn is_promotion_kind(kind: PieceKind) -> bool {
    PROMOTION_KINDS.contains(&kind)
}

/// Draw thresholds. `Default` follows FIDE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesConfig {
    /// Occurrences of one position (board and side to move) that draw.
    pub repetition_limit: usize,
    /// Halfmoves without capture or pawn move that draw.
    pub fifty_move_limit: u32,
    pub detect_insufficient_material: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            repetition_limit: 3,
            fifty_move_limit: 100,
            detect_insufficient_material: true,
        }
    }
}
