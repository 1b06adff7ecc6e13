//! Promotion-choice collaborator.
//!
//! When a pawn reaches the last rank the game asks a [`PromotionChooser`] for
//! the replacement kind. Choices outside Queen, Rook, Knight and Bishop are
//! rejected by the caller rather than defaulted.

use crate::board::square::Square;
use crate::game_state::chess_types::PieceKind;

pub trait PromotionChooser: Send + Sync {
    /// Kind the pawn arriving on `square` becomes. Must return promptly.
    fn choose_safe_promotion(&self, square: Square) -> PieceKind;
}

impl<F> PromotionChooser for F
where
    F: Fn(Square) -> PieceKind + Send + Sync,
{
    fn choose_safe_promotion(&self, square: Square) -> PieceKind {
        self(square)
    }
}

/// Always promotes to a queen.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueenPromotion;

impl PromotionChooser for QueenPromotion {
    fn choose_safe_promotion(&self, _square: Square) -> PieceKind {
        PieceKind::Queen
    }
}
