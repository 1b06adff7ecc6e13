use std::fmt;

use crate::game_state::chess_types::Color;

/// Classification of a game after the latest move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    DrawByRepetition,
    DrawByFiftyMoves,
    DrawByMaterial,
    /// Supplied from outside; never detected.
    Resigned { loser: Color },
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }

    #[inline]
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawByRepetition
                | GameStatus::DrawByFiftyMoves
                | GameStatus::DrawByMaterial
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => f.write_str("in progress"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::DrawByRepetition => f.write_str("draw by threefold repetition"),
            GameStatus::DrawByFiftyMoves => f.write_str("draw by the fifty-move rule"),
            GameStatus::DrawByMaterial => f.write_str("draw by insufficient material"),
            GameStatus::Resigned { loser } => write!(f, "{loser} resigned"),
        }
    }
}
