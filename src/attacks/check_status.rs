use crate::board::square_set::SquareSet;

/// Outcome of check analysis for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckStatus {
    #[default]
    NoCheck,
    /// One attacker. `blocking` holds the attacker's square plus, for a
    /// sliding attacker, every square between it and the king.
    Single { blocking: SquareSet },
    /// Two attackers: only the king may move.
    Double,
}

impl CheckStatus {
    #[inline]
    pub fn is_check(self) -> bool {
        !matches!(self, CheckStatus::NoCheck)
    }

    #[inline]
    pub fn is_double_check(self) -> bool {
        matches!(self, CheckStatus::Double)
    }

    /// Squares that capture or block the sole attacker; empty otherwise.
    pub fn blocking_squares(self) -> SquareSet {
        match self {
            CheckStatus::Single { blocking } => blocking,
            CheckStatus::NoCheck | CheckStatus::Double => SquareSet::EMPTY,
        }
    }
}
