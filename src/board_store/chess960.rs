//! Chess960 start-position decoding.
//!
//! Index `n` in `0..960` is read as a mixed-radix number:
//!
//! 1. `n % 4` places the light-squared bishop on file b, d, f or h;
//! 2. `(n / 4) % 4` places the dark-squared bishop on file a, c, e or g;
//! 3. `(n / 16) % 6` puts the queen on that many-th still-empty file;
//! 4. `n / 96` selects the knight/rook/king pattern filling the last five.
//!
//! Every pattern keeps the king between the two rooks. Index 518 is the
//! standard arrangement.

use crate::errors::ValidationError;
use crate::game_state::chess_rules::CHESS960_POSITION_COUNT;
use crate::game_state::chess_types::PieceKind;
use crate::game_state::chess_types::PieceKind::{Bishop, King, Knight, Queen, Rook};

pub type BackRank = [PieceKind; 8];

pub const STANDARD_BACK_RANK: BackRank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

const KNIGHT_ROOK_KING_TABLE: [[PieceKind; 5]; 10] = [
    [Knight, Knight, Rook, King, Rook],
    [Knight, Rook, Knight, King, Rook],
    [Knight, Rook, King, Knight, Rook],
    [Knight, Rook, King, Rook, Knight],
    [Rook, Knight, Knight, King, Rook],
    [Rook, Knight, King, Knight, Rook],
    [Rook, Knight, King, Rook, Knight],
    [Rook, King, Knight, Knight, Rook],
    [Rook, King, Knight, Rook, Knight],
    [Rook, King, Rook, Knight, Knight],
];

/// Decode a Chess960 index into the white back rank, file a first.
pub fn back_rank(index: u32) -> Result<BackRank, ValidationError> {
    if index >= CHESS960_POSITION_COUNT {
        return Err(ValidationError::Chess960IndexOutOfRange(index));
    }
    Ok(back_rank_wrapping(index))
}

/// [`back_rank`] for any `index`, taken modulo the position count.
pub fn back_rank_wrapping(index: u32) -> BackRank {
    let mut rank: [Option<PieceKind>; 8] = [None; 8];
    let mut n = (index % CHESS960_POSITION_COUNT) as usize;

    rank[2 * (n % 4) + 1] = Some(Bishop);
    n /= 4;
    rank[2 * (n % 4)] = Some(Bishop);
    n /= 4;

    let queen_slot = n % 6;
    n /= 6;
    let queen_file = empty_files(&rank).nth(queen_slot).unwrap_or(0);
    rank[queen_file] = Some(Queen);

    let remaining: Vec<usize> = empty_files(&rank).collect();
    for (file, kind) in remaining.into_iter().zip(KNIGHT_ROOK_KING_TABLE[n]) {
        rank[file] = Some(kind);
    }

    let mut out = STANDARD_BACK_RANK;
    for (slot, kind) in out.iter_mut().zip(rank) {
        *slot = kind.unwrap_or(*slot);
    }
    out
}

fn empty_files(rank: &[Option<PieceKind>; 8]) -> impl Iterator<Item = usize> + '_ {
    rank.iter()
        .enumerate()
        .filter(|(_, kind)| kind.is_none())
        .map(|(file, _)| file)
}

/// Back rank written with one FEN letter per file, e.g. `RNBQKBNR`.
pub fn back_rank_letters(rank: &BackRank) -> String {
    rank.iter()
        .map(|kind| match kind {
            PieceKind::Pawn => 'P',
            Knight => 'N',
            Bishop => 'B',
            Rook => 'R',
            Queen => 'Q',
            King => 'K',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STANDARD_CHESS960_INDEX;

    fn letters(index: u32) -> String {
        back_rank_letters(&back_rank(index).expect("index should decode"))
    }

    #[test]
    fn known_indices_decode() {
        assert_eq!(letters(STANDARD_CHESS960_INDEX), "RNBQKBNR");
        assert_eq!(letters(0), "BBQNNRKR");
        assert_eq!(letters(959), "RKRNNQBB");
        assert_eq!(
            back_rank(STANDARD_CHESS960_INDEX).expect("standard index decodes"),
            STANDARD_BACK_RANK
        );
    }

    #[test]
    fn wrapping_decode_agrees_in_range() {
        for index in [0, 7, STANDARD_CHESS960_INDEX, 959] {
            assert_eq!(back_rank(index).ok(), Some(back_rank_wrapping(index)));
        }
        assert_eq!(back_rank_wrapping(960 + 518), STANDARD_BACK_RANK);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert!(matches!(
            back_rank(960),
            Err(ValidationError::Chess960IndexOutOfRange(960))
        ));
    }

    #[test]
    fn every_arrangement_is_legal_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        for index in 0..CHESS960_POSITION_COUNT {
            let rank = back_rank(index).expect("index in range decodes");
            let files_of = |kind: PieceKind| -> Vec<usize> {
                rank.iter()
                    .enumerate()
                    .filter(|(_, k)| **k == kind)
                    .map(|(file, _)| file)
                    .collect()
            };

            let rooks = files_of(Rook);
            let king = files_of(King);
            let bishops = files_of(Bishop);
            assert_eq!(rooks.len(), 2, "index {index}");
            assert_eq!(king.len(), 1, "index {index}");
            assert_eq!(files_of(Knight).len(), 2, "index {index}");
            assert_eq!(files_of(Queen).len(), 1, "index {index}");
            assert!(rooks[0] < king[0] && king[0] < rooks[1], "index {index}");
            assert_ne!(bishops[0] % 2, bishops[1] % 2, "index {index}");
            assert!(seen.insert(rank), "index {index} repeats an arrangement");
        }
    }
}
