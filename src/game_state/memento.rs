//! Compact position snapshots for repetition detection.
//!
//! Each square takes four bits: zero for empty, otherwise `1 + kind` for
//! white and `7 + kind` for black, with kinds ordered as in
//! [`PieceKind::ALL`]. Sixteen squares fit in one `u64`.

use crate::board_store::board::Board;
use crate::game_state::chess_types::{Color, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memento {
    packed: [u64; 4],
    side_to_move: Color,
    piece_count: u8,
}

impl Memento {
    pub fn capture(board: &Board, side_to_move: Color) -> Memento {
        let mut packed = [0u64; 4];
        let mut piece_count = 0u8;
        for piece in board.pieces() {
            let index = piece.square().index();
            let code = piece_code(piece.color(), piece.kind());
            packed[index / 16] |= code << ((index % 16) * 4);
            piece_count += 1;
        }
        Memento {
            packed,
            side_to_move,
            piece_count,
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn piece_count(&self) -> u8 {
        self.piece_count
    }
}

#[inline]
fn piece_code(color: Color, kind: PieceKind) -> u64 {
    let base = match color {
        Color::White => 1,
        Color::Black => 7,
    };
    (base + kind.index()) as u64
}

/// Occurrences of the newest memento in `history`, itself included.
///
/// Only every second entry can share the side to move, and a capture or
/// promotion makes every earlier position unreachable, so the scan walks back
/// two entries at a time and stops at the first piece-count change.
pub fn repetition_count(history: &[Memento]) -> usize {
    let Some(current) = history.last() else {
        return 0;
    };

    history
        .iter()
        .rev()
        .step_by(2)
        .take_while(|memento| memento.piece_count == current.piece_count)
        .filter(|&memento| memento == current)
        .count()
}
