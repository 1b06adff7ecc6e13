//! Flat 64-cell board store.
//!
//! Cells are keyed by linear square index (`0 == a1`, `63 == h8`). The board
//! caches each side's king square, updated on every placement or removal of
//! a king, and each side's [`CheckStatus`], dropped on every mutation and
//! recomputed on the next query.

use std::cell::Cell;
use std::fmt;

use tracing::debug;

use crate::attacks::check_analysis::analyze_check;
use crate::attacks::check_status::CheckStatus;
use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board::square_set::SquareSet;
use crate::board_store::chess960::{back_rank, BackRank, STANDARD_BACK_RANK};
use crate::errors::ValidationError;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::pieces::pawn;
use crate::pieces::piece::Piece;
use crate::utils::render_board::render_board;

#[derive(Debug, Clone)]
pub struct Board {
    cells: [Option<Piece>; 64],
    king_squares: [Option<Square>; 2],
    check_status: [Cell<Option<CheckStatus>>; 2],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Board {}

impl Board {
    pub fn empty() -> Board {
        Board {
            cells: [None; 64],
            king_squares: [None; 2],
            check_status: [Cell::new(None), Cell::new(None)],
        }
    }

    /// Orthodox start position.
    pub fn standard() -> Board {
        Board::from_back_rank(&STANDARD_BACK_RANK)
    }

    /// Start position for Chess960 arrangement `index` (`0..960`).
    pub fn chess960(index: u32) -> Result<Board, ValidationError> {
        let rank = back_rank(index)?;
        debug!(index, "setting up chess960 position");
        Ok(Board::from_back_rank(&rank))
    }

    /// Full start position with `rank` mirrored for both sides and a pawn
    /// row in front of each.
    pub fn from_back_rank(rank: &BackRank) -> Board {
        let mut board = Board::empty();
        for color in Color::ALL {
            let back = color.back_row() as usize;
            let pawns = pawn::start_row(color) as usize;
            for (col, &kind) in rank.iter().enumerate() {
                board.place(Piece::new(kind, color, Square::from_index(back * 8 + col)));
                board.place(Piece::pawn(color, Square::from_index(pawns * 8 + col), false));
            }
        }
        board
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.cells[square.index()].as_ref()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_squares[color.index()]
    }

    /// Every piece in square index order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |piece| piece.color() == color)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    pub fn count_of(&self, color: Color, kind: PieceKind) -> usize {
        self.pieces_of(color).filter(|piece| piece.kind() == kind).count()
    }

    /// Check status of `color`, computed on first query after a mutation.
    pub fn check_status(&self, color: Color) -> CheckStatus {
        let slot = &self.check_status[color.index()];
        if let Some(status) = slot.get() {
            return status;
        }
        let status = analyze_check(self, color);
        slot.set(Some(status));
        status
    }

    #[inline]
    pub fn is_check(&self, color: Color) -> bool {
        self.check_status(color).is_check()
    }

    /// Seed the cache with a status computed elsewhere.
    pub(crate) fn set_check_status(&self, color: Color, status: CheckStatus) {
        self.check_status[color.index()].set(Some(status));
    }

    /// Put `piece` on its own square, returning whatever stood there.
    pub(crate) fn place(&mut self, piece: Piece) -> Option<Piece> {
        let square = piece.square();
        let replaced = self.take(square);
        if piece.is_king() {
            self.king_squares[piece.color().index()] = Some(square);
        }
        self.cells[square.index()] = Some(piece);
        self.invalidate();
        replaced
    }

    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        let taken = self.cells[square.index()].take();
        if let Some(piece) = &taken {
            let slot = &mut self.king_squares[piece.color().index()];
            if piece.is_king() && *slot == Some(square) {
                *slot = None;
            }
        }
        self.invalidate();
        taken
    }

    /// Deliver the move notice to every piece. `rook_relocation` is the rook
    /// leg of a castle.
    pub(crate) fn notify_moved(&mut self, relocation: Move, rook_relocation: Option<Move>) {
        let castling = rook_relocation.is_some();
        for piece in self.cells.iter_mut().flatten() {
            piece.on_moved(relocation, castling);
        }
        if let Some(rook_move) = rook_relocation {
            if let Some(rook) = self.cells[rook_move.to().index()].as_mut() {
                rook.on_moved(rook_move, false);
            }
        }
    }

    /// Pawns that may be captured en passant right now.
    pub fn en_passant_pawns(&self) -> SquareSet {
        self.pieces()
            .filter(|piece| piece.is_en_passant_target())
            .map(|piece| piece.square())
            .collect()
    }

    /// Re-flag the pawns on `squares` as just double-stepped.
    pub(crate) fn restore_en_passant(&mut self, squares: SquareSet) {
        for square in squares {
            if let Some(piece) = self.cells[square.index()].as_mut() {
                piece.set_en_passant(true);
            }
        }
    }

    #[inline]
    pub(crate) fn invalidate(&mut self) {
        for slot in &self.check_status {
            slot.set(None);
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_board(self))
    }
}
