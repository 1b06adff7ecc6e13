//! Piece values and the movement contract shared by every kind.
//!
//! A [`Piece`] is a small `Copy` value: colour, the square it stands on and a
//! closed [`Role`] variant carrying the kind-specific flags (pawn en passant
//! eligibility, rook and king step counters, the king's castled flag). Those
//! flags change only through [`Piece::on_moved`] and [`Piece::on_undone`].
//!
//! Reachability is dispatched to the per-kind modules and ignores pins; pin
//! and check filtering is layered on top by [`crate::attacks::pins`].

use std::fmt;

use crate::attacks::pins::is_bound;
use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board_store::board::Board;
use crate::errors::ValidationError;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::pieces::{bishop, king, knight, pawn, queen, rook};

/// Kind of a piece together with its kind-specific mutable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `en_passant` is set right after the pawn double-stepped.
    Pawn { en_passant: bool },
    Knight,
    Bishop,
    /// `steps` counts moves made; zero means the rook may still castle.
    Rook { steps: u32 },
    Queen,
    /// `steps` counts moves made; `castled` records a completed castle.
    King { steps: u32, castled: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    square: Square,
    role: Role,
}

impl Piece {
    /// Fresh piece of `kind` with all flags cleared.
    pub fn new(kind: PieceKind, color: Color, square: Square) -> Piece {
        let role = match kind {
            PieceKind::Pawn => Role::Pawn { en_passant: false },
            PieceKind::Knight => Role::Knight,
            PieceKind::Bishop => Role::Bishop,
            PieceKind::Rook => Role::Rook { steps: 0 },
            PieceKind::Queen => Role::Queen,
            PieceKind::King => Role::King {
                steps: 0,
                castled: false,
            },
        };
        Piece {
            color,
            square,
            role,
        }
    }

    pub fn pawn(color: Color, square: Square, en_passant: bool) -> Piece {
        Piece {
            color,
            square,
            role: Role::Pawn { en_passant },
        }
    }

    pub fn rook(color: Color, square: Square, steps: u32) -> Piece {
        Piece {
            color,
            square,
            role: Role::Rook { steps },
        }
    }

    pub fn king(color: Color, square: Square, steps: u32, castled: bool) -> Piece {
        Piece {
            color,
            square,
            role: Role::King { steps, castled },
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn kind(&self) -> PieceKind {
        match self.role {
            Role::Pawn { .. } => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook { .. } => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King { .. } => PieceKind::King,
        }
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        matches!(self.role, Role::King { .. })
    }

    #[inline]
    pub fn is_pawn(&self) -> bool {
        matches!(self.role, Role::Pawn { .. })
    }

    /// True for a pawn that just double-stepped.
    pub fn is_en_passant_target(&self) -> bool {
        matches!(self.role, Role::Pawn { en_passant: true })
    }

    /// Step counter of rooks and kings; zero for other kinds.
    pub fn steps(&self) -> u32 {
        match self.role {
            Role::Rook { steps } | Role::King { steps, .. } => steps,
            _ => 0,
        }
    }

    pub fn has_castled(&self) -> bool {
        matches!(self.role, Role::King { castled: true, .. })
    }

    /// Rook or king that has never moved.
    pub fn can_castle(&self) -> bool {
        matches!(self.role, Role::Rook { steps: 0 } | Role::King { steps: 0, .. })
    }

    #[inline]
    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    pub(crate) fn set_en_passant(&mut self, flag: bool) {
        if let Role::Pawn { en_passant } = &mut self.role {
            *en_passant = flag;
        }
    }

    /// Geometric and occupancy reachability of `to`, ignoring pins.
    pub fn is_reachable(&self, to: Square, board: &Board) -> bool {
        match self.role {
            Role::Pawn { .. } => pawn::is_reachable(self, to, board),
            Role::Knight => knight::is_reachable(self, to, board),
            Role::Bishop => bishop::is_reachable(self, to, board),
            Role::Rook { .. } => rook::is_reachable(self, to, board),
            Role::Queen => queen::is_reachable(self, to, board),
            Role::King { .. } => king::is_reachable(self, to, board),
        }
    }

    /// Push every geometrically reachable move into `out`.
    pub fn collect_reachable(&self, board: &Board, out: &mut Vec<Move>) {
        match self.role {
            Role::Pawn { .. } => pawn::collect_reachable(self, board, out),
            Role::Knight => knight::collect_reachable(self, board, out),
            Role::Bishop => bishop::collect_reachable(self, board, out),
            Role::Rook { .. } => rook::collect_reachable(self, board, out),
            Role::Queen => queen::collect_reachable(self, board, out),
            Role::King { .. } => king::collect_reachable(self, board, out),
        }
    }

    pub fn reachable_moves(&self, board: &Board) -> Vec<Move> {
        let mut out = Vec::with_capacity(16);
        self.collect_reachable(board, &mut out);
        out
    }

    pub fn count_reachable_moves(&self, board: &Board) -> usize {
        self.reachable_moves(board).len()
    }

    /// Reachable moves that survive pin and check filtering.
    pub fn possible_moves(&self, board: &Board) -> Vec<Move> {
        let mut out = self.reachable_moves(board);
        out.retain(|mv| !is_bound(board, self, mv.to()));
        out
    }

    /// True iff at least one legal move exists for this piece.
    pub fn is_selectable(&self, board: &Board) -> bool {
        self.reachable_moves(board)
            .iter()
            .any(|mv| !is_bound(board, self, mv.to()))
    }

    /// Reachable and not bound.
    pub fn is_legal_destination(&self, to: Square, board: &Board) -> bool {
        self.is_reachable(to, board) && !is_bound(board, self, to)
    }

    /// Flag update after a move was applied. `relocation` is the actual
    /// from/to of the moved piece (the normalised king square for castling);
    /// every other piece on the board receives the same notice.
    pub fn on_moved(&mut self, relocation: Move, castling: bool) {
        let is_mover = self.square == relocation.to();
        match &mut self.role {
            Role::Pawn { en_passant } => {
                *en_passant = is_mover
                    && relocation.from().row().abs_diff(relocation.to().row()) == 2;
            }
            Role::Rook { steps } if is_mover => *steps += 1,
            Role::King { steps, castled } if is_mover => {
                *steps += 1;
                if castling {
                    *castled = true;
                }
            }
            _ => {}
        }
    }

    /// Roll back the flags of a piece returning to `origin`.
    pub fn on_undone(&mut self, origin: Square, castling: bool) {
        self.square = origin;
        match &mut self.role {
            Role::Pawn { en_passant } => *en_passant = false,
            Role::Rook { steps } => *steps = steps.saturating_sub(1),
            Role::King { steps, castled } => {
                *steps = steps.saturating_sub(1);
                if castling {
                    *castled = false;
                }
            }
            _ => {}
        }
    }

    /// Parse a `Kind-color-square[-extra]` token.
    pub fn from_code(token: &str) -> Result<Piece, ValidationError> {
        let malformed = || ValidationError::MalformedPiece(token.to_owned());
        let mut parts = token.split('-');

        let kind = PieceKind::from_code(parts.next().ok_or_else(malformed)?)?;
        let color = Color::from_code(parts.next().ok_or_else(malformed)?).map_err(|_| malformed())?;
        let square = Square::parse(parts.next().ok_or_else(malformed)?)?;
        let extras: Vec<&str> = parts.collect();

        let piece = match (kind, extras.as_slice()) {
            (PieceKind::Pawn, []) => Piece::pawn(color, square, false),
            (PieceKind::Pawn, [flag]) => Piece::pawn(color, square, parse_flag(flag).ok_or_else(malformed)?),
            (PieceKind::Rook, []) => Piece::rook(color, square, 0),
            (PieceKind::Rook, [steps]) => {
                Piece::rook(color, square, steps.parse().map_err(|_| malformed())?)
            }
            (PieceKind::King, []) => Piece::king(color, square, 0, false),
            (PieceKind::King, [steps]) => {
                Piece::king(color, square, steps.parse().map_err(|_| malformed())?, false)
            }
            (PieceKind::King, [steps, castled]) => Piece::king(
                color,
                square,
                steps.parse().map_err(|_| malformed())?,
                parse_flag(castled).ok_or_else(malformed)?,
            ),
            (PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen, []) => {
                Piece::new(kind, color, square)
            }
            _ => return Err(malformed()),
        };

        Ok(piece)
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.kind().code(), self.color, self.square)?;
        match self.role {
            Role::Pawn { en_passant } => write!(f, "-{en_passant}"),
            Role::Rook { steps } => write!(f, "-{steps}"),
            Role::King { steps, castled } => {
                write!(f, "-{steps}")?;
                if castled {
                    f.write_str("-true")?;
                }
                Ok(())
            }
            Role::Knight | Role::Bishop | Role::Queen => Ok(()),
        }
    }
}
