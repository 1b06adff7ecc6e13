//! Game state machine.
//!
//! [`Game`] owns a [`Board`], the side to move, the halfmove clock and two
//! stacks pushed on every move and popped on every undo: the
//! [`ExtendedMove`] records and the position [`Memento`]s used for
//! repetition detection. After each move the game is classified, in this
//! order, as checkmate or stalemate, a draw by insufficient material, by
//! repetition, by the fifty-move rule, or still in progress.
//!
//! A game expects one caller alternating `apply_move` and `undo`. Parallel
//! consumers take independent copies through [`Game::clones`].

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::attacks::check_analysis::analyze_check_after;
use crate::attacks::check_status::CheckStatus;
use crate::board::chess_move::Move;
use crate::board::square::Square;
use crate::board_store::board::Board;
use crate::board_store::chess960::back_rank_wrapping;
use crate::errors::{ChessResult, ProtocolViolation, ValidationError};
use crate::game_state::chess_rules::{is_promotion_kind, RulesConfig, CHESS960_POSITION_COUNT};
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::extended_move::{CastlingRook, ExtendedMove};
use crate::game_state::game_status::GameStatus;
use crate::game_state::memento::{repetition_count, Memento};
use crate::game_state::promotion::{PromotionChooser, QueenPromotion};
use crate::pieces::king::{castling_destinations, castling_partner};
use crate::pieces::pawn;
use crate::pieces::piece::Piece;
use crate::utils::description_generator::generate_description;
use crate::utils::description_parser::{parse_description, GameDescription};
use crate::utils::fen_parser::parse_fen;

pub struct Game {
    // --- Position ---
    board: Board,
    side_to_move: Color,
    halfmove_clock: u32,
    status: GameStatus,

    // --- Rules and collaborators ---
    config: RulesConfig,
    promotion: Arc<dyn PromotionChooser>,

    // --- Move/undo stacks ---
    history: Vec<ExtendedMove>,
    mementos: Vec<Memento>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("side_to_move", &self.side_to_move)
            .field("halfmove_clock", &self.halfmove_clock)
            .field("status", &self.status)
            .field("config", &self.config)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// Orthodox start position, white to move.
    pub fn new() -> Game {
        Game::from_parts(Board::standard(), Color::White, 0)
    }

    /// Start position for Chess960 arrangement `index` (`0..960`).
    pub fn chess960(index: u32) -> Result<Game, ValidationError> {
        Ok(Game::from_parts(Board::chess960(index)?, Color::White, 0))
    }

    /// Uniformly chosen Chess960 start position.
    pub fn random_chess960<R: Rng + ?Sized>(rng: &mut R) -> Game {
        let index = rng.random_range(0..CHESS960_POSITION_COUNT);
        let board = Board::from_back_rank(&back_rank_wrapping(index));
        debug!(index, "setting up random chess960 position");
        Game::from_parts(board, Color::White, 0)
    }

    /// Game from the textual description format.
    pub fn deserialize(text: &str) -> Result<Game, ValidationError> {
        let description = parse_description(text).inspect_err(|err| {
            warn!(%err, "rejected game description");
        })?;
        Ok(Game::from_description(description))
    }

    pub fn from_fen(fen: &str) -> Result<Game, ValidationError> {
        let description = parse_fen(fen).inspect_err(|err| {
            warn!(%err, "rejected FEN");
        })?;
        Ok(Game::from_description(description))
    }

    fn from_description(description: GameDescription) -> Game {
        Game::from_parts(
            description.board,
            description.side_to_move,
            description.halfmove_clock,
        )
    }

    fn from_parts(board: Board, side_to_move: Color, halfmove_clock: u32) -> Game {
        let mut game = Game {
            board,
            side_to_move,
            halfmove_clock,
            status: GameStatus::InProgress,
            config: RulesConfig::default(),
            promotion: Arc::new(QueenPromotion),
            history: Vec::new(),
            mementos: Vec::new(),
        };
        game.mementos.push(Memento::capture(&game.board, side_to_move));
        game.status = game.classify();
        game
    }

    /// Replace the draw rules; the current position is reclassified.
    pub fn with_config(mut self, config: RulesConfig) -> Game {
        self.config = config;
        self.status = self.classify();
        self
    }

    pub fn with_promotion_chooser(mut self, chooser: impl PromotionChooser + 'static) -> Game {
        self.promotion = Arc::new(chooser);
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn config(&self) -> RulesConfig {
        self.config
    }

    /// Apply `mv`, asking the promotion collaborator when a pawn reaches the
    /// last rank. Returns the resulting status.
    pub fn apply_move(&mut self, mv: Move) -> ChessResult<GameStatus> {
        self.apply(mv, None)
    }

    /// Apply `mv`, promoting to `kind` if it is a promotion move. The
    /// collaborator is not consulted.
    pub fn apply_move_with_promotion(&mut self, mv: Move, kind: PieceKind) -> ChessResult<GameStatus> {
        self.apply(mv, Some(kind))
    }

    fn apply(&mut self, mv: Move, requested: Option<PieceKind>) -> ChessResult<GameStatus> {
        let (from, to) = (mv.from(), mv.to());
        let mover = *self
            .board
            .piece_at(from)
            .ok_or(ProtocolViolation::EmptySquare(from))?;
        let color = mover.color();
        if color != self.side_to_move {
            return Err(ProtocolViolation::WrongColor {
                square: from,
                found: color,
                expected: self.side_to_move,
            }
            .into());
        }
        if !mover.is_legal_destination(to, &self.board) {
            return Err(ProtocolViolation::IllegalMove(mv).into());
        }

        let promotion = if mover.is_pawn() && pawn::is_promotion(color, to) {
            let kind = requested.unwrap_or_else(|| self.promotion.choose_safe_promotion(to));
            if !is_promotion_kind(kind) {
                return Err(ValidationError::InvalidPromotionChoice(kind).into());
            }
            Some(kind)
        } else {
            None
        };

        let prior_en_passant = self.board.en_passant_pawns();
        let prior_halfmove_clock = self.halfmove_clock;
        let prior_status = self.status;

        let castling = castling_partner(&mover, to, &self.board).copied();
        let mut captured = None;
        let mut en_passant_victim = None;
        let destination;
        let mut castling_rook = None;
        let mut rook_relocation = None;

        if let Some(rook) = castling {
            let (king_dest, rook_dest) = castling_destinations(from, rook.square());
            // Lift both before placing either: the squares may overlap.
            let mut lifted_rook = self.board.take(rook.square()).unwrap_or(rook);
            let mut king = self.board.take(from).unwrap_or(mover);
            king.set_square(king_dest);
            lifted_rook.set_square(rook_dest);
            self.board.place(king);
            self.board.place(lifted_rook);

            destination = king_dest;
            castling_rook = Some(CastlingRook {
                rook,
                destination: rook_dest,
            });
            rook_relocation = Some(Move::new(rook.square(), rook_dest));
        } else {
            if let Some(victim) = pawn::en_passant_victim(&mover, to, &self.board) {
                en_passant_victim = self.board.take(victim);
            }
            let mut piece = self.board.take(from).unwrap_or(mover);
            captured = self.board.take(to);
            piece.set_square(to);
            self.board.place(piece);
            destination = to;
        }

        self.board
            .notify_moved(Move::new(from, destination), rook_relocation);

        if let Some(kind) = promotion {
            self.board.place(Piece::new(kind, color, destination));
        }

        let resets_clock = mover.is_pawn() || captured.is_some() || en_passant_victim.is_some();
        self.halfmove_clock = if resets_clock { 0 } else { self.halfmove_clock + 1 };
        self.side_to_move = color.opposite();

        let record = ExtendedMove {
            mv,
            mover: color,
            origin: from,
            destination,
            captured,
            en_passant_victim,
            castling: castling_rook,
            promotion,
            prior_en_passant,
            prior_halfmove_clock,
            prior_status,
        };

        let status = analyze_check_after(&self.board, &record);
        self.board.set_check_status(self.side_to_move, status);
        self.board.set_check_status(color, CheckStatus::NoCheck);

        self.history.push(record);
        self.mementos
            .push(Memento::capture(&self.board, self.side_to_move));
        self.status = self.classify();

        trace!(%mv, status = %self.status, "applied move");
        Ok(self.status)
    }

    /// Revert the last applied move and return its record.
    pub fn undo(&mut self) -> ChessResult<ExtendedMove> {
        let record = self.history.pop().ok_or(ProtocolViolation::EmptyUndoStack)?;
        self.mementos.pop();

        if let Some(castling) = record.castling {
            let king = self.board.take(record.destination);
            let rook = self.board.take(castling.destination);
            if let Some(mut king) = king {
                king.on_undone(record.origin, true);
                self.board.place(king);
            }
            if let Some(mut rook) = rook {
                rook.on_undone(castling.rook.square(), false);
                self.board.place(rook);
            }
        } else {
            if let Some(mut piece) = self.board.take(record.destination) {
                if record.is_promotion() {
                    piece = Piece::pawn(record.mover, record.origin, false);
                } else {
                    piece.on_undone(record.origin, false);
                }
                self.board.place(piece);
            }
            if let Some(captured) = record.captured {
                self.board.place(captured);
            }
            if let Some(victim) = record.en_passant_victim {
                self.board.place(victim);
            }
        }

        self.board.restore_en_passant(record.prior_en_passant);
        self.halfmove_clock = record.prior_halfmove_clock;
        self.status = record.prior_status;
        self.side_to_move = record.mover;

        trace!(mv = %record.mv, "undid move");
        Ok(record)
    }

    /// Every legal move of the side to move, ordered by origin square.
    /// Castles appear as the king moving onto its rook. Draw status is not
    /// consulted.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(48);
        for piece in self.board.pieces_of(self.side_to_move) {
            out.extend(piece.possible_moves(&self.board));
        }
        out
    }

    fn has_legal_move(&self) -> bool {
        self.board
            .pieces_of(self.side_to_move)
            .any(|piece| piece.is_selectable(&self.board))
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_check(color)
    }

    /// Whether `square` holds a piece of `color` with at least one legal move.
    pub fn is_selectable(&self, square: Square, color: Color) -> bool {
        self.board
            .piece_at(square)
            .is_some_and(|piece| piece.color() == color && piece.is_selectable(&self.board))
    }

    pub fn is_legal_move(&self, from: Square, to: Square, color: Color) -> bool {
        self.board.piece_at(from).is_some_and(|piece| {
            piece.color() == color && piece.is_legal_destination(to, &self.board)
        })
    }

    /// Whether `mv` moves a pawn onto its last rank.
    pub fn is_promotion_move(&self, mv: Move) -> bool {
        self.board
            .piece_at(mv.from())
            .is_some_and(|piece| piece.is_pawn() && pawn::is_promotion(piece.color(), mv.to()))
    }

    #[inline]
    pub fn piece_count(&self) -> usize {
        self.board.piece_count()
    }

    pub fn serialize(&self) -> String {
        generate_description(&self.board, self.side_to_move, self.halfmove_clock)
    }

    /// `n` independent copies rebuilt from the serialized position. Copies
    /// share the rules and promotion collaborator but start with empty
    /// stacks.
    pub fn clones(&self, n: usize) -> Result<Vec<Game>, ValidationError> {
        let text = self.serialize();
        (0..n)
            .map(|_| {
                let mut copy = Game::deserialize(&text)?;
                copy.config = self.config;
                copy.promotion = Arc::clone(&self.promotion);
                copy.status = copy.classify();
                Ok(copy)
            })
            .collect()
    }

    /// The last `n` applied moves, oldest first.
    pub fn move_history(&self, n: usize) -> &[ExtendedMove] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    #[inline]
    pub fn last_extended_move(&self) -> Option<&ExtendedMove> {
        self.history.last()
    }

    /// Mark the game as resigned by `color`.
    pub fn resign(&mut self, color: Color) {
        debug!(%color, "resignation");
        self.status = GameStatus::Resigned { loser: color };
    }

    /// Occurrences of the current position with the same side to move.
    pub fn repetition_count(&self) -> usize {
        repetition_count(&self.mementos)
    }

    fn classify(&self) -> GameStatus {
        let status = if !self.has_legal_move() {
            if self.board.is_check(self.side_to_move) {
                GameStatus::Checkmate {
                    winner: self.side_to_move.opposite(),
                }
            } else {
                GameStatus::Stalemate
            }
        } else if self.config.detect_insufficient_material
            && is_insufficient_material(&self.board)
        {
            GameStatus::DrawByMaterial
        } else if self.repetition_count() >= self.config.repetition_limit {
            GameStatus::DrawByRepetition
        } else if self.halfmove_clock >= self.config.fifty_move_limit {
            GameStatus::DrawByFiftyMoves
        } else {
            GameStatus::InProgress
        };

        if status.is_over() {
            debug!(%status, halfmove_clock = self.halfmove_clock, "game over");
        }
        status
    }
}

/// No pawns, rooks or queens, at most one minor piece per side, and never a
/// bishop facing a knight.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut minors: [Option<PieceKind>; 2] = [None, None];
    for piece in board.pieces() {
        match piece.kind() {
            PieceKind::King => {}
            kind if kind.is_minor() => {
                let slot = &mut minors[piece.color().index()];
                if slot.is_some() {
                    return false;
                }
                *slot = Some(kind);
            }
            _ => return false,
        }
    }

    !matches!(
        minors,
        [Some(PieceKind::Bishop), Some(PieceKind::Knight)]
            | [Some(PieceKind::Knight), Some(PieceKind::Bishop)]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STANDARD_CHESS960_INDEX;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sq(code: &str) -> Square {
        Square::parse(code).expect("test square should parse")
    }

    fn mv(code: &str) -> Move {
        Move::parse(code).expect("test move should parse")
    }

    fn game(description: &str) -> Game {
        Game::deserialize(description).expect("fixture should parse")
    }

    fn assert_undo_restores_every_move(game: &mut Game) {
        let before = game.serialize();
        for legal in game.legal_moves() {
            game.apply_move(legal).expect("legal move should apply");
            game.undo().expect("undo should succeed");
            assert_eq!(game.serialize(), before, "undo after {legal}");
        }
    }

    #[test]
    fn castling_moves_king_and_rook_and_undoes() {
        let original = "white 0 King-white-e1-0 Rock-white-h1-0 King-black-e8-0";
        let mut game = game(original);

        game.apply_move(mv("e1-h1")).expect("castling should apply");
        assert_eq!(
            game.serialize(),
            "black 1 Rock-white-f1-1 King-white-g1-1-true King-black-e8-0"
        );
        let last = game.last_extended_move().expect("a move was applied");
        assert!(last.is_castling());
        assert_eq!(last.destination, sq("g1"));

        game.undo().expect("undo should succeed");
        assert_eq!(game.serialize(), original);
    }

    #[test]
    fn chess960_castle_onto_adjacent_rook_round_trips() {
        let original = "white 0 Rock-white-b1-0 King-white-c1-0 Rock-white-g1-0 King-black-e8-0";
        let mut game = game(original);

        game.apply_move(mv("c1-b1")).expect("queenside castle should apply");
        assert_eq!(
            game.serialize(),
            "black 1 King-white-c1-1-true Rock-white-d1-1 Rock-white-g1-0 King-black-e8-0"
        );
        game.undo().expect("undo should succeed");
        assert_eq!(game.serialize(), original);

        game.apply_move(mv("c1-g1")).expect("kingside castle should apply");
        assert_eq!(
            game.serialize(),
            "black 1 Rock-white-b1-0 Rock-white-f1-1 King-white-g1-1-true King-black-e8-0"
        );
        game.undo().expect("undo should succeed");
        assert_eq!(game.serialize(), original);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let original = "black 0 Pawn-white-c4-true Pawn-black-b4-false King-white-e1-0 King-black-e8-0";
        let mut game = game(original);
        let before = game.serialize();

        game.apply_move(mv("b4-c3")).expect("en passant should apply");
        assert_eq!(
            game.serialize(),
            "white 0 King-white-e1-0 Pawn-black-c3-false King-black-e8-0"
        );
        assert!(game.last_extended_move().expect("a move was applied").is_en_passant());

        game.undo().expect("undo should succeed");
        assert_eq!(game.serialize(), before);
    }

    #[test]
    fn only_pawns_capture_en_passant() {
        for (fixture, code) in [
            ("black 0 Pawn-white-g4-true King-black-h4-1 King-white-a1-0", "h4-g3"),
            ("black 0 Pawn-white-d4-true Bishop-black-e4 King-black-h7-0 King-white-a1-0", "e4-d3"),
            ("black 0 Pawn-white-d4-true Queen-black-e4 King-black-h7-0 King-white-a1-0", "e4-d3"),
        ] {
            let mut game = game(fixture);
            let before = game.serialize();

            game.apply_move(mv(code)).expect("diagonal step should apply");
            let last = game.last_extended_move().expect("a move was applied");
            assert!(!last.is_en_passant(), "{fixture}");
            assert!(!last.is_capture(), "{fixture}");
            assert_eq!(game.piece_count(), 3, "{fixture}");
            assert_eq!(game.halfmove_clock(), 1, "{fixture}");
            assert!(game
                .board()
                .pieces_of(Color::White)
                .any(|piece| piece.is_pawn()), "{fixture}");

            game.undo().expect("undo should succeed");
            assert_eq!(game.serialize(), before, "{fixture}");
        }
    }

    #[test]
    fn en_passant_right_expires_after_one_move() {
        let mut game = Game::new();
        for code in ["e2-e4", "a7-a6", "e4-e5", "d7-d5"] {
            game.apply_move(mv(code)).expect("opening move should apply");
        }
        assert!(game.is_legal_move(sq("e5"), sq("d6"), Color::White));

        game.apply_move(mv("a2-a3")).expect("waiting move should apply");
        game.apply_move(mv("a6-a5")).expect("waiting move should apply");
        assert!(!game.is_legal_move(sq("e5"), sq("d6"), Color::White));
    }

    #[test]
    fn queen_mate_is_detected() {
        let mut game = game("black 0 King-white-e1-0 Queen-black-h2 Pawn-black-f3-false King-black-e8-0");
        let status = game.apply_move(mv("h2-e2")).expect("mating move should apply");

        assert_eq!(status, GameStatus::Checkmate { winner: Color::Black });
        assert!(game.is_in_check(Color::White));
        assert!(game.legal_moves().is_empty());

        game.undo().expect("undo should succeed");
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn stalemate_is_detected() {
        let mut game = game("black 0 King-white-a1-0 Queen-black-c4 King-black-e8-0");
        let status = game.apply_move(mv("c4-b3")).expect("move should apply");
        assert_eq!(status, GameStatus::Stalemate);
        assert!(!game.is_in_check(Color::White));
        assert!(status.is_draw());
    }

    #[test]
    fn threefold_repetition_fires_on_third_occurrence() {
        let shuffle = ["g1-f3", "g8-f6", "f3-g1", "f6-g8"];
        let mut game = Game::new();
        assert_eq!(game.repetition_count(), 1);

        for code in shuffle {
            game.apply_move(mv(code)).expect("shuffle move should apply");
        }
        assert_eq!(game.repetition_count(), 2);
        assert_eq!(game.status(), GameStatus::InProgress);

        for code in shuffle {
            game.apply_move(mv(code)).expect("shuffle move should apply");
        }
        assert_eq!(game.repetition_count(), 3);
        assert_eq!(game.status(), GameStatus::DrawByRepetition);

        game.undo().expect("undo should succeed");
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn halfmove_clock_resets_and_reaches_fifty_moves() {
        let mut game = Game::new();
        game.apply_move(mv("g1-f3")).expect("knight move should apply");
        game.apply_move(mv("g8-f6")).expect("knight move should apply");
        assert_eq!(game.halfmove_clock(), 2);
        game.apply_move(mv("e2-e4")).expect("pawn move should apply");
        assert_eq!(game.halfmove_clock(), 0);
        game.apply_move(mv("f6-e4")).expect("capture should apply");
        assert_eq!(game.halfmove_clock(), 0);

        let mut game = game_with_clock(98);
        assert_eq!(
            game.apply_move(mv("a1-a2")).expect("rook move should apply"),
            GameStatus::InProgress
        );
        assert_eq!(
            game.apply_move(mv("e8-f7")).expect("king move should apply"),
            GameStatus::DrawByFiftyMoves
        );
        assert_eq!(game.halfmove_clock(), 100);
    }

    fn game_with_clock(clock: u32) -> Game {
        game(&format!(
            "white {clock} King-white-e1-0 Rock-white-a1-1 King-black-e8-0"
        ))
    }

    #[test]
    fn custom_rules_change_draw_thresholds() {
        let config = RulesConfig {
            repetition_limit: 2,
            fifty_move_limit: 10,
            detect_insufficient_material: false,
        };
        let mut game = Game::new().with_config(config);
        for code in ["g1-f3", "g8-f6", "f3-g1", "f6-g8"] {
            game.apply_move(mv(code)).expect("shuffle move should apply");
        }
        assert_eq!(game.status(), GameStatus::DrawByRepetition);

        let bare = game_with_clock(0).with_config(config);
        assert_eq!(bare.status(), GameStatus::InProgress);
        let kings = Game::deserialize("white 0 King-white-e1-0 King-black-e8-0")
            .expect("fixture should parse")
            .with_config(config);
        assert_eq!(kings.status(), GameStatus::InProgress);
    }

    #[test]
    fn insufficient_material_rules() {
        for (description, expected) in [
            ("white 0 King-white-e1-0 King-black-e8-0", true),
            ("white 0 King-white-e1-0 Knight-white-b1 King-black-e8-0", true),
            ("white 0 King-white-e1-0 Bishop-white-c1 Bishop-black-c8 King-black-e8-0", true),
            ("white 0 King-white-e1-0 Knight-white-b1 Knight-black-b8 King-black-e8-0", true),
            ("white 0 King-white-e1-0 Bishop-white-c1 Knight-black-b8 King-black-e8-0", false),
            ("white 0 King-white-e1-0 Knight-white-b1 Knight-white-g1 King-black-e8-0", false),
            ("white 0 King-white-e1-0 Pawn-white-a2-false King-black-e8-0", false),
            ("white 0 King-white-e1-0 Rock-white-a1-1 King-black-e8-0", false),
        ] {
            let game = game(description);
            assert_eq!(is_insufficient_material(game.board()), expected, "{description}");
        }

        let mut game = game("white 0 King-white-e1-0 Bishop-white-f1 Knight-black-e2 King-black-h8-0");
        assert_eq!(game.status(), GameStatus::InProgress);
        let status = game.apply_move(mv("e1-e2")).expect("king capture should apply");
        assert_eq!(status, GameStatus::DrawByMaterial);
    }

    #[test]
    fn protocol_violations_are_reported() {
        let mut game = Game::new();

        let err = game.apply_move(mv("e4-e5")).expect_err("empty origin");
        assert_eq!(err, ChessError::Protocol(ProtocolViolation::EmptySquare(sq("e4"))));
        assert!(err.is_protocol_violation());

        let err = game.apply_move(mv("e7-e5")).expect_err("wrong colour");
        assert!(matches!(
            err,
            ChessError::Protocol(ProtocolViolation::WrongColor {
                found: Color::Black,
                expected: Color::White,
                ..
            })
        ));

        let err = game.apply_move(mv("e2-e5")).expect_err("unreachable");
        assert_eq!(err, ChessError::Protocol(ProtocolViolation::IllegalMove(mv("e2-e5"))));

        let err = game.undo().expect_err("nothing to undo");
        assert_eq!(err, ChessError::Protocol(ProtocolViolation::EmptyUndoStack));
        assert_eq!(game.serialize(), Game::new().serialize());
    }

    #[test]
    fn promotion_uses_the_collaborator() {
        let original = "white 0 King-white-e1-0 Pawn-white-b7-false Rock-black-a8-1 King-black-h8-0";

        let mut knights = game(original).with_promotion_chooser(|_: Square| PieceKind::Knight);
        assert!(knights.is_promotion_move(mv("b7-b8")));
        knights.apply_move(mv("b7-b8")).expect("promotion should apply");
        assert_eq!(
            knights.board().piece_at(sq("b8")).map(|piece| piece.kind()),
            Some(PieceKind::Knight)
        );
        knights.undo().expect("undo should succeed");
        assert_eq!(knights.serialize(), game(original).serialize());

        let mut invalid = game(original).with_promotion_chooser(|_: Square| PieceKind::King);
        let err = invalid.apply_move(mv("b7-b8")).expect_err("king is not a promotion");
        assert_eq!(
            err,
            ChessError::Validation(ValidationError::InvalidPromotionChoice(PieceKind::King))
        );
        assert!(!err.is_protocol_violation());
        assert_eq!(invalid.serialize(), game(original).serialize());
    }

    #[test]
    fn promotion_capture_undoes_exactly() {
        let mut game = game("white 0 King-white-e1-0 Pawn-white-b7-false Rock-black-a8-1 King-black-h8-0");
        let before = game.serialize();

        game.apply_move_with_promotion(mv("b7-a8"), PieceKind::Rook)
            .expect("capture promotion should apply");
        let last = game.last_extended_move().expect("a move was applied");
        assert!(last.is_capture() && last.is_promotion());
        assert_eq!(
            game.board().piece_at(sq("a8")).map(|piece| (piece.kind(), piece.color())),
            Some((PieceKind::Rook, Color::White))
        );
        assert_eq!(game.halfmove_clock(), 0);

        game.undo().expect("undo should succeed");
        assert_eq!(game.serialize(), before);
        assert_undo_restores_every_move(&mut game);
    }

    #[test]
    fn undo_restores_every_legal_move() {
        assert_undo_restores_every_move(&mut Game::new());
        assert_undo_restores_every_move(
            &mut Game::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0")
                .expect("kiwipete parses"),
        );
        assert_undo_restores_every_move(&mut game(
            "white 0 Pawn-black-f5-true Pawn-white-e5-false Rock-white-e1-1 King-white-a1-0 King-black-e7-0",
        ));
        for index in [0, 959, STANDARD_CHESS960_INDEX] {
            assert_undo_restores_every_move(&mut Game::chess960(index).expect("index is valid"));
        }
    }

    #[test]
    fn serialize_round_trips() {
        let mut game = Game::new();
        for code in ["e2-e4", "d7-d5", "e4-d5", "g8-f6", "f1-b5", "c7-c6"] {
            game.apply_move(mv(code)).expect("opening move should apply");
            let copy = Game::deserialize(&game.serialize()).expect("serialized game parses");
            assert_eq!(copy.serialize(), game.serialize());
            assert_eq!(copy.board(), game.board());
        }
        assert_eq!(game.move_history(2).len(), 2);
        assert_eq!(game.move_history(2)[1].mv, mv("c7-c6"));
        assert_eq!(game.move_history(100).len(), 6);
    }

    #[test]
    fn queries_on_start_position() {
        let game = Game::new();
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.piece_count(), 32);
        assert!(game.is_selectable(sq("g1"), Color::White));
        assert!(!game.is_selectable(sq("g1"), Color::Black));
        assert!(!game.is_selectable(sq("d1"), Color::White));
        assert!(!game.is_selectable(sq("e4"), Color::White));
        assert!(game.is_legal_move(sq("e2"), sq("e4"), Color::White));
        assert!(!game.is_legal_move(sq("e2"), sq("e5"), Color::White));
        assert!(!game.is_promotion_move(mv("e2-e4")));
        assert!(!game.is_in_check(Color::White));
    }

    #[test]
    fn clones_are_independent() {
        let mut game = Game::new();
        game.apply_move(mv("e2-e4")).expect("move should apply");

        let mut copies = game.clones(3).expect("clones should rebuild");
        assert_eq!(copies.len(), 3);
        copies[0].apply_move(mv("e7-e5")).expect("move should apply on copy");

        assert_eq!(copies[1].serialize(), game.serialize());
        assert_ne!(copies[0].serialize(), game.serialize());
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn resignation_is_recorded() {
        let mut game = Game::new();
        game.resign(Color::White);
        assert_eq!(game.status(), GameStatus::Resigned { loser: Color::White });
        assert!(game.status().is_over());
        assert!(!game.status().is_draw());
    }

    #[test]
    fn seeded_random_chess960_game_undoes_to_start() {
        let mut rng = StdRng::seed_from_u64(960);
        let mut game = Game::random_chess960(&mut rng);
        let start = game.serialize();
        let mut applied = 0;

        while applied < 60 && !game.status().is_over() {
            let moves = game.legal_moves();
            let choice = moves[rng.random_range(0..moves.len())];
            game.apply_move(choice).expect("random legal move should apply");
            applied += 1;

            let copy = Game::deserialize(&game.serialize()).expect("position round trips");
            assert_eq!(copy.serialize(), game.serialize());
        }

        for _ in 0..applied {
            game.undo().expect("undo should succeed");
        }
        assert_eq!(game.serialize(), start);
        assert!(game.undo().is_err());
    }
}
