//! Perft node counting over the legal move generator.
//!
//! Each promotion move is expanded into its four possible pieces, so counts
//! match the published reference tables. The single-threaded variant walks
//! one game with apply/undo; the parallel variant splits the root moves
//! across independent copies made with [`Game::clones`].

use std::thread;

use crate::board::chess_move::Move;
use crate::errors::ChessResult;
use crate::game_state::chess_rules::PROMOTION_KINDS;
use crate::game_state::game_state::Game;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf count at `depth`, bulk-counted at the last ply.
pub fn perft(game: &mut Game, depth: u8) -> ChessResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = game.legal_moves();
    if depth == 1 {
        return Ok(moves
            .iter()
            .map(|&mv| if game.is_promotion_move(mv) { 4 } else { 1 })
            .sum());
    }

    let mut nodes = 0;
    for mv in moves {
        for_each_choice(game, mv, |game| {
            nodes += perft(game, depth - 1)?;
            Ok(())
        })?;
    }
    Ok(nodes)
}

/// Leaf count plus the per-leaf move classification reported by perft
/// suites. Slower than [`perft`]: every leaf is applied.
pub fn perft_detailed(game: &mut Game, depth: u8) -> ChessResult<PerftCounts> {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return Ok(counts);
    }

    for mv in game.legal_moves() {
        for_each_choice(game, mv, |game| {
            if depth == 1 {
                tally_leaf(game, &mut counts);
            } else {
                counts.merge(perft_detailed(game, depth - 1)?);
            }
            Ok(())
        })?;
    }
    Ok(counts)
}

fn tally_leaf(game: &Game, counts: &mut PerftCounts) {
    counts.nodes += 1;
    let Some(last) = game.last_extended_move() else {
        return;
    };
    if last.is_capture() {
        counts.captures += 1;
    }
    if last.is_en_passant() {
        counts.en_passant += 1;
    }
    if last.is_castling() {
        counts.castles += 1;
    }
    if last.is_promotion() {
        counts.promotions += 1;
    }
    if game.is_in_check(game.side_to_move()) {
        counts.checks += 1;
        if game.legal_moves().is_empty() {
            counts.checkmates += 1;
        }
    }
}

/// Apply `mv` once per promotion choice (or once if it does not promote),
/// run `visit`, and undo.
fn for_each_choice(
    game: &mut Game,
    mv: Move,
    mut visit: impl FnMut(&mut Game) -> ChessResult<()>,
) -> ChessResult<()> {
    if game.is_promotion_move(mv) {
        for kind in PROMOTION_KINDS {
            game.apply_move_with_promotion(mv, kind)?;
            visit(game)?;
            game.undo()?;
        }
    } else {
        game.apply_move(mv)?;
        visit(game)?;
        game.undo()?;
    }
    Ok(())
}

/// [`perft`] with the root moves spread over up to `threads` workers, each
/// owning its own copy of the game.
pub fn perft_parallel(game: &Game, depth: u8, threads: usize) -> ChessResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let root_moves = game.legal_moves();
    let workers = threads.clamp(1, root_moves.len().max(1));
    let copies = game.clones(workers)?;

    thread::scope(|scope| {
        let handles: Vec<_> = copies
            .into_iter()
            .enumerate()
            .map(|(worker, mut copy)| {
                let share: Vec<Move> = root_moves
                    .iter()
                    .copied()
                    .skip(worker)
                    .step_by(workers)
                    .collect();
                scope.spawn(move || -> ChessResult<u64> {
                    let mut nodes = 0;
                    for mv in share {
                        for_each_choice(&mut copy, mv, |copy| {
                            nodes += perft(copy, depth - 1)?;
                            Ok(())
                        })?;
                    }
                    Ok(nodes)
                })
            })
            .collect();

        let mut total = 0;
        for handle in handles {
            // A panicking worker re-raises its panic here.
            total += match handle.join() {
                Ok(result) => result?,
                Err(payload) => std::panic::resume_unwind(payload),
            };
        }
        Ok(total)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fen(text: &str) -> Game {
        Game::from_fen(text).expect("reference FEN should parse")
    }

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0";

    #[test]
    fn start_position_node_counts() {
        let mut game = Game::new();
        assert_eq!(perft(&mut game, 1).expect("perft runs"), 20);
        assert_eq!(perft(&mut game, 2).expect("perft runs"), 400);
        assert_eq!(perft(&mut game, 3).expect("perft runs"), 8902);
        assert_eq!(game.serialize(), Game::new().serialize());
    }

    #[test]
    fn reference_positions_node_counts() {
        let cases: [(&str, u8, u64); 5] = [
            (KIWIPETE, 2, 2039),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3, 2812),
            ("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1", 1, 6),
            ("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1", 2, 264),
            ("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", 2, 1486),
        ];

        for (position, depth, expected) in cases {
            let mut game = fen(position);
            assert_eq!(
                perft(&mut game, depth).expect("perft runs"),
                expected,
                "{position} depth {depth}"
            );
        }
    }

    #[test]
    fn detailed_counts_on_kiwipete() {
        let counts = perft_detailed(&mut fen(KIWIPETE), 1).expect("perft runs");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 48,
                captures: 8,
                en_passant: 0,
                castles: 2,
                promotions: 0,
                checks: 0,
                checkmates: 0,
            }
        );

        let counts = perft_detailed(&mut fen(KIWIPETE), 2).expect("perft runs");
        assert_eq!(counts.nodes, 2039);
        assert_eq!(counts.captures, 351);
        assert_eq!(counts.en_passant, 1);
        assert_eq!(counts.castles, 91);
        assert_eq!(counts.checks, 3);
    }

    #[test]
    fn parallel_matches_single_threaded() {
        let game = fen(KIWIPETE);
        let single = perft(&mut fen(KIWIPETE), 2).expect("perft runs");
        for threads in [1, 3, 8] {
            assert_eq!(
                perft_parallel(&game, 2, threads).expect("parallel perft runs"),
                single,
                "{threads} threads"
            );
        }
        assert_eq!(perft_parallel(&Game::new(), 0, 4).expect("perft runs"), 1);
    }
}
