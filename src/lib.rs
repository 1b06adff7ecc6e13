//! Crate root module declarations for the Fischer Chess rules engine.
//!
//! This file exposes the rule subsystems (coordinates, piece movement, attack
//! analysis, the board store and the game state machine) together with the
//! text-format and perft utilities so tests, benches and external search
//! layers can import stable module paths.

pub mod errors;

pub mod board {
    pub mod chess_move;
    pub mod square;
    pub mod square_set;
}

pub mod pieces {
    pub mod bishop;
    pub mod king;
    pub mod knight;
    pub mod pawn;
    pub mod piece;
    pub mod queen;
    pub mod rook;
    pub mod sliding;
}

pub mod attacks {
    pub mod check_analysis;
    pub mod check_detection;
    pub mod check_status;
    pub mod pins;
}

pub mod board_store {
    pub mod board;
    pub mod chess960;
}

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod extended_move;
    pub mod game_state;
    pub mod game_status;
    pub mod memento;
    pub mod promotion;
}

pub mod utils {
    pub mod description_generator;
    pub mod description_parser;
    pub mod fen_parser;
    pub mod perft;
    pub mod render_board;
}
