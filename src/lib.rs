//! Crate root module declarations for the ChessMate client.
//!
//! Exposes the board model, move annotation and application, the notation
//! codec, PGN export and the engine wire protocol so the terminal client,
//! tests and benches can import stable module paths.

pub mod chess_errors;

pub mod game_state {
    pub mod board_state;
    pub mod chess_rules;
    pub mod chess_types;
}

pub mod moves {
    pub mod disambiguation;
    pub mod move_annotation;
    pub mod move_apply;
    pub mod move_record;
    pub mod promotion;
}

pub mod protocol {
    pub mod game_session;
    pub mod message;
    pub mod promotion_prompt;
    pub mod session_config;
    pub mod transport;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod move_notation;
    pub mod pgn;
    pub mod render_game_state;
}
