//! Per-game session options.
//!
//! Everything one game needs to know about where the engine lives and who
//! plays which side. Built once by the front end and handed to the session;
//! nothing here is process-wide.

use crate::game_state::chess_types::Color;
use crate::moves::disambiguation::AmbiguityPolicy;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 12389;

pub const ENGINE_NAME: &str = "ChessMate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn code(self) -> u8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Candidate engine hosts, tried in order.
    pub hosts: Vec<String>,
    pub port: u16,
    /// Side the local human plays against the engine. Two-player games
    /// report White here.
    pub player_color: Color,
    pub difficulty: Difficulty,
    /// False when two humans share this client.
    pub engine_opponent: bool,
    pub ambiguity_policy: AmbiguityPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hosts: vec![DEFAULT_HOST.to_owned()],
            port: DEFAULT_PORT,
            player_color: Color::White,
            difficulty: Difficulty::default(),
            engine_opponent: true,
            ambiguity_policy: AmbiguityPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// `start-game` data: `<1 if the player is White else 0> <difficulty>`.
    pub fn start_game_payload(&self) -> String {
        let white = match self.player_color {
            Color::White => 1,
            Color::Black => 0,
        };
        format!("{} {}", white, self.difficulty.code())
    }

    /// PGN player names as (White, Black).
    pub fn player_names(&self) -> (String, String) {
        if !self.engine_opponent {
            return ("Human 1".to_owned(), "Human 2".to_owned());
        }
        match self.player_color {
            Color::White => ("Human".to_owned(), ENGINE_NAME.to_owned()),
            Color::Black => (ENGINE_NAME.to_owned(), "Human".to_owned()),
        }
    }

    /// Whether moves for `side_to_move` come from this client.
    #[inline]
    pub fn is_local_turn(&self, side_to_move: Color) -> bool {
        !self.engine_opponent || side_to_move == self.player_color
    }
}

/// Coin flip between White and Black.
pub fn random_color() -> Color {
    if rand::random::<bool>() {
        Color::White
    } else {
        Color::Black
    }
}
