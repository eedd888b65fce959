//! Canonical chess-rule constants.
//!
//! Starting position plus the fixed squares castling moves between.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const KINGSIDE_CASTLE_TOKEN: &str = "O-O";
pub const QUEENSIDE_CASTLE_TOKEN: &str = "O-O-O";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const fn token(self) -> &'static str {
        match self {
            CastleSide::Kingside => KINGSIDE_CASTLE_TOKEN,
            CastleSide::Queenside => QUEENSIDE_CASTLE_TOKEN,
        }
    }

    /// File the king lands on.
    pub const fn king_destination_file(self) -> u8 {
        match self {
            CastleSide::Kingside => FILE_G,
            CastleSide::Queenside => FILE_C,
        }
    }

    /// Corner file the rook starts on.
    pub const fn rook_origin_file(self) -> u8 {
        match self {
            CastleSide::Kingside => FILE_H,
            CastleSide::Queenside => FILE_A,
        }
    }

    /// File next to the king's destination, on the board's inner side.
    pub const fn rook_destination_file(self) -> u8 {
        match self {
            CastleSide::Kingside => FILE_F,
            CastleSide::Queenside => FILE_D,
        }
    }

    /// Side castled towards when a king on its home square moves to `end_file`.
    pub const fn from_king_destination(end_file: u8) -> Option<Self> {
        match end_file {
            FILE_G => Some(CastleSide::Kingside),
            FILE_C => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

/// Square a king of `color` starts the game on.
#[inline]
pub const fn king_home_square(color: Color) -> Square {
    Square::at(color.home_rank(), FILE_E)
}
