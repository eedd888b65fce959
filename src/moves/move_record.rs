//! The move record passed between the codec, the resolver and the board.
//!
//! A record starts life either decoded from text or built from two squares,
//! has its flags filled in by one annotation pass, and is frozen once the
//! board appends it to a history list (history only hands out `&MoveRecord`).

use crate::game_state::chess_rules::{king_home_square, CastleSide};
use crate::game_state::chess_types::*;
use crate::utils::move_notation::move_record_to_notation;

/// Which origin coordinates display notation must keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ambiguity {
    #[default]
    None,
    File,
    Rank,
    Both,
}

impl Ambiguity {
    #[inline]
    pub const fn includes_file(self) -> bool {
        matches!(self, Ambiguity::File | Ambiguity::Both)
    }

    #[inline]
    pub const fn includes_rank(self) -> bool {
        matches!(self, Ambiguity::Rank | Ambiguity::Both)
    }

    pub const fn union(self, other: Ambiguity) -> Ambiguity {
        let file = self.includes_file() || other.includes_file();
        let rank = self.includes_rank() || other.includes_rank();
        match (file, rank) {
            (true, true) => Ambiguity::Both,
            (true, false) => Ambiguity::File,
            (false, true) => Ambiguity::Rank,
            (false, false) => Ambiguity::None,
        }
    }
}

/// Check marker carried by a move. Checkmate replaces the check suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckStatus {
    #[default]
    None,
    Check,
    Checkmate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub start: Square,
    pub end: Square,
    pub moving_piece: Piece,
    pub capture: bool,
    pub check: CheckStatus,
    pub stalemate: bool,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
    /// Kind the pawn turns into; always the mover's color.
    pub promotion: Option<PieceKind>,
    pub ambiguity: Ambiguity,
}

impl MoveRecord {
    /// Bare record for `moving_piece` travelling from `start` to `end`.
    pub fn between(start: Square, end: Square, moving_piece: Piece) -> Self {
        Self {
            start,
            end,
            moving_piece,
            capture: false,
            check: CheckStatus::None,
            stalemate: false,
            castle: None,
            en_passant: false,
            promotion: None,
            ambiguity: Ambiguity::None,
        }
    }

    /// King move for a castle of `color` towards `side`.
    pub fn castle(color: Color, side: CastleSide) -> Self {
        let start = king_home_square(color);
        let end = Square::at(color.home_rank(), side.king_destination_file());
        let mut record = Self::between(start, end, Piece::new(color, PieceKind::King));
        record.castle = Some(side);
        record
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.moving_piece.color
    }

    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.check == CheckStatus::Checkmate
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        self.check == CheckStatus::Check
    }

    /// Piece standing on the destination once the move is made.
    pub fn landing_piece(&self) -> Piece {
        match self.promotion {
            Some(kind) => Piece::new(self.moving_piece.color, kind),
            None => self.moving_piece,
        }
    }

    /// Fully qualified notation for transmission.
    pub fn wire_form(&self) -> String {
        move_record_to_notation(self, false)
    }

    /// Notation keeping only the origin coordinates the ambiguity requires.
    pub fn display_form(&self) -> String {
        move_record_to_notation(self, true)
    }
}
