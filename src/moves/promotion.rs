//! Promotion-choice seam.
//!
//! Annotating a pawn move onto the last rank needs a concrete piece before
//! the record is complete. Whoever owns user interaction implements
//! `PromotionChooser`; the board only ever calls it synchronously.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{Color, PieceKind, Square};

pub trait PromotionChooser: Send {
    /// Piece a `color` pawn arriving on `square` turns into.
    ///
    /// The answer must be a knight, bishop, rook or queen.
    fn choose_promotion(&mut self, color: Color, square: Square) -> Result<PieceKind, ChessErrors>;
}

/// Always answers with the same piece. Used for tests, benches and
/// non-interactive play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPromotion(pub PieceKind);

impl Default for FixedPromotion {
    fn default() -> Self {
        Self(PieceKind::Queen)
    }
}

impl PromotionChooser for FixedPromotion {
    fn choose_promotion(&mut self, _color: Color, _square: Square) -> Result<PieceKind, ChessErrors> {
        Ok(self.0)
    }
}

impl<F> PromotionChooser for F
where
    F: FnMut(Color, Square) -> Result<PieceKind, ChessErrors> + Send,
{
    fn choose_promotion(&mut self, color: Color, square: Square) -> Result<PieceKind, ChessErrors> {
        self(color, square)
    }
}
