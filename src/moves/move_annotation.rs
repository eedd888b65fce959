//! Pre-move analysis of a locally chosen move.
//!
//! Turns two squares into a fully flagged `MoveRecord` by looking at the
//! position before the move: capture, en passant, castling, promotion and
//! display disambiguation. Legality is the remote engine's business; nothing
//! here checks it.

use tracing::debug;

use crate::chess_errors::ChessErrors;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_rules::{king_home_square, CastleSide};
use crate::game_state::chess_types::*;
use crate::moves::move_record::MoveRecord;
use crate::moves::promotion::PromotionChooser;

impl BoardState {
    /// Annotate the move of the piece on `start` to `end`.
    ///
    /// Asks `chooser` for a piece when a pawn reaches its last rank. Fails
    /// when `start` is empty or the chooser answers with something a pawn
    /// cannot become.
    pub fn annotate_move(
        &self,
        start: Square,
        end: Square,
        chooser: &mut dyn PromotionChooser,
    ) -> Result<MoveRecord, ChessErrors> {
        let moving_piece = self
            .piece_at(start)
            .ok_or(ChessErrors::EmptyOriginSquare(start))?;

        let mut record = MoveRecord::between(start, end, moving_piece);
        record.capture = self.piece_at(end).is_some();

        if self.is_en_passant(&record) {
            record.capture = true;
            record.en_passant = true;
        }

        record.castle = castle_side(&record);

        if is_promotion(&record) {
            let kind = chooser.choose_promotion(moving_piece.color, end)?;
            if !kind.is_promotion_target() {
                return Err(ChessErrors::InvalidPromotionChoice(kind.to_string()));
            }
            record.promotion = Some(kind);
        }

        // Last, so pawn captures (including en passant) are known.
        record.ambiguity = self.resolve_ambiguity(&record);

        debug!(
            from = %start,
            to = %end,
            display = %record.display_form(),
            "annotated local move"
        );

        Ok(record)
    }

    fn is_en_passant(&self, record: &MoveRecord) -> bool {
        let mover = record.moving_piece;
        if mover.kind != PieceKind::Pawn || record.capture {
            return false;
        }
        if record.start.rank() != mover.color.en_passant_rank() {
            return false;
        }
        if record.start.file().abs_diff(record.end.file()) != 1 {
            return false;
        }

        let beside = Square::at(record.start.rank(), record.end.file());
        matches!(
            self.piece_at(beside),
            Some(piece) if piece.is(mover.color.opposite(), PieceKind::Pawn)
        )
    }
}

fn castle_side(record: &MoveRecord) -> Option<CastleSide> {
    let mover = record.moving_piece;
    if mover.kind != PieceKind::King || record.start != king_home_square(mover.color) {
        return None;
    }
    if record.end.rank() != record.start.rank() {
        return None;
    }
    if record.start.file().abs_diff(record.end.file()) != 2 {
        return None;
    }
    CastleSide::from_king_destination(record.end.file())
}

fn is_promotion(record: &MoveRecord) -> bool {
    let mover = record.moving_piece;
    mover.kind == PieceKind::Pawn
        && record.start.rank() == mover.color.pre_promotion_rank()
        && record.end.rank() == mover.color.promotion_rank()
}
