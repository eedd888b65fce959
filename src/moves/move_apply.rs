//! Board mutation for a move the remote engine has confirmed.
//!
//! No legality checking happens here. Records must come from
//! `annotate_move` or from decoding a wire move; an inconsistent record
//! (en passant without the neighbouring pawn, a castle without its rook)
//! trips a debug assertion and otherwise leaves the grid as the record says.

use tracing::debug;

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::moves::move_record::MoveRecord;
use crate::utils::fen_generator::generate_fen_prefix;

impl BoardState {
    /// Apply `record` and append it to the mover's history.
    pub fn apply_move(&mut self, mut record: MoveRecord) {
        let color = record.color();

        // Disambiguation depends on the position before the move.
        record.ambiguity = self.resolve_ambiguity(&record);

        if record.capture {
            let target = if record.en_passant {
                Square::at(record.start.rank(), record.end.file())
            } else {
                record.end
            };
            debug_assert!(
                !record.en_passant
                    || self
                        .piece_at(target)
                        .is_some_and(|p| p.is(color.opposite(), PieceKind::Pawn)),
                "en passant without an opposing pawn on {target}"
            );
            if let Some(captured) = self.piece_at(target) {
                self.tally_capture(captured);
            }
            self.set_piece(target, None);
        }

        if let Some(side) = record.castle {
            let rank = record.start.rank();
            let rook_from = Square::at(rank, side.rook_origin_file());
            let rook_to = Square::at(rank, side.rook_destination_file());
            let rook = self.piece_at(rook_from);
            debug_assert!(
                rook.is_some_and(|p| p.is(color, PieceKind::Rook)),
                "castle without a rook on {rook_from}"
            );
            self.set_piece(rook_to, rook);
            self.set_piece(rook_from, None);
        }

        self.set_piece(record.end, Some(record.landing_piece()));
        self.set_piece(record.start, None);

        if record.start == self.king_square(color) {
            self.set_king_square(color, record.end);
        }

        let display_form = record.display_form();
        self.record_history(record);
        self.set_side_to_move(self.side_to_move().opposite());

        debug!(
            mover = color.name(),
            display = %display_form,
            position = %generate_fen_prefix(self),
            "applied move"
        );

        debug_assert!(
            [Color::White, Color::Black].into_iter().all(|c| self
                .piece_at(self.king_square(c))
                .is_some_and(|p| p.is(c, PieceKind::King))),
            "tracked king square lost its king"
        );
    }
}
