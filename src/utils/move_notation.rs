//! Text forms of a move record.
//!
//! Two grammars share one encoder:
//! - wire form, always carrying full origin coordinates
//!   (`Nb1c3`, `exd6ep`, `e7e8=Q+`), used between client and engine;
//! - display form, keeping only the origin coordinates the record's
//!   ambiguity asks for (`Nc3`, `exd6ep`, `e8=Q+`), used for move lists
//!   and game records.
//!
//! Castles are the bare tokens `O-O` / `O-O-O` in both forms.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_rules::{CastleSide, KINGSIDE_CASTLE_TOKEN, QUEENSIDE_CASTLE_TOKEN};
use crate::game_state::chess_types::*;
use crate::moves::move_record::{CheckStatus, MoveRecord};
use crate::utils::algebraic::{file_from_char, rank_from_char};

const CAPTURE_MARKER: char = 'x';
const PROMOTION_MARKER: char = '=';
const EN_PASSANT_MARKER: &str = "ep";
const CHECK_MARKER: char = '+';
const CHECKMATE_MARKER: char = '#';

/// Decode a wire-form move made by `color`.
///
/// Castle tokens carry no coordinates, so the mover's color decides which
/// home rank the king moves along.
pub fn notation_to_move_record(text: &str, color: Color) -> Result<MoveRecord, ChessErrors> {
    match text {
        KINGSIDE_CASTLE_TOKEN => return Ok(MoveRecord::castle(color, CastleSide::Kingside)),
        QUEENSIDE_CASTLE_TOKEN => return Ok(MoveRecord::castle(color, CastleSide::Queenside)),
        _ => {}
    }

    let mut cursor = NotationCursor::new(text);

    let kind = match cursor.peek().and_then(PieceKind::from_letter) {
        Some(kind) => {
            cursor.advance();
            kind
        }
        None => PieceKind::Pawn,
    };

    let start = cursor.take_square()?;
    let capture = cursor.eat(CAPTURE_MARKER);
    let end = cursor.take_square()?;

    let mut record = MoveRecord::between(start, end, Piece::new(color, kind));
    record.capture = capture;

    if cursor.eat(PROMOTION_MARKER) {
        let promotion = cursor
            .next()
            .and_then(PieceKind::from_letter)
            .filter(|kind| kind.is_promotion_target())
            .ok_or_else(|| cursor.error("promotion must be one of N, B, R, Q"))?;
        record.promotion = Some(promotion);
    }

    record.en_passant = cursor.eat_str(EN_PASSANT_MARKER);

    if cursor.eat(CHECK_MARKER) {
        record.check = CheckStatus::Check;
    } else if cursor.eat(CHECKMATE_MARKER) {
        record.check = CheckStatus::Checkmate;
    }

    if !cursor.is_done() {
        return Err(cursor.error("unexpected trailing characters"));
    }

    Ok(record)
}

/// Encode a move record.
///
/// With `preserve_ambiguity == false` the origin square is always written
/// (wire form); otherwise only the coordinates the record's ambiguity names
/// are kept (display form).
pub fn move_record_to_notation(record: &MoveRecord, preserve_ambiguity: bool) -> String {
    if let Some(side) = record.castle {
        return side.token().to_owned();
    }

    let mut out = String::with_capacity(10);

    if let Some(letter) = record.moving_piece.kind.letter() {
        out.push(letter);
    }

    if !preserve_ambiguity || record.ambiguity.includes_file() {
        out.push(record.start.file_char());
    }
    if !preserve_ambiguity || record.ambiguity.includes_rank() {
        out.push(record.start.rank_char());
    }

    if record.capture {
        out.push(CAPTURE_MARKER);
    }

    out.push(record.end.file_char());
    out.push(record.end.rank_char());

    if let Some(letter) = record.promotion.and_then(PieceKind::letter) {
        out.push(PROMOTION_MARKER);
        out.push(letter);
    }

    if record.en_passant {
        out.push_str(EN_PASSANT_MARKER);
    }

    match record.check {
        CheckStatus::Checkmate => out.push(CHECKMATE_MARKER),
        CheckStatus::Check => out.push(CHECK_MARKER),
        CheckStatus::None => {}
    }

    out
}

struct NotationCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> NotationCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn take_square(&mut self) -> Result<Square, ChessErrors> {
        let file = self.next().ok_or_else(|| self.error("missing square"))?;
        let rank = self.next().ok_or_else(|| self.error("missing square"))?;
        let file = file_from_char(file).map_err(|_| self.error("invalid file"))?;
        let rank = rank_from_char(rank).map_err(|_| self.error("invalid rank"))?;
        Square::new(rank, file)
    }

    fn is_done(&self) -> bool {
        self.pos == self.text.len()
    }

    fn error(&self, reason: &'static str) -> ChessErrors {
        ChessErrors::InvalidNotation(self.text.to_owned(), reason)
    }
}

#[cfg(test)]
mod tests {
    use super::{move_record_to_notation, notation_to_move_record};
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_rules::CastleSide;
    use crate::game_state::chess_types::*;
    use crate::moves::move_record::{Ambiguity, CheckStatus};

    #[test]
    fn wire_round_trip_preserves_text() {
        for text in [
            "e2e4",
            "Ng1f3",
            "Bf1xb5+",
            "e5xd6ep",
            "e7e8=Q",
            "d2xc1=N#",
            "Ra1a8#",
            "Ke1f2",
            "Qd8xh4+",
            "O-O",
            "O-O-O",
        ] {
            let record =
                notation_to_move_record(text, Color::White).expect("wire move should parse");
            assert_eq!(move_record_to_notation(&record, false), text);
        }
    }

    #[test]
    fn decodes_every_flag() {
        let record = notation_to_move_record("b2xa1=R+", Color::Black).expect("should parse");
        assert_eq!(record.moving_piece, Piece::new(Color::Black, PieceKind::Pawn));
        assert_eq!(record.start.to_string(), "b2");
        assert_eq!(record.end.to_string(), "a1");
        assert!(record.capture);
        assert_eq!(record.promotion, Some(PieceKind::Rook));
        assert_eq!(record.check, CheckStatus::Check);
        assert!(!record.en_passant);
        assert_eq!(record.castle, None);
    }

    #[test]
    fn castle_tokens_follow_mover_color() {
        let record = notation_to_move_record("O-O-O", Color::Black).expect("castle should parse");
        assert_eq!(record.castle, Some(CastleSide::Queenside));
        assert_eq!(record.start.to_string(), "e8");
        assert_eq!(record.end.to_string(), "c8");
        assert_eq!(record.moving_piece.kind, PieceKind::King);
    }

    #[test]
    fn display_form_keeps_only_required_coordinates() {
        let mut record = notation_to_move_record("Nb1c3", Color::White).expect("should parse");
        assert_eq!(move_record_to_notation(&record, true), "Nc3");

        record.ambiguity = Ambiguity::File;
        assert_eq!(move_record_to_notation(&record, true), "Nbc3");
        record.ambiguity = Ambiguity::Rank;
        assert_eq!(move_record_to_notation(&record, true), "N1c3");
        record.ambiguity = Ambiguity::Both;
        assert_eq!(move_record_to_notation(&record, true), "Nb1c3");

        let mut pawn = notation_to_move_record("e5xd6ep", Color::White).expect("should parse");
        pawn.ambiguity = Ambiguity::File;
        assert_eq!(move_record_to_notation(&pawn, true), "exd6ep");
    }

    #[test]
    fn checkmate_suppresses_check_suffix() {
        let mut record = notation_to_move_record("Qh5xf7", Color::White).expect("should parse");
        record.check = CheckStatus::Checkmate;
        assert_eq!(record.wire_form(), "Qh5xf7#");
    }

    #[test]
    fn pawn_promotion_piece_is_not_rendered() {
        let mut record = notation_to_move_record("a7a8", Color::White).expect("should parse");
        record.promotion = Some(PieceKind::Pawn);
        assert_eq!(record.wire_form(), "a7a8");
    }

    #[test]
    fn rejects_malformed_wire_moves() {
        for text in ["", "e2", "Ne4", "e2e4e", "e2e9", "Zz2e4", "e7e8=K", "e2e4+#", "O-O+"] {
            assert!(
                matches!(
                    notation_to_move_record(text, Color::White),
                    Err(ChessErrors::InvalidNotation(..))
                ),
                "{text} should be rejected"
            );
        }
    }
}
