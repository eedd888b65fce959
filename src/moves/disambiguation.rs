//! Disambiguation for display notation.
//!
//! Given a move, finds every other piece of the same kind and color that could
//! also reach the destination and reports which origin coordinate(s) display
//! notation has to keep. Reachability is geometric only (no pins, no checks):
//! knights by their jump, sliders along an empty line.

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::*;
use crate::moves::move_record::{Ambiguity, MoveRecord};

/// How several ambiguous candidates combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// Each matching candidate replaces the previous answer; the last one
    /// found in a1..h8 scan order decides.
    #[default]
    LastMatch,
    /// File and rank requirements of all candidates are merged, so a move
    /// contested along both axes keeps the full origin square.
    Union,
}

/// Ambiguity code for `record` on `board` (the position before the move).
pub fn resolve_ambiguity(
    board: &BoardState,
    record: &MoveRecord,
    policy: AmbiguityPolicy,
) -> Ambiguity {
    let mover = record.moving_piece;

    match mover.kind {
        PieceKind::Pawn if record.capture => return Ambiguity::File,
        PieceKind::Pawn | PieceKind::King => return Ambiguity::None,
        _ => {}
    }

    let mut ambiguity = Ambiguity::None;

    for candidate in Square::all() {
        if candidate == record.start || candidate == record.end {
            continue;
        }
        if board.piece_at(candidate) != Some(mover) {
            continue;
        }
        if !can_reach(board, candidate, record.end, mover.kind) {
            continue;
        }

        let needed = if candidate.file() != record.start.file() {
            Ambiguity::File
        } else {
            Ambiguity::Rank
        };

        ambiguity = match policy {
            AmbiguityPolicy::LastMatch => needed,
            AmbiguityPolicy::Union => ambiguity.union(needed),
        };
    }

    ambiguity
}

fn can_reach(board: &BoardState, from: Square, to: Square, kind: PieceKind) -> bool {
    let rise = (from.rank() as i8 - to.rank() as i8).abs();
    let run = (from.file() as i8 - to.file() as i8).abs();

    let diagonal = rise == run;
    let straight = rise == 0 || run == 0;

    match kind {
        PieceKind::Knight => (rise == 2 && run == 1) || (rise == 1 && run == 2),
        PieceKind::Bishop => diagonal && spaces_between_are_empty(board, from, to, kind),
        PieceKind::Rook => straight && spaces_between_are_empty(board, from, to, kind),
        PieceKind::Queen => {
            (diagonal || straight) && spaces_between_are_empty(board, from, to, kind)
        }
        PieceKind::Pawn | PieceKind::King => false,
    }
}

/// True when every square strictly between `from` and `to` is empty.
///
/// Only lines the piece slides along are walked: ranks and files for rooks
/// and queens, diagonals for bishops and queens. Squares not on such a line
/// have nothing between them and report true.
pub fn spaces_between_are_empty(
    board: &BoardState,
    from: Square,
    to: Square,
    kind: PieceKind,
) -> bool {
    let d_rank = to.rank() as i8 - from.rank() as i8;
    let d_file = to.file() as i8 - from.file() as i8;

    let rook_like = matches!(kind, PieceKind::Rook | PieceKind::Queen);
    let bishop_like = matches!(kind, PieceKind::Bishop | PieceKind::Queen);

    let on_line = (rook_like && (d_rank == 0) != (d_file == 0))
        || (bishop_like && d_rank != 0 && d_rank.abs() == d_file.abs());
    if !on_line {
        return true;
    }

    let step = (d_rank.signum(), d_file.signum());
    let mut current = from.offset(step.0, step.1);
    while let Some(square) = current {
        if square == to {
            break;
        }
        if board.piece_at(square).is_some() {
            return false;
        }
        current = square.offset(step.0, step.1);
    }

    true
}
