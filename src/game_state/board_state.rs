//! Board model for one game session.
//!
//! `BoardState` owns the 8x8 grid, the side to move, both tracked king
//! squares, the per-color move histories and the captured-piece tally. It is
//! mutated only by `apply_move` (see `moves::move_apply`); everything else
//! reads it.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_rules::king_home_square;
use crate::game_state::chess_types::*;
use crate::moves::disambiguation::{resolve_ambiguity, AmbiguityPolicy};
use crate::moves::move_record::{Ambiguity, MoveRecord};
use crate::utils::fen_generator::generate_fen_placement;
use crate::utils::fen_parser::parse_fen;

/// Piece kinds that can end up in the capture tally.
pub const CAPTURABLE_KINDS: [PieceKind; 5] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

#[derive(Debug, Clone)]
pub struct BoardState {
    // [rank][file]
    squares: [[Option<Piece>; NUM_FILES as usize]; NUM_RANKS as usize],
    side_to_move: Color,
    king_squares: [Square; 2],
    // [color][ply], oldest first
    history: [Vec<MoveRecord>; 2],
    // [color of the captured piece][kind index]
    captured: [[u8; CAPTURABLE_KINDS.len()]; 2],
    ambiguity_policy: AmbiguityPolicy,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            squares: [[None; NUM_FILES as usize]; NUM_RANKS as usize],
            side_to_move: Color::White,
            king_squares: [king_home_square(Color::White), king_home_square(Color::Black)],
            history: [Vec::new(), Vec::new()],
            captured: [[0; CAPTURABLE_KINDS.len()]; 2],
            ambiguity_policy: AmbiguityPolicy::default(),
        }
    }
}

impl BoardState {
    /// Empty grid, White to move. Kings still need placing.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting array (the placement of `STARTING_POSITION_FEN`).
    pub fn new_game() -> Self {
        let mut board = Self::new_empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for color in [Color::White, Color::Black] {
            let pawn_rank = match color {
                Color::White => RANK_2,
                Color::Black => RANK_7,
            };
            for (file, kind) in (0..NUM_FILES).zip(back_rank) {
                board.set_piece(Square::at(color.home_rank(), file), Some(Piece::new(color, kind)));
                board.set_piece(Square::at(pawn_rank, file), Some(Piece::new(color, PieceKind::Pawn)));
            }
            board.king_squares[color.index()] = king_home_square(color);
        }

        board
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        parse_fen(fen)
    }

    /// FEN placement field for the current grid.
    #[inline]
    pub fn to_fen_placement(&self) -> String {
        generate_fen_placement(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.rank() as usize][square.file() as usize]
    }

    #[inline]
    pub(crate) fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.rank() as usize][square.file() as usize] = piece;
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub(crate) fn set_king_square(&mut self, color: Color, square: Square) {
        self.king_squares[color.index()] = square;
    }

    /// Moves made by `color`, oldest first.
    #[inline]
    pub fn history(&self, color: Color) -> &[MoveRecord] {
        &self.history[color.index()]
    }

    #[inline]
    pub fn white_moves(&self) -> &[MoveRecord] {
        self.history(Color::White)
    }

    #[inline]
    pub fn black_moves(&self) -> &[MoveRecord] {
        self.history(Color::Black)
    }

    /// The most recent move on the board, by either side.
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history(self.side_to_move.opposite()).last()
    }

    #[inline]
    pub fn ply_count(&self) -> usize {
        self.history[0].len() + self.history[1].len()
    }

    #[inline]
    pub(crate) fn record_history(&mut self, record: MoveRecord) {
        self.history[record.color().index()].push(record);
    }

    /// How many pieces of `kind` belonging to `color` have been captured.
    pub fn captured_count(&self, color: Color, kind: PieceKind) -> u8 {
        CAPTURABLE_KINDS
            .iter()
            .position(|&k| k == kind)
            .map(|ix| self.captured[color.index()][ix])
            .unwrap_or(0)
    }

    pub(crate) fn tally_capture(&mut self, piece: Piece) {
        if let Some(ix) = CAPTURABLE_KINDS.iter().position(|&k| k == piece.kind) {
            let slot = &mut self.captured[piece.color.index()][ix];
            *slot = slot.saturating_add(1);
        }
    }

    /// Material White has won minus material Black has won, in pawns.
    pub fn material_balance(&self) -> i32 {
        let lost = |color: Color| -> i32 {
            CAPTURABLE_KINDS
                .iter()
                .map(|&kind| self.captured_count(color, kind) as i32 * kind.value() as i32)
                .sum()
        };
        lost(Color::Black) - lost(Color::White)
    }

    #[inline]
    pub fn ambiguity_policy(&self) -> AmbiguityPolicy {
        self.ambiguity_policy
    }

    #[inline]
    pub fn set_ambiguity_policy(&mut self, policy: AmbiguityPolicy) {
        self.ambiguity_policy = policy;
    }

    /// Disambiguation `record` needs in the current position.
    #[inline]
    pub fn resolve_ambiguity(&self, record: &MoveRecord) -> Ambiguity {
        resolve_ambiguity(self, record, self.ambiguity_policy)
    }

    /// Squares holding a king of `color`.
    pub fn kings_of(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(move |&sq| self.piece_at(sq) == Some(Piece::new(color, PieceKind::King)))
    }
}
