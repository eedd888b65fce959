use crate::game_state::{board_state::BoardState, chess_types::*};

/// FEN placement field (the first FEN field) for `board`.
pub fn generate_fen_placement(board: &BoardState) -> String {
    let mut out = String::with_capacity(71);

    for rank in (0..NUM_RANKS).rev() {
        let mut empty_count = 0u8;

        for file in 0..NUM_FILES {
            match board.piece_at(Square::at(rank, file)) {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece_to_fen_char(piece));
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

/// Placement plus side to move, for logging and test fixtures.
pub fn generate_fen_prefix(board: &BoardState) -> String {
    let side = match board.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };
    format!("{} {}", generate_fen_placement(board), side)
}

fn piece_to_fen_char(piece: Piece) -> char {
    let base = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };

    match piece.color {
        Color::White => base.to_ascii_uppercase(),
        Color::Black => base,
    }
}
