//! FEN-to-BoardState parser.
//!
//! Reads the placement field and the optional side-to-move field of a
//! Forsyth-Edwards Notation string. Castling rights, en-passant target and
//! clocks are accepted and ignored: the remote engine owns those rules.

use crate::chess_errors::ChessErrors;
use crate::game_state::{board_state::BoardState, chess_types::*};

pub fn parse_fen(fen: &str) -> Result<BoardState, ChessErrors> {
    let mut parts = fen.split_whitespace();

    let board_part = parts
        .next()
        .ok_or_else(|| ChessErrors::InvalidFenForm("missing board layout".to_owned()))?;

    let mut board = BoardState::new_empty();
    parse_board(board_part, &mut board)?;

    if let Some(side_part) = parts.next() {
        board.set_side_to_move(parse_side_to_move(side_part)?);
    }

    for color in [Color::White, Color::Black] {
        let kings: Vec<Square> = board.kings_of(color).collect();
        match kings.as_slice() {
            [square] => board.set_king_square(color, *square),
            _ => {
                return Err(ChessErrors::InvalidFenForm(format!(
                    "{} must have exactly one king",
                    color.name()
                )))
            }
        }
    }

    Ok(board)
}

fn parse_board(board_part: &str, board: &mut BoardState) -> Result<(), ChessErrors> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != NUM_RANKS as usize {
        return Err(ChessErrors::InvalidFenForm(
            "board layout must contain 8 ranks".to_owned(),
        ));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = (NUM_RANKS - 1) - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessErrors::InvalidFenToken(ch));
                }
                file += empty_count as u8;
                if file > NUM_FILES {
                    return Err(ChessErrors::InvalidFenForm(format!(
                        "rank '{rank_str}' has too many files"
                    )));
                }
                continue;
            }

            let piece = piece_from_fen_char(ch).ok_or(ChessErrors::InvalidFenToken(ch))?;

            if file >= NUM_FILES {
                return Err(ChessErrors::InvalidFenForm(format!(
                    "rank '{rank_str}' has too many files"
                )));
            }

            board.set_piece(Square::new(rank, file)?, Some(piece));
            file += 1;
        }

        if file != NUM_FILES {
            return Err(ChessErrors::InvalidFenForm(format!(
                "rank '{rank_str}' does not sum to 8 files"
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessErrors> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ChessErrors::InvalidFenForm(format!(
            "invalid side-to-move field '{side_part}'"
        ))),
    }
}

pub(crate) fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}
