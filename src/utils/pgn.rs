//! PGN game-record writer.
//!
//! Renders the two per-color histories of a session as a tagged PGN file:
//! the seven-tag roster, a blank line, one numbered move pair per line in
//! display notation and the result token on the last line.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::Color;
use crate::moves::move_record::MoveRecord;

pub const PGN_DATE_FORMAT: &str = "%Y.%m.%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Unterminated,
}

impl GameResult {
    pub const fn as_pgn_token(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unterminated => "*",
        }
    }

    const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }
}

/// Result read off the last move of whichever side has moved more often.
///
/// Ties go to Black, whose reply is the later ply.
pub fn game_result(white: &[MoveRecord], black: &[MoveRecord]) -> GameResult {
    let last = if white.len() > black.len() {
        white.last()
    } else {
        black.last()
    };

    match last {
        Some(record) if record.is_checkmate() => GameResult::win_for(record.color()),
        Some(record) if record.stalemate => GameResult::Draw,
        _ => GameResult::Unterminated,
    }
}

/// Tag values other than `Result`, which is always derived from the moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: NaiveDate,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl PgnHeaders {
    /// Headers dated today with empty event, site and round.
    pub fn for_players(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            event: String::new(),
            site: String::new(),
            date: Local::now().date_naive(),
            round: String::new(),
            white: white.into(),
            black: black.into(),
        }
    }
}

/// Numbered rows of display-form moves: `(number, white, black)`.
///
/// The black column is empty while Black has not replied.
pub fn move_rows(white: &[MoveRecord], black: &[MoveRecord]) -> Vec<(usize, String, String)> {
    white
        .iter()
        .enumerate()
        .map(|(ix, white_move)| {
            let black_move = black
                .get(ix)
                .map(MoveRecord::display_form)
                .unwrap_or_default();
            (ix + 1, white_move.display_form(), black_move)
        })
        .collect()
}

pub fn write_pgn(headers: &PgnHeaders, white: &[MoveRecord], black: &[MoveRecord]) -> String {
    let result = game_result(white, black).as_pgn_token();
    let date = headers.date.format(PGN_DATE_FORMAT).to_string();

    let tags = [
        ("Event", headers.event.as_str()),
        ("Site", headers.site.as_str()),
        ("Date", date.as_str()),
        ("Round", headers.round.as_str()),
        ("White", headers.white.as_str()),
        ("Black", headers.black.as_str()),
        ("Result", result),
    ];

    let mut out = String::new();
    for (key, value) in tags {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    for (number, white_move, black_move) in move_rows(white, black) {
        if black_move.is_empty() {
            out.push_str(&format!("{number}.{white_move}\n"));
        } else {
            out.push_str(&format!("{number}.{white_move} {black_move}\n"));
        }
    }

    out.push_str(result);
    out.push('\n');

    out
}

/// Write the game record to `path`, replacing any existing file.
pub fn export_pgn(
    path: &Path,
    headers: &PgnHeaders,
    white: &[MoveRecord],
    black: &[MoveRecord],
) -> Result<(), ChessErrors> {
    fs::write(path, write_pgn(headers, white, black)).map_err(|source| {
        ChessErrors::ExportFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(path = %path.display(), plies = white.len() + black.len(), "exported PGN");
    Ok(())
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::board_state::BoardState;
    use crate::moves::move_record::CheckStatus;
    use crate::moves::promotion::FixedPromotion;
    use crate::utils::algebraic::algebraic_to_square;

    fn played(line: &[(&str, &str)]) -> BoardState {
        let mut board = BoardState::new_game();
        for (from, to) in line {
            let record = board
                .annotate_move(
                    algebraic_to_square(from).expect("square should parse"),
                    algebraic_to_square(to).expect("square should parse"),
                    &mut FixedPromotion::default(),
                )
                .expect("annotation should succeed");
            board.apply_move(record);
        }
        board
    }

    fn headers() -> PgnHeaders {
        PgnHeaders {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).expect("date should be valid"),
            ..PgnHeaders::for_players("Human", "ChessMate")
        }
    }

    #[test]
    fn empty_history_is_unterminated() {
        assert_eq!(game_result(&[], &[]), GameResult::Unterminated);
        let pgn = write_pgn(&headers(), &[], &[]);
        assert!(pgn.ends_with("[Result \"*\"]\n\n*\n"));
    }

    #[test]
    fn result_follows_the_side_with_more_moves() {
        let board = played(&[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")]);
        let mut white = board.white_moves().to_vec();
        let mut black = board.black_moves().to_vec();
        assert_eq!(game_result(&white, &black), GameResult::Unterminated);

        black[1].check = CheckStatus::Checkmate;
        assert_eq!(game_result(&white, &black).as_pgn_token(), "0-1");

        black[1].check = CheckStatus::None;
        black[1].stalemate = true;
        assert_eq!(game_result(&white, &black).as_pgn_token(), "1/2-1/2");

        // White one move ahead: only White's last move counts.
        black.pop();
        white[1].check = CheckStatus::Checkmate;
        assert_eq!(game_result(&white, &black), GameResult::WhiteWins);
    }

    #[test]
    fn writes_tag_roster_and_move_pairs() {
        let board = played(&[("e2", "e4"), ("e7", "e5"), ("g1", "f3")]);
        let pgn = write_pgn(&headers(), board.white_moves(), board.black_moves());

        let expected = "[Event \"\"]\n\
                        [Site \"\"]\n\
                        [Date \"2024.03.09\"]\n\
                        [Round \"\"]\n\
                        [White \"Human\"]\n\
                        [Black \"ChessMate\"]\n\
                        [Result \"*\"]\n\
                        \n\
                        1.e4 e5\n\
                        2.Nf3\n\
                        *\n";
        assert_eq!(pgn, expected);
    }

    #[test]
    fn move_rows_leave_black_column_empty() {
        let board = played(&[("d2", "d4"), ("d7", "d5"), ("c2", "c4"), ("d5", "c4"), ("e2", "e3")]);
        let rows = move_rows(board.white_moves(), board.black_moves());
        assert_eq!(
            rows,
            vec![
                (1, "d4".to_owned(), "d5".to_owned()),
                (2, "c4".to_owned(), "dxc4".to_owned()),
                (3, "e3".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn header_values_are_escaped() {
        let mut headers = headers();
        headers.event = "The \"Immortal\"".to_owned();
        let pgn = write_pgn(&headers, &[], &[]);
        assert!(pgn.starts_with("[Event \"The \\\"Immortal\\\"\"]\n"));
    }

    #[test]
    fn export_reports_unwritable_path() {
        let dir = std::env::temp_dir().join("chessmate-missing-dir").join("nested");
        let err = export_pgn(&dir.join("game.pgn"), &headers(), &[], &[])
            .expect_err("export into a missing directory should fail");
        assert!(matches!(err, ChessErrors::ExportFailed { .. }));
    }

    #[test]
    fn export_writes_file() {
        let path = std::env::temp_dir().join(format!("chessmate-{}.pgn", std::process::id()));
        let board = played(&[("e2", "e4")]);
        export_pgn(&path, &headers(), board.white_moves(), board.black_moves())
            .expect("export should succeed");
        let text = std::fs::read_to_string(&path).expect("exported file should be readable");
        assert!(text.ends_with("\n1.e4\n*\n"));
        let _ = std::fs::remove_file(&path);
    }
}
