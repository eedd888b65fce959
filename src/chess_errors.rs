//! Errors used throughout the chess client.
//!
//! `ChessErrors` is the single error type returned by notation parsing, board
//! setup, the wire protocol, the transport and the game-record exporter.
//! Variants carry the offending input so callers can log or display precise
//! diagnostics.
//!
//! Usage guidelines:
//! - Parsing and protocol variants (`InvalidNotation`, `UnknownMessageType`,
//!   `MalformedMessage`, ...) describe bad input and end the connection they
//!   arrived on, never the process.
//! - `ExportFailed` is reported to the user and leaves the game untouched.
//! - Inconsistent move records (for example en passant without an adjacent
//!   pawn) are not represented here; they are programming errors and are
//!   caught by debug assertions when a record is applied.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::game_state::chess_types::Square;

#[derive(Debug, Error)]
pub enum ChessErrors {
    /// A single character of a coordinate was outside `a..=h` / `1..=8`.
    #[error("invalid algebraic character '{0}'")]
    InvalidAlgebraicChar(char),

    /// A coordinate string was not exactly two characters long.
    #[error("invalid algebraic square '{0}'")]
    InvalidAlgebraicString(String),

    /// Zero-based (rank, file) indices outside `0..8`.
    #[error("invalid rank/file pair ({0}, {1})")]
    InvalidFileOrRank(u8, u8),

    /// A move string did not follow the wire grammar.
    ///
    /// Payload: (the whole string, what was wrong with it).
    #[error("invalid move notation '{0}': {1}")]
    InvalidNotation(String, &'static str),

    /// Unexpected character in a FEN placement field.
    #[error("invalid FEN token '{0}'")]
    InvalidFenToken(char),

    /// FEN string had malformed structure.
    #[error("invalid FEN: {0}")]
    InvalidFenForm(String),

    /// Tried to annotate a move whose origin square holds no piece.
    #[error("no piece on origin square {0}")]
    EmptyOriginSquare(Square),

    /// The promotion chooser answered with a pawn or a king.
    #[error("cannot promote to {0}")]
    InvalidPromotionChoice(String),

    /// Whoever answers promotion prompts has gone away.
    #[error("promotion chooser is no longer available")]
    PromotionChooserUnavailable,

    /// A frame carried a type digit outside `0..=4`.
    #[error("unknown message type in frame '{0}'")]
    UnknownMessageType(String),

    /// A message of a known type carried data that could not be interpreted.
    #[error("malformed message data '{0}'")]
    MalformedMessage(String),

    /// A `make-move` status code outside `0..=3`.
    #[error("invalid game status code '{0}'")]
    InvalidStatusCode(String),

    /// No candidate host accepted a connection.
    #[error("could not connect to any of {hosts:?} on port {port}")]
    ConnectionFailed { hosts: Vec<String>, port: u16 },

    /// Writing the game record to disk failed.
    #[error("error creating PGN file {path}: {source}")]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read or write failure on the engine connection.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

impl ChessErrors {
    /// True for errors that mean the remote side spoke something other than
    /// the wire protocol.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            ChessErrors::UnknownMessageType(_)
                | ChessErrors::MalformedMessage(_)
                | ChessErrors::InvalidStatusCode(_)
                | ChessErrors::InvalidNotation(..)
                | ChessErrors::InvalidAlgebraicChar(_)
                | ChessErrors::InvalidAlgebraicString(_)
        )
    }
}
