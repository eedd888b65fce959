//! Wire messages exchanged with the ChessMate engine.
//!
//! A frame is `<type-digit> <data>` followed by the single end-of-message
//! byte `0x04`. The sentinel never appears inside data.

use std::io::BufRead;

use tracing::debug;

use crate::chess_errors::ChessErrors;

pub const END_OF_MESSAGE: u8 = 0x04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Invalid,
    StartGame,
    InvalidMove,
    MakeMove,
    GetMove,
    Disconnect,
}

impl MessageType {
    pub const fn code(self) -> i8 {
        match self {
            MessageType::Invalid => -1,
            MessageType::StartGame => 0,
            MessageType::InvalidMove => 1,
            MessageType::MakeMove => 2,
            MessageType::GetMove => 3,
            MessageType::Disconnect => 4,
        }
    }

    pub const fn from_code(code: i8) -> Self {
        match code {
            0 => MessageType::StartGame,
            1 => MessageType::InvalidMove,
            2 => MessageType::MakeMove,
            3 => MessageType::GetMove,
            4 => MessageType::Disconnect,
            _ => MessageType::Invalid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageType,
    pub data: String,
}

impl Message {
    pub fn new(kind: MessageType, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// Message carrying no data (`get-move`, `disconnect`).
    pub fn empty(kind: MessageType) -> Self {
        Self::new(kind, String::new())
    }

    /// Frame bytes, sentinel included.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = format!("{} {}", self.kind.code(), self.data).into_bytes();
        out.push(END_OF_MESSAGE);
        out
    }

    /// Parse a frame with the sentinel already stripped.
    ///
    /// Never fails: a frame without a recognizable type digit becomes an
    /// `Invalid` message holding the raw text, which the session treats as a
    /// protocol error.
    pub fn parse(raw: &str) -> Self {
        let (code, data) = raw.split_once(' ').unwrap_or((raw, ""));
        let kind = match code.as_bytes() {
            [digit @ b'0'..=b'4'] => MessageType::from_code((digit - b'0') as i8),
            _ => MessageType::Invalid,
        };

        match kind {
            MessageType::Invalid => Self::new(MessageType::Invalid, raw),
            _ => Self::new(kind, data),
        }
    }

    /// The error a message of type `Invalid` stands for.
    pub fn invalid_type_error(&self) -> ChessErrors {
        ChessErrors::UnknownMessageType(self.data.clone())
    }
}

/// Read one frame up to the sentinel.
///
/// Returns `Ok(None)` at end of stream, including a final frame the peer
/// never terminated.
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Option<String>, ChessErrors> {
    let mut buf = Vec::new();
    let read = reader.read_until(END_OF_MESSAGE, &mut buf)?;

    if read == 0 || buf.last() != Some(&END_OF_MESSAGE) {
        if !buf.is_empty() {
            debug!(bytes = buf.len(), "dropping unterminated frame at end of stream");
        }
        return Ok(None);
    }

    buf.pop();
    let frame = String::from_utf8(buf)
        .map_err(|err| ChessErrors::MalformedMessage(String::from_utf8_lossy(err.as_bytes()).into_owned()))?;
    debug!(frame = %frame, "received frame");
    Ok(Some(frame))
}

/// Game status carried by an echoed `make-move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Ongoing,
    NoLegalMoves,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl GameStatus {
    pub fn from_code(code: &str) -> Result<Self, ChessErrors> {
        match code {
            "0" => Ok(GameStatus::Ongoing),
            "1" => Ok(GameStatus::NoLegalMoves),
            "2" => Ok(GameStatus::FiftyMoveRule),
            "3" => Ok(GameStatus::ThreefoldRepetition),
            _ => Err(ChessErrors::InvalidStatusCode(code.to_owned())),
        }
    }

    #[inline]
    pub const fn is_stalemate(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    /// Status line shown when the game ends this way.
    pub const fn describe(self) -> Option<&'static str> {
        match self {
            GameStatus::Ongoing => None,
            GameStatus::NoLegalMoves => Some("Stalemate! No valid moves!"),
            GameStatus::FiftyMoveRule => Some("Stalemate! Fifty moves rule"),
            GameStatus::ThreefoldRepetition => Some("Stalemate! Three move repetition rule"),
        }
    }
}

/// Data of a `make-move` message: `<wire move> <status>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeMovePayload<'a> {
    pub wire_move: &'a str,
    pub status: GameStatus,
}

impl<'a> MakeMovePayload<'a> {
    /// A missing status means the game goes on.
    pub fn parse(data: &'a str) -> Result<Self, ChessErrors> {
        let mut parts = data.split_whitespace();
        let wire_move = parts
            .next()
            .ok_or_else(|| ChessErrors::MalformedMessage(data.to_owned()))?;
        let status = match parts.next() {
            Some(code) => GameStatus::from_code(code)?,
            None => GameStatus::Ongoing,
        };
        if parts.next().is_some() {
            return Err(ChessErrors::MalformedMessage(data.to_owned()));
        }
        Ok(Self { wire_move, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn serializes_with_sentinel() {
        let msg = Message::new(MessageType::StartGame, "1 2");
        assert_eq!(msg.serialize(), b"0 1 2\x04".to_vec());
        assert_eq!(Message::empty(MessageType::GetMove).serialize(), b"3 \x04".to_vec());
    }

    #[test]
    fn parses_known_types() {
        assert_eq!(
            Message::parse("2 Ng1f3 0"),
            Message::new(MessageType::MakeMove, "Ng1f3 0")
        );
        assert_eq!(Message::parse("0 17"), Message::new(MessageType::StartGame, "17"));
        assert_eq!(Message::parse("4 "), Message::empty(MessageType::Disconnect));
        assert_eq!(Message::parse("4"), Message::empty(MessageType::Disconnect));
    }

    #[test]
    fn unknown_type_is_invalid() {
        for raw in ["7 e2e4", "x e2e4", "", "-1 bad", "+2 e2e4 0", "02 e2e4 0", "22 e2e4"] {
            let msg = Message::parse(raw);
            assert_eq!(msg.kind, MessageType::Invalid, "{raw:?}");
            assert_eq!(msg.data, raw);
        }
        assert!(matches!(
            Message::parse("9 zz").invalid_type_error(),
            ChessErrors::UnknownMessageType(_)
        ));
    }

    #[test]
    fn reads_frames_until_end_of_stream() {
        let mut input = Cursor::new(b"0 5\x042 e7e5 0\x043 \x04trailing".to_vec());
        assert_eq!(read_frame(&mut input).expect("read should succeed").as_deref(), Some("0 5"));
        assert_eq!(
            read_frame(&mut input).expect("read should succeed").as_deref(),
            Some("2 e7e5 0")
        );
        assert_eq!(read_frame(&mut input).expect("read should succeed").as_deref(), Some("3 "));
        assert_eq!(read_frame(&mut input).expect("read should succeed"), None);
        assert_eq!(read_frame(&mut input).expect("read should succeed"), None);
    }

    #[test]
    fn make_move_payload_statuses() {
        let payload = MakeMovePayload::parse("e7e8=Q+ 0").expect("payload should parse");
        assert_eq!(payload.wire_move, "e7e8=Q+");
        assert_eq!(payload.status, GameStatus::Ongoing);

        let payload = MakeMovePayload::parse("Kh1g1 2").expect("payload should parse");
        assert_eq!(payload.status, GameStatus::FiftyMoveRule);
        assert!(payload.status.is_stalemate());

        assert_eq!(
            MakeMovePayload::parse("e2e4").expect("payload should parse").status,
            GameStatus::Ongoing
        );
        assert!(matches!(
            MakeMovePayload::parse("e2e4 7"),
            Err(ChessErrors::InvalidStatusCode(_))
        ));
        assert!(matches!(
            MakeMovePayload::parse(""),
            Err(ChessErrors::MalformedMessage(_))
        ));
    }
}
