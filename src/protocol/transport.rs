//! Connection to the engine and the frame-reader task.
//!
//! The session owns the write half. The read half lives on its own thread,
//! turns frames into `SessionCommand::Remote` and never touches the board.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::chess_errors::ChessErrors;
use crate::protocol::game_session::SessionCommand;
use crate::protocol::message::{read_frame, Message, MessageType};
use crate::protocol::session_config::SessionConfig;

/// Write half of an engine connection.
pub trait Transport: Write + Send {
    /// Stop the connection in both directions. Unblocks the reader.
    fn close(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// In-memory transport that records every byte sent.
impl Transport for Vec<u8> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Connect to the first candidate host that accepts.
pub fn connect(config: &SessionConfig) -> Result<TcpStream, ChessErrors> {
    for host in &config.hosts {
        match TcpStream::connect((host.as_str(), config.port)) {
            Ok(stream) => {
                info!(host = %host, port = config.port, "connected to engine");
                return Ok(stream);
            }
            Err(err) => warn!(host = %host, port = config.port, error = %err, "host unavailable"),
        }
    }

    Err(ChessErrors::ConnectionFailed {
        hosts: config.hosts.clone(),
        port: config.port,
    })
}

/// Forward frames from `reader` to the session until the stream ends.
///
/// Always finishes with `SessionCommand::TransportClosed` unless the session
/// has already gone away.
pub fn read_loop<R: BufRead>(mut reader: R, commands: &Sender<SessionCommand>) {
    loop {
        let message = match read_frame(&mut reader) {
            Ok(Some(frame)) => Message::parse(&frame),
            Ok(None) => break,
            Err(err) if err.is_protocol_error() => Message::new(MessageType::Invalid, err.to_string()),
            Err(err) => {
                warn!(error = %err, "engine connection read failed");
                break;
            }
        };

        if commands.send(SessionCommand::Remote(message)).is_err() {
            debug!("session gone, reader stopping");
            return;
        }
    }

    let _ = commands.send(SessionCommand::TransportClosed);
}

pub fn spawn_reader(
    stream: &TcpStream,
    commands: Sender<SessionCommand>,
) -> io::Result<JoinHandle<()>> {
    let reader = BufReader::new(stream.try_clone()?);
    thread::Builder::new()
        .name("frame-reader".to_owned())
        .spawn(move || read_loop(reader, &commands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::net::TcpListener;
    use std::sync::mpsc::channel;

    #[test]
    fn reader_forwards_frames_then_closes() {
        let (tx, rx) = channel();
        read_loop(Cursor::new(b"0 3\x042 e2e4 0\x04".to_vec()), &tx);

        let received: Vec<SessionCommand> = rx.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(
            &received[0],
            SessionCommand::Remote(m) if m.kind == MessageType::StartGame && m.data == "3"
        ));
        assert!(matches!(
            &received[1],
            SessionCommand::Remote(m) if m.kind == MessageType::MakeMove && m.data == "e2e4 0"
        ));
        assert!(matches!(received[2], SessionCommand::TransportClosed));
    }

    #[test]
    fn connect_falls_through_to_a_live_host() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        let port = listener.local_addr().expect("listener has an address").port();
        let config = SessionConfig {
            hosts: vec!["host.invalid".to_owned(), "127.0.0.1".to_owned()],
            port,
            ..SessionConfig::default()
        };
        let stream = connect(&config).expect("second host should accept");
        assert_eq!(stream.peer_addr().expect("stream has a peer").port(), port);
    }

    #[test]
    fn connect_reports_every_failed_host() {
        let config = SessionConfig {
            hosts: vec!["host.invalid".to_owned()],
            ..SessionConfig::default()
        };
        assert!(matches!(
            connect(&config),
            Err(ChessErrors::ConnectionFailed { hosts, .. }) if hosts == vec!["host.invalid".to_owned()]
        ));
    }
}
