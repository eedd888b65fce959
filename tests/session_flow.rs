use std::io::{self, Write};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

use chessmate_client::game_state::chess_types::{Color, PieceKind};
use chessmate_client::moves::promotion::FixedPromotion;
use chessmate_client::protocol::game_session::{GameSession, SessionCommand, SessionEvent};
use chessmate_client::protocol::message::{Message, MessageType, END_OF_MESSAGE};
use chessmate_client::protocol::session_config::SessionConfig;
use chessmate_client::protocol::transport::Transport;
use chessmate_client::utils::algebraic::algebraic_to_square;
use chessmate_client::utils::pgn::GameResult;

/// Transport whose bytes stay readable after the session consumed it.
#[derive(Clone, Default)]
struct SharedWire {
    bytes: Arc<Mutex<Vec<u8>>>,
    closed: Arc<Mutex<bool>>,
}

impl SharedWire {
    fn frames(&self) -> Vec<String> {
        let bytes = self.bytes.lock().expect("wire lock poisoned");
        bytes
            .split(|&b| b == END_OF_MESSAGE)
            .filter(|frame| !frame.is_empty())
            .map(|frame| String::from_utf8_lossy(frame).into_owned())
            .collect()
    }

    fn is_closed(&self) -> bool {
        *self.closed.lock().expect("wire lock poisoned")
    }
}

impl Write for SharedWire {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().expect("wire lock poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for SharedWire {
    fn close(&mut self) -> io::Result<()> {
        *self.closed.lock().expect("wire lock poisoned") = true;
        Ok(())
    }
}

fn local(from: &str, to: &str) -> SessionCommand {
    SessionCommand::LocalMove {
        from: algebraic_to_square(from).expect("square should parse"),
        to: algebraic_to_square(to).expect("square should parse"),
    }
}

fn echo(data: &str) -> SessionCommand {
    SessionCommand::Remote(Message::new(MessageType::MakeMove, data))
}

fn drain(events: &Receiver<SessionEvent>) -> Vec<SessionEvent> {
    events.try_iter().collect()
}

#[test]
fn scholars_mate_against_the_engine_exports_pgn() {
    let wire = SharedWire::default();
    let (events_tx, events) = channel();
    let mut session = GameSession::new(
        SessionConfig::default(),
        wire.clone(),
        Box::new(FixedPromotion::default()),
        events_tx,
    );

    session.start().expect("start should succeed");
    session
        .handle(SessionCommand::Remote(Message::new(MessageType::StartGame, "7")))
        .expect("session id should parse");
    assert_eq!(session.session_id(), Some(7));

    let script = [
        (("e2", "e4"), "e2e4 0", Some("e7e5 0")),
        (("f1", "c4"), "Bf1c4 0", Some("Nb8c6 0")),
        (("d1", "h5"), "Qd1h5 0", Some("Ng8f6 0")),
        (("h5", "f7"), "Qh5xf7# 0", None),
    ];

    for ((from, to), white_echo, black_reply) in script {
        session.handle(local(from, to)).expect("local move should be sent");
        assert_eq!(session.board().ply_count() % 2, 0, "local move must not touch the board");
        session.handle(echo(white_echo)).expect("echo should apply");
        if let Some(reply) = black_reply {
            session.handle(echo(reply)).expect("engine reply should apply");
        }
    }

    assert_eq!(
        wire.frames(),
        vec![
            "0 1 0",
            "2 e2e4",
            "3 ",
            "2 Bf1c4",
            "3 ",
            "2 Qd1h5",
            "3 ",
            "2 Qh5xf7",
            "4 ",
        ]
    );
    assert!(wire.is_closed());
    assert!(!session.is_connected());

    let events = drain(&events);
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::GameOver {
            result: GameResult::WhiteWins
        }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::Status(text) if text == "Game over! White wins!"
    )));

    let path = std::env::temp_dir().join(format!("chessmate-flow-{}.pgn", std::process::id()));
    session
        .handle(SessionCommand::ExportPgn(path.clone()))
        .expect("export is handled");
    let pgn = std::fs::read_to_string(&path).expect("PGN should have been written");
    let _ = std::fs::remove_file(&path);

    assert!(pgn.starts_with("[Event \"\"]\n[Site \"\"]\n[Date \""));
    assert!(pgn.contains("[White \"Human\"]\n[Black \"ChessMate\"]\n[Result \"1-0\"]\n\n"));
    assert!(pgn.ends_with("1.e4 e5\n2.Bc4 Nc6\n3.Qh5 Nf6\n4.Qxf7#\n1-0\n"));
}

#[test]
fn run_loop_serializes_remote_and_local_commands() {
    let wire = SharedWire::default();
    let (events_tx, events) = channel();
    let (commands_tx, commands) = channel();

    let mut session = GameSession::new(
        SessionConfig {
            engine_opponent: false,
            ..SessionConfig::default()
        },
        wire.clone(),
        Box::new(FixedPromotion(PieceKind::Knight)),
        events_tx,
    );
    session.start().expect("start should succeed");
    let handle = thread::spawn(move || session.run(commands));

    for command in [
        local("d2", "d4"),
        echo("d2d4 0"),
        local("g8", "f6"),
        echo("Ng8f6 0"),
        SessionCommand::DescribeMoves,
        SessionCommand::Quit,
    ] {
        commands_tx.send(command).expect("session should be running");
    }
    handle.join().expect("session thread should finish");

    assert_eq!(wire.frames(), vec!["0 1 0", "2 d2d4", "2 Ng8f6", "4 "]);

    let events = drain(&events);
    let rows = events.iter().find_map(|event| match event {
        SessionEvent::MoveList(rows) => Some(rows.clone()),
        _ => None,
    });
    assert_eq!(rows, Some(vec![(1, "d4".to_owned(), "Nf6".to_owned())]));
    assert!(matches!(events.last(), Some(SessionEvent::Closed)));
}

#[test]
fn engine_side_moves_first_and_rejections_reopen_input() {
    let wire = SharedWire::default();
    let (events_tx, events) = channel();
    let mut session = GameSession::new(
        SessionConfig {
            player_color: Color::Black,
            ..SessionConfig::default()
        },
        wire.clone(),
        Box::new(FixedPromotion::default()),
        events_tx,
    );

    session.start().expect("start should succeed");
    session.handle(echo("Ng1f3 0")).expect("engine move should apply");
    assert!(session.is_accepting_moves());

    session.handle(local("g8", "h6")).expect("local move should be sent");
    session
        .handle(SessionCommand::Remote(Message::new(MessageType::InvalidMove, "Ng8h6")))
        .expect("rejection should be reported");

    assert!(session.is_accepting_moves());
    assert_eq!(wire.frames(), vec!["0 0 0", "3 ", "2 Ng8h6"]);
    assert!(drain(&events).iter().any(|e| matches!(
        e,
        SessionEvent::Status(text) if text == "Invalid move! Nh6"
    )));
}
