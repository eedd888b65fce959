use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{channel, Sender};
use std::thread;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use chessmate_client::chess_errors::ChessErrors;
use chessmate_client::game_state::chess_types::{Color, PieceKind};
use chessmate_client::moves::disambiguation::AmbiguityPolicy;
use chessmate_client::protocol::game_session::{GameSession, SessionCommand, SessionEvent};
use chessmate_client::protocol::promotion_prompt::ChannelPromotionChooser;
use chessmate_client::protocol::session_config::{
    random_color, Difficulty, SessionConfig, DEFAULT_HOST, DEFAULT_PORT,
};
use chessmate_client::protocol::transport::{connect, spawn_reader};
use chessmate_client::utils::algebraic::algebraic_to_square;

#[derive(Parser)]
#[command(name = "chessmate")]
#[command(about = "Play against the ChessMate engine from a terminal")]
struct Args {
    /// Engine host to try; repeat for fallbacks, tried in order
    #[arg(long = "host", value_name = "HOST")]
    hosts: Vec<String>,

    /// Engine port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Side to play against the engine
    #[arg(long, value_enum, default_value_t = ColorChoice::Random)]
    color: ColorChoice,

    #[arg(long, value_enum, default_value_t = DifficultyChoice::Easy)]
    difficulty: DifficultyChoice,

    /// Two humans share this terminal; the engine only referees
    #[arg(long)]
    two_player: bool,

    /// How disambiguation combines several competing pieces
    #[arg(long, value_enum, default_value_t = AmbiguityChoice::Last)]
    ambiguity: AmbiguityChoice,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorChoice {
    White,
    Black,
    Random,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyChoice {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Copy, ValueEnum)]
enum AmbiguityChoice {
    Last,
    Union,
}

impl Args {
    fn session_config(self) -> SessionConfig {
        let hosts = if self.hosts.is_empty() {
            vec![DEFAULT_HOST.to_owned()]
        } else {
            self.hosts
        };

        let player_color = match (self.two_player, self.color) {
            (true, _) | (false, ColorChoice::White) => Color::White,
            (false, ColorChoice::Black) => Color::Black,
            (false, ColorChoice::Random) => random_color(),
        };

        SessionConfig {
            hosts,
            port: self.port,
            player_color,
            difficulty: match self.difficulty {
                DifficultyChoice::Easy => Difficulty::Easy,
                DifficultyChoice::Medium => Difficulty::Medium,
                DifficultyChoice::Hard => Difficulty::Hard,
            },
            engine_opponent: !self.two_player,
            ambiguity_policy: match self.ambiguity {
                AmbiguityChoice::Last => AmbiguityPolicy::LastMatch,
                AmbiguityChoice::Union => AmbiguityPolicy::Union,
            },
        }
    }
}

enum UiEvent {
    Input(String),
    InputClosed,
    Session(SessionEvent),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match play(args.session_config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "client stopped");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn play(config: SessionConfig) -> Result<(), ChessErrors> {
    let stream = connect(&config)?;

    let (command_tx, command_rx) = channel::<SessionCommand>();
    let (event_tx, event_rx) = channel::<SessionEvent>();
    let (ui_tx, ui_rx) = channel::<UiEvent>();

    spawn_reader(&stream, command_tx.clone())?;

    let chooser = ChannelPromotionChooser::new(event_tx.clone());
    let mut session = GameSession::new(config, stream, Box::new(chooser), event_tx);
    session.start()?;
    let session_thread = thread::Builder::new()
        .name("game-session".to_owned())
        .spawn(move || session.run(command_rx))?;

    let forward_tx = ui_tx.clone();
    thread::spawn(move || {
        for event in event_rx {
            if forward_tx.send(UiEvent::Session(event)).is_err() {
                break;
            }
        }
    });

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if ui_tx.send(UiEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = ui_tx.send(UiEvent::InputClosed);
    });

    println!("Commands: <from><to> (e.g. e2e4), board, moves, pgn <path>, quit");

    let mut console = Console::new(command_tx);
    for event in ui_rx {
        if !console.on_event(event) {
            break;
        }
        io::stdout().flush().ok();
    }

    if session_thread.join().is_err() {
        error!("session thread panicked");
    }
    Ok(())
}

/// The interactive task: reads console lines, prints session events and
/// answers promotion prompts.
struct Console {
    commands: Sender<SessionCommand>,
    pending_promotion: Option<Sender<PieceKind>>,
}

impl Console {
    fn new(commands: Sender<SessionCommand>) -> Self {
        Self {
            commands,
            pending_promotion: None,
        }
    }

    /// Returns false once the session is closed.
    fn on_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Input(line) => self.on_input(line.trim()),
            UiEvent::InputClosed => self.quit(),
            UiEvent::Session(event) => self.on_session_event(event),
        }
    }

    fn on_input(&mut self, line: &str) -> bool {
        if let Some(reply) = self.pending_promotion.take() {
            match promotion_from_input(line) {
                Some(kind) => {
                    let _ = reply.send(kind);
                }
                None if line == "quit" => return self.quit(),
                None => {
                    println!("Promote to which piece? [n/b/r/q]");
                    self.pending_promotion = Some(reply);
                }
            }
            return true;
        }

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => true,
            (Some("quit"), _) => self.quit(),
            (Some("board"), _) => self.submit(SessionCommand::DescribeBoard),
            (Some("moves"), _) => self.submit(SessionCommand::DescribeMoves),
            (Some("pgn"), Some(path)) => self.submit(SessionCommand::ExportPgn(PathBuf::from(path))),
            (Some("pgn"), None) => {
                println!("Usage: pgn <path>");
                true
            }
            (Some(text), None) => match parse_local_move(text) {
                Ok(command) => self.submit(command),
                Err(err) => {
                    println!("Unrecognized input '{text}': {err}");
                    true
                }
            },
            (Some(text), Some(_)) => {
                println!("Unrecognized input '{text}'");
                true
            }
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Status(text) => println!("{text}"),
            SessionEvent::BoardChanged { diagram, last_move } => {
                if let Some(last) = last_move {
                    println!("Last move: {last}");
                }
                println!("{diagram}");
            }
            SessionEvent::YourTurn => println!("Your move!"),
            SessionEvent::EngineThinking => println!("Engine is thinking..."),
            SessionEvent::PromotionRequested {
                color,
                square,
                reply,
            } => {
                println!(
                    "{} pawn promotes on {}. Promote to which piece? [n/b/r/q]",
                    color.name(),
                    square
                );
                self.pending_promotion = Some(reply);
            }
            SessionEvent::MoveList(rows) => {
                for (number, white, black) in rows {
                    println!("{number:>3}. {white:<8} {black}");
                }
            }
            SessionEvent::GameOver { result } => {
                println!("Result: {}", result.as_pgn_token());
                println!("Use 'pgn <path>' to save the game, 'quit' to exit.");
            }
            SessionEvent::ConnectionLost => {}
            SessionEvent::Closed => return false,
        }
        true
    }

    /// Abandons any open promotion prompt so the session thread stops
    /// waiting on it before it reads the quit.
    fn quit(&mut self) -> bool {
        self.pending_promotion = None;
        self.submit(SessionCommand::Quit)
    }

    fn submit(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }
}

fn parse_local_move(text: &str) -> Result<SessionCommand, ChessErrors> {
    let (Some(from), Some(to), true) = (text.get(0..2), text.get(2..4), text.len() == 4) else {
        return Err(ChessErrors::InvalidAlgebraicString(text.to_owned()));
    };
    Ok(SessionCommand::LocalMove {
        from: algebraic_to_square(from)?,
        to: algebraic_to_square(to)?,
    })
}

fn promotion_from_input(text: &str) -> Option<PieceKind> {
    match text.to_ascii_lowercase().as_str() {
        "n" => Some(PieceKind::Knight),
        "b" => Some(PieceKind::Bishop),
        "r" => Some(PieceKind::Rook),
        "q" => Some(PieceKind::Queen),
        _ => None,
    }
}
