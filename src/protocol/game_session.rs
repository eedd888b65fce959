//! Session processor: the only writer of the board.
//!
//! Engine messages (from the frame reader) and local requests (from the UI)
//! arrive as `SessionCommand`s on one queue. `GameSession` handles them one at
//! a time and reports back through `SessionEvent`s. A local move is only
//! sent to the engine; the board changes when the engine echoes it.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use tracing::{debug, error, info, warn};

use crate::chess_errors::ChessErrors;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::promotion::PromotionChooser;
use crate::protocol::message::{MakeMovePayload, Message, MessageType};
use crate::protocol::session_config::SessionConfig;
use crate::protocol::transport::Transport;
use crate::utils::move_notation::notation_to_move_record;
use crate::utils::pgn::{export_pgn, game_result, move_rows, GameResult, PgnHeaders};
use crate::utils::render_game_state::render_board;

pub const CONNECTION_FAILURE_TEXT: &str = "Sorry! Either the server shut down or something else \
     went wrong. Please try playing again later!";

#[derive(Debug)]
pub enum SessionCommand {
    /// A message decoded by the frame reader.
    Remote(Message),
    /// The local player wants to move the piece on `from` to `to`.
    LocalMove { from: Square, to: Square },
    /// Ask the engine to move if it is its turn.
    RequestMove,
    ExportPgn(PathBuf),
    DescribeBoard,
    DescribeMoves,
    Quit,
    /// The frame reader hit end of stream or a read error.
    TransportClosed,
}

#[derive(Debug)]
pub enum SessionEvent {
    Status(String),
    BoardChanged {
        diagram: String,
        last_move: Option<String>,
    },
    YourTurn,
    EngineThinking,
    PromotionRequested {
        color: Color,
        square: Square,
        reply: Sender<PieceKind>,
    },
    MoveList(Vec<(usize, String, String)>),
    GameOver {
        result: GameResult,
    },
    ConnectionLost,
    Closed,
}

pub struct GameSession<T: Transport> {
    config: SessionConfig,
    board: BoardState,
    transport: T,
    chooser: Box<dyn PromotionChooser>,
    events: Sender<SessionEvent>,
    session_id: Option<i64>,
    connected: bool,
    shutdown_expected: bool,
    accepting_moves: bool,
}

impl<T: Transport> GameSession<T> {
    pub fn new(
        config: SessionConfig,
        transport: T,
        chooser: Box<dyn PromotionChooser>,
        events: Sender<SessionEvent>,
    ) -> Self {
        Self::from_position(config, BoardState::new_game(), transport, chooser, events)
    }

    /// Session resuming from `board` instead of the starting array.
    pub fn from_position(
        config: SessionConfig,
        mut board: BoardState,
        transport: T,
        chooser: Box<dyn PromotionChooser>,
        events: Sender<SessionEvent>,
    ) -> Self {
        board.set_ambiguity_policy(config.ambiguity_policy);

        Self {
            config,
            board,
            transport,
            chooser,
            events,
            session_id: None,
            connected: true,
            shutdown_expected: false,
            accepting_moves: false,
        }
    }

    #[inline]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn session_id(&self) -> Option<i64> {
        self.session_id
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    #[inline]
    pub fn is_accepting_moves(&self) -> bool {
        self.accepting_moves
    }

    /// Send `start-game` and hand the first move to whoever owns it.
    pub fn start(&mut self) -> Result<(), ChessErrors> {
        let payload = self.config.start_game_payload();
        info!(
            player = self.config.player_color.name(),
            difficulty = ?self.config.difficulty,
            engine_opponent = self.config.engine_opponent,
            "starting game"
        );
        self.send(&Message::new(MessageType::StartGame, payload))?;
        self.request_move()
    }

    /// Process commands until `Quit` or until every sender is gone.
    pub fn run(mut self, commands: Receiver<SessionCommand>) {
        for command in commands.iter() {
            match self.handle(command) {
                Ok(true) => {}
                Ok(false) => return,
                Err(err) => self.recover(err),
            }
        }

        if let Err(err) = self.disconnect() {
            debug!(error = %err, "disconnect after command queue closed failed");
        }
        self.emit(SessionEvent::Closed);
    }

    /// Handle one command. `Ok(false)` means the session is finished.
    pub fn handle(&mut self, command: SessionCommand) -> Result<bool, ChessErrors> {
        match command {
            SessionCommand::Remote(message) => self.process_message(message)?,
            SessionCommand::LocalMove { from, to } => self.local_move(from, to)?,
            SessionCommand::RequestMove => {
                if self.connected {
                    self.request_move()?;
                }
            }
            SessionCommand::ExportPgn(path) => self.export(path),
            SessionCommand::DescribeBoard => self.emit_board(),
            SessionCommand::DescribeMoves => {
                let rows = move_rows(self.board.white_moves(), self.board.black_moves());
                self.emit(SessionEvent::MoveList(rows));
            }
            SessionCommand::Quit => {
                self.disconnect()?;
                self.emit(SessionEvent::Closed);
                return Ok(false);
            }
            SessionCommand::TransportClosed => self.transport_closed(),
        }
        Ok(true)
    }

    /// Error policy for a failed command: protocol and transport errors end
    /// the connection, anything else is reported and play goes on.
    pub fn recover(&mut self, err: ChessErrors) {
        if err.is_protocol_error() || matches!(err, ChessErrors::Io(_)) {
            error!(error = %err, "ending engine connection");
            self.fail_connection();
        } else {
            warn!(error = %err, "command failed");
            self.emit(SessionEvent::Status(err.to_string()));
        }
    }

    fn process_message(&mut self, message: Message) -> Result<(), ChessErrors> {
        if !self.connected {
            debug!(?message, "ignoring message after disconnect");
            return Ok(());
        }

        match message.kind {
            MessageType::StartGame => {
                let id = message
                    .data
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ChessErrors::MalformedMessage(message.data.clone()))?;
                info!(session_id = id, "engine accepted game");
                self.session_id = Some(id);
                Ok(())
            }
            MessageType::MakeMove => self.confirmed_move(&message.data),
            MessageType::InvalidMove => self.rejected_move(&message.data),
            MessageType::Invalid => Err(message.invalid_type_error()),
            MessageType::GetMove | MessageType::Disconnect => Err(ChessErrors::UnknownMessageType(
                format!("{} {}", message.kind.code(), message.data),
            )),
        }
    }

    fn confirmed_move(&mut self, data: &str) -> Result<(), ChessErrors> {
        let payload = MakeMovePayload::parse(data)?;
        let mover = self.board.side_to_move();

        let mut record = notation_to_move_record(payload.wire_move, mover)?;
        // Recorded moves are frozen, so the stalemate flag goes in first.
        record.stalemate = payload.status.is_stalemate();
        let checkmate = record.is_checkmate();
        let check = record.is_check();

        self.board.apply_move(record);
        self.emit_board();

        if checkmate {
            info!(winner = mover.name(), "checkmate");
            self.emit(SessionEvent::Status(format!("Game over! {} wins!", mover.name())));
            return self.finish_game();
        }

        if check {
            self.emit(SessionEvent::Status(format!(
                "{} in check!",
                mover.opposite().name()
            )));
        }

        if let Some(text) = payload.status.describe() {
            info!(status = ?payload.status, "stalemate");
            self.emit(SessionEvent::Status(text.to_owned()));
            return self.finish_game();
        }

        self.request_move()
    }

    fn rejected_move(&mut self, data: &str) -> Result<(), ChessErrors> {
        let mut record = notation_to_move_record(data.trim(), self.board.side_to_move())?;
        record.ambiguity = self.board.resolve_ambiguity(&record);

        warn!(wire = %data.trim(), "engine rejected move");
        self.emit(SessionEvent::Status(format!(
            "Invalid move! {}",
            record.display_form()
        )));
        self.accepting_moves = true;
        Ok(())
    }

    fn local_move(&mut self, from: Square, to: Square) -> Result<(), ChessErrors> {
        let side = self.board.side_to_move();

        if !self.connected {
            self.emit(SessionEvent::Status("Not connected to the engine.".to_owned()));
            return Ok(());
        }
        if !self.accepting_moves || !self.config.is_local_turn(side) {
            self.emit(SessionEvent::Status("Not your move!".to_owned()));
            return Ok(());
        }
        match self.board.piece_at(from) {
            None => return Err(ChessErrors::EmptyOriginSquare(from)),
            Some(piece) if piece.color != side => {
                self.emit(SessionEvent::Status(format!(
                    "It is {}'s move.",
                    side.name()
                )));
                return Ok(());
            }
            Some(_) => {}
        }

        let record = self.board.annotate_move(from, to, &mut *self.chooser)?;
        let wire = record.wire_form();
        debug!(wire = %wire, "sending local move");

        self.accepting_moves = false;
        self.send(&Message::new(MessageType::MakeMove, wire))
    }

    fn request_move(&mut self) -> Result<(), ChessErrors> {
        if self.config.is_local_turn(self.board.side_to_move()) {
            self.accepting_moves = true;
            self.emit(SessionEvent::YourTurn);
            Ok(())
        } else {
            self.accepting_moves = false;
            self.send(&Message::empty(MessageType::GetMove))?;
            self.emit(SessionEvent::EngineThinking);
            Ok(())
        }
    }

    fn finish_game(&mut self) -> Result<(), ChessErrors> {
        let result = game_result(self.board.white_moves(), self.board.black_moves());
        self.emit(SessionEvent::GameOver { result });
        self.disconnect()
    }

    fn export(&mut self, path: PathBuf) {
        let (white, black) = self.config.player_names();
        let headers = PgnHeaders::for_players(white, black);

        match export_pgn(&path, &headers, self.board.white_moves(), self.board.black_moves()) {
            Ok(()) => self.emit(SessionEvent::Status(format!(
                "Game saved to {}",
                path.display()
            ))),
            Err(err) => {
                warn!(error = %err, "PGN export failed");
                self.emit(SessionEvent::Status(err.to_string()));
            }
        }
    }

    fn transport_closed(&mut self) {
        if self.shutdown_expected || !self.connected {
            debug!("engine connection closed");
            self.connected = false;
            return;
        }

        error!("engine connection closed unexpectedly");
        self.fail_connection();
    }

    /// Graceful shutdown: tell the engine, then close.
    fn disconnect(&mut self) -> Result<(), ChessErrors> {
        if !self.connected {
            return Ok(());
        }

        self.accepting_moves = false;
        let sent = self.send(&Message::empty(MessageType::Disconnect));
        self.connected = false;
        self.shutdown_expected = true;
        self.close_transport();
        sent
    }

    fn fail_connection(&mut self) {
        let was_connected = self.connected;
        self.connected = false;
        self.accepting_moves = false;
        self.shutdown_expected = true;
        self.close_transport();

        if was_connected {
            self.emit(SessionEvent::ConnectionLost);
            self.emit(SessionEvent::Status(CONNECTION_FAILURE_TEXT.to_owned()));
        }
    }

    fn close_transport(&mut self) {
        if let Err(err) = self.transport.close() {
            debug!(error = %err, "closing engine connection failed");
        }
    }

    fn send(&mut self, message: &Message) -> Result<(), ChessErrors> {
        if !self.connected {
            return Ok(());
        }
        debug!(kind = ?message.kind, data = %message.data, "sending message");
        self.transport.write_all(&message.serialize())?;
        self.transport.flush()?;
        Ok(())
    }

    fn emit_board(&self) {
        self.emit(SessionEvent::BoardChanged {
            diagram: render_board(&self.board),
            last_move: self.board.last_move().map(|record| record.display_form()),
        });
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("no listener for session events");
        }
    }
}
