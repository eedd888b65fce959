//! Promotion prompts answered by the interactive task.
//!
//! The session thread sends a `PromotionRequested` event carrying a reply
//! channel and blocks until the UI answers. The frame reader keeps queueing
//! engine messages meanwhile.

use std::sync::mpsc::{channel, Sender};

use tracing::debug;

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::promotion::PromotionChooser;
use crate::protocol::game_session::SessionEvent;

pub struct ChannelPromotionChooser {
    events: Sender<SessionEvent>,
}

impl ChannelPromotionChooser {
    pub fn new(events: Sender<SessionEvent>) -> Self {
        Self { events }
    }
}

impl PromotionChooser for ChannelPromotionChooser {
    fn choose_promotion(&mut self, color: Color, square: Square) -> Result<PieceKind, ChessErrors> {
        let (reply, answer) = channel();
        self.events
            .send(SessionEvent::PromotionRequested {
                color,
                square,
                reply,
            })
            .map_err(|_| ChessErrors::PromotionChooserUnavailable)?;

        let kind = answer
            .recv()
            .map_err(|_| ChessErrors::PromotionChooserUnavailable)?;
        debug!(square = %square, piece = %kind, "promotion chosen");
        Ok(kind)
    }
}
