//! Session context: one engine, one outbound link, one selection controller.
//!
//! Every event the host receives (inbound message, connection close, pointer
//! down, resize) is dispatched through a single [`Session`] on one thread, so
//! the engine's maps are never mutated concurrently.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use wire::{ActionMessage, BoardUpdate, Category, EntityId, decode_inbound, encode_action};

use crate::engine::Engine;
use crate::geometry::Point;
use crate::selection::SelectionController;
use crate::settle::{ResizeSettle, Settle};
use crate::surface::Surface;

/// Error returned by a [`Link`] when an outbound message cannot be sent.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The channel is no longer open.
    #[error("connection closed")]
    Closed,
    /// The transport rejected the message.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Outbound half of the realtime channel.
pub trait Link {
    /// Send one serialized message.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Closed`] if the channel has gone away, or
    /// [`SendError::Transport`] if the transport refused the message.
    fn send(&mut self, text: &str) -> Result<(), SendError>;
}

/// The live viewer state for one connection.
pub struct Session<S: Surface, L: Link> {
    engine: Engine<S>,
    link: Option<L>,
    selection: SelectionController,
    settle: ResizeSettle,
    intents_sent: u64,
}

impl<S: Surface, L: Link> Session<S, L> {
    /// Create a session around an engine and an open link.
    #[must_use]
    pub fn new(engine: Engine<S>, link: L) -> Self {
        Self {
            engine,
            link: Some(link),
            selection: SelectionController::new(),
            settle: ResizeSettle::default(),
            intents_sent: 0,
        }
    }

    // --- Inbound ---

    /// Decode and apply one raw inbound payload.
    ///
    /// Malformed payloads are logged and dropped; they never reach the engine.
    pub fn on_message(&mut self, raw: &str) {
        match decode_inbound(raw) {
            Ok(Some(update)) => self.apply(update),
            Ok(None) => log::debug!("ignoring non-update message"),
            Err(e) => log::warn!("dropping inbound message: {e}"),
        }
    }

    /// Apply a decoded board update: board type, then entities, then players.
    pub fn apply(&mut self, update: BoardUpdate) {
        for rejected in &update.rejected {
            let category = match rejected.category {
                Category::Entity => "entity",
                Category::Player => "player",
            };
            log::warn!("dropped {category} update #{}: {}", rejected.index, rejected.error);
        }
        if let Some(board_type) = update.board_type {
            self.engine.set_board_type(board_type.rows, board_type.cols);
        }
        if let Some(entities) = &update.entities {
            self.engine.apply_entity_updates(entities);
        }
        if let Some(players) = &update.players {
            self.engine.apply_player_updates(players);
        }
    }

    /// The channel closed. Engine state is kept; outbound becomes a no-op.
    ///
    /// Returns `true` only for the first close, so the host can surface a
    /// single "disconnected" notification.
    pub fn on_close(&mut self) -> bool {
        if self.link.take().is_some() {
            log::info!("disconnected; keeping {} entities on screen", self.engine.entity_count());
            true
        } else {
            false
        }
    }

    // --- User input ---

    /// Pointer down at `point`: toggle the entity under it and send the select intent.
    ///
    /// Returns the entity id whose intent was sent. If the intent cannot be
    /// sent the toggle is undone. Does nothing at all while disconnected.
    pub fn on_pointer(&mut self, point: Point) -> Option<EntityId> {
        if self.link.is_none() {
            log::debug!("pointer ignored while disconnected");
            return None;
        }
        let toggle = self.selection.toggle_at(&mut self.engine, point)?;
        let sent = match encode_action(&ActionMessage::select(toggle.entity_id)) {
            Ok(text) => self.send(&text),
            Err(e) => {
                log::warn!("failed to encode select intent: {e}");
                false
            }
        };
        if sent {
            self.intents_sent += 1;
            Some(toggle.entity_id)
        } else {
            self.engine.set_entity_status(toggle.entity_id, toggle.from.status());
            None
        }
    }

    fn send(&mut self, text: &str) -> bool {
        let Some(link) = self.link.as_mut() else {
            return false;
        };
        match link.send(text) {
            Ok(()) => true,
            Err(SendError::Closed) => {
                log::warn!("select intent lost: connection closed");
                self.on_close();
                false
            }
            Err(e) => {
                log::warn!("select intent failed: {e}");
                false
            }
        }
    }

    // --- Resize ---

    /// Record a resize notification; geometry is recomputed once the surface settles.
    pub fn on_resize(&mut self, width: f64, height: f64, now: f64) {
        self.settle.note(width, height, now);
    }

    /// Apply a settled resize if one is due at `now`.
    pub fn settle(&mut self, now: f64) -> Settle {
        let state = self.settle.poll(now);
        if let Settle::Ready { width, height } = state {
            self.engine.resize(width, height);
        }
        state
    }

    /// Apply any pending resize now, without waiting for the quiet period.
    pub fn flush_resize(&mut self) -> bool {
        match self.settle.flush() {
            Some((width, height)) => {
                self.engine.resize(width, height);
                true
            }
            None => false,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    #[must_use]
    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<S> {
        &mut self.engine
    }

    #[must_use]
    pub fn link(&self) -> Option<&L> {
        self.link.as_ref()
    }

    /// Number of select intents handed to the link.
    #[must_use]
    pub fn intents_sent(&self) -> u64 {
        self.intents_sent
    }
}
