//! Client side of a session.
//!
//! A client holds nothing but the newest view the host pushed. It never applies
//! a move itself: actions become wire messages and the client waits for the
//! next `UPDATE_STATE` to see the outcome.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::seat::Seat;
use crate::error::{MoveError, Result, SessionError};
use crate::rules::{sort_set, sorted_set};
use crate::tiles::{Tile, TileId};

use super::channel::{ConnectionState, PeerChannel};
use super::protocol::{ClientBound, MovePayload, WireMessage};
use super::view::GameView;

/// A remote seat mirroring the host.
pub struct ClientSession {
    host: Arc<dyn PeerChannel>,
    view_tx: watch::Sender<Option<GameView>>,
}

impl ClientSession {
    #[must_use]
    pub fn new(host: Arc<dyn PeerChannel>) -> Self {
        let (view_tx, _) = watch::channel(None);
        Self { host, view_tx }
    }

    /// Receiver that observes every view replacement.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<GameView>> {
        self.view_tx.subscribe()
    }

    /// The last view received, if any.
    #[must_use]
    pub fn view(&self) -> Option<GameView> {
        self.view_tx.borrow().clone()
    }

    /// This client's seat, known once the first view arrives.
    #[must_use]
    pub fn seat(&self) -> Option<Seat> {
        self.view_tx.borrow().as_ref().map(|v| v.my_player_index)
    }

    /// Apply a message from the host.
    ///
    /// A view older than the one held is dropped, since the channel may
    /// reorder. Equal revisions replace the view.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Protocol` for host-bound or malformed messages;
    /// the current view is kept.
    pub fn handle_message(&self, message: WireMessage) -> Result<()> {
        match message.into_client_bound()? {
            ClientBound::UpdateState(view) => {
                let (seat, revision) = (view.my_player_index, view.revision);
                let replaced = self.view_tx.send_if_modified(|held| {
                    if held.as_ref().is_some_and(|current| current.revision > revision) {
                        return false;
                    }
                    *held = Some(*view);
                    true
                });

                if replaced {
                    debug!(%seat, revision, "view replaced");
                } else {
                    debug!(%seat, revision, "out-of-order view dropped");
                }
            }
            ClientBound::StartGame => info!("host started a new game"),
        }
        Ok(())
    }

    /// Decode and apply raw text from the transport.
    pub fn handle_text(&self, text: &str) -> Result<()> {
        let message = WireMessage::decode(text)?;
        self.handle_message(message)
    }

    pub fn on_connection_state_change(&self, state: ConnectionState) {
        match state {
            ConnectionState::Connected => info!("connected to host"),
            ConnectionState::Connecting => debug!("connecting to host"),
            ConnectionState::Disconnected | ConnectionState::Failed => {
                warn!(%state, "connection to host lost");
            }
        }
    }

    fn current(&self) -> Result<GameView> {
        self.view().ok_or(SessionError::NoView)
    }

    fn send(&self, message: &WireMessage) -> Result<()> {
        Ok(self.host.send(message)?)
    }

    /// Ask the host to draw for this seat.
    pub fn draw(&self) -> Result<()> {
        let view = self.current()?;
        self.send(&WireMessage::draw(view.my_player_index))
    }

    /// Ask the host to end this seat's turn.
    pub fn end_turn(&self) -> Result<()> {
        let view = self.current()?;
        self.send(&WireMessage::end_turn(view.my_player_index))
    }

    /// Propose committing `tiles` as a new set, or onto board set `target`.
    ///
    /// Only checks that the tiles are in the viewed hand and the target
    /// exists; legality is decided by the host.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoView` before the first update, and
    /// `SessionError::IllegalMove` for unknown tiles or targets.
    pub fn commit_set(&self, tiles: &[TileId], target: Option<usize>) -> Result<()> {
        let view = self.current()?;

        let chosen = tiles
            .iter()
            .map(|&id| {
                view.player_hand
                    .iter()
                    .find(|t| t.id == id)
                    .copied()
                    .ok_or(MoveError::TileNotInHand { tile: id })
            })
            .collect::<std::result::Result<Vec<Tile>, _>>()?;

        let mut board = view.board.clone();
        match target {
            None => board.push(sorted_set(chosen)),
            Some(index) => {
                let set = board
                    .get_mut(index)
                    .ok_or(MoveError::UnknownTarget { index })?;
                set.extend(chosen);
                sort_set(set);
            }
        }

        let payload = MovePayload {
            board,
            hand: view
                .player_hand
                .iter()
                .filter(|t| !tiles.contains(&t.id))
                .copied()
                .collect(),
            has_meld: view.has_meld.clone(),
        };

        self.send(&WireMessage::action_move(view.my_player_index, &payload)?)
    }
}
