//! Cloneable façades over the host worker's command queue.
//!
//! [`HostHandle`] is what the local host UI holds. [`PeerInbox`] is what a
//! transport holds for one attached peer: it feeds inbound traffic and
//! connection changes back into the same queue.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;

use crate::core::action::{Intent, IntentRecord};
use crate::core::seat::Seat;
use crate::core::state::GameState;
use crate::error::{Result, SessionError};
use crate::rules::Transition;
use crate::tiles::TileId;

use super::channel::{ConnectionState, PeerChannel, PeerId};
use super::host::Command;
use super::protocol::WireMessage;
use super::view::GameView;

/// Client-facing handle to the host worker.
#[derive(Clone)]
pub struct HostHandle {
    command_tx: mpsc::Sender<Command>,
    view_rx: watch::Receiver<GameView>,
}

impl HostHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, view_rx: watch::Receiver<GameView>) -> Self {
        Self {
            command_tx,
            view_rx,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::CommandChannelClosed)?;

        reply_rx.await.map_err(SessionError::ReplyChannelClosed)
    }

    pub(crate) async fn send_shutdown(&self) {
        // Already stopped if this fails.
        let _ = self.command_tx.send(Command::Shutdown).await;
    }

    /// Deal a fresh game and broadcast it. Allowed in any phase.
    pub async fn start_game(&self) -> Result<()> {
        self.request(|reply| Command::StartGame { reply }).await
    }

    /// Apply an intent for the host seat.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IllegalMove` if the engine rejects it; nothing
    /// is broadcast in that case.
    pub async fn submit(&self, intent: Intent) -> Result<Transition> {
        let result = self
            .request(|reply| Command::Submit {
                seat: Seat::HOST,
                intent,
                reply,
            })
            .await?;
        Ok(result?)
    }

    pub async fn draw(&self) -> Result<Transition> {
        self.submit(Intent::Draw).await
    }

    pub async fn end_turn(&self) -> Result<Transition> {
        self.submit(Intent::EndTurn).await
    }

    /// Commit `tiles` as a new set (`target == None`) or onto board set
    /// `target`.
    pub async fn commit_set(&self, tiles: Vec<TileId>, target: Option<usize>) -> Result<Transition> {
        self.submit(Intent::CommitSet { tiles, target }).await
    }

    /// Attach a remote peer on the next free client seat.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RosterFull` when seats 1 to 3 are all taken.
    pub async fn attach_peer(&self, channel: Arc<dyn PeerChannel>) -> Result<PeerInbox> {
        let (peer, seat) = self
            .request(|reply| Command::AttachPeer { channel, reply })
            .await??;

        Ok(PeerInbox {
            peer,
            seat,
            command_tx: self.command_tx.clone(),
        })
    }

    /// `seat`'s projected view of the current state.
    pub async fn view(&self, seat: Seat) -> Result<GameView> {
        self.request(|reply| Command::QueryView { seat, reply }).await
    }

    /// Snapshot of the canonical state.
    pub async fn state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Intents committed since the last deal, oldest first.
    pub async fn history(&self) -> Result<Vec<IntentRecord>> {
        self.request(|reply| Command::QueryHistory { reply }).await
    }

    /// The host seat's view, updated after every broadcast.
    #[must_use]
    pub fn subscribe_view(&self) -> watch::Receiver<GameView> {
        self.view_rx.clone()
    }
}

/// Inbound side of one attached peer.
#[derive(Clone, Debug)]
pub struct PeerInbox {
    peer: PeerId,
    seat: Seat,
    command_tx: mpsc::Sender<Command>,
}

impl PeerInbox {
    #[must_use]
    pub fn peer(&self) -> PeerId {
        self.peer
    }

    /// The client seat assigned to this peer.
    #[must_use]
    pub fn seat(&self) -> Seat {
        self.seat
    }

    /// Hand a received message to the host.
    ///
    /// # Errors
    ///
    /// Fails only if the host worker has stopped.
    pub async fn on_message(&self, message: WireMessage) -> Result<()> {
        self.command_tx
            .send(Command::PeerMessage {
                peer: self.peer,
                message,
            })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Decode raw text from the transport and hand it to the host.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Protocol` for text that is not a wire message;
    /// nothing reaches the host in that case.
    pub async fn on_text(&self, text: &str) -> Result<()> {
        let message = WireMessage::decode(text).map_err(|err| {
            warn!(peer = %self.peer, seat = %self.seat, %err, "undecodable text dropped");
            err
        })?;
        self.on_message(message).await
    }

    /// Report a connection change for this peer.
    pub async fn on_connection_state_change(&self, state: ConnectionState) -> Result<()> {
        self.command_tx
            .send(Command::PeerState {
                peer: self.peer,
                state,
            })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }
}
