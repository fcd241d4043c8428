//! In-process transport for tests and local play.
//!
//! `channel_pair` links two endpoints with unbounded tokio channels carrying
//! encoded JSON text, so everything crossing it goes through the same wire
//! format a network transport would use. The pump helpers drive the
//! receiving halves into a `PeerInbox` or a `ClientSession`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ChannelError, SessionError};

use super::channel::{ConnectionState, PeerChannel};
use super::client::ClientSession;
use super::handle::PeerInbox;
use super::protocol::WireMessage;

/// Sending half of an in-memory link.
pub struct MemoryChannel {
    tx: mpsc::UnboundedSender<String>,
    open: AtomicBool,
}

impl MemoryChannel {
    /// Refuse further sends, as a dropped connection would.
    pub fn disconnect(&self) {
        self.open.store(false, Ordering::Release);
    }
}

impl PeerChannel for MemoryChannel {
    fn send(&self, message: &WireMessage) -> Result<(), ChannelError> {
        if !self.open.load(Ordering::Acquire) {
            return Err(ChannelError::NotConnected);
        }
        let text = message
            .encode()
            .map_err(|err| ChannelError::Encode(err.to_string()))?;
        self.tx.send(text).map_err(|_| ChannelError::Closed)
    }
}

/// One side of an in-memory link.
pub struct MemoryEndpoint {
    /// Sends to the other side.
    pub channel: Arc<MemoryChannel>,
    /// Text sent by the other side.
    pub incoming: mpsc::UnboundedReceiver<String>,
}

/// Two connected endpoints.
#[must_use]
pub fn channel_pair() -> (MemoryEndpoint, MemoryEndpoint) {
    let (a_tx, a_rx) = mpsc::unbounded_channel();
    let (b_tx, b_rx) = mpsc::unbounded_channel();

    let endpoint = |tx, incoming| MemoryEndpoint {
        channel: Arc::new(MemoryChannel {
            tx,
            open: AtomicBool::new(true),
        }),
        incoming,
    };

    (endpoint(a_tx, b_rx), endpoint(b_tx, a_rx))
}

/// Feed text arriving at the host side of a link into `inbox`.
///
/// Reports `Connected` first and `Disconnected` once the link closes.
pub fn spawn_host_pump(mut incoming: mpsc::UnboundedReceiver<String>, inbox: PeerInbox) -> JoinHandle<()> {
    tokio::spawn(async move {
        if inbox
            .on_connection_state_change(ConnectionState::Connected)
            .await
            .is_err()
        {
            return;
        }

        while let Some(text) = incoming.recv().await {
            match inbox.on_text(&text).await {
                Ok(()) | Err(SessionError::Protocol(_)) => {}
                Err(err) => {
                    debug!(peer = %inbox.peer(), %err, "host stopped, pump exiting");
                    return;
                }
            }
        }

        // The host may already be gone.
        let _ = inbox
            .on_connection_state_change(ConnectionState::Disconnected)
            .await;
    })
}

/// Feed text arriving at the client side of a link into `client`.
pub fn spawn_client_pump(
    mut incoming: mpsc::UnboundedReceiver<String>,
    client: Arc<ClientSession>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        client.on_connection_state_change(ConnectionState::Connected);

        while let Some(text) = incoming.recv().await {
            if let Err(err) = client.handle_text(&text) {
                warn!(%err, "message from host dropped");
            }
        }

        client.on_connection_state_change(ConnectionState::Disconnected);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seat::Seat;

    #[tokio::test]
    async fn test_pair_carries_json_both_ways() {
        let (mut left, mut right) = channel_pair();
        let seat = Seat::new(1).unwrap();

        left.channel.send(&WireMessage::draw(seat)).unwrap();
        right.channel.send(&WireMessage::start_game()).unwrap();

        let text = right.incoming.recv().await.unwrap();
        assert_eq!(WireMessage::decode(&text).unwrap(), WireMessage::draw(seat));

        let text = left.incoming.recv().await.unwrap();
        assert!(text.contains("\"START_GAME\""));
    }

    #[tokio::test]
    async fn test_disconnect_and_close() {
        let (left, right) = channel_pair();

        left.channel.disconnect();
        assert_eq!(
            left.channel.send(&WireMessage::start_game()),
            Err(ChannelError::NotConnected)
        );

        drop(left.incoming);
        assert_eq!(
            right.channel.send(&WireMessage::start_game()),
            Err(ChannelError::Closed)
        );
    }
}
