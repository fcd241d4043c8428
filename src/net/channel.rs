//! Transport seam between the host and one remote seat.
//!
//! The session layer does not care how bytes move. A transport implements
//! `PeerChannel` for the outbound half and reports inbound traffic and
//! connection changes through the `PeerInbox` it receives when attaching.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

use super::protocol::WireMessage;

/// Connection lifecycle reported by a transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
    Failed,
}

impl ConnectionState {
    /// Whether messages can still be delivered.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// Host-assigned identity of an attached peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u32);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Outbound half of a message channel to one peer.
///
/// Delivery may be unordered and lossy depending on the transport. Receivers
/// drop stale input, so neither ordering nor retransmission is assumed.
/// `send` must not block; implementations queue and return.
pub trait PeerChannel: Send + Sync {
    /// Queue `message` for delivery.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError` when the channel can no longer deliver.
    fn send(&self, message: &WireMessage) -> Result<(), ChannelError>;
}
