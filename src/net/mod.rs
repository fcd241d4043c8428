//! Host-authoritative replication.
//!
//! ## Architecture
//!
//! - `protocol`: JSON wire messages and move-payload decoding
//! - `view`: per-seat projection of the canonical state
//! - `channel`: the `PeerChannel` transport seam
//! - `host`: the worker task owning the canonical state
//! - `handle`: `HostHandle` and `PeerInbox`, the queue façades
//! - `client`: a remote seat that mirrors pushed views
//! - `memory`: an in-process transport
//!
//! The host is the only writer. Clients send intents and wait for the next
//! full view; nothing is acknowledged or retried.

pub mod channel;
pub mod client;
pub mod handle;
pub mod host;
pub mod memory;
pub mod protocol;
pub mod view;

pub use channel::{ConnectionState, PeerChannel, PeerId};
pub use client::ClientSession;
pub use handle::{HostHandle, PeerInbox};
pub use host::Host;
pub use memory::{channel_pair, spawn_client_pump, spawn_host_pump, MemoryChannel, MemoryEndpoint};
pub use protocol::{ClientBound, HostBound, MessageType, MovePayload, WireMessage};
pub use view::{project, status_line, GameView, ViewPhase};
