//! # tile-rummy
//!
//! A four-seat tile rummy engine with a host-authoritative replicated state
//! machine.
//!
//! ## Design Principles
//!
//! 1. **One Writer**: Only the host mutates game state. Every change goes
//!    through `rules::apply`, driven from a single worker task.
//!
//! 2. **Full Views**: After each committed change the host pushes one full
//!    projected view per seat. Clients replace, never patch.
//!
//! 3. **Rules Are Pure**: Validation, scoring and the automated player are
//!    plain functions over tiles, testable without a runtime.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: board and hands are `im` vectors, so
//!   state snapshots and per-seat projections clone cheaply.
//!
//! - **Deterministic Deals**: a seeded ChaCha stream per deal makes any game
//!   reproducible from its seed.
//!
//! ## Modules
//!
//! - `tiles`: Tile identity, the 106-tile deck, dealing, the pool
//! - `core`: Seats, intents, canonical state, RNG, configuration
//! - `rules`: Set validation, scoring, sorting, the state machine
//! - `ai`: Candidate enumeration and the greedy automated player
//! - `net`: Wire protocol, projection, host worker, client, transports
//! - `error`: Error types

pub mod ai;
pub mod core;
pub mod error;
pub mod net;
pub mod rules;
pub mod tiles;

// Re-export commonly used types
pub use crate::core::{
    GameRng, GameState, Intent, IntentRecord, Phase, Role, Seat, SeatMap, SessionConfig,
    SEAT_COUNT,
};

pub use crate::tiles::{standard_deck, Deal, Pool, Tile, TileColor, TileId, DECK_SIZE, HAND_SIZE};

pub use crate::rules::{
    apply, classify, is_valid_set, meets_initial_meld, score, start_game, Meld, SetKind,
    Transition, INITIAL_MELD_THRESHOLD,
};

pub use crate::ai::{Decision, GreedyPolicy, MovePolicy};

pub use crate::net::{
    channel_pair, project, ClientSession, ConnectionState, GameView, Host, HostHandle,
    MessageType, PeerChannel, PeerInbox, WireMessage,
};

pub use crate::error::{ChannelError, MoveError, ProtocolError, Result, SessionError};
