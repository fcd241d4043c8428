//! Error types surfaced by the engine and the replication layer.
//!
//! Illegal moves never escape the host as faults: the engine reports them as
//! `MoveError`, the worker logs and drops them for remote seats, and only a
//! local caller ever sees one.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::core::seat::Seat;
use crate::net::protocol::MessageType;
use crate::tiles::TileId;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Why a transition was rejected. State is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game has not started")]
    NotStarted,

    #[error("the game is over, {winner} won")]
    Finished { winner: Seat },

    #[error("{seat} cannot act, it is {current}'s turn")]
    NotYourTurn { seat: Seat, current: Seat },

    #[error("the pool is empty")]
    PoolEmpty,

    #[error("tiles do not form a valid run or group")]
    InvalidSet,

    #[error("initial meld must score at least 30, got {score}")]
    BelowInitialMeld { score: u32 },

    #[error("initial meld required before extending board sets")]
    MeldRequired,

    #[error("no board set at index {index}")]
    UnknownTarget { index: usize },

    #[error("tile {tile} is not in the acting hand")]
    TileNotInHand { tile: TileId },

    #[error("tile {tile} submitted more than once")]
    DuplicateTile { tile: TileId },

    #[error("no tiles submitted")]
    EmptyCommit,
}

/// A wire message that cannot be turned into an intent.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid message json")]
    Json(#[from] serde_json::Error),

    #[error("{kind} requires a payload")]
    MissingPayload { kind: MessageType },

    #[error("{kind} carries no payload")]
    UnexpectedPayload { kind: MessageType },

    #[error("{kind} is not accepted in this direction")]
    UnexpectedMessage { kind: MessageType },

    #[error("message claims seat {declared} but peer holds {assigned}")]
    SeatMismatch { declared: u8, assigned: Seat },

    #[error("tile {0} is malformed")]
    MalformedTile(TileId),

    #[error("move payload does not describe a single set commit: {0}")]
    UndecodableMove(&'static str),
}

/// Failure reported by a peer channel implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("peer channel closed")]
    Closed,

    #[error("peer channel not connected")]
    NotConnected,

    #[error("message could not be encoded: {0}")]
    Encode(String),
}

/// Errors returned by session handles.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("host worker command channel closed")]
    CommandChannelClosed,

    #[error("host worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("host worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("all client seats are taken")]
    RosterFull,

    #[error("no view received from the host yet")]
    NoView,

    #[error(transparent)]
    IllegalMove(#[from] MoveError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
