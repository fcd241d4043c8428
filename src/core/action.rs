//! Move intents.
//!
//! An intent is what a seat asks the host to do. Tiles are referenced by id;
//! the engine resolves them against the acting hand, so a client can never
//! smuggle a tile face it does not hold.
//!
//! ```
//! use tile_rummy::core::{Intent, IntentRecord, Seat};
//! use tile_rummy::tiles::TileId;
//!
//! let commit = Intent::commit_new(vec![TileId::new(1), TileId::new(2), TileId::new(3)]);
//! let record = IntentRecord::new(Seat::HOST, commit, 0);
//! assert!(record.intent.is_commit());
//! ```

use crate::core::seat::Seat;
use crate::tiles::TileId;

/// A requested transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Take one tile from the pool and pass the turn.
    Draw,

    /// Commit tiles from hand as a new board set (`target == None`) or as an
    /// extension of the board set at `target`.
    CommitSet {
        tiles: Vec<TileId>,
        target: Option<usize>,
    },

    /// Pass the turn without drawing.
    EndTurn,
}

impl Intent {
    /// A new-set commit.
    #[must_use]
    pub fn commit_new(tiles: Vec<TileId>) -> Self {
        Intent::CommitSet {
            tiles,
            target: None,
        }
    }

    /// An extension of the board set at `target`.
    #[must_use]
    pub fn extend(target: usize, tiles: Vec<TileId>) -> Self {
        Intent::CommitSet {
            tiles,
            target: Some(target),
        }
    }

    #[must_use]
    pub fn is_commit(&self) -> bool {
        matches!(self, Intent::CommitSet { .. })
    }
}

/// An applied intent with metadata for the host's history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentRecord {
    /// The seat that acted.
    pub seat: Seat,

    /// What it did.
    pub intent: Intent,

    /// State revision the intent produced.
    pub revision: u64,
}

impl IntentRecord {
    #[must_use]
    pub fn new(seat: Seat, intent: Intent, revision: u64) -> Self {
        Self {
            seat,
            intent,
            revision,
        }
    }
}
