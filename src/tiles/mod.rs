//! Tile model: identity, the standard deck, dealing, and the pool.
//!
//! ## Key Types
//!
//! - `TileId`: Stable per-session tile identifier
//! - `TileColor`: Red, Blue, Orange, Black, or Joker
//! - `Tile`: Immutable tile value
//! - `Pool`: Undealt tiles, drawn from the tail
//! - `Deal`: Four 14-tile hands plus the pool

pub mod deck;
pub mod tile;

pub use deck::{standard_deck, Deal, Pool, DECK_SIZE, HAND_SIZE};
pub use tile::{Tile, TileColor, TileId, MAX_NUMBER};
