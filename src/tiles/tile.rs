//! Tile identity.
//!
//! A `Tile` is an immutable value: a stable id plus its face (number and color).
//! Jokers carry `number == 0` and `TileColor::Joker`.
//!
//! ```
//! use tile_rummy::tiles::{Tile, TileColor, TileId};
//!
//! let five = Tile::numbered(TileId::new(4), TileColor::Red, 5);
//! assert!(!five.is_joker);
//! assert_eq!(five.number, 5);
//!
//! let joker = Tile::joker(TileId::new(104));
//! assert!(joker.is_joker);
//! assert_eq!(joker.color, TileColor::Joker);
//! ```

use serde::{Deserialize, Serialize};

/// Highest face number on a tile.
pub const MAX_NUMBER: u8 = 13;

/// Stable tile identifier, unique within one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u16);

impl TileId {
    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tile color. Declaration order is the color sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileColor {
    Red,
    Blue,
    Orange,
    Black,
    Joker,
}

impl TileColor {
    /// The four suit colors, in sort order.
    pub const SUITS: [TileColor; 4] = [
        TileColor::Red,
        TileColor::Blue,
        TileColor::Orange,
        TileColor::Black,
    ];
}

impl std::fmt::Display for TileColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TileColor::Red => "Red",
            TileColor::Blue => "Blue",
            TileColor::Orange => "Orange",
            TileColor::Black => "Black",
            TileColor::Joker => "Joker",
        };
        write!(f, "{}", label)
    }
}

/// A single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    /// Stable identity; two physical copies of "Red 5" have different ids.
    pub id: TileId,

    /// Face number in `1..=13`, `0` for Jokers.
    pub number: u8,

    /// Face color.
    pub color: TileColor,

    /// Whether this tile is a Joker.
    pub is_joker: bool,
}

impl Tile {
    /// Create a numbered tile.
    #[must_use]
    pub fn numbered(id: TileId, color: TileColor, number: u8) -> Self {
        debug_assert!(color != TileColor::Joker, "numbered tile cannot be a joker");
        debug_assert!((1..=MAX_NUMBER).contains(&number), "tile number out of range");
        Self {
            id,
            number,
            color,
            is_joker: false,
        }
    }

    /// Create a Joker.
    #[must_use]
    pub const fn joker(id: TileId) -> Self {
        Self {
            id,
            number: 0,
            color: TileColor::Joker,
            is_joker: true,
        }
    }

    /// Structural check used when tiles arrive from the wire.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        if self.is_joker {
            self.color == TileColor::Joker
        } else {
            self.color != TileColor::Joker && (1..=MAX_NUMBER).contains(&self.number)
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_joker {
            write!(f, "Joker")
        } else {
            write!(f, "{}-{}", self.color, self.number)
        }
    }
}
