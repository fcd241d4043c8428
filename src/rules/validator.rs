//! Set legality and scoring.
//!
//! A candidate of 3-13 tiles is legal when it is either
//!
//! - a **run**: one color, distinct consecutive numbers, Jokers filling gaps,
//!   never wrapping past 13, or
//! - a **group**: one number, 3-4 tiles, pairwise distinct colors, Jokers
//!   standing in for missing colors.
//!
//! Scoring substitutes each Joker with the value it stands for. In a run,
//! Jokers first fill interior gaps, then extend upward toward 13, then downward.
//! When a candidate reads as both a run and a group the run reading is used.
//!
//! ```
//! use tile_rummy::rules::{classify, score, SetKind};
//! use tile_rummy::tiles::{Tile, TileColor, TileId};
//!
//! let run = [
//!     Tile::numbered(TileId::new(0), TileColor::Red, 9),
//!     Tile::joker(TileId::new(1)),
//!     Tile::numbered(TileId::new(2), TileColor::Red, 11),
//! ];
//! assert_eq!(classify(&run), Some(SetKind::Run));
//! assert_eq!(score(&run), 30);
//! ```

use rustc_hash::FxHashSet;

use super::sort::sort_set;
use crate::tiles::{Tile, MAX_NUMBER};

/// Smallest legal set.
pub const MIN_SET_SIZE: usize = 3;

/// Longest legal run.
pub const MAX_SET_SIZE: usize = MAX_NUMBER as usize;

/// Largest legal group (one tile per suit color).
pub const MAX_GROUP_SIZE: usize = 4;

/// Minimum score of a seat's first meld.
pub const INITIAL_MELD_THRESHOLD: u32 = 30;

/// Shape of a legal set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetKind {
    Run,
    Group,
}

/// Classify a candidate, or `None` when it is illegal.
///
/// Tiles that fail [`Tile::is_well_formed`] never form a set.
#[must_use]
pub fn classify(tiles: &[Tile]) -> Option<SetKind> {
    if !(MIN_SET_SIZE..=MAX_SET_SIZE).contains(&tiles.len()) {
        return None;
    }

    if run_bounds(tiles).is_some() {
        Some(SetKind::Run)
    } else if group_number(tiles).is_some() {
        Some(SetKind::Group)
    } else {
        None
    }
}

/// Whether the candidate is a legal run or group.
#[must_use]
pub fn is_valid_set(tiles: &[Tile]) -> bool {
    classify(tiles).is_some()
}

/// Point value with Jokers counted at the value they substitute.
///
/// Order-independent. Candidates with no consistent reading, malformed tiles
/// included, count their Jokers as 0.
#[must_use]
pub fn score(tiles: &[Tile]) -> u32 {
    if tiles.len() <= MAX_SET_SIZE {
        if let Some((low, high)) = run_bounds(tiles) {
            return (u32::from(low)..=u32::from(high)).sum();
        }
    }

    if let Some(number) = group_number(tiles) {
        return u32::from(number) * tiles.len() as u32;
    }

    tiles.iter().map(|t| u32::from(t.number)).sum()
}

/// Whether the candidate is legal and scores enough for an initial meld.
#[must_use]
pub fn meets_initial_meld(tiles: &[Tile]) -> bool {
    is_valid_set(tiles) && score(tiles) >= INITIAL_MELD_THRESHOLD
}

/// The numbers covered by a run reading, `(low, high)` inclusive.
///
/// Requires at least one non-Joker, a single color, and distinct numbers.
/// Gaps must be fillable by the available Jokers; leftover Jokers extend the
/// run upward first and then downward.
fn run_bounds(tiles: &[Tile]) -> Option<(u8, u8)> {
    if !tiles.iter().all(Tile::is_well_formed) {
        return None;
    }

    let mut numbers = Vec::with_capacity(tiles.len());
    let mut color = None;

    for tile in tiles.iter().filter(|t| !t.is_joker) {
        match color {
            None => color = Some(tile.color),
            Some(c) if c != tile.color => return None,
            Some(_) => {}
        }
        numbers.push(tile.number);
    }

    if numbers.is_empty() {
        return None;
    }

    numbers.sort_unstable();
    if numbers.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }

    let low = numbers[0];
    let high = numbers[numbers.len() - 1];
    let span = usize::from(high - low) + 1;
    if span > tiles.len() {
        return None;
    }

    let extra = tiles.len() - span;
    let up = extra.min(usize::from(MAX_NUMBER - high));
    let down = extra - up;
    if down > usize::from(low - 1) {
        return None;
    }

    Some((low - down as u8, high + up as u8))
}

/// The shared number of a group reading.
fn group_number(tiles: &[Tile]) -> Option<u8> {
    if !(MIN_SET_SIZE..=MAX_GROUP_SIZE).contains(&tiles.len())
        || !tiles.iter().all(Tile::is_well_formed)
    {
        return None;
    }

    let mut number = None;
    let mut colors = FxHashSet::default();

    for tile in tiles.iter().filter(|t| !t.is_joker) {
        match number {
            None => number = Some(tile.number),
            Some(n) if n != tile.number => return None,
            Some(_) => {}
        }
        if !colors.insert(tile.color) {
            return None;
        }
    }

    number
}

/// A validated, sorted set committed to the board.
///
/// Only constructible from tiles that pass [`classify`], so every board set
/// stays independently valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Meld {
    tiles: Vec<Tile>,
    kind: SetKind,
}

impl Meld {
    /// Validate and sort a candidate.
    #[must_use]
    pub fn new(mut tiles: Vec<Tile>) -> Option<Self> {
        let kind = classify(&tiles)?;
        sort_set(&mut tiles);
        Some(Self { tiles, kind })
    }

    /// The union of this set and `extra`, re-validated as a whole.
    #[must_use]
    pub fn extended(&self, extra: &[Tile]) -> Option<Self> {
        let mut tiles = self.tiles.clone();
        tiles.extend_from_slice(extra);
        Self::new(tiles)
    }

    /// Tiles in board order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn kind(&self) -> SetKind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        score(&self.tiles)
    }
}
