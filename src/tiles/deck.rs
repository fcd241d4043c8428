//! Deck construction, dealing, and the draw pool.
//!
//! The standard deck is 106 tiles: two copies of every number 1-13 in each of
//! the four suit colors, plus two Jokers. Ids are assigned in construction
//! order and stay stable for the whole session.

use serde::{Deserialize, Serialize};

use super::tile::{Tile, TileColor, TileId, MAX_NUMBER};
use crate::core::rng::GameRng;
use crate::core::seat::{Seat, SeatMap, SEAT_COUNT};

/// Total tiles in a standard deck.
pub const DECK_SIZE: usize = 106;

/// Tiles dealt to each seat.
pub const HAND_SIZE: usize = 14;

/// Copies of each numbered tile.
const COPIES: usize = 2;

/// Jokers in the deck.
const JOKERS: usize = 2;

/// Build the unshuffled 106-tile deck.
///
/// ```
/// use tile_rummy::tiles::{standard_deck, DECK_SIZE};
///
/// let deck = standard_deck();
/// assert_eq!(deck.len(), DECK_SIZE);
/// assert_eq!(deck.iter().filter(|t| t.is_joker).count(), 2);
/// ```
#[must_use]
pub fn standard_deck() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(DECK_SIZE);
    let mut next_id = 0u16;

    for _ in 0..COPIES {
        for color in TileColor::SUITS {
            for number in 1..=MAX_NUMBER {
                tiles.push(Tile::numbered(TileId::new(next_id), color, number));
                next_id += 1;
            }
        }
    }

    for _ in 0..JOKERS {
        tiles.push(Tile::joker(TileId::new(next_id)));
        next_id += 1;
    }

    tiles
}

/// Undealt tiles. Draws take from the tail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    tiles: Vec<Tile>,
}

impl Pool {
    /// Create a pool from the given tiles.
    #[must_use]
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// Remove the tile at the tail, O(1).
    pub fn draw(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }

    /// Number of tiles left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the pool is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// The result of dealing a deck: one hand per seat plus the pool.
#[derive(Clone, Debug)]
pub struct Deal {
    pub hands: SeatMap<Vec<Tile>>,
    pub pool: Pool,
}

impl Deal {
    /// Deal an already-ordered deck.
    ///
    /// The first `14 * 4` tiles are split into consecutive hands for seats
    /// 0..3; everything after becomes the pool.
    #[must_use]
    pub fn from_deck(mut deck: Vec<Tile>) -> Self {
        assert!(
            deck.len() >= HAND_SIZE * SEAT_COUNT,
            "Deck too small to deal {} hands",
            SEAT_COUNT
        );

        let pool = deck.split_off(HAND_SIZE * SEAT_COUNT);
        let hands = SeatMap::new(|seat: Seat| {
            let start = seat.index() * HAND_SIZE;
            deck[start..start + HAND_SIZE].to_vec()
        });

        Self {
            hands,
            pool: Pool::new(pool),
        }
    }

    /// Shuffle a fresh standard deck and deal it.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut deck = standard_deck();
        rng.shuffle(&mut deck);
        Self::from_deck(deck)
    }

    /// Total tiles across hands and pool.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.hands.values().map(Vec::len).sum::<usize>() + self.pool.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_deck_composition() {
        let deck = standard_deck();
        assert_eq!(deck.len(), DECK_SIZE);

        let ids: FxHashSet<_> = deck.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), DECK_SIZE, "tile ids must be unique");

        for color in TileColor::SUITS {
            for number in 1..=MAX_NUMBER {
                let copies = deck
                    .iter()
                    .filter(|t| t.color == color && t.number == number)
                    .count();
                assert_eq!(copies, 2, "{} {}", color, number);
            }
        }

        assert!(deck.iter().all(Tile::is_well_formed));
    }

    #[test]
    fn test_deal_sizes() {
        let deal = Deal::shuffled(&mut GameRng::new(7));

        for (_, hand) in deal.hands.iter() {
            assert_eq!(hand.len(), HAND_SIZE);
        }
        assert_eq!(deal.pool.len(), DECK_SIZE - HAND_SIZE * SEAT_COUNT);
        assert_eq!(deal.tile_count(), DECK_SIZE);
    }

    #[test]
    fn test_deal_is_reproducible() {
        let a = Deal::shuffled(&mut GameRng::new(99));
        let b = Deal::shuffled(&mut GameRng::new(99));

        assert_eq!(a.hands, b.hands);
        assert_eq!(a.pool, b.pool);
    }

    #[test]
    fn test_from_deck_takes_prefix() {
        let deck = standard_deck();
        let deal = Deal::from_deck(deck.clone());

        assert_eq!(deal.hands[Seat::HOST], deck[..HAND_SIZE].to_vec());
        let last = Seat::new(3).unwrap();
        assert_eq!(deal.hands[last], deck[3 * HAND_SIZE..4 * HAND_SIZE].to_vec());
    }

    #[test]
    fn test_pool_draws_from_tail() {
        let deck = standard_deck();
        let mut deal = Deal::from_deck(deck.clone());

        assert_eq!(deal.pool.draw(), deck.last().copied());
        assert_eq!(deal.pool.len(), DECK_SIZE - HAND_SIZE * SEAT_COUNT - 1);
    }

    #[test]
    #[should_panic(expected = "Deck too small")]
    fn test_from_deck_too_small() {
        let _ = Deal::from_deck(standard_deck()[..10].to_vec());
    }
}
