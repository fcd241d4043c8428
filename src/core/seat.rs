//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! One of the four table positions. Seat 0 is always the host (and dealer).
//!
//! ## SeatMap
//!
//! Fixed-size per-seat storage with O(1) access, indexable by `Seat`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats at the table.
pub const SEAT_COUNT: usize = 4;

/// Seat identifier, `0..4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seat(u8);

impl Seat {
    /// The host seat.
    pub const HOST: Seat = Seat(0);

    /// Create a seat from a raw index.
    ///
    /// Returns `None` when the index is outside the table.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < SEAT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that acts after this one (0→1→2→3→0).
    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % SEAT_COUNT as u8)
    }

    /// Whether this is the host seat.
    #[must_use]
    pub const fn is_host(self) -> bool {
        self.0 == 0
    }

    /// Iterate over all seats in turn order.
    ///
    /// ```
    /// use tile_rummy::core::Seat;
    ///
    /// let seats: Vec<_> = Seat::all().collect();
    /// assert_eq!(seats.len(), 4);
    /// assert_eq!(seats[0], Seat::HOST);
    /// ```
    pub fn all() -> impl Iterator<Item = Seat> {
        (0..SEAT_COUNT as u8).map(Seat)
    }

    /// Iterate over the client seats (1, 2, 3).
    pub fn clients() -> impl Iterator<Item = Seat> {
        (1..SEAT_COUNT as u8).map(Seat)
    }
}

impl TryFrom<u8> for Seat {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Seat::new(index).ok_or_else(|| format!("seat index {} out of range", index))
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> u8 {
        seat.0
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use tile_rummy::core::{Seat, SeatMap};
///
/// let mut melded: SeatMap<bool> = SeatMap::with_value(false);
/// let seat = Seat::new(2).unwrap();
/// melded[seat] = true;
/// assert!(melded[seat]);
/// assert!(!melded[Seat::HOST]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap<T> {
    data: [T; SEAT_COUNT],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(mut factory: impl FnMut(Seat) -> T) -> Self {
        Self {
            data: [
                factory(Seat(0)),
                factory(Seat(1)),
                factory(Seat(2)),
                factory(Seat(3)),
            ],
        }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over the values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Map every entry to a new SeatMap.
    pub fn map<U>(&self, mut f: impl FnMut(Seat, &T) -> U) -> SeatMap<U> {
        SeatMap::new(|seat| f(seat, &self.data[seat.index()]))
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        &self.data[seat.index()]
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        &mut self.data[seat.index()]
    }
}
