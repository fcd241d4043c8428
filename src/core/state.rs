//! Canonical game state, held only by the host.
//!
//! ## Phase
//!
//! Turn progression is one tagged union: `NotStarted`, `InProgress { current }`
//! or `Finished { winner }`. The current seat and the winner are derived from
//! it, so there is no way to hold a winner while a turn is still running.
//!
//! ## GameState
//!
//! - Board of validated melds
//! - One hand per seat
//! - Pool of undealt tiles
//! - Initial-meld flags, human-seat flags, role metadata
//! - Revision counter bumped by every committed transition
//!
//! Board and hands use `im` persistent vectors so per-seat projections clone
//! in O(1).

use im::Vector;

use super::config::Role;
use super::seat::{Seat, SeatMap};
use crate::rules::Meld;
use crate::tiles::{Deal, Pool, Tile, TileId};

/// Where the game is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    NotStarted,
    InProgress { current: Seat },
    Finished { winner: Seat },
}

/// Full canonical state.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) phase: Phase,
    pub(crate) board: Vector<Meld>,
    pub(crate) hands: SeatMap<Vector<Tile>>,
    pub(crate) pool: Pool,
    pub(crate) has_meld: SeatMap<bool>,
    human: SeatMap<bool>,
    role: Role,
    revision: u64,
    deals: u32,
}

impl GameState {
    /// Create an undealt state.
    #[must_use]
    pub fn new(role: Role, human: SeatMap<bool>) -> Self {
        Self {
            phase: Phase::NotStarted,
            board: Vector::new(),
            hands: SeatMap::with_default(),
            pool: Pool::default(),
            has_meld: SeatMap::with_value(false),
            human,
            role,
            revision: 0,
            deals: 0,
        }
    }

    /// Create a state already dealt from `deal`, seat 0 to act.
    #[must_use]
    pub fn dealt(role: Role, human: SeatMap<bool>, deal: Deal) -> Self {
        let mut state = Self::new(role, human);
        state.begin_deal(deal);
        state
    }

    /// Replace everything dealt with a fresh deal.
    ///
    /// Resets board, hands, pool, melds and the phase; keeps role and human
    /// seats.
    pub(crate) fn begin_deal(&mut self, deal: Deal) {
        self.board = Vector::new();
        self.hands = deal.hands.map(|_, hand| hand.iter().copied().collect());
        self.pool = deal.pool;
        self.has_meld = SeatMap::with_value(false);
        self.phase = Phase::InProgress {
            current: Seat::HOST,
        };
        self.deals += 1;
        self.bump_revision();
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }

    // === Phase ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The seat to act. The winner once finished, `None` before the deal.
    #[must_use]
    pub fn current_seat(&self) -> Option<Seat> {
        match self.phase {
            Phase::NotStarted => None,
            Phase::InProgress { current } => Some(current),
            Phase::Finished { winner } => Some(winner),
        }
    }

    #[must_use]
    pub fn winner(&self) -> Option<Seat> {
        match self.phase {
            Phase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, Phase::InProgress { .. })
    }

    // === Tiles ===

    #[must_use]
    pub fn board(&self) -> &Vector<Meld> {
        &self.board
    }

    #[must_use]
    pub fn hand(&self, seat: Seat) -> &Vector<Tile> {
        &self.hands[seat]
    }

    /// Whether `seat` holds the tile with `id`.
    #[must_use]
    pub fn holds(&self, seat: Seat, id: TileId) -> bool {
        self.hands[seat].iter().any(|t| t.id == id)
    }

    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Tiles on the board, in all hands, and in the pool.
    ///
    /// Always 106 within a deal.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let board: usize = self.board.iter().map(Meld::len).sum();
        let hands: usize = self.hands.values().map(Vector::len).sum();
        board + hands + self.pool.len()
    }

    // === Seats ===

    #[must_use]
    pub fn has_meld(&self, seat: Seat) -> bool {
        self.has_meld[seat]
    }

    #[must_use]
    pub fn meld_flags(&self) -> &SeatMap<bool> {
        &self.has_meld
    }

    #[must_use]
    pub fn is_human(&self, seat: Seat) -> bool {
        self.human[seat]
    }

    #[must_use]
    pub fn human_seats(&self) -> &SeatMap<bool> {
        &self.human
    }

    pub fn set_human(&mut self, seat: Seat, human: bool) {
        self.human[seat] = human;
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Counter bumped by every committed transition.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of deals so far in this session.
    #[must_use]
    pub fn deals(&self) -> u32 {
        self.deals
    }
}
