//! Per-seat projection of the canonical state.
//!
//! A `GameView` is what one seat is shown. The host builds one per recipient
//! after every committed change and pushes it as a whole; clients never patch
//! a view, they replace it.

use serde::{Deserialize, Serialize};

use crate::core::config::Role;
use crate::core::seat::{Seat, SeatMap};
use crate::core::state::{GameState, Phase};
use crate::rules::{sort_by_color, INITIAL_MELD_THRESHOLD};
use crate::tiles::Tile;

/// Lifecycle marker carried on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewPhase {
    NotStarted,
    InProgress,
    Finished,
}

impl From<Phase> for ViewPhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::NotStarted => ViewPhase::NotStarted,
            Phase::InProgress { .. } => ViewPhase::InProgress,
            Phase::Finished { .. } => ViewPhase::Finished,
        }
    }
}

/// The state as seen from one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub board: Vec<Vec<Tile>>,
    pub player_hand: Vec<Tile>,
    /// Every other seat's hand, in `other_seats` order.
    pub other_hands: Vec<Vec<Tile>>,
    pub other_seats: Vec<Seat>,
    pub pool_count: usize,
    pub current_player: Option<Seat>,
    pub has_meld: SeatMap<bool>,
    pub human_seats: SeatMap<bool>,
    pub winner: Option<Seat>,
    pub my_player_index: Seat,
    pub role: Role,
    pub phase: ViewPhase,
    pub status: String,
    pub revision: u64,
}

impl GameView {
    /// Whether the viewer may act now.
    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.phase == ViewPhase::InProgress && self.current_player == Some(self.my_player_index)
    }

    /// The viewer's hand grouped by suit, Jokers last.
    #[must_use]
    pub fn hand_by_color(&self) -> Vec<Tile> {
        let mut hand = self.player_hand.clone();
        sort_by_color(&mut hand);
        hand
    }

    #[must_use]
    pub fn hand_of(&self, seat: Seat) -> Option<&[Tile]> {
        if seat == self.my_player_index {
            return Some(&self.player_hand);
        }
        self.other_seats
            .iter()
            .position(|&s| s == seat)
            .map(|i| self.other_hands[i].as_slice())
    }
}

/// Build `viewer`'s view of `state`.
///
/// Other hands run in ascending seat order without the viewer, so a client
/// sees the host's hand first.
#[must_use]
pub fn project(state: &GameState, viewer: Seat) -> GameView {
    let other_seats: Vec<Seat> = Seat::all().filter(|&s| s != viewer).collect();

    GameView {
        board: state.board().iter().map(|m| m.tiles().to_vec()).collect(),
        player_hand: state.hand(viewer).iter().copied().collect(),
        other_hands: other_seats
            .iter()
            .map(|&s| state.hand(s).iter().copied().collect())
            .collect(),
        other_seats,
        pool_count: state.pool().len(),
        current_player: state.current_seat(),
        has_meld: state.meld_flags().clone(),
        human_seats: state.human_seats().clone(),
        winner: state.winner(),
        my_player_index: viewer,
        role: if viewer.is_host() {
            state.role()
        } else {
            Role::Client
        },
        phase: state.phase().into(),
        status: status_line(state, viewer),
        revision: state.revision(),
    }
}

/// Status text relative to `viewer`.
#[must_use]
pub fn status_line(state: &GameState, viewer: Seat) -> String {
    match state.phase() {
        Phase::NotStarted if viewer.is_host() => "Press start to deal".to_string(),
        Phase::NotStarted => "Waiting for the host to start".to_string(),
        Phase::Finished { winner } if winner == viewer => "You win!".to_string(),
        Phase::Finished { winner } => format!("{} wins!", winner),
        Phase::InProgress { current } if current == viewer => {
            if state.has_meld(viewer) {
                "Your turn".to_string()
            } else {
                format!("Your turn (initial meld needs {} points)", INITIAL_MELD_THRESHOLD)
            }
        }
        Phase::InProgress { current } => format!("{}'s turn", current),
    }
}
