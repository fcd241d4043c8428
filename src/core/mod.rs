//! Core types: seats, intents, canonical state, RNG, configuration.
//!
//! Everything here is plain data. Transitions live in `rules::engine`; the
//! host worker in `net` is the only caller that mutates a live `GameState`.

pub mod action;
pub mod config;
pub mod rng;
pub mod seat;
pub mod state;

pub use action::{Intent, IntentRecord};
pub use config::{Role, SessionConfig};
pub use rng::GameRng;
pub use seat::{Seat, SeatMap, SEAT_COUNT};
pub use state::{GameState, Phase};
