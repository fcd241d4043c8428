//! Session configuration.
//!
//! The core consumes only a handful of settings: which role this process
//! plays, which seats are driven by humans, and the delays used by the host
//! worker. Everything has a default so a single-player session needs no setup.

use serde::{Deserialize, Serialize};

use super::seat::{Seat, SeatMap};

/// Which part this process plays in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Authoritative seat 0 serving remote clients.
    Host,
    /// Remote seat mirroring the host's pushed views.
    Client,
    /// Local game against automated opponents.
    Single,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Host => "host",
            Role::Client => "client",
            Role::Single => "single",
        };
        write!(f, "{}", label)
    }
}

/// Configuration for one session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Role of this process.
    pub role: Role,

    /// Seats driven by a human. Seat 0 is always human; client seats become
    /// human when a peer is attached to them.
    pub human_seats: SeatMap<bool>,

    /// Deal seed. `None` seeds from the operating system.
    pub seed: Option<u64>,

    /// Delay before an automated seat acts, in milliseconds.
    pub think_delay_ms: u64,

    /// Delay after a roster change before re-broadcasting, in milliseconds.
    pub settle_delay_ms: u64,

    /// Capacity of the host worker's command queue.
    pub command_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            role: Role::Single,
            human_seats: SeatMap::new(|seat| seat.is_host()),
            seed: None,
            think_delay_ms: 800,
            settle_delay_ms: 500,
            command_buffer_size: 32,
        }
    }
}

impl SessionConfig {
    /// One human at seat 0 against three automated seats.
    #[must_use]
    pub fn single_player() -> Self {
        Self::default()
    }

    /// Host of a multiplayer session. Client seats start automated and turn
    /// human as peers join.
    #[must_use]
    pub fn host() -> Self {
        Self {
            role: Role::Host,
            ..Self::default()
        }
    }

    /// Use a fixed deal seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Mark a seat as human-controlled.
    #[must_use]
    pub fn with_human(mut self, seat: Seat) -> Self {
        self.human_seats[seat] = true;
        self
    }

    /// Set the automated-turn think delay.
    #[must_use]
    pub fn with_think_delay_ms(mut self, ms: u64) -> Self {
        self.think_delay_ms = ms;
        self
    }

    /// Set the roster settle delay.
    #[must_use]
    pub fn with_settle_delay_ms(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn think_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.think_delay_ms)
    }

    #[must_use]
    pub fn settle_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.settle_delay_ms)
    }
}
