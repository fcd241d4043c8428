//! Rules: set legality, scoring, orderings, and the state machine.
//!
//! - `validator`: run/group legality, Joker-substituted scoring, `Meld`
//! - `sort`: deterministic tile orderings
//! - `engine`: the transition function over `GameState`
//!
//! Nothing here performs I/O or waits; the host worker calls into `engine`
//! from its single command loop.

pub mod engine;
pub mod sort;
pub mod validator;

pub use engine::{apply, start_game, Transition};
pub use sort::{sort_by_color, sort_set, sorted_set};
pub use validator::{
    classify, is_valid_set, meets_initial_meld, score, Meld, SetKind, INITIAL_MELD_THRESHOLD,
    MAX_GROUP_SIZE, MAX_SET_SIZE, MIN_SET_SIZE,
};
