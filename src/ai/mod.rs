//! Automated players.
//!
//! ## Architecture
//!
//! - `candidates`: structural enumeration of legal sets in a hand and of
//!   board extensions
//! - `policy`: the `MovePolicy` trait and the default `GreedyPolicy`
//!
//! A policy only proposes; the host turns the `Decision` into an `Intent` and
//! runs it through the same engine chokepoint as human moves.

pub mod candidates;
pub mod policy;

pub use candidates::{extension_for, legal_candidates};
pub use policy::{Decision, GreedyPolicy, MovePolicy};
