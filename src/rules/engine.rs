//! Game state machine.
//!
//! `apply` is the single chokepoint for every intent: it matches the phase
//! first, then the acting seat, then the intent, and either commits the whole
//! transition or returns a `MoveError` with the state untouched.
//!
//! ## Rules
//!
//! - `Draw`: pool non-empty; one tile moves pool→hand and the turn advances.
//! - `CommitSet` (new set): tiles must form a legal set; an unmelded seat
//!   must score at least 30 and becomes melded.
//! - `CommitSet` (extend): the seat must already be melded and the union with
//!   the target set must be legal. The target is replaced, sorted.
//! - A commit never advances the turn. Emptying the hand finishes the game
//!   with the acting seat as winner.
//! - `EndTurn`: advances the turn.

use rustc_hash::FxHashSet;

use crate::core::action::Intent;
use crate::core::seat::Seat;
use crate::core::state::{GameState, Phase};
use crate::error::MoveError;
use crate::tiles::{Deal, Tile, TileId};

use super::validator::{Meld, INITIAL_MELD_THRESHOLD};

/// What a committed transition did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// A fresh deal; seat 0 to act.
    Dealt,
    /// `seat` drew `tile`; `next` is now to act.
    Drew { seat: Seat, tile: Tile, next: Seat },
    /// `seat` committed a set. `target` is the board index written.
    Committed {
        seat: Seat,
        target: usize,
        extended: bool,
        first_meld: bool,
        won: bool,
    },
    /// `seat` passed; `next` is now to act.
    TurnEnded { seat: Seat, next: Seat },
}

impl Transition {
    /// Whether this transition finished the game.
    #[must_use]
    pub fn is_win(&self) -> bool {
        matches!(self, Transition::Committed { won: true, .. })
    }
}

/// Replace the state's deal and start play at seat 0.
pub fn start_game(state: &mut GameState, deal: Deal) -> Transition {
    state.begin_deal(deal);
    Transition::Dealt
}

/// Apply `intent` on behalf of `seat`.
///
/// # Errors
///
/// Returns a `MoveError` when the phase, seat, or tiles make the intent
/// illegal. The state is unchanged in that case.
pub fn apply(state: &mut GameState, seat: Seat, intent: &Intent) -> Result<Transition, MoveError> {
    let current = match state.phase {
        Phase::NotStarted => return Err(MoveError::NotStarted),
        Phase::Finished { winner } => return Err(MoveError::Finished { winner }),
        Phase::InProgress { current } => current,
    };

    if seat != current {
        return Err(MoveError::NotYourTurn { seat, current });
    }

    let transition = match intent {
        Intent::Draw => draw(state, seat)?,
        Intent::CommitSet { tiles, target } => commit(state, seat, tiles, *target)?,
        Intent::EndTurn => end_turn(state, seat),
    };

    state.bump_revision();
    Ok(transition)
}

fn draw(state: &mut GameState, seat: Seat) -> Result<Transition, MoveError> {
    let tile = state.pool.draw().ok_or(MoveError::PoolEmpty)?;
    state.hands[seat].push_back(tile);

    let next = advance(state, seat);
    Ok(Transition::Drew { seat, tile, next })
}

fn end_turn(state: &mut GameState, seat: Seat) -> Transition {
    let next = advance(state, seat);
    Transition::TurnEnded { seat, next }
}

fn advance(state: &mut GameState, seat: Seat) -> Seat {
    let next = seat.next();
    state.phase = Phase::InProgress { current: next };
    next
}

fn commit(
    state: &mut GameState,
    seat: Seat,
    ids: &[TileId],
    target: Option<usize>,
) -> Result<Transition, MoveError> {
    let tiles = resolve_tiles(state, seat, ids)?;
    let melded = state.has_meld[seat];

    let (meld, index) = match target {
        None => {
            let meld = Meld::new(tiles).ok_or(MoveError::InvalidSet)?;
            if !melded && meld.score() < INITIAL_MELD_THRESHOLD {
                return Err(MoveError::BelowInitialMeld {
                    score: meld.score(),
                });
            }
            (meld, None)
        }
        Some(index) => {
            if !melded {
                return Err(MoveError::MeldRequired);
            }
            let existing = state
                .board
                .get(index)
                .ok_or(MoveError::UnknownTarget { index })?;
            let meld = existing.extended(&tiles).ok_or(MoveError::InvalidSet)?;
            (meld, Some(index))
        }
    };

    // Validated; everything below commits.
    let removed: FxHashSet<TileId> = ids.iter().copied().collect();
    state.hands[seat].retain(|t| !removed.contains(&t.id));

    let written = match index {
        Some(index) => {
            state.board[index] = meld;
            index
        }
        None => {
            state.board.push_back(meld);
            state.board.len() - 1
        }
    };

    state.has_meld[seat] = true;

    let won = state.hands[seat].is_empty();
    if won {
        state.phase = Phase::Finished { winner: seat };
    }

    Ok(Transition::Committed {
        seat,
        target: written,
        extended: index.is_some(),
        first_meld: !melded,
        won,
    })
}

/// Look up submitted ids in the acting hand, rejecting empties, duplicates and
/// tiles the seat does not hold.
fn resolve_tiles(state: &GameState, seat: Seat, ids: &[TileId]) -> Result<Vec<Tile>, MoveError> {
    if ids.is_empty() {
        return Err(MoveError::EmptyCommit);
    }

    let mut seen = FxHashSet::default();
    let hand = &state.hands[seat];

    ids.iter()
        .map(|&id| {
            if !seen.insert(id) {
                return Err(MoveError::DuplicateTile { tile: id });
            }
            hand.iter()
                .find(|t| t.id == id)
                .copied()
                .ok_or(MoveError::TileNotInHand { tile: id })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Role;
    use crate::core::seat::SeatMap;
    use crate::core::GameRng;

    fn dealt(seed: u64) -> GameState {
        GameState::dealt(
            Role::Single,
            SeatMap::new(|s| s.is_host()),
            Deal::shuffled(&mut GameRng::new(seed)),
        )
    }

    fn seat(i: u8) -> Seat {
        Seat::new(i).unwrap()
    }

    #[test]
    fn test_draw_moves_tile_and_advances() {
        let mut state = dealt(1);
        let pool_before = state.pool().len();

        let t = apply(&mut state, seat(0), &Intent::Draw).unwrap();

        assert!(matches!(t, Transition::Drew { next, .. } if next == seat(1)));
        assert_eq!(state.pool().len(), pool_before - 1);
        assert_eq!(state.hand(seat(0)).len(), 15);
        assert_eq!(state.current_seat(), Some(seat(1)));
    }

    #[test]
    fn test_wrong_seat_rejected() {
        let mut state = dealt(1);
        let revision = state.revision();

        let err = apply(&mut state, seat(2), &Intent::Draw).unwrap_err();

        assert_eq!(
            err,
            MoveError::NotYourTurn {
                seat: seat(2),
                current: seat(0)
            }
        );
        assert_eq!(state.revision(), revision);
        assert_eq!(state.current_seat(), Some(seat(0)));
    }

    #[test]
    fn test_not_started_rejected() {
        let mut state = GameState::new(Role::Single, SeatMap::with_value(true));
        assert_eq!(
            apply(&mut state, seat(0), &Intent::EndTurn),
            Err(MoveError::NotStarted)
        );
    }

    #[test]
    fn test_end_turn_cycles() {
        let mut state = dealt(2);
        for i in 1..=8u8 {
            let current = state.current_seat().unwrap();
            apply(&mut state, current, &Intent::EndTurn).unwrap();
            assert_eq!(state.current_seat(), Some(seat(i % 4)));
        }
    }

    #[test]
    fn test_commit_rejects_foreign_tile() {
        let mut state = dealt(3);
        let foreign = state.hand(seat(1))[0].id;
        let own: Vec<_> = state.hand(seat(0)).iter().take(2).map(|t| t.id).collect();

        let mut ids = own;
        ids.push(foreign);
        let err = apply(&mut state, seat(0), &Intent::commit_new(ids)).unwrap_err();

        assert_eq!(err, MoveError::TileNotInHand { tile: foreign });
    }

    #[test]
    fn test_commit_rejects_duplicate_and_empty() {
        let mut state = dealt(3);
        let id = state.hand(seat(0))[0].id;

        assert_eq!(
            apply(&mut state, seat(0), &Intent::commit_new(vec![id, id, id])),
            Err(MoveError::DuplicateTile { tile: id })
        );
        assert_eq!(
            apply(&mut state, seat(0), &Intent::commit_new(vec![])),
            Err(MoveError::EmptyCommit)
        );
    }

    #[test]
    fn test_extend_requires_meld() {
        let mut state = dealt(4);
        let id = state.hand(seat(0))[0].id;

        assert_eq!(
            apply(&mut state, seat(0), &Intent::extend(0, vec![id])),
            Err(MoveError::MeldRequired)
        );
    }
}
