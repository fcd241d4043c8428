//! Decision procedures for automated seats.
//!
//! Policies are trait-based so the host can run something other than the
//! default greedy player:
//! - `MovePolicy`: choose one commit, or draw
//! - `GreedyPolicy`: shed the largest legal set available

use crate::core::action::Intent;
use crate::rules::{score, Meld, INITIAL_MELD_THRESHOLD};
use crate::tiles::Tile;

use super::candidates::{extension_for, legal_candidates};

/// What an automated seat does this turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Commit `tiles` as a new set (`target == None`) or onto board set
    /// `target`.
    Commit {
        tiles: Vec<Tile>,
        target: Option<usize>,
    },
    /// No move: draw instead.
    Draw,
}

impl Decision {
    /// The intent that carries out this decision.
    #[must_use]
    pub fn to_intent(&self) -> Intent {
        match self {
            Decision::Commit { tiles, target } => Intent::CommitSet {
                tiles: tiles.iter().map(|t| t.id).collect(),
                target: *target,
            },
            Decision::Draw => Intent::Draw,
        }
    }

    /// The hand and board that result from a commit.
    ///
    /// Returns `None` for `Draw`, or when the commit does not fit the given
    /// board.
    #[must_use]
    pub fn apply(&self, hand: &[Tile], board: &[Meld]) -> Option<(Vec<Tile>, Vec<Meld>)> {
        let Decision::Commit { tiles, target } = self else {
            return None;
        };

        let mut board = board.to_vec();
        match target {
            None => board.push(Meld::new(tiles.clone())?),
            Some(index) => {
                let longer = board.get(*index)?.extended(tiles)?;
                board[*index] = longer;
            }
        }

        let hand = hand
            .iter()
            .filter(|t| !tiles.iter().any(|c| c.id == t.id))
            .copied()
            .collect();

        Some((hand, board))
    }
}

/// Policy for choosing an automated seat's move.
pub trait MovePolicy: Send + Sync {
    /// Decide one move for a seat holding `hand`.
    ///
    /// `has_meld` is whether the seat already completed its initial meld.
    fn decide(&self, hand: &[Tile], board: &[Meld], has_meld: bool) -> Decision;
}

/// Greedy heuristic: the largest legal set from hand, subject to the initial
/// meld threshold; once melded, fall back to extending a board set.
///
/// Deterministic for a fixed hand order. Not optimal.
#[derive(Clone, Debug, Default)]
pub struct GreedyPolicy;

impl MovePolicy for GreedyPolicy {
    fn decide(&self, hand: &[Tile], board: &[Meld], has_meld: bool) -> Decision {
        let candidates = legal_candidates(hand);

        let chosen = if has_meld {
            candidates.into_iter().next()
        } else {
            candidates
                .into_iter()
                .find(|c| score(c) >= INITIAL_MELD_THRESHOLD)
        };

        if let Some(tiles) = chosen {
            return Decision::Commit {
                tiles,
                target: None,
            };
        }

        if has_meld {
            for (index, meld) in board.iter().enumerate() {
                if let Some(tiles) = extension_for(meld, hand) {
                    return Decision::Commit {
                        tiles,
                        target: Some(index),
                    };
                }
            }
        }

        Decision::Draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::is_valid_set;
    use crate::tiles::{TileColor, TileId};
    use TileColor::{Black, Blue, Orange, Red};

    fn hand(layout: &[(TileColor, u8)]) -> Vec<Tile> {
        layout.iter()
            .enumerate()
            .map(|(i, &(c, n))| Tile::numbered(TileId::new(i as u16), c, n))
            .collect()
    }

    #[test]
    fn test_unmelded_needs_thirty() {
        let h = hand(&[(Red, 5), (Red, 6), (Red, 7), (Blue, 1)]);
        assert_eq!(GreedyPolicy.decide(&h, &[], false), Decision::Draw);
    }

    #[test]
    fn test_unmelded_skips_small_for_valuable() {
        // Red 1-4 is larger but scores 10; the 12s group scores 36.
        let h = hand(&[(Red, 1), (Red, 2), (Red, 3), (Red, 4), (Red, 12), (Blue, 12), (Black, 12)]);

        match GreedyPolicy.decide(&h, &[], false) {
            Decision::Commit { tiles, target } => {
                assert_eq!(target, None);
                assert!(tiles.iter().all(|t| t.number == 12));
                assert!(score(&tiles) >= INITIAL_MELD_THRESHOLD);
            }
            Decision::Draw => panic!("expected a commit"),
        }
    }

    #[test]
    fn test_melded_takes_largest() {
        let h = hand(&[(Red, 1), (Red, 2), (Red, 3), (Red, 4), (Red, 12), (Blue, 12), (Black, 12)]);

        match GreedyPolicy.decide(&h, &[], true) {
            Decision::Commit { tiles, .. } => {
                assert_eq!(tiles.len(), 4);
                assert!(is_valid_set(&tiles));
            }
            Decision::Draw => panic!("expected a commit"),
        }
    }

    #[test]
    fn test_melded_extends_board() {
        let board = vec![Meld::new(vec![
            Tile::numbered(TileId::new(90), Orange, 2),
            Tile::numbered(TileId::new(91), Orange, 3),
            Tile::numbered(TileId::new(92), Orange, 4),
        ])
        .unwrap()];
        let h = hand(&[(Orange, 5), (Blue, 11)]);

        let decision = GreedyPolicy.decide(&h, &board, true);
        assert_eq!(
            decision,
            Decision::Commit {
                tiles: vec![h[0]],
                target: Some(0)
            }
        );

        let (new_hand, new_board) = decision.apply(&h, &board).unwrap();
        assert_eq!(new_hand, vec![h[1]]);
        assert_eq!(new_board[0].len(), 4);
    }

    #[test]
    fn test_unmelded_never_extends() {
        let board = vec![Meld::new(hand(&[(Orange, 2), (Orange, 3), (Orange, 4)])).unwrap()];
        let h = vec![Tile::numbered(TileId::new(40), Orange, 5)];

        assert_eq!(GreedyPolicy.decide(&h, &board, false), Decision::Draw);
    }

    #[test]
    fn test_decision_to_intent() {
        let h = hand(&[(Red, 10), (Red, 11), (Red, 12)]);
        let decision = GreedyPolicy.decide(&h, &[], false);

        assert_eq!(
            decision.to_intent(),
            Intent::commit_new(vec![TileId::new(0), TileId::new(1), TileId::new(2)])
        );
        assert_eq!(Decision::Draw.to_intent(), Intent::Draw);
        assert!(Decision::Draw.apply(&h, &[]).is_none());
    }
}
