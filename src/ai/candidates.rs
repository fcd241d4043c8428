//! Enumeration of the legal sets a hand can form.
//!
//! Rather than walking every subset of the hand, candidates are built
//! structurally: every run per color and start number (Jokers filling holes),
//! and every group per number (distinct colors plus Jokers). This yields every
//! legal set shape the hand can make, up to interchangeable copies.
//!
//! Output order is deterministic for a fixed hand order: largest first, ties
//! in enumeration order (runs by color and start, then groups by number).

use crate::rules::{is_valid_set, Meld, MAX_GROUP_SIZE, MIN_SET_SIZE};
use crate::tiles::{Tile, TileColor, MAX_NUMBER};

/// Every legal set the hand can form, largest first.
#[must_use]
pub fn legal_candidates(hand: &[Tile]) -> Vec<Vec<Tile>> {
    let jokers: Vec<Tile> = hand.iter().filter(|t| t.is_joker).copied().collect();

    let mut candidates = runs(hand, &jokers);
    candidates.extend(groups(hand, &jokers));
    candidates.retain(|c| is_valid_set(c));

    // Stable: equal sizes keep enumeration order.
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));
    candidates
}

/// First tile of each number in `color`, in hand order.
fn by_number(hand: &[Tile], color: TileColor) -> [Option<Tile>; MAX_NUMBER as usize + 1] {
    let mut slots = [None; MAX_NUMBER as usize + 1];
    for tile in hand.iter().filter(|t| !t.is_joker && t.color == color) {
        let slot = &mut slots[usize::from(tile.number)];
        if slot.is_none() {
            *slot = Some(*tile);
        }
    }
    slots
}

fn runs(hand: &[Tile], jokers: &[Tile]) -> Vec<Vec<Tile>> {
    let mut out = Vec::new();

    for color in TileColor::SUITS {
        let slots = by_number(hand, color);

        for start in 1..=MAX_NUMBER {
            let mut run = Vec::new();
            let mut used_jokers = 0;
            let mut naturals = 0;

            for number in start..=MAX_NUMBER {
                if let Some(tile) = slots[usize::from(number)] {
                    run.push(tile);
                    naturals += 1;
                } else if used_jokers < jokers.len() {
                    run.push(jokers[used_jokers]);
                    used_jokers += 1;
                } else {
                    break;
                }

                if run.len() >= MIN_SET_SIZE && naturals > 0 {
                    out.push(run.clone());
                }
            }
        }
    }

    out
}

fn groups(hand: &[Tile], jokers: &[Tile]) -> Vec<Vec<Tile>> {
    let mut out = Vec::new();

    for number in 1..=MAX_NUMBER {
        let naturals: Vec<Tile> = TileColor::SUITS
            .iter()
            .filter_map(|&color| {
                hand.iter()
                    .find(|t| !t.is_joker && t.color == color && t.number == number)
                    .copied()
            })
            .collect();

        for mask in 1u32..(1 << naturals.len()) {
            let chosen: Vec<Tile> = naturals
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, t)| *t)
                .collect();

            for k in 0..=jokers.len() {
                let size = chosen.len() + k;
                if (MIN_SET_SIZE..=MAX_GROUP_SIZE).contains(&size) {
                    let mut group = chosen.clone();
                    group.extend_from_slice(&jokers[..k]);
                    out.push(group);
                }
            }
        }
    }

    out
}

/// Hand tiles that can be added to `meld`, added greedily in hand order.
///
/// Tiles that do not fit yet are retried after each successful addition, so
/// `5-6-7` plus hand `9, 8` extends to `5-9`. Returns `None` if nothing fits.
#[must_use]
pub fn extension_for(meld: &Meld, hand: &[Tile]) -> Option<Vec<Tile>> {
    let mut current = meld.clone();
    let mut added: Vec<Tile> = Vec::new();

    loop {
        let mut progressed = false;

        for tile in hand {
            if added.iter().any(|a| a.id == tile.id) {
                continue;
            }
            if let Some(longer) = current.extended(std::slice::from_ref(tile)) {
                current = longer;
                added.push(*tile);
                progressed = true;
            }
        }

        if !progressed {
            break;
        }
    }

    if added.is_empty() {
        None
    } else {
        Some(added)
    }
}
