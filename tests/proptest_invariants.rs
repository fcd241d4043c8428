//! Property-based invariant tests.
//!
//! Random seeds deal full games, random action sequences drive the engine,
//! and generated tile lists check the validator against an exhaustive search
//! and at its size boundaries.

use proptest::prelude::*;

use tile_rummy::ai::{GreedyPolicy, MovePolicy};
use tile_rummy::core::{GameRng, GameState, Intent, Role, Seat, SeatMap};
use tile_rummy::rules::{
    apply, is_valid_set, score, sort_set, Meld, Transition, INITIAL_MELD_THRESHOLD,
};
use tile_rummy::tiles::{Deal, Tile, TileColor, TileId, DECK_SIZE, MAX_NUMBER};
use tile_rummy::MoveError;

fn new_game(seed: u64) -> GameState {
    GameState::dealt(
        Role::Single,
        SeatMap::with_value(false),
        Deal::shuffled(&mut GameRng::new(seed)),
    )
}

fn suit() -> impl Strategy<Value = TileColor> {
    prop::sample::select(TileColor::SUITS.to_vec())
}

/// A same-color run of `len` consecutive numbers that fits in 1..=13.
fn run_of(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<Tile>> {
    (len, suit()).prop_flat_map(|(len, color)| {
        (1..=(MAX_NUMBER as usize + 1 - len)).prop_map(move |start| {
            (0..len)
                .map(|i| Tile::numbered(TileId::new(i as u16), color, (start + i) as u8))
                .collect()
        })
    })
}

/// A group of distinct colors on one number.
fn group_of(size: usize) -> impl Strategy<Value = Vec<Tile>> {
    (
        1..=MAX_NUMBER,
        Just(TileColor::SUITS.to_vec()).prop_shuffle(),
    )
        .prop_map(move |(number, colors)| {
            colors
                .into_iter()
                .take(size)
                .enumerate()
                .map(|(i, color)| Tile::numbered(TileId::new(i as u16), color, number))
                .collect()
        })
}

fn valid_set() -> impl Strategy<Value = Vec<Tile>> {
    prop_oneof![run_of(3..=13), group_of(3), group_of(4)]
}

/// Tiles from `(color index, number)` pairs; color index 4 is a Joker.
fn build(raw: &[(u8, u8)]) -> Vec<Tile> {
    raw.iter()
        .enumerate()
        .map(|(i, &(c, n))| {
            let id = TileId::new(i as u16);
            match TileColor::SUITS.get(usize::from(c)) {
                Some(&color) => Tile::numbered(id, color, n),
                None => Tile::joker(id),
            }
        })
        .collect()
}

/// Any tiles at all, Jokers included.
fn scattered() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0u8..5, 1..=MAX_NUMBER), 0..=15)
}

/// Tiles drawn from two colors and a narrow number band, so legal shapes
/// and near misses both come up often.
fn clustered() -> impl Strategy<Value = Vec<(u8, u8)>> {
    (0u8..4, 0u8..4, 1..=MAX_NUMBER).prop_flat_map(|(a, b, base)| {
        let top = (base + 4).min(MAX_NUMBER);
        prop::collection::vec(
            (prop_oneof![3 => Just(a), 2 => Just(b), 1 => Just(4u8)], base..=top),
            2..=14,
        )
    })
}

/// Legality by exhaustion: a run is some window of consecutive numbers that
/// holds every numbered tile of one color exactly once with Jokers on the
/// remaining slots; a group is one number in distinct colors.
fn legal_by_search(tiles: &[Tile]) -> bool {
    let numbered: Vec<&Tile> = tiles.iter().filter(|t| !t.is_joker).collect();
    let Some(first) = numbered.first() else {
        return false;
    };
    let len = tiles.len();

    let run = (3..=MAX_NUMBER as usize).contains(&len)
        && numbered.iter().all(|t| t.color == first.color)
        && (1..=(MAX_NUMBER as usize + 1 - len)).any(|start| {
            let window = start..start + len;
            let mut seen = vec![false; len];
            numbered.iter().all(|t| {
                let n = usize::from(t.number);
                window.contains(&n) && !std::mem::replace(&mut seen[n - start], true)
            })
        });

    let group = (3..=4).contains(&len)
        && numbered.iter().all(|t| t.number == first.number)
        && numbered
            .iter()
            .enumerate()
            .all(|(i, t)| numbered[..i].iter().all(|u| u.color != t.color));

    run || group
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2048))]

    /// Any multiset is legal exactly when a run or group reading exists.
    #[test]
    fn legality_matches_search(raw in prop_oneof![scattered(), clustered()]) {
        let tiles = build(&raw);
        prop_assert_eq!(is_valid_set(&tiles), legal_by_search(&tiles));
        if is_valid_set(&tiles) {
            prop_assert!(score(&tiles) > 0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Tiles are conserved and meld flags only flip through a qualifying commit.
    #[test]
    fn conservation_and_meld_flags(
        seed in any::<u64>(),
        choices in prop::collection::vec(0u8..3, 1..200),
    ) {
        let mut state = new_game(seed);
        let mut flips = SeatMap::with_value(0u32);

        for choice in choices {
            let Some(seat) = state.current_seat().filter(|_| state.is_in_progress()) else {
                break;
            };

            let intent = match choice {
                0 => Intent::Draw,
                1 => Intent::EndTurn,
                _ => {
                    let hand: Vec<Tile> = state.hand(seat).iter().copied().collect();
                    let board: Vec<Meld> = state.board().iter().cloned().collect();
                    GreedyPolicy.decide(&hand, &board, state.has_meld(seat)).to_intent()
                }
            };

            let before = state.meld_flags().clone();
            let result = apply(&mut state, seat, &intent);
            prop_assert_eq!(state.tile_count(), DECK_SIZE);

            for s in Seat::all() {
                if before[s] != state.has_meld(s) {
                    prop_assert!(!before[s]);
                    prop_assert_eq!(s, seat);
                    flips[s] += 1;

                    let Ok(Transition::Committed { target, first_meld: true, .. }) = &result else {
                        return Err(TestCaseError::fail("meld flag flipped without a first meld"));
                    };
                    prop_assert!(state.board()[*target].score() >= INITIAL_MELD_THRESHOLD);
                }
            }

            if let Some(winner) = state.winner() {
                prop_assert!(state.hand(winner).is_empty());
            }
        }

        prop_assert!(flips.values().all(|&n| n <= 1));
    }

    /// After N draws or passes from seat 0 the turn is at seat N mod 4.
    #[test]
    fn turn_cycles(seed in any::<u64>(), draws in prop::collection::vec(any::<bool>(), 0..120)) {
        let mut state = new_game(seed);

        for (n, draw) in draws.into_iter().enumerate() {
            let seat = state.current_seat().unwrap();
            let intent = if draw && !state.pool().is_empty() {
                Intent::Draw
            } else {
                Intent::EndTurn
            };
            prop_assert!(apply(&mut state, seat, &intent).is_ok());

            let expected = Seat::new(((n + 1) % 4) as u8).unwrap();
            prop_assert_eq!(state.current_seat(), Some(expected));
        }
    }

    /// Extending a board set is always rejected before the initial meld.
    #[test]
    fn extend_rejected_unmelded(seed in any::<u64>(), target in 0usize..4, take in 1usize..5) {
        let mut state = new_game(seed);
        let seat = Seat::HOST;
        let ids: Vec<TileId> = state.hand(seat).iter().take(take).map(|t| t.id).collect();
        let revision = state.revision();
        let hand = state.hand(seat).clone();

        let result = apply(&mut state, seat, &Intent::extend(target, ids));

        prop_assert_eq!(result, Err(MoveError::MeldRequired));
        prop_assert_eq!(state.revision(), revision);
        prop_assert_eq!(state.hand(seat), &hand);
        prop_assert!(state.board().is_empty());
    }

    /// Runs are legal exactly from 3 tiles up.
    #[test]
    fn run_size_boundary(run in run_of(1..=13)) {
        prop_assert_eq!(is_valid_set(&run), run.len() >= 3);
    }

    /// Groups are legal with 3 or 4 distinct colors.
    #[test]
    fn group_size_boundary(size in 1usize..=4, group in group_of(4)) {
        let group = &group[..size];
        prop_assert_eq!(is_valid_set(group), size >= 3);
    }

    /// Any Joker substitution inside a legal run keeps it legal; interior
    /// substitutions also keep its score.
    #[test]
    fn joker_substitution_in_run(run in run_of(3..=13), pick in any::<prop::sample::Index>()) {
        let at = pick.index(run.len());
        let mut with_joker = run.clone();
        with_joker[at] = Tile::joker(TileId::new(200));

        prop_assert!(is_valid_set(&with_joker));
        if at > 0 && at < run.len() - 1 {
            prop_assert_eq!(score(&with_joker), score(&run));
        }
    }

    /// A second color breaks a run.
    #[test]
    fn mixed_colors_break_run(run in run_of(3..=13), pick in any::<prop::sample::Index>()) {
        let at = pick.index(run.len());
        let mut mixed = run.clone();
        let other = TileColor::SUITS
            .into_iter()
            .find(|&c| c != run[0].color)
            .unwrap();
        mixed[at] = Tile::numbered(mixed[at].id, other, mixed[at].number);

        prop_assert!(!is_valid_set(&mixed));
    }

    /// Score does not depend on tile order or on sorting.
    #[test]
    fn score_invariant_under_order(set in valid_set().prop_flat_map(|s| Just(s).prop_shuffle())) {
        let baseline = score(&set);
        let mut sorted = set.clone();
        sort_set(&mut sorted);

        prop_assert!(is_valid_set(&set));
        prop_assert_eq!(score(&sorted), baseline);

        let mut reversed = set;
        reversed.reverse();
        prop_assert_eq!(score(&reversed), baseline);

        sort_set(&mut sorted);
        prop_assert_eq!(score(&sorted), baseline);
    }
}

/// Thirteen is the longest legal run; fourteen tiles never form a set.
#[test]
fn test_run_upper_boundary() {
    let full: Vec<Tile> = (1..=MAX_NUMBER)
        .map(|n| Tile::numbered(TileId::new(u16::from(n)), TileColor::Blue, n))
        .collect();
    assert!(is_valid_set(&full));

    let mut fourteen = full;
    fourteen.push(Tile::joker(TileId::new(104)));
    assert!(!is_valid_set(&fourteen));
}

/// Two tiles never form a set.
#[test]
fn test_two_tiles_never_legal() {
    let pair = [
        Tile::numbered(TileId::new(0), TileColor::Red, 7),
        Tile::joker(TileId::new(104)),
    ];
    assert!(!is_valid_set(&pair));
}
