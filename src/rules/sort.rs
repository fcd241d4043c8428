//! Deterministic tile orderings.
//!
//! `sort_set` is the board order: ascending `(number, color)`, stable, and
//! idempotent. Jokers carry number 0 and therefore lead. `sort_by_color`
//! groups a hand by suit for display.

use crate::tiles::Tile;

/// Sort by `(number, color)` ascending. Stable.
pub fn sort_set(tiles: &mut [Tile]) {
    tiles.sort_by_key(|t| (t.number, t.color));
}

/// Sort by `(color, number)` ascending. Stable.
pub fn sort_by_color(tiles: &mut [Tile]) {
    tiles.sort_by_key(|t| (t.color, t.number));
}

/// Owned variant of [`sort_set`].
#[must_use]
pub fn sorted_set(mut tiles: Vec<Tile>) -> Vec<Tile> {
    sort_set(&mut tiles);
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{TileColor, TileId};

    fn t(id: u16, color: TileColor, n: u8) -> Tile {
        Tile::numbered(TileId::new(id), color, n)
    }

    #[test]
    fn test_sort_set_orders_number_then_color() {
        let mut tiles = vec![
            t(0, TileColor::Black, 5),
            t(1, TileColor::Red, 7),
            Tile::joker(TileId::new(2)),
            t(3, TileColor::Red, 5),
        ];
        sort_set(&mut tiles);

        let ids: Vec<_> = tiles.iter().map(|t| t.id.raw()).collect();
        assert_eq!(ids, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_sort_set_is_idempotent() {
        let mut tiles = vec![
            t(0, TileColor::Blue, 9),
            t(1, TileColor::Blue, 9),
            t(2, TileColor::Red, 1),
        ];
        sort_set(&mut tiles);
        let once = tiles.clone();
        sort_set(&mut tiles);
        assert_eq!(tiles, once);
    }

    #[test]
    fn test_sort_set_is_stable_for_equal_faces() {
        let mut tiles = vec![t(5, TileColor::Red, 4), t(1, TileColor::Red, 4)];
        sort_set(&mut tiles);
        assert_eq!(tiles[0].id, TileId::new(5));
    }

    #[test]
    fn test_sort_by_color() {
        let tiles = vec![
            t(0, TileColor::Black, 1),
            t(1, TileColor::Red, 13),
            t(2, TileColor::Red, 2),
        ];
        let mut by_color = tiles.clone();
        sort_by_color(&mut by_color);

        let ids: Vec<_> = by_color.iter().map(|t| t.id.raw()).collect();
        assert_eq!(ids, vec![2, 1, 0]);
        assert_ne!(sorted_set(tiles), by_color);
    }
}
