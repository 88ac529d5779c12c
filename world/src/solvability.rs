//! Inversion-parity check for arbitrary tile arrangements.
//!
//! Shuffling never needs this: it only ever performs legal moves from the
//! solved state. The check exists to vet arrangements that did not come from
//! a shuffle, such as imported board codes, and to verify shuffles in tests.

use tileslide_core::{GridSize, Tile};

/// Counts pairs of numbered tiles that appear in the wrong relative order.
/// The empty tile is ignored.
#[must_use]
pub fn inversion_count(tiles: &[Tile]) -> usize {
    let numbered: Vec<u32> = tiles
        .iter()
        .filter(|tile| !tile.is_empty())
        .map(Tile::get)
        .collect();

    numbered
        .iter()
        .enumerate()
        .map(|(index, value)| {
            numbered[index + 1..]
                .iter()
                .filter(|later| *later < value)
                .count()
        })
        .sum()
}

/// Reports whether the arrangement can be reached from the solved state.
///
/// Odd sizes: solvable iff the inversion count is even. Even sizes: solvable
/// iff the inversion count plus the empty slot's row counted from the bottom
/// (starting at one) is odd. Arrangements without exactly one empty tile are
/// never solvable.
#[must_use]
pub fn is_solvable(size: GridSize, tiles: &[Tile]) -> bool {
    if tiles.len() != size.slot_count() {
        return false;
    }
    let mut empties = tiles.iter().enumerate().filter(|(_, tile)| tile.is_empty());
    let (Some((empty_index, _)), None) = (empties.next(), empties.next()) else {
        return false;
    };

    let inversions = inversion_count(tiles);
    let side = size.side() as usize;
    if side % 2 == 1 {
        inversions % 2 == 0
    } else {
        let row_from_bottom = side - empty_index / side;
        (inversions + row_from_bottom) % 2 == 1
    }
}
