//! Tile permutation and the rules for sliding tiles around it.

use rand::Rng;
use tileslide_core::{BoardRejection, GridSize, MoveRejection, Slot, Tile};

/// Row-major tile permutation together with the position of its empty slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    tiles: Vec<Tile>,
    empty: Slot,
}

impl Grid {
    /// Creates a solved grid: tiles `1..N` in order followed by the empty slot.
    #[must_use]
    pub fn solved(size: GridSize) -> Self {
        let count = size.slot_count();
        let mut tiles: Vec<Tile> = (1..count as u32).map(Tile::new).collect();
        tiles.push(Tile::EMPTY);
        Self {
            size,
            tiles,
            empty: Slot::new(count as u32 - 1),
        }
    }

    /// Builds a grid from an externally supplied arrangement.
    ///
    /// Only checks that `tiles` is a permutation of `0..size²`; reachability
    /// from the solved state is a separate question answered by
    /// [`crate::solvability::is_solvable`].
    pub fn from_tiles(size: GridSize, tiles: Vec<Tile>) -> Result<Self, BoardRejection> {
        let expected = size.slot_count();
        if tiles.len() != expected {
            return Err(BoardRejection::WrongLength {
                expected,
                actual: tiles.len(),
            });
        }

        let mut seen = vec![false; expected];
        let mut empty = None;
        for (index, tile) in tiles.iter().enumerate() {
            let value = tile.get() as usize;
            if value >= expected {
                return Err(BoardRejection::TileOutOfRange { tile: *tile });
            }
            if std::mem::replace(&mut seen[value], true) {
                return Err(BoardRejection::DuplicateTile { tile: *tile });
            }
            if tile.is_empty() {
                empty = Some(Slot::new(index as u32));
            }
        }

        // A full permutation of 0..expected always contains the empty marker.
        let empty = empty.ok_or(BoardRejection::WrongLength {
            expected,
            actual: tiles.len(),
        })?;

        Ok(Self { size, tiles, empty })
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile occupying the slot, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, slot: Slot) -> Option<Tile> {
        self.tiles.get(slot.index()).copied()
    }

    /// Slot currently holding the empty tile.
    #[must_use]
    pub const fn empty_slot(&self) -> Slot {
        self.empty
    }

    /// Explains why the tile in `slot` cannot slide, if it cannot.
    pub fn check_move(&self, slot: Slot) -> Result<(), MoveRejection> {
        let Some(tile) = self.tile(slot) else {
            return Err(MoveRejection::OutOfRange);
        };
        if tile.is_empty() {
            return Err(MoveRejection::EmptySlot);
        }
        if !self.size.are_adjacent(slot, self.empty) {
            return Err(MoveRejection::NotAdjacent);
        }
        Ok(())
    }

    /// Reports whether the tile in `slot` borders the empty slot.
    #[must_use]
    pub fn can_move(&self, slot: Slot) -> bool {
        self.check_move(slot).is_ok()
    }

    /// Reports whether every tile sits in its home slot.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let Some((last, rest)) = self.tiles.split_last() else {
            return false;
        };
        last.is_empty()
            && rest
                .iter()
                .enumerate()
                .all(|(index, tile)| tile.get() as usize == index + 1)
    }

    /// Performs `moves` random legal slides, each picking uniformly among the
    /// empty slot's orthogonal neighbours.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, moves: u32, rng: &mut R) {
        let mut candidates: Vec<Slot> = Vec::with_capacity(4);
        for _ in 0..moves {
            candidates.clear();
            candidates.extend(self.size.neighbors(self.empty));
            if candidates.is_empty() {
                continue;
            }
            let pick = rng.gen_range(0..candidates.len() as u32) as usize;
            let _ = self.swap_with_empty(candidates[pick]);
        }
    }

    /// Swaps the tile in `slot` with the empty slot and returns the tile.
    ///
    /// Callers must have validated the move. A violation means the permutation
    /// is about to be corrupted, so this panics instead of continuing.
    pub(crate) fn swap_with_empty(&mut self, slot: Slot) -> Tile {
        assert!(
            self.tiles[self.empty.index()].is_empty(),
            "empty slot {} out of sync with tiles",
            self.empty.get()
        );
        assert!(
            self.size.are_adjacent(slot, self.empty),
            "slot {} does not border the empty slot {}",
            slot.get(),
            self.empty.get()
        );

        let tile = self.tiles[slot.index()];
        self.tiles.swap(slot.index(), self.empty.index());
        self.empty = slot;
        tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn tiles(values: &[u32]) -> Vec<Tile> {
        values.iter().copied().map(Tile::new).collect()
    }

    #[test]
    fn solved_grid_places_empty_last() {
        let grid = Grid::solved(GridSize::THREE);
        assert_eq!(grid.tiles(), tiles(&[1, 2, 3, 4, 5, 6, 7, 8, 0]).as_slice());
        assert_eq!(grid.empty_slot(), Slot::new(8));
        assert!(grid.is_solved());
    }

    #[test]
    fn single_shuffle_step_with_first_neighbor_moves_empty_up() {
        let mut grid = Grid::solved(GridSize::THREE);
        let mut rng = StepRng::new(0, 0);

        grid.shuffle(1, &mut rng);

        assert_eq!(grid.tiles(), tiles(&[1, 2, 3, 4, 5, 0, 7, 8, 6]).as_slice());
        assert_eq!(grid.empty_slot(), Slot::new(5));
    }

    #[test]
    fn check_move_explains_rejections() {
        let grid = Grid::solved(GridSize::THREE);
        assert_eq!(grid.check_move(Slot::new(9)), Err(MoveRejection::OutOfRange));
        assert_eq!(grid.check_move(Slot::new(8)), Err(MoveRejection::EmptySlot));
        assert_eq!(grid.check_move(Slot::new(0)), Err(MoveRejection::NotAdjacent));
        assert_eq!(grid.check_move(Slot::new(7)), Ok(()));
        assert_eq!(grid.check_move(Slot::new(5)), Ok(()));
    }

    #[test]
    fn from_tiles_rejects_malformed_arrangements() {
        assert_eq!(
            Grid::from_tiles(GridSize::THREE, tiles(&[1, 2, 3])),
            Err(BoardRejection::WrongLength {
                expected: 9,
                actual: 3
            })
        );
        assert_eq!(
            Grid::from_tiles(GridSize::THREE, tiles(&[1, 2, 3, 4, 5, 6, 7, 9, 0])),
            Err(BoardRejection::TileOutOfRange { tile: Tile::new(9) })
        );
        assert_eq!(
            Grid::from_tiles(GridSize::THREE, tiles(&[1, 1, 3, 4, 5, 6, 7, 8, 0])),
            Err(BoardRejection::DuplicateTile { tile: Tile::new(1) })
        );
    }

    #[test]
    fn from_tiles_locates_empty_slot() {
        let grid = Grid::from_tiles(GridSize::THREE, tiles(&[1, 2, 3, 4, 0, 6, 7, 5, 8]))
            .expect("valid permutation");
        assert_eq!(grid.empty_slot(), Slot::new(4));
        assert!(!grid.is_solved());
    }

    #[test]
    #[should_panic(expected = "does not border the empty slot")]
    fn swap_with_non_adjacent_slot_panics() {
        let mut grid = Grid::solved(GridSize::FOUR);
        let _ = grid.swap_with_empty(Slot::new(0));
    }
}
