#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative puzzle state management for Tile Slide.

mod grid;
pub mod solvability;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tileslide_core::{Command, Event, GridSize, MoveRejection, Slot, Tile};

pub use grid::Grid;

const DEFAULT_SHUFFLE_SEED: u64 = 0x51d3_7a11_e5c0_0f3e;

/// Outcome of a successful scored move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Tile that slid.
    pub tile: Tile,
    /// Slot the tile left, which is now empty.
    pub from: Slot,
    /// Slot the tile entered, previously empty.
    pub to: Slot,
    /// Scored moves after this one.
    pub move_count: u32,
    /// Whether this move solved the puzzle for the first time.
    pub solved_now: bool,
}

/// A grid together with the score kept while the player works on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    grid: Grid,
    move_count: u32,
    won: bool,
}

impl Puzzle {
    /// Creates a solved puzzle with a zero move count.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self::from_grid(Grid::solved(size))
    }

    /// Wraps an existing arrangement with a zero move count.
    #[must_use]
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            move_count: 0,
            won: false,
        }
    }

    /// Restores the solved arrangement and clears the score.
    pub fn reset(&mut self) {
        *self = Self::new(self.grid.size());
    }

    /// Performs `moves` random legal slides. They are not scored: the move
    /// count and won flag are cleared afterwards.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, moves: u32, rng: &mut R) {
        self.grid.shuffle(moves, rng);
        self.move_count = 0;
        self.won = false;
    }

    /// Reports whether the tile in `slot` may slide into the empty slot.
    #[must_use]
    pub fn can_move(&self, slot: Slot) -> bool {
        self.grid.can_move(slot)
    }

    /// Slides the tile in `slot` into the empty slot and scores the move.
    pub fn apply_move(&mut self, slot: Slot) -> Result<MoveOutcome, MoveRejection> {
        self.grid.check_move(slot)?;

        let to = self.grid.empty_slot();
        let tile = self.grid.swap_with_empty(slot);
        self.move_count = self.move_count.saturating_add(1);

        let solved_now = !self.won && self.grid.is_solved();
        if solved_now {
            self.won = true;
        }

        Ok(MoveOutcome {
            tile,
            from: slot,
            to,
            move_count: self.move_count,
            solved_now,
        })
    }

    /// Reports whether every tile currently sits in its home slot.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.grid.is_solved()
    }

    /// Reports whether a scored move ever solved the puzzle since the last reset.
    #[must_use]
    pub const fn has_been_won(&self) -> bool {
        self.won
    }

    /// Number of scored moves since the last reset or shuffle.
    #[must_use]
    pub const fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Read-only access to the underlying arrangement.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// Represents the authoritative Tile Slide world state.
#[derive(Debug)]
pub struct World {
    puzzle: Option<Puzzle>,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates an empty world that shuffles with the default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SHUFFLE_SEED)
    }

    /// Creates an empty world whose shuffles derive from the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            puzzle: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ResetPuzzle { size } => {
            world.puzzle = Some(Puzzle::new(size));
            out_events.push(Event::PuzzleReset { size });
        }
        Command::ShufflePuzzle { moves } => {
            if let Some(puzzle) = world.puzzle.as_mut() {
                puzzle.shuffle(moves, &mut world.rng);
                out_events.push(Event::PuzzleShuffled {
                    moves,
                    empty: puzzle.grid().empty_slot(),
                });
            }
        }
        Command::MoveTile { slot } => {
            let Some(puzzle) = world.puzzle.as_mut() else {
                out_events.push(Event::MoveRejected {
                    slot,
                    reason: MoveRejection::NoPuzzle,
                });
                return;
            };
            match puzzle.apply_move(slot) {
                Ok(outcome) => {
                    out_events.push(Event::TileMoved {
                        tile: outcome.tile,
                        from: outcome.from,
                        to: outcome.to,
                        move_count: outcome.move_count,
                    });
                    if outcome.solved_now {
                        out_events.push(Event::PuzzleSolved {
                            move_count: outcome.move_count,
                        });
                    }
                }
                Err(reason) => out_events.push(Event::MoveRejected { slot, reason }),
            }
        }
        Command::LoadBoard { size, tiles } => {
            let loaded = Grid::from_tiles(size, tiles).and_then(|grid| {
                if grid.is_solved() {
                    Err(tileslide_core::BoardRejection::AlreadySolved)
                } else if solvability::is_solvable(size, grid.tiles()) {
                    Ok(grid)
                } else {
                    Err(tileslide_core::BoardRejection::Unsolvable)
                }
            });
            match loaded {
                Ok(grid) => {
                    let empty = grid.empty_slot();
                    world.puzzle = Some(Puzzle::from_grid(grid));
                    out_events.push(Event::BoardLoaded { size, empty });
                }
                Err(reason) => out_events.push(Event::BoardRejected { reason }),
            }
        }
        Command::DiscardPuzzle => {
            if world.puzzle.take().is_some() {
                out_events.push(Event::PuzzleDiscarded);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Puzzle, World};
    use tileslide_core::{GridSize, Slot, Tile};

    /// Provides read-only access to the active puzzle, if any.
    #[must_use]
    pub fn puzzle(world: &World) -> Option<&Puzzle> {
        world.puzzle.as_ref()
    }

    /// Size of the active puzzle.
    #[must_use]
    pub fn grid_size(world: &World) -> Option<GridSize> {
        puzzle(world).map(|puzzle| puzzle.grid().size())
    }

    /// Tiles of the active puzzle in row-major order.
    #[must_use]
    pub fn tiles(world: &World) -> Option<&[Tile]> {
        puzzle(world).map(|puzzle| puzzle.grid().tiles())
    }

    /// Tile occupying the slot of the active puzzle.
    #[must_use]
    pub fn tile_at(world: &World, slot: Slot) -> Option<Tile> {
        puzzle(world).and_then(|puzzle| puzzle.grid().tile(slot))
    }

    /// Slot holding the empty tile of the active puzzle.
    #[must_use]
    pub fn empty_slot(world: &World) -> Option<Slot> {
        puzzle(world).map(|puzzle| puzzle.grid().empty_slot())
    }

    /// Scored moves on the active puzzle, zero when none is active.
    #[must_use]
    pub fn move_count(world: &World) -> u32 {
        puzzle(world).map_or(0, Puzzle::move_count)
    }

    /// Reports whether the active puzzle is currently in its solved arrangement.
    #[must_use]
    pub fn is_won(world: &World) -> bool {
        puzzle(world).is_some_and(Puzzle::is_won)
    }

    /// Reports whether the tile in `slot` of the active puzzle may slide.
    #[must_use]
    pub fn can_move(world: &World, slot: Slot) -> bool {
        puzzle(world).is_some_and(|puzzle| puzzle.can_move(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(values: &[u32]) -> Vec<Tile> {
        values.iter().copied().map(Tile::new).collect()
    }

    #[test]
    fn apply_resets_to_solved_grid() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ResetPuzzle {
                size: GridSize::FOUR,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PuzzleReset {
                size: GridSize::FOUR
            }]
        );
        assert!(query::is_won(&world));
        assert_eq!(query::empty_slot(&world), Some(Slot::new(15)));
        assert_eq!(query::move_count(&world), 0);
    }

    #[test]
    fn shuffle_without_puzzle_is_ignored() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::ShufflePuzzle { moves: 10 }, &mut events);

        assert!(events.is_empty());
        assert!(query::puzzle(&world).is_none());
    }

    #[test]
    fn move_without_puzzle_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveTile { slot: Slot::new(0) },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveRejected {
                slot: Slot::new(0),
                reason: MoveRejection::NoPuzzle,
            }]
        );
    }

    #[test]
    fn winning_move_reports_solution_once() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadBoard {
                size: GridSize::THREE,
                tiles: tiles(&[1, 2, 3, 4, 5, 6, 7, 0, 8]),
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::MoveTile { slot: Slot::new(8) },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TileMoved {
                    tile: Tile::new(8),
                    from: Slot::new(8),
                    to: Slot::new(7),
                    move_count: 1,
                },
                Event::PuzzleSolved { move_count: 1 },
            ]
        );
        assert!(query::is_won(&world));

        events.clear();
        apply(
            &mut world,
            Command::MoveTile { slot: Slot::new(7) },
            &mut events,
        );
        apply(
            &mut world,
            Command::MoveTile { slot: Slot::new(8) },
            &mut events,
        );
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, Event::PuzzleSolved { .. })),
            "solution is only announced the first time"
        );
        assert!(query::is_won(&world));
        assert_eq!(query::move_count(&world), 3);
    }

    #[test]
    fn unsolvable_board_is_rejected_and_keeps_previous_puzzle() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ResetPuzzle {
                size: GridSize::THREE,
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::LoadBoard {
                size: GridSize::THREE,
                tiles: tiles(&[2, 1, 3, 4, 5, 6, 7, 8, 0]),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::BoardRejected {
                reason: tileslide_core::BoardRejection::Unsolvable
            }]
        );
        assert!(query::is_won(&world));
    }

    #[test]
    fn solved_board_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::LoadBoard {
                size: GridSize::THREE,
                tiles: tiles(&[1, 2, 3, 4, 5, 6, 7, 8, 0]),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::BoardRejected {
                reason: tileslide_core::BoardRejection::AlreadySolved
            }]
        );
        assert!(query::puzzle(&world).is_none());
    }

    #[test]
    fn discard_drops_puzzle_once() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ResetPuzzle {
                size: GridSize::FIVE,
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::DiscardPuzzle, &mut events);
        apply(&mut world, Command::DiscardPuzzle, &mut events);

        assert_eq!(events, vec![Event::PuzzleDiscarded]);
        assert!(query::tiles(&world).is_none());
        assert_eq!(query::move_count(&world), 0);
    }
}
