#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Slide engine.
//!
//! This crate defines the message surface that connects the game controller,
//! the authoritative puzzle world, and the adapters. The controller submits
//! [`Command`] values describing desired puzzle mutations, the world executes
//! those commands via its `apply` entry point, and then reports [`Event`]
//! values that the controller reacts to deterministically.

use std::{error::Error, fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Minimum time between two accepted touch presses.
pub const DEFAULT_TOUCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Duration of a single tile slide animation.
pub const DEFAULT_SLIDE_DURATION: Duration = Duration::from_millis(180);

/// Duration a tap highlight stays on screen.
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(100);

/// Duration the full-screen failure notice stays visible.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(2_000);

/// Side length in pixels of every puzzle image.
pub const IMAGE_SIDE: u32 = 480;

/// Commands that express all permissible puzzle mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the active puzzle with a solved grid of the provided size.
    ResetPuzzle {
        /// Side length of the new grid.
        size: GridSize,
    },
    /// Performs random legal moves on the active puzzle without scoring them.
    ShufflePuzzle {
        /// Number of random moves to perform.
        moves: u32,
    },
    /// Requests that the tile occupying `slot` slide into the empty slot.
    MoveTile {
        /// Slot holding the tile the player tapped.
        slot: Slot,
    },
    /// Replaces the active puzzle with an externally supplied arrangement.
    LoadBoard {
        /// Side length of the supplied grid.
        size: GridSize,
        /// Row-major tile arrangement, `Tile::EMPTY` marking the hole.
        tiles: Vec<Tile>,
    },
    /// Drops the active puzzle.
    DiscardPuzzle,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a solved grid replaced the active puzzle.
    PuzzleReset {
        /// Side length of the new grid.
        size: GridSize,
    },
    /// Confirms that the active puzzle was shuffled.
    PuzzleShuffled {
        /// Number of random moves that were performed.
        moves: u32,
        /// Slot left empty after shuffling.
        empty: Slot,
    },
    /// Confirms that a tile slid into the previously empty slot.
    TileMoved {
        /// Tile that moved.
        tile: Tile,
        /// Slot the tile occupied before the move. Now empty.
        from: Slot,
        /// Slot the tile occupies after the move.
        to: Slot,
        /// Number of scored moves after this one.
        move_count: u32,
    },
    /// Reports that a move request was refused.
    MoveRejected {
        /// Slot named in the request.
        slot: Slot,
        /// Reason the move was refused.
        reason: MoveRejection,
    },
    /// Announces that the arrangement reached the solved state through a move.
    PuzzleSolved {
        /// Number of scored moves it took.
        move_count: u32,
    },
    /// Confirms that an externally supplied arrangement became the active puzzle.
    BoardLoaded {
        /// Side length of the loaded grid.
        size: GridSize,
        /// Slot holding the empty tile.
        empty: Slot,
    },
    /// Reports that an externally supplied arrangement was refused.
    BoardRejected {
        /// Reason the arrangement was refused.
        reason: BoardRejection,
    },
    /// Confirms that the active puzzle was dropped.
    PuzzleDiscarded,
}

/// Difficulty tiers offered on the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Three by three grid.
    Easy,
    /// Four by four grid.
    Medium,
    /// Five by five grid.
    Hard,
}

impl Difficulty {
    /// All difficulties in menu order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Grid size played at this difficulty.
    #[must_use]
    pub const fn grid_size(self) -> GridSize {
        match self {
            Self::Easy => GridSize::THREE,
            Self::Medium => GridSize::FOUR,
            Self::Hard => GridSize::FIVE,
        }
    }

    /// Human readable label including the grid dimensions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy (3x3)",
            Self::Medium => "Medium (4x4)",
            Self::Hard => "Hard (5x5)",
        }
    }

    /// Zero-based position within [`Difficulty::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }
}

/// Side length of a square puzzle grid. Only 3, 4 and 5 are playable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridSize(u32);

impl GridSize {
    /// Three by three grid.
    pub const THREE: Self = Self(3);
    /// Four by four grid.
    pub const FOUR: Self = Self(4);
    /// Five by five grid.
    pub const FIVE: Self = Self(5);

    /// Validates the provided side length.
    #[must_use]
    pub const fn new(side: u32) -> Option<Self> {
        match side {
            3..=5 => Some(Self(side)),
            _ => None,
        }
    }

    /// Number of slots along each edge.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.0
    }

    /// Total number of slots in the grid, including the empty one.
    #[must_use]
    pub const fn slot_count(&self) -> usize {
        (self.0 * self.0) as usize
    }

    /// Reports whether the slot lies inside the grid.
    #[must_use]
    pub const fn contains(&self, slot: Slot) -> bool {
        (slot.get() as usize) < self.slot_count()
    }

    /// Zero-based row of the slot.
    #[must_use]
    pub const fn row_of(&self, slot: Slot) -> u32 {
        slot.get() / self.0
    }

    /// Zero-based column of the slot.
    #[must_use]
    pub const fn column_of(&self, slot: Slot) -> u32 {
        slot.get() % self.0
    }

    /// Slot located at the provided column and row, if inside the grid.
    #[must_use]
    pub const fn slot_at(&self, column: u32, row: u32) -> Option<Slot> {
        if column < self.0 && row < self.0 {
            Some(Slot::new(row * self.0 + column))
        } else {
            None
        }
    }

    /// Orthogonal neighbours of the slot in up, down, left, right order.
    pub fn neighbors(&self, slot: Slot) -> impl Iterator<Item = Slot> {
        let side = self.0;
        let row = self.row_of(slot);
        let column = self.column_of(slot);
        let inside = self.contains(slot);
        let candidates = [
            (row > 0).then(|| (column, row.wrapping_sub(1))),
            (row + 1 < side).then(|| (column, row + 1)),
            (column > 0).then(|| (column.wrapping_sub(1), row)),
            (column + 1 < side).then(|| (column + 1, row)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(move |_| inside)
            .map(move |(column, row)| Slot::new(row * side + column))
    }

    /// Reports whether two slots are exactly one row or one column apart.
    #[must_use]
    pub const fn are_adjacent(&self, first: Slot, second: Slot) -> bool {
        if !self.contains(first) || !self.contains(second) {
            return false;
        }
        let row_diff = self.row_of(first).abs_diff(self.row_of(second));
        let column_diff = self.column_of(first).abs_diff(self.column_of(second));
        row_diff + column_diff == 1
    }
}

impl TryFrom<u32> for GridSize {
    type Error = u32;

    fn try_from(side: u32) -> Result<Self, Self::Error> {
        Self::new(side).ok_or(side)
    }
}

impl Serialize for GridSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for GridSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let side = u32::deserialize(deserializer)?;
        Self::new(side).ok_or_else(|| {
            serde::de::Error::custom(format!("grid size must be 3, 4 or 5 (received {side})"))
        })
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

/// Row-major index of a position within the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u32);

impl Slot {
    /// Creates a slot from its row-major index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Retrieves the row-major index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index usable with slices of tiles.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Numbered puzzle piece. Tile `n` belongs in slot `n - 1` once solved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tile(u32);

impl Tile {
    /// Marker occupying the empty slot.
    pub const EMPTY: Self = Self(0);

    /// Creates a tile with the provided number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the tile number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` for the empty marker.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Slot this tile occupies in the solved arrangement.
    #[must_use]
    pub const fn home(&self, size: GridSize) -> Slot {
        if self.0 == 0 {
            Slot::new(size.side() * size.side() - 1)
        } else {
            Slot::new(self.0 - 1)
        }
    }
}

/// Monotonic timestamp measured in milliseconds since an arbitrary origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Origin of the clock.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from milliseconds since the clock origin.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the clock origin.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, or zero when `earlier` lies in the future.
    #[must_use]
    pub const fn saturating_duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// Timestamp advanced by the provided duration.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }
}

/// Reasons a move request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveRejection {
    /// No puzzle is active.
    NoPuzzle,
    /// The slot lies outside the grid.
    OutOfRange,
    /// The slot holds the empty tile, which cannot move by itself.
    EmptySlot,
    /// The slot does not border the empty slot.
    NotAdjacent,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPuzzle => write!(f, "no puzzle is active"),
            Self::OutOfRange => write!(f, "slot lies outside the grid"),
            Self::EmptySlot => write!(f, "the empty slot cannot move"),
            Self::NotAdjacent => write!(f, "tile is not next to the empty slot"),
        }
    }
}

impl Error for MoveRejection {}

/// Reasons an externally supplied arrangement may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardRejection {
    /// The number of tiles does not match the grid size.
    WrongLength {
        /// Slots in a grid of the requested size.
        expected: usize,
        /// Tiles supplied.
        actual: usize,
    },
    /// A tile number exceeds the largest tile of the grid.
    TileOutOfRange {
        /// Offending tile.
        tile: Tile,
    },
    /// A tile number appears more than once.
    DuplicateTile {
        /// Offending tile.
        tile: Tile,
    },
    /// The arrangement cannot be reached from the solved state.
    Unsolvable,
    /// The arrangement is already solved, leaving nothing to play.
    AlreadySolved,
}

impl fmt::Display for BoardRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, actual } => {
                write!(f, "expected {expected} tiles (received {actual})")
            }
            Self::TileOutOfRange { tile } => write!(f, "tile {} is out of range", tile.get()),
            Self::DuplicateTile { tile } => write!(f, "tile {} appears twice", tile.get()),
            Self::Unsolvable => write!(f, "arrangement is not solvable"),
            Self::AlreadySolved => write!(f, "arrangement is already solved"),
        }
    }
}

impl Error for BoardRejection {}

/// Outcome of a tap on the board, surfaced as a visual flash and a sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// The tapped tile slid.
    Accepted,
    /// The tapped tile could not move.
    Rejected,
}

/// Square RGB565 picture that gets cut into tiles.
#[derive(Clone, PartialEq, Eq)]
pub struct PuzzleImage {
    side: u32,
    pixels: Vec<u16>,
}

impl PuzzleImage {
    /// Wraps row-major pixels, returning `None` unless there are exactly `side * side` of them.
    #[must_use]
    pub fn from_pixels(side: u32, pixels: Vec<u16>) -> Option<Self> {
        let expected = usize::try_from(u64::from(side) * u64::from(side)).ok()?;
        if side == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self { side, pixels })
    }

    /// Side length in pixels.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Row-major pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Pixel at the provided coordinates, if inside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.side || y >= self.side {
            return None;
        }
        let index = usize::try_from(u64::from(y) * u64::from(self.side) + u64::from(x)).ok()?;
        self.pixels.get(index).copied()
    }
}

impl fmt::Debug for PuzzleImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleImage")
            .field("side", &self.side)
            .field("pixels", &self.pixels.len())
            .finish()
    }
}
