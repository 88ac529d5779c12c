use std::time::Duration;

use tileslide_core::{
    GridSize, DEFAULT_FLASH_DURATION, DEFAULT_NOTICE_DURATION, DEFAULT_SLIDE_DURATION,
    DEFAULT_TOUCH_DEBOUNCE,
};

/// Number of random slides used to scramble each grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShuffleMoves {
    /// Moves for 3x3 grids.
    pub three: u32,
    /// Moves for 4x4 grids.
    pub four: u32,
    /// Moves for 5x5 grids.
    pub five: u32,
}

impl Default for ShuffleMoves {
    fn default() -> Self {
        Self {
            three: 50,
            four: 150,
            five: 300,
        }
    }
}

impl ShuffleMoves {
    /// Moves used for the provided grid size.
    #[must_use]
    pub fn for_size(&self, size: GridSize) -> u32 {
        match size.side() {
            3 => self.three,
            4 => self.four,
            _ => self.five,
        }
    }
}

/// Timing and shuffling parameters for the game controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Minimum time between two accepted presses.
    pub debounce: Duration,
    /// Time a tile takes to slide into the empty slot.
    pub slide_duration: Duration,
    /// How long a tapped slot stays outlined.
    pub flash_duration: Duration,
    /// How long a failure notice stays up before the menu returns.
    pub notice_duration: Duration,
    /// Scramble depth per grid size.
    pub shuffle_moves: ShuffleMoves,
    /// Seed for the shuffle random number generator.
    pub seed: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_TOUCH_DEBOUNCE,
            slide_duration: DEFAULT_SLIDE_DURATION,
            flash_duration: DEFAULT_FLASH_DURATION,
            notice_duration: DEFAULT_NOTICE_DURATION,
            shuffle_moves: ShuffleMoves::default(),
            seed: 0x7113_5e55_10e5,
        }
    }
}
