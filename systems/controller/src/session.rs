use std::time::Duration;

use tileslide_core::{Difficulty, PuzzleImage, Timestamp};

/// Game clock: idle until the first move, frozen once the puzzle is solved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameTimer {
    /// No move has been made yet.
    #[default]
    NotStarted,
    /// Counting since the first accepted move.
    Running {
        /// Moment of the first accepted move.
        since: Timestamp,
    },
    /// Frozen at the solved moment.
    Stopped {
        /// Time from the first move until the solve.
        elapsed: Duration,
    },
}

impl GameTimer {
    /// Starts the clock unless it already started.
    pub fn start(&mut self, now: Timestamp) {
        if let Self::NotStarted = self {
            *self = Self::Running { since: now };
        }
    }

    /// Freezes a running clock.
    pub fn stop(&mut self, now: Timestamp) {
        if let Self::Running { since } = *self {
            *self = Self::Stopped {
                elapsed: now.saturating_duration_since(since),
            };
        }
    }

    /// Time shown on the clock at `now`.
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> Duration {
        match *self {
            Self::NotStarted => Duration::ZERO,
            Self::Running { since } => now.saturating_duration_since(since),
            Self::Stopped { elapsed } => elapsed,
        }
    }

    /// Reports whether the clock is counting.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Catalog entry being played, its picture and its clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    difficulty: Difficulty,
    puzzle_index: usize,
    title: String,
    image: PuzzleImage,
    pub(crate) timer: GameTimer,
}

impl Session {
    pub(crate) fn new(
        difficulty: Difficulty,
        puzzle_index: usize,
        title: String,
        image: PuzzleImage,
    ) -> Self {
        Self {
            difficulty,
            puzzle_index,
            title,
            image,
            timer: GameTimer::NotStarted,
        }
    }

    /// Difficulty the puzzle was picked from.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Position of the puzzle within its difficulty's catalog.
    #[must_use]
    pub const fn puzzle_index(&self) -> usize {
        self.puzzle_index
    }

    /// Display title of the puzzle.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Picture the tiles are cut from.
    #[must_use]
    pub const fn image(&self) -> &PuzzleImage {
        &self.image
    }

    /// Game clock.
    #[must_use]
    pub const fn timer(&self) -> GameTimer {
        self.timer
    }
}

/// Final score of a solved puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Scored moves.
    pub moves: u32,
    /// Time from the first move until the last slide finished.
    pub elapsed: Duration,
}

/// Screen the controller is showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Difficulty buttons.
    MainMenu,
    /// Catalog list for one difficulty.
    PuzzleSelect {
        /// Difficulty whose catalog is listed.
        difficulty: Difficulty,
    },
    /// Board being played.
    Playing(Session),
    /// Result of a solved board.
    WinScreen {
        /// Session that was solved. Kept for the preview and Play Again.
        session: Session,
        /// Final score.
        outcome: Outcome,
    },
}

impl Screen {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MainMenu => "main menu",
            Self::PuzzleSelect { .. } => "puzzle select",
            Self::Playing(_) => "playing",
            Self::WinScreen { .. } => "win screen",
        }
    }

    /// Session being played or just solved.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Playing(session) | Self::WinScreen { session, .. } => Some(session),
            Self::MainMenu | Self::PuzzleSelect { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_starts_once_and_freezes_on_stop() {
        let mut timer = GameTimer::default();
        assert_eq!(timer.elapsed(Timestamp::from_millis(5_000)), Duration::ZERO);

        timer.start(Timestamp::from_millis(1_000));
        timer.start(Timestamp::from_millis(2_000));
        assert!(timer.is_running());
        assert_eq!(
            timer.elapsed(Timestamp::from_millis(3_500)),
            Duration::from_millis(2_500)
        );

        timer.stop(Timestamp::from_millis(4_000));
        assert_eq!(
            timer.elapsed(Timestamp::from_millis(60_000)),
            Duration::from_millis(3_000)
        );
        timer.start(Timestamp::from_millis(70_000));
        assert!(!timer.is_running());
    }

    #[test]
    fn stopping_an_idle_timer_keeps_it_idle() {
        let mut timer = GameTimer::NotStarted;
        timer.stop(Timestamp::from_millis(10));
        assert_eq!(timer, GameTimer::NotStarted);
    }
}
