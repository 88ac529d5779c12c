#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Polled scheduler for the single tile slide that may be in flight.

use std::time::Duration;

use glam::Vec2;
use thiserror::Error;
use tileslide_core::{Slot, Tile, Timestamp, DEFAULT_SLIDE_DURATION};

/// Describes one tile travelling from its old slot into the vacated one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slide {
    /// Tile being animated.
    pub tile: Tile,
    /// Slot the tile left.
    pub from: Slot,
    /// Slot the tile is travelling to.
    pub to: Slot,
    /// Pixel centre of `from`.
    pub from_center: Vec2,
    /// Pixel centre of `to`.
    pub to_center: Vec2,
}

impl Slide {
    /// Creates a new slide descriptor.
    #[must_use]
    pub const fn new(tile: Tile, from: Slot, to: Slot, from_center: Vec2, to_center: Vec2) -> Self {
        Self {
            tile,
            from,
            to,
            from_center,
            to_center,
        }
    }

    /// Pixel centre of the tile at the provided progress fraction.
    #[must_use]
    pub fn position_at(&self, progress: f32) -> Vec2 {
        self.from_center.lerp(self.to_center, progress.clamp(0.0, 1.0))
    }
}

/// Result of polling the animator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationStatus {
    /// No slide is in flight.
    Idle,
    /// A slide is still travelling.
    InProgress {
        /// Slide being animated.
        slide: Slide,
        /// Fraction of the duration elapsed, in `[0, 1)`.
        progress: f32,
        /// Interpolated pixel centre of the tile.
        position: Vec2,
    },
    /// The slide reached its destination on this poll. Reported once.
    Complete {
        /// Slide that finished.
        slide: Slide,
    },
}

/// Error returned when a slide is started while another one is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("slide of {tile:?} from {from:?} is still in flight")]
pub struct AnimationBusy {
    /// Tile of the slide that is still running.
    pub tile: Tile,
    /// Slot the running slide started from.
    pub from: Slot,
}

/// Time-driven interpolation of at most one tile slide.
#[derive(Clone, Debug)]
pub struct SlideAnimator {
    duration: Duration,
    active: Option<(Slide, Timestamp)>,
}

impl Default for SlideAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_SLIDE_DURATION)
    }
}

impl SlideAnimator {
    /// Creates an idle animator whose slides last `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: None,
        }
    }

    /// Reports whether a slide is in flight.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Begins animating `slide` from `now`. Only valid while idle.
    pub fn start(&mut self, slide: Slide, now: Timestamp) -> Result<(), AnimationBusy> {
        if let Some((running, _)) = &self.active {
            return Err(AnimationBusy {
                tile: running.tile,
                from: running.from,
            });
        }
        log::trace!(
            "slide tile {} {} -> {}",
            slide.tile.get(),
            slide.from.get(),
            slide.to.get()
        );
        self.active = Some((slide, now));
        Ok(())
    }

    /// Advances the in-flight slide to `now`.
    ///
    /// Returns [`AnimationStatus::Complete`] exactly once per started slide,
    /// after which the animator is idle again.
    pub fn advance(&mut self, now: Timestamp) -> AnimationStatus {
        let Some((slide, started)) = self.active else {
            return AnimationStatus::Idle;
        };

        let progress = self.progress(now.saturating_duration_since(started));
        if progress >= 1.0 {
            self.active = None;
            return AnimationStatus::Complete { slide };
        }

        AnimationStatus::InProgress {
            slide,
            progress,
            position: slide.position_at(progress),
        }
    }

    /// Abandons the in-flight slide without reporting completion.
    pub fn cancel(&mut self) -> Option<Slide> {
        self.active.take().map(|(slide, _)| slide)
    }

    fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}
