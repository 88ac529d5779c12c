#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Touch debouncing system that turns polled touch samples into discrete presses.

use std::time::Duration;

use glam::IVec2;
use tileslide_core::{Timestamp, DEFAULT_TOUCH_DEBOUNCE};

/// Raw touch-controller reading taken once per loop tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    /// Indicates whether the panel reports contact on this poll.
    pub pressed: bool,
    /// Screen coordinates of the contact, meaningful only while pressed.
    pub point: IVec2,
}

impl TouchSample {
    /// Creates a sample reporting contact at the provided screen coordinates.
    #[must_use]
    pub const fn pressed(x: i32, y: i32) -> Self {
        Self {
            pressed: true,
            point: IVec2::new(x, y),
        }
    }

    /// Creates a sample reporting no contact.
    #[must_use]
    pub const fn released() -> Self {
        Self {
            pressed: false,
            point: IVec2::ZERO,
        }
    }
}

/// Discrete press accepted by the debouncer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Press {
    /// Screen coordinates where the press landed.
    pub point: IVec2,
    /// Moment the press was accepted.
    pub at: Timestamp,
}

/// Rising-edge detector with a minimum interval between accepted presses.
#[derive(Clone, Debug)]
pub struct TouchDebouncer {
    interval: Duration,
    previous_pressed: bool,
    last_accepted: Option<Timestamp>,
}

impl Default for TouchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCH_DEBOUNCE)
    }
}

impl TouchDebouncer {
    /// Creates a debouncer enforcing the provided interval between presses.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            previous_pressed: false,
            last_accepted: None,
        }
    }

    /// Feeds one poll into the debouncer, returning a press when one is accepted.
    ///
    /// A press is accepted only on a released-to-pressed edge and only once the
    /// interval has elapsed since the previously accepted press. Holding the
    /// panel never repeats.
    pub fn observe(&mut self, sample: TouchSample, now: Timestamp) -> Option<Press> {
        let rising_edge = sample.pressed && !self.previous_pressed;
        self.previous_pressed = sample.pressed;

        if !rising_edge {
            return None;
        }

        if let Some(last) = self.last_accepted {
            let since = now.saturating_duration_since(last);
            if since < self.interval {
                log::trace!(
                    "touch at ({}, {}) dropped {}ms after previous press",
                    sample.point.x,
                    sample.point.y,
                    since.as_millis()
                );
                return None;
            }
        }

        self.last_accepted = Some(now);
        log::debug!(
            "press accepted at ({}, {}) t={}ms",
            sample.point.x,
            sample.point.y,
            now.as_millis()
        );
        Some(Press {
            point: sample.point,
            at: now,
        })
    }
}
