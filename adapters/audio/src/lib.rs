#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Audio feedback contracts for Tile Slide adapters.

use std::time::Duration;

/// Single square-wave note. A zero frequency is a rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tone {
    /// Pitch in hertz.
    pub frequency_hz: u32,
    /// How long the note or rest lasts.
    pub duration: Duration,
}

impl Tone {
    /// Creates a note.
    #[must_use]
    pub const fn new(frequency_hz: u32, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
        }
    }

    /// Creates a silent gap.
    #[must_use]
    pub const fn rest(duration_ms: u64) -> Self {
        Self::new(0, duration_ms)
    }

    /// Reports whether this tone is silent.
    #[must_use]
    pub const fn is_rest(&self) -> bool {
        self.frequency_hz == 0
    }
}

const SLIDE: [Tone; 1] = [Tone::new(500, 50)];
const ERROR: [Tone; 1] = [Tone::new(200, 100)];
const WIN: [Tone; 5] = [
    Tone::new(262, 200),
    Tone::rest(50),
    Tone::new(330, 200),
    Tone::rest(50),
    Tone::new(392, 200),
];

/// Game moments that have a sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// A tile slid.
    Slide,
    /// A tapped tile could not move.
    Error,
    /// The puzzle was solved.
    Win,
}

impl Cue {
    /// Notes and rests that make up the cue, in playback order.
    #[must_use]
    pub const fn tones(self) -> &'static [Tone] {
        match self {
            Self::Slide => &SLIDE,
            Self::Error => &ERROR,
            Self::Win => &WIN,
        }
    }

    /// Total playback time including rests.
    #[must_use]
    pub fn duration(self) -> Duration {
        self.tones().iter().map(|tone| tone.duration).sum()
    }
}

/// Sound collaborator driven by the game controller.
pub trait AudioSink {
    /// Starts playing the cue.
    fn play(&mut self, cue: Cue);
}

impl<A: AudioSink + ?Sized> AudioSink for &mut A {
    fn play(&mut self, cue: Cue) {
        (**self).play(cue);
    }
}
