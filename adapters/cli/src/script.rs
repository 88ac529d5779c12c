//! Touch scripts replayed by `tileslide play`.
//!
//! One touch per line: `at_ms x y [hold_ms]`. Everything after `#` is a
//! comment. Touches must be listed in time order. Every touch is held for at
//! least one loop tick and is separated from the previous one by at least one
//! released tick, so the replay loop sees each press and each release.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, ensure, Context, Result};
use glam::IVec2;
use tileslide_core::Timestamp;
use tileslide_system_input::TouchSample;

/// Simulated loop period for scripted play.
pub(crate) const TICK: Duration = Duration::from_millis(10);

const DEFAULT_HOLD: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScriptedTouch {
    pub(crate) at: Timestamp,
    pub(crate) point: IVec2,
    pub(crate) hold: Duration,
}

impl ScriptedTouch {
    fn until(&self) -> Timestamp {
        self.at.saturating_add(self.hold)
    }

    fn is_held_at(&self, now: Timestamp) -> bool {
        self.at <= now && now < self.until()
    }
}

/// Ordered list of touches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TouchScript {
    touches: Vec<ScriptedTouch>,
}

impl TouchScript {
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read touch script {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid touch script {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let mut touches: Vec<ScriptedTouch> = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let text = line.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }
            let touch =
                parse_touch(text).with_context(|| format!("line {line_number}: `{text}`"))?;
            if let Some(previous) = touches.last() {
                ensure!(
                    touch.at >= previous.until().saturating_add(TICK),
                    "line {line_number}: touch at {} ms starts less than {} ms after the previous one is released",
                    touch.at.as_millis(),
                    TICK.as_millis()
                );
            }
            touches.push(touch);
        }
        Ok(Self { touches })
    }

    pub(crate) fn touches(&self) -> &[ScriptedTouch] {
        &self.touches
    }

    /// Panel state at `now`.
    pub(crate) fn sample_at(&self, now: Timestamp) -> TouchSample {
        self.touches
            .iter()
            .find(|touch| touch.is_held_at(now))
            .map_or(TouchSample::released(), |touch| TouchSample {
                pressed: true,
                point: touch.point,
            })
    }

    /// Moment the last touch is released.
    pub(crate) fn end(&self) -> Timestamp {
        self.touches
            .last()
            .map_or(Timestamp::ZERO, ScriptedTouch::until)
    }
}

fn parse_touch(text: &str) -> Result<ScriptedTouch> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let (at, x, y, hold) = match fields.as_slice() {
        [at, x, y] => (*at, *x, *y, None),
        [at, x, y, hold] => (*at, *x, *y, Some(*hold)),
        _ => bail!("expected `at_ms x y [hold_ms]`, found {} fields", fields.len()),
    };

    let at: u64 = at.parse().context("at_ms is not a whole number")?;
    let x: i32 = x.parse().context("x is not an integer")?;
    let y: i32 = y.parse().context("y is not an integer")?;
    let hold = match hold {
        Some(hold) => {
            let hold: u64 = hold.parse().context("hold_ms is not a whole number")?;
            let hold = Duration::from_millis(hold);
            ensure!(
                hold >= TICK,
                "hold_ms must be at least {} ms",
                TICK.as_millis()
            );
            hold
        }
        None => DEFAULT_HOLD,
    };

    Ok(ScriptedTouch {
        at: Timestamp::from_millis(at),
        point: IVec2::new(x, y),
        hold,
    })
}
