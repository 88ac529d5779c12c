//! Headless collaborators that report through the logger instead of a panel.

use tileslide_audio::{AudioSink, Cue};
use tileslide_rendering::{Display, DrawRequest, ScreenChrome};

/// Display that logs every draw request and keeps a tally.
#[derive(Debug, Default)]
pub(crate) struct TerminalDisplay {
    draws: usize,
    last_screen: Option<String>,
}

impl TerminalDisplay {
    pub(crate) const fn draws(&self) -> usize {
        self.draws
    }

    pub(crate) fn last_screen(&self) -> Option<&str> {
        self.last_screen.as_deref()
    }
}

impl Display for TerminalDisplay {
    fn draw(&mut self, request: DrawRequest<'_>) {
        self.draws += 1;
        match request {
            DrawRequest::Screen(chrome) => {
                let summary = describe(&chrome);
                log::info!("screen: {summary}");
                self.last_screen = Some(summary);
            }
            DrawRequest::Tile {
                tile,
                slot,
                geometry,
                position,
                image,
            } => {
                let source = image.and_then(|image| geometry.image_source(tile, image.side()));
                match position {
                    Some(position) => log::trace!(
                        "tile {} sliding into slot {} at ({:.1}, {:.1}) from {source:?}",
                        tile.get(),
                        slot.get(),
                        position.x,
                        position.y
                    ),
                    None => log::trace!(
                        "tile {} in slot {} from {source:?}",
                        tile.get(),
                        slot.get()
                    ),
                }
            }
            DrawRequest::SlideTrail(rect) => log::trace!("clear trail {rect:?}"),
            DrawRequest::StatusBar(line) => {
                log::debug!("status: moves {} time {}", line.moves, line.clock());
            }
            DrawRequest::Flash { slot, feedback, .. } => {
                log::debug!("flash slot {} ({feedback:?})", slot.get());
            }
        }
    }
}

fn describe(chrome: &ScreenChrome<'_>) -> String {
    match chrome {
        ScreenChrome::MainMenu => "main menu".to_owned(),
        ScreenChrome::PuzzleSelect { difficulty, titles } => {
            format!("{} puzzles [{}]", difficulty.label(), titles.join(", "))
        }
        ScreenChrome::Loading { title } => format!("loading {title}"),
        ScreenChrome::Notice { message } => format!("notice: {message}"),
        ScreenChrome::Playing { difficulty, title } => {
            format!("playing {title} ({})", difficulty.label())
        }
        ScreenChrome::Win {
            difficulty,
            result,
            preview,
            preview_area,
        } => {
            let mut summary = format!(
                "solved {} in {} moves, {}",
                difficulty.label(),
                result.moves,
                result.clock()
            );
            if preview.is_some() {
                summary.push_str(&format!(
                    ", preview {}x{} at ({}, {})",
                    preview_area.width, preview_area.height, preview_area.x, preview_area.y
                ));
            }
            summary
        }
    }
}

/// Audio sink that logs cues and remembers them in order.
#[derive(Debug, Default)]
pub(crate) struct LoggingAudio {
    cues: Vec<Cue>,
}

impl LoggingAudio {
    pub(crate) fn cues(&self) -> &[Cue] {
        &self.cues
    }
}

impl AudioSink for LoggingAudio {
    fn play(&mut self, cue: Cue) {
        log::debug!("cue {cue:?} ({} ms)", cue.duration().as_millis());
        self.cues.push(cue);
    }
}
