#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game controller that drives menus, play and the win screen from polled input.
//!
//! The controller owns the authoritative [`World`] and every piece of
//! real-time state around it. Each call to [`GameController::tick`] runs one
//! loop iteration: advance the slide animation, expire the tap flash, debounce
//! the touch sample and route a fresh press by screen, then refresh the status
//! bar. Rendering, storage and sound are reached only through the collaborator
//! traits.

mod config;
mod session;

use std::time::Duration;

use glam::IVec2;
use thiserror::Error;
use tileslide_assets::{AssetError, AssetStore, Catalog};
use tileslide_audio::{AudioSink, Cue};
use tileslide_core::{BoardRejection, Command, Difficulty, Event, Feedback, Slot, Tile, Timestamp};
use tileslide_rendering::{
    BoardGeometry, Display, DrawRequest, ScreenChrome, ScreenLayout, StatusLine,
    SELECT_VISIBLE_ENTRIES,
};
use tileslide_system_animation::{AnimationStatus, Slide, SlideAnimator};
use tileslide_system_input::{TouchDebouncer, TouchSample};
use tileslide_world::{self as world, query, World};

pub use config::{ControllerConfig, ShuffleMoves};
pub use session::{GameTimer, Outcome, Screen, Session};

const LOAD_FAILED_NOTICE: &str = "Failed to load image!";
const BOARD_REJECTED_NOTICE: &str = "Invalid board!";

/// Reasons a puzzle could not be started.
#[derive(Debug, Error)]
pub enum StartError {
    /// The catalog has no entry at the requested position.
    #[error("no {difficulty:?} puzzle at catalog index {index}")]
    UnknownEntry {
        /// Requested difficulty.
        difficulty: Difficulty,
        /// Requested position within the difficulty.
        index: usize,
    },
    /// The picture could not be loaded.
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// The supplied board was refused.
    #[error("board rejected: {0}")]
    Board(#[from] BoardRejection),
}

impl StartError {
    fn notice(&self) -> &'static str {
        match self {
            Self::UnknownEntry { .. } | Self::Asset(_) => LOAD_FAILED_NOTICE,
            Self::Board(_) => BOARD_REJECTED_NOTICE,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Flash {
    slot: Slot,
    since: Timestamp,
}

#[derive(Clone, Copy, Debug)]
struct Notice {
    until: Timestamp,
}

/// Top-level state machine of the game.
#[derive(Debug)]
pub struct GameController<S, D, A> {
    config: ControllerConfig,
    layout: ScreenLayout,
    catalog: Catalog,
    store: S,
    display: D,
    audio: A,
    world: World,
    animator: SlideAnimator,
    debouncer: TouchDebouncer,
    screen: Screen,
    flash: Option<Flash>,
    notice: Option<Notice>,
    shown_status: Option<StatusLine>,
    events: Vec<Event>,
}

impl<S, D, A> GameController<S, D, A>
where
    S: AssetStore,
    D: Display,
    A: AudioSink,
{
    /// Creates a controller sitting on the main menu. Nothing is drawn until [`Self::boot`].
    #[must_use]
    pub fn new(config: ControllerConfig, catalog: Catalog, store: S, display: D, audio: A) -> Self {
        Self {
            layout: ScreenLayout::PANEL,
            catalog,
            store,
            display,
            audio,
            world: World::with_seed(config.seed),
            animator: SlideAnimator::new(config.slide_duration),
            debouncer: TouchDebouncer::new(config.debounce),
            screen: Screen::MainMenu,
            flash: None,
            notice: None,
            shown_status: None,
            events: Vec::new(),
            config,
        }
    }

    /// Draws the main menu.
    pub fn boot(&mut self) {
        log::info!(
            "tile slide ready: {} puzzles in catalog",
            self.catalog.len()
        );
        self.show_main_menu();
    }

    /// Runs one loop iteration with the latest touch sample.
    pub fn tick(&mut self, sample: TouchSample, now: Timestamp) {
        self.advance_animation(now);
        self.expire_flash(now);
        self.expire_notice(now);

        if let Some(press) = self.debouncer.observe(sample, now) {
            self.dispatch(press.point, press.at);
        }

        self.refresh_status(now);
    }

    /// Starts playing a catalog entry with an externally supplied board instead of a shuffle.
    ///
    /// The board must be solvable and not already solved. A rejected board or
    /// a failed image load leaves the controller on the main menu behind a
    /// notice, exactly like a failed load from the menu.
    pub fn start_with_board(
        &mut self,
        difficulty: Difficulty,
        index: usize,
        tiles: Vec<Tile>,
        now: Timestamp,
    ) -> Result<(), StartError> {
        self.leave_playing();
        self.screen = Screen::MainMenu;
        self.enter_playing(difficulty, index, Some(tiles), now)
            .map_err(|error| {
                self.fail_start(&error, now);
                error
            })
    }

    /// Screen currently shown.
    #[must_use]
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Authoritative puzzle state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Reports whether a tile slide is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Reports whether a failure notice is covering the screen.
    #[must_use]
    pub const fn notice_active(&self) -> bool {
        self.notice.is_some()
    }

    /// Clock of the current session at `now`, or the final time on the win screen.
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> Option<Duration> {
        match &self.screen {
            Screen::Playing(session) => Some(session.timer.elapsed(now)),
            Screen::WinScreen { outcome, .. } => Some(outcome.elapsed),
            Screen::MainMenu | Screen::PuzzleSelect { .. } => None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Screen layout used for drawing and hit testing.
    #[must_use]
    pub const fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    /// Display collaborator.
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// Audio collaborator.
    #[must_use]
    pub const fn audio(&self) -> &A {
        &self.audio
    }

    /// Asset store collaborator.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn dispatch(&mut self, point: IVec2, now: Timestamp) {
        if self.notice.is_some() {
            log::debug!("press ignored while notice is shown");
            return;
        }

        match &self.screen {
            Screen::MainMenu => {
                if let Some(difficulty) = Difficulty::ALL
                    .into_iter()
                    .find(|difficulty| self.layout.difficulty_button(*difficulty).contains(point))
                {
                    self.show_puzzle_select(difficulty);
                }
            }
            Screen::PuzzleSelect { difficulty } => {
                let difficulty = *difficulty;
                if self.layout.select_back().contains(point) {
                    self.show_main_menu();
                    return;
                }
                let listed = self
                    .catalog
                    .entries(difficulty)
                    .len()
                    .min(SELECT_VISIBLE_ENTRIES);
                if let Some(index) = (0..listed).find(|index| {
                    self.layout
                        .select_entry(*index)
                        .is_some_and(|rect| rect.contains(point))
                }) {
                    self.start_game(difficulty, index, now);
                }
            }
            Screen::Playing(_) => self.handle_playing_press(point, now),
            Screen::WinScreen { session, .. } => {
                let (difficulty, index) = (session.difficulty(), session.puzzle_index());
                if self.layout.win_play_again().contains(point) {
                    log::info!("play again");
                    self.start_game(difficulty, index, now);
                } else if self.layout.win_menu().contains(point) {
                    self.show_main_menu();
                }
            }
        }
    }

    fn handle_playing_press(&mut self, point: IVec2, now: Timestamp) {
        if self.layout.button_bar().contains(point) {
            if self.layout.playing_back().contains(point) {
                self.back_to_puzzle_select();
            } else if self.layout.playing_restart().contains(point) {
                self.restart(now);
            }
            return;
        }

        if self.animator.is_running() {
            log::debug!("board tap dropped: slide in progress");
            return;
        }

        let Some(size) = query::grid_size(&self.world) else {
            return;
        };
        let geometry = self.layout.board(size);
        let Some(slot) = geometry.slot_at(point) else {
            return;
        };

        self.clear_flash();
        self.events.clear();
        world::apply(&mut self.world, Command::MoveTile { slot }, &mut self.events);

        let mut feedback = Feedback::Rejected;
        for event in &self.events {
            match *event {
                Event::TileMoved {
                    tile,
                    from,
                    to,
                    move_count,
                } => {
                    feedback = Feedback::Accepted;
                    log::debug!(
                        "tile {} moved {} -> {} (move {move_count})",
                        tile.get(),
                        from.get(),
                        to.get()
                    );
                    if let Screen::Playing(session) = &mut self.screen {
                        session.timer.start(now);
                    }
                    let slide = Slide::new(
                        tile,
                        from,
                        to,
                        geometry.slot_center(from),
                        geometry.slot_center(to),
                    );
                    if let Err(busy) = self.animator.start(slide, now) {
                        log::warn!("{busy}");
                    }
                }
                Event::MoveRejected { slot, reason } => {
                    log::debug!("tap on slot {} refused: {reason}", slot.get());
                }
                Event::PuzzleSolved { move_count } => {
                    log::debug!("solved in {move_count} moves, waiting for slide");
                }
                _ => {}
            }
        }

        self.flash = Some(Flash { slot, since: now });
        self.display.draw(DrawRequest::Flash {
            slot,
            geometry,
            feedback,
        });
        self.audio.play(match feedback {
            Feedback::Accepted => Cue::Slide,
            Feedback::Rejected => Cue::Error,
        });
    }

    fn advance_animation(&mut self, now: Timestamp) {
        let status = self.animator.advance(now);
        let Self {
            screen,
            world,
            layout,
            display,
            ..
        } = self;
        let Screen::Playing(session) = screen else {
            return;
        };
        let Some(size) = query::grid_size(world) else {
            return;
        };
        let geometry = layout.board(size);

        match status {
            AnimationStatus::Idle => {}
            AnimationStatus::InProgress {
                slide, position, ..
            } => {
                display.draw(DrawRequest::SlideTrail(
                    geometry.slide_trail(slide.from, slide.to),
                ));
                display.draw(DrawRequest::Tile {
                    tile: slide.tile,
                    slot: slide.to,
                    geometry,
                    position: Some(position),
                    image: Some(session.image()),
                });
            }
            AnimationStatus::Complete { slide } => {
                for slot in [slide.from, slide.to] {
                    draw_tile(display, world, geometry, slot, session.image());
                }
                self.shown_status = None;
                if query::is_won(&self.world) {
                    self.finish(now);
                }
            }
        }
    }

    fn expire_flash(&mut self, now: Timestamp) {
        let Some(flash) = self.flash else {
            return;
        };
        if now.saturating_duration_since(flash.since) >= self.config.flash_duration {
            self.clear_flash();
        }
    }

    fn clear_flash(&mut self) {
        let Some(flash) = self.flash.take() else {
            return;
        };
        if self.animator.is_running() {
            return;
        }
        let Self {
            screen,
            world,
            layout,
            display,
            ..
        } = self;
        if let (Screen::Playing(session), Some(size)) = (screen, query::grid_size(world)) {
            draw_tile(display, world, layout.board(size), flash.slot, session.image());
        }
    }

    fn expire_notice(&mut self, now: Timestamp) {
        if self.notice.is_some_and(|notice| now >= notice.until) {
            self.notice = None;
            self.show_main_menu();
        }
    }

    fn refresh_status(&mut self, now: Timestamp) {
        if self.animator.is_running() {
            return;
        }
        let Screen::Playing(session) = &self.screen else {
            return;
        };
        let line = StatusLine::new(query::move_count(&self.world), session.timer.elapsed(now));
        if self.shown_status != Some(line) {
            self.display.draw(DrawRequest::StatusBar(line));
            self.shown_status = Some(line);
        }
    }

    fn show_main_menu(&mut self) {
        self.leave_playing();
        self.screen = Screen::MainMenu;
        log::info!("main menu");
        self.display.draw(DrawRequest::Screen(ScreenChrome::MainMenu));
    }

    fn show_puzzle_select(&mut self, difficulty: Difficulty) {
        self.leave_playing();
        self.screen = Screen::PuzzleSelect { difficulty };
        log::info!("puzzle select: {}", difficulty.label());
        let titles = self
            .catalog
            .entries(difficulty)
            .iter()
            .take(SELECT_VISIBLE_ENTRIES)
            .map(|entry| entry.title.as_str())
            .collect();
        self.display
            .draw(DrawRequest::Screen(ScreenChrome::PuzzleSelect {
                difficulty,
                titles,
            }));
    }

    fn back_to_puzzle_select(&mut self) {
        let difficulty = match &self.screen {
            Screen::Playing(session) => session.difficulty(),
            _ => return,
        };
        log::info!("back to puzzle select");
        self.show_puzzle_select(difficulty);
    }

    fn start_game(&mut self, difficulty: Difficulty, index: usize, now: Timestamp) {
        self.leave_playing();
        // Drop the resident image before loading the next one.
        self.screen = Screen::MainMenu;
        if let Err(error) = self.enter_playing(difficulty, index, None, now) {
            self.fail_start(&error, now);
        }
    }

    fn enter_playing(
        &mut self,
        difficulty: Difficulty,
        index: usize,
        board: Option<Vec<Tile>>,
        now: Timestamp,
    ) -> Result<(), StartError> {
        let entry = self
            .catalog
            .entry(difficulty, index)
            .cloned()
            .ok_or(StartError::UnknownEntry { difficulty, index })?;

        log::info!("starting {} ({})", entry.title, difficulty.label());
        self.display.draw(DrawRequest::Screen(ScreenChrome::Loading {
            title: &entry.title,
        }));
        let image = self.store.load_image(&entry)?;

        let size = difficulty.grid_size();
        self.events.clear();
        match board {
            None => {
                world::apply(&mut self.world, Command::ResetPuzzle { size }, &mut self.events);
                world::apply(
                    &mut self.world,
                    Command::ShufflePuzzle {
                        moves: self.config.shuffle_moves.for_size(size),
                    },
                    &mut self.events,
                );
            }
            Some(tiles) => {
                world::apply(
                    &mut self.world,
                    Command::LoadBoard { size, tiles },
                    &mut self.events,
                );
                if let Some(reason) = self.events.iter().find_map(|event| match event {
                    Event::BoardRejected { reason } => Some(*reason),
                    _ => None,
                }) {
                    return Err(StartError::Board(reason));
                }
            }
        }

        self.screen = Screen::Playing(Session::new(difficulty, index, entry.title, image));
        self.draw_playing(now);
        Ok(())
    }

    fn fail_start(&mut self, error: &StartError, now: Timestamp) {
        log::warn!("could not start puzzle: {error}");
        self.leave_playing();
        self.screen = Screen::MainMenu;
        self.notice = Some(Notice {
            until: now.saturating_add(self.config.notice_duration),
        });
        self.display.draw(DrawRequest::Screen(ScreenChrome::Notice {
            message: error.notice(),
        }));
    }

    fn restart(&mut self, now: Timestamp) {
        log::info!("restarting puzzle");
        let _ = self.animator.cancel();
        self.flash = None;
        let Some(size) = query::grid_size(&self.world) else {
            return;
        };
        self.events.clear();
        world::apply(&mut self.world, Command::ResetPuzzle { size }, &mut self.events);
        world::apply(
            &mut self.world,
            Command::ShufflePuzzle {
                moves: self.config.shuffle_moves.for_size(size),
            },
            &mut self.events,
        );
        if let Screen::Playing(session) = &mut self.screen {
            session.timer = GameTimer::NotStarted;
        }
        self.draw_playing(now);
    }

    fn finish(&mut self, now: Timestamp) {
        let mut session = match std::mem::replace(&mut self.screen, Screen::MainMenu) {
            Screen::Playing(session) => session,
            other => {
                self.screen = other;
                return;
            }
        };
        session.timer.stop(now);
        let outcome = Outcome {
            moves: query::move_count(&self.world),
            elapsed: session.timer.elapsed(now),
        };
        log::info!(
            "puzzle solved: {} moves in {}",
            outcome.moves,
            tileslide_rendering::format_clock(outcome.elapsed.as_secs())
        );

        self.audio.play(Cue::Win);
        self.leave_playing();
        self.display.draw(DrawRequest::Screen(ScreenChrome::Win {
            difficulty: session.difficulty(),
            result: StatusLine::new(outcome.moves, outcome.elapsed),
            preview: Some(session.image()),
            preview_area: self.layout.win_preview(),
        }));
        self.screen = Screen::WinScreen { session, outcome };
    }

    /// Abandons any in-flight slide and drops the puzzle.
    fn leave_playing(&mut self) {
        if self.animator.cancel().is_some() {
            log::debug!("slide cancelled");
        }
        self.flash = None;
        self.shown_status = None;
        self.events.clear();
        world::apply(&mut self.world, Command::DiscardPuzzle, &mut self.events);
    }

    fn draw_playing(&mut self, now: Timestamp) {
        let Self {
            screen,
            world,
            layout,
            display,
            ..
        } = self;
        let (Screen::Playing(session), Some(size)) = (&*screen, query::grid_size(world)) else {
            return;
        };
        display.draw(DrawRequest::Screen(ScreenChrome::Playing {
            difficulty: session.difficulty(),
            title: session.title(),
        }));
        let geometry = layout.board(size);
        for index in 0..size.slot_count() as u32 {
            draw_tile(display, world, geometry, Slot::new(index), session.image());
        }
        let line = StatusLine::new(query::move_count(world), session.timer.elapsed(now));
        display.draw(DrawRequest::StatusBar(line));
        self.shown_status = Some(line);
    }
}

fn draw_tile<D: Display>(
    display: &mut D,
    world: &World,
    geometry: BoardGeometry,
    slot: Slot,
    image: &tileslide_core::PuzzleImage,
) {
    let Some(tile) = query::tile_at(world, slot) else {
        return;
    };
    display.draw(DrawRequest::Tile {
        tile,
        slot,
        geometry,
        position: None,
        image: Some(image),
    });
}
