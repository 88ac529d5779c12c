use std::{collections::HashSet, io, path::PathBuf, time::Duration};

use glam::IVec2;
use tileslide_assets::{AssetError, AssetStore, Catalog, CatalogEntry};
use tileslide_audio::{AudioSink, Cue};
use tileslide_core::{BoardRejection, Difficulty, Feedback, PuzzleImage, Slot, Tile, Timestamp};
use tileslide_rendering::{Display, DrawRequest, Rect, ScreenChrome, StatusLine};
use tileslide_system_controller::{
    ControllerConfig, GameController, GameTimer, Screen, StartError,
};
use tileslide_system_input::TouchSample;
use tileslide_world::query;

#[derive(Debug, Default)]
struct FakeStore {
    loads: Vec<String>,
    failing: HashSet<String>,
}

impl AssetStore for FakeStore {
    fn load_image(&mut self, entry: &CatalogEntry) -> Result<PuzzleImage, AssetError> {
        self.loads.push(entry.path.clone());
        if self.failing.contains(&entry.path) {
            return Err(AssetError::Io {
                path: PathBuf::from(&entry.path),
                source: io::Error::new(io::ErrorKind::NotFound, "missing"),
            });
        }
        Ok(PuzzleImage::from_pixels(4, vec![0; 16]).expect("valid image"))
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Drawn {
    Screen(String),
    Notice(String),
    Tile { tile: Tile, slot: Slot, sliding: bool },
    Trail,
    Status(StatusLine),
    Flash { slot: Slot, feedback: Feedback },
}

#[derive(Debug, Default)]
struct RecordingDisplay {
    draws: Vec<Drawn>,
}

impl Display for RecordingDisplay {
    fn draw(&mut self, request: DrawRequest<'_>) {
        let drawn = match request {
            DrawRequest::Screen(ScreenChrome::Notice { message }) => {
                Drawn::Notice(message.to_owned())
            }
            DrawRequest::Screen(chrome) => Drawn::Screen(
                match chrome {
                    ScreenChrome::MainMenu => "menu".to_owned(),
                    ScreenChrome::PuzzleSelect { titles, .. } => {
                        format!("select:{}", titles.join(","))
                    }
                    ScreenChrome::Loading { title } => format!("loading:{title}"),
                    ScreenChrome::Playing { title, .. } => format!("playing:{title}"),
                    ScreenChrome::Win { result, .. } => {
                        format!("win:{}:{}", result.moves, result.clock())
                    }
                    ScreenChrome::Notice { .. } => unreachable!("handled above"),
                },
            ),
            DrawRequest::Tile {
                tile,
                slot,
                position,
                ..
            } => Drawn::Tile {
                tile,
                slot,
                sliding: position.is_some(),
            },
            DrawRequest::SlideTrail(_) => Drawn::Trail,
            DrawRequest::StatusBar(line) => Drawn::Status(line),
            DrawRequest::Flash { slot, feedback, .. } => Drawn::Flash { slot, feedback },
        };
        self.draws.push(drawn);
    }
}

impl RecordingDisplay {
    fn screens(&self) -> Vec<&str> {
        self.draws
            .iter()
            .filter_map(|drawn| match drawn {
                Drawn::Screen(name) | Drawn::Notice(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn status_lines(&self) -> Vec<StatusLine> {
        self.draws
            .iter()
            .filter_map(|drawn| match drawn {
                Drawn::Status(line) => Some(*line),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct RecordingAudio {
    cues: Vec<Cue>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

struct Harness {
    controller: GameController<FakeStore, RecordingDisplay, RecordingAudio>,
    now: u64,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(ControllerConfig {
            seed: 99,
            ..ControllerConfig::default()
        })
    }

    fn with_config(config: ControllerConfig) -> Self {
        Self::with_store(config, FakeStore::default())
    }

    fn with_store(config: ControllerConfig, store: FakeStore) -> Self {
        let mut controller = GameController::new(
            config,
            Catalog::builtin(),
            store,
            RecordingDisplay::default(),
            RecordingAudio::default(),
        );
        controller.boot();
        Self {
            controller,
            now: 1_000,
        }
    }

    fn at(&self) -> Timestamp {
        Timestamp::from_millis(self.now)
    }

    fn idle(&mut self, millis: u64) {
        for _ in 0..millis / 10 {
            self.now += 10;
            self.controller.tick(TouchSample::released(), self.at());
        }
    }

    /// Touches and releases without waiting for anything to settle.
    fn press(&mut self, point: IVec2) {
        self.now += 10;
        self.controller
            .tick(TouchSample::pressed(point.x, point.y), self.at());
        self.now += 10;
        self.controller.tick(TouchSample::released(), self.at());
    }

    /// Touches, releases and waits past the debounce interval and any slide.
    fn tap(&mut self, point: IVec2) {
        self.press(point);
        self.idle(300);
    }

    fn tap_rect(&mut self, rect: Rect) {
        self.tap(rect.center().as_ivec2());
    }

    fn slot_point(&self, slot: u32) -> IVec2 {
        let size = query::grid_size(self.controller.world()).expect("puzzle active");
        self.controller
            .layout()
            .board(size)
            .slot_center(Slot::new(slot))
            .as_ivec2()
    }

    fn start_board(&mut self, values: &[u32]) {
        let tiles = values.iter().copied().map(Tile::new).collect();
        self.controller
            .start_with_board(Difficulty::Easy, 0, tiles, self.at())
            .expect("board accepted");
    }

    fn tiles(&self) -> Vec<u32> {
        query::tiles(self.controller.world())
            .expect("puzzle active")
            .iter()
            .map(|tile| tile.get())
            .collect()
    }

    fn draws(&self) -> &[Drawn] {
        &self.controller.display().draws
    }

    fn cues(&self) -> &[Cue] {
        &self.controller.audio().cues
    }
}

#[test]
fn boot_shows_main_menu() {
    let harness = Harness::new();

    assert_eq!(harness.controller.screen(), &Screen::MainMenu);
    assert_eq!(harness.controller.display().screens(), vec!["menu"]);
}

#[test]
fn difficulty_button_opens_puzzle_select_and_back_returns() {
    let mut harness = Harness::new();
    let layout = *harness.controller.layout();

    harness.tap_rect(layout.difficulty_button(Difficulty::Medium));
    assert_eq!(
        harness.controller.screen(),
        &Screen::PuzzleSelect {
            difficulty: Difficulty::Medium
        }
    );
    assert_eq!(
        harness.controller.display().screens().last().copied(),
        Some("select:Autumn Path,Fantasy Market,Robot Workshop,Sci-Fi Hangar,Beach Paradise")
    );

    harness.tap_rect(layout.select_back());
    assert_eq!(harness.controller.screen(), &Screen::MainMenu);
}

#[test]
fn taps_outside_buttons_do_nothing() {
    let mut harness = Harness::new();

    harness.tap(IVec2::new(5, 5));
    harness.tap(IVec2::new(240, 100));

    assert_eq!(harness.controller.screen(), &Screen::MainMenu);
    assert_eq!(harness.controller.display().screens(), vec!["menu"]);
}

#[test]
fn picking_an_entry_loads_image_and_shuffles() {
    let mut harness = Harness::new();
    let layout = *harness.controller.layout();

    harness.tap_rect(layout.difficulty_button(Difficulty::Hard));
    harness.tap_rect(layout.select_entry(2).expect("visible entry"));

    let Screen::Playing(session) = harness.controller.screen() else {
        panic!("expected playing, got {:?}", harness.controller.screen());
    };
    assert_eq!(session.title(), "Mechanical Gears");
    assert_eq!(session.puzzle_index(), 2);
    assert_eq!(session.timer(), GameTimer::NotStarted);
    assert_eq!(
        harness.controller.store().loads,
        vec!["puzzles/hard/gears.rgb565".to_owned()]
    );

    let world = harness.controller.world();
    assert_eq!(query::grid_size(world), Some(Difficulty::Hard.grid_size()));
    assert_eq!(query::move_count(world), 0);
    assert!(!query::is_won(world), "300 random slides should scramble the board");

    let screens = harness.controller.display().screens();
    assert!(screens.ends_with(&["loading:Mechanical Gears", "playing:Mechanical Gears"]));
    assert_eq!(
        harness.controller.display().status_lines().last(),
        Some(&StatusLine::default())
    );
}

#[test]
fn winning_slide_shows_win_screen_once_animation_completes() {
    let mut harness = Harness::new();
    harness.start_board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);

    let point = harness.slot_point(8);
    harness.press(point);

    assert!(harness.controller.is_animating());
    assert!(matches!(harness.controller.screen(), Screen::Playing(_)));
    assert_eq!(harness.tiles(), vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);

    harness.idle(300);

    let Screen::WinScreen { outcome, .. } = harness.controller.screen() else {
        panic!("expected win screen, got {:?}", harness.controller.screen());
    };
    assert_eq!(outcome.moves, 1);
    assert_eq!(outcome.elapsed, Duration::from_millis(180));
    assert_eq!(harness.cues(), &[Cue::Slide, Cue::Win]);
    assert!(query::puzzle(harness.controller.world()).is_none());
    assert_eq!(
        harness.controller.display().screens().last().copied(),
        Some("win:1:00:00")
    );
    assert!(harness.draws().contains(&Drawn::Tile {
        tile: Tile::new(8),
        slot: Slot::new(7),
        sliding: true,
    }));
}

#[test]
fn illegal_tap_flashes_and_buzzes_without_moving() {
    let mut harness = Harness::new();
    harness.start_board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
    let before = harness.tiles();

    let point = harness.slot_point(0);
    harness.tap(point);

    assert_eq!(harness.tiles(), before);
    assert_eq!(query::move_count(harness.controller.world()), 0);
    assert_eq!(harness.cues(), &[Cue::Error]);
    assert!(!harness.controller.is_animating());

    let flash = harness
        .draws()
        .iter()
        .position(|drawn| {
            *drawn
                == Drawn::Flash {
                    slot: Slot::new(0),
                    feedback: Feedback::Rejected,
                }
        })
        .expect("rejected flash drawn");
    assert!(
        harness.draws()[flash..].contains(&Drawn::Tile {
            tile: Tile::new(1),
            slot: Slot::new(0),
            sliding: false,
        }),
        "tile is redrawn once the flash expires"
    );

    let Screen::Playing(session) = harness.controller.screen() else {
        panic!("still playing");
    };
    assert_eq!(session.timer(), GameTimer::NotStarted);
}

#[test]
fn board_taps_during_slide_are_dropped() {
    let mut harness = Harness::with_config(ControllerConfig {
        debounce: Duration::from_millis(10),
        slide_duration: Duration::from_millis(500),
        ..ControllerConfig::default()
    });
    harness.start_board(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);

    let first = harness.slot_point(5);
    harness.press(first);
    assert!(harness.controller.is_animating());

    let second = harness.slot_point(8);
    harness.press(second);

    assert_eq!(query::move_count(harness.controller.world()), 1);
    assert_eq!(harness.tiles(), vec![1, 2, 3, 4, 5, 0, 7, 8, 6]);
    assert_eq!(harness.cues(), &[Cue::Slide]);

    harness.idle(600);
    assert!(!harness.controller.is_animating());
    harness.press(second);
    assert_eq!(harness.tiles(), vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
    assert_eq!(query::move_count(harness.controller.world()), 2);
}

#[test]
fn restart_during_slide_cancels_and_reshuffles() {
    let mut harness = Harness::with_config(ControllerConfig {
        slide_duration: Duration::from_millis(500),
        ..ControllerConfig::default()
    });
    harness.start_board(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);
    let restart = harness.controller.layout().playing_restart();

    let point = harness.slot_point(5);
    harness.press(point);
    assert!(harness.controller.is_animating());
    harness.idle(250);
    harness.tap_rect(restart);

    assert!(!harness.controller.is_animating());
    assert_eq!(query::move_count(harness.controller.world()), 0);
    let Screen::Playing(session) = harness.controller.screen() else {
        panic!("still playing after restart");
    };
    assert_eq!(session.timer(), GameTimer::NotStarted);
    assert_eq!(
        harness
            .controller
            .display()
            .screens()
            .iter()
            .filter(|name| name.starts_with("playing:"))
            .count(),
        2
    );
}

#[test]
fn back_from_playing_discards_puzzle() {
    let mut harness = Harness::new();
    harness.start_board(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);
    let back = harness.controller.layout().playing_back();

    harness.tap_rect(back);

    assert_eq!(
        harness.controller.screen(),
        &Screen::PuzzleSelect {
            difficulty: Difficulty::Easy
        }
    );
    assert!(query::puzzle(harness.controller.world()).is_none());
    assert_eq!(harness.controller.elapsed(harness.at()), None);
}

#[test]
fn button_bar_gaps_are_ignored() {
    let mut harness = Harness::new();
    harness.start_board(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);

    harness.tap(IVec2::new(240, 455));

    assert!(matches!(harness.controller.screen(), Screen::Playing(_)));
    assert!(harness.cues().is_empty());
}

#[test]
fn play_again_reloads_same_entry() {
    let mut harness = Harness::new();
    harness.start_board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
    let point = harness.slot_point(8);
    harness.tap(point);
    assert!(matches!(harness.controller.screen(), Screen::WinScreen { .. }));

    let again = harness.controller.layout().win_play_again();
    harness.tap_rect(again);

    let Screen::Playing(session) = harness.controller.screen() else {
        panic!("expected playing, got {:?}", harness.controller.screen());
    };
    assert_eq!(session.puzzle_index(), 0);
    assert_eq!(session.difficulty(), Difficulty::Easy);
    assert_eq!(harness.controller.store().loads.len(), 2);
    assert_eq!(query::move_count(harness.controller.world()), 0);
}

#[test]
fn menu_from_win_screen_returns_home() {
    let mut harness = Harness::new();
    harness.start_board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
    let point = harness.slot_point(8);
    harness.tap(point);

    let menu = harness.controller.layout().win_menu();
    harness.tap_rect(menu);

    assert_eq!(harness.controller.screen(), &Screen::MainMenu);
    assert_eq!(
        harness.controller.display().screens().last().copied(),
        Some("menu")
    );
}

#[test]
fn failed_load_shows_notice_then_menu() {
    let store = FakeStore {
        failing: HashSet::from(["puzzles/easy/castle.rgb565".to_owned()]),
        ..FakeStore::default()
    };
    let mut harness = Harness::with_store(ControllerConfig::default(), store);
    let layout = *harness.controller.layout();

    harness.tap_rect(layout.difficulty_button(Difficulty::Easy));
    harness.tap_rect(layout.select_entry(0).expect("visible entry"));

    assert_eq!(harness.controller.screen(), &Screen::MainMenu);
    assert!(harness.controller.notice_active());
    assert_eq!(
        harness.controller.display().screens().last().copied(),
        Some("Failed to load image!")
    );

    harness.tap_rect(layout.difficulty_button(Difficulty::Easy));
    assert_eq!(harness.controller.screen(), &Screen::MainMenu);

    harness.idle(2_000);
    assert!(!harness.controller.notice_active());
    assert_eq!(
        harness.controller.display().screens().last().copied(),
        Some("menu")
    );

    harness.tap_rect(layout.difficulty_button(Difficulty::Easy));
    assert_eq!(
        harness.controller.screen(),
        &Screen::PuzzleSelect {
            difficulty: Difficulty::Easy
        }
    );
}

#[test]
fn unsolvable_board_is_refused() {
    let mut harness = Harness::new();
    let tiles = [2, 1, 3, 4, 5, 6, 7, 8, 0].map(Tile::new).to_vec();

    let result = harness
        .controller
        .start_with_board(Difficulty::Easy, 1, tiles, harness.at());

    assert!(matches!(
        result,
        Err(StartError::Board(BoardRejection::Unsolvable))
    ));
    assert_eq!(harness.controller.screen(), &Screen::MainMenu);
    assert!(harness.controller.notice_active());
    assert!(query::puzzle(harness.controller.world()).is_none());
}

#[test]
fn solved_board_is_refused() {
    let mut harness = Harness::new();
    let tiles = [1, 2, 3, 4, 5, 6, 7, 8, 0].map(Tile::new).to_vec();

    let result = harness
        .controller
        .start_with_board(Difficulty::Easy, 0, tiles, harness.at());

    assert!(matches!(
        result,
        Err(StartError::Board(BoardRejection::AlreadySolved))
    ));
    assert_eq!(harness.controller.screen(), &Screen::MainMenu);
    assert!(harness.controller.notice_active());
    assert!(query::puzzle(harness.controller.world()).is_none());
}

#[test]
fn board_for_wrong_grid_size_is_refused() {
    let mut harness = Harness::new();
    let tiles = (0..16).map(Tile::new).collect();

    let result = harness
        .controller
        .start_with_board(Difficulty::Easy, 0, tiles, harness.at());

    assert!(matches!(
        result,
        Err(StartError::Board(BoardRejection::WrongLength {
            expected: 9,
            actual: 16
        }))
    ));
}

#[test]
fn status_bar_redraws_only_when_values_change() {
    let mut harness = Harness::new();
    harness.start_board(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);
    let drawn_on_entry = harness.controller.display().status_lines().len();

    harness.idle(1_000);
    assert_eq!(
        harness.controller.display().status_lines().len(),
        drawn_on_entry,
        "an idle clock must not redraw"
    );

    let point = harness.slot_point(5);
    harness.tap(point);
    harness.idle(1_500);

    let lines = harness.controller.display().status_lines();
    let last = *lines.last().expect("status drawn");
    assert_eq!(last.moves, 1);
    assert_eq!(last.seconds, 1);
    for pair in lines.windows(2) {
        assert_ne!(pair[0], pair[1], "identical status drawn twice in a row");
    }
}
