#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Slide adapters.

use glam::{IVec2, Vec2};
use std::time::Duration;
use tileslide_core::{Difficulty, Feedback, GridSize, PuzzleImage, Slot, Tile};

/// Number of catalog entries the puzzle select screen can show.
pub const SELECT_VISIBLE_ENTRIES: usize = 5;

/// Axis-aligned screen rectangle in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reports whether the point lies inside. Right and bottom edges are exclusive.
    #[must_use]
    pub const fn contains(&self, point: IVec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Pixel centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Fixed screen regions shared by every screen.
///
/// The status bar runs along the top, the button bar along the bottom, and the
/// board is centred in the square play area between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenLayout {
    width: i32,
    height: i32,
    status_bar_height: i32,
    button_bar_height: i32,
}

impl ScreenLayout {
    /// Layout of the 480x480 touch panel.
    pub const PANEL: Self = Self {
        width: 480,
        height: 480,
        status_bar_height: 40,
        button_bar_height: 50,
    };

    /// Strip along the bottom holding the Back and Restart buttons.
    #[must_use]
    pub const fn button_bar(&self) -> Rect {
        Rect::new(
            0,
            self.height - self.button_bar_height,
            self.width,
            self.button_bar_height,
        )
    }

    /// Region between the bars in which the board is centred.
    #[must_use]
    pub const fn play_area(&self) -> Rect {
        Rect::new(
            0,
            self.status_bar_height,
            self.width,
            self.height - self.status_bar_height - self.button_bar_height,
        )
    }

    /// Main menu button selecting the difficulty.
    #[must_use]
    pub const fn difficulty_button(&self, difficulty: Difficulty) -> Rect {
        let width = 300;
        let top = match difficulty {
            Difficulty::Easy => 260,
            Difficulty::Medium => 340,
            Difficulty::Hard => 420,
        };
        Rect::new((self.width - width) / 2, top, width, 60)
    }

    /// Puzzle select row for catalog entry `index`, if it is visible.
    #[must_use]
    pub const fn select_entry(&self, index: usize) -> Option<Rect> {
        if index >= SELECT_VISIBLE_ENTRIES {
            return None;
        }
        Some(Rect::new(30, 95 + index as i32 * 65, self.width - 60, 55))
    }

    /// Back button on the puzzle select screen.
    #[must_use]
    pub const fn select_back(&self) -> Rect {
        Rect::new(10, 430, 120, 40)
    }

    /// Back button in the playing button bar.
    #[must_use]
    pub const fn playing_back(&self) -> Rect {
        Rect::new(10, self.height - self.button_bar_height + 5, 140, 40)
    }

    /// Restart button in the playing button bar.
    #[must_use]
    pub const fn playing_restart(&self) -> Rect {
        Rect::new(
            self.width - 150,
            self.height - self.button_bar_height + 5,
            140,
            40,
        )
    }

    /// Play Again button on the win screen.
    #[must_use]
    pub const fn win_play_again(&self) -> Rect {
        Rect::new(50, 400, 170, 50)
    }

    /// Menu button on the win screen.
    #[must_use]
    pub const fn win_menu(&self) -> Rect {
        Rect::new(260, 400, 170, 50)
    }

    /// Where the win screen shows the completed image.
    #[must_use]
    pub const fn win_preview(&self) -> Rect {
        let side = 200;
        Rect::new((self.width - side) / 2, 30, side, side)
    }

    /// Board geometry for a grid of the provided size.
    #[must_use]
    pub fn board(&self, size: GridSize) -> BoardGeometry {
        BoardGeometry::new(size, self.play_area())
    }
}

/// Pixel placement of a board inside the play area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardGeometry {
    size: GridSize,
    tile_length: i32,
    origin: IVec2,
}

impl BoardGeometry {
    /// Centres a board of `size` inside `area`, using whole-pixel tiles.
    #[must_use]
    pub fn new(size: GridSize, area: Rect) -> Self {
        let side = size.side() as i32;
        let tile_length = area.width.min(area.height) / side;
        let extent = tile_length * side;
        Self {
            size,
            tile_length,
            origin: IVec2::new(
                area.x + (area.width - extent) / 2,
                area.y + (area.height - extent) / 2,
            ),
        }
    }

    /// Size of the grid laid out by this geometry.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Side length of one tile in pixels.
    #[must_use]
    pub const fn tile_length(&self) -> i32 {
        self.tile_length
    }

    /// Top-left corner of the board.
    #[must_use]
    pub const fn origin(&self) -> IVec2 {
        self.origin
    }

    /// Rectangle covering the whole board.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let extent = self.tile_length * self.size.side() as i32;
        Rect::new(self.origin.x, self.origin.y, extent, extent)
    }

    /// Screen rectangle of the slot.
    #[must_use]
    pub fn slot_rect(&self, slot: Slot) -> Rect {
        let column = self.size.column_of(slot) as i32;
        let row = self.size.row_of(slot) as i32;
        Rect::new(
            self.origin.x + column * self.tile_length,
            self.origin.y + row * self.tile_length,
            self.tile_length,
            self.tile_length,
        )
    }

    /// Pixel centre of the slot.
    #[must_use]
    pub fn slot_center(&self, slot: Slot) -> Vec2 {
        self.slot_rect(slot).center()
    }

    /// Maps a screen point to the slot beneath it.
    #[must_use]
    pub fn slot_at(&self, point: IVec2) -> Option<Slot> {
        if self.tile_length <= 0 || !self.bounds().contains(point) {
            return None;
        }
        let local = (point - self.origin) / self.tile_length;
        self.size.slot_at(local.x as u32, local.y as u32)
    }

    /// Strip spanning both slots, cleared behind a tile sliding between them.
    #[must_use]
    pub fn slide_trail(&self, from: Slot, to: Slot) -> Rect {
        let first = self.slot_rect(from);
        let second = self.slot_rect(to);
        let left = first.x.min(second.x);
        let top = first.y.min(second.y);
        let right = (first.x + first.width).max(second.x + second.width);
        let bottom = (first.y + first.height).max(second.y + second.height);
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Region of a square source image showing the tile's part of the picture.
    ///
    /// A tile shows the part of the image that belongs in its home slot. The
    /// empty tile shows nothing.
    #[must_use]
    pub fn image_source(&self, tile: Tile, image_side: u32) -> Option<Rect> {
        if tile.is_empty() {
            return None;
        }
        let home = tile.home(self.size);
        let piece = (image_side / self.size.side()) as i32;
        Some(Rect::new(
            self.size.column_of(home) as i32 * piece,
            self.size.row_of(home) as i32 * piece,
            piece,
            piece,
        ))
    }
}

/// Move counter and clock shown in the status bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusLine {
    /// Scored moves.
    pub moves: u32,
    /// Whole seconds elapsed on the game clock.
    pub seconds: u64,
}

impl StatusLine {
    /// Creates a status line from a move count and an elapsed duration.
    #[must_use]
    pub const fn new(moves: u32, elapsed: Duration) -> Self {
        Self {
            moves,
            seconds: elapsed.as_secs(),
        }
    }

    /// Clock text in `mm:ss` form.
    #[must_use]
    pub fn clock(&self) -> String {
        format_clock(self.seconds)
    }
}

/// Formats whole seconds as `mm:ss`. Minutes keep counting past 99.
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Full-screen content requested when a screen is entered.
#[derive(Clone, Debug, PartialEq)]
pub enum ScreenChrome<'a> {
    /// Title and the three difficulty buttons.
    MainMenu,
    /// Catalog entries for one difficulty plus a Back button.
    PuzzleSelect {
        /// Difficulty whose catalog is listed.
        difficulty: Difficulty,
        /// Titles of the visible entries, in catalog order.
        titles: Vec<&'a str>,
    },
    /// Shown while an image is read from storage.
    Loading {
        /// Title of the puzzle being loaded.
        title: &'a str,
    },
    /// Transient full-screen message.
    Notice {
        /// Text to show.
        message: &'a str,
    },
    /// Empty board frame, status bar and button bar.
    Playing {
        /// Difficulty being played.
        difficulty: Difficulty,
        /// Title of the puzzle being played.
        title: &'a str,
    },
    /// Result summary with Play Again and Menu buttons.
    Win {
        /// Difficulty that was solved.
        difficulty: Difficulty,
        /// Final move count and time.
        result: StatusLine,
        /// Completed image, if one is loaded.
        preview: Option<&'a PuzzleImage>,
        /// Region the preview is scaled into.
        preview_area: Rect,
    },
}

/// Single draw operation issued by the game controller.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawRequest<'a> {
    /// Replace the whole screen.
    Screen(ScreenChrome<'a>),
    /// Draw one tile, either in its slot or at an interpolated centre.
    Tile {
        /// Tile to draw. The empty tile is drawn as a blank slot.
        tile: Tile,
        /// Slot the tile belongs to.
        slot: Slot,
        /// Board placement used to resolve pixel positions.
        geometry: BoardGeometry,
        /// Interpolated pixel centre while the tile is sliding.
        position: Option<Vec2>,
        /// Picture the tile is cut from, if one is loaded.
        image: Option<&'a PuzzleImage>,
    },
    /// Clear the strip behind a sliding tile.
    SlideTrail(Rect),
    /// Refresh the move counter and clock.
    StatusBar(StatusLine),
    /// Outline a tapped slot to confirm or refuse the tap.
    Flash {
        /// Slot that was tapped.
        slot: Slot,
        /// Board placement used to resolve pixel positions.
        geometry: BoardGeometry,
        /// Whether the tap moved a tile.
        feedback: Feedback,
    },
}

/// Display collaborator that turns draw requests into pixels.
pub trait Display {
    /// Performs a single draw operation.
    fn draw(&mut self, request: DrawRequest<'_>);
}

impl<D: Display + ?Sized> Display for &mut D {
    fn draw(&mut self, request: DrawRequest<'_>) {
        (**self).draw(request);
    }
}
