#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives Tile Slide without a panel.

mod board_transfer;
mod config;
mod script;
mod terminal;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tileslide_assets::DirectoryStore;
use tileslide_core::{Difficulty, GridSize, Timestamp};
use tileslide_rendering::format_clock;
use tileslide_system_controller::{GameController, Screen, ShuffleMoves};
use tileslide_world::{query, solvability, Grid};

use crate::{
    board_transfer::BoardCode,
    config::GameConfig,
    script::{TouchScript, TICK},
    terminal::{LoggingAudio, TerminalDisplay},
};

/// Command-line arguments accepted by the Tile Slide binary.
#[derive(Debug, Parser)]
#[command(name = "tileslide", about = "Tile Slide puzzle driver", version)]
struct CliArgs {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Replays a touch script against the game and prints where it ended up.
    Play(PlayArgs),
    /// Lists the puzzle catalog and checks that every image is present.
    Catalog(CatalogArgs),
    /// Exports or inspects board codes.
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Touch script with one `at_ms x y [hold_ms]` line per touch.
    #[arg(long, value_name = "FILE")]
    script: PathBuf,
    /// Starts straight into the given board code instead of the main menu.
    #[arg(long, value_name = "CODE")]
    board: Option<String>,
    /// Catalog position played with `--board`, within the board's difficulty.
    #[arg(long, default_value_t = 0)]
    entry: usize,
    /// Configuration file with [timing], [shuffle], [assets] and [catalog] tables.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Overrides the shuffle seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the asset directory.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Configuration file with [assets] and [catalog] tables.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Overrides the asset directory.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum BoardCommand {
    /// Prints the code of a shuffled board.
    Export {
        /// Side length of the grid (3, 4 or 5).
        #[arg(long, default_value_t = 4)]
        size: u32,
        /// Seed for the shuffle.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Random slides to perform. Defaults to the game's depth for the size.
        #[arg(long)]
        moves: Option<u32>,
    },
    /// Decodes a board code and reports whether it can be solved.
    Check {
        /// Code produced by `board export`.
        code: String,
    },
}

/// Entry point for the Tile Slide command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    match args.command {
        CliCommand::Play(args) => play(args),
        CliCommand::Catalog(args) => catalog(args),
        CliCommand::Board { command } => match command {
            BoardCommand::Export { size, seed, moves } => export_board(size, seed, moves),
            BoardCommand::Check { code } => check_board(&code),
        },
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let config = GameConfig::load(args.config.as_deref())?;
    let controller_config = config.controller(args.seed);
    let catalog = config.catalog()?;
    let store = DirectoryStore::new(config.asset_root(args.assets.as_deref()));
    let script = TouchScript::from_path(&args.script)?;
    log::info!(
        "replaying {} touches from {}",
        script.touches().len(),
        args.script.display()
    );

    let mut controller = GameController::new(
        controller_config,
        catalog,
        store,
        TerminalDisplay::default(),
        LoggingAudio::default(),
    );
    controller.boot();

    if let Some(code) = args.board.as_deref() {
        let board = BoardCode::decode(code).context("invalid --board code")?;
        let difficulty = difficulty_for(board.size)?;
        controller
            .start_with_board(difficulty, args.entry, board.tiles, Timestamp::ZERO)
            .context("failed to start the imported board")?;
    }

    // Leave room for the last slide, flash and notice to play out.
    let finish = script.end().saturating_add(
        controller_config.slide_duration
            + controller_config.flash_duration
            + controller_config.notice_duration,
    );
    let mut now = Timestamp::ZERO;
    loop {
        controller.tick(script.sample_at(now), now);
        if now >= finish {
            break;
        }
        now = now.saturating_add(TICK);
    }

    println!("screen: {}", controller.screen().name());
    if let Some(session) = controller.screen().session() {
        println!(
            "puzzle: {} ({})",
            session.title(),
            session.difficulty().label()
        );
    }
    match controller.screen() {
        Screen::Playing(_) => println!(
            "moves: {} time: {}",
            query::move_count(controller.world()),
            format_clock(controller.elapsed(now).unwrap_or_default().as_secs())
        ),
        Screen::WinScreen { outcome, .. } => println!(
            "solved: {} moves in {}",
            outcome.moves,
            format_clock(outcome.elapsed.as_secs())
        ),
        Screen::MainMenu | Screen::PuzzleSelect { .. } => {}
    }
    if let Some(last) = controller.display().last_screen() {
        println!("last screen drawn: {last}");
    }
    println!("draw requests: {}", controller.display().draws());
    println!("cues: {:?}", controller.audio().cues());
    Ok(())
}

fn catalog(args: CatalogArgs) -> Result<()> {
    let config = GameConfig::load(args.config.as_deref())?;
    let catalog = config.catalog()?;
    let store = DirectoryStore::new(config.asset_root(args.assets.as_deref()));

    let missing = store.verify(&catalog);
    for difficulty in Difficulty::ALL {
        println!("{}", difficulty.label());
        for (index, entry) in catalog.entries(difficulty).iter().enumerate() {
            let status = if missing.contains(&store.resolve(entry)) {
                "missing"
            } else {
                "ok"
            };
            println!("  {index}  {:<20} {:<40} {status}", entry.title, entry.path);
        }
    }
    println!(
        "{} puzzles, {} missing under {}",
        catalog.len(),
        missing.len(),
        store.root().display()
    );
    Ok(())
}

fn export_board(size: u32, seed: u64, moves: Option<u32>) -> Result<()> {
    let size = GridSize::new(size).ok_or_else(|| anyhow!("grid size must be 3, 4 or 5, not {size}"))?;
    let moves = moves.unwrap_or_else(|| ShuffleMoves::default().for_size(size));

    let mut grid = Grid::solved(size);
    grid.shuffle(moves, &mut ChaCha8Rng::seed_from_u64(seed));
    log::debug!("shuffled {size} grid with {moves} moves from seed {seed}");

    let code = BoardCode {
        size,
        tiles: grid.tiles().to_vec(),
    };
    println!("{}", code.encode());
    Ok(())
}

fn check_board(code: &str) -> Result<()> {
    let board = BoardCode::decode(code)?;
    let grid = Grid::from_tiles(board.size, board.tiles).context("board is not a permutation")?;

    let solvable = solvability::is_solvable(grid.size(), grid.tiles());
    println!("size: {}", grid.size());
    println!("inversions: {}", solvability::inversion_count(grid.tiles()));
    println!("empty slot: {}", grid.empty_slot().get());
    println!("solved: {}", if grid.is_solved() { "yes" } else { "no" });
    println!("solvable: {}", if solvable { "yes" } else { "no" });

    if !solvable {
        bail!("board cannot be reached from the solved arrangement");
    }
    Ok(())
}

fn difficulty_for(size: GridSize) -> Result<Difficulty> {
    Difficulty::ALL
        .into_iter()
        .find(|difficulty| difficulty.grid_size() == size)
        .ok_or_else(|| anyhow!("no difficulty plays {size} grids"))
}
