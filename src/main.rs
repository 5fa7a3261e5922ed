//! arenatris — classic falling-block puzzle in the terminal.

mod app;
mod arena;
mod game;
mod input;
mod matrix;
mod piece;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options derived from CLI that affect game behaviour and the host loop.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub drop_interval: Duration,
    /// Fixed RNG seed for a reproducible piece sequence.
    pub seed: Option<u64>,
    pub frame_rate: f64,
    pub no_animation: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            drop_interval: game::DEFAULT_DROP_INTERVAL,
            seed: None,
            frame_rate: 60.0,
            no_animation: false,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        warn!("theme not loaded ({}), using default", e);
        let mut theme = theme::Theme::default();
        theme.apply_palette(args.palette);
        theme
    });
    let config = GameConfig {
        drop_interval: Duration::from_millis(args.drop_interval_ms.max(1)),
        seed: args.seed,
        frame_rate: args.frame_rate,
        no_animation: args.no_animation,
    };
    info!("starting: {:?}", config);
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Logs go to a file: the terminal belongs to the game. Level from RUST_LOG, default info.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "arenatris",
    version,
    about = "Classic falling-block puzzle in the terminal. Fill rows to clear them; clearing several at once doubles the points for each extra row.",
    long_about = "arenatris is a small falling-block puzzle on a 12x20 arena.\n\n\
        Pieces fall one row per second. A row that is completely filled is removed; \
        rows cleared by the same piece score 10, 20, 40, ... When a new piece has no room \
        to appear the arena is emptied and the score starts again from zero.\n\n\
        CONTROLS:\n  Left/Right  Move    Down  Drop one row\n  q           Rotate counter-clockwise\n  w           Rotate clockwise\n  Esc/Ctrl+C  Quit"
)]
pub struct Args {
    /// Path to theme file (btop-style theme[key]=\"value\"; keys piece1..piece7, bg, div_line, main_fg, title).
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Time between automatic drops, in milliseconds.
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub drop_interval_ms: u64,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Seed for the piece sequence (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Disable the row-clear flash.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file (RUST_LOG sets the level).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
