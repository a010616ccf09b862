//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::ascii::{OutputSize, Ramp};

/// Playback speed bounds accepted by `--speed`.
pub const SPEED_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

/// Parse and validate playback speed (0.5-2.0)
pub fn parse_speed(s: &str) -> Result<f64, String> {
    let speed: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !SPEED_RANGE.contains(&speed) {
        return Err(format!("Speed must be between 0.5 and 2.0, got {}", speed));
    }
    Ok(speed)
}

/// Render images and videos as ASCII art
#[derive(Parser, Debug)]
#[command(name = "glyphcast")]
#[command(version, about = "Render images and videos as ASCII, ANSI or HTML text", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image or video file (`-` reads an image from stdin)
    pub input: Option<String>,

    /// Output width in characters
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Output height in characters
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Output size as WIDTHxHEIGHT (overrides --width/--height)
    #[arg(long, value_name = "WxH")]
    pub size: Option<OutputSize>,

    /// 24-bit ANSI color output
    #[arg(long)]
    pub color: bool,

    /// Emit an HTML fragment
    #[arg(long)]
    pub html: bool,

    /// Glyph ramp from darkest to brightest
    #[arg(long)]
    pub charset: Option<Ramp>,

    /// Reverse the ramp (for light backgrounds)
    #[arg(long)]
    pub invert: bool,

    /// Two pixel rows per line using half blocks (implies --color)
    #[arg(long)]
    pub highres: bool,

    /// Fit the output to the terminal
    #[arg(long)]
    pub fullscreen: bool,

    /// Mirror horizontally
    #[arg(long)]
    pub flipx: bool,

    /// Flip vertically
    #[arg(long)]
    pub flipy: bool,

    /// Render only the edges of the image
    #[arg(long)]
    pub edges_only: bool,

    /// Edge detection threshold
    #[arg(long)]
    pub edge_threshold: Option<f32>,

    /// Paint cell backgrounds in color mode
    #[arg(long)]
    pub fill: bool,

    /// Frame the output with a border
    #[arg(long, short)]
    pub border: bool,

    /// Clear the screen before drawing
    #[arg(long)]
    pub clear: bool,

    /// Play videos without sound
    #[arg(long)]
    pub no_audio: bool,

    /// Video playback speed (0.5-2.0)
    #[arg(long, value_parser = parse_speed)]
    pub speed: Option<f64>,

    /// Informational logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, short)]
    pub debug: bool,

    /// Write the rendered image to a file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Log level selected by `-v`/`-d`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else if self.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
