//! Command-line interface definitions and helpers.
//!
//! This module contains CLI argument parsing, the mapping from flags and
//! config file onto render/playback settings, and subcommand handlers.

mod args;
mod commands;
mod settings;

pub use args::{parse_speed, Args, Command, ConfigAction, SPEED_RANGE};
pub use commands::handle_config_action;
pub use settings::{image_size, playback_config, render_config};
