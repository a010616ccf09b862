//! glyphcast library crate.
//!
//! Renders RGBA pixel buffers as plain, ANSI-colored or HTML text and plays
//! videos as paced streams of such frames. The binary in `main.rs` is a thin
//! layer over these modules.

pub mod ascii;
pub mod capability;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod playback;
pub mod source;
