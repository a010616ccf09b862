//! Top-level error type for the binary.

use std::path::PathBuf;

use crate::ascii::EmptyRampError;
use crate::config::ConfigError;
use crate::playback::PlaybackError;
use crate::source::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum GlyphcastError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error("invalid charset: {0}")]
    Charset(#[from] EmptyRampError),
    #[error("no input given (pass an image or video path, or - for stdin)")]
    MissingInput,
    #[error("config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlyphcastError>;
