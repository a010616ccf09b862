//! Video playback scheduling.
//!
//! [`PlaybackScheduler`] pulls frames from a [`FrameSource`], paces them
//! against a single start timestamp with [`Pacer`], renders each one with the
//! [`FrameRenderer`](crate::ascii::FrameRenderer) and presents it on a
//! [`Terminal`]. An optional [`AudioBackend`] plays the soundtrack alongside.
//!
//! Cleanup (audio stop, temp artifact removal, source release) runs on every
//! exit path.

mod audio;
mod clock;
mod pacing;
mod scheduler;
mod terminal;

use std::path::PathBuf;

pub use audio::{AudioBackend, AudioError, AudioTask, FfmpegAudio, ProcessAudioTask, DEFAULT_AUDIO_QUALITY};
pub use clock::{sleep_interruptible, CancelToken, Clock, SystemClock, SLEEP_SLICE};
pub use pacing::{FrameAction, Pacer, FALLBACK_FPS, PACING_EPSILON};
pub use scheduler::{
    FrameSource, PlaybackConfig, PlaybackOutcome, PlaybackPhase, PlaybackReport, PlaybackScheduler,
};
pub use terminal::{terminal_size, CrosstermTerminal, Terminal};

/// Errors that abort playback.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("video not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("could not open video {}: {reason}", path.display())]
    OpenFailed { path: PathBuf, reason: String },
    #[error("failed to decode frame: {0}")]
    Decode(String),
    #[error("video playback unavailable: {0}")]
    VideoUnavailable(String),
    #[error("I/O error during playback: {0}")]
    Io(#[from] std::io::Error),
}
