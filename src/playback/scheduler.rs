//! Video playback: decode, pace, render and present frames, with an optional
//! audio side-channel.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempPath;

use crate::ascii::{fit_to_terminal, FrameRenderer, OutputSize, PixelBuffer, RenderConfig, SizeRequest};

use super::audio::{AudioBackend, AudioTask};
use super::clock::{sleep_interruptible, CancelToken, Clock};
use super::pacing::{FrameAction, Pacer};
use super::terminal::Terminal;
use super::PlaybackError;

/// Video-decoding collaborator.
pub trait FrameSource {
    /// Whether the decoder opened successfully.
    fn is_open(&self) -> bool;
    /// Frames per second, or a non-positive value when unknown.
    fn fps(&self) -> f64;
    fn frame_count(&self) -> Option<u64>;
    /// Next decoded frame, `None` once exhausted.
    fn next_frame(&mut self) -> Result<Option<PixelBuffer>, PlaybackError>;
    /// Release the decoder. Called exactly once per playback.
    fn release(&mut self) -> Result<(), PlaybackError>;
}

/// Playback settings layered on top of the per-frame [`RenderConfig`].
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub render: RenderConfig,
    /// Fit every frame to the full terminal.
    pub fullscreen: bool,
    /// Erase the display before each frame.
    pub clear: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Playback rate multiplier, applied to both video and audio.
    pub speed: f64,
    /// Try to play the soundtrack.
    pub audio: bool,
    /// Upper bound on audio extraction.
    pub audio_timeout: Duration,
    /// Upper bound on waiting for the audio player to stop.
    pub audio_join_timeout: Duration,
    /// Delay between starting audio and drawing the first frame.
    pub warmup: Duration,
    /// Directory for the extracted audio, system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            fullscreen: false,
            clear: false,
            width: None,
            height: None,
            speed: 1.0,
            audio: true,
            audio_timeout: Duration::from_secs(30),
            audio_join_timeout: Duration::from_secs(2),
            warmup: Duration::from_secs(1),
            temp_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    AudioStarting,
    Playing,
    Draining,
    Stopped,
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackPhase::Idle => "idle",
            PlaybackPhase::AudioStarting => "audio-starting",
            PlaybackPhase::Playing => "playing",
            PlaybackPhase::Draining => "draining",
            PlaybackPhase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The source ran out of frames.
    Completed,
    /// The cancel token fired.
    Interrupted,
}

/// Summary of one playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    pub frames_drawn: u64,
    pub frames_skipped: u64,
    pub outcome: PlaybackOutcome,
    /// Whether audio actually started.
    pub audio: bool,
}

/// Resources that must be torn down when playback ends, in order.
///
/// `finish` runs at most once; `Drop` covers early returns and panics.
struct Session<'a> {
    source: &'a mut dyn FrameSource,
    audio: Option<Box<dyn AudioTask>>,
    artifact: Option<TempPath>,
    join_timeout: Duration,
    finished: bool,
}

impl<'a> Session<'a> {
    fn new(source: &'a mut dyn FrameSource, join_timeout: Duration) -> Self {
        Self {
            source,
            audio: None,
            artifact: None,
            join_timeout,
            finished: false,
        }
    }

    fn remove_artifact(&mut self) {
        if let Some(path) = self.artifact.take() {
            let display = path.display().to_string();
            match path.close() {
                Ok(()) => log::debug!("removed audio artifact {}", display),
                Err(e) => log::warn!("failed to remove audio artifact {}: {}", display, e),
            }
        }
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if let Some(task) = self.audio.take() {
            if let Err(e) = task.stop(self.join_timeout) {
                log::warn!("failed to stop audio: {}", e);
            }
        }
        self.remove_artifact();
        if let Err(e) = self.source.release() {
            log::warn!("failed to release frame source: {}", e);
        }
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Drives a [`FrameSource`] through the renderer onto a [`Terminal`].
pub struct PlaybackScheduler<T: Terminal, C: Clock> {
    config: PlaybackConfig,
    renderer: FrameRenderer,
    terminal: T,
    clock: C,
    audio: Option<Box<dyn AudioBackend>>,
    cancel: CancelToken,
    phase: PlaybackPhase,
}

impl<T: Terminal, C: Clock> PlaybackScheduler<T, C> {
    pub fn new(config: PlaybackConfig, terminal: T, clock: C) -> Self {
        let renderer = FrameRenderer::new(config.render.clone());
        Self {
            config,
            renderer,
            terminal,
            clock,
            audio: None,
            cancel: CancelToken::new(),
            phase: PlaybackPhase::Idle,
        }
    }

    /// Enable the audio side-channel.
    pub fn with_audio(mut self, backend: Box<dyn AudioBackend>) -> Self {
        self.audio = Some(backend);
        self
    }

    /// Share an existing cancel token, e.g. the one the Ctrl+C handler sets.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    fn transition(&mut self, next: PlaybackPhase) {
        log::debug!("playback: {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Play `source` to the end or until cancelled.
    ///
    /// `video` is the video file, handed to the audio extractor. Cleanup
    /// always runs before this returns, whatever the outcome.
    pub fn play(
        &mut self,
        source: &mut dyn FrameSource,
        video: &Path,
    ) -> Result<PlaybackReport, PlaybackError> {
        self.phase = PlaybackPhase::Idle;
        if !source.is_open() {
            if let Err(e) = source.release() {
                log::debug!("release after failed open: {}", e);
            }
            self.transition(PlaybackPhase::Stopped);
            return Err(PlaybackError::OpenFailed {
                path: video.to_path_buf(),
                reason: "frame source did not open".to_string(),
            });
        }

        log::info!(
            "playing {} at {:.3} fps x{} ({} frames)",
            video.display(),
            source.fps(),
            self.config.speed,
            source
                .frame_count()
                .map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );

        let pacer = Pacer::new(source.fps(), self.config.speed);
        let mut session = Session::new(source, self.config.audio_join_timeout);

        let audio_started = self.start_audio(&mut session, video);

        let mut report = PlaybackReport {
            frames_drawn: 0,
            frames_skipped: 0,
            outcome: PlaybackOutcome::Completed,
            audio: audio_started,
        };

        let warmed_up = !audio_started
            || sleep_interruptible(&self.clock, self.config.warmup, &self.cancel);

        let result = if warmed_up {
            self.transition(PlaybackPhase::Playing);
            self.run_frames(&mut session, &pacer, &mut report)
        } else {
            report.outcome = PlaybackOutcome::Interrupted;
            Ok(())
        };

        self.transition(PlaybackPhase::Draining);
        session.finish();
        self.transition(PlaybackPhase::Stopped);

        log::info!(
            "playback {:?}: {} drawn, {} skipped",
            report.outcome,
            report.frames_drawn,
            report.frames_skipped
        );
        result.map(|()| report)
    }

    /// Extract and start audio. Every failure here only disables audio.
    fn start_audio(&mut self, session: &mut Session<'_>, video: &Path) -> bool {
        if !self.config.audio {
            return false;
        }
        let Some(backend) = self.audio.as_ref() else {
            return false;
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix("glyphcast-audio-").suffix(".mp3");
        let file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let artifact = match file {
            Ok(file) => file.into_temp_path(),
            Err(e) => {
                log::warn!("could not create audio temp file, playing without audio: {}", e);
                return false;
            }
        };
        let path = artifact.to_path_buf();
        session.artifact = Some(artifact);

        if let Err(e) = backend.extract(video, &path, self.config.speed, self.config.audio_timeout) {
            log::warn!("audio extraction failed, playing without audio: {}", e);
            session.remove_artifact();
            return false;
        }

        self.transition(PlaybackPhase::AudioStarting);

        let Some(backend) = self.audio.as_ref() else {
            return false;
        };
        match backend.play(&path) {
            Ok(task) => {
                session.audio = Some(task);
                true
            }
            Err(e) => {
                log::warn!("audio playback failed, playing without audio: {}", e);
                session.remove_artifact();
                false
            }
        }
    }

    fn run_frames(
        &mut self,
        session: &mut Session<'_>,
        pacer: &Pacer,
        report: &mut PlaybackReport,
    ) -> Result<(), PlaybackError> {
        let start = self.clock.now();
        let mut index: u64 = 0;

        loop {
            if self.cancel.is_cancelled() {
                report.outcome = PlaybackOutcome::Interrupted;
                return Ok(());
            }

            let Some(frame) = session.source.next_frame()? else {
                // hold the last frame for its full period
                let elapsed = self.clock.now().saturating_sub(start);
                let hold = pacer.ideal_time(index).saturating_sub(elapsed);
                report.outcome = if sleep_interruptible(&self.clock, hold, &self.cancel) {
                    PlaybackOutcome::Completed
                } else {
                    PlaybackOutcome::Interrupted
                };
                return Ok(());
            };

            let elapsed = self.clock.now().saturating_sub(start);
            match pacer.decide(index, elapsed) {
                FrameAction::Skip => {
                    log::debug!("frame {} late by more than one period, skipping", index);
                    report.frames_skipped += 1;
                    index += 1;
                    continue;
                }
                FrameAction::Sleep(drift) => {
                    if !sleep_interruptible(&self.clock, drift, &self.cancel) {
                        report.outcome = PlaybackOutcome::Interrupted;
                        return Ok(());
                    }
                }
                FrameAction::Draw => {}
            }

            self.draw(&frame)?;
            report.frames_drawn += 1;
            index += 1;
        }
    }

    fn draw(&mut self, frame: &PixelBuffer) -> Result<(), PlaybackError> {
        let cfg = &self.config;
        let (width, height) = fit_to_terminal(
            cfg.width,
            cfg.height,
            frame.width(),
            frame.height(),
            self.terminal.size(),
            cfg.render.highres,
            cfg.fullscreen,
        );
        let text = self
            .renderer
            .render_with_size(frame, SizeRequest::Explicit(OutputSize { width, height }));

        if cfg.clear {
            self.terminal.clear()?;
        }
        self.terminal.present(&text.to_string())?;
        Ok(())
    }
}
