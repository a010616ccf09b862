//! Audio side-channel: extract the soundtrack with ffmpeg, play it with ffplay.
//!
//! Both steps are optional. Any failure here degrades playback to silent
//! video and is never fatal.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::capability::AudioCapability;

/// How often a waiting child process is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default VBR quality for the extracted track (ffmpeg `-q:a`, 0 = best).
pub const DEFAULT_AUDIO_QUALITY: u8 = 2;

/// Errors from the audio side-channel.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("{0} not found on PATH")]
    ToolMissing(String),
    #[error("failed to spawn {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("audio extraction timed out after {0:?}")]
    Timeout(Duration),
    #[error("{tool} exited with code {exit_code:?}: {stderr}")]
    ProcessFailed {
        tool: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("audio I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts and plays audio for a video.
pub trait AudioBackend {
    /// Transcode the audio track of `video` into `output`, time-stretched by
    /// `tempo`, giving up after `timeout`.
    fn extract(
        &self,
        video: &Path,
        output: &Path,
        tempo: f64,
        timeout: Duration,
    ) -> Result<(), AudioError>;

    /// Start playing `audio` in the background.
    fn play(&self, audio: &Path) -> Result<Box<dyn AudioTask>, AudioError>;
}

/// Handle to audio playing in the background.
pub trait AudioTask {
    /// Stop playback and wait at most `timeout` for it to finish.
    fn stop(self: Box<Self>, timeout: Duration) -> Result<(), AudioError>;
}

/// [`AudioBackend`] using the ffmpeg and ffplay binaries.
#[derive(Debug, Clone)]
pub struct FfmpegAudio {
    ffmpeg: PathBuf,
    ffplay: PathBuf,
    quality: u8,
}

impl FfmpegAudio {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffplay: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffplay: ffplay.into(),
            quality: DEFAULT_AUDIO_QUALITY,
        }
    }

    /// Backend for an available capability, `None` otherwise.
    pub fn from_capability(capability: &AudioCapability) -> Option<Self> {
        match capability {
            AudioCapability::Available { ffmpeg, ffplay } => Some(Self::new(ffmpeg, ffplay)),
            AudioCapability::Unavailable { .. } => None,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Arguments for the transcode step (excluding the binary itself).
    pub fn extract_args(&self, video: &Path, output: &Path, tempo: f64) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            video.display().to_string(),
            "-vn".to_string(),
            "-q:a".to_string(),
            self.quality.to_string(),
            "-filter:a".to_string(),
            format!("atempo={}", tempo),
            output.display().to_string(),
        ]
    }

    /// Arguments for the playback step.
    pub fn play_args(audio: &Path) -> Vec<String> {
        vec![
            "-nodisp".to_string(),
            "-autoexit".to_string(),
            "-loglevel".to_string(),
            "quiet".to_string(),
            audio.display().to_string(),
        ]
    }
}

fn spawn_error(tool: &Path, e: std::io::Error) -> AudioError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AudioError::ToolMissing(tool.display().to_string())
    } else {
        AudioError::SpawnFailed {
            tool: tool.display().to_string(),
            source: e,
        }
    }
}

/// Poll `child` until it exits or `timeout` passes.
fn wait_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

impl AudioBackend for FfmpegAudio {
    fn extract(
        &self,
        video: &Path,
        output: &Path,
        tempo: f64,
        timeout: Duration,
    ) -> Result<(), AudioError> {
        let args = self.extract_args(video, output, tempo);
        log::debug!("extracting audio: {} {}", self.ffmpeg.display(), args.join(" "));

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(&self.ffmpeg, e))?;

        let Some(status) = wait_timeout(&mut child, timeout)? else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AudioError::Timeout(timeout));
        };

        if status.success() {
            return Ok(());
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        Err(AudioError::ProcessFailed {
            tool: self.ffmpeg.display().to_string(),
            exit_code: status.code(),
            stderr: stderr.trim().to_string(),
        })
    }

    fn play(&self, audio: &Path) -> Result<Box<dyn AudioTask>, AudioError> {
        let child = Command::new(&self.ffplay)
            .args(Self::play_args(audio))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| spawn_error(&self.ffplay, e))?;
        log::info!("audio playback started (pid {})", child.id());
        Ok(Box::new(ProcessAudioTask { child: Some(child) }))
    }
}

/// Background player process.
pub struct ProcessAudioTask {
    child: Option<Child>,
}

impl ProcessAudioTask {
    /// Ask the player to exit, then force it after `timeout`.
    fn shutdown(child: &mut Child, timeout: Duration) -> Result<(), AudioError> {
        if child.try_wait()?.is_some() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            // SAFETY: plain signal delivery to a child we spawned and have not reaped.
            unsafe {
                libc::kill(child.id() as i32, libc::SIGINT);
            }
        }

        #[cfg(not(unix))]
        {
            let _ = child.kill();
        }

        if wait_timeout(child, timeout)?.is_none() {
            log::warn!("audio player ignored interrupt for {:?}, killing", timeout);
            child.kill()?;
            child.wait()?;
        }
        Ok(())
    }
}

impl AudioTask for ProcessAudioTask {
    fn stop(mut self: Box<Self>, timeout: Duration) -> Result<(), AudioError> {
        match self.child.take() {
            Some(mut child) => Self::shutdown(&mut child, timeout),
            None => Ok(()),
        }
    }
}

impl Drop for ProcessAudioTask {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_args() {
        let audio = FfmpegAudio::new("ffmpeg", "ffplay");
        let args = audio.extract_args(Path::new("in.mp4"), Path::new("/tmp/a.mp3"), 1.5);
        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-loglevel",
                "error",
                "-y",
                "-i",
                "in.mp4",
                "-vn",
                "-q:a",
                "2",
                "-filter:a",
                "atempo=1.5",
                "/tmp/a.mp3"
            ]
        );
    }

    #[test]
    fn test_quality_override() {
        let audio = FfmpegAudio::new("ffmpeg", "ffplay").with_quality(0);
        let args = audio.extract_args(Path::new("v.mkv"), Path::new("o.mp3"), 1.0);
        assert!(args.windows(2).any(|w| w[0] == "-q:a" && w[1] == "0"));
        assert!(args.contains(&"atempo=1".to_string()));
    }

    #[test]
    fn test_play_args_disable_display_and_autoexit() {
        let args = FfmpegAudio::play_args(Path::new("a.mp3"));
        assert_eq!(args[0], "-nodisp");
        assert_eq!(args[1], "-autoexit");
        assert_eq!(args.last().map(String::as_str), Some("a.mp3"));
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let audio = FfmpegAudio::new(
            "/nonexistent/glyphcast-ffmpeg",
            "/nonexistent/glyphcast-ffplay",
        );
        let err = audio
            .extract(
                Path::new("v.mp4"),
                Path::new("o.mp3"),
                1.0,
                Duration::from_secs(1),
            )
            .unwrap_err();
        assert!(matches!(err, AudioError::ToolMissing(_)));

        let err = audio.play(Path::new("o.mp3")).err().unwrap();
        assert!(matches!(err, AudioError::ToolMissing(_)));
    }

    #[test]
    fn test_from_unavailable_capability() {
        let cap = AudioCapability::Unavailable {
            reason: "ffplay missing".to_string(),
        };
        assert!(FfmpegAudio::from_capability(&cap).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_stop_terminates_running_player() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let task: Box<dyn AudioTask> = Box::new(ProcessAudioTask { child: Some(child) });
        let start = Instant::now();
        task.stop(Duration::from_millis(500)).unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_error_display() {
        let err = AudioError::ProcessFailed {
            tool: "ffmpeg".to_string(),
            exit_code: Some(1),
            stderr: "no audio stream".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("no audio stream"));
        assert!(AudioError::Timeout(Duration::from_secs(3))
            .to_string()
            .contains("timed out"));
    }
}
