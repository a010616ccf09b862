//! External tool capabilities.
//!
//! Video decoding needs `ffmpeg` and `ffprobe`; audio needs `ffmpeg` and
//! `ffplay`. Each is detected once at startup and handed to whoever needs
//! it, so a missing tool shows up as an `Unavailable` value rather than a
//! failure deep inside playback.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Whether `tool -version` runs and exits successfully.
pub fn tool_available(tool: &Path) -> bool {
    matches!(
        Command::new(tool)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
        Ok(status) if status.success()
    )
}

fn first_missing<'a>(tools: &[&'a Path]) -> Option<&'a Path> {
    tools.iter().copied().find(|tool| !tool_available(tool))
}

/// Video decoding support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoCapability {
    Available { ffmpeg: PathBuf, ffprobe: PathBuf },
    Unavailable { reason: String },
}

impl VideoCapability {
    /// Probe `ffmpeg` and `ffprobe` on `PATH`.
    pub fn detect() -> Self {
        Self::detect_with(Path::new("ffmpeg"), Path::new("ffprobe"))
    }

    pub fn detect_with(ffmpeg: &Path, ffprobe: &Path) -> Self {
        match first_missing(&[ffmpeg, ffprobe]) {
            None => VideoCapability::Available {
                ffmpeg: ffmpeg.to_path_buf(),
                ffprobe: ffprobe.to_path_buf(),
            },
            Some(tool) => VideoCapability::Unavailable {
                reason: format!(
                    "{} is not installed or not on PATH; video playback needs ffmpeg and ffprobe",
                    tool.display()
                ),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, VideoCapability::Available { .. })
    }
}

/// Audio side-channel support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCapability {
    Available { ffmpeg: PathBuf, ffplay: PathBuf },
    Unavailable { reason: String },
}

impl AudioCapability {
    pub fn detect() -> Self {
        Self::detect_with(Path::new("ffmpeg"), Path::new("ffplay"))
    }

    pub fn detect_with(ffmpeg: &Path, ffplay: &Path) -> Self {
        match first_missing(&[ffmpeg, ffplay]) {
            None => AudioCapability::Available {
                ffmpeg: ffmpeg.to_path_buf(),
                ffplay: ffplay.to_path_buf(),
            },
            Some(tool) => AudioCapability::Unavailable {
                reason: format!("{} not found", tool.display()),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AudioCapability::Available { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "/nonexistent/glyphcast-missing-tool";

    #[test]
    fn test_missing_tool_not_available() {
        assert!(!tool_available(Path::new(MISSING)));
    }

    #[test]
    fn test_video_unavailable_names_tool() {
        let cap = VideoCapability::detect_with(Path::new(MISSING), Path::new("ffprobe"));
        assert!(!cap.is_available());
        match cap {
            VideoCapability::Unavailable { reason } => assert!(reason.contains(MISSING)),
            other => panic!("expected unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_audio_unavailable() {
        let cap = AudioCapability::detect_with(Path::new("ffmpeg"), Path::new(MISSING));
        assert!(!cap.is_available());
    }

    #[test]
    fn test_available_variant() {
        let cap = VideoCapability::Available {
            ffmpeg: "ffmpeg".into(),
            ffprobe: "ffprobe".into(),
        };
        assert!(cap.is_available());
    }
}
