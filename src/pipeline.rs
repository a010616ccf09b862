//! FFmpeg-backed frame source for video playback.
//!
//! The video is probed once with `ffprobe` for its geometry and frame rate,
//! then decoded by an `ffmpeg` child writing raw RGBA frames to stdout.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use serde::Deserialize;

use crate::ascii::PixelBuffer;
use crate::capability::VideoCapability;
use crate::playback::{CancelToken, FrameSource, PlaybackError, FALLBACK_FPS};

/// Geometry and timing of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    r_frame_rate: Option<String>,
    #[serde(default)]
    avg_frame_rate: Option<String>,
    #[serde(default)]
    nb_frames: Option<String>,
}

/// Parse an ffprobe rate such as `30000/1001` or `25`.
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    let value = raw.trim();
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Extract [`VideoInfo`] from `ffprobe -print_format json -show_streams` output.
pub fn parse_probe_output(json: &[u8]) -> Result<VideoInfo, String> {
    let parsed: ProbeOutput =
        serde_json::from_slice(json).map_err(|e| format!("invalid ffprobe output: {}", e))?;

    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| "no video stream".to_string())?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err("video stream has no dimensions".to_string()),
    };

    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(parse_frame_rate))
        .unwrap_or_else(|| {
            log::debug!("no usable frame rate reported, assuming {}", FALLBACK_FPS);
            FALLBACK_FPS
        });

    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.trim().parse::<u64>().ok())
        .filter(|n| *n > 0);

    Ok(VideoInfo {
        width,
        height,
        fps,
        frame_count,
    })
}

/// Run `ffprobe` on `path`.
pub fn probe(ffprobe: &Path, path: &Path) -> Result<VideoInfo, PlaybackError> {
    let open_failed = |reason: String| PlaybackError::OpenFailed {
        path: path.to_path_buf(),
        reason,
    };

    let output = Command::new(ffprobe)
        .args(["-v", "error", "-show_streams", "-print_format", "json"])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| open_failed(format!("failed to run {}: {}", ffprobe.display(), e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(open_failed(format!(
            "ffprobe exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    parse_probe_output(&output.stdout).map_err(open_failed)
}

/// Arguments that decode `path` to raw RGBA frames on stdout.
pub fn decode_args(path: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-nostdin".to_string(),
        "-noautorotate".to_string(),
        "-i".to_string(),
        path.display().to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgba".to_string(),
        "-".to_string(),
    ]
}

/// A running ffmpeg decoder.
pub struct FfmpegFrameSource {
    path: PathBuf,
    info: VideoInfo,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_thread: Option<JoinHandle<()>>,
}

impl FfmpegFrameSource {
    /// Probe and start decoding `path`.
    pub fn open(path: &Path, capability: &VideoCapability) -> Result<Self, PlaybackError> {
        let (ffmpeg, ffprobe) = match capability {
            VideoCapability::Available { ffmpeg, ffprobe } => (ffmpeg, ffprobe),
            VideoCapability::Unavailable { reason } => {
                return Err(PlaybackError::VideoUnavailable(reason.clone()))
            }
        };
        if !path.is_file() {
            return Err(PlaybackError::NotFound(path.to_path_buf()));
        }

        let info = probe(ffprobe, path)?;
        log::info!(
            "{}: {}x{} @ {:.3} fps",
            path.display(),
            info.width,
            info.height,
            info.fps
        );

        let mut child = Command::new(ffmpeg)
            .args(decode_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PlaybackError::OpenFailed {
                path: path.to_path_buf(),
                reason: format!("failed to spawn {}: {}", ffmpeg.display(), e),
            })?;

        let stdout = child.stdout.take();
        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                for line in BufReader::new(stderr).lines() {
                    match line {
                        Ok(l) => log::debug!("[ffmpeg] {}", l),
                        Err(_) => break,
                    }
                }
            })
        });

        Ok(Self {
            path: path.to_path_buf(),
            info,
            child: Some(child),
            stdout,
            stderr_thread,
        })
    }

    fn frame_len(&self) -> usize {
        self.info.width as usize * self.info.height as usize * 4
    }
}

impl FrameSource for FfmpegFrameSource {
    fn is_open(&self) -> bool {
        self.child.is_some() && self.stdout.is_some()
    }

    fn fps(&self) -> f64 {
        self.info.fps
    }

    fn frame_count(&self) -> Option<u64> {
        self.info.frame_count
    }

    fn next_frame(&mut self) -> Result<Option<PixelBuffer>, PlaybackError> {
        let len = self.frame_len();
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut data = vec![0u8; len];
        match stdout.read_exact(&mut data) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                log::debug!("{}: end of stream", self.path.display());
                self.stdout = None;
                return Ok(None);
            }
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        }

        PixelBuffer::new(self.info.width, self.info.height, data)
            .map(Some)
            .map_err(|e| PlaybackError::Decode(e.to_string()))
    }

    fn release(&mut self) -> Result<(), PlaybackError> {
        self.stdout = None;
        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                child.kill()?;
            }
            child.wait()?;
        }
        if let Some(handle) = self.stderr_thread.take() {
            let _ = handle.join();
        }
        Ok(())
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        if self.child.is_some() {
            let _ = self.release();
        }
    }
}

/// Install the Ctrl+C handler that cancels `token`.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler(token: CancelToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        token.cancel();
        log::info!("received Ctrl+C, stopping");
    })
}
