//! Configuration file handling for glyphcast.
//!
//! Loads configuration from `<config dir>/glyphcast/config.toml` or a custom path.
//! Command-line flags always take precedence over values read here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub playback: PlaybackSection,
}

/// Defaults for still and per-frame rendering.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct RenderSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default)]
    pub color: bool,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub highres: bool,
    #[serde(default)]
    pub fill: bool,
    #[serde(default)]
    pub border: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_threshold: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSection {
    #[serde(default = "default_true")]
    pub audio: bool,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default)]
    pub clear: bool,
    /// Seconds allowed for audio extraction.
    #[serde(default = "default_audio_timeout")]
    pub audio_timeout_secs: u64,
    /// Milliseconds between audio start and the first frame.
    #[serde(default = "default_warmup")]
    pub warmup_ms: u64,
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self {
            audio: true,
            speed: default_speed(),
            fullscreen: false,
            clear: false,
            audio_timeout_secs: default_audio_timeout(),
            warmup_ms: default_warmup(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_speed() -> f64 {
    1.0
}

fn default_audio_timeout() -> u64 {
    30
}

fn default_warmup() -> u64 {
    1000
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            config.validate().map_err(|reason| ConfigError::InvalidValue {
                path: path.clone(),
                reason,
            })?;
            log::debug!("loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Reject values the renderer cannot work with.
    fn validate(&self) -> Result<(), String> {
        if self.render.width == Some(0) {
            return Err("render.width must be at least 1".to_string());
        }
        Ok(())
    }

    /// Serialize back to TOML, as shown by `config show`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        path: PathBuf,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::InvalidValue { path, reason } => {
                write!(f, "Invalid config file '{}': {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("glyphcast").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/glyphcast/config.toml")
        })
}

/// Template written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# glyphcast configuration

[render]
# Glyph ramp from darkest to brightest
# charset = "...',;:clodxkO0KXNWM"
# Output width in characters (height follows the image aspect)
# width = 80
# 24-bit ANSI color
color = false
# Reverse the ramp (for light terminals)
invert = false
# Two pixel rows per line with half-block glyphs (implies color)
highres = false
# Paint cell backgrounds in color mode
fill = false
# Frame the output with +---+ rules
border = false

[playback]
# Play the soundtrack with ffplay when available
audio = true
# Playback rate, 0.5 to 2.0
speed = 1.0
# Fit every frame to the terminal
fullscreen = false
# Clear the screen before each frame
clear = false
# Seconds allowed for audio extraction
audio_timeout_secs = 30
# Delay between audio start and the first frame
warmup_ms = 1000
"#;
