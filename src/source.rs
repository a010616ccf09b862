//! Input acquisition for still images.

use std::io::Read;
use std::path::Path;

use crate::ascii::{BufferError, PixelBuffer};

/// File extensions treated as video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("image {path} is unusable: {source}")]
    Empty {
        path: String,
        #[source]
        source: BufferError,
    },
}

/// Whether `path` names a video by its extension (case-insensitive).
pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Decode an encoded image into an RGBA buffer.
pub fn decode_image(bytes: &[u8], name: &str) -> Result<PixelBuffer, SourceError> {
    let img = image::load_from_memory(bytes).map_err(|source| SourceError::Decode {
        path: name.to_string(),
        source,
    })?;
    PixelBuffer::from_rgba_image(img.to_rgba8()).map_err(|source| SourceError::Empty {
        path: name.to_string(),
        source,
    })
}

/// Load an image from `input`, where `-` means stdin.
pub fn load_image(input: &str) -> Result<PixelBuffer, SourceError> {
    let bytes = if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .map_err(|source| SourceError::Read {
                path: "<stdin>".to_string(),
                source,
            })?;
        bytes
    } else {
        let path = Path::new(input);
        if !path.exists() {
            return Err(SourceError::NotFound(input.to_string()));
        }
        std::fs::read(path).map_err(|source| SourceError::Read {
            path: input.to_string(),
            source,
        })?
    };

    let buffer = decode_image(&bytes, input)?;
    log::debug!("loaded {} ({}x{})", input, buffer.width(), buffer.height());
    Ok(buffer)
}
