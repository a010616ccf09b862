//! Decoded pixel buffers and the derived buffers the renderer produces.

/// Errors raised when constructing a [`PixelBuffer`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("pixel buffer must be at least 1x1, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("pixel buffer of {width}x{height} needs {expected} bytes, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A width x height grid of RGBA samples, row-major, 4 bytes per pixel.
///
/// Buffers are never mutated after construction. Every transform
/// ([`mirrored`](Self::mirrored), [`flipped`](Self::flipped), resampling,
/// edge filtering) returns a fresh buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Bytes per pixel (R, G, B, A).
    pub const CHANNELS: usize = 4;

    /// Wrap raw RGBA bytes, validating the dimensions against the data length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize * Self::CHANNELS;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Skip validation for buffers whose size is correct by construction.
    pub(crate) fn from_raw_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * Self::CHANNELS);
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a buffer from a list of pixels given in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: &[[u8; 4]]) -> Result<Self, BufferError> {
        Self::new(width, height, pixels.iter().flatten().copied().collect())
    }

    /// Convert a decoded `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Result<Self, BufferError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `height / width` of the source, used by every sizing formula.
    pub fn aspect(&self) -> f64 {
        self.height as f64 / self.width as f64
    }

    /// RGBA sample at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Horizontal mirror (left <-> right).
    pub fn mirrored(&self) -> Self {
        let row_bytes = self.width as usize * Self::CHANNELS;
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(row_bytes) {
            for px in row.chunks_exact(Self::CHANNELS).rev() {
                data.extend_from_slice(px);
            }
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Vertical flip (top <-> bottom).
    pub fn flipped(&self) -> Self {
        let row_bytes = self.width as usize * Self::CHANNELS;
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(row_bytes).rev() {
            data.extend_from_slice(row);
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Single-channel luminance using the ITU-R BT.601 weights.
    ///
    /// Integer math with coefficients scaled by 1000. Alpha is ignored.
    pub fn to_luminance(&self) -> GrayBuffer {
        let data = self
            .data
            .chunks_exact(Self::CHANNELS)
            .map(|px| {
                let r = px[0] as u32;
                let g = px[1] as u32;
                let b = px[2] as u32;
                ((299 * r + 587 * g + 114 * b) / 1000) as u8
            })
            .collect();
        GrayBuffer {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Single-channel 8-bit image, used by the edge pre-pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayBuffer {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

impl GrayBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Expand back to opaque RGBA so the result can re-enter the glyph path.
    pub fn to_rgba(&self) -> PixelBuffer {
        let mut data = Vec::with_capacity(self.data.len() * PixelBuffer::CHANNELS);
        for &v in &self.data {
            data.extend_from_slice(&[v, v, v, 255]);
        }
        PixelBuffer {
            width: self.width,
            height: self.height,
            data,
        }
    }
}
