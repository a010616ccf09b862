//! Effective color extraction with the fixed alpha threshold.

use super::buffer::PixelBuffer;

/// Pixels with alpha below this value render as black.
pub const ALPHA_THRESHOLD: u8 = 128;

/// RGB color of a rendered cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unweighted mean of the three channels, truncated.
    #[inline]
    pub fn luminance(self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }
}

/// Color of the pixel at `(x, y)` as the renderer sees it.
#[inline]
pub fn effective_rgb(buffer: &PixelBuffer, x: u32, y: u32) -> Rgb {
    let [r, g, b, a] = buffer.pixel(x, y);
    if a < ALPHA_THRESHOLD {
        Rgb::BLACK
    } else {
        Rgb { r, g, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(px: [u8; 4]) -> PixelBuffer {
        PixelBuffer::from_pixels(1, 1, &[px]).unwrap()
    }

    #[test]
    fn test_transparent_pixel_is_black() {
        assert_eq!(effective_rgb(&single([255, 0, 0, 50]), 0, 0), Rgb::BLACK);
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(effective_rgb(&single([9, 8, 7, 127]), 0, 0), Rgb::BLACK);
        assert_eq!(
            effective_rgb(&single([9, 8, 7, 128]), 0, 0),
            Rgb::new(9, 8, 7)
        );
    }

    #[test]
    fn test_opaque_pixel_unmodified() {
        assert_eq!(
            effective_rgb(&single([12, 200, 33, 255]), 0, 0),
            Rgb::new(12, 200, 33)
        );
    }

    #[test]
    fn test_luminance_truncates() {
        assert_eq!(Rgb::new(255, 255, 255).luminance(), 255);
        assert_eq!(Rgb::new(1, 1, 0).luminance(), 0);
        assert_eq!(Rgb::new(255, 0, 0).luminance(), 85);
        assert_eq!(Rgb::new(100, 101, 102).luminance(), 101);
    }
}
