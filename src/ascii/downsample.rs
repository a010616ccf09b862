//! Area resampling of pixel buffers to an exact character grid.

use super::buffer::PixelBuffer;

/// Resample `src` to exactly `width` x `height` pixels.
///
/// Each output pixel averages all four channels over the source area it
/// covers. When enlarging, an area can be narrower than one pixel, in which
/// case the nearest source pixel is used. Same-size requests return a copy.
///
/// # Panics
/// Panics if `width` or `height` is zero.
pub fn resample(src: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    assert!(width > 0 && height > 0, "resample target must be non-empty");
    if width == src.width() && height == src.height() {
        return src.clone();
    }

    let img_w = src.width();
    let img_h = src.height();
    let cell_w = img_w as f64 / width as f64;
    let cell_h = img_h as f64 / height as f64;
    let data = src.data();

    let mut out = Vec::with_capacity(width as usize * height as usize * PixelBuffer::CHANNELS);

    for cy in 0..height {
        let (start_y, end_y) = span(cy, cell_h, img_h);
        for cx in 0..width {
            let (start_x, end_x) = span(cx, cell_w, img_w);

            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for py in start_y..end_y {
                for px in start_x..end_x {
                    let idx = (py as usize * img_w as usize + px as usize) * PixelBuffer::CHANNELS;
                    for (c, s) in sum.iter_mut().enumerate() {
                        *s += data[idx + c] as u32;
                    }
                    count += 1;
                }
            }

            for s in sum {
                out.push((s / count) as u8);
            }
        }
    }

    PixelBuffer::from_raw_parts(width, height, out)
}

/// Source pixel range covered by output cell `i`, never empty.
#[inline]
fn span(i: u32, cell: f64, limit: u32) -> (u32, u32) {
    let start = ((i as f64 * cell) as u32).min(limit - 1);
    let end = (((i + 1) as f64 * cell) as u32).clamp(start + 1, limit);
    (start, end)
}
