//! Find-edges convolution for the edges-only pre-pass.

use super::buffer::GrayBuffer;

/// Laplacian-style 3x3 find-edges kernel.
///
/// ```text
/// [-1 -1 -1]
/// [-1  8 -1]
/// [-1 -1 -1]
/// ```
const FIND_EDGES: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];

/// Apply the find-edges kernel to a grayscale image.
///
/// Interior pixels get the convolution result clamped to 0..=255. The
/// one-pixel border is copied from the source since the kernel does not fit
/// there. Images narrower or shorter than 3 pixels are returned unchanged.
pub fn find_edges(gray: &GrayBuffer) -> GrayBuffer {
    let width = gray.width;
    let height = gray.height;
    if width < 3 || height < 3 {
        return gray.clone();
    }

    let mut edges = gray.data.clone();
    let w = width as usize;

    for y in 1..height as usize - 1 {
        for x in 1..w - 1 {
            let mut acc: i32 = 0;
            for (ky, row) in FIND_EDGES.iter().enumerate() {
                for (kx, k) in row.iter().enumerate() {
                    let idx = (y + ky - 1) * w + (x + kx - 1);
                    acc += gray.data[idx] as i32 * k;
                }
            }
            edges[y * w + x] = acc.clamp(0, 255) as u8;
        }
    }

    GrayBuffer {
        width,
        height,
        data: edges,
    }
}

/// `255 - v` for every sample.
pub fn invert_gray(gray: &GrayBuffer) -> GrayBuffer {
    GrayBuffer {
        width: gray.width,
        height: gray.height,
        data: gray.data.iter().map(|&v| 255 - v).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32, data: Vec<u8>) -> GrayBuffer {
        GrayBuffer {
            width,
            height,
            data,
        }
    }

    #[test]
    fn test_flat_image_has_no_interior_edges() {
        let img = gray(4, 4, vec![120; 16]);
        let out = find_edges(&img);
        assert_eq!(out.data[5], 0);
        assert_eq!(out.data[6], 0);
        assert_eq!(out.data[9], 0);
        assert_eq!(out.data[10], 0);
    }

    #[test]
    fn test_border_is_copied() {
        let mut data = vec![10; 9];
        data[0] = 200;
        data[8] = 33;
        let out = find_edges(&gray(3, 3, data));
        assert_eq!(out.data[0], 200);
        assert_eq!(out.data[8], 33);
    }

    #[test]
    fn test_bright_spot_is_an_edge() {
        let mut data = vec![0; 9];
        data[4] = 50;
        let out = find_edges(&gray(3, 3, data));
        // 8 * 50 = 400, clamped
        assert_eq!(out.data[4], 255);
    }

    #[test]
    fn test_dark_spot_clamps_to_zero() {
        let mut data = vec![100; 9];
        data[4] = 0;
        let out = find_edges(&gray(3, 3, data));
        assert_eq!(out.data[4], 0);
    }

    #[test]
    fn test_small_image_passthrough() {
        let img = gray(2, 5, vec![7; 10]);
        assert_eq!(find_edges(&img), img);
    }

    #[test]
    fn test_invert_gray() {
        let out = invert_gray(&gray(3, 1, vec![0, 100, 255]));
        assert_eq!(out.data, vec![255, 155, 0]);
    }
}
