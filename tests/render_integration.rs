//! Integration tests for the pixel-to-glyph renderer.
//!
//! These exercise the public rendering surface end to end:
//! - Glyph mapping properties (monotonic, involutive invert)
//! - Alpha handling
//! - Borders, half-block rows and HTML/ANSI framing
//! - Terminal fitting used by video playback

use glyphcast::ascii::*;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn explicit(width: u32, height: u32) -> SizeRequest {
    SizeRequest::Explicit(OutputSize { width, height })
}

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y) * 255 / (width + height - 2).max(1)) as u8;
            pixels.push([v, v, v, 255]);
        }
    }
    PixelBuffer::from_pixels(width, height, &pixels).unwrap()
}

// ==================== Glyph Mapping ====================

#[test]
fn test_luminance_to_glyph_is_monotonic() {
    for chars in [DEFAULT_RAMP, BLOCKS_RAMP, "ab", "x", " .:-=+*#%@"] {
        let ramp = Ramp::parse(chars).unwrap();
        let index_of = |c: char| ramp.chars().iter().position(|&g| g == c).unwrap();
        let mut last = 0;
        for lum in 0..=255u8 {
            let glyph = luminance_to_glyph(lum, &ramp);
            let idx = index_of(glyph);
            assert!(idx >= last, "ramp {:?} went backwards at {}", chars, lum);
            last = idx;
        }
        assert_eq!(luminance_to_glyph(255, &ramp), ramp.last());
    }
}

#[test]
fn test_invert_twice_is_identity() {
    let ramp = Ramp::default();
    let twice = ramp.inverted().inverted();
    assert_eq!(twice, ramp);
    for lum in 0..=255u8 {
        assert_eq!(luminance_to_glyph(lum, &twice), luminance_to_glyph(lum, &ramp));
    }
}

#[test]
fn test_white_pixel_renders_last_ramp_glyph() {
    let buf = PixelBuffer::from_pixels(1, 1, &[WHITE]).unwrap();
    let cfg = RenderConfig::new().with_size(explicit(1, 1));
    let last = Ramp::default().last();
    assert_eq!(render(&buf, &cfg).to_string(), last.to_string());
}

#[test]
fn test_low_alpha_treated_as_black() {
    let buf = PixelBuffer::from_pixels(1, 1, &[[255, 0, 0, 50]]).unwrap();
    assert_eq!(effective_rgb(&buf, 0, 0), Rgb::BLACK);

    let plain = RenderConfig::new().with_size(explicit(1, 1));
    assert_eq!(render(&buf, &plain).to_string(), ".");

    let colored = plain.with_color(true);
    let out = render(&buf, &colored).to_string();
    assert!(out.starts_with("\x1b[38;2;0;0;0m"), "got {:?}", out);
}

// ==================== Framing ====================

#[test]
fn test_border_geometry() {
    let cfg = RenderConfig::new().with_size(explicit(7, 4)).with_border(true);
    let block = render(&gradient(14, 8), &cfg);
    let lines = block.lines();
    assert_eq!(lines.len(), 4 + 2);
    let rule = format!("+{}+", "-".repeat(7));
    assert_eq!(lines[0], rule);
    assert_eq!(lines[lines.len() - 1], rule);
    for line in &lines[1..lines.len() - 1] {
        assert_eq!(line.chars().count(), 7 + 2);
        assert!(line.starts_with('|') && line.ends_with('|'));
    }
}

#[test]
fn test_colored_border_counts_visible_cells() {
    let cfg = RenderConfig::new()
        .with_size(explicit(3, 2))
        .with_color(true)
        .with_border(true);
    let block = render(&gradient(3, 2), &cfg);
    assert_eq!(block.lines()[0], "+---+");
}

#[test]
fn test_ansi_cells_always_reset() {
    let cfg = RenderConfig::new().with_size(explicit(4, 2)).with_color(true);
    let block = render(&gradient(4, 2), &cfg);
    for line in block.lines() {
        assert_eq!(line.matches("\x1b[38;2;").count(), 4);
        assert_eq!(line.matches(ANSI_RESET).count(), 4);
        assert!(line.ends_with(ANSI_RESET));
    }
}

#[test]
fn test_html_output_wrapped_in_pre() {
    let cfg = RenderConfig::new()
        .with_size(explicit(2, 1))
        .with_color(true)
        .with_html(true);
    let buf = PixelBuffer::from_pixels(2, 1, &[WHITE, BLACK]).unwrap();
    let out = render(&buf, &cfg).to_string();
    assert!(out.starts_with(HTML_PRE_OPEN));
    assert!(out.ends_with(HTML_PRE_CLOSE));
    assert!(out.contains("<span style=\"color:rgb(255,255,255)\">M</span>"));
    assert!(!out.contains('\x1b'));
}

#[test]
fn test_missing_source_is_textual_error() {
    assert_eq!(render_source(None, &RenderConfig::default()), NO_IMAGE_MESSAGE);
}

// ==================== Half-block Rows ====================

#[test]
fn test_highres_scenario_two_by_two() {
    let buf = PixelBuffer::from_pixels(2, 2, &[WHITE, BLACK, BLACK, WHITE]).unwrap();
    let cfg = RenderConfig::new().with_size(explicit(2, 2)).with_highres(true);
    let block = render(&buf, &cfg);
    assert_eq!(block.lines(), &[format!("{}{}", UPPER_HALF_BLOCK, LOWER_HALF_BLOCK)]);
}

#[test]
fn test_highres_even_height_pairs_all_rows() {
    let cfg = RenderConfig::new().with_size(explicit(3, 6)).with_highres(true);
    let block = render(&gradient(3, 6), &cfg);
    assert_eq!(block.line_count(), 3);
    for line in block.lines() {
        assert!(line
            .chars()
            .all(|c| c == UPPER_HALF_BLOCK || c == LOWER_HALF_BLOCK));
    }
}

#[test]
fn test_highres_odd_height_keeps_last_row() {
    let buf = PixelBuffer::from_pixels(3, 3, &[WHITE; 9]).unwrap();
    let cfg = RenderConfig::new().with_size(explicit(3, 3)).with_highres(true);
    let block = render(&buf, &cfg);
    assert_eq!(block.line_count(), 2);
    assert_eq!(block.lines()[1], "MMM");
}

#[test]
fn test_highres_color_uses_foreground_and_background() {
    let buf = PixelBuffer::from_pixels(1, 2, &[WHITE, BLACK]).unwrap();
    let cfg = RenderConfig::new()
        .with_size(explicit(1, 2))
        .with_highres(true)
        .with_color(true);
    let out = render(&buf, &cfg).to_string();
    assert!(out.contains("\x1b[38;2;255;255;255m"));
    assert!(out.contains("\x1b[48;2;0;0;0m"));
    assert!(out.contains(UPPER_HALF_BLOCK));
}

// ==================== Sizing ====================

#[test]
fn test_width_only_derives_height_from_aspect() {
    let cfg = RenderConfig::new().with_size(SizeRequest::Width(40));
    let block = render(&gradient(100, 100), &cfg);
    assert_eq!(block.line_count(), 22);
    assert!(block.lines().iter().all(|l| l.chars().count() == 40));
}

#[test]
fn test_zero_width_request_renders_one_column() {
    let buf = PixelBuffer::from_pixels(2, 2, &[WHITE; 4]).unwrap();
    let cfg = RenderConfig::new().with_size(SizeRequest::Width(0));
    let block = render(&buf, &cfg);
    assert_eq!(block.line_count(), 1);
    assert_eq!(block.lines()[0].chars().count(), 1);
}

#[test]
fn test_fullscreen_fits_terminal() {
    let term = TerminalSize { cols: 80, rows: 24 };
    let (w, h) = fit_to_terminal(None, None, 1920, 1080, term, false, true);
    assert!(w <= 80 && h <= 24);
    assert!(w >= 70, "16:9 source should use most of the width, got {}", w);

    // a tall source is bound by rows and the width shrinks to match
    let (w, h) = fit_to_terminal(None, None, 500, 2000, term, false, true);
    assert_eq!(h, 24);
    assert!(w < 80);
}

#[test]
fn test_windowed_keeps_request_when_it_fits() {
    let term = TerminalSize { cols: 200, rows: 100 };
    assert_eq!(
        fit_to_terminal(Some(60), Some(20), 640, 360, term, false, false),
        (60, 20)
    );
}

#[test]
fn test_windowed_clamps_oversized_request() {
    let term = TerminalSize { cols: 50, rows: 20 };
    let (w, h) = fit_to_terminal(Some(120), None, 640, 360, term, false, false);
    assert!(w <= 50);
    assert!(h <= 20);
}

// ==================== Transforms ====================

#[test]
fn test_flip_flags_reorder_cells() {
    let buf = PixelBuffer::from_pixels(2, 1, &[WHITE, BLACK]).unwrap();
    let base = RenderConfig::new().with_size(explicit(2, 1));
    assert_eq!(render(&buf, &base).to_string(), "M.");
    assert_eq!(render(&buf, &base.clone().with_flip(true, false)).to_string(), ".M");
}

#[test]
fn test_edges_only_flat_image_is_dark() {
    let buf = PixelBuffer::from_pixels(5, 5, &[[120, 120, 120, 255]; 25]).unwrap();
    let cfg = RenderConfig::new()
        .with_size(explicit(5, 5))
        .with_edges_only(true);
    let block = render(&buf, &cfg);
    // interior pixels of a flat field have no edges
    assert_eq!(block.lines()[2].chars().nth(2), Some('.'));
}
