//! Output size resolution for aspect-ratio-correct rendering.
//!
//! Terminal glyph cells are roughly twice as tall as they are wide, so the
//! row count is scaled down relative to the source aspect ratio. Half-block
//! rendering consumes two source rows per output line and needs a
//! correspondingly larger scale.

use std::fmt;
use std::str::FromStr;

/// Row scale for one-glyph-per-pixel rendering.
pub const CHAR_ASPECT_SCALE: f64 = 0.55;

/// Row scale for half-block rendering.
pub const HIGHRES_ASPECT_SCALE: f64 = 2.0;

/// Width used when neither width, height nor size is given.
pub const DEFAULT_WIDTH: u32 = 80;

/// Terminal bounds in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl Default for TerminalSize {
    /// 80x24, used whenever the terminal cannot be queried.
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

/// Explicit `WxH` output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

/// Errors from parsing a `WxH` size string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeParseError {
    #[error("invalid size '{0}', expected WIDTHxHEIGHT (e.g. 120x60)")]
    Format(String),
    #[error("invalid {axis} '{value}' in size")]
    Number { axis: &'static str, value: String },
    #[error("size dimensions must be greater than zero")]
    Zero,
}

impl FromStr for OutputSize {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| SizeParseError::Format(s.to_string()))?;
        let width: u32 = w.trim().parse().map_err(|_| SizeParseError::Number {
            axis: "width",
            value: w.to_string(),
        })?;
        let height: u32 = h.trim().parse().map_err(|_| SizeParseError::Number {
            axis: "height",
            value: h.to_string(),
        })?;
        if width == 0 || height == 0 {
            return Err(SizeParseError::Zero);
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which dimension drives sizing before the other is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeRequest {
    /// Both dimensions fixed.
    Explicit(OutputSize),
    /// Width fixed, height derived.
    Width(u32),
    /// Height fixed, width derived.
    Height(u32),
    /// Width defaults to [`DEFAULT_WIDTH`], height derived.
    #[default]
    Default,
}

impl SizeRequest {
    /// Combine the individual size options. An explicit size wins over
    /// everything, and width plus height together act as an explicit size.
    pub fn from_options(width: Option<u32>, height: Option<u32>, size: Option<OutputSize>) -> Self {
        match (size, width, height) {
            (Some(size), _, _) => SizeRequest::Explicit(size),
            (None, Some(width), Some(height)) => SizeRequest::Explicit(OutputSize { width, height }),
            (None, Some(width), None) => SizeRequest::Width(width),
            (None, None, Some(height)) => SizeRequest::Height(height),
            (None, None, None) => SizeRequest::Default,
        }
    }

    /// Resolve to concrete `(width, height)` for a source of the given aspect.
    /// Both dimensions are at least 1.
    pub fn resolve(self, aspect: f64, highres: bool) -> (u32, u32) {
        match self {
            SizeRequest::Explicit(size) => (size.width.max(1), size.height.max(1)),
            SizeRequest::Width(w) => {
                let w = w.max(1);
                (w, derive_height(w, aspect, highres))
            }
            SizeRequest::Height(h) => {
                let h = h.max(1);
                (derive_width(h, aspect, highres), h)
            }
            SizeRequest::Default => (DEFAULT_WIDTH, derive_height(DEFAULT_WIDTH, aspect, highres)),
        }
    }
}

#[inline]
fn aspect_scale(highres: bool) -> f64 {
    if highres {
        HIGHRES_ASPECT_SCALE
    } else {
        CHAR_ASPECT_SCALE
    }
}

/// `height = round(aspect * width * scale)`, at least 1.
///
/// `aspect` is `source_height / source_width`.
pub fn derive_height(width: u32, aspect: f64, highres: bool) -> u32 {
    let h = (aspect * width as f64 * aspect_scale(highres)).round();
    (h as u32).max(1)
}

/// `width = round(height / (aspect * scale))`, at least 1.
pub fn derive_width(height: u32, aspect: f64, highres: bool) -> u32 {
    let w = (height as f64 / (aspect * aspect_scale(highres))).round();
    (w as u32).max(1)
}

/// Fit a frame of `source_width` x `source_height` into the terminal.
///
/// Fullscreen starts from the terminal width. Windowed mode starts from the
/// requested size, or the raw frame size, and only shrinks when the result
/// would not fit. Overflowing heights are clamped and the width recomputed
/// from the clamped height. Half-block rendering draws two source rows per
/// terminal line, so its row bound is doubled.
pub fn fit_to_terminal(
    requested_width: Option<u32>,
    requested_height: Option<u32>,
    source_width: u32,
    source_height: u32,
    terminal: TerminalSize,
    highres: bool,
    fullscreen: bool,
) -> (u32, u32) {
    let aspect = source_height as f64 / source_width.max(1) as f64;
    let max_cols = (terminal.cols as u32).max(1);
    let max_rows = (terminal.rows as u32).max(1) * if highres { 2 } else { 1 };

    let (mut w, mut h) = if fullscreen {
        (max_cols, derive_height(max_cols, aspect, highres))
    } else {
        let w = requested_width.unwrap_or(source_width).max(1);
        let h = requested_height.unwrap_or_else(|| derive_height(w, aspect, highres));
        (w, h)
    };

    if w > max_cols {
        w = max_cols;
        h = derive_height(w, aspect, highres);
    }
    if h > max_rows {
        h = max_rows;
        w = derive_width(h, aspect, highres).min(max_cols);
    }

    (w, h.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(
            "120x60".parse::<OutputSize>(),
            Ok(OutputSize {
                width: 120,
                height: 60
            })
        );
        assert!(matches!(
            "120".parse::<OutputSize>(),
            Err(SizeParseError::Format(_))
        ));
        assert!(matches!(
            "abcx60".parse::<OutputSize>(),
            Err(SizeParseError::Number { axis: "width", .. })
        ));
        assert_eq!("0x5".parse::<OutputSize>(), Err(SizeParseError::Zero));
    }

    #[test]
    fn test_request_precedence() {
        let size = OutputSize {
            width: 10,
            height: 5,
        };
        assert_eq!(
            SizeRequest::from_options(Some(99), None, Some(size)),
            SizeRequest::Explicit(size)
        );
        assert_eq!(
            SizeRequest::from_options(Some(10), Some(5), None),
            SizeRequest::Explicit(size)
        );
        assert_eq!(
            SizeRequest::from_options(Some(7), None, None),
            SizeRequest::Width(7)
        );
        assert_eq!(
            SizeRequest::from_options(None, Some(7), None),
            SizeRequest::Height(7)
        );
        assert_eq!(SizeRequest::from_options(None, None, None), SizeRequest::Default);
    }

    #[test]
    fn test_default_width_square_source() {
        // 80 * 1.0 * 0.55 = 44
        assert_eq!(SizeRequest::Default.resolve(1.0, false), (80, 44));
        // 80 * 1.0 * 2.0 = 160
        assert_eq!(SizeRequest::Default.resolve(1.0, true), (80, 160));
    }

    #[test]
    fn test_derive_uses_rounding() {
        // 640x480 source: aspect 0.75, 100 * 0.75 * 0.55 = 41.25
        assert_eq!(derive_height(100, 0.75, false), 41);
        // 10 * 0.75 * 0.55 = 4.125 -> 4; 11 * 0.4125 = 4.5375 -> 5
        assert_eq!(derive_height(11, 0.75, false), 5);
        // 41 / 0.4125 = 99.39
        assert_eq!(derive_width(41, 0.75, false), 99);
    }

    #[test]
    fn test_derive_never_zero() {
        assert_eq!(derive_height(1, 0.01, false), 1);
        assert_eq!(derive_width(1, 100.0, false), 1);
    }

    #[test]
    fn test_zero_requests_resolve_to_one() {
        assert_eq!(SizeRequest::Width(0).resolve(1.0, false), (1, 1));
        assert_eq!(SizeRequest::Height(0).resolve(1.0, false), (2, 1));
        let zero = OutputSize {
            width: 0,
            height: 0,
        };
        assert_eq!(SizeRequest::Explicit(zero).resolve(1.0, false), (1, 1));
    }

    #[test]
    fn test_fullscreen_fits_width() {
        let term = TerminalSize { cols: 100, rows: 50 };
        // 16:9 source: 100 * 0.5625 * 0.55 = 30.94 -> 31 rows
        assert_eq!(fit_to_terminal(None, None, 1920, 1080, term, false, true), (100, 31));
    }

    #[test]
    fn test_fullscreen_clamps_tall_source() {
        let term = TerminalSize { cols: 100, rows: 20 };
        // portrait: aspect 2.0, derived height 110 > 20 -> width = 20 / 1.1 = 18.18
        assert_eq!(fit_to_terminal(None, None, 100, 200, term, false, true), (18, 20));
    }

    #[test]
    fn test_windowed_uses_frame_size_when_it_fits() {
        let term = TerminalSize { cols: 200, rows: 100 };
        // 40x40 frame: height 40 * 0.55 = 22
        assert_eq!(fit_to_terminal(None, None, 40, 40, term, false, false), (40, 22));
    }

    #[test]
    fn test_windowed_shrinks_wide_frame() {
        let term = TerminalSize::default();
        // 640x480 -> 80 wide, 80 * 0.75 * 0.55 = 33 rows > 24 -> 24 / 0.4125 = 58.18
        assert_eq!(fit_to_terminal(None, None, 640, 480, term, false, false), (58, 24));
    }

    #[test]
    fn test_windowed_respects_requested_size() {
        let term = TerminalSize { cols: 120, rows: 60 };
        assert_eq!(
            fit_to_terminal(Some(30), Some(10), 640, 480, term, false, false),
            (30, 10)
        );
    }

    #[test]
    fn test_highres_row_bound_is_doubled() {
        let term = TerminalSize { cols: 40, rows: 20 };
        // square: 40 * 2.0 = 80 rows of pixels > 40 -> clamp to 40, width 40 / 2 = 20
        assert_eq!(fit_to_terminal(None, None, 10, 10, term, true, true), (20, 40));
    }
}
