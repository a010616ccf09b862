//! Luminance to glyph mapping and color cell encoding.

use std::fmt::Write as _;

use super::charset::{Ramp, LOWER_HALF_BLOCK, UPPER_HALF_BLOCK};
use super::sampler::Rgb;

/// ANSI reset, emitted after every colored glyph.
pub const ANSI_RESET: &str = "\x1b[0m";

/// How finished cells are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Glyphs only, colors dropped.
    #[default]
    Plain,
    /// 24-bit ANSI escape sequences.
    Ansi,
    /// Inline-styled HTML spans.
    Html,
}

impl OutputMode {
    /// Pick the output mode from the `color` and `html` flags.
    ///
    /// HTML without color still escapes glyphs; the cells simply carry no
    /// colors to emit.
    pub fn from_flags(color: bool, html: bool) -> Self {
        match (color, html) {
            (_, true) => OutputMode::Html,
            (true, false) => OutputMode::Ansi,
            (false, false) => OutputMode::Plain,
        }
    }
}

/// Color token shape for one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorVariant {
    /// `ESC[38;2;r;g;bm` + glyph + reset.
    AnsiForeground(Rgb),
    /// Optional foreground, then `ESC[48;2;r;g;bm` + glyph + reset.
    AnsiBackground { fg: Option<Rgb>, bg: Rgb },
    /// `<span style="color:rgb(..)">`.
    HtmlForeground(Rgb),
    /// Both colors in one style attribute.
    HtmlForegroundBackground { fg: Rgb, bg: Rgb },
}

/// Map a luminance value onto the ramp.
///
/// `index = floor(lum / 255 * (len - 1))`, computed with integer math.
#[inline]
pub fn luminance_to_glyph(lum: u8, ramp: &Ramp) -> char {
    let levels = ramp.len();
    let idx = (lum as usize * (levels - 1)) / 255;
    ramp.chars()[idx]
}

/// Wrap a glyph in a color token. ANSI tokens always end in a reset.
pub fn color_token(glyph: char, variant: ColorVariant) -> String {
    let mut out = String::with_capacity(48);
    match variant {
        ColorVariant::AnsiForeground(fg) => {
            push_ansi(&mut out, 38, fg);
            out.push(glyph);
            out.push_str(ANSI_RESET);
        }
        ColorVariant::AnsiBackground { fg, bg } => {
            if let Some(fg) = fg {
                push_ansi(&mut out, 38, fg);
            }
            push_ansi(&mut out, 48, bg);
            out.push(glyph);
            out.push_str(ANSI_RESET);
        }
        ColorVariant::HtmlForeground(fg) => {
            let _ = write!(
                out,
                "<span style=\"color:rgb({},{},{})\">",
                fg.r, fg.g, fg.b
            );
            push_html_glyph(&mut out, glyph);
            out.push_str("</span>");
        }
        ColorVariant::HtmlForegroundBackground { fg, bg } => {
            let _ = write!(
                out,
                "<span style=\"color:rgb({},{},{});background-color:rgb({},{},{})\">",
                fg.r, fg.g, fg.b, bg.r, bg.g, bg.b
            );
            push_html_glyph(&mut out, glyph);
            out.push_str("</span>");
        }
    }
    out
}

fn push_ansi(out: &mut String, layer: u8, c: Rgb) {
    let _ = write!(out, "\x1b[{};2;{};{};{}m", layer, c.r, c.g, c.b);
}

/// Append a glyph, escaping the characters that are markup in HTML.
pub(crate) fn push_html_glyph(out: &mut String, glyph: char) {
    match glyph {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        c => out.push(c),
    }
}

/// One rendered output unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Glyph with no color.
    Plain(char),
    /// Glyph drawn in the sample color.
    Colored { glyph: char, fg: Rgb },
    /// Glyph on a background of the sample color.
    Filled { glyph: char, bg: Rgb },
    /// Half-block glyph carrying two stacked samples.
    HalfBlock { glyph: char, fg: Rgb, bg: Rgb },
}

impl Cell {
    pub fn glyph(&self) -> char {
        match *self {
            Cell::Plain(glyph)
            | Cell::Colored { glyph, .. }
            | Cell::Filled { glyph, .. }
            | Cell::HalfBlock { glyph, .. } => glyph,
        }
    }

    /// Serialize the cell into `out`.
    pub fn encode_into(&self, mode: OutputMode, out: &mut String) {
        match (mode, *self) {
            (OutputMode::Plain, cell) => out.push(cell.glyph()),
            (OutputMode::Html, Cell::Plain(glyph)) => push_html_glyph(out, glyph),
            (OutputMode::Ansi, Cell::Plain(glyph)) => out.push(glyph),
            (OutputMode::Ansi, Cell::Colored { glyph, fg }) => {
                out.push_str(&color_token(glyph, ColorVariant::AnsiForeground(fg)))
            }
            (OutputMode::Ansi, Cell::Filled { glyph, bg }) => {
                out.push_str(&color_token(glyph, ColorVariant::AnsiBackground { fg: None, bg }))
            }
            (OutputMode::Ansi, Cell::HalfBlock { glyph, fg, bg }) => out.push_str(&color_token(
                glyph,
                ColorVariant::AnsiBackground { fg: Some(fg), bg },
            )),
            (OutputMode::Html, Cell::Colored { glyph, fg }) => {
                out.push_str(&color_token(glyph, ColorVariant::HtmlForeground(fg)))
            }
            (OutputMode::Html, Cell::Filled { glyph, bg }) => out.push_str(&color_token(
                glyph,
                ColorVariant::HtmlForegroundBackground {
                    fg: contrast_for(bg),
                    bg,
                },
            )),
            (OutputMode::Html, Cell::HalfBlock { glyph, fg, bg }) => out.push_str(&color_token(
                glyph,
                ColorVariant::HtmlForegroundBackground { fg, bg },
            )),
        }
    }

    pub fn encode(&self, mode: OutputMode) -> String {
        let mut out = String::new();
        self.encode_into(mode, &mut out);
        out
    }
}

/// Black on light backgrounds, white on dark ones.
fn contrast_for(bg: Rgb) -> Rgb {
    if bg.luminance() >= 128 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

/// Single-pixel cell for the given sample.
///
/// `ramp` must already be inverted when the invert flag is set.
pub fn pixel_cell(rgb: Rgb, ramp: &Ramp, color: bool, fill: bool) -> Cell {
    let glyph = luminance_to_glyph(rgb.luminance(), ramp);
    match (color, fill) {
        (false, _) => Cell::Plain(glyph),
        (true, false) => Cell::Colored { glyph, fg: rgb },
        (true, true) => Cell::Filled { glyph, bg: rgb },
    }
}

/// Stacked cell for two vertically adjacent samples.
///
/// In color mode the upper half block always carries top as foreground and
/// bottom as background. Otherwise the brighter half wins, ties go to the
/// upper block, and `invert` flips each luminance before comparing.
pub fn half_block_glyph(top: Rgb, bottom: Rgb, color: bool, invert: bool) -> Cell {
    if color {
        return Cell::HalfBlock {
            glyph: UPPER_HALF_BLOCK,
            fg: top,
            bg: bottom,
        };
    }

    let mut top_lum = top.luminance();
    let mut bottom_lum = bottom.luminance();
    if invert {
        top_lum = 255 - top_lum;
        bottom_lum = 255 - bottom_lum;
    }
    if top_lum >= bottom_lum {
        Cell::Plain(UPPER_HALF_BLOCK)
    } else {
        Cell::Plain(LOWER_HALF_BLOCK)
    }
}
