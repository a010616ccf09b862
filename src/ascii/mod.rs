//! Pixel-to-glyph rendering engine.
//!
//! Converts a decoded RGBA buffer into a block of text:
//!
//! 1. **Transforms** - optional mirror, flip and find-edges pre-pass
//! 2. **Sizing** - resolve the output grid from width, height or `WxH`
//! 3. **Resampling** - area resample to exactly that grid
//! 4. **Mapping** - one ramp glyph per pixel, or a half-block per row pair
//! 5. **Framing** - optional border and HTML container
//!
//! Output cells are plain glyphs, 24-bit ANSI colored glyphs, or inline
//! styled HTML spans depending on [`OutputMode`].

mod buffer;
mod charset;
mod dimensions;
mod downsample;
mod edges;
mod mapping;
mod render;
mod sampler;

pub use buffer::{BufferError, GrayBuffer, PixelBuffer};
pub use charset::{
    EmptyRampError, Ramp, BLOCKS_RAMP, DEFAULT_RAMP, LOWER_HALF_BLOCK, UPPER_HALF_BLOCK,
};
pub use dimensions::{
    derive_height, derive_width, fit_to_terminal, OutputSize, SizeParseError, SizeRequest,
    TerminalSize, CHAR_ASPECT_SCALE, DEFAULT_WIDTH, HIGHRES_ASPECT_SCALE,
};
pub use downsample::resample;
pub use edges::{find_edges, invert_gray};
pub use mapping::{
    color_token, half_block_glyph, luminance_to_glyph, pixel_cell, Cell, ColorVariant,
    OutputMode, ANSI_RESET,
};
pub use render::{
    render, render_source, FrameRenderer, RenderConfig, TextBlock, DEFAULT_EDGE_THRESHOLD,
    HTML_PRE_CLOSE, HTML_PRE_OPEN, NO_IMAGE_MESSAGE,
};
pub use sampler::{effective_rgb, Rgb, ALPHA_THRESHOLD};
