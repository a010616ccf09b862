//! Full image to text-block conversion.

use std::borrow::Cow;
use std::fmt;

use super::buffer::PixelBuffer;
use super::charset::Ramp;
use super::dimensions::SizeRequest;
use super::downsample::resample;
use super::edges::{find_edges, invert_gray};
use super::mapping::{half_block_glyph, pixel_cell, OutputMode};
use super::sampler::effective_rgb;

/// Message returned by [`render_source`] when there is nothing to render.
pub const NO_IMAGE_MESSAGE: &str = "Error: No image to convert.";

/// Opening tag of the HTML container.
pub const HTML_PRE_OPEN: &str = "<pre style='line-height:90%;font-family:monospace;background-color:black;color:white;text-align:center;'>";

/// Closing tag of the HTML container.
pub const HTML_PRE_CLOSE: &str = "</pre>";

/// Default edge threshold.
pub const DEFAULT_EDGE_THRESHOLD: f32 = 50.0;

/// One render request.
///
/// Built once and never modified while rendering. The `with_*` methods
/// consume and return the config so requests read as a single expression.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Which dimension drives sizing.
    pub size: SizeRequest,
    /// Glyph ramp, darkest first.
    pub ramp: Ramp,
    /// Emit true-color cells.
    pub color: bool,
    /// Emit an HTML fragment instead of terminal text.
    pub html: bool,
    /// Reverse the ramp (and the half-block and edge comparisons).
    pub invert: bool,
    /// Two source rows per output line using half-block glyphs.
    pub highres: bool,
    /// Mirror horizontally before anything else.
    pub flipx: bool,
    /// Flip vertically after the mirror.
    pub flipy: bool,
    /// Replace the image by its edges before mapping.
    pub edges_only: bool,
    /// Paint cell backgrounds in color mode.
    pub fill: bool,
    /// Frame the output with `+`, `-` and `|`.
    pub border: bool,
    /// Carried for callers; not used by the glyph mapping.
    pub edge_threshold: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: SizeRequest::Default,
            ramp: Ramp::default(),
            color: false,
            html: false,
            invert: false,
            highres: false,
            flipx: false,
            flipy: false,
            edges_only: false,
            fill: false,
            border: false,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: SizeRequest) -> Self {
        self.size = size;
        self
    }

    pub fn with_ramp(mut self, ramp: Ramp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_highres(mut self, highres: bool) -> Self {
        self.highres = highres;
        self
    }

    pub fn with_flip(mut self, flipx: bool, flipy: bool) -> Self {
        self.flipx = flipx;
        self.flipy = flipy;
        self
    }

    pub fn with_edges_only(mut self, edges_only: bool) -> Self {
        self.edges_only = edges_only;
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn with_edge_threshold(mut self, threshold: f32) -> Self {
        self.edge_threshold = threshold;
        self
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.color, self.html)
    }
}

/// Finished output: the rendered lines, optionally destined for HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    lines: Vec<String>,
    html: bool,
}

impl TextBlock {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_html(&self) -> bool {
        self.html
    }
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.html {
            f.write_str(HTML_PRE_OPEN)?;
        }
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        if self.html {
            f.write_str(HTML_PRE_CLOSE)?;
        }
        Ok(())
    }
}

/// Renders pixel buffers with one fixed configuration.
///
/// The ramp is inverted once at construction, so a renderer can be reused
/// for every frame of a video.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    config: RenderConfig,
    ramp: Ramp,
}

impl FrameRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let ramp = if config.invert {
            config.ramp.inverted()
        } else {
            config.ramp.clone()
        };
        Self { config, ramp }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render using the configured size request.
    pub fn render(&self, buffer: &PixelBuffer) -> TextBlock {
        self.render_with_size(buffer, self.config.size)
    }

    /// Render with a per-call size request, as video playback does per frame.
    pub fn render_with_size(&self, buffer: &PixelBuffer, size: SizeRequest) -> TextBlock {
        let cfg = &self.config;
        let img = self.prepare(buffer);

        let (width, height) = size.resolve(img.aspect(), cfg.highres);
        log::debug!(
            "rendering {}x{} source at {}x{} (highres={}, edge_threshold={})",
            buffer.width(),
            buffer.height(),
            width,
            height,
            cfg.highres,
            cfg.edge_threshold
        );
        let img = resample(&img, width, height);

        let mode = cfg.output_mode();
        let step = if cfg.highres { 2 } else { 1 };
        let mut lines = Vec::with_capacity((height as usize).div_ceil(step));

        for y in (0..height).step_by(step) {
            let mut line = String::with_capacity(width as usize);
            for x in 0..width {
                let cell = if cfg.highres && y + 1 < height {
                    half_block_glyph(
                        effective_rgb(&img, x, y),
                        effective_rgb(&img, x, y + 1),
                        cfg.color,
                        cfg.invert,
                    )
                } else {
                    pixel_cell(effective_rgb(&img, x, y), &self.ramp, cfg.color, cfg.fill)
                };
                cell.encode_into(mode, &mut line);
            }
            lines.push(line);
        }

        if cfg.border {
            lines = add_border(lines, width as usize);
        }

        TextBlock {
            lines,
            html: cfg.html,
        }
    }

    /// Mirror, flip and edge passes, in that order.
    fn prepare<'a>(&self, buffer: &'a PixelBuffer) -> Cow<'a, PixelBuffer> {
        let cfg = &self.config;
        let mut img = Cow::Borrowed(buffer);
        if cfg.flipx {
            img = Cow::Owned(img.mirrored());
        }
        if cfg.flipy {
            img = Cow::Owned(img.flipped());
        }
        if cfg.edges_only {
            let mut gray = find_edges(&img.to_luminance());
            if cfg.invert {
                gray = invert_gray(&gray);
            }
            img = Cow::Owned(gray.to_rgba());
        }
        img
    }
}

/// Wrap each line in `|` and add `+---+` rules sized to `content_width`
/// visible cells.
fn add_border(lines: Vec<String>, content_width: usize) -> Vec<String> {
    let rule = format!("+{}+", "-".repeat(content_width));
    let mut framed = Vec::with_capacity(lines.len() + 2);
    framed.push(rule.clone());
    framed.extend(lines.into_iter().map(|line| format!("|{}|", line)));
    framed.push(rule);
    framed
}

/// Render one buffer with one configuration.
pub fn render(buffer: &PixelBuffer, config: &RenderConfig) -> TextBlock {
    FrameRenderer::new(config.clone()).render(buffer)
}

/// Render a buffer that may be missing, returning the textual error result
/// instead of failing.
pub fn render_source(buffer: Option<&PixelBuffer>, config: &RenderConfig) -> String {
    match buffer {
        Some(buffer) => render(buffer, config).to_string(),
        None => NO_IMAGE_MESSAGE.to_string(),
    }
}
