//! Turn parsed flags plus the config file into render and playback settings.
//!
//! Flags win over the file. Boolean flags can only switch a feature on.

use std::time::Duration;

use super::args::{Args, SPEED_RANGE};
use crate::ascii::{EmptyRampError, Ramp, RenderConfig, SizeRequest, DEFAULT_EDGE_THRESHOLD};
use crate::config::Config;
use crate::playback::PlaybackConfig;

/// Width after applying the config default. The configured width only
/// applies when no other size flag was given.
fn effective_width(args: &Args, config: &Config) -> Option<u32> {
    match (args.width, args.height, args.size) {
        (Some(w), _, _) => Some(w),
        (None, None, None) => config.render.width,
        _ => None,
    }
}

/// Build the [`RenderConfig`]. Highres forces color on.
pub fn render_config(args: &Args, config: &Config) -> Result<RenderConfig, EmptyRampError> {
    let ramp = match (&args.charset, &config.render.charset) {
        (Some(ramp), _) => ramp.clone(),
        (None, Some(chars)) => Ramp::parse(chars)?,
        (None, None) => Ramp::default(),
    };
    let highres = args.highres || config.render.highres;
    let size = SizeRequest::from_options(effective_width(args, config), args.height, args.size);
    let edge_threshold = args
        .edge_threshold
        .or(config.render.edge_threshold)
        .unwrap_or(DEFAULT_EDGE_THRESHOLD);

    Ok(RenderConfig::new()
        .with_size(size)
        .with_ramp(ramp)
        .with_color(args.color || config.render.color || highres)
        .with_html(args.html)
        .with_invert(args.invert || config.render.invert)
        .with_highres(highres)
        .with_flip(args.flipx, args.flipy)
        .with_edges_only(args.edges_only)
        .with_fill(args.fill || config.render.fill)
        .with_border(args.border || config.render.border)
        .with_edge_threshold(edge_threshold))
}

/// Size request for a still image. Fullscreen takes the terminal width
/// and derives the height, but an explicit `--size` still wins.
pub fn image_size(args: &Args, config: &Config, size: SizeRequest, cols: u16) -> SizeRequest {
    let fullscreen = args.fullscreen || config.playback.fullscreen;
    if fullscreen && args.size.is_none() {
        SizeRequest::Width(u32::from(cols).max(1))
    } else {
        size
    }
}

/// Build the [`PlaybackConfig`] around an already built render config.
pub fn playback_config(args: &Args, config: &Config, render: RenderConfig) -> PlaybackConfig {
    let (width, height) = match args.size {
        Some(size) => (Some(size.width), Some(size.height)),
        None => (effective_width(args, config), args.height),
    };

    let speed = args.speed.unwrap_or(config.playback.speed);
    let speed = if SPEED_RANGE.contains(&speed) {
        speed
    } else {
        log::warn!("configured speed {} is outside 0.5-2.0, using 1.0", speed);
        1.0
    };

    PlaybackConfig {
        render,
        fullscreen: args.fullscreen || config.playback.fullscreen,
        clear: args.clear || config.playback.clear,
        width,
        height,
        speed,
        audio: !args.no_audio && config.playback.audio,
        audio_timeout: Duration::from_secs(config.playback.audio_timeout_secs),
        warmup: Duration::from_millis(config.playback.warmup_ms),
        ..PlaybackConfig::default()
    }
}
