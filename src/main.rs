use std::path::Path;

use clap::Parser;

use glyphcast::ascii::{self, RenderConfig};
use glyphcast::capability::{AudioCapability, VideoCapability};
use glyphcast::cli::{
    handle_config_action, image_size, playback_config, render_config, Args, Command,
};
use glyphcast::config::Config;
use glyphcast::error::{GlyphcastError, Result};
use glyphcast::pipeline::{setup_ctrlc_handler, FfmpegFrameSource};
use glyphcast::playback::{
    terminal_size, CancelToken, CrosstermTerminal, FfmpegAudio, PlaybackOutcome,
    PlaybackScheduler, SystemClock, Terminal,
};
use glyphcast::source::{is_video_path, load_image};

fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_level());

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if let Some(Command::Config { action }) = args.command.clone() {
        return handle_config_action(action, args.config.as_deref());
    }

    let config = Config::load(args.config.as_deref())?;
    let render = render_config(&args, &config)?;
    let input = args.input.clone().ok_or(GlyphcastError::MissingInput)?;

    if input != "-" && is_video_path(Path::new(&input)) {
        play_video(&args, &config, render, Path::new(&input))
    } else {
        render_image(&args, &config, render, &input)
    }
}

fn render_image(args: &Args, config: &Config, mut render: RenderConfig, input: &str) -> Result<()> {
    render.size = image_size(args, config, render.size, terminal_size().cols);

    let buffer = load_image(input)?;
    let text = ascii::render_source(Some(&buffer), &render);

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text)).map_err(|source| GlyphcastError::Write {
                path: path.clone(),
                source,
            })?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let mut terminal = CrosstermTerminal::stdout();
            if args.clear || config.playback.clear {
                terminal.clear()?;
            }
            terminal.present(&text)?;
        }
    }
    Ok(())
}

fn play_video(args: &Args, config: &Config, render: RenderConfig, path: &Path) -> Result<()> {
    if args.output.is_some() {
        log::warn!("--output is ignored for video input");
    }

    let mut source = FfmpegFrameSource::open(path, &VideoCapability::detect())?;
    let playback = playback_config(args, config, render);

    let cancel = CancelToken::new();
    if let Err(e) = setup_ctrlc_handler(cancel.clone()) {
        log::warn!("could not install Ctrl+C handler: {}", e);
    }

    let audio_enabled = playback.audio;
    let mut scheduler = PlaybackScheduler::new(playback, CrosstermTerminal::stdout(), SystemClock::new())
        .with_cancel_token(cancel);

    if audio_enabled {
        let capability = AudioCapability::detect();
        match FfmpegAudio::from_capability(&capability) {
            Some(audio) => scheduler = scheduler.with_audio(Box::new(audio)),
            None => {
                if let AudioCapability::Unavailable { reason } = &capability {
                    log::warn!("playing without audio: {}", reason);
                }
            }
        }
    }

    let report = scheduler.play(&mut source, path)?;
    if report.outcome == PlaybackOutcome::Interrupted {
        println!("Video stopped by user.");
    }
    Ok(())
}
