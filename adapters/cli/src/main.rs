#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Snake Arena client.

mod args;
mod config;
mod demo;
mod feed;
mod headless;
mod outbound;
mod session;

use crate::{
    args::Args, config::ClientConfig, feed::FeedReceiver, headless::HeadlessBackend,
    outbound::LineChannel, session::ClientSession,
};
use anyhow::{Context, Result};
use clap::Parser;
use snake_arena_rendering::{
    render_snapshot, FrameControl, Palette, Presentation, RecordingSurface, RenderingBackend,
};
use snake_arena_rendering_macroquad::{MacroquadBackend, MacroquadSurface};
use snake_arena_system_gesture::EventHub;
use std::{cell::RefCell, rc::Rc, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

const HEADLESS_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Entry point for the Snake Arena command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref())?;

    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(player_id) = &args.player_id {
        config.player_id = player_id.clone();
    }
    if let Some(vsync) = args.vsync() {
        config.vsync = vsync;
    }
    config.show_fps |= args.show_fps;

    let feed = open_feed(&args, &config)?;
    let channel = LineChannel::stdout(!args.offline);
    let presentation = Presentation::new(config.window_title.clone(), Palette::BACKGROUND);

    match args.headless {
        Some(frames) => run_headless(frames, &config, presentation, channel, feed),
        None => run_window(&config, presentation, channel, feed),
    }
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    // Stdout carries outbound commands.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn open_feed(args: &Args, config: &ClientConfig) -> Result<FeedReceiver> {
    match &args.replay {
        Some(path) if !args.demo => feed::spawn_replay(path, config.replay_interval()),
        _ => feed::spawn_demo(args.seed, &config.player_id, config.replay_interval()),
    }
}

fn run_window(
    config: &ClientConfig,
    presentation: Presentation,
    channel: LineChannel<std::io::Stdout>,
    feed: FeedReceiver,
) -> Result<()> {
    let backend = MacroquadBackend::new()
        .with_vsync(config.vsync)
        .with_show_fps(config.show_fps);

    let player_id = config.player_id.clone();
    let mut session = ClientSession::start(
        &config.player_id,
        config.stale_policy.into(),
        (backend.frame_scheduler(), backend.input_surface()),
        channel,
        feed,
        move |snapshot| {
            // No drawable window yet: skip this frame.
            if let Some(mut surface) = MacroquadSurface::acquire() {
                render_snapshot(&mut surface, snapshot, &player_id);
            }
        },
    );

    backend
        .run(presentation, move |_elapsed| {
            session.pump();
            FrameControl::Continue
        })
        .context("macroquad backend failed")
}

fn run_headless(
    frames: u64,
    config: &ClientConfig,
    presentation: Presentation,
    channel: LineChannel<std::io::Stdout>,
    feed: FeedReceiver,
) -> Result<()> {
    let backend = HeadlessBackend::new(frames, HEADLESS_FRAME_INTERVAL);
    let recording = Rc::new(RefCell::new(RecordingSurface::new()));

    let canvas = Rc::clone(&recording);
    let player_id = config.player_id.clone();
    let mut session = ClientSession::start(
        &config.player_id,
        config.stale_policy.into(),
        (backend.frame_scheduler(), Rc::new(EventHub::new())),
        channel,
        feed,
        move |snapshot| render_snapshot(&mut *canvas.borrow_mut(), snapshot, &player_id),
    );

    backend.run(presentation, move |_elapsed| {
        session.pump();
        if session.is_feed_open() {
            FrameControl::Continue
        } else {
            FrameControl::Exit
        }
    })?;

    let recording = recording.borrow();
    info!(
        frames_painted = recording.frames(),
        last_frame_commands = recording.commands().len(),
        "headless summary"
    );
    Ok(())
}
