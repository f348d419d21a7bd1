#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Graph Chase experience.

mod config;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use graph_chase_core::{LevelConfig, WELCOME_BANNER};
use graph_chase_rendering::{Color, FrameInput, Presentation, RenderingBackend};
use graph_chase_rendering_macroquad::MacroquadBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Args,
    session::{Session, TICK},
};

const CLEAR_COLOR: Color = Color::from_rgb_u8(18, 20, 28);

/// Entry point for the Graph Chase command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.level_config()?;
    info!(
        banner = WELCOME_BANNER,
        columns = config.columns,
        rows = config.rows,
        enemies = config.enemy_count,
        seed = config.seed,
        "starting"
    );

    match args.headless_ticks {
        Some(ticks) => run_headless(config, ticks),
        None => run_windowed(config, &args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Simulates `ticks` steps without input and reports how the level ended.
fn run_headless(config: LevelConfig, ticks: u64) -> Result<()> {
    let mut session = Session::new(config)?;
    for _ in 0..ticks {
        let _ = session.advance(TICK, FrameInput::default());
    }
    info!(
        outcome = ?session.outcome(),
        tick = session.tick_index(),
        "headless_run_finished"
    );
    Ok(())
}

fn run_windowed(config: LevelConfig, args: &Args) -> Result<()> {
    let mut session = Session::new(config)?;
    let mut scene = session.scene()?;
    session.populate_scene(&mut scene);

    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);
    backend
        .run(
            Presentation::new("Graph Chase", CLEAR_COLOR, scene),
            move |frame, input, scene| {
                let _ = session.advance(frame, input);
                session.populate_scene(scene);
            },
        )
        .context("rendering backend failed")
}
