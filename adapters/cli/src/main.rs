#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a dungeon and plays it headlessly.

mod headless;
mod levels;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use roomcrawl_core::{Difficulty, Event};
use roomcrawl_rendering::{
    dispatch_audio, Animator, Color, Presentation, RenderingBackend, Scene, UniformAnimations,
};
use roomcrawl_system_generation::Config;
use roomcrawl_system_session::{GameSession, SessionConfig};
use roomcrawl_world::query;
use tracing::{info, warn};

use crate::{
    headless::{HeadlessBackend, LoggingAudio, ScriptedInput},
    settings::Settings,
};

const DEFAULT_LEVELS: &str = "levels";
const DEFAULT_ARM_LENGTH: u32 = 5;
const DEFAULT_TICKS: u64 = 600;
const FRAME_TIME: Duration = Duration::from_millis(16);
const INPUT_HOLD_FRAMES: u32 = 30;
const ANIMATION_FRAMES: usize = 4;
const ANIMATION_FRAME_TIME: Duration = Duration::from_millis(100);

/// Difficulty presets accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roomcrawl",
    about = "Generate a dungeon from level files and play it headlessly"
)]
struct CliArgs {
    /// Directory holding the `*.txt` room templates.
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Seed for dungeon generation and artifact draws.
    #[arg(long)]
    seed: Option<u64>,
    /// Rooms placed along each arm of the dungeon.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    arm_length: Option<u32>,
    /// Difficulty preset.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Simulation ticks to run before exiting.
    #[arg(long)]
    ticks: Option<u64>,
    /// Optional TOML settings file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Everything needed to run once flags and settings are merged.
#[derive(Debug, PartialEq)]
struct RunPlan {
    levels: PathBuf,
    ticks: u64,
    session: SessionConfig,
}

impl RunPlan {
    fn resolve(args: CliArgs, settings: Settings) -> Self {
        let difficulty = args
            .difficulty
            .map(Difficulty::from)
            .or(settings.difficulty)
            .unwrap_or_default();
        let arm_length = args
            .arm_length
            .or(settings.arm_length)
            .unwrap_or(DEFAULT_ARM_LENGTH);
        Self {
            levels: args
                .levels
                .or(settings.levels)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEVELS)),
            ticks: args.ticks.or(settings.ticks).unwrap_or(DEFAULT_TICKS),
            session: SessionConfig {
                profile: settings.profile.apply(difficulty.profile()),
                generation: Config::new(arm_length),
                seed: args.seed.or(settings.seed).unwrap_or_default(),
            },
        }
    }
}

/// Running totals reported once the headless run ends.
#[derive(Debug, Default)]
struct RunTally {
    rooms_entered: u32,
    enemies_killed: u32,
    artifacts_collected: u32,
}

impl RunTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::RoomEntered { .. } => self.rooms_entered += 1,
                Event::EnemyKilled { .. } => self.enemies_killed += 1,
                Event::ArtifactCollected { .. } => self.artifacts_collected += 1,
                _ => {}
            }
        }
    }
}

/// Entry point for the Roomcrawl command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    run(RunPlan::resolve(args, settings))
}

fn run(plan: RunPlan) -> Result<()> {
    let pool = levels::load_pool(&plan.levels)?;
    let mut session =
        GameSession::new(pool, plan.session).context("failed to generate a dungeon")?;
    println!("{}", levels::render_layout(session.layout()));

    let scene = Scene::capture(session.world()).context("session did not start a room")?;
    let mut final_scene = scene.clone();
    let presentation = Presentation::new("Roomcrawl", Color::from_rgb_u8(0, 0, 0), scene);
    let backend = HeadlessBackend::new(
        plan.ticks,
        FRAME_TIME,
        ScriptedInput::new(session.seed(), INPUT_HOLD_FRAMES),
    );

    let animations = UniformAnimations::new(ANIMATION_FRAMES, ANIMATION_FRAME_TIME);
    let mut animator = Animator::new();
    let mut audio = LoggingAudio::default();
    let mut tally = RunTally::default();

    backend.run(presentation, |dt, input, scene| {
        let events = session.tick(&input);
        let _ = dispatch_audio(&events, &mut audio);
        tally.record(&events);

        match Scene::capture(session.world()) {
            Ok(captured) => *scene = captured,
            Err(error) => warn!(%error, "keeping the previous scene"),
        }
        animator.update(scene, dt, &animations);
        final_scene.clone_from(scene);
    })?;

    let world = session.world();
    let stats = query::player_stats(world);
    info!(
        seed = session.seed(),
        status = ?session.status(),
        ticks = query::tick_index(world),
        rooms_entered = tally.rooms_entered,
        enemies_killed = tally.enemies_killed,
        artifacts_collected = tally.artifacts_collected,
        audio_cues = audio.played(),
        "run finished"
    );

    print!("{}", final_scene.to_ascii());
    println!(
        "health {} speed {} damage {:.2} x{:.2} bullet speed {} cooldown {}",
        stats.health, stats.speed, stats.damage, stats.coef, stats.bullet_speed, stats.cooldown
    );
    Ok(())
}
