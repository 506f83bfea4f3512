//! Headless Tankfield runner.
//!
//! Builds an arena, replays an optional scripted input timeline for a fixed
//! number of frames and logs what happens. Useful for soak runs, replays and
//! profiling without a renderer.

mod script;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tankfield_core::collaborators::{SceneTree, SharedScoreboard};
use tankfield_core::output::Event;
use tankfield_core::{ArenaConfig, EntityTag, Simulation};
use tracing::{debug, info, Level};

use crate::script::Script;

/// Tankfield headless runner
#[derive(Parser, Debug)]
#[command(version, about = "Runs the Tankfield arena simulation without a renderer")]
struct Cli {
    /// JSON configuration file. Missing fields take their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON input script of key transitions.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Frame length in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the event log as JSON lines when the run ends.
    #[arg(long)]
    events: bool,

    /// Log at DEBUG instead of INFO.
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<ArenaConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ArenaConfig::from_json_str(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ArenaConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn load_script(cli: &Cli) -> Result<Script> {
    let Some(path) = &cli.script else {
        return Ok(Script::default());
    };
    let json =
        fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
    Script::from_json_str(&json).with_context(|| format!("parsing script {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let config = load_config(&cli)?;
    let script = load_script(&cli)?;
    info!(
        seed = config.seed,
        map_size = config.map_size,
        enemies = config.enemy_count,
        ticks = cli.ticks,
        dt = cli.dt,
        transitions = script.len(),
        "starting run"
    );

    let scene = SceneTree::new();
    let scoreboard = SharedScoreboard::new();
    let mut sim = Simulation::new(config)
        .context("building simulation")?
        .with_scene(scene.clone())
        .with_scoreboard(scoreboard.clone());
    sim.populate().context("populating arena")?;
    if script.is_empty() {
        debug!("no input script, the player stays idle");
    }

    for frame in 0..cli.ticks {
        for transition in script.at(frame) {
            let changed = if transition.pressed {
                sim.press(transition.intent)
            } else {
                sim.release(transition.intent)
            };
            debug!(frame, intent = ?transition.intent, pressed = transition.pressed, changed, "input");
        }
        sim.step(cli.dt);
    }

    let kills = sim
        .events()
        .iter()
        .filter(|r| matches!(r.event, Event::EnemyDestroyed { .. }))
        .count();
    let shots = sim
        .events()
        .iter()
        .filter(|r| matches!(r.event, Event::ShotFired { .. }))
        .count();
    info!(
        ticks = sim.tick(),
        elapsed = sim.elapsed(),
        score = scoreboard.last().unwrap_or_default(),
        kills,
        shots,
        enemies = sim.arena().count_live(EntityTag::Enemy),
        bullets = sim.arena().count_live(EntityTag::Bullet),
        scene_nodes = scene.len(),
        "run finished"
    );

    if cli.events {
        for record in sim.events() {
            println!("{}", serde_json::to_string(record)?);
        }
    }
    Ok(())
}
