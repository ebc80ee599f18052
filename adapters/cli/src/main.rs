#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Lane Defence session.

mod autoplay;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lane_defence_core::WorldSnapshot;
use lane_defence_simulation::Simulation;
use lane_defence_world::{PathStrategy, Tuning};
use tracing_subscriber::EnvFilter;

use autoplay::Autoplayer;

/// Runs a seeded, headless Lane Defence session driven by an autoplayer.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", version)]
struct Args {
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
    /// Seed for the autoplayer's decisions.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// TOML file overriding tuning values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the final snapshot as JSON instead of a summary.
    #[arg(long)]
    json: bool,
    /// Pathfinding strategy for lane routes and worker travel.
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Bfs,
    Astar,
}

impl From<Strategy> for PathStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Bfs => PathStrategy::BreadthFirst,
            Strategy::Astar => PathStrategy::AStar,
        }
    }
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let tuning = load_tuning(&args)?;
    tracing::info!(seed = args.seed, ticks = args.ticks, "starting session");
    let mut simulation = Simulation::new(tuning).context("invalid tuning")?;
    let mut player = Autoplayer::new(args.seed);

    for tick in 0..args.ticks {
        player.act(&mut simulation, tick);
        simulation.tick(args.tick_ms);
    }

    let snapshot = simulation.snapshot();
    if args.json {
        let json =
            serde_json::to_string_pretty(&*snapshot).context("failed to serialize snapshot")?;
        println!("{json}");
    } else {
        print_summary(&snapshot, &args, &player);
    }
    Ok(())
}

fn load_tuning(args: &Args) -> Result<Tuning> {
    let mut tuning = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<Tuning>(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => Tuning::default(),
    };
    if let Some(strategy) = args.strategy {
        tuning.path_strategy = strategy.into();
    }
    Ok(tuning)
}

fn print_summary(snapshot: &WorldSnapshot, args: &Args, player: &Autoplayer) {
    let stats = player.stats();
    let towers: usize = snapshot
        .lanes
        .iter()
        .map(|lane| lane.towers.iter().filter(|tower| tower.completed).count())
        .sum();
    let workers: usize = snapshot.lanes.iter().map(|lane| lane.workers.len()).sum();
    let units: usize = snapshot.lanes.iter().map(|lane| lane.units.len()).sum();

    println!(
        "ticks: {} ({:.1} s simulated since last reset)",
        args.ticks,
        snapshot.elapsed.as_secs_f32()
    );
    println!(
        "wave: {} ({})",
        snapshot.wave.number,
        if snapshot.wave.active {
            "active"
        } else {
            "idle"
        }
    );
    println!("life: {}  gold: {}", snapshot.life, snapshot.gold);
    println!(
        "towers: {towers}  workers: {workers}  units: {units}  hostiles: {}",
        snapshot.hostile_count()
    );
    println!(
        "hero: {} level {} ({:?})",
        snapshot.hero.name, snapshot.hero.level, snapshot.hero.rarity
    );
    println!(
        "autoplayer: {} actions accepted, {} rejected",
        stats.accepted, stats.rejected
    );
}
