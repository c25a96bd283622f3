use std::path::PathBuf;

use anyhow::Context;
use cellworld_common::{CELL_LENGTH, CellRange, GridCell};
use cellworld_kernel::{CellWorld, Glucose, WorldConfig, Zone};
use cellworld_stream::{DeterministicCellRandom, EntityStreamStore, FrameTimer, SessionSeed};
use clap::{Parser, Subcommand};
use glam::Vec2;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Largest census half-width; 10k cells per side is already 400M rolls.
const MAX_CENSUS_RADIUS: i64 = 10_000;

#[derive(Parser)]
#[command(name = "cellworld-cli", about = "CLI tool for cellworld world streaming")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON world config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and streaming constants
    Info,
    /// Walk a tracked point through the world and report streaming behaviour
    Simulate {
        /// Session seed (defaults to the config seed, then the clock)
        #[arg(short, long, allow_negative_numbers = true)]
        seed: Option<i64>,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Distance travelled per tick, in world units
        #[arg(long, default_value = "400")]
        speed: f32,
        /// Walking direction in degrees
        #[arg(long, default_value = "30", allow_negative_numbers = true)]
        heading: f32,
    },
    /// Spawn a square region around the origin and count its content
    Census {
        #[arg(short, long, allow_negative_numbers = true)]
        seed: Option<i64>,
        /// Half-width of the region, in cells
        #[arg(
            short,
            long,
            default_value = "50",
            value_parser = clap::value_parser!(i32).range(0..=MAX_CENSUS_RADIUS)
        )]
        radius: i32,
        /// Print the census as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the deterministic content of one cell
    Inspect {
        #[arg(short, long, allow_negative_numbers = true)]
        seed: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        row: i32,
        #[arg(long, allow_negative_numbers = true)]
        col: i32,
    },
}

#[derive(Debug, Serialize)]
struct Census {
    seed: i64,
    cells: u64,
    zones: usize,
    acid_zones: usize,
    glucose: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => WorldConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WorldConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("cellworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("stream: {}", cellworld_stream::crate_info());
            println!("cell length: {CELL_LENGTH}");
            println!(
                "radii: spawn={} despawn={}",
                config.stream.spawn_radius, config.stream.despawn_radius
            );
            println!(
                "spawn chance: zones={} glucose={}",
                config.zone_spawn_chance, config.glucose_spawn_chance
            );
        }
        Commands::Simulate {
            seed,
            ticks,
            speed,
            heading,
        } => simulate(&config, resolve_seed(seed, &config), ticks, speed, heading)?,
        Commands::Census { seed, radius, json } => {
            let census = census(&config, resolve_seed(seed, &config), radius);
            if json {
                println!("{}", serde_json::to_string_pretty(&census)?);
            } else {
                println!(
                    "Census: seed={} cells={} zones={} (acid={}) glucose={}",
                    census.seed, census.cells, census.zones, census.acid_zones, census.glucose
                );
            }
        }
        Commands::Inspect { seed, row, col } => {
            inspect(&config, resolve_seed(seed, &config), GridCell::new(row, col));
        }
    }

    Ok(())
}

/// CLI seed first, then the config file, then the clock.
fn resolve_seed(cli_seed: Option<i64>, config: &WorldConfig) -> i64 {
    cli_seed.or(config.seed).unwrap_or_else(SessionSeed::from_clock)
}

fn simulate(
    config: &WorldConfig,
    seed: i64,
    ticks: u64,
    speed: f32,
    heading: f32,
) -> anyhow::Result<()> {
    println!("Simulating walk: seed={seed}, ticks={ticks}, speed={speed}, heading={heading}");

    let mut world = CellWorld::new(config, seed)?;
    let start = Vec2::ZERO;
    let first = world.tick(start);
    let initial_zones = world.zones().positions();
    let initial_glucose = world.glucose().positions();

    let step = Vec2::from_angle(heading.to_radians()) * speed;
    let mut timer = FrameTimer::new(120);
    let mut player = start;
    let mut peak = 0;
    for _ in 0..ticks {
        player += step;
        world.tick(player);
        timer.record(world.stats().frame_time);
        peak = peak.max(world.stats().total_populated);
    }
    println!("{}", world.summary());
    println!(
        "Frames: count={} avg={:?} min={:?} max={:?} peak_populated={peak}",
        timer.count(),
        timer.average(),
        timer.min(),
        timer.max()
    );

    // walk back and compare the starting region
    for _ in 0..ticks {
        player -= step;
        world.tick(player);
    }
    world.tick(start);
    let in_spawn = |cells: Vec<(GridCell, Vec2)>| -> Vec<(GridCell, Vec2)> {
        cells
            .into_iter()
            .filter(|(c, _)| first.spawn.contains(*c))
            .collect()
    };
    let zones_match = in_spawn(world.zones().positions()) == in_spawn(initial_zones);
    let glucose_match = in_spawn(world.glucose().positions()) == in_spawn(initial_glucose);
    println!(
        "Revisit: {}",
        if zones_match && glucose_match {
            "OK"
        } else {
            "MISMATCH"
        }
    );
    if !(zones_match && glucose_match) {
        anyhow::bail!("revisited region differs from the first visit");
    }
    Ok(())
}

fn census(config: &WorldConfig, seed: i64, radius: i32) -> Census {
    let random = DeterministicCellRandom::new(seed);
    let range = CellRange::around(GridCell::new(0, 0), radius);
    let mut zones = EntityStreamStore::<Zone>::with_spawn_chance(config.zone_spawn_chance);
    let mut glucose = EntityStreamStore::<Glucose>::with_spawn_chance(config.glucose_spawn_chance);
    zones.spawn_in_range(range, &random);
    glucose.spawn_in_range(range, &random);
    Census {
        seed,
        cells: range.area(),
        zones: zones.len(),
        acid_zones: zones.iter().filter(|(_, z)| z.is_hazard()).count(),
        glucose: glucose.len(),
    }
}

fn inspect(config: &WorldConfig, seed: i64, cell: GridCell) {
    let random = DeterministicCellRandom::new(seed);
    let rect = cell.to_world_rectangle();
    println!(
        "Cell {cell}: key={:#x} rect=({}, {}) {}x{}",
        cell.stable_hash(),
        rect.x,
        rect.y,
        rect.width,
        rect.height
    );

    let zones = EntityStreamStore::<Zone>::with_spawn_chance(config.zone_spawn_chance);
    match zones.roll(cell, &random) {
        Some(z) => println!(
            "  zone: {:?} at ({:.1}, {:.1}) radius {:.1}",
            z.kind, z.position.x, z.position.y, z.radius
        ),
        None => println!("  zone: none"),
    }
    let glucose = EntityStreamStore::<Glucose>::with_spawn_chance(config.glucose_spawn_chance);
    match glucose.roll(cell, &random) {
        Some(g) => println!(
            "  glucose: {} at ({:.1}, {:.1})",
            g.amount, g.position.x, g.position.y
        ),
        None => println!("  glucose: none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn census_radius_is_bounded() {
        assert!(Cli::try_parse_from(["cellworld-cli", "census", "--radius", "20"]).is_ok());
        assert!(Cli::try_parse_from(["cellworld-cli", "census", "--radius", "10001"]).is_err());
        assert!(Cli::try_parse_from(["cellworld-cli", "census", "--radius=-2147483648"]).is_err());
    }

    #[test]
    fn census_counts_square_region() {
        let census = census(&WorldConfig::default(), 42, 50);
        assert_eq!(census.cells, 10_000);
        assert!(census.zones > 1_000);
        assert!(census.acid_zones <= census.zones);
        assert_eq!(census.seed, 42);
    }

    #[test]
    fn census_of_zero_radius_is_empty() {
        let census = census(&WorldConfig::default(), 42, 0);
        assert_eq!(census.cells, 0);
        assert_eq!(census.zones + census.glucose, 0);
    }

    #[test]
    fn seed_precedence() {
        let config = WorldConfig {
            seed: Some(9),
            ..WorldConfig::default()
        };
        assert_eq!(resolve_seed(Some(3), &config), 3);
        assert_eq!(resolve_seed(None, &config), 9);
    }
}
