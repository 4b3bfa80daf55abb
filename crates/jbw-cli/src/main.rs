//! jbw CLI.
//!
//! - `jbw run` - drive a greedy agent through a generated world
//! - `jbw generate` - print the world around the origin

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use jbw_agent::{tick_controllers, AgentController};
use jbw_core::{Position, SplitMix64, TickContext};
use jbw_gen::PatchMap;
use jbw_sim::{ascii_map, SimConfig, Simulator};

#[derive(Parser)]
#[command(name = "jbw")]
#[command(about = "Gibbs-sampled grid worlds and a greedy visual agent", version)]
struct Cli {
    /// Simulator config (YAML); the built-in four-item world if omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the config seed
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one agent for a number of ticks
    Run {
        #[arg(short, long, default_value_t = 1000)]
        ticks: u64,

        /// Log agent state every K ticks (0 disables)
        #[arg(long, default_value_t = 100)]
        log_every: u64,
    },

    /// Generate the world around the origin and print it
    Generate {
        /// Half-width of the printed square, in cells
        #[arg(short, long, default_value_t = 16)]
        radius: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if cli.log_json {
        fmt().json().with_env_filter(filter).with_target(false).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match cli.command {
        Commands::Run { ticks, log_every } => run(config, ticks, log_every),
        Commands::Generate { radius } => generate(&config, radius),
    }
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => SimConfig::embedded().context("Failed to parse the built-in config"),
    }
}

fn run(config: SimConfig, ticks: u64, log_every: u64) -> Result<()> {
    let mut sim = Simulator::new(config.clone()).context("Unable to initialize simulator")?;
    let signatures = config
        .signatures(sim.catalog())
        .context("Unable to resolve item colors")?;
    let goal_index = sim
        .catalog()
        .index_of(&config.goal_item)
        .context("Goal item disappeared from the catalog")?;

    let agent = sim.add_agent().context("Unable to place agent")?;
    let mut controllers = vec![AgentController::new(agent, signatures.goal, signatures.wall)];
    info!(
        seed = config.seed,
        ticks,
        goal = %config.goal_item,
        "Starting simulation"
    );

    let started = Instant::now();
    let mut fallback_ticks = 0u64;
    for tick in 0..ticks {
        let ctx = TickContext::new(tick, config.seed);
        let reports = tick_controllers(&ctx, &mut sim, &mut controllers)
            .with_context(|| format!("Agent controller fault at tick {tick}"))?;
        fallback_ticks += reports.iter().filter(|r| r.fallback).count() as u64;
        let time = sim.step();

        if log_every > 0 && time % log_every == 0 {
            if let Some(state) = sim.agent(agent) {
                let collected = state.collected[goal_index];
                info!(
                    time,
                    position = %state.position,
                    facing = ?state.facing,
                    collected,
                    rate = collected as f64 / time as f64,
                    "Current agent state"
                );
            }
        }
    }

    let Some(state) = sim.agent(agent) else {
        warn!(agent, "Agent vanished before the summary");
        return Ok(());
    };
    let elapsed = started.elapsed();
    println!("ticks:      {}", sim.time());
    println!("position:   {} facing {:?}", state.position, state.facing);
    for (item, count) in sim.catalog().iter().zip(&state.collected) {
        println!("collected:  {:<10} {count}", item.name);
    }
    println!(
        "rate:       {:.4} {} per tick",
        state.collected[goal_index] as f64 / sim.time().max(1) as f64,
        config.goal_item
    );
    println!("fallback:   {fallback_ticks} ticks");
    println!("elapsed:    {:.2?}", elapsed);
    Ok(())
}

fn generate(config: &SimConfig, radius: u32) -> Result<()> {
    let catalog = config.validate().context("Invalid config")?;
    let mut map = PatchMap::new(config.patch_size, catalog.len());
    let mut rng = SplitMix64::new(config.seed);

    let started = Instant::now();
    let report = map.generate_around(
        Position::ORIGIN,
        radius,
        &catalog,
        &mut rng,
        config.mcmc_iterations,
    );
    info!(
        patches = report.sampled_patches,
        changed_cells = report.changed_cells,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Generated world"
    );

    print!(
        "{}",
        ascii_map(&map, &catalog, &[], Position::ORIGIN, i64::from(radius))
    );
    Ok(())
}
