//! night-runner: plays one night headless with a scripted player.
//!
//! Usage:
//!   night-runner --night 4 --seed 7
//!   night-runner --config custom_night.json --tick-ms 50
//!
//! The session outcome is printed to stdout as JSON. Log verbosity follows
//! `RUST_LOG` (default `info`).

mod autopilot;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nightwatch_core::commands::TickInput;
use nightwatch_core::config::{ConfigError, SessionConfig};
use nightwatch_core::enums::SessionPhase;
use nightwatch_sim::SimulationEngine;

#[derive(Parser, Debug)]
#[command(name = "night-runner")]
#[command(about = "Play one night of the threat simulation with a scripted player")]
struct Args {
    /// Session config JSON. Overrides --night and --seed.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Night to play (1-6, 7 = custom with all enemies at 0)
    #[arg(long, default_value_t = 1)]
    night: u8,

    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulated time per tick in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_ms: u32,

    /// Log every simulation event
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::night(args.night).with_seed(args.seed),
    };
    config.validate()?;
    info!(night = config.night, seed = config.seed, tick_ms = args.tick_ms, "night-runner starting");

    let mut engine = SimulationEngine::new(config);
    let mut snapshot = engine.tick(&TickInput::idle(0));
    while snapshot.phase == SessionPhase::Active {
        let intents = autopilot::decide(&snapshot);
        snapshot = engine.tick(&TickInput {
            delta_ms: args.tick_ms.max(1),
            intents,
        });
        if args.verbose {
            for event in &snapshot.events {
                info!(elapsed_ms = snapshot.time.elapsed_ms, ?event, "event");
            }
        }
    }

    let outcome = engine.outcome();
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
