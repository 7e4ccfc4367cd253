//! Robot Hunt - Entry Point
//!
//! Builds a world from config and command-line overrides, then runs turns
//! until one side is wiped out, the turn limit is hit, or Ctrl-C arrives.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use robot_hunt::core::error::{HuntError, Result};
use robot_hunt::core::SimulationConfig;
use robot_hunt::simulation::Simulation;

/// Reactive robots hunting wandering monsters in an NxNxN grid
#[derive(Parser, Debug)]
#[command(name = "robot_hunt")]
#[command(about = "Run a robots-vs-monsters grid simulation")]
struct Args {
    /// TOML config file; flags below override its values
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Grid edge length N
    #[arg(long)]
    size: Option<u32>,

    /// Number of robots to place
    #[arg(long)]
    robots: Option<u32>,

    /// Number of monsters to place
    #[arg(long)]
    monsters: Option<u32>,

    /// Turn limit
    #[arg(long)]
    turns: Option<u64>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between turns in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the JSON summary to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log every entity action
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(size) = self.size {
            config.world.size = size;
        }
        if let Some(robots) = self.robots {
            config.population.robots = robots;
        }
        if let Some(monsters) = self.monsters {
            config.population.monsters = monsters;
        }
        if let Some(turns) = self.turns {
            config.run.max_turns = turns;
        }
        if self.seed.is_some() {
            config.world.seed = self.seed;
        }
        if let Some(delay) = self.delay_ms {
            config.run.turn_delay_ms = delay;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "robot_hunt=debug"
    } else {
        "robot_hunt=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    // Install the SIGINT handler before any setup work
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping at the next turn boundary");
            flag.store(true, Ordering::SeqCst);
        }
    });
    tokio::task::yield_now().await;

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::new(),
    };
    args.apply(&mut config);

    let mut sim = Simulation::new(config)?;
    if sim.grid().robot_count() == 0 || sim.grid().monster_count() == 0 {
        return Err(HuntError::NoFreeCell {
            attempts: sim.config().world.max_probe_attempts,
        });
    }

    tracing::info!(
        size = sim.config().world.size,
        seed = sim.seed(),
        blocked = sim.grid().stats().blocked,
        "World ready"
    );

    let max_turns = sim.config().run.max_turns;
    let delay = Duration::from_millis(sim.config().run.turn_delay_ms);

    // Turns are synchronous; run them off the runtime so the signal task keeps polling
    let summary = tokio::task::spawn_blocking(move || {
        sim.run(max_turns, |turn| {
            if turn > 0 && !delay.is_zero() {
                std::thread::sleep(delay);
            }
            interrupted.load(Ordering::SeqCst)
        })
    })
    .await?;

    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{}", summary.summary());
    }
    if let Some(path) = &args.output {
        std::fs::write(path, summary.to_json()?)?;
        tracing::info!(path = %path.display(), "Summary written");
    }

    Ok(())
}
