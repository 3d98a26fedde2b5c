use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rocketry::config::RocketryConfig;
use rocketry::evolution::{GenerationController, WallClock};
use rocketry::headless::TrainingRun;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RON configuration file (defaults to ./rocketry.ron when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of generations to run
    #[arg(long)]
    generations: Option<u64>,

    /// Agents per generation
    #[arg(long)]
    population: Option<usize>,

    /// Genome length
    #[arg(long)]
    lifespan: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for the report and GIFs
    #[arg(long)]
    output: Option<String>,

    /// Capture a GIF every N generations (0 = last generation only)
    #[arg(long)]
    gif_interval: Option<u64>,

    /// Time birth and death with the wall clock instead of frame counts
    #[arg(long)]
    wall_clock: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = RocketryConfig::load(args.config.as_deref())?;
    if let Some(generations) = args.generations {
        config.training.generations = generations;
    }
    if let Some(population) = args.population {
        config.run.population = population;
    }
    if let Some(lifespan) = args.lifespan {
        config.run.lifespan = lifespan;
    }
    if let Some(seed) = args.seed {
        config.run.seed = Some(seed);
    }
    if let Some(output) = args.output {
        config.training.output_dir = output;
    }
    if let Some(interval) = args.gif_interval {
        config.training.gif_capture_interval = interval;
    }

    let controller = if args.wall_clock {
        GenerationController::with_clock(config.run, Box::new(WallClock::new()))
    } else {
        GenerationController::initialize(config.run)
    }
    .context("Invalid run configuration")?;

    log::info!("Starting Rocketry");
    TrainingRun::new(config.training, controller).run()
}
