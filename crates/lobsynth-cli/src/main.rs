//! lobsynth - synthetic order book data generator
//!
//! Simulates a limit order book, exports its history to CSV and builds
//! labeled feature sequences for training a direction classifier.

use std::path::PathBuf;

use clap::Parser;

use lobsynth_cli::config::AppConfig;
use lobsynth_cli::logging::init_tracing;
use lobsynth_cli::runner::{run, Mode};

/// Synthetic limit order book data generator
#[derive(Parser, Debug)]
#[command(name = "lobsynth")]
#[command(author = "lobsynth contributors")]
#[command(version)]
#[command(about = "Simulate a limit order book and build labeled training data", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "lobsynth.toml")]
    config: PathBuf,

    /// Runs to execute
    #[arg(short, long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for output files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose, args.json_logs)?;

    tracing::info!("Starting lobsynth v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load_or_default(&args.config)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }

    tracing::debug!(?config, "configuration loaded");

    run(&config, args.mode)?;

    tracing::info!("lobsynth finished");
    Ok(())
}
