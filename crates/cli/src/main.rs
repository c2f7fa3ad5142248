//! Livestock Registry Command Line Interface
//!
//! Replays batches of registry operations against an in-process registry and
//! prints each result as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use livestock_registry::{LivestockRegistry, RegistryConfig};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod batch;

use batch::{BatchOp, BatchRunner};

#[derive(Parser)]
#[command(name = "livestock-cli")]
#[command(about = "Livestock Registry Command Line Interface", long_about = None)]
#[command(version)]
struct Cli {
    /// Registry configuration file (TOML); LIVESTOCK_* environment variables override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a JSON batch of operations in order
    Run {
        /// Path to the batch file
        batch: PathBuf,
        /// Block height used until an operation supplies one
        #[arg(long, default_value_t = 0)]
        start_height: u64,
        /// Print the final registry snapshot after the results
        #[arg(long)]
        snapshot: bool,
    },
    /// Print the effective registry configuration
    ShowConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = RegistryConfig::load(cli.config.as_deref())
        .context("failed to load registry configuration")?;

    match cli.command {
        Commands::Run {
            batch,
            start_height,
            snapshot,
        } => run_batch(config, &batch, start_height, snapshot),
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_batch(
    config: RegistryConfig,
    path: &Path,
    start_height: u64,
    snapshot: bool,
) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read batch file {}", path.display()))?;
    let ops: Vec<BatchOp> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse batch file {}", path.display()))?;
    info!(operations = ops.len(), "replaying batch");

    let mut runner = BatchRunner::new(LivestockRegistry::with_config(config), start_height);
    let results = runner.run(ops)?;

    let output = if snapshot {
        json!({ "results": results, "snapshot": runner.registry().snapshot() })
    } else {
        json!({ "results": results })
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
