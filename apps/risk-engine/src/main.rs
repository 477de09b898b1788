//! Risk Engine Binary
//!
//! Computes risk metrics for a JSON batch of portfolios and prints them as a
//! JSON array, one metric per input portfolio in input order.
//!
//! # Usage
//!
//! ```bash
//! risk-engine --strategy dedicated batch.json
//! risk-engine --config risk-engine.yaml --strategy sequential batch.json
//! ```
//!
//! The batch file holds an array of
//! `{"id", "notional", "expectedReturn", "volatility"}` objects.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter, overrides `logging.level` from the config file
//! - Any `${VAR}` referenced by the config file

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use risk_engine::config::{DEFAULT_CONFIG_PATH, EngineConfig, load_config};
use risk_engine::observability::init_tracing;
use risk_engine::{Portfolio, RiskCalculator, Strategy};

/// Compute per-portfolio Monte Carlo risk metrics.
#[derive(Debug, Parser)]
#[command(name = "risk-engine", version, about)]
struct Args {
    /// Configuration file (YAML). Defaults to ./risk-engine.yaml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Execution strategy: sequential, shared or dedicated.
    #[arg(short, long, default_value_t = Strategy::default())]
    strategy: Strategy,

    /// JSON file containing the portfolio batch.
    batch: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = resolve_config(args.config.as_deref())?;
    init_tracing(&config.logging).context("failed to initialise logging")?;

    tracing::info!(
        strategy = %args.strategy,
        batch = %args.batch.display(),
        iterations = config.metric.iterations,
        "Starting Risk Engine"
    );

    let portfolios = read_batch(&args.batch)?;
    let calculator =
        RiskCalculator::from_config(&config).context("failed to start risk calculator")?;

    let start = Instant::now();
    let result = calculator.run(args.strategy, &portfolios);
    // Tear the dedicated pool down whatever the batch outcome.
    let outcome = calculator.shutdown();
    tracing::info!(outcome = outcome.as_str(), "Risk calculator stopped");

    let metrics = result.context("risk batch failed")?;
    tracing::info!(
        portfolios = metrics.len(),
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Risk batch finished"
    );

    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

/// Load the requested config file, or the default file if it exists,
/// falling back to built-in defaults.
fn resolve_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let path = path.to_str().context("config path is not valid UTF-8")?;
            load_config(Some(path)).with_context(|| format!("failed to load config '{path}'"))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(None).context("failed to load default config")
        }
        None => Ok(EngineConfig::default()),
    }
}

fn read_batch(path: &Path) -> Result<Vec<Portfolio>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read batch '{}'", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse batch '{}'", path.display()))
}
