//! worry-sim - command line runner for the worry simulator
//!
//! Reads puzzle notes, runs one or more regimes and prints the ranking
//! product for each. With no regime flags both standard regimes run:
//! 20 dampened rounds with relief 3, then 10000 modular rounds.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use worry_simulator_core_rs::orchestrator::{Orchestrator, OrchestratorConfig};
use worry_simulator_core_rs::{parse_notes, AgentSpec};

const STANDARD_DAMPENED_ROUNDS: usize = 20;
const STANDARD_RELIEF: u64 = 3;
const STANDARD_MODULAR_ROUNDS: usize = 10_000;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "worry-sim")]
#[command(about = "Round-based item redistribution among agents")]
struct Args {
    /// Puzzle notes describing every agent
    input: PathBuf,

    /// Number of rounds for a single custom run
    #[arg(long)]
    rounds: Option<usize>,

    /// Floor-division relief for a single dampened run
    #[arg(long, conflicts_with = "modular")]
    relief: Option<u64>,

    /// Run a single modular regime
    #[arg(long)]
    modular: bool,

    /// How many top inspection counts to multiply
    #[arg(long)]
    rank_k: Option<usize>,

    /// Load the run configuration from a JSON file
    #[arg(long, conflicts_with_all = ["rounds", "relief", "modular"])]
    config: Option<PathBuf>,

    /// Print run reports as JSON
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. "debug" or "worry_simulator_core_rs=trace"; falls back to RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn configs(&self) -> Result<Vec<OrchestratorConfig>> {
        let mut configs = if let Some(path) = &self.config {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config: OrchestratorConfig = serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?;
            vec![config]
        } else if self.modular {
            vec![OrchestratorConfig::modular(
                self.rounds.unwrap_or(STANDARD_MODULAR_ROUNDS),
            )]
        } else if self.rounds.is_some() || self.relief.is_some() {
            vec![OrchestratorConfig::dampened(
                self.rounds.unwrap_or(STANDARD_DAMPENED_ROUNDS),
                self.relief.unwrap_or(STANDARD_RELIEF),
            )]
        } else {
            vec![
                OrchestratorConfig::dampened(STANDARD_DAMPENED_ROUNDS, STANDARD_RELIEF),
                OrchestratorConfig::modular(STANDARD_MODULAR_ROUNDS),
            ]
        };

        if let Some(rank_k) = self.rank_k {
            for config in &mut configs {
                config.rank_k = rank_k;
            }
        }
        Ok(configs)
    }
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run_regime(config: OrchestratorConfig, specs: Vec<AgentSpec>, json: bool) -> Result<()> {
    let started = Instant::now();
    let mut orchestrator = Orchestrator::new(config, specs)?;
    orchestrator.run()?;
    let product = orchestrator.monkey_business()?;
    let elapsed = started.elapsed();

    let config = orchestrator.config();
    info!(
        worry_mode = %config.worry_mode,
        rounds = config.rounds,
        most_active = ?orchestrator.most_active(),
        monkey_business = %product,
        elapsed_ms = elapsed.as_millis() as u64,
        "regime finished"
    );

    if json {
        let output = json!({
            "config": config,
            "monkey_business": product.to_string(),
            "report": orchestrator.report(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} over {} rounds: {}",
            config.worry_mode, config.rounds, product
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let notes = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read notes {}", args.input.display()))?;
    let specs = parse_notes(&notes)
        .with_context(|| format!("failed to parse notes {}", args.input.display()))?;
    info!(agents = specs.len(), input = %args.input.display(), "notes loaded");

    for config in args.configs()? {
        run_regime(config, specs.clone(), args.json)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use worry_simulator_core_rs::WorryMode;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("worry-sim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_runs_both_standard_regimes() {
        let configs = parse(&["notes.txt"]).configs().unwrap();
        assert_eq!(
            configs,
            vec![
                OrchestratorConfig::dampened(20, 3),
                OrchestratorConfig::modular(10_000),
            ]
        );
    }

    #[test]
    fn test_custom_dampened_regime() {
        let configs = parse(&["notes.txt", "--rounds", "5", "--relief", "2", "--rank-k", "3"])
            .configs()
            .unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].rounds, 5);
        assert_eq!(configs[0].worry_mode, WorryMode::Dampened { relief: 2 });
        assert_eq!(configs[0].rank_k, 3);
    }

    #[test]
    fn test_modular_flag_defaults_rounds() {
        let configs = parse(&["notes.txt", "--modular"]).configs().unwrap();
        assert_eq!(configs, vec![OrchestratorConfig::modular(10_000)]);
    }

    #[test]
    fn test_relief_conflicts_with_modular() {
        let result = Args::try_parse_from(["worry-sim", "notes.txt", "--modular", "--relief", "2"]);
        assert!(result.is_err());
    }
}
