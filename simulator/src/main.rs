use anyhow::{Context, Result};
use clap::Parser;
use keno_simulator::{Simulation, SimulatorConfig};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, Level};

fn init_tracing(level: &str) -> Result<()> {
    let level = Level::from_str(level).with_context(|| format!("invalid log level: {level}"))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML simulation config; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of concurrent players (overrides config).
    #[arg(long)]
    players: Option<usize>,

    /// Spins each player plays (overrides config).
    #[arg(long)]
    spins: Option<u64>,

    /// Engine RNG seed (overrides config).
    #[arg(long)]
    seed: Option<u64>,

    /// Probability a player raises after the preview (overrides config).
    #[arg(long)]
    raise_rate: Option<f64>,

    /// Log level (overrides config).
    #[arg(long)]
    log_level: Option<String>,

    /// Pretty-print the JSON report.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn build_config(args: &Args) -> Result<SimulatorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SimulatorConfig::from_yaml(&source)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => SimulatorConfig::default(),
    };
    if let Some(players) = args.players {
        config.players = players;
    }
    if let Some(spins) = args.spins {
        config.spins_per_player = spins;
    }
    if let Some(seed) = args.seed {
        config.engine.seed = seed;
    }
    if let Some(raise_rate) = args.raise_rate {
        config.raise_rate = raise_rate;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.validate().context("invalid simulation config")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    init_tracing(&config.log_level)?;
    info!(
        seed = config.engine.seed,
        tiers = config.engine.tiers.len(),
        "loaded simulation config"
    );

    let report = Simulation::new(config)?.run()?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
