//! Self-play data generation CLI.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use heuristic_engine::HeuristicConfig;
use tournament::BuiltinKind;
use tracing::info;
use tracing_subscriber::EnvFilter;
use training::{build_dataset, generate_games, SelfPlayConfig};

/// Play games between builtin engines and write a dataset.
#[derive(Debug, Parser)]
#[command(name = "selfplay", version)]
struct Cli {
    #[arg(short, long, default_value_t = 16)]
    games: usize,

    /// Seconds per move; 0 plays untimed
    #[arg(short = 't', long, default_value_t = 0.2)]
    move_time: f64,

    #[arg(long, default_value_t = 120)]
    max_turns: u32,

    /// Dataset directory (default: artifacts/datasets/selfplay_<timestamp>)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    #[arg(long, default_value = "heuristic", value_parser = parse_kind)]
    first: BuiltinKind,

    #[arg(long, default_value = "random", value_parser = parse_kind)]
    second: BuiltinKind,

    /// TOML preset for heuristic players
    #[arg(long)]
    options: Option<PathBuf>,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,
}

fn parse_kind(s: &str) -> Result<BuiltinKind, String> {
    BuiltinKind::parse(s).ok_or_else(|| format!("unknown engine {s:?} (heuristic or random)"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.move_time.is_finite() || cli.move_time < 0.0 {
        bail!("--move-time must be zero or a positive number of seconds");
    }
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring the worker pool")?;
    }

    let heuristic = match &cli.options {
        Some(path) => HeuristicConfig::load(path)
            .with_context(|| format!("loading engine options from {}", path.display()))?,
        None => HeuristicConfig::default(),
    };
    let config = SelfPlayConfig {
        games: cli.games,
        move_time: (cli.move_time > 0.0).then(|| Duration::from_secs_f64(cli.move_time)),
        max_turns: cli.max_turns,
        first: cli.first,
        second: cli.second,
        heuristic,
        seed: cli.seed,
    };
    let out = cli.out.unwrap_or_else(|| {
        PathBuf::from("artifacts/datasets")
            .join(format!("selfplay_{}", Utc::now().format("%Y%m%d_%H%M%S")))
    });

    info!(
        games = config.games,
        move_time = ?config.move_time,
        first = ?config.first,
        second = ?config.second,
        "starting self-play"
    );
    let games = generate_games(&config);
    let summary = build_dataset(&out, &games)
        .with_context(|| format!("writing dataset to {}", out.display()))?;
    println!(
        "Built dataset: games={}, positions={}, dir={}",
        summary.games,
        summary.positions,
        summary.dir.display()
    );
    Ok(())
}
