use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use aei_engine::{AeiSession, ChannelController};
use anyhow::{Context, Result};
use arimaa_core::Engine;
use clap::{Parser, ValueEnum};
use heuristic_engine::{HeuristicConfig, HeuristicEngine};
use random_engine::RandomEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EngineKind {
    Heuristic,
    Random,
}

/// Serve an Arimaa engine over AEI on stdin/stdout.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, default_value = "heuristic")]
    engine: EngineKind,

    /// TOML preset with heuristic engine options.
    #[arg(long)]
    options: Option<PathBuf>,
}

fn build_engine(cli: &Cli) -> Result<Box<dyn Engine>> {
    Ok(match cli.engine {
        EngineKind::Heuristic => {
            let config = match &cli.options {
                Some(path) => HeuristicConfig::load(path)
                    .with_context(|| format!("loading engine options from {}", path.display()))?,
                None => HeuristicConfig::default(),
            };
            Box::new(HeuristicEngine::with_config(config))
        }
        EngineKind::Random => Box::new(RandomEngine::new()),
    })
}

fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = build_engine(&cli)?;
    info!(engine = engine.name(), "starting AEI session");

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let controller = ChannelController::new(rx, io::stdout());
    let mut session = AeiSession::start(controller, engine).context("AEI handshake failed")?;
    session.run().context("AEI session failed")?;
    Ok(())
}
