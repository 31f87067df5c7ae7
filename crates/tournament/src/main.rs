//! Tournament CLI
//!
//! Run matches between engines and track Elo ratings.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tournament::{
    build_engine, entry_for_cli, run_round_robin, EloTracker, MatchConfig, MatchRunner,
    TournamentConfig, TournamentPreset, TournamentResults,
};

/// Arimaa tournament runner
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Elo tracker shared by all runs
    #[arg(long, global = true, default_value = "artifacts/results/elo.json")]
    elo: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the round robin described by a TOML preset
    Run { preset: PathBuf },
    /// Play a match between two engines (builtin name or AEI command line)
    Match {
        engine1: String,
        engine2: String,
        #[arg(short, long, default_value_t = 10)]
        games: u32,
        /// Seconds per move
        #[arg(short = 't', long)]
        move_time: Option<f64>,
        #[arg(long, default_value_t = 200)]
        max_turns: u32,
        /// Where to write the summary and game records
        #[arg(long, default_value = "artifacts/results")]
        out: PathBuf,
    },
    /// Print the Elo leaderboard
    #[command(alias = "elo")]
    Leaderboard,
}

fn run_preset(path: &Path, elo_path: &Path) -> Result<()> {
    let preset = TournamentPreset::load(path)
        .with_context(|| format!("loading preset {}", path.display()))?;
    let mut tracker = EloTracker::load_or_default(elo_path)?;
    info!(
        name = %preset.name,
        engines = preset.engines.len(),
        games_per_pair = preset.games_per_pair,
        "starting tournament"
    );

    let outcome = run_round_robin(&preset, &mut tracker)?;
    outcome.results.print_report();
    tracker.print_leaderboard();

    let (summary, games) = outcome.save(&preset)?;
    info!(summary = %summary.display(), games = %games.display(), "results saved");
    tracker
        .save(elo_path)
        .with_context(|| format!("saving Elo tracker to {}", elo_path.display()))?;
    Ok(())
}

fn run_match(
    name1: &str,
    name2: &str,
    config: MatchConfig,
    out: &Path,
    elo_path: &Path,
) -> Result<()> {
    if name1 == name2 {
        bail!("both engines are {name1:?}; give them different names");
    }
    let here = Path::new(".");
    let mut engine1 = build_engine(&entry_for_cli(name1), here)?;
    let mut engine2 = build_engine(&entry_for_cli(name2), here)?;

    println!("=== Match: {} vs {} ===", name1, name2);
    let summary = TournamentConfig {
        games_per_pair: config.num_games,
        move_time: config.move_time.map(|d| d.as_secs_f64()),
        max_turns: config.max_turns,
    };
    let report =
        MatchRunner::new(config).run_match(name1, engine1.as_mut(), name2, engine2.as_mut());
    let result = &report.result;

    println!();
    println!("=== Final Result ===");
    println!(
        "{}: {} wins, {} losses, {} draws",
        name1, result.wins, result.losses, result.draws
    );
    println!("Score: {:.1}%", result.score() * 100.0);

    let mut tracker = EloTracker::load_or_default(elo_path)?;
    tracker.update_ratings(name1, name2, result);
    tracker.print_leaderboard();

    let mut results = TournamentResults::new(
        &format!("match_{name1}_vs_{name2}"),
        vec![name1.to_string(), name2.to_string()],
        summary,
    );
    results.add_match(name1, name2, report.result.clone());
    if let Err(e) = results.save_with_games(out, &report.games) {
        warn!(error = %e, "failed to save match results");
    }
    tracker
        .save(elo_path)
        .with_context(|| format!("saving Elo tracker to {}", elo_path.display()))?;
    Ok(())
}

fn show_leaderboard(elo_path: &Path) -> Result<()> {
    if !elo_path.exists() {
        println!("No tournament data found. Run some matches first!");
        return Ok(());
    }
    EloTracker::load(elo_path)?.print_leaderboard();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run { preset } => run_preset(&preset, &cli.elo),
        Command::Match {
            engine1,
            engine2,
            games,
            move_time,
            max_turns,
            out,
        } => {
            let move_time = match move_time {
                Some(s) if !s.is_finite() || s < 0.0 => {
                    bail!("--move-time must be a positive number of seconds")
                }
                Some(s) if s > 0.0 => Some(Duration::from_secs_f64(s)),
                _ => None,
            };
            let config = MatchConfig {
                num_games: games,
                move_time,
                max_turns,
                ..Default::default()
            };
            run_match(&engine1, &engine2, config, &out, &cli.elo)
        }
        Command::Leaderboard => show_leaderboard(&cli.elo),
    }
}
