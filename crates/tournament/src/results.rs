//! Tournament results storage and reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::elo::MatchResult;
use crate::error::TournamentError;
use crate::match_runner::GameRecord;

/// Complete tournament results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentResults {
    /// Name/description of the tournament
    pub name: String,
    pub started_at: DateTime<Utc>,
    /// Participating engines
    pub participants: Vec<String>,
    /// One entry per pair, from `engine1`'s perspective
    pub matches: Vec<MatchEntry>,
    /// Configuration used
    pub config: TournamentConfig,
}

/// A single match entry in the tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEntry {
    pub engine1: String,
    pub engine2: String,
    pub result: MatchResult,
}

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub games_per_pair: u32,
    /// Seconds per move, `None` for untimed games
    pub move_time: Option<f64>,
    pub max_turns: u32,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            games_per_pair: 2,
            move_time: None,
            max_turns: 200,
        }
    }
}

impl TournamentResults {
    pub fn new(name: &str, participants: Vec<String>, config: TournamentConfig) -> Self {
        Self {
            name: name.to_string(),
            started_at: Utc::now(),
            participants,
            matches: Vec::new(),
            config,
        }
    }

    /// Add a match result
    pub fn add_match(&mut self, engine1: &str, engine2: &str, result: MatchResult) {
        self.matches.push(MatchEntry {
            engine1: engine1.to_string(),
            engine2: engine2.to_string(),
            result,
        });
    }

    /// Total score of one participant across all of its matches.
    pub fn score_of(&self, engine: &str) -> (f64, u32) {
        self.matches.iter().fold((0.0, 0), |(points, games), entry| {
            let result = if entry.engine1 == engine {
                entry.result.clone()
            } else if entry.engine2 == engine {
                entry.result.flipped()
            } else {
                return (points, games);
            };
            let n = result.total_games();
            (points + result.score() * f64::from(n), games + n)
        })
    }

    /// Save results to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), TournamentError> {
        let json = serde_json::to_string_pretty(self)?;
        write_creating_dirs(path, &json)
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> Result<Self, TournamentError> {
        let contents = fs::read_to_string(path).map_err(|source| TournamentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| TournamentError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File stem shared by the summary and game files of this run.
    pub fn file_stem(&self) -> String {
        let name: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{}_{}", name, self.started_at.format("%Y%m%d_%H%M%S"))
    }

    /// Write `<stem>.json` and `<stem>_games.json` into `dir`.
    pub fn save_with_games(
        &self,
        dir: &Path,
        games: &[GameRecord],
    ) -> Result<(PathBuf, PathBuf), TournamentError> {
        let stem = self.file_stem();
        let summary = dir.join(format!("{stem}.json"));
        let records = dir.join(format!("{stem}_games.json"));
        self.save(&summary)?;
        write_creating_dirs(&records, &serde_json::to_string_pretty(games)?)?;
        Ok((summary, records))
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", self.name));
        report.push_str(&format!("Participants: {}\n", self.participants.join(", ")));
        let clock = match self.config.move_time {
            Some(secs) => format!("{secs}s/move"),
            None => "untimed".to_string(),
        };
        report.push_str(&format!(
            "Config: {} games/pair, {}, {} turns max\n\n",
            self.config.games_per_pair, clock, self.config.max_turns
        ));

        report.push_str("Results:\n");
        report.push_str(&format!(
            "{:<20} vs {:<20} {:>5}-{:<5}-{:<5}\n",
            "Engine 1", "Engine 2", "W", "L", "D"
        ));
        report.push_str(&"-".repeat(60));
        report.push('\n');

        for entry in &self.matches {
            report.push_str(&format!(
                "{:<20} vs {:<20} {:>5}-{:<5}-{:<5}\n",
                entry.engine1,
                entry.engine2,
                entry.result.wins,
                entry.result.losses,
                entry.result.draws
            ));
        }

        report.push_str("\nStandings:\n");
        let mut standings: Vec<(&String, f64, u32)> = self
            .participants
            .iter()
            .map(|p| {
                let (points, games) = self.score_of(p);
                (p, points, games)
            })
            .collect();
        standings.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (name, points, games) in standings {
            report.push_str(&format!("{:<20} {:>5.1} / {}\n", name, points, games));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

pub(crate) fn write_creating_dirs(path: &Path, contents: &str) -> Result<(), TournamentError> {
    let write_err = |source| TournamentError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, contents).map_err(write_err)
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
