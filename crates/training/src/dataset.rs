//! Turning played games into training records.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use arimaa_common::feature_vector;
use arimaa_core::Color;
use serde::{Deserialize, Serialize};
use tournament::GameRecord;
use tracing::{debug, info};

use crate::DatasetError;

pub const POSITIONS_FILE: &str = "positions.jsonl";
pub const GAMES_JSON_FILE: &str = "games.json";
pub const GAMES_DB_FILE: &str = "games.txt";

/// One position of a played game, as seen by the side about to move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub game: usize,
    /// Ply after setup, starting at 0 with gold's first move
    pub ply: usize,
    pub side: Color,
    /// Board in the short AEI notation
    pub position: String,
    /// Move played from here
    #[serde(rename = "move")]
    pub mv: String,
    /// Values in the order of `arimaa_common::FEATURE_NAMES`
    pub features: [f64; 6],
    /// 1 win, -1 loss, 0 draw for `side`
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub dir: PathBuf,
    pub games: usize,
    pub positions: usize,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> DatasetError + '_ {
    move |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Samples for every move of `record` that replays legally.
pub fn samples_from_game(game: usize, record: &GameRecord) -> Vec<PositionSample> {
    record
        .replay()
        .into_iter()
        .enumerate()
        .map(|(ply, (pos, mv))| {
            let side = pos.side_to_move;
            let result = match record.winner {
                Some(w) if w == side => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            };
            PositionSample {
                game,
                ply,
                side,
                position: pos.to_short_str(),
                mv,
                features: feature_vector(&pos, side, false),
                result,
            }
        })
        .collect()
}

/// Write samples as JSON Lines, one object per line.
pub fn write_samples(path: &Path, samples: &[PositionSample]) -> Result<(), DatasetError> {
    let file = File::create(path).map_err(io_err(path))?;
    let mut out = BufWriter::new(file);
    for sample in samples {
        serde_json::to_writer(&mut out, sample)?;
        out.write_all(b"\n").map_err(io_err(path))?;
    }
    out.flush().map_err(io_err(path))
}

pub fn read_samples(path: &Path) -> Result<Vec<PositionSample>, DatasetError> {
    let file = File::open(path).map_err(io_err(path))?;
    let mut samples = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err(path))?;
        if line.trim().is_empty() {
            continue;
        }
        let sample = serde_json::from_str(&line).map_err(|source| DatasetError::Record {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        samples.push(sample);
    }
    Ok(samples)
}

/// Games in database notation, separated by blank lines.
pub fn write_db_games(path: &Path, games: &[GameRecord]) -> Result<(), DatasetError> {
    let mut text = String::new();
    for (game, record) in games.iter().enumerate() {
        let lines = record
            .to_db_notation()
            .map_err(|source| DatasetError::Notation { game, source })?;
        text.push_str(&lines.join("\n"));
        text.push_str("\n\n");
    }
    fs::write(path, text).map_err(io_err(path))
}

/// Write positions, raw game records and database-notation games into `dir`.
pub fn build_dataset(dir: &Path, games: &[GameRecord]) -> Result<DatasetSummary, DatasetError> {
    fs::create_dir_all(dir).map_err(io_err(dir))?;

    let samples: Vec<PositionSample> = games
        .iter()
        .enumerate()
        .flat_map(|(i, record)| samples_from_game(i, record))
        .collect();
    debug!(positions = samples.len(), "extracted samples");

    write_samples(&dir.join(POSITIONS_FILE), &samples)?;
    let games_json = dir.join(GAMES_JSON_FILE);
    fs::write(&games_json, serde_json::to_string_pretty(games)?).map_err(io_err(&games_json))?;
    write_db_games(&dir.join(GAMES_DB_FILE), games)?;

    let summary = DatasetSummary {
        dir: dir.to_path_buf(),
        games: games.len(),
        positions: samples.len(),
    };
    info!(
        dir = %dir.display(),
        games = summary.games,
        positions = summary.positions,
        "dataset written"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod dataset_tests;
