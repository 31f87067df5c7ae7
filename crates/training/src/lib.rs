//! Self-play data generation for Arimaa engines.
//!
//! Games between builtin engines are played in parallel, then every position
//! reached is turned into a [`PositionSample`] (features from
//! `arimaa_common`, game result from the mover's perspective) and written as
//! JSON Lines next to the games in database notation.

mod dataset;
mod selfplay;

use std::path::PathBuf;

use arimaa_core::NotationError;
use thiserror::Error;

pub use dataset::{
    build_dataset, read_samples, samples_from_game, write_db_games, write_samples,
    DatasetSummary, PositionSample, GAMES_DB_FILE, GAMES_JSON_FILE, POSITIONS_FILE,
};
pub use selfplay::{generate_games, SelfPlayConfig};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("bad record in {path} line {line}: {source}")]
    Record {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("game {game} cannot be translated: {source}")]
    Notation { game: usize, source: NotationError },
}
