use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse preset {path}: {source}")]
    Preset {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("engine {name:?}: {reason}")]
    BadEngine { name: String, reason: String },
    #[error("heuristic engine options: {0}")]
    EngineConfig(#[from] heuristic_engine::ConfigError),
    #[error("AEI engine {cmdline:?}: {reason}")]
    Aei { cmdline: String, reason: String },
}
