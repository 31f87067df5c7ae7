//! Building engines from preset entries and CLI names.

use std::path::Path;

use arimaa_core::Engine;
use heuristic_engine::{HeuristicConfig, HeuristicEngine};
use random_engine::RandomEngine;

use crate::aei_process::AeiProcess;
use crate::error::TournamentError;
use crate::preset::{BuiltinKind, EngineEntry};

/// Instantiate one preset engine. Relative paths resolve against `base_dir`.
pub fn build_engine(
    entry: &EngineEntry,
    base_dir: &Path,
) -> Result<Box<dyn Engine>, TournamentError> {
    match (&entry.builtin, &entry.cmdline) {
        (Some(BuiltinKind::Heuristic), None) => {
            let config = match &entry.options {
                Some(path) if path.is_absolute() => HeuristicConfig::load(path)?,
                Some(path) => HeuristicConfig::load(&base_dir.join(path))?,
                None => HeuristicConfig::default(),
            };
            Ok(Box::new(HeuristicEngine::with_config(config)))
        }
        (Some(BuiltinKind::Random), None) => Ok(Box::new(RandomEngine::new())),
        (None, Some(cmdline)) => Ok(Box::new(AeiProcess::spawn(cmdline, base_dir)?)),
        _ => Err(TournamentError::BadEngine {
            name: entry.name.clone(),
            reason: "set exactly one of builtin or cmdline".to_string(),
        }),
    }
}

/// Engine entry for a name given on the command line: a builtin engine name,
/// otherwise an AEI command line.
pub fn entry_for_cli(arg: &str) -> EngineEntry {
    match BuiltinKind::parse(arg) {
        Some(kind) => EngineEntry {
            name: arg.to_ascii_lowercase(),
            builtin: Some(kind),
            options: None,
            cmdline: None,
        },
        None => EngineEntry {
            name: arg.to_string(),
            builtin: None,
            options: None,
            cmdline: Some(arg.to_string()),
        },
    }
}
