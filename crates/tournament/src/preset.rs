//! Tournament presets loaded from `configs/*.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TournamentError;
use crate::results::TournamentConfig;

/// Engines built into this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinKind {
    Heuristic,
    Random,
}

impl BuiltinKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "heuristic" => Some(BuiltinKind::Heuristic),
            "random" => Some(BuiltinKind::Random),
            _ => None,
        }
    }
}

/// One tournament participant: a builtin engine or an AEI command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineEntry {
    pub name: String,
    #[serde(default)]
    pub builtin: Option<BuiltinKind>,
    /// Heuristic option preset, relative to the tournament preset
    #[serde(default)]
    pub options: Option<PathBuf>,
    #[serde(default)]
    pub cmdline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentPreset {
    pub name: String,
    pub games_per_pair: u32,
    pub max_turns: u32,
    /// Seconds per move
    pub move_time: Option<f64>,
    pub output_dir: PathBuf,
    pub engines: Vec<EngineEntry>,
    /// Directory of the preset file; relative paths resolve against it
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for TournamentPreset {
    fn default() -> Self {
        Self {
            name: "tournament".to_string(),
            games_per_pair: 2,
            max_turns: 200,
            move_time: None,
            output_dir: PathBuf::from("artifacts/results"),
            engines: Vec::new(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl TournamentPreset {
    pub fn load(path: &Path) -> Result<Self, TournamentError> {
        let text = fs::read_to_string(path).map_err(|source| TournamentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut preset: TournamentPreset =
            toml::from_str(&text).map_err(|source| TournamentError::Preset {
                path: path.to_path_buf(),
                source,
            })?;
        preset.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        preset.validate()?;
        Ok(preset)
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.engines.len() < 2 {
            return Err(TournamentError::BadEngine {
                name: self.name.clone(),
                reason: "a tournament needs at least two engines".to_string(),
            });
        }
        for (i, entry) in self.engines.iter().enumerate() {
            let bad = |reason: &str| TournamentError::BadEngine {
                name: entry.name.clone(),
                reason: reason.to_string(),
            };
            match (&entry.builtin, &entry.cmdline) {
                (Some(_), Some(_)) => return Err(bad("set either builtin or cmdline, not both")),
                (None, None) => return Err(bad("set one of builtin or cmdline")),
                (None, Some(_)) if entry.options.is_some() => {
                    return Err(bad("options only apply to builtin engines"))
                }
                _ => {}
            }
            if self.engines[..i].iter().any(|e| e.name == entry.name) {
                return Err(bad("duplicate engine name"));
            }
        }
        Ok(())
    }

    /// `path` as given if absolute, otherwise under the preset's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn move_time(&self) -> Option<Duration> {
        self.move_time
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(Duration::from_secs_f64)
    }

    pub fn tournament_config(&self) -> TournamentConfig {
        TournamentConfig {
            games_per_pair: self.games_per_pair,
            move_time: self.move_time,
            max_turns: self.max_turns,
        }
    }
}

#[cfg(test)]
#[path = "preset_tests.rs"]
mod preset_tests;
