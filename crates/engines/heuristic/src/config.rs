//! Engine options, loadable from a TOML preset.

use std::path::{Path, PathBuf};

use arimaa_common::{EvalWeights, PickerConfig, TwoStageConfig};
use arimaa_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// How candidate moves are found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Sample constraint buckets until the deadline.
    #[default]
    Anytime,
    /// Enumerate every move and run the two-stage selector. Ignores the clock.
    TwoStage,
}

impl Selection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anytime" => Some(Selection::Anytime),
            "two_stage" | "twostage" => Some(Selection::TwoStage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub weights: EvalWeights,
    /// Score for this side instead of the side to move.
    pub perspective: Option<Color>,
    /// Use the exact (and slow) legal-step mobility feature.
    pub legal_mobility: bool,
    pub selection: Selection,
    pub picker: PickerConfig,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            weights: EvalWeights::default(),
            perspective: None,
            legal_mobility: false,
            selection: Selection::Anytime,
            picker: PickerConfig::default(),
        }
    }
}

impl HeuristicConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn two_stage(&self) -> TwoStageConfig {
        TwoStageConfig {
            weights: self.weights,
            perspective: self.perspective,
            random_ties: self.picker.random_ties,
            rng_seed: self.picker.rng_seed,
            ..TwoStageConfig::default()
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
