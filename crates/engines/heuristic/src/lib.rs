//! Heuristic Arimaa Engine
//!
//! Samples random legal moves from a handful of constraint buckets (big
//! pieces, trap regions, the goal area), scores each with a linear feature
//! evaluation and plays the best one found before the deadline.

mod buckets;
mod config;
mod policy;

use arimaa_core::{Engine, Position, SearchLimits, SearchResult};
use tracing::{debug, warn};

pub use buckets::{build_constraint_buckets, goal_region, trap_region};
pub use config::{ConfigError, HeuristicConfig, Selection};
pub use policy::{pick_move, pick_move_two_stage, score_candidate};

use config::parse_bool;

#[derive(Debug, Clone, Default)]
pub struct HeuristicEngine {
    config: HeuristicConfig,
}

impl HeuristicEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeuristicConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    fn apply_option(&mut self, name: &str, value: &str) -> Option<()> {
        match name {
            "legal_mobility" => self.config.legal_mobility = parse_bool(value)?,
            "random_ties" => self.config.picker.random_ties = parse_bool(value)?,
            "seed" => {
                self.config.picker.rng_seed = match value.trim() {
                    "" | "none" => None,
                    v => Some(v.parse().ok()?),
                }
            }
            "attempts" => self.config.picker.max_attempts_per_bucket = value.trim().parse().ok()?,
            "selection" => self.config.selection = Selection::parse(value)?,
            _ => {
                let feature = name.strip_prefix("weight_")?;
                *self.config.weights.get_mut(feature)? = value.trim().parse().ok()?;
            }
        }
        Some(())
    }
}

impl Engine for HeuristicEngine {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        limits.start();
        let deadline = limits.deadline();

        let outcome = match self.config.selection {
            Selection::Anytime => match pick_move(pos, deadline, &self.config) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("anytime picker failed ({e}), falling back to exhaustive selection");
                    pick_move_two_stage(pos, &self.config)
                }
            },
            Selection::TwoStage => pick_move_two_stage(pos, &self.config),
        };

        let Some(outcome) = outcome else {
            return SearchResult::immobilized();
        };
        debug!(
            samples = outcome.samples,
            score = outcome.score,
            "heuristic engine picked a move"
        );
        SearchResult {
            best_move: Some(outcome.steps),
            result: Some(outcome.result),
            score: outcome.score,
            samples: outcome.samples,
            stopped: limits.time_control.out_of_time(),
        }
    }

    fn name(&self) -> &str {
        "Heuristic Sampler"
    }

    /// Recognises `legal_mobility`, `random_ties`, `seed`, `attempts`,
    /// `selection` and `weight_<feature>`.
    fn set_option(&mut self, name: &str, value: &str) -> bool {
        let known = self.apply_option(name, value).is_some();
        if !known {
            debug!(name, value, "heuristic engine ignored option");
        }
        known
    }
}

#[cfg(test)]
mod lib_tests;
