//! Two-stage selection over a full move list.
//!
//! Arimaa can have a huge number of distinct moves, so every candidate gets
//! the cheap evaluation first and only a short list is re-scored with the
//! expensive legal-mobility feature.

use arimaa_core::{Color, Position, Step};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::features::{evaluate_position, unused_step_penalty, EvalWeights};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoStageConfig {
    pub weights: EvalWeights,
    /// Score for this side instead of the side to move.
    pub perspective: Option<Color>,
    /// Randomly down-sample lists longer than this (0 disables sampling).
    pub max_stage1_moves: usize,
    pub stage1_top_k: usize,
    pub stage2_top_k: usize,
    pub stage1_legal_mobility: bool,
    pub stage2_legal_mobility: bool,
    pub random_ties: bool,
    pub rng_seed: Option<u64>,
}

impl Default for TwoStageConfig {
    fn default() -> Self {
        Self {
            weights: EvalWeights::default(),
            perspective: None,
            max_stage1_moves: 50_000,
            stage1_top_k: 300,
            stage2_top_k: 40,
            stage1_legal_mobility: false,
            stage2_legal_mobility: true,
            random_ties: true,
            rng_seed: None,
        }
    }
}

/// Pick the best of `moves` (steps and resulting position) for the player
/// moving from `from`. `None` when the list is empty.
pub fn select_best_move_two_stage(
    from: &Position,
    moves: &[(Vec<Step>, Position)],
    config: &TwoStageConfig,
) -> Option<(Vec<Step>, Position)> {
    if moves.is_empty() {
        return None;
    }
    let perspective = config.perspective.unwrap_or(from.side_to_move);
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let pool: Vec<&(Vec<Step>, Position)> =
        if config.max_stage1_moves > 0 && moves.len() > config.max_stage1_moves {
            moves
                .choose_multiple(&mut rng, config.max_stage1_moves)
                .collect()
        } else {
            moves.iter().collect()
        };

    let score = |(steps, result): &(Vec<Step>, Position), legal_mobility: bool| {
        evaluate_position(result, perspective, &config.weights, legal_mobility)
            - unused_step_penalty(steps)
    };

    let mut stage1: Vec<(f64, &(Vec<Step>, Position))> = pool
        .into_iter()
        .map(|m| (score(m, config.stage1_legal_mobility), m))
        .collect();
    stage1.sort_by(|a, b| b.0.total_cmp(&a.0));
    stage1.truncate(config.stage1_top_k.max(1));
    stage1.truncate(config.stage2_top_k.max(1));

    let mut best_score = f64::NEG_INFINITY;
    let mut best: Vec<&(Vec<Step>, Position)> = Vec::new();
    for (_, m) in stage1 {
        let s = score(m, config.stage2_legal_mobility);
        if s > best_score || best.is_empty() {
            best_score = s;
            best.clear();
            best.push(m);
        } else if s == best_score {
            best.push(m);
        }
    }
    debug!(candidates = moves.len(), best_score, ties = best.len(), "two-stage selection");

    let pick = if config.random_ties && best.len() > 1 {
        best[rng.gen_range(0..best.len())]
    } else {
        best[0]
    };
    Some(pick.clone())
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod selector_tests;
