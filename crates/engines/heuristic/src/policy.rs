//! Move policy: which buckets to sample and how to score a candidate.

use std::time::Instant;

use arimaa_common::features::unused_step_penalty;
use arimaa_common::{evaluate_position, pick_move_anytime, select_best_move_two_stage};
use arimaa_common::{PickError, PickOutcome};
use arimaa_core::{Position, Step};

use crate::buckets::build_constraint_buckets;
use crate::config::HeuristicConfig;

/// Score of a candidate: the terminal value if the game is over, otherwise
/// the weighted feature sum, minus a small penalty for unused steps.
pub fn score_candidate(
    pos: &Position,
    result: &Position,
    steps: &[Step],
    config: &HeuristicConfig,
) -> f64 {
    let perspective = config.perspective.unwrap_or(pos.side_to_move);
    evaluate_position(result, perspective, &config.weights, config.legal_mobility)
        - unused_step_penalty(steps)
}

/// Anytime pick: sample the engine's buckets until `deadline`.
pub fn pick_move(
    pos: &Position,
    deadline: Option<Instant>,
    config: &HeuristicConfig,
) -> Result<Option<PickOutcome>, PickError> {
    let buckets = build_constraint_buckets(pos);
    pick_move_anytime(
        pos,
        deadline,
        |result, steps| score_candidate(pos, result, steps, config),
        &buckets,
        &config.picker,
    )
}

/// Exhaustive pick over every distinct move.
pub fn pick_move_two_stage(pos: &Position, config: &HeuristicConfig) -> Option<PickOutcome> {
    let moves = pos.get_moves();
    let samples = moves.len() as u64;
    let (steps, result) = select_best_move_two_stage(pos, &moves, &config.two_stage())?;
    let score = score_candidate(pos, &result, &steps, config);
    Some(PickOutcome {
        steps,
        result,
        score,
        samples,
    })
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod policy_tests;
