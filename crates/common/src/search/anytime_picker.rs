//! Deadline-aware ("anytime") move picking.
//!
//! The picker spends the move budget sampling candidates from a list of
//! constraint buckets, scores each with a caller-supplied function and keeps
//! the best so far. Which buckets exist is the caller's policy.

use std::time::Instant;

use arimaa_core::{Position, Step};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::constraints::MoveConstraints;
use super::sampling::{get_filtered_move, FilterLimits, Sample, TimeBudget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub max_attempts_per_bucket: u32,
    /// Choose uniformly among equally scored moves instead of the first.
    pub random_ties: bool,
    pub rng_seed: Option<u64>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_bucket: 96,
            random_ties: true,
            rng_seed: None,
        }
    }
}

impl PickerConfig {
    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickError {
    #[error("at least one constraint bucket is required")]
    NoBuckets,
}

/// The chosen move.
#[derive(Debug, Clone, PartialEq)]
pub struct PickOutcome {
    pub steps: Vec<Step>,
    /// Position after the move, turn already passed.
    pub result: Position,
    pub score: f64,
    /// Number of candidates scored.
    pub samples: u64,
}

/// Pick a move for the side to move in `pos`.
///
/// Without a deadline a single random legal move is returned. With one, the
/// buckets are cycled until the deadline and the best scoring sample wins.
/// `Ok(None)` means the side to move is immobilized.
pub fn pick_move_anytime<F>(
    pos: &Position,
    deadline: Option<Instant>,
    mut score_fn: F,
    buckets: &[MoveConstraints],
    config: &PickerConfig,
) -> Result<Option<PickOutcome>, PickError>
where
    F: FnMut(&Position, &[Step]) -> f64,
{
    let mut rng = config.rng();

    let Some(deadline) = deadline else {
        return Ok(random_outcome(pos, &mut rng, &mut score_fn));
    };

    if buckets.is_empty() {
        return Err(PickError::NoBuckets);
    }

    let limits = FilterLimits {
        max_attempts: config.max_attempts_per_bucket.max(1),
        fallback_to_unfiltered: true,
    };

    let mut best_score = f64::NEG_INFINITY;
    let mut best: Vec<(Vec<Step>, Position)> = Vec::new();
    let mut samples = 0u64;

    for bucket in buckets.iter().cycle() {
        if Instant::now() >= deadline {
            break;
        }
        let (steps, result) = match get_filtered_move(
            pos,
            TimeBudget::Deadline(deadline),
            bucket,
            &limits,
            &mut rng,
        ) {
            Sample::Move(steps, result) => (steps, result),
            Sample::Immobilized => return Ok(None),
            Sample::Exhausted => continue,
        };

        samples += 1;
        let s = score_fn(&result, &steps);
        if s > best_score || best.is_empty() {
            best_score = s;
            best.clear();
            best.push((steps, result));
        } else if s == best_score {
            best.push((steps, result));
        }
    }

    debug!(samples, best_score, ties = best.len(), "anytime picker finished");

    if best.is_empty() {
        // The deadline passed before any sample; answer with anything legal.
        return Ok(random_outcome(pos, &mut rng, &mut score_fn));
    }

    let (steps, result) = if config.random_ties && best.len() > 1 {
        best.swap_remove(rng.gen_range(0..best.len()))
    } else {
        best.swap_remove(0)
    };
    Ok(Some(PickOutcome {
        steps,
        result,
        score: best_score,
        samples,
    }))
}

fn random_outcome<F>(pos: &Position, rng: &mut StdRng, score_fn: &mut F) -> Option<PickOutcome>
where
    F: FnMut(&Position, &[Step]) -> f64,
{
    let (steps, result) = pos.random_step_move(rng)?;
    let score = score_fn(&result, &steps);
    Some(PickOutcome {
        steps,
        result,
        score,
        samples: 1,
    })
}

#[cfg(test)]
#[path = "anytime_picker_tests.rs"]
mod anytime_picker_tests;
