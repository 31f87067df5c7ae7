//! Constrained move sampling without enumerating the move list.
//!
//! Arimaa turns can have hundreds of thousands of distinct results, so the
//! sampler draws random legal moves and keeps the first one that satisfies
//! the constraints (rejection sampling).

use std::time::{Duration, Instant};

use arimaa_core::{Position, Step};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::constraints::MoveConstraints;

/// Limits other than time for [`get_filtered_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterLimits {
    pub max_attempts: u32,
    /// Return the last non-matching sample rather than nothing.
    pub fallback_to_unfiltered: bool,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_attempts: 256,
            fallback_to_unfiltered: true,
        }
    }
}

/// How long a sampler may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBudget {
    /// Measured from the call.
    Relative(Duration),
    /// Absolute point on the monotonic clock.
    Deadline(Instant),
}

impl TimeBudget {
    pub fn deadline(self) -> Instant {
        match self {
            TimeBudget::Relative(d) => Instant::now() + d,
            TimeBudget::Deadline(at) => at,
        }
    }
}

/// Outcome of one sampling call.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    /// Steps and the resulting position, turn already passed.
    Move(Vec<Step>, Position),
    /// The side to move has no legal step.
    Immobilized,
    /// Time or attempts ran out before an acceptable move was found.
    Exhausted,
}

/// Find a random legal move satisfying `constraints` before the budget runs
/// out, trying at most `limits.max_attempts` samples (always at least one
/// while time remains).
pub fn get_filtered_move<R: Rng + ?Sized>(
    pos: &Position,
    budget: TimeBudget,
    constraints: &MoveConstraints,
    limits: &FilterLimits,
    rng: &mut R,
) -> Sample {
    let deadline = budget.deadline();
    let mut last = None;

    for _ in 0..limits.max_attempts.max(1) {
        if Instant::now() >= deadline {
            break;
        }
        let Some((steps, result)) = pos.random_step_move(rng) else {
            return Sample::Immobilized;
        };
        if constraints.matches(pos, &steps) {
            return Sample::Move(steps, result);
        }
        last = Some((steps, result));
    }

    match last {
        Some((steps, result)) if limits.fallback_to_unfiltered => Sample::Move(steps, result),
        _ => Sample::Exhausted,
    }
}

#[cfg(test)]
#[path = "sampling_tests.rs"]
mod sampling_tests;
