//! Random Move Arimaa Engine
//!
//! Plays a uniformly random walk of legal steps each turn.
//! Useful for:
//! - Testing the AEI and tournament plumbing
//! - Baseline comparisons (any real engine should easily beat this)
//! - Stress testing move generation

use arimaa_core::{Engine, Position, SearchLimits, SearchResult};
use rand::rngs::StdRng;
use rand::SeedableRng;


/// An Arimaa engine that plays random legal moves.
///
/// This engine provides no evaluation and ignores the clock.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: StdRng,
    moves_played: u64,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            moves_played: 0,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            moves_played: 0,
        }
    }

    /// Moves returned since the last `new_game`.
    pub fn moves_played(&self) -> u64 {
        self.moves_played
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn search(&mut self, pos: &Position, _limits: SearchLimits) -> SearchResult {
        let Some((steps, result)) = pos.random_step_move(&mut self.rng) else {
            return SearchResult::immobilized();
        };
        self.moves_played += 1;

        SearchResult {
            best_move: Some(steps),
            result: Some(result),
            score: 0.0,
            samples: 1,
            stopped: false,
        }
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }

    fn new_game(&mut self) {
        self.moves_played = 0;
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        match (name, value.trim().parse::<u64>()) {
            ("seed", Ok(seed)) => {
                self.rng = StdRng::seed_from_u64(seed);
                true
            }
            _ => false,
        }
    }
}
