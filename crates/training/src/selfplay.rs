//! Parallel self-play between builtin engines.

use std::time::Duration;

use arimaa_core::Engine;
use heuristic_engine::{HeuristicConfig, HeuristicEngine};
use random_engine::RandomEngine;
use rayon::prelude::*;
use tournament::{BuiltinKind, GameRecord, MatchConfig, MatchRunner};
use tracing::info;

#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    pub games: usize,
    pub move_time: Option<Duration>,
    pub max_turns: u32,
    /// Engine of the first player; it plays gold in even-numbered games
    pub first: BuiltinKind,
    pub second: BuiltinKind,
    /// Options for heuristic players
    pub heuristic: HeuristicConfig,
    /// Game `i` seeds its engines from `seed + i`
    pub seed: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            games: 16,
            move_time: Some(Duration::from_millis(200)),
            max_turns: 120,
            first: BuiltinKind::Heuristic,
            second: BuiltinKind::Random,
            heuristic: HeuristicConfig::default(),
            seed: 0,
        }
    }
}

impl SelfPlayConfig {
    fn engine(&self, kind: BuiltinKind, seed: u64) -> Box<dyn Engine> {
        match kind {
            BuiltinKind::Heuristic => {
                let mut config = self.heuristic.clone();
                config.picker.rng_seed = Some(seed);
                Box::new(HeuristicEngine::with_config(config))
            }
            BuiltinKind::Random => Box::new(RandomEngine::with_seed(seed)),
        }
    }

    fn label(kind: BuiltinKind) -> &'static str {
        match kind {
            BuiltinKind::Heuristic => "heuristic",
            BuiltinKind::Random => "random",
        }
    }
}

/// Play `config.games` games on the rayon pool. Records come back in game
/// order; colors alternate between the two engines.
pub fn generate_games(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let runner = MatchRunner::new(MatchConfig {
        num_games: 1,
        move_time: config.move_time,
        max_turns: config.max_turns,
        alternate_colors: false,
        verbose: false,
    });

    let records: Vec<GameRecord> = (0..config.games)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed.wrapping_add(i as u64);
            let (gold_kind, silver_kind) = if i % 2 == 0 {
                (config.first, config.second)
            } else {
                (config.second, config.first)
            };
            let mut gold = config.engine(gold_kind, seed);
            let mut silver = config.engine(silver_kind, seed.wrapping_add(1 << 32));
            runner.play_game(
                SelfPlayConfig::label(gold_kind),
                gold.as_mut(),
                SelfPlayConfig::label(silver_kind),
                silver.as_mut(),
            )
        })
        .collect();

    let decided = records.iter().filter(|r| r.winner.is_some()).count();
    info!(games = records.len(), decided, "self-play finished");
    records
}
