//! Round-robin tournaments over a preset's engines.

use std::path::PathBuf;

use arimaa_core::Engine;
use tracing::info;

use crate::elo::EloTracker;
use crate::engines::build_engine;
use crate::error::TournamentError;
use crate::match_runner::{GameRecord, MatchConfig, MatchRunner};
use crate::preset::TournamentPreset;
use crate::results::TournamentResults;

pub struct TournamentOutcome {
    pub results: TournamentResults,
    pub games: Vec<GameRecord>,
}

/// Play every pair of engines `games_per_pair` times, updating `elo` after
/// each pairing.
pub fn run_round_robin(
    preset: &TournamentPreset,
    elo: &mut EloTracker,
) -> Result<TournamentOutcome, TournamentError> {
    let mut engines: Vec<Box<dyn Engine>> = preset
        .engines
        .iter()
        .map(|entry| build_engine(entry, &preset.base_dir))
        .collect::<Result<_, _>>()?;
    let names: Vec<String> = preset.engines.iter().map(|e| e.name.clone()).collect();

    let runner = MatchRunner::new(MatchConfig {
        num_games: preset.games_per_pair,
        move_time: preset.move_time(),
        max_turns: preset.max_turns,
        alternate_colors: true,
        verbose: true,
    });
    let mut results =
        TournamentResults::new(&preset.name, names.clone(), preset.tournament_config());
    let mut games = Vec::new();

    for i in 0..engines.len() {
        for j in (i + 1)..engines.len() {
            info!("{} vs {}", names[i], names[j]);
            let (left, right) = engines.split_at_mut(j);
            let report =
                runner.run_match(&names[i], left[i].as_mut(), &names[j], right[0].as_mut());
            elo.update_ratings(&names[i], &names[j], &report.result);
            results.add_match(&names[i], &names[j], report.result);
            games.extend(report.games);
        }
    }

    Ok(TournamentOutcome { results, games })
}

impl TournamentOutcome {
    /// Save the summary and game records under the preset's output directory.
    pub fn save(&self, preset: &TournamentPreset) -> Result<(PathBuf, PathBuf), TournamentError> {
        let dir = preset.resolve(&preset.output_dir);
        self.results.save_with_games(&dir, &self.games)
    }
}
