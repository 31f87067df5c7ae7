//! Match runner for playing games between engines

use std::time::Duration;

use arimaa_core::{
    translate_game_lines, Color, Engine, NotationError, Position, SearchLimits,
    DEFAULT_SAFETY_MARGIN,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::elo::{GameResult, MatchResult};

/// Configuration for a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Number of games to play
    pub num_games: u32,
    /// Maximum time per move (None = no limit)
    pub move_time: Option<Duration>,
    /// Turns (one per side each) before the game is declared a draw
    pub max_turns: u32,
    /// Whether to alternate colors each game
    pub alternate_colors: bool,
    /// Log every finished game at info level
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_games: 10,
            move_time: None,
            max_turns: 200,
            alternate_colors: true,
            verbose: true,
        }
    }
}

impl MatchConfig {
    /// Fresh limits for each move (the clock starts inside `search`)
    fn search_limits(&self) -> SearchLimits {
        SearchLimits::from_budget(self.move_time, DEFAULT_SAFETY_MARGIN)
    }
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Goal, elimination or immobilization
    Finished,
    /// An engine with legal moves returned none
    NoMove,
    IllegalMove,
    TurnLimit,
}

/// One played game in internal notation (`1g`, `1s`, `2g` ... move lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub gold: String,
    pub silver: String,
    pub started_at: DateTime<Utc>,
    pub moves: Vec<String>,
    pub winner: Option<Color>,
    pub termination: Termination,
    /// Turns played after setup
    pub turns: u32,
}

impl GameRecord {
    fn new(gold: &str, silver: &str) -> Self {
        Self {
            gold: gold.to_string(),
            silver: silver.to_string(),
            started_at: Utc::now(),
            moves: Vec::new(),
            winner: None,
            termination: Termination::TurnLimit,
            turns: 0,
        }
    }

    /// Result for the engine that played `color`.
    pub fn result_for(&self, color: Color) -> GameResult {
        match self.winner {
            Some(w) if w == color => GameResult::Win,
            Some(_) => GameResult::Loss,
            None => GameResult::Draw,
        }
    }

    /// Move header of the `ply`-th move after setup.
    fn header(ply: u32) -> String {
        let side = if ply % 2 == 0 { Color::Gold } else { Color::Silver };
        format!("{}{}", 2 + ply / 2, side.to_char())
    }

    /// Positions before every move after setup, paired with the move text.
    /// Stops at the first line that does not replay.
    pub fn replay(&self) -> Vec<(Position, String)> {
        let mut out = Vec::new();
        let mut pos = Position::basic_setup();
        for line in self.moves.iter().skip(2) {
            let text = line.split_once(' ').map(|(_, m)| m).unwrap_or("");
            let Ok(next) = pos.do_move_str(text, true) else {
                break;
            };
            out.push((pos, text.to_string()));
            pos = next;
        }
        out
    }

    /// The game in database notation (`1w`, `1b` ...).
    pub fn to_db_notation(&self) -> Result<Vec<String>, NotationError> {
        translate_game_lines(&self.moves)
    }
}

/// Outcome of a match: the score from engine1's perspective and every game.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub result: MatchResult,
    pub games: Vec<GameRecord>,
}

/// Runs matches between two engines
pub struct MatchRunner {
    config: MatchConfig,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run a match between two engines
    ///
    /// Returns the result from engine1's perspective
    pub fn run_match(
        &self,
        label1: &str,
        engine1: &mut dyn Engine,
        label2: &str,
        engine2: &mut dyn Engine,
    ) -> MatchReport {
        let mut result = MatchResult::new();
        let mut games = Vec::with_capacity(self.config.num_games as usize);

        for game_num in 0..self.config.num_games {
            // Alternate colors if configured
            let engine1_gold = !self.config.alternate_colors || game_num % 2 == 0;

            let (record, game_result) = if engine1_gold {
                let record = self.play_game(label1, engine1, label2, engine2);
                let r = record.result_for(Color::Gold);
                (record, r)
            } else {
                let record = self.play_game(label2, engine2, label1, engine1);
                let r = record.result_for(Color::Silver);
                (record, r)
            };
            result.record(game_result);

            if self.config.verbose {
                let outcome = match record.winner {
                    Some(Color::Gold) => "1-0",
                    Some(Color::Silver) => "0-1",
                    None => "1/2",
                };
                info!(
                    "Game {}/{}: {} vs {} {} ({:?}, {} turns) - Score: {}-{}-{}",
                    game_num + 1,
                    self.config.num_games,
                    record.gold,
                    record.silver,
                    outcome,
                    record.termination,
                    record.turns,
                    result.wins,
                    result.losses,
                    result.draws
                );
            }
            games.push(record);
        }

        MatchReport { result, games }
    }

    /// Play a single game from the basic setup.
    pub fn play_game(
        &self,
        gold_label: &str,
        gold: &mut dyn Engine,
        silver_label: &str,
        silver: &mut dyn Engine,
    ) -> GameRecord {
        let mut record = GameRecord::new(gold_label, silver_label);
        let mut pos = Position::basic_setup();
        gold.new_game();
        silver.new_game();
        record.moves.push(format!("1g {}", pos.placing_move(Color::Gold)));
        record.moves.push(format!("1s {}", pos.placing_move(Color::Silver)));

        let max_plies = self.config.max_turns.saturating_mul(2);
        for ply in 0..max_plies {
            if let Some(winner) = pos.end_state() {
                record.winner = Some(winner);
                record.termination = Termination::Finished;
                return record;
            }

            let mover = pos.side_to_move;
            let engine: &mut dyn Engine = match mover {
                Color::Gold => &mut *gold,
                Color::Silver => &mut *silver,
            };
            let result = engine.search(&pos, self.config.search_limits());

            let Some(steps) = result.best_move else {
                warn!(
                    engine = engine.name(),
                    side = %mover,
                    "no move returned with legal moves available"
                );
                record.winner = Some(mover.other());
                record.termination = Termination::NoMove;
                return record;
            };

            // The engine's own result is not trusted; the move is replayed.
            let played = pos
                .steps_to_str(&steps)
                .and_then(|text| pos.do_move_str(&text, true).map(|next| (text, next)));
            match played {
                Ok((text, next)) => {
                    debug!(ply, side = %mover, mv = %text, "move played");
                    record.moves.push(format!("{} {}", GameRecord::header(ply), text));
                    record.turns = ply / 2 + 1;
                    pos = next;
                }
                Err(e) => {
                    warn!(engine = engine.name(), side = %mover, error = %e, "illegal move");
                    record.winner = Some(mover.other());
                    record.termination = Termination::IllegalMove;
                    return record;
                }
            }
        }

        if let Some(winner) = pos.end_state() {
            record.winner = Some(winner);
            record.termination = Termination::Finished;
        }
        record
    }
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
