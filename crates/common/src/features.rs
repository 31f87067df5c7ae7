//! Heuristic features and the linear position evaluator.
//!
//! Every feature is computed for gold and silver symmetrically and returned
//! "good for perspective": higher is better for the side we score for.
//! Features are cheap and local; the one expensive variant is legal mobility,
//! which generates actions for both sides.

use arimaa_core::{Bitboard, Color, PieceKind, Position, Step, TRAPS};
use serde::{Deserialize, Serialize};

/// Penalty per unused step, a slight nudge away from near-null moves.
pub const UNUSED_STEP_PENALTY: f64 = 0.01;

/// Names of the entries of [`feature_vector`], in order.
pub const FEATURE_NAMES: [&str; 6] = [
    "material",
    "trap",
    "frozen",
    "mobility",
    "rabbits",
    "goal_threat",
];

fn for_perspective(score_for_gold: f64, perspective: Color) -> f64 {
    match perspective {
        Color::Gold => score_for_gold,
        Color::Silver => -score_for_gold,
    }
}

fn material_value(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::Rabbit => 1.0,
        PieceKind::Cat => 2.0,
        PieceKind::Dog => 3.0,
        PieceKind::Horse => 5.0,
        PieceKind::Camel => 9.0,
        PieceKind::Elephant => 14.0,
    }
}

// --- Material ------------------------------------------------------------------

pub fn feature_material_counts(pos: &Position, perspective: Color) -> f64 {
    let side_total = |color: Color| -> f64 {
        PieceKind::ALL
            .into_iter()
            .map(|k| material_value(k) * pos.pieces_of(color, k).popcount() as f64)
            .sum()
    };
    for_perspective(side_total(Color::Gold) - side_total(Color::Silver), perspective)
}

// --- Traps ---------------------------------------------------------------------

/// Own pieces next to the trap. Frozen pieces still defend it.
fn trap_adjacent(pos: &Position, trap: u8, color: Color) -> i32 {
    (Bitboard::from_square(trap).neighbors() & pos.placement[color.idx()]).popcount() as i32
}

/// Trap control (defenders minus attackers around each trap) combined with
/// trap danger (own pieces crowding a trap that few of them can defend, or a
/// piece sitting on a trap with no defender at all).
pub fn feature_trap_control_and_danger(pos: &Position, perspective: Color) -> f64 {
    let mut score_for_gold = 0.0;

    for trap in TRAPS {
        let g_adj = trap_adjacent(pos, trap, Color::Gold);
        let s_adj = trap_adjacent(pos, trap, Color::Silver);
        // every adjacent own piece defends the trap
        let g_def = g_adj;
        let s_def = s_adj;
        // an attacker is any enemy piece next to the trap
        let g_att = s_adj;
        let s_att = g_adj;

        score_for_gold += 0.35 * f64::from((g_def - g_att) - (s_def - s_att));

        score_for_gold -= 0.50 * f64::from((g_adj - 2 * g_def).max(0));
        score_for_gold += 0.50 * f64::from((s_adj - 2 * s_def).max(0));

        if pos.placement[Color::Gold.idx()].contains(trap) {
            score_for_gold -= 1.25 * f64::from((1 - g_def).max(0));
        }
        if pos.placement[Color::Silver.idx()].contains(trap) {
            score_for_gold += 1.25 * f64::from((1 - s_def).max(0));
        }
    }

    for_perspective(score_for_gold, perspective)
}

// --- Frozen pieces -------------------------------------------------------------

fn frozen_multiplier(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::Rabbit => 0.6,
        PieceKind::Cat | PieceKind::Dog => 1.0,
        PieceKind::Horse => 1.6,
        PieceKind::Camel => 2.0,
        PieceKind::Elephant => 2.5,
    }
}

fn frozen_weight_sum(pos: &Position, color: Color) -> f64 {
    PieceKind::ALL
        .into_iter()
        .map(|k| {
            let frozen = pos.pieces_of(color, k).filter(|&s| pos.is_frozen_at(s)).count();
            frozen_multiplier(k) * frozen as f64
        })
        .sum()
}

/// Frozen enemy pieces are good, frozen own pieces bad; big pieces weigh more.
pub fn feature_frozen_pieces(pos: &Position, perspective: Color) -> f64 {
    let g = frozen_weight_sum(pos, Color::Gold);
    let s = frozen_weight_sum(pos, Color::Silver);
    for_perspective(s - g, perspective)
}

// --- Mobility ------------------------------------------------------------------

/// With `use_legal_steps`, the difference in available actions when each
/// side is to move. Otherwise empty squares next to each side's pieces,
/// which ignores freezing and rabbit rules but costs almost nothing.
pub fn feature_mobility(pos: &Position, perspective: Color, use_legal_steps: bool) -> f64 {
    let score_for_gold = if use_legal_steps {
        let g = pos.with_side_to_move(Color::Gold).legal_step_count();
        let s = pos.with_side_to_move(Color::Silver).legal_step_count();
        g as f64 - s as f64
    } else {
        let empty = pos.empty_squares();
        let g = (pos.placement[Color::Gold.idx()].neighbors() & empty).popcount();
        let s = (pos.placement[Color::Silver.idx()].neighbors() & empty).popcount();
        f64::from(g) - f64::from(s)
    };
    for_perspective(score_for_gold, perspective)
}

// --- Rabbits -------------------------------------------------------------------

fn rabbit_progress(pos: &Position, color: Color) -> f64 {
    pos.pieces_of(color, PieceKind::Rabbit)
        .map(|s| {
            let rank = s / 8;
            match color {
                Color::Gold => f64::from(rank),
                Color::Silver => f64::from(7 - rank),
            }
        })
        .sum()
}

pub fn feature_rabbit_advancement(pos: &Position, perspective: Color) -> f64 {
    let g = rabbit_progress(pos, Color::Gold);
    let s = rabbit_progress(pos, Color::Silver);
    for_perspective(g - s, perspective)
}

/// Unfrozen rabbits one rank short of goal with an empty square ahead.
/// A quick signal, not a proof of a forced goal.
fn near_goal_threats(pos: &Position, color: Color) -> u32 {
    let target_rank = color.goal_rank() - color.forward();
    let empty = pos.empty_squares();
    let ahead = match color {
        Color::Gold => empty.south(),
        Color::Silver => empty.north(),
    };
    (pos.pieces_of(color, PieceKind::Rabbit) & Bitboard::rank(target_rank) & ahead)
        .filter(|&s| !pos.is_frozen_at(s))
        .count() as u32
}

pub fn feature_immediate_goal_threats(pos: &Position, perspective: Color) -> f64 {
    let g = near_goal_threats(pos, Color::Gold);
    let s = near_goal_threats(pos, Color::Silver);
    for_perspective(f64::from(g) - f64::from(s), perspective)
}

// --- Combining features --------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub material: f64,
    pub trap: f64,
    pub frozen: f64,
    pub mobility: f64,
    pub rabbits: f64,
    pub goal_threat: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            material: 1.00,
            trap: 1.30,
            frozen: 0.90,
            mobility: 0.08,
            rabbits: 0.12,
            goal_threat: 1.75,
        }
    }
}

impl EvalWeights {
    /// Mutable access by feature name, for engine options like `weight_trap`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "material" => Some(&mut self.material),
            "trap" => Some(&mut self.trap),
            "frozen" => Some(&mut self.frozen),
            "mobility" => Some(&mut self.mobility),
            "rabbits" => Some(&mut self.rabbits),
            "goal_threat" => Some(&mut self.goal_threat),
            _ => None,
        }
    }

    fn as_array(&self) -> [f64; 6] {
        [
            self.material,
            self.trap,
            self.frozen,
            self.mobility,
            self.rabbits,
            self.goal_threat,
        ]
    }
}

/// `+inf` if `perspective` has won, `-inf` if it has lost.
pub fn terminal_eval(pos: &Position, perspective: Color) -> Option<f64> {
    pos.end_state().map(|winner| {
        if winner == perspective {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    })
}

/// Raw feature values in [`FEATURE_NAMES`] order.
pub fn feature_vector(pos: &Position, perspective: Color, legal_mobility: bool) -> [f64; 6] {
    [
        feature_material_counts(pos, perspective),
        feature_trap_control_and_danger(pos, perspective),
        feature_frozen_pieces(pos, perspective),
        feature_mobility(pos, perspective, legal_mobility),
        feature_rabbit_advancement(pos, perspective),
        feature_immediate_goal_threats(pos, perspective),
    ]
}

/// Linear evaluation; finished games score infinite.
pub fn evaluate_position(
    pos: &Position,
    perspective: Color,
    weights: &EvalWeights,
    legal_mobility: bool,
) -> f64 {
    if let Some(t) = terminal_eval(pos, perspective) {
        return t;
    }
    feature_vector(pos, perspective, legal_mobility)
        .iter()
        .zip(weights.as_array())
        .map(|(f, w)| f * w)
        .sum()
}

pub fn unused_step_penalty(steps: &[Step]) -> f64 {
    UNUSED_STEP_PENALTY * 4usize.saturating_sub(steps.len()) as f64
}

/// Score the result of a move, by default for the player who made it.
pub fn score_move(
    from_pos: &Position,
    to_pos: &Position,
    steps: Option<&[Step]>,
    perspective: Option<Color>,
    weights: &EvalWeights,
) -> f64 {
    let perspective = perspective.unwrap_or(from_pos.side_to_move);
    let base = evaluate_position(to_pos, perspective, weights, true);
    match steps {
        Some(steps) => base - unused_step_penalty(steps),
        None => base,
    }
}

/// Generate every move from `pos` and score each one.
pub fn score_all_moves(
    pos: &Position,
    weights: &EvalWeights,
    perspective: Option<Color>,
) -> Vec<(Vec<Step>, Position, f64)> {
    let perspective = perspective.unwrap_or(pos.side_to_move);
    pos.get_moves()
        .into_iter()
        .map(|(steps, result)| {
            let s = score_move(pos, &result, Some(&steps), Some(perspective), weights);
            (steps, result, s)
        })
        .collect()
}

#[cfg(test)]
#[path = "features_tests.rs"]
mod features_tests;
