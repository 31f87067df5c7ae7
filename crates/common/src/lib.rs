//! Shared building blocks for the Arimaa engines in this workspace.
//!
//! - [`features`]: heuristic position features and the linear evaluator
//! - [`search`]: move constraints, constrained sampling and the anytime picker
//! - [`selector`]: two-stage selection over an enumerated move list
//!
//! Engine policy (which buckets to sample, which weights to use) lives in the
//! engine crates; nothing here depends on a particular engine.

pub mod features;
pub mod search;
pub mod selector;

pub use features::{
    evaluate_position, feature_vector, score_all_moves, score_move, terminal_eval, EvalWeights,
    FEATURE_NAMES,
};
pub use search::{
    get_filtered_move, pick_move_anytime, FilterLimits, MoveConstraints, PickError, PickOutcome,
    PickerConfig, Sample, TimeBudget,
};
pub use selector::{select_best_move_two_stage, TwoStageConfig};
