use super::*;
use arimaa_core::Color;
use std::time::Duration;

fn seeded_engine() -> HeuristicEngine {
    let mut engine = HeuristicEngine::new();
    assert!(engine.set_option("seed", "5"));
    engine
}

#[test]
fn heuristic_engine_returns_legal_move() {
    let mut engine = seeded_engine();
    let pos = Position::basic_setup();
    let result = engine.search(&pos, SearchLimits::time(Duration::from_millis(150)));

    let steps = result.best_move.expect("opening position has moves");
    let text = pos.steps_to_str(&steps).unwrap();
    let replayed = pos.do_move_str(&text, true).unwrap();
    assert_eq!(Some(replayed), result.result);
    assert!(result.samples > 0);
}

#[test]
fn heuristic_engine_handles_immobilized_side() {
    let mut engine = seeded_engine();
    let pos = Position::from_placement_str(Color::Gold, 4, "Ra1 ea2 rh8").unwrap();
    let result = engine.search(&pos, SearchLimits::time(Duration::from_millis(50)));
    assert!(result.best_move.is_none());
    assert!(result.result.is_none());
}

#[test]
fn two_stage_selection_ignores_the_clock() {
    let mut engine = seeded_engine();
    assert!(engine.set_option("selection", "two_stage"));
    let pos = Position::from_placement_str(Color::Gold, 4, "Ra7 Ed4 rh6").unwrap();
    let result = engine.search(&pos, SearchLimits::none());
    assert_eq!(result.result.unwrap().end_state(), Some(Color::Gold));
}

#[test]
fn options_are_parsed() {
    let mut engine = HeuristicEngine::new();
    assert!(engine.set_option("legal_mobility", "true"));
    assert!(engine.set_option("random_ties", "no"));
    assert!(engine.set_option("attempts", "12"));
    assert!(engine.set_option("weight_trap", "2.5"));
    assert!(engine.set_option("seed", "none"));

    let config = engine.config();
    assert!(config.legal_mobility);
    assert!(!config.picker.random_ties);
    assert_eq!(config.picker.max_attempts_per_bucket, 12);
    assert_eq!(config.weights.trap, 2.5);
    assert_eq!(config.picker.rng_seed, None);

    assert!(!engine.set_option("weight_king_safety", "1.0"));
    assert!(!engine.set_option("attempts", "many"));
    assert!(!engine.set_option("hash", "64"));
    // rejected values leave the configuration alone
    assert_eq!(engine.config().picker.max_attempts_per_bucket, 12);
}

#[test]
fn config_preset_from_toml() {
    let config = HeuristicConfig::from_toml_str(
        r#"
        legal_mobility = true
        selection = "two_stage"
        perspective = "silver"

        [weights]
        goal_threat = 3.0

        [picker]
        rng_seed = 99
        "#,
    )
    .unwrap();
    assert!(config.legal_mobility);
    assert_eq!(config.selection, Selection::TwoStage);
    assert_eq!(config.perspective, Some(Color::Silver));
    assert_eq!(config.weights.goal_threat, 3.0);
    assert_eq!(config.weights.material, 1.0);
    assert_eq!(config.picker.rng_seed, Some(99));
    assert_eq!(config.picker.max_attempts_per_bucket, 96);
}
