use super::*;
use arimaa_core::{Color, PieceKind};
use std::time::Duration;

fn pos(side: Color, text: &str) -> Position {
    Position::from_placement_str(side, 4, text).unwrap()
}

fn seeded() -> HeuristicConfig {
    let mut config = HeuristicConfig::default();
    config.picker.rng_seed = Some(21);
    config
}

#[test]
fn unused_steps_cost_a_little() {
    let p = pos(Color::Gold, "Ed4 Ra2 rh8");
    let config = seeded();
    let one = [Step::new(27, 35)];
    let mut after = p.clone();
    after.apply_step(one[0]);
    after.pass_turn();
    let plain = evaluate_position(&after, Color::Gold, &config.weights, false);
    let scored = score_candidate(&p, &after, &one, &config);
    assert!((plain - scored - 0.03).abs() < 1e-9);
}

#[test]
fn goal_is_found_within_the_budget() {
    let p = pos(Color::Gold, "Ra6 Ed4 rh6");
    let deadline = Instant::now() + Duration::from_millis(500);
    let outcome = pick_move(&p, Some(deadline), &seeded()).unwrap().unwrap();
    assert_eq!(outcome.result.end_state(), Some(Color::Gold));
    assert_eq!(outcome.score, f64::INFINITY);
}

#[test]
fn no_deadline_still_moves() {
    let p = Position::basic_setup();
    let outcome = pick_move(&p, None, &seeded()).unwrap().unwrap();
    assert_eq!(outcome.result.side_to_move, Color::Silver);
}

#[test]
fn two_stage_takes_the_free_capture() {
    let p = pos(Color::Gold, "Ed4 cc4 Ra1 rh8");
    let outcome = pick_move_two_stage(&p, &seeded()).unwrap();
    assert!(outcome.result.pieces_of(Color::Silver, PieceKind::Cat).is_empty());
    assert_eq!(outcome.samples, p.get_moves().len() as u64);
}

#[test]
fn perspective_override_flips_scores() {
    let p = pos(Color::Gold, "Ed4 Ra2 rh8");
    let mut after = p.clone();
    after.apply_step(Step::new(27, 35));
    after.pass_turn();

    let mine = score_candidate(&p, &after, &[Step::new(27, 35)], &seeded());
    let theirs = score_candidate(
        &p,
        &after,
        &[Step::new(27, 35)],
        &HeuristicConfig {
            perspective: Some(Color::Silver),
            ..seeded()
        },
    );
    // penalties are subtracted from both sides' view
    assert!((mine + theirs + 0.06).abs() < 1e-9);
}
