use super::*;

#[test]
fn test_elo_calculation() {
    let mut tracker = EloTracker::new();

    // Equal ratings should give 50% expected score
    let expected = tracker.expected_score("heuristic", "random");
    assert!((expected - 0.5).abs() < 0.001);
}

#[test]
fn test_elo_update() {
    let mut tracker = EloTracker::new();

    // heuristic wins all games
    let result = MatchResult {
        wins: 10,
        losses: 0,
        draws: 0,
    };
    tracker.update_ratings("heuristic", "random", &result);

    assert!(tracker.get_rating("heuristic") > DEFAULT_ELO);
    assert!(tracker.get_rating("random") < DEFAULT_ELO);
    assert_eq!(tracker.games_played["random"], 10);

    // ten games at 50% expectation, all won: 32 * 10 * 0.5
    assert!((tracker.history[0].elo_change - 160.0).abs() < 1e-9);
    let board = tracker.leaderboard();
    assert_eq!(board[0].0, "heuristic");
}

#[test]
fn drawn_match_between_equals_changes_nothing() {
    let mut tracker = EloTracker::new();
    let result = MatchResult {
        wins: 1,
        losses: 1,
        draws: 2,
    };
    tracker.update_ratings("a", "b", &result);
    assert_eq!(tracker.get_rating("a"), DEFAULT_ELO);
    assert_eq!(tracker.get_rating("b"), DEFAULT_ELO);
}

#[test]
fn match_result_bookkeeping() {
    let mut result = MatchResult::new();
    result.record(GameResult::Win);
    result.record(GameResult::Draw);
    result.record(GameResult::Win.flipped());
    assert_eq!(result.total_games(), 3);
    assert_eq!(result.score(), 0.5);
    assert_eq!(result.flipped().wins, 1);
    assert_eq!(MatchResult::new().score(), 0.5);
}

#[test]
fn tracker_survives_a_round_trip_on_disk() {
    let dir = std::env::temp_dir().join(format!("arimaa-elo-{}", std::process::id()));
    let path = dir.join("nested").join("elo.json");
    let mut tracker = EloTracker::new();
    tracker.update_ratings("a", "b", &MatchResult { wins: 1, losses: 0, draws: 0 });
    tracker.save(&path).unwrap();

    let loaded = EloTracker::load_or_default(&path).unwrap();
    assert_eq!(loaded, tracker);
    assert!(EloTracker::load_or_default(&dir.join("missing.json")).unwrap().ratings.is_empty());
    std::fs::remove_dir_all(&dir).ok();
}
