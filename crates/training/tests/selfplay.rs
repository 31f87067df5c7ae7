//! Short self-play runs end to end: games, samples and files on disk.

use std::time::Duration;

use tournament::{BuiltinKind, Termination};
use training::{build_dataset, generate_games, read_samples, SelfPlayConfig, POSITIONS_FILE};

fn quick_config(games: usize) -> SelfPlayConfig {
    SelfPlayConfig {
        games,
        move_time: Some(Duration::from_millis(40)),
        max_turns: 6,
        first: BuiltinKind::Heuristic,
        second: BuiltinKind::Random,
        seed: 11,
        ..SelfPlayConfig::default()
    }
}

#[test]
fn games_alternate_colors_and_stay_legal() {
    let games = generate_games(&quick_config(4));
    assert_eq!(games.len(), 4);
    for (i, game) in games.iter().enumerate() {
        let expected_gold = if i % 2 == 0 { "heuristic" } else { "random" };
        assert_eq!(game.gold, expected_gold);
        assert!(
            !matches!(game.termination, Termination::IllegalMove | Termination::NoMove),
            "game {i}: {game:?}"
        );
        assert!(game.turns <= 6);
    }
}

#[test]
fn random_games_are_reproducible_from_the_seed() {
    let config = SelfPlayConfig {
        first: BuiltinKind::Random,
        second: BuiltinKind::Random,
        move_time: None,
        ..quick_config(3)
    };
    let a = generate_games(&config);
    let b = generate_games(&config);
    let moves = |games: &[tournament::GameRecord]| {
        games.iter().map(|g| g.moves.clone()).collect::<Vec<_>>()
    };
    assert_eq!(moves(&a), moves(&b));
}

#[test]
fn dataset_has_one_sample_per_move() {
    let games = generate_games(&quick_config(2));
    let dir = std::env::temp_dir().join(format!("arimaa-selfplay-{}", std::process::id()));
    let summary = build_dataset(&dir, &games).unwrap();

    let played: usize = games.iter().map(|g| g.moves.len() - 2).sum();
    assert_eq!(summary.positions, played);
    let samples = read_samples(&dir.join(POSITIONS_FILE)).unwrap();
    assert_eq!(samples.len(), played);
    assert!(samples.iter().all(|s| s.features.iter().all(|f| f.is_finite())));
    std::fs::remove_dir_all(&dir).ok();
}
