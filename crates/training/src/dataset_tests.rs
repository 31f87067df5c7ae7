use super::*;
use arimaa_core::Position;
use chrono::Utc;
use tournament::Termination;

/// Gold walks its elephant forward and back; silver answers with a rabbit.
fn scripted_game(winner: Option<Color>) -> GameRecord {
    let basic = Position::basic_setup();
    GameRecord {
        gold: "a".to_string(),
        silver: "b".to_string(),
        started_at: Utc::now(),
        moves: vec![
            format!("1g {}", basic.placing_move(Color::Gold)),
            format!("1s {}", basic.placing_move(Color::Silver)),
            "2g Ee2n Ee3n".to_string(),
            "2s da7s".to_string(),
            "3g Ee4s".to_string(),
        ],
        winner,
        termination: Termination::Finished,
        turns: 2,
    }
}

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("arimaa-dataset-{tag}-{}", std::process::id()))
}

#[test]
fn samples_follow_the_game() {
    let samples = samples_from_game(3, &scripted_game(Some(Color::Gold)));
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].game, 3);
    assert_eq!(samples[0].position, Position::basic_setup().to_short_str());
    assert_eq!(samples[0].mv, "Ee2n Ee3n");
    assert_eq!(samples[1].side, Color::Silver);
    assert_eq!(samples[1].ply, 1);
    assert_eq!(
        samples.iter().map(|s| s.result).collect::<Vec<_>>(),
        [1.0, -1.0, 1.0]
    );
}

#[test]
fn draws_score_zero_and_bad_lines_stop_the_replay() {
    let mut game = scripted_game(None);
    game.moves.push("3s Ra1n".to_string());
    let samples = samples_from_game(0, &game);
    assert_eq!(samples.len(), 3);
    assert!(samples.iter().all(|s| s.result == 0.0));
}

#[test]
fn samples_round_trip_through_jsonl() {
    let dir = temp_dir("jsonl");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(POSITIONS_FILE);
    let samples = samples_from_game(0, &scripted_game(Some(Color::Silver)));
    write_samples(&path, &samples).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), samples.len());
    assert!(text.lines().next().unwrap().contains("\"move\":\"Ee2n Ee3n\""));
    assert_eq!(read_samples(&path).unwrap(), samples);

    fs::write(&path, "{\"game\": 1}\n").unwrap();
    assert!(matches!(read_samples(&path), Err(DatasetError::Record { line: 1, .. })));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn dataset_directory_holds_all_outputs() {
    let dir = temp_dir("build");
    let games = vec![scripted_game(Some(Color::Gold)), scripted_game(None)];
    let summary = build_dataset(&dir, &games).unwrap();
    assert_eq!(summary.games, 2);
    assert_eq!(summary.positions, 6);

    let db = fs::read_to_string(dir.join(GAMES_DB_FILE)).unwrap();
    assert!(db.contains("2w Ee2n Ee3n"));
    assert!(db.contains("2b da7s"));
    assert_eq!(db.matches("1w ").count(), 2);
    let records: Vec<GameRecord> =
        serde_json::from_str(&fs::read_to_string(dir.join(GAMES_JSON_FILE)).unwrap()).unwrap();
    assert_eq!(records, games);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn untranslatable_games_are_reported() {
    let dir = temp_dir("notation");
    fs::create_dir_all(&dir).unwrap();
    let mut game = scripted_game(None);
    game.moves.push("garbage".to_string());
    let err = write_db_games(&dir.join(GAMES_DB_FILE), &[game]).unwrap_err();
    assert!(matches!(err, DatasetError::Notation { game: 0, .. }));
    fs::remove_dir_all(&dir).ok();
}
