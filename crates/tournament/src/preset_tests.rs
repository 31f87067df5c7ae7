use super::*;

const PRESET: &str = r#"
name = "smoke"
games_per_pair = 4
move_time = 0.5

[[engines]]
name = "heuristic"
builtin = "heuristic"
options = "engines/heuristic_default.toml"

[[engines]]
name = "random"
builtin = "random"

[[engines]]
name = "external"
cmdline = "./bin/aei_engine --engine random"
"#;

#[test]
fn parses_engines_and_defaults() {
    let preset: TournamentPreset = toml::from_str(PRESET).unwrap();
    assert_eq!(preset.name, "smoke");
    assert_eq!(preset.games_per_pair, 4);
    assert_eq!(preset.max_turns, 200);
    assert_eq!(preset.output_dir, PathBuf::from("artifacts/results"));
    assert_eq!(preset.move_time(), Some(Duration::from_millis(500)));
    assert_eq!(preset.engines.len(), 3);
    assert_eq!(preset.engines[1].builtin, Some(BuiltinKind::Random));
    assert!(preset.engines[2].cmdline.is_some());
    preset.validate().unwrap();
}

#[test]
fn load_resolves_against_the_preset_directory() {
    let dir = std::env::temp_dir().join(format!("arimaa-preset-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("smoke.toml");
    std::fs::write(&path, PRESET).unwrap();

    let preset = TournamentPreset::load(&path).unwrap();
    assert_eq!(preset.base_dir, dir);
    let options = preset.engines[0].options.as_deref().unwrap();
    assert_eq!(preset.resolve(options), dir.join("engines/heuristic_default.toml"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn engines_need_exactly_one_source() {
    let mut preset: TournamentPreset = toml::from_str(PRESET).unwrap();
    preset.engines[1].cmdline = Some("engine".to_string());
    assert!(matches!(
        preset.validate(),
        Err(TournamentError::BadEngine { name, .. }) if name == "random"
    ));

    preset.engines[1].builtin = None;
    preset.engines[1].cmdline = None;
    assert!(preset.validate().is_err());
}

#[test]
fn rejects_duplicates_and_lonely_tournaments() {
    let mut preset: TournamentPreset = toml::from_str(PRESET).unwrap();
    preset.engines[2].name = "random".to_string();
    assert!(preset.validate().is_err());

    preset.engines.truncate(1);
    assert!(preset.validate().is_err());
}

#[test]
fn untimed_when_move_time_is_missing_or_zero() {
    let mut preset = TournamentPreset::default();
    assert_eq!(preset.move_time(), None);
    preset.move_time = Some(0.0);
    assert_eq!(preset.move_time(), None);
}

#[test]
fn builtin_names_are_case_insensitive() {
    assert_eq!(BuiltinKind::parse("Heuristic"), Some(BuiltinKind::Heuristic));
    assert_eq!(BuiltinKind::parse("neural"), None);
}
