//! The presets shipped under `configs/` must stay loadable.

use std::path::PathBuf;

use heuristic_engine::{HeuristicConfig, Selection};
use tournament::{build_engine, BuiltinKind, TournamentPreset};

fn configs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs")
}

#[test]
fn tournament_presets_load() {
    for name in ["smoke.toml", "aei_gauntlet.toml"] {
        let preset = TournamentPreset::load(&configs_dir().join("tournaments").join(name)).unwrap();
        assert!(preset.engines.len() >= 2, "{name}");
        assert!(preset.move_time().is_some(), "{name}");
    }
}

#[test]
fn smoke_engines_build() {
    let preset = TournamentPreset::load(&configs_dir().join("tournaments/smoke.toml")).unwrap();
    for entry in &preset.engines {
        assert!(entry.builtin.is_some());
        build_engine(entry, &preset.base_dir).unwrap();
    }
    assert_eq!(preset.engines[0].builtin, Some(BuiltinKind::Heuristic));
}

#[test]
fn engine_option_presets_load() {
    let default =
        HeuristicConfig::load(&configs_dir().join("engines/heuristic_default.toml")).unwrap();
    assert_eq!(default, HeuristicConfig::default());

    let two_stage =
        HeuristicConfig::load(&configs_dir().join("engines/heuristic_two_stage.toml")).unwrap();
    assert_eq!(two_stage.selection, Selection::TwoStage);
    assert!(two_stage.legal_mobility);
    assert!(!two_stage.picker.random_ties);
}
