use super::*;
use crate::ChannelController;
use arimaa_core::{SearchResult, Step};
use std::sync::mpsc;

/// Engine that never finds a move and accepts a single `depth` option.
#[derive(Default)]
struct StuckEngine {
    games: u32,
}

impl Engine for StuckEngine {
    fn search(&mut self, _pos: &Position, _limits: SearchLimits) -> SearchResult {
        SearchResult::immobilized()
    }

    fn name(&self) -> &str {
        "Stuck"
    }

    fn new_game(&mut self) {
        self.games += 1;
    }

    fn set_option(&mut self, name: &str, _value: &str) -> bool {
        name == "depth"
    }
}

/// Engine that always walks the gold elephant from e2 to e3.
struct ElephantEngine;

impl Engine for ElephantEngine {
    fn search(&mut self, pos: &Position, _limits: SearchLimits) -> SearchResult {
        let steps = vec![Step::new(12, 20)];
        let mut result = pos.clone();
        result.apply_step(steps[0]);
        result.pass_turn();
        SearchResult {
            best_move: Some(steps),
            result: Some(result),
            ..SearchResult::default()
        }
    }

    fn name(&self) -> &str {
        "Elephant"
    }
}

type TestSession<E> = AeiSession<ChannelController<Vec<u8>>, E>;

fn session_with<E: Engine>(engine: E, lines: &[&str]) -> (TestSession<E>, Result<(), AeiError>) {
    let (tx, rx) = mpsc::channel();
    tx.send("aei".to_string()).unwrap();
    for line in lines {
        tx.send(line.to_string()).unwrap();
    }
    drop(tx);
    let mut session = AeiSession::start(ChannelController::new(rx, Vec::new()), engine).unwrap();
    let outcome = session.run();
    (session, outcome)
}

fn output<E: Engine>(session: TestSession<E>) -> Vec<String> {
    let (controller, _) = session.into_parts();
    String::from_utf8(controller.into_writer())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn handshake_identifies_the_engine() {
    let (session, outcome) = session_with(StuckEngine::default(), &["isready"]);
    assert!(outcome.is_ok());
    assert_eq!(
        output(session),
        [
            "protocol-version 1",
            "id name Stuck",
            "id author Arimaa-lab",
            "aeiok",
            "readyok"
        ]
    );
}

#[test]
fn handshake_rejects_other_headers() {
    let (tx, rx) = mpsc::channel();
    tx.send("uci".to_string()).unwrap();
    let err = AeiSession::start(ChannelController::new(rx, Vec::new()), StuckEngine::default())
        .err()
        .unwrap();
    assert!(matches!(err, AeiError::BadHeader(h) if h == "uci"));
}

#[test]
fn handshake_times_out() {
    let (_tx, rx) = mpsc::channel::<String>();
    let err = AeiSession::start_with_timeout(
        ChannelController::new(rx, Vec::new()),
        StuckEngine::default(),
        Duration::from_millis(20),
    )
    .err()
    .unwrap();
    assert!(matches!(err, AeiError::HandshakeTimeout));
}

#[test]
fn newgame_keeps_time_control_but_resets_reserves() {
    let (session, _) = session_with(
        StuckEngine::default(),
        &[
            "setoption name tcmove value 2",
            "setoption name tcturntime value 5",
            "setoption name greserve value 30",
            "newgame",
        ],
    );
    let clock = session.clock();
    assert_eq!(clock.move_time, Some(2.0));
    assert_eq!(clock.turn_time, Some(5.0));
    assert_eq!(clock.reserve, [0.0, 0.0]);
    assert!(session.position().is_empty(4));
    // once for the handshake, once for the newgame command
    let (_, engine) = session.into_parts();
    assert_eq!(engine.games, 2);
}

#[test]
fn options_are_routed() {
    let (session, _) = session_with(
        StuckEngine::default(),
        &[
            "setoption name opponent value somebody",
            "setoption name depth value 3",
            "setoption name hash value 64",
            "setoption name tcmove value soon",
        ],
    );
    let out = output(session);
    let logs: Vec<&String> = out.iter().filter(|l| l.starts_with("log ")).collect();
    assert_eq!(logs.len(), 2, "{out:?}");
    assert_eq!(logs[0], "log Warning: Received unrecognized option, hash");
    assert!(logs[1].starts_with("log Warning: Bad value for option tcmove"));
}

#[test]
fn go_during_setup_places_the_basic_setup() {
    let (session, _) = session_with(StuckEngine::default(), &["newgame", "go"]);
    let out = output(session);
    let gold_setup = Position::basic_setup().placing_move(Color::Gold);
    assert!(out.iter().any(|l| l.starts_with("info time")));
    assert_eq!(out.last().unwrap(), &format!("bestmove {gold_setup}"));
}

#[test]
fn setup_moves_leave_setup_after_silver() {
    let basic = Position::basic_setup();
    let gold = format!("makemove {}", basic.placing_move(Color::Gold));
    let silver = format!("makemove {}", basic.placing_move(Color::Silver));
    let (session, _) =
        session_with(ElephantEngine, &["newgame", gold.as_str(), silver.as_str(), "go"]);
    assert!(session.position().same_board(&basic));
    assert_eq!(output(session).last().unwrap(), "bestmove Ee2n");
}

#[test]
fn go_answers_with_the_engine_move() {
    let short = Position::basic_setup().to_short_str();
    let setpos = format!("setposition g {short}");
    let (session, outcome) = session_with(
        ElephantEngine,
        &["newgame", setpos.as_str(), "setoption name tcmove value 0.1", "go", "quit"],
    );
    assert!(outcome.is_ok());
    let out = output(session);
    assert!(out.contains(&"bestmove Ee2n".to_string()), "{out:?}");
    assert!(out.contains(&"log Debug: Exiting after receiving quit message.".to_string()));
}

#[test]
fn immobilized_side_sends_an_empty_move() {
    let stuck = Position::from_placement_str(Color::Gold, 4, "Ra1 ea2 rh8").unwrap();
    let setpos = format!("setposition g {}", stuck.to_short_str());
    let (session, _) = session_with(StuckEngine::default(), &[setpos.as_str(), "go"]);
    let out = output(session);
    assert!(out.contains(&"log Warning: move requested when immobilized.".to_string()));
    assert_eq!(out.last().unwrap(), "bestmove ");
}

#[test]
fn illegal_move_ends_the_session() {
    let short = Position::basic_setup().to_short_str();
    let setpos = format!("setposition g {short}");
    let (session, outcome) = session_with(
        StuckEngine::default(),
        &[setpos.as_str(), "makemove Ra1n", "isready"],
    );
    assert!(outcome.is_ok());
    let out = output(session);
    assert!(out.iter().any(|l| l.starts_with("log Error: received illegal move Ra1n")));
    assert!(!out.contains(&"readyok".to_string()));
}

#[test]
fn ponder_is_not_supported() {
    let (session, _) = session_with(StuckEngine::default(), &["newgame", "go ponder", "stop"]);
    assert!(!output(session).iter().any(|l| l.starts_with("bestmove")));
}
