//! Drive the heuristic engine through a full AEI conversation on a
//! background thread, the way a controller would.

use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use aei_engine::{AeiSession, ChannelController};
use arimaa_core::Position;
use heuristic_engine::HeuristicEngine;

/// Writer shared between the engine thread and the test.
#[derive(Clone, Default)]
struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).lines().map(str::to_string).collect()
    }

    fn wait_for(&self, prefix: &str, timeout: Duration) -> Option<String> {
        let end = Instant::now() + timeout;
        while Instant::now() < end {
            if let Some(line) = self.lines().into_iter().find(|l| l.starts_with(prefix)) {
                return Some(line);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn engine_responds_with_legal_move() {
    let (tx, rx) = mpsc::channel();
    let out = SharedOutput::default();
    let controller = ChannelController::new(rx, out.clone());

    tx.send("aei".to_string()).unwrap();
    let handle = thread::spawn(move || {
        let mut session = AeiSession::start(controller, HeuristicEngine::new())?;
        session.run()
    });

    assert!(out.wait_for("aeiok", Duration::from_secs(5)).is_some(), "{:?}", out.lines());

    let pos = Position::basic_setup();
    for line in [
        "newgame".to_string(),
        format!("setposition g {}", pos.to_short_str()),
        "setoption name tcmove value 0.15".to_string(),
        "setoption name greserve value 0.0".to_string(),
        "setoption name sreserve value 0.0".to_string(),
        "go".to_string(),
    ] {
        tx.send(line).unwrap();
    }

    let bestmove = out
        .wait_for("bestmove ", Duration::from_secs(5))
        .unwrap_or_else(|| panic!("no bestmove, sent {:?}", out.lines()));
    let move_str = bestmove.trim_start_matches("bestmove ").trim();
    assert!(!move_str.is_empty(), "engine returned an empty move");

    let next = pos
        .do_move_str(move_str, true)
        .unwrap_or_else(|e| panic!("illegal move {move_str:?}: {e}"));
    assert!(!next.same_board(&pos));
    assert_ne!(next.side_to_move, pos.side_to_move);

    tx.send("quit".to_string()).unwrap();
    handle.join().unwrap().unwrap();
    assert!(out.lines().iter().any(|l| l.starts_with("info move gen time")));
}
