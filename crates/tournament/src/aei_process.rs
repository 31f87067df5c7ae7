//! Engines running as AEI subprocesses.
//!
//! [`AeiClient`] plays the controller side of the protocol over any pair of
//! line channels; [`AeiProcess`] spawns a command line and wires its stdio to
//! a client.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use arimaa_core::{Engine, Position, SearchLimits, SearchResult};
use tracing::{debug, warn};

use crate::error::TournamentError;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
/// Extra time granted on top of the move budget before giving up.
const MOVE_GRACE: Duration = Duration::from_secs(5);
const UNTIMED_MOVE_TIMEOUT: Duration = Duration::from_secs(60);
const QUIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Controller side of an AEI conversation.
pub struct AeiClient<W: Write + Send> {
    label: String,
    name: String,
    author: String,
    to_engine: W,
    from_engine: Receiver<String>,
    /// Last `tcmove` sent
    move_time: Option<Duration>,
    /// Set once the engine stopped answering; every later search is a forfeit
    broken: bool,
}

impl<W: Write + Send> AeiClient<W> {
    /// Send the `aei` header and wait for `aeiok`.
    pub fn connect(
        label: &str,
        to_engine: W,
        from_engine: Receiver<String>,
    ) -> Result<Self, TournamentError> {
        let mut client = Self {
            label: label.to_string(),
            name: label.to_string(),
            author: String::new(),
            to_engine,
            from_engine,
            move_time: None,
            broken: false,
        };
        client.send("aei")?;

        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        loop {
            let line = client.recv_until(deadline)?;
            if line == "aeiok" {
                break;
            }
            if let Some(name) = line.strip_prefix("id name ") {
                client.name = name.trim().to_string();
            } else if let Some(author) = line.strip_prefix("id author ") {
                client.author = author.trim().to_string();
            } else if let Some(version) = line.strip_prefix("protocol-version ") {
                if version.trim() != "1" {
                    return Err(client.error(format!("unsupported protocol version {version}")));
                }
            }
        }
        debug!(engine = %client.name, "AEI handshake complete");
        Ok(client)
    }

    fn error(&self, reason: impl Into<String>) -> TournamentError {
        TournamentError::Aei {
            cmdline: self.label.clone(),
            reason: reason.into(),
        }
    }

    fn send(&mut self, line: &str) -> Result<(), TournamentError> {
        debug!(engine = %self.label, "> {line}");
        writeln!(self.to_engine, "{line}")
            .and_then(|_| self.to_engine.flush())
            .map_err(|e| self.error(format!("write failed: {e}")))
    }

    fn recv_until(&mut self, deadline: Instant) -> Result<String, TournamentError> {
        let timeout = deadline.saturating_duration_since(Instant::now());
        match self.from_engine.recv_timeout(timeout) {
            Ok(line) => {
                debug!(engine = %self.label, "< {line}");
                Ok(line.trim().to_string())
            }
            Err(RecvTimeoutError::Timeout) => Err(self.error("timed out waiting for the engine")),
            Err(RecvTimeoutError::Disconnected) => Err(self.error("engine closed its output")),
        }
    }

    /// Ask the engine to exit.
    pub fn quit(&mut self) {
        if let Err(e) = self.send("quit") {
            debug!(error = %e, "quit not delivered");
        }
    }

    fn request_move(
        &mut self,
        pos: &Position,
        limits: &SearchLimits,
    ) -> Result<SearchResult, TournamentError> {
        if limits.budget.is_some() && limits.budget != self.move_time {
            let secs = limits.budget.map(|b| b.as_secs_f64()).unwrap_or_default();
            self.send(&format!("setoption name tcmove value {secs}"))?;
            self.move_time = limits.budget;
        }
        self.send(&format!(
            "setposition {} {}",
            pos.side_to_move.to_char(),
            pos.to_short_str()
        ))?;
        self.send("go")?;

        let wait = limits
            .budget
            .map(|b| b + MOVE_GRACE)
            .unwrap_or(UNTIMED_MOVE_TIMEOUT);
        let deadline = Instant::now() + wait;
        let text = loop {
            let line = self.recv_until(deadline)?;
            if let Some(mv) = line.strip_prefix("bestmove") {
                break mv.trim().to_string();
            }
            if let Some(msg) = line.strip_prefix("log ") {
                debug!(engine = %self.name, "{msg}");
            }
        };

        if text.is_empty() {
            return Ok(SearchResult::immobilized());
        }
        let steps = Position::parse_steps(&text)
            .map_err(|e| self.error(format!("unreadable move {text:?}: {e}")))?;
        Ok(SearchResult {
            best_move: Some(steps),
            result: pos.do_move_str(&text, true).ok(),
            ..SearchResult::default()
        })
    }
}

impl<W: Write + Send> Engine for AeiClient<W> {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        if self.broken {
            return SearchResult::immobilized();
        }
        match self.request_move(pos, &limits) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "AEI engine gave no usable move");
                self.broken = true;
                SearchResult::immobilized()
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn new_game(&mut self) {
        if let Err(e) = self.send("newgame") {
            warn!(error = %e, "newgame not delivered");
            self.broken = true;
        }
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        self.send(&format!("setoption name {name} value {value}")).is_ok()
    }
}

/// An AEI engine launched from a command line.
pub struct AeiProcess {
    child: Child,
    client: AeiClient<ChildStdin>,
}

impl AeiProcess {
    /// Spawn `cmdline` (split on whitespace). A relative program path that
    /// names a directory is resolved against `base_dir`; bare program names
    /// are looked up on `PATH`.
    pub fn spawn(cmdline: &str, base_dir: &Path) -> Result<Self, TournamentError> {
        let err = |reason: String| TournamentError::Aei {
            cmdline: cmdline.to_string(),
            reason,
        };
        let mut parts = cmdline.split_whitespace();
        let program = parts.next().ok_or_else(|| err("empty command line".to_string()))?;
        let program_path = Path::new(program);
        let program_path = if program_path.is_relative() && program_path.components().count() > 1 {
            base_dir.join(program_path)
        } else {
            program_path.to_path_buf()
        };

        let mut child = Command::new(&program_path)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| err(format!("failed to start {}: {e}", program_path.display())))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(err("child stdio was not captured".to_string()));
        };
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        match AeiClient::connect(cmdline, stdin, rx) {
            Ok(client) => Ok(Self { child, client }),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(e)
            }
        }
    }
}

impl Engine for AeiProcess {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        self.client.search(pos, limits)
    }

    fn name(&self) -> &str {
        self.client.name()
    }

    fn author(&self) -> &str {
        self.client.author()
    }

    fn new_game(&mut self) {
        self.client.new_game()
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        self.client.set_option(name, value)
    }
}

impl Drop for AeiProcess {
    fn drop(&mut self) {
        self.client.quit();
        let deadline = Instant::now() + QUIT_TIMEOUT;
        while Instant::now() < deadline {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(Duration::from_millis(20)),
                Err(_) => break,
            }
        }
        warn!(engine = %self.client.name, "engine did not exit after quit, killing it");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
#[path = "aei_process_tests.rs"]
mod aei_process_tests;
