//! One AEI conversation: handshake, then commands until `quit`.

use std::time::{Duration, Instant};

use arimaa_core::{ClockSettings, Color, Engine, Position, SearchLimits};
use tracing::{debug, info};

use crate::controller::Controller;
use crate::AeiError;

/// How long to wait for the `aei` header.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Safety margin kept back from every move budget.
pub const AEI_SAFETY_MARGIN: Duration = Duration::from_millis(30);

/// Options every AEI controller may send; accepted without a warning.
const STANDARD_OPTIONS: [&str; 15] = [
    "tcmove",
    "tcreserve",
    "tcpercent",
    "tcmax",
    "tctotal",
    "tcturns",
    "tcturntime",
    "greserve",
    "sreserve",
    "gused",
    "sused",
    "lastmoveused",
    "moveused",
    "opponent",
    "opponent_rating",
];

pub struct AeiSession<C, E> {
    controller: C,
    engine: E,
    position: Position,
    in_setup: bool,
    strict_checks: bool,
    move_delay: Option<Duration>,
    clock: ClockSettings,
    safety_margin: Duration,
    total_move_time: Duration,
}

impl<C: Controller, E: Engine> AeiSession<C, E> {
    /// Wait for the `aei` header and answer it.
    pub fn start(controller: C, engine: E) -> Result<Self, AeiError> {
        Self::start_with_timeout(controller, engine, HANDSHAKE_TIMEOUT)
    }

    pub fn start_with_timeout(
        mut controller: C,
        engine: E,
        timeout: Duration,
    ) -> Result<Self, AeiError> {
        let header = controller
            .recv(Some(timeout))?
            .ok_or(AeiError::HandshakeTimeout)?;
        if header != "aei" {
            return Err(AeiError::BadHeader(header));
        }
        controller.send("protocol-version 1")?;
        controller.send(&format!("id name {}", engine.name()))?;
        controller.send(&format!("id author {}", engine.author()))?;
        controller.send("aeiok")?;

        let mut session = Self {
            controller,
            engine,
            position: Position::empty(Color::Gold, 4),
            in_setup: true,
            strict_checks: true,
            move_delay: None,
            clock: ClockSettings::default(),
            safety_margin: AEI_SAFETY_MARGIN,
            total_move_time: Duration::ZERO,
        };
        session.new_game();
        Ok(session)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn clock(&self) -> &ClockSettings {
        &self.clock
    }

    pub fn into_parts(self) -> (C, E) {
        (self.controller, self.engine)
    }

    /// Handle commands until `quit`, an illegal move, or the controller
    /// going away.
    pub fn run(&mut self) -> Result<(), AeiError> {
        loop {
            let msg = match self.controller.recv(None) {
                Ok(Some(msg)) => msg,
                Ok(None) => continue,
                Err(AeiError::Disconnected) => {
                    info!("controller disconnected");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            let (command, rest) = match msg.split_once(char::is_whitespace) {
                Some((c, r)) => (c, r.trim()),
                None => (msg.as_str(), ""),
            };

            match command {
                "isready" => self.controller.send("readyok")?,
                "newgame" => self.new_game(),
                "setposition" => self.set_position(rest)?,
                "setoption" => self.set_option_line(rest)?,
                "makemove" => {
                    if !self.make_move(rest)? {
                        return Ok(());
                    }
                }
                // `go ponder` and friends are not supported
                "go" if rest.is_empty() => self.go()?,
                "go" | "stop" => {}
                "quit" => {
                    self.log("Debug: Exiting after receiving quit message.")?;
                    if self.total_move_time > Duration::ZERO {
                        let secs = self.total_move_time.as_secs_f64();
                        self.info(&format!("move gen time {secs}"))?;
                    }
                    return Ok(());
                }
                "" => {}
                other => debug!(command = other, "ignoring unknown AEI command"),
            }
        }
    }

    fn new_game(&mut self) {
        self.position = Position::empty(Color::Gold, 4);
        self.in_setup = true;
        // tcmove/tcturntime arrive before newgame and must survive it
        self.clock.reset_reserves();
        self.engine.new_game();
    }

    fn set_position(&mut self, args: &str) -> Result<(), AeiError> {
        let (side, board) = args
            .split_once(char::is_whitespace)
            .ok_or_else(|| AeiError::BadCommand(format!("setposition {args}")))?;
        let side = side
            .chars()
            .next()
            .and_then(Color::from_side_char)
            .ok_or_else(|| AeiError::BadCommand(format!("setposition {args}")))?;
        self.position = Position::parse_short(side, 4, board)?;
        self.in_setup = false;
        Ok(())
    }

    fn set_option_line(&mut self, args: &str) -> Result<(), AeiError> {
        let Some(rest) = args.strip_prefix("name") else {
            return self.log(&format!("Warning: malformed setoption, {args}"));
        };
        let rest = rest.trim();
        let (name, value) = match rest.split_once(char::is_whitespace) {
            Some((name, tail)) => {
                let tail = tail.trim();
                let value = tail.strip_prefix("value").map(str::trim);
                (name, value)
            }
            None => (rest, None),
        };
        self.set_option(name, value)
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), AeiError> {
        let seconds = || value.and_then(|v| v.trim().parse::<f64>().ok());
        match name {
            "checkmoves" => {
                let v = value.unwrap_or("").trim().to_ascii_lowercase();
                self.strict_checks = !matches!(v.as_str(), "false" | "no" | "0");
            }
            "delaymove" => match seconds() {
                Some(s) if s > 0.0 => self.move_delay = Some(Duration::from_secs_f64(s)),
                Some(_) => self.move_delay = None,
                None => return self.bad_option_value(name, value),
            },
            "tcmove" | "tcturntime" | "greserve" | "sreserve" if value.is_some() => {
                let Some(s) = seconds() else {
                    return self.bad_option_value(name, value);
                };
                match name {
                    "tcmove" => self.clock.move_time = Some(s),
                    "tcturntime" => self.clock.set_turn_time(s),
                    "greserve" => self.clock.reserve[Color::Gold.idx()] = s,
                    _ => self.clock.reserve[Color::Silver.idx()] = s,
                }
            }
            _ if STANDARD_OPTIONS.contains(&name) => {}
            _ => {
                if !self.engine.set_option(name, value.unwrap_or("")) {
                    self.log(&format!("Warning: Received unrecognized option, {name}"))?;
                }
            }
        }
        Ok(())
    }

    fn bad_option_value(&mut self, name: &str, value: Option<&str>) -> Result<(), AeiError> {
        self.log(&format!(
            "Warning: Bad value for option {name}, {}",
            value.unwrap_or("")
        ))
    }

    /// Returns false when the move was illegal and the session must end.
    fn make_move(&mut self, move_str: &str) -> Result<bool, AeiError> {
        match self.position.do_move_str(move_str, self.strict_checks) {
            Ok(next) => {
                self.position = next;
                if self.in_setup && self.position.side_to_move == Color::Gold {
                    self.in_setup = false;
                }
                Ok(true)
            }
            Err(e) => {
                self.log(&format!("Error: received illegal move {move_str} ({e})"))?;
                Ok(false)
            }
        }
    }

    fn go(&mut self) -> Result<(), AeiError> {
        let started = Instant::now();
        let side = self.position.side_to_move;

        let move_str = if self.in_setup {
            Position::basic_setup().placing_move(side)
        } else {
            let budget = self.clock.budget(side);
            let limits = SearchLimits::from_budget(budget, self.safety_margin);
            debug!(?budget, side = %side, "searching");
            let result = self.engine.search(&self.position, limits);
            match result.best_move {
                Some(steps) => self.position.steps_to_str(&steps)?,
                None => {
                    self.log("Warning: move requested when immobilized.")?;
                    String::new()
                }
            }
        };

        if let Some(delay) = self.move_delay {
            std::thread::sleep(delay);
        }
        let move_time = started.elapsed();
        self.total_move_time += move_time;
        self.info(&format!("time {:.0}", move_time.as_secs_f64().round()))?;
        self.controller.send(&format!("bestmove {move_str}"))
    }

    fn info(&mut self, msg: &str) -> Result<(), AeiError> {
        self.controller.send(&format!("info {msg}"))
    }

    fn log(&mut self, msg: &str) -> Result<(), AeiError> {
        self.controller.send(&format!("log {msg}"))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
