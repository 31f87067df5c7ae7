//! Time control and search limits for Arimaa engines.
//!
//! A move budget becomes an absolute deadline on the monotonic clock, minus a
//! small safety margin so that protocol overhead does not cost a time forfeit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::types::Color;

/// Safety margin subtracted from every budget unless configured otherwise.
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_millis(20);

/// Search limits handed to an engine for one move.
///
/// Without a budget there is no deadline; engines are expected to answer
/// quickly with any legal move in that case.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Time allowed for this move (None = no clock)
    pub budget: Option<Duration>,
    pub time_control: TimeControl,
}

impl SearchLimits {
    pub fn none() -> Self {
        Self {
            budget: None,
            time_control: TimeControl::new(None),
        }
    }

    pub fn time(budget: Duration) -> Self {
        Self::time_with_margin(budget, DEFAULT_SAFETY_MARGIN)
    }

    pub fn time_with_margin(budget: Duration, safety_margin: Duration) -> Self {
        Self {
            budget: Some(budget),
            time_control: TimeControl::with_safety_margin(Some(budget), safety_margin),
        }
    }

    /// `Some(budget)` or no clock at all.
    pub fn from_budget(budget: Option<Duration>, safety_margin: Duration) -> Self {
        match budget {
            Some(b) => Self::time_with_margin(b, safety_margin),
            None => Self::none(),
        }
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.check_time()
    }

    /// Start the clock. Call this when search begins.
    pub fn start(&self) {
        self.time_control.start();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.time_control.deadline()
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::none()
    }
}

/// Thread-safe per-move clock.
///
/// Cheap to clone; clones share the stop flag and the deadline, so a
/// controller thread can stop a search running elsewhere.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
    start_time: Arc<RwLock<Option<Instant>>>,
    deadline: Arc<RwLock<Option<Instant>>>,
    budget: Option<Duration>,
    safety_margin: Duration,
}

impl TimeControl {
    pub fn new(budget: Option<Duration>) -> Self {
        Self::with_safety_margin(budget, DEFAULT_SAFETY_MARGIN)
    }

    pub fn with_safety_margin(budget: Option<Duration>, safety_margin: Duration) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(RwLock::new(None)),
            deadline: Arc::new(RwLock::new(None)),
            budget,
            safety_margin,
        }
    }

    /// Start the clock and fix the deadline at `now + budget - margin`.
    pub fn start(&self) {
        let now = Instant::now();
        *self.start_time.write().unwrap_or_else(PoisonError::into_inner) = Some(now);
        *self.deadline.write().unwrap_or_else(PoisonError::into_inner) = self
            .budget
            .map(|b| now + b.saturating_sub(self.safety_margin));
        self.stopped.store(false, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn deadline(&self) -> Option<Instant> {
        *self.deadline.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn time_left(&self) -> Option<Duration> {
        self.deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn out_of_time(&self) -> bool {
        self.deadline().is_some_and(|d| Instant::now() >= d)
    }

    /// Check the clock and raise the stop flag once the deadline has passed.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if self.out_of_time() {
            self.stop();
            return true;
        }
        false
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

/// AEI time-control options relevant to budgeting a single move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClockSettings {
    /// `tcmove`: seconds added per move
    pub move_time: Option<f64>,
    /// `tcturntime`: hard per-turn cap, None when unset or non-positive
    pub turn_time: Option<f64>,
    /// `greserve` / `sreserve`, indexed by `Color::idx()`
    pub reserve: [f64; 2],
}

impl ClockSettings {
    const RESERVE_FRACTION: f64 = 0.10;
    const RESERVE_CAP: f64 = 0.50;
    const LOW_RESERVE: f64 = 0.15;
    const LOW_RESERVE_CAP: f64 = 0.05;

    pub fn set_turn_time(&mut self, secs: f64) {
        self.turn_time = (secs > 0.0).then_some(secs);
    }

    pub fn reset_reserves(&mut self) {
        self.reserve = [0.0; 2];
    }

    /// Seconds to spend on the next move of `side`: the per-move increment
    /// plus a slice of the reserve, capped by the turn time.
    pub fn budget_secs(&self, side: Color) -> Option<f64> {
        let increment = self.move_time?;
        let reserve = self.reserve[side.idx()];

        let mut extra = (reserve * Self::RESERVE_FRACTION).min(Self::RESERVE_CAP);
        if reserve < Self::LOW_RESERVE {
            extra = extra.min(Self::LOW_RESERVE_CAP);
        }

        let mut budget = increment + extra;
        if let Some(cap) = self.turn_time {
            budget = budget.min(cap);
        }
        Some(budget.max(0.0))
    }

    pub fn budget(&self, side: Color) -> Option<Duration> {
        self.budget_secs(side).map(Duration::from_secs_f64)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
