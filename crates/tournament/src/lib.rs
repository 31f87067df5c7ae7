//! Tournament runner for Arimaa engines
//!
//! This crate provides infrastructure for:
//! - Running matches between builtin engines and AEI subprocesses
//! - Round-robin tournaments described by TOML presets
//! - Tracking Elo ratings across runs
//!
//! # Usage
//!
//! ```bash
//! # Run the tournament described by a preset
//! cargo run -p tournament -- run configs/tournaments/smoke.toml
//!
//! # Quick match between two engines
//! cargo run -p tournament -- match heuristic random --games 10 --move-time 0.5
//! ```

mod aei_process;
mod elo;
mod engines;
mod error;
mod match_runner;
mod preset;
mod results;
mod round_robin;

pub use aei_process::*;
pub use elo::*;
pub use engines::*;
pub use error::TournamentError;
pub use match_runner::*;
pub use preset::*;
pub use results::*;
pub use round_robin::*;
