//! AEI (Arimaa Engine Interface) server.
//!
//! Wraps any [`arimaa_core::Engine`] in the AEI protocol: handshake, game
//! setup, time-control options and `go`/`bestmove`.

mod controller;
mod session;

use arimaa_core::{MoveError, PositionError};
use thiserror::Error;

pub use controller::{ChannelController, Controller};
pub use session::{AeiSession, AEI_SAFETY_MARGIN, HANDSHAKE_TIMEOUT};

#[derive(Debug, Error)]
pub enum AeiError {
    #[error("timed out waiting for aei header")]
    HandshakeTimeout,
    #[error("did not receive aei header, instead ({0})")]
    BadHeader(String),
    #[error("controller disconnected")]
    Disconnected,
    #[error("malformed command: {0}")]
    BadCommand(String),
    #[error("bad position: {0}")]
    Position(#[from] PositionError),
    #[error("engine produced an unprintable move: {0}")]
    Move(#[from] MoveError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
