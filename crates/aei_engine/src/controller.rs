//! The line-based channel between an AEI controller and the engine.

use std::io::Write;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::AeiError;

/// Where protocol lines come from and go to.
pub trait Controller {
    /// Next line from the controller, waiting at most `timeout` if given.
    /// `Ok(None)` means the timeout expired.
    fn recv(&mut self, timeout: Option<Duration>) -> Result<Option<String>, AeiError>;

    fn send(&mut self, line: &str) -> Result<(), AeiError>;
}

/// Controller fed by a channel of incoming lines and writing to any writer.
///
/// The binary feeds the channel from a stdin reader thread and writes to
/// stdout; tests push commands up front and collect the output in a `Vec`.
pub struct ChannelController<W: Write> {
    incoming: Receiver<String>,
    out: W,
}

impl<W: Write> ChannelController<W> {
    pub fn new(incoming: Receiver<String>, out: W) -> Self {
        Self { incoming, out }
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> Controller for ChannelController<W> {
    fn recv(&mut self, timeout: Option<Duration>) -> Result<Option<String>, AeiError> {
        let line = match timeout {
            Some(t) => match self.incoming.recv_timeout(t) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(AeiError::Disconnected),
            },
            None => self.incoming.recv().map_err(|_| AeiError::Disconnected)?,
        };
        Ok(Some(line.trim().to_string()))
    }

    fn send(&mut self, line: &str) -> Result<(), AeiError> {
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}
