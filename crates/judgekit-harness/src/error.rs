//! Harness error types.

use std::error::Error;
use std::fmt;
use std::io;
use std::time::Duration;

/// Errors returned by the non-panicking harness entry points.
#[derive(Debug)]
pub enum HarnessError {
    /// The body did not finish within its time budget.
    TimedOut {
        /// The budget that was exceeded.
        timeout: Duration,
    },
    /// Reading or writing a run file failed.
    Io(io::Error),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut { timeout } => {
                write!(f, "timed out (> {} milliseconds).", timeout.as_millis())
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl Error for HarnessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
