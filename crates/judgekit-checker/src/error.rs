//! Checker error types.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit status for checker I/O failures.
pub const EXIT_IO_FAILURE: u8 = 3;

/// Failures that stop the checker before it can reach a verdict.
#[derive(Debug)]
pub enum CheckerError {
    /// An input, output or answer file could not be read.
    Read {
        /// The file that failed.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
    /// The report could not be written.
    Write {
        /// Report destination, or `-` for standard output.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
}

impl CheckerError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        EXIT_IO_FAILURE
    }
}

impl fmt::Display for CheckerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "cannot write report to {}: {source}", path.display())
            }
        }
    }
}

impl Error for CheckerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}
