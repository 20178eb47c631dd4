//! Guard-specific error types.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors that can occur while building a protected buffer.
#[derive(Debug)]
pub enum GuardError {
    /// The OS refused to map a fresh read-write region.
    MapFailed {
        /// Size of the mapping that was requested, in bytes.
        bytes: usize,
        /// The OS error.
        source: io::Error,
    },
    /// The OS refused to downgrade a mapping to read-only.
    ProtectFailed {
        /// Size of the mapping, in bytes.
        bytes: usize,
        /// The OS error.
        source: io::Error,
    },
    /// A 2-D buffer was requested with no rows.
    EmptyMatrix,
    /// A 2-D buffer was requested with rows of different lengths.
    RaggedRows {
        /// Index of the first row whose length differs from row 0.
        row: usize,
        /// Length of row 0.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
}

impl GuardError {
    /// Whether this error means the host cannot provide protected memory at
    /// all, as opposed to the caller passing bad input.
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::MapFailed { .. } | Self::ProtectFailed { .. })
    }
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MapFailed { bytes, source } => {
                write!(f, "failed to map {bytes} bytes of read-write memory: {source}")
            }
            Self::ProtectFailed { bytes, source } => {
                write!(f, "failed to make {bytes} bytes read-only: {source}")
            }
            Self::EmptyMatrix => write!(f, "2-D buffer needs at least one row"),
            Self::RaggedRows {
                row,
                expected,
                found,
            } => {
                write!(
                    f,
                    "ragged 2-D input: row {row} has {found} elements, row 0 has {expected}"
                )
            }
        }
    }
}

impl Error for GuardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MapFailed { source, .. } | Self::ProtectFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_classification() {
        let map = GuardError::MapFailed {
            bytes: 4096,
            source: io::Error::from(io::ErrorKind::OutOfMemory),
        };
        assert!(map.is_environment());
        assert!(map.source().is_some());
        assert!(!GuardError::EmptyMatrix.is_environment());
    }

    #[test]
    fn ragged_message_names_the_row() {
        let err = GuardError::RaggedRows {
            row: 2,
            expected: 3,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "ragged 2-D input: row 2 has 1 elements, row 0 has 3"
        );
    }
}
