//! Error types for snapshot persistence

use std::fmt;

/// Result type alias for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur while reading or replacing the snapshot
#[derive(Debug)]
pub enum SnapshotError {
    /// No snapshot has been written yet
    NotFound(String),

    /// The stored document is not a valid snapshot
    Malformed(String),

    /// The snapshot could not be serialized
    SerializationError(String),

    /// The configured location cannot hold a snapshot file
    InvalidLocation(String),

    /// I/O error (file access, rename, etc.)
    IoError(std::io::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::NotFound(location) => write!(f, "no snapshot at {}", location),
            SnapshotError::Malformed(msg) => write!(f, "malformed snapshot: {}", msg),
            SnapshotError::SerializationError(msg) => {
                write!(f, "snapshot serialization error: {}", msg)
            }
            SnapshotError::InvalidLocation(msg) => {
                write!(f, "invalid snapshot location: {}", msg)
            }
            SnapshotError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::IoError(err)
    }
}
