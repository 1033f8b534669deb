//! Store error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Disk I/O failure while reading or writing the snapshot
    #[error("Store I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot could not be encoded or decoded
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot checksum did not match its contents
    #[error(
        "Snapshot corrupted at {}: expected checksum {expected:08x}, found {actual:08x}",
        .path.display()
    )]
    Corrupted {
        path: PathBuf,
        expected: u32,
        actual: u32,
    },

    /// Snapshot was written by an incompatible format version
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    /// A thread panicked while holding the table lock
    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "POSTD_STORE_IO_ERROR",
            StoreError::Serialization(_) => "POSTD_STORE_SERIALIZATION",
            StoreError::Corrupted { .. } => "POSTD_DATA_CORRUPTION",
            StoreError::UnsupportedVersion(_) => "POSTD_STORE_VERSION",
            StoreError::Poisoned => "POSTD_STORE_POISONED",
        }
    }
}
