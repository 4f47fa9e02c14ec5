//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend's file handle has been released.
    #[error("storage is closed")]
    Closed,

    /// Attempted to grow the file through `truncate`.
    #[error("cannot truncate to size {requested} which is greater than current size {size}")]
    InvalidTruncate {
        /// The requested new size.
        requested: u64,
        /// The current storage size.
        size: u64,
    },
}
