//! Error types for FileDB core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in FileDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The dial target does not exist or is not a directory.
    #[error("database not found: {}", .path.display())]
    DatabaseNotFound {
        /// The path that was dialed.
        path: PathBuf,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] filedb_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A collection file holds a truncated or malformed frame.
    #[error("framing corruption at offset {offset}: {message}")]
    FramingCorruption {
        /// Byte offset of the frame that failed to decode.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Structured value could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Collection name cannot be mapped to a file in the root directory.
    #[error("invalid collection name: {name:?}")]
    InvalidCollectionName {
        /// The rejected name.
        name: String,
    },

    /// Database is closed.
    #[error("database is closed")]
    DatabaseClosed,

    /// Collection handle was released by its database.
    #[error("collection is closed: {name}")]
    CollectionClosed {
        /// Name of the collection.
        name: String,
    },
}

impl CoreError {
    /// Creates a database not found error.
    pub fn database_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DatabaseNotFound { path: path.into() }
    }

    /// Creates a framing corruption error.
    pub fn framing_corruption(offset: u64, message: impl Into<String>) -> Self {
        Self::FramingCorruption {
            offset,
            message: message.into(),
        }
    }

    /// Creates an invalid collection name error.
    pub fn invalid_collection_name(name: impl Into<String>) -> Self {
        Self::InvalidCollectionName { name: name.into() }
    }

    /// Creates a collection closed error.
    pub fn collection_closed(name: impl Into<String>) -> Self {
        Self::CollectionClosed { name: name.into() }
    }

    /// Returns whether this error reports on-disk corruption.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::FramingCorruption { .. })
    }
}
