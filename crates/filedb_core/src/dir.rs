//! Database directory management.
//!
//! This module handles the file system layout for FileDB:
//!
//! ```text
//! <db_path>/
//! ├─ comments.filedb   # One record log per collection
//! ├─ events.filedb
//! └─ people.filedb
//! ```
//!
//! Files without the `.filedb` extension are never treated as collections.

use crate::error::{CoreError, CoreResult};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// File extension of collection files, without the leading dot.
pub const COLLECTION_EXTENSION: &str = "filedb";

/// Resolves paths inside a database root directory.
///
/// The directory must already exist; FileDB never creates its root.
///
/// # Example
///
/// ```rust,ignore
/// use filedb_core::dir::DatabaseDir;
/// use std::path::Path;
///
/// let dir = DatabaseDir::open(Path::new("my_db"))?;
/// println!("people lives at {:?}", dir.collection_path("people"));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseDir {
    /// Root directory path.
    path: PathBuf,
}

impl DatabaseDir {
    /// Opens an existing database directory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseNotFound` if the path does not exist or is not a
    /// directory (a regular file at that path is rejected).
    pub fn open(path: &Path) -> CoreResult<Self> {
        // Follows symlinks, so a link to a directory is accepted.
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Self {
                path: path.to_path_buf(),
            }),
            _ => Err(CoreError::database_not_found(path)),
        }
    }

    /// Returns the path to the database directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of the file backing collection `name`.
    #[must_use]
    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.{COLLECTION_EXTENSION}"))
    }

    /// Lists collection names found on disk, sorted ascending.
    ///
    /// Every regular file named `<name>.filedb` contributes `<name>`.
    pub fn collection_names(&self) -> CoreResult<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = collection_name_of(file_name) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Returns whether a file for collection `name` exists on disk.
    #[must_use]
    pub fn has_collection(&self, name: &str) -> bool {
        self.collection_path(name).is_file()
    }

    /// Syncs the database directory so newly created files survive a crash.
    #[cfg(unix)]
    pub fn sync_directory(&self) -> CoreResult<()> {
        let dir = File::open(&self.path)?;
        dir.sync_all()?;
        Ok(())
    }

    /// Windows NTFS journals metadata; directory fsync is not supported there.
    #[cfg(not(unix))]
    pub fn sync_directory(&self) -> CoreResult<()> {
        Ok(())
    }
}

/// Validates a collection name.
///
/// Names map directly onto file names, so they must be non-empty, must not
/// be `.` or `..`, and must not contain path separators or NUL bytes.
pub fn validate_collection_name(name: &str) -> CoreResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if bad {
        Err(CoreError::invalid_collection_name(name))
    } else {
        Ok(())
    }
}

/// Strips the collection extension from a file name.
fn collection_name_of(file_name: &str) -> Option<&str> {
    let name = file_name.strip_suffix(COLLECTION_EXTENSION)?.strip_suffix('.')?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
