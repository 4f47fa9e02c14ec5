//! File-based storage backend for collection logs.

use crate::error::{StorageError, StorageResult};
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A file-based append-only storage backend.
///
/// The backend owns the single write handle of one file. Data survives
/// process restarts.
///
/// # Durability
///
/// - `sync()` calls `File::sync_data()` so appended bytes reach the disk
/// - `truncate()` and `close()` call `File::sync_all()`
///
/// # Thread Safety
///
/// The backend does no locking of its own. All mutating methods take
/// `&mut self`; callers that share a backend wrap it in a lock.
///
/// # Example
///
/// ```no_run
/// use filedb_storage::FileBackend;
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("people.filedb")).unwrap();
/// let offset = backend.append(b"persistent data").unwrap();
/// backend.sync().unwrap();  // Ensure data is durable
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: Option<File>,
    size: u64,
    /// Set when a failed append could not be cut back; the file then holds
    /// bytes past `size` that the next write or close removes.
    needs_trim: bool,
}

impl FileBackend {
    /// Opens or creates a file backend at the given path.
    ///
    /// If the file exists it is opened for appending without truncation.
    /// If it doesn't exist, a new empty file is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let size = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            size,
            needs_trim: false,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current size of the file in bytes.
    ///
    /// This is the offset where the next `append` will write.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns whether the file handle has been released.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    fn file_mut(&mut self) -> StorageResult<&mut File> {
        self.file.as_mut().ok_or(StorageError::Closed)
    }

    /// Appends data to the end of the file.
    ///
    /// Returns the offset where the data was written. The data is written
    /// with a single `write_all`; if that fails, the file is cut back to its
    /// previous size so no partial write stays behind. If the cut fails
    /// too, it is retried before the next append.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is closed, an earlier partial write
    /// still cannot be removed, or an I/O error occurs.
    pub fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        let offset = self.size;
        if data.is_empty() {
            return Ok(offset);
        }

        self.trim_partial_write()?;

        let file = self.file_mut()?;
        let written = file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| file.write_all(data));

        if let Err(err) = written {
            // The write error is what the caller needs; a failed cut is
            // remembered and retried.
            if file.set_len(offset).is_err() {
                self.needs_trim = true;
            }
            return Err(err.into());
        }

        self.size += data.len() as u64;
        Ok(offset)
    }

    fn trim_partial_write(&mut self) -> StorageResult<()> {
        if self.needs_trim {
            let size = self.size;
            self.file_mut()?.set_len(size)?;
            self.needs_trim = false;
        }
        Ok(())
    }

    /// Syncs appended data to durable storage.
    ///
    /// After this returns successfully, all previously appended data
    /// survives process termination.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is closed or the sync fails.
    pub fn sync(&mut self) -> StorageResult<()> {
        let file = self.file_mut()?;
        file.flush()?;
        file.sync_data()?;
        Ok(())
    }

    /// Truncates the file to the given size and syncs it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The backend is closed
    /// - `new_size` is greater than the current size
    /// - The truncation fails
    pub fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        if new_size > self.size {
            return Err(StorageError::InvalidTruncate {
                requested: new_size,
                size: self.size,
            });
        }

        let file = self.file_mut()?;
        file.set_len(new_size)?;
        file.sync_all()?;
        self.size = new_size;
        self.needs_trim = false;

        Ok(())
    }

    /// Syncs and releases the file handle.
    ///
    /// Closing an already closed backend is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if a leftover partial write cannot be removed or
    /// the final sync fails. The handle is released either way.
    pub fn close(&mut self) -> StorageResult<()> {
        let trimmed = self.trim_partial_write();
        match self.file.take() {
            Some(file) => {
                file.sync_all()?;
                trimmed
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_create_new() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size(), 0);
        assert!(path.exists());
    }

    #[test]
    fn file_append_returns_offsets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();

        let offset1 = backend.append(b"hello").unwrap();
        assert_eq!(offset1, 0);

        let offset2 = backend.append(b" world").unwrap();
        assert_eq!(offset2, 5);

        assert_eq!(backend.size(), 11);
        backend.sync().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.append(b"persistent data").unwrap();
            backend.sync().unwrap();
        }

        let mut backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size(), 15);

        // Reopening appends after the existing bytes.
        assert_eq!(backend.append(b"!").unwrap(), 15);
    }

    #[test]
    fn file_empty_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"x").unwrap();

        let offset = backend.append(b"").unwrap();
        assert_eq!(offset, 1);
        assert_eq!(backend.size(), 1);
    }

    #[test]
    fn file_truncate_to_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"some records").unwrap();
        backend.truncate(0).unwrap();

        assert_eq!(backend.size(), 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);

        assert_eq!(backend.append(b"again").unwrap(), 0);
        backend.sync().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"again");
    }

    #[test]
    fn file_truncate_cannot_grow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"abc").unwrap();

        let result = backend.truncate(10);
        assert!(matches!(
            result,
            Err(StorageError::InvalidTruncate {
                requested: 10,
                size: 3
            })
        ));
    }

    #[test]
    fn file_close_releases_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"data").unwrap();
        backend.close().unwrap();

        assert!(backend.is_closed());
        assert!(matches!(backend.append(b"more"), Err(StorageError::Closed)));
        assert!(matches!(backend.sync(), Err(StorageError::Closed)));

        // Second close is harmless.
        assert!(backend.close().is_ok());
        assert_eq!(fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn file_partial_write_is_trimmed_before_next_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"abc").unwrap();

        // Leftover bytes from a write whose rollback failed.
        OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"junk-junk")
            .unwrap();
        backend.needs_trim = true;

        assert_eq!(backend.append(b"de").unwrap(), 3);
        assert_eq!(backend.size(), 5);
        assert_eq!(fs::read(&path).unwrap(), b"abcde");
    }

    #[test]
    fn file_partial_write_is_trimmed_on_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"abc").unwrap();
        OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"junk")
            .unwrap();
        backend.needs_trim = true;

        backend.close().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"abc");
    }

    #[test]
    fn file_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.path(), path);
    }
}
