//! Bounded, independent file readers.

use crate::error::StorageResult;
use std::fs::File;
use std::io::{self, BufReader, Read, Take};
use std::path::Path;

/// A buffered reader over the first `limit` bytes of a file.
///
/// Each reader opens its own file handle, so reading never disturbs a
/// concurrent writer's position. Bytes appended after `limit` are never
/// returned, which gives callers a point-in-time view of an append-only
/// file. If the file is truncated while the reader is live, the reader
/// simply reaches end-of-file early.
#[derive(Debug)]
pub struct FileReader {
    inner: Take<BufReader<File>>,
}

impl FileReader {
    /// Opens `path` for reading, bounded to `limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path, limit: u64, buffer_size: usize) -> StorageResult<Self> {
        let file = File::open(path)?;
        let inner = BufReader::with_capacity(buffer_size.max(1), file).take(limit);
        Ok(Self { inner })
    }
}

impl Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileBackend;
    use tempfile::tempdir;

    #[test]
    fn reader_stops_at_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"hello world").unwrap();
        backend.sync().unwrap();

        let mut reader = FileReader::open(&path, 5, 16).unwrap();
        let mut data = Vec::new();
        reader.read_to_end(&mut data).unwrap();

        assert_eq!(&data, b"hello");
    }

    #[test]
    fn reader_ignores_later_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"first").unwrap();
        backend.sync().unwrap();

        let mut reader = FileReader::open(&path, backend.size(), 2).unwrap();
        backend.append(b"second").unwrap();
        backend.sync().unwrap();

        let mut data = Vec::new();
        reader.read_to_end(&mut data).unwrap();
        assert_eq!(&data, b"first");
    }

    #[test]
    fn reader_sees_truncation_as_early_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.filedb");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(b"0123456789").unwrap();
        backend.sync().unwrap();

        // A tiny buffer so nothing is prefetched before the truncate.
        let mut reader = FileReader::open(&path, 10, 1).unwrap();
        let mut first = [0u8; 2];
        reader.read_exact(&mut first).unwrap();

        backend.truncate(0).unwrap();

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert!(rest.is_empty());
    }

    #[test]
    fn reader_missing_file_fails() {
        let dir = tempdir().unwrap();
        let result = FileReader::open(&dir.path().join("missing.filedb"), 0, 16);
        assert!(result.is_err());
    }
}
