//! Collection handle: one record log file per collection.

use crate::collection::scan::Records;
use crate::config::Config;
use crate::database::{Database, DatabaseInner};
use crate::error::{CoreError, CoreResult};
use crate::record;
use filedb_storage::{FileBackend, FileReader};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Weak;
use tracing::{debug, trace, warn};

/// A named, append-only sequence of byte records backed by one file.
///
/// Collections are created and cached by [`Database::collection`]; every
/// lookup of the same name on one database returns the same
/// `Arc<Collection>`, which is the only writer of its file.
///
/// # Concurrency
///
/// - `insert`, `insert_json` and `drop_records` serialize on the
///   collection's write guard, so writes have a total order
/// - Scans (`for_each`, `records`, ...) never take the write guard. A scan
///   reads through its own file handle, bounded to the bytes committed when
///   it started, so it sees every insert that returned before it began and
///   nothing appended later
/// - A scan that overlaps a `drop_records` ends early without error; it
///   never yields bytes written after the drop
///
/// # Example
///
/// ```rust,ignore
/// let people = db.collection("people")?;
/// people.insert_json(&serde_json::json!({"name": "Mat"}))?;
///
/// people.for_each(|doc| {
///     println!("{}", String::from_utf8_lossy(doc));
///     false // keep going
/// })?;
/// ```
pub struct Collection {
    name: String,
    path: PathBuf,
    /// Back-reference to the owning database.
    db: Weak<DatabaseInner>,
    config: Config,
    /// Write handle; the mutex is the collection's exclusive write guard.
    writer: Mutex<FileBackend>,
    /// Bytes of complete frames whose insert has returned.
    committed: AtomicU64,
    /// Bumped by every drop, before the file is cut.
    epoch: AtomicU64,
}

impl Collection {
    /// Opens (creating if absent) the file backing a collection.
    pub(crate) fn open(
        name: &str,
        path: PathBuf,
        db: Weak<DatabaseInner>,
        config: Config,
    ) -> CoreResult<Self> {
        let backend = FileBackend::open(&path)?;
        let committed = backend.size();

        debug!(collection = name, path = %path.display(), size = committed, "opened collection");

        Ok(Self {
            name: name.to_string(),
            path,
            db,
            config,
            writer: Mutex::new(backend),
            committed: AtomicU64::new(committed),
            epoch: AtomicU64::new(0),
        })
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path of the backing file, `<root>/<name>.filedb`.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the database that created this collection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseClosed` if every handle to the database was dropped.
    pub fn database(&self) -> CoreResult<Database> {
        self.db
            .upgrade()
            .map(Database::from_inner)
            .ok_or(CoreError::DatabaseClosed)
    }

    /// Returns the number of committed bytes in the backing file.
    #[must_use]
    pub fn len_bytes(&self) -> u64 {
        self.committed.load(Ordering::SeqCst)
    }

    /// Returns whether the write handle has been released.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_closed()
    }

    /// Appends one record.
    ///
    /// The frame is written in one piece while holding the write guard and,
    /// with `sync_on_insert` (the default), synced to disk before this
    /// returns. If the write or sync fails the file is cut back to its
    /// previous length.
    ///
    /// # Errors
    ///
    /// Returns `CollectionClosed` after the database was closed, or a
    /// storage error if the file cannot be written.
    pub fn insert(&self, payload: &[u8]) -> CoreResult<()> {
        let frame = record::encode(payload);

        let mut writer = self.writer.lock();
        if writer.is_closed() {
            return Err(CoreError::collection_closed(&self.name));
        }

        // Bytes past the committed end belong to a rejected insert whose
        // rollback failed; cut them before they can become visible.
        let committed = self.committed.load(Ordering::SeqCst);
        if writer.size() > committed {
            debug!(collection = %self.name, size = writer.size(), committed, "trimming rejected bytes");
            writer.truncate(committed)?;
        }

        let offset = writer.append(&frame)?;
        if self.config.sync_on_insert {
            if let Err(err) = writer.sync() {
                if let Err(rollback) = writer.truncate(offset) {
                    warn!(
                        collection = %self.name,
                        offset,
                        error = %rollback,
                        "failed to roll back unsynced record"
                    );
                }
                return Err(err.into());
            }
        }

        self.committed.store(writer.size(), Ordering::SeqCst);
        trace!(collection = %self.name, offset, len = payload.len(), "inserted record");
        Ok(())
    }

    /// Serializes `value` as JSON and appends it.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` without touching the file if `value` cannot
    /// be encoded, otherwise the errors of [`Collection::insert`].
    pub fn insert_json<T: Serialize + ?Sized>(&self, value: &T) -> CoreResult<()> {
        let payload = serde_json::to_vec(value)?;
        self.insert(&payload)
    }

    /// Starts a scan over all records in insertion order.
    ///
    /// Each call starts again at the first record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be opened for reading.
    pub fn records(&self) -> CoreResult<Records<'_>> {
        // Epoch before length: a drop resets the length before bumping.
        let epoch = self.epoch.load(Ordering::SeqCst);
        let limit = self.committed.load(Ordering::SeqCst);

        let reader = FileReader::open(&self.path, limit, self.config.read_buffer_size)?;
        Ok(Records::new(self, reader, epoch))
    }

    /// Calls `visit` with every record in insertion order.
    ///
    /// The scan stops early, without error, as soon as `visit` returns
    /// `true`. Records decoded before a corrupted frame are still passed to
    /// `visit` before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `FramingCorruption` if the file holds a malformed frame, or
    /// an I/O error if reading fails.
    pub fn for_each<F>(&self, mut visit: F) -> CoreResult<()>
    where
        F: FnMut(&[u8]) -> bool,
    {
        for payload in self.records()? {
            if visit(&payload?) {
                break;
            }
        }
        Ok(())
    }

    /// Like [`Collection::for_each`], decoding each record as JSON.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` at the first record that does not decode
    /// into `T`, plus the errors of [`Collection::for_each`].
    pub fn for_each_json<T, F>(&self, mut visit: F) -> CoreResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> bool,
    {
        for payload in self.records()? {
            let value = serde_json::from_slice(&payload?)?;
            if visit(value) {
                break;
            }
        }
        Ok(())
    }

    /// Counts the records in the collection.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::for_each`].
    pub fn count(&self) -> CoreResult<usize> {
        self.records()?.try_fold(0, |count, payload| payload.map(|_| count + 1))
    }

    /// Removes every record, leaving an empty collection.
    ///
    /// Takes the same write guard as `insert`, so it never interleaves
    /// with an append. The cached handle stays valid.
    ///
    /// # Errors
    ///
    /// Returns `CollectionClosed` after the database was closed, or a
    /// storage error if the file cannot be truncated.
    pub fn drop_records(&self) -> CoreResult<()> {
        let mut writer = self.writer.lock();
        if writer.is_closed() {
            return Err(CoreError::collection_closed(&self.name));
        }

        self.committed.store(0, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);

        if let Err(err) = writer.truncate(0) {
            self.committed.store(writer.size(), Ordering::SeqCst);
            return Err(err.into());
        }

        debug!(collection = %self.name, "dropped all records");
        Ok(())
    }

    /// Syncs and releases the write handle.
    pub(crate) fn release(&self) -> CoreResult<()> {
        self.writer.lock().close()?;
        debug!(collection = %self.name, "released collection");
        Ok(())
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub(crate) fn max_record_size(&self) -> u64 {
        self.config.max_record_size
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("len_bytes", &self.len_bytes())
            .finish_non_exhaustive()
    }
}
