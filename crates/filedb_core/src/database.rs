//! Database facade: a directory of collections.

use crate::collection::Collection;
use crate::config::Config;
use crate::dir::{validate_collection_name, DatabaseDir};
use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// The main database handle.
///
/// A `Database` is an existing directory; every `<name>.filedb` file inside
/// it is one collection. It provides:
/// - Lazy creation and caching of collection handles
/// - Discovery of collections already on disk
/// - Release of every file handle on close
///
/// `Database` is a cheap handle over shared state: clones refer to the same
/// database and compare equal.
///
/// # Dialing a Database
///
/// ```rust,ignore
/// use filedb_core::Database;
/// use std::path::Path;
///
/// // The directory must already exist.
/// let db = Database::dial(Path::new("my_database"))?;
///
/// let people = db.collection("people")?;
/// people.insert(br#"{"name":"Mat"}"#)?;
///
/// // Close gracefully
/// db.close()?;
/// ```
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

/// Shared state behind every clone of a [`Database`].
pub(crate) struct DatabaseInner {
    /// Root directory.
    dir: DatabaseDir,
    /// Configuration, copied into each collection.
    config: Config,
    /// Collection handles created during this session, by name.
    collections: RwLock<HashMap<String, Arc<Collection>>>,
    /// Whether the database is open.
    is_open: RwLock<bool>,
}

impl Database {
    /// Opens an existing directory as a database.
    ///
    /// No collection is opened or enumerated until asked for.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseNotFound` if `path` does not exist or is not a
    /// directory. The directory is never created.
    pub fn dial(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::dial_with_config(path, Config::default())
    }

    /// Opens an existing directory as a database with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use filedb_core::{Config, Database};
    ///
    /// let config = Config::default().sync_on_insert(false);
    /// let db = Database::dial_with_config("my_database", config)?;
    /// ```
    pub fn dial_with_config(path: impl AsRef<Path>, config: Config) -> CoreResult<Self> {
        let dir = DatabaseDir::open(path.as_ref())?;
        debug!(path = %dir.path().display(), "dialed database");

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                dir,
                config,
                collections: RwLock::new(HashMap::new()),
                is_open: RwLock::new(true),
            }),
        })
    }

    pub(crate) fn from_inner(inner: Arc<DatabaseInner>) -> Self {
        Self { inner }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.dir.path()
    }

    /// Returns database configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns the collection called `name`, creating it on first use.
    ///
    /// The first call for a name opens (and if needed creates) the backing
    /// file and caches the handle; later calls return the same `Arc`.
    /// Concurrent first calls for one name open the file exactly once.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `InvalidCollectionName` if `name` cannot be a file name
    /// - `DatabaseClosed` after [`Database::close`]
    /// - a storage error if the file cannot be opened or created
    pub fn collection(&self, name: &str) -> CoreResult<Arc<Collection>> {
        validate_collection_name(name)?;
        self.ensure_open()?;

        if let Some(existing) = self.inner.collections.read().get(name) {
            return Ok(Arc::clone(existing));
        }

        let mut collections = self.inner.collections.write();
        // Another caller may have won the race for this name.
        if let Some(existing) = collections.get(name) {
            return Ok(Arc::clone(existing));
        }
        if !*self.inner.is_open.read() {
            return Err(CoreError::DatabaseClosed);
        }

        let dir = &self.inner.dir;
        let created = !dir.has_collection(name);
        let collection = Arc::new(Collection::open(
            name,
            dir.collection_path(name),
            Arc::downgrade(&self.inner),
            self.inner.config.clone(),
        )?);
        if created {
            dir.sync_directory()?;
            debug!(collection = name, "created collection");
        }

        collections.insert(name.to_string(), Arc::clone(&collection));
        Ok(collection)
    }

    /// Lists every collection in the directory, sorted ascending.
    ///
    /// This reads the directory, so collections written by an earlier
    /// session appear even if they were never opened in this one.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseClosed` after close, or an I/O error if the
    /// directory cannot be read.
    pub fn collection_names(&self) -> CoreResult<Vec<String>> {
        self.ensure_open()?;
        self.inner.dir.collection_names()
    }

    /// Checks whether a collection file exists on disk.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCollectionName` or `DatabaseClosed`.
    pub fn has_collection(&self, name: &str) -> CoreResult<bool> {
        validate_collection_name(name)?;
        self.ensure_open()?;
        Ok(self.inner.dir.has_collection(name))
    }

    /// Closes the database, syncing and releasing every collection handle.
    ///
    /// Closing an already closed database is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while syncing a collection. Every handle
    /// is released regardless.
    pub fn close(&self) -> CoreResult<()> {
        self.inner.close()
    }

    /// Checks if the database is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.inner.is_open.read()
    }

    /// Ensures the database is open.
    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::DatabaseClosed)
        }
    }
}

impl DatabaseInner {
    fn close(&self) -> CoreResult<()> {
        let collections = self.collections.read();
        let mut is_open = self.is_open.write();
        if !*is_open {
            return Ok(());
        }
        *is_open = false;

        let mut first_error = None;
        for collection in collections.values() {
            if let Err(err) = collection.release() {
                warn!(collection = %collection.name(), error = %err, "failed to release collection");
                first_error.get_or_insert(err);
            }
        }

        debug!(path = %self.dir.path().display(), collections = collections.len(), "closed database");
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(path = %self.dir.path().display(), error = %err, "error closing database on drop");
        }
    }
}

impl PartialEq for Database {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Database {}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path())
            .field("is_open", &self.is_open())
            .field("cached_collections", &self.inner.collections.read().len())
            .finish_non_exhaustive()
    }
}
