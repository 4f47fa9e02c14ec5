//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use filedb_core::{Config, Database};
use std::path::Path;
use tempfile::TempDir;

/// A database dialed on a fresh temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestDatabase {
    /// Creates a test database with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a test database with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::dial_with_config(temp_dir.path(), config)
            .expect("Failed to dial temp database");

        Self { db, temp_dir }
    }

    /// Creates a test database that skips fsync on insert.
    ///
    /// Much faster for tests with many inserts.
    pub fn unsynced() -> Self {
        Self::with_config(Config::default().sync_on_insert(false))
    }

    /// Returns the database root directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Closes the current handle and dials the same directory again.
    pub fn reopen(&mut self) {
        self.db.close().expect("Failed to close database");
        self.db = Database::dial_with_config(self.temp_dir.path(), self.db.config().clone())
            .expect("Failed to redial database");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary database.
///
/// # Example
///
/// ```rust,ignore
/// use filedb_testkit::with_temp_db;
///
/// #[test]
/// fn my_test() {
///     with_temp_db(|db| {
///         let people = db.collection("people").unwrap();
///         // ... test operations
///     });
/// }
/// ```
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::new();
    f(&test_db.db)
}

/// Runs a test with a temporary database and its root path.
pub fn with_temp_db_path<F, R>(f: F) -> R
where
    F: FnOnce(&Database, &Path) -> R,
{
    let test_db = TestDatabase::new();
    f(&test_db.db, test_db.path())
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use serde_json::json;

    /// Creates a database whose `test` collection holds `record_count` JSON documents.
    pub fn populated_database(record_count: usize) -> TestDatabase {
        let test_db = TestDatabase::unsynced();
        let collection = test_db.collection("test").expect("Failed to open collection");

        for i in 0..record_count {
            collection
                .insert_json(&json!({ "index": i }))
                .expect("Failed to insert record");
        }

        test_db
    }

    /// Creates a database with `collection_count` collections of one record each.
    ///
    /// Collections are named `collection_0`, `collection_1`, ...
    pub fn multi_collection_database(collection_count: usize) -> (TestDatabase, Vec<String>) {
        let test_db = TestDatabase::unsynced();
        let mut names = Vec::with_capacity(collection_count);

        for i in 0..collection_count {
            let name = format!("collection_{i}");
            test_db
                .collection(&name)
                .expect("Failed to open collection")
                .insert_json(&json!({ "collection": i }))
                .expect("Failed to insert record");
            names.push(name);
        }

        (test_db, names)
    }
}
