//! # FileDB Core
//!
//! Core collection engine for FileDB, a directory-backed document store.
//!
//! A database is an existing directory; each `<name>.filedb` file inside it
//! is one collection of opaque byte records (usually JSON documents) kept in
//! insertion order.
//!
//! This crate provides:
//! - Record framing ([`record`])
//! - Collection handles with serialized appends, scans and drop
//! - The [`Database`] registry that discovers and caches collections
//!
//! ## Example
//!
//! ```rust
//! use filedb_core::Database;
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let db = Database::dial(dir.path()).unwrap();
//!
//! let people = db.collection("people").unwrap();
//! people.insert_json(&json!({"name": "Mat", "location": "San Francisco"})).unwrap();
//! people.insert_json(&json!({"name": "Ryan", "location": "Boulder"})).unwrap();
//!
//! let mut names = Vec::new();
//! people
//!     .for_each_json(|doc: serde_json::Value| {
//!         names.push(doc["name"].as_str().unwrap().to_string());
//!         false
//!     })
//!     .unwrap();
//! assert_eq!(names, ["Mat", "Ryan"]);
//!
//! assert_eq!(db.collection_names().unwrap(), ["people"]);
//! db.close().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod config;
mod database;
pub mod dir;
mod error;
pub mod record;

pub use collection::{Collection, Records};
pub use config::Config;
pub use database::Database;
pub use dir::COLLECTION_EXTENSION;
pub use error::{CoreError, CoreResult};

/// Crate version, for tools that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
