//! # FileDB Storage
//!
//! Storage primitives for FileDB collection logs.
//!
//! This crate provides the lowest-level storage abstraction for FileDB.
//! A backend is an **opaque byte store** over one OS file - it does not
//! interpret the data it stores.
//!
//! ## Design Principles
//!
//! - Backends are simple byte stores (append, sync, truncate)
//! - No knowledge of record framing or collections
//! - Readers are independent file handles bounded to a fixed length, so a
//!   scan never moves the writer's position
//! - FileDB core owns all format interpretation and all locking
//!
//! ## Example
//!
//! ```rust
//! use filedb_storage::{FileBackend, FileReader};
//! use std::io::Read;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("people.filedb");
//!
//! let mut backend = FileBackend::open(&path).unwrap();
//! let offset = backend.append(b"hello world").unwrap();
//! backend.sync().unwrap();
//! assert_eq!(offset, 0);
//!
//! let mut reader = FileReader::open(&path, backend.size(), 4096).unwrap();
//! let mut data = Vec::new();
//! reader.read_to_end(&mut data).unwrap();
//! assert_eq!(&data, b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod reader;

pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use reader::FileReader;
