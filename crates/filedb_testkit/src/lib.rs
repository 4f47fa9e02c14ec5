//! # FileDB Testkit
//!
//! Test utilities for FileDB.
//!
//! This crate provides:
//! - Temporary-directory database fixtures
//! - Pre-populated test scenarios
//! - Concurrent stress helpers
//!
//! ## Usage
//!
//! ```rust
//! use filedb_testkit::prelude::*;
//!
//! with_temp_db(|db| {
//!     let people = db.collection("people").unwrap();
//!     people.insert(b"hello").unwrap();
//!     assert_eq!(people.count().unwrap(), 1);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use stress::*;
