//! Collections: named record logs inside a database directory.
//!
//! A [`Collection`] owns the write handle of one `<name>.filedb` file and
//! serializes all writes to it. [`Records`] scans the file without taking
//! the write guard.

mod scan;
mod store;

pub use scan::Records;
pub use store::Collection;
