//! CLI command implementations.

pub mod inspect;
pub mod records;
pub mod verify;
