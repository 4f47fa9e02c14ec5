//! Benchmark utilities for FileDB.

#![warn(missing_docs)]

use rand::Rng;
use serde_json::{json, Value};

/// Generate random record data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate a JSON document roughly `size` bytes long once serialized.
pub fn json_document(index: usize, size: usize) -> Value {
    json!({
        "index": index,
        "name": format!("user-{index}"),
        "bio": "x".repeat(size.saturating_sub(48)),
    })
}
