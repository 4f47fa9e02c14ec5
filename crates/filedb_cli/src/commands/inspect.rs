//! Collections listing command.

use filedb_core::Database;
use serde::Serialize;
use std::path::Path;

/// Statistics for a single collection.
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    /// Collection name.
    pub name: String,
    /// Number of records, if the file could be scanned.
    pub records: Option<usize>,
    /// File size in bytes.
    pub size: u64,
    /// Scan error, if the file is corrupt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Gathers statistics for every collection in the database.
pub fn collect_stats(db: &Database) -> Result<Vec<CollectionStats>, Box<dyn std::error::Error>> {
    let mut stats = Vec::new();
    for name in db.collection_names()? {
        let collection = db.collection(&name)?;
        let (records, error) = match collection.count() {
            Ok(count) => (Some(count), None),
            Err(err) => (None, Some(err.to_string())),
        };
        stats.push(CollectionStats {
            size: collection.len_bytes(),
            name,
            records,
            error,
        });
    }
    Ok(stats)
}

/// Runs the collections command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::dial(path)?;
    let stats = collect_stats(&db)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        _ => print_text_output(&stats),
    }

    db.close()?;
    Ok(())
}

fn print_text_output(stats: &[CollectionStats]) {
    if stats.is_empty() {
        println!("No collections");
        return;
    }

    println!("{:<32} {:>10} {:>12}", "COLLECTION", "RECORDS", "BYTES");
    for entry in stats {
        let records = entry
            .records
            .map_or_else(|| "corrupt".to_string(), |n| n.to_string());
        println!("{:<32} {:>10} {:>12}", entry.name, records, entry.size);
    }
}
