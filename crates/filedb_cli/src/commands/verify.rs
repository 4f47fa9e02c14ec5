//! Verify command implementation.

use filedb_core::Database;
use std::path::Path;

/// Verification result for one collection.
#[derive(Debug)]
pub struct VerifyResult {
    /// Collection name.
    pub name: String,
    /// Number of intact records before the first error.
    pub valid_records: usize,
    /// First error found, if any.
    pub error: Option<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Scans every collection and records how far its framing is intact.
pub fn verify_database(db: &Database) -> Result<Vec<VerifyResult>, Box<dyn std::error::Error>> {
    let mut results = Vec::new();
    for name in db.collection_names()? {
        let collection = db.collection(&name)?;
        let mut valid_records = 0usize;
        let result = collection.for_each(|_| {
            valid_records += 1;
            false
        });
        results.push(VerifyResult {
            name,
            valid_records,
            error: result.err().map(|e| e.to_string()),
        });
    }
    Ok(results)
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying database at {:?}", path);
    println!();

    let db = Database::dial(path)?;
    let results = verify_database(&db)?;
    db.close()?;

    for result in &results {
        match &result.error {
            None => println!("  ✓ {}: {} records", result.name, result.valid_records),
            Some(err) => println!(
                "  ✗ {}: {} valid records, then {}",
                result.name, result.valid_records, err
            ),
        }
    }

    println!();
    if results.iter().all(VerifyResult::is_ok) {
        println!("✓ Database verification passed");
        Ok(())
    } else {
        println!("✗ Database verification failed");
        Err("Verification failed".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn detects_torn_tail() {
        let temp = tempdir().unwrap();
        {
            let db = Database::dial(temp.path()).unwrap();
            db.collection("good").unwrap().insert(b"fine").unwrap();
            db.collection("bad").unwrap().insert(b"fine").unwrap();
            db.close().unwrap();
        }
        let mut file = OpenOptions::new()
            .append(true)
            .open(temp.path().join("bad.filedb"))
            .unwrap();
        file.write_all(&[9, 0, 0]).unwrap();
        std::mem::drop(file);

        let db = Database::dial(temp.path()).unwrap();
        let results = verify_database(&db).unwrap();

        assert_eq!(results[0].name, "bad");
        assert_eq!(results[0].valid_records, 1);
        assert!(!results[0].is_ok());
        assert_eq!(results[1].name, "good");
        assert!(results[1].is_ok());

        assert!(run(temp.path()).is_err());
    }
}
