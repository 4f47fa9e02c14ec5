//! Record-level commands: insert, dump, count and drop.

use filedb_core::{Collection, Database};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Opens an existing collection without creating it.
fn existing_collection(
    db: &Database,
    name: &str,
) -> Result<Arc<Collection>, Box<dyn std::error::Error>> {
    if !db.has_collection(name)? {
        return Err(format!("No collection named {name:?} in {:?}", db.path()).into());
    }
    Ok(db.collection(name)?)
}

/// Validates `document` as JSON and inserts it.
pub fn insert(path: &Path, name: &str, document: &str) -> Result<(), Box<dyn std::error::Error>> {
    let value: serde_json::Value = serde_json::from_str(document)?;

    let db = Database::dial(path)?;
    let collection = db.collection(name)?;
    collection.insert_json(&value)?;
    info!("Inserted 1 record into {:?}", name);

    db.close()?;
    Ok(())
}

/// Prints each record of a collection as UTF-8 text, one per line.
pub fn dump(
    path: &Path,
    name: &str,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::dial(path)?;
    let collection = existing_collection(&db, name)?;

    let limit = limit.unwrap_or(usize::MAX);
    let mut printed = 0usize;
    if limit > 0 {
        collection.for_each(|payload| {
            println!("{}", String::from_utf8_lossy(payload));
            printed += 1;
            printed >= limit
        })?;
    }
    info!("Printed {} records from {:?}", printed, name);

    db.close()?;
    Ok(())
}

/// Prints the number of records in a collection.
pub fn count(path: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::dial(path)?;
    let collection = existing_collection(&db, name)?;
    println!("{}", collection.count()?);

    db.close()?;
    Ok(())
}

/// Removes every record from a collection.
pub fn drop(path: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::dial(path)?;
    let collection = existing_collection(&db, name)?;
    collection.drop_records()?;
    info!("Dropped all records from {:?}", name);

    db.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn insert_rejects_invalid_json() {
        let temp = tempdir().unwrap();
        assert!(insert(temp.path(), "people", "{not json").is_err());
        assert!(!temp.path().join("people.filedb").exists());
    }

    #[test]
    fn insert_then_count() {
        let temp = tempdir().unwrap();
        insert(temp.path(), "people", r#"{"name":"Mat"}"#).unwrap();
        insert(temp.path(), "people", r#"{"name":"Ryan"}"#).unwrap();

        let db = Database::dial(temp.path()).unwrap();
        assert_eq!(db.collection("people").unwrap().count().unwrap(), 2);
    }

    #[test]
    fn missing_collection_is_not_created() {
        let temp = tempdir().unwrap();
        assert!(count(temp.path(), "ghost").is_err());
        assert!(dump(temp.path(), "ghost", None).is_err());
        assert!(!temp.path().join("ghost.filedb").exists());
    }

    #[test]
    fn drop_empties_collection() {
        let temp = tempdir().unwrap();
        insert(temp.path(), "people", "1").unwrap();
        drop(temp.path(), "people").unwrap();

        let db = Database::dial(temp.path()).unwrap();
        assert_eq!(db.collection("people").unwrap().count().unwrap(), 0);
    }
}
