//! Stress tests for FileDB.
//!
//! These helpers hammer one collection from many threads and check that
//! framing survives concurrent writers and readers.

use filedb_core::{Collection, Database};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform, split across threads.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Size of each record payload in bytes.
    pub record_size: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            record_size: 256,
        }
    }
}

/// Builds a payload that identifies its writer and index.
///
/// The header is `<thread>:<index>:` followed by filler up to `size` bytes,
/// so a scan can check that no two writers' bytes were mixed.
pub fn tagged_payload(thread: usize, index: usize, size: usize) -> Vec<u8> {
    let mut payload = format!("{thread}:{index}:").into_bytes();
    let fill = b'a' + (thread % 26) as u8;
    payload.resize(payload.len().max(size), fill);
    payload
}

/// Checks that a payload built by [`tagged_payload`] is intact.
pub fn verify_tagged_payload(payload: &[u8]) -> bool {
    let mut parts = payload.splitn(3, |b| *b == b':');
    let (Some(thread), Some(_index), Some(fill)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Some(thread) = std::str::from_utf8(thread)
        .ok()
        .and_then(|t| t.parse::<usize>().ok())
    else {
        return false;
    };
    let expected = b'a' + (thread % 26) as u8;
    fill.iter().all(|b| *b == expected)
}

/// Run a sequential insert stress test.
pub fn stress_sequential_inserts(collection: &Collection, config: &StressConfig) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        match collection.insert(&tagged_payload(0, i, config.record_size)) {
            Ok(()) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a concurrent insert stress test against one collection.
///
/// Every thread resolves the collection through the database by name, so
/// this also exercises concurrent first access.
pub fn stress_concurrent_inserts(
    db: &Database,
    collection: &str,
    config: &StressConfig,
) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_thread = config.operations / config.threads;

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let db = db.clone();
            let name = collection.to_string();
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let record_size = config.record_size;

            thread::spawn(move || {
                let Ok(collection) = db.collection(&name) else {
                    failed.fetch_add(ops_per_thread, Ordering::Relaxed);
                    return;
                };
                for i in 0..ops_per_thread {
                    match collection.insert(&tagged_payload(t, i, record_size)) {
                        Ok(()) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run inserts on one thread while other threads scan repeatedly.
///
/// Counts a scan as failed if it returns an error or sees a payload that
/// does not verify. Returns `(insert result, scan result)`.
pub fn stress_insert_while_scanning(
    collection: Arc<Collection>,
    config: &StressConfig,
) -> (StressTestResult, StressTestResult) {
    let done = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let scans_ok = Arc::new(AtomicUsize::new(0));
    let scans_failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();

    let readers: Vec<_> = (0..config.threads.max(1))
        .map(|_| {
            let collection = Arc::clone(&collection);
            let done = Arc::clone(&done);
            let scans_ok = Arc::clone(&scans_ok);
            let scans_failed = Arc::clone(&scans_failed);

            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let mut intact = true;
                    let result = collection.for_each(|payload| {
                        intact &= verify_tagged_payload(payload);
                        false
                    });
                    if result.is_ok() && intact {
                        scans_ok.fetch_add(1, Ordering::Relaxed);
                    } else {
                        scans_failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    let inserts = stress_sequential_inserts(&collection, config);
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().expect("Thread panicked");
    }

    let scans = StressTestResult::new(
        scans_ok.load(Ordering::Relaxed),
        scans_failed.load(Ordering::Relaxed),
        start.elapsed(),
    );
    (inserts, scans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestDatabase;

    fn small_config() -> StressConfig {
        StressConfig {
            operations: 400,
            threads: 4,
            record_size: 64,
        }
    }

    #[test]
    fn tagged_payload_verifies() {
        let payload = tagged_payload(3, 17, 40);
        assert_eq!(payload.len(), 40);
        assert!(verify_tagged_payload(&payload));

        let mut mixed = payload.clone();
        mixed[30] = b'z';
        assert!(!verify_tagged_payload(&mixed));
        assert!(!verify_tagged_payload(b"garbage"));
    }

    #[test]
    fn concurrent_inserts_keep_framing() {
        let test_db = TestDatabase::unsynced();
        let config = small_config();

        let result = stress_concurrent_inserts(&test_db, "events", &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, config.operations);

        let events = test_db.collection("events").unwrap();
        let mut seen = 0;
        events
            .for_each(|payload| {
                assert!(verify_tagged_payload(payload));
                seen += 1;
                false
            })
            .unwrap();
        assert_eq!(seen, config.operations);
    }

    #[test]
    fn scans_during_inserts_never_fail() {
        let test_db = TestDatabase::unsynced();
        let events = test_db.collection("events").unwrap();
        let config = small_config();

        let (inserts, scans) = stress_insert_while_scanning(Arc::clone(&events), &config);

        assert_eq!(inserts.failed_ops, 0);
        assert_eq!(scans.failed_ops, 0);
        assert_eq!(events.count().unwrap(), config.operations);
    }
}
