//! Streaming scans over a collection file.

use crate::collection::Collection;
use crate::error::CoreResult;
use crate::record::RecordReader;
use filedb_storage::FileReader;
use tracing::{debug, warn};

/// A lazy, point-in-time iterator over a collection's records.
///
/// Created by [`Collection::records`]. Reads through its own file handle and
/// stops at the committed length captured when it was created.
///
/// - Yields payloads in insertion order
/// - Yields at most one error (corruption or I/O), then ends
/// - Ends without error if the collection is dropped while the scan is live
pub struct Records<'a> {
    collection: &'a Collection,
    reader: RecordReader<FileReader>,
    /// Drop epoch observed when the scan started.
    epoch: u64,
    finished: bool,
}

impl<'a> Records<'a> {
    pub(crate) fn new(collection: &'a Collection, reader: FileReader, epoch: u64) -> Self {
        let reader = RecordReader::with_max_record_size(reader, collection.max_record_size());
        Self {
            collection,
            reader,
            epoch,
            finished: false,
        }
    }

    /// Returns the offset of the next record in the file.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.reader.offset()
    }

    /// Finishes the scan if the collection was dropped since it started.
    ///
    /// `drop_records` bumps the epoch before cutting the file, so any read
    /// that saw bytes from after the cut is followed by a changed epoch.
    fn ended_by_drop(&mut self) -> bool {
        if self.collection.epoch() == self.epoch {
            return false;
        }
        debug!(collection = %self.collection.name(), "scan ended by concurrent drop");
        self.finished = true;
        true
    }
}

impl Iterator for Records<'_> {
    type Item = CoreResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.ended_by_drop() {
            return None;
        }

        match self.reader.next_record() {
            // A drop during the decode may have fed us bytes written after
            // the cut, so the frame only counts if the epoch still matches.
            Ok(Some(payload)) => {
                if self.ended_by_drop() {
                    return None;
                }
                Some(Ok(payload))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                // The file was cut under us; that is the end of the scan.
                if self.ended_by_drop() {
                    return None;
                }
                self.finished = true;
                warn!(
                    collection = %self.collection.name(),
                    offset = self.reader.offset(),
                    error = %err,
                    "collection scan failed"
                );
                Some(Err(err))
            }
        }
    }
}

impl std::fmt::Debug for Records<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Records")
            .field("collection", &self.collection.name())
            .field("offset", &self.offset())
            .field("finished", &self.finished)
            .finish()
    }
}
