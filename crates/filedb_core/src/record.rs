//! Record framing for collection files.
//!
//! A collection file is a plain concatenation of frames with no header,
//! footer or checksum:
//!
//! ```text
//! ┌──────────────────────┬────────────────────────┐
//! │ length: u64 (LE, 8B) │ payload: `length` bytes │
//! └──────────────────────┴────────────────────────┘
//! ```
//!
//! The payload is stored verbatim, so any byte value (including newlines
//! or bytes that look like a length prefix) round-trips unchanged.

use crate::error::{CoreError, CoreResult};
use std::io::{self, Read};

/// Size of the little-endian `u64` length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 8;

/// Initial payload allocation cap, so a corrupted prefix cannot force a
/// huge allocation before the short read is detected.
const MAX_PREALLOC: u64 = 64 * 1024;

/// Returns the encoded size of a frame carrying `payload_len` bytes.
#[must_use]
pub const fn encoded_len(payload_len: usize) -> usize {
    LENGTH_PREFIX_SIZE + payload_len
}

/// Encodes a payload into a self-delimiting frame.
#[must_use]
pub fn encode(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(payload.len()));
    encode_into(&mut buf, payload);
    buf
}

/// Appends the frame for `payload` to `buf`.
pub fn encode_into(buf: &mut Vec<u8>, payload: &[u8]) {
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload);
}

/// Decodes a single frame from `reader`.
///
/// Returns `Ok(None)` if the reader is exhausted before any byte of the
/// frame. This is a shorthand for one step of a [`RecordReader`] with no
/// size limit.
///
/// # Errors
///
/// Returns `FramingCorruption` if the frame is truncated, or `Io` if the
/// reader fails.
pub fn decode<R: Read>(reader: R) -> CoreResult<Option<Vec<u8>>> {
    RecordReader::new(reader).next_record()
}

/// Sequential frame decoder over any byte stream.
///
/// # Error Handling
///
/// - End of stream exactly at a frame boundary ends the sequence
/// - A partial length prefix or a short payload is `FramingCorruption`
/// - A declared length above the size limit is `FramingCorruption`
/// - After the first error the reader is finished and yields nothing more
///
/// # Example
///
/// ```rust
/// use filedb_core::record::{encode, RecordReader};
///
/// let mut data = encode(b"first");
/// data.extend(encode(b"second"));
///
/// let records: Vec<Vec<u8>> = RecordReader::new(data.as_slice())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(records, vec![b"first".to_vec(), b"second".to_vec()]);
/// ```
#[derive(Debug)]
pub struct RecordReader<R> {
    reader: R,
    /// Offset of the next frame, relative to where the reader started.
    offset: u64,
    max_record_size: u64,
    finished: bool,
}

impl<R: Read> RecordReader<R> {
    /// Creates a decoder with no record size limit.
    pub fn new(reader: R) -> Self {
        Self::with_max_record_size(reader, u64::MAX)
    }

    /// Creates a decoder that rejects frames declaring more than `max` bytes.
    pub fn with_max_record_size(reader: R, max: u64) -> Self {
        Self {
            reader,
            offset: 0,
            max_record_size: max,
            finished: false,
        }
    }

    /// Returns the offset of the next frame to be decoded.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Decodes the next frame.
    ///
    /// # Errors
    ///
    /// See the type-level documentation.
    pub fn next_record(&mut self) -> CoreResult<Option<Vec<u8>>> {
        if self.finished {
            return Ok(None);
        }

        let result = self.read_frame();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn read_frame(&mut self) -> CoreResult<Option<Vec<u8>>> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        let filled = read_full(&mut self.reader, &mut prefix)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < LENGTH_PREFIX_SIZE {
            return Err(CoreError::framing_corruption(
                self.offset,
                format!("truncated length prefix: {filled} of {LENGTH_PREFIX_SIZE} bytes"),
            ));
        }

        let len = u64::from_le_bytes(prefix);
        if len > self.max_record_size {
            return Err(CoreError::framing_corruption(
                self.offset,
                format!(
                    "declared length {len} exceeds maximum record size {}",
                    self.max_record_size
                ),
            ));
        }

        let mut payload = Vec::with_capacity(len.min(MAX_PREALLOC) as usize);
        let read = (&mut self.reader).take(len).read_to_end(&mut payload)?;
        if (read as u64) < len {
            return Err(CoreError::framing_corruption(
                self.offset,
                format!("truncated payload: {read} of {len} bytes"),
            ));
        }

        self.offset += LENGTH_PREFIX_SIZE as u64 + len;
        Ok(Some(payload))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = CoreResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Reads until `buf` is full or the stream ends. Returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
