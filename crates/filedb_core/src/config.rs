//! Database configuration.

/// Configuration for dialing a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to sync every insert to disk before it returns (safer but slower).
    pub sync_on_insert: bool,

    /// Largest payload a frame may declare. Longer frames are treated as corruption.
    pub max_record_size: u64,

    /// Buffer size for scan readers.
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync_on_insert: true,
            max_record_size: 1024 * 1024 * 1024, // 1 GiB
            read_buffer_size: 64 * 1024,         // 64 KiB
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to sync on every insert.
    #[must_use]
    pub const fn sync_on_insert(mut self, value: bool) -> Self {
        self.sync_on_insert = value;
        self
    }

    /// Sets the maximum record size.
    #[must_use]
    pub const fn max_record_size(mut self, size: u64) -> Self {
        self.max_record_size = size;
        self
    }

    /// Sets the scan read buffer size.
    #[must_use]
    pub const fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }
}
