//! Log configuration.

use serde::{Deserialize, Serialize};
use shale_types::Offset;

/// Default cap on framed record bytes per segment store file.
const DEFAULT_MAX_STORE_BYTES: u64 = 1024;

/// Default cap on index bytes per segment.
const DEFAULT_MAX_INDEX_BYTES: u64 = 1024;

/// Configuration for a segmented log.
///
/// The two size limits bound individual segments, not the log as a whole:
/// once the active segment reaches either limit, the next append rolls over
/// into a fresh segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum bytes of framed records per segment store file. The record
    /// that crosses this limit is still stored; the segment rolls afterward.
    pub max_store_bytes: u64,
    /// Maximum bytes of index entries per segment. This is also the size the
    /// index file is pre-extended to while open, and therefore caps the
    /// records per segment at one 12-byte entry each.
    pub max_index_bytes: u64,
    /// Offset assigned to the first record of a fresh log.
    pub initial_offset: Offset,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_store_bytes: DEFAULT_MAX_STORE_BYTES,
            max_index_bytes: DEFAULT_MAX_INDEX_BYTES,
            initial_offset: Offset::ZERO,
        }
    }
}

impl LogConfig {
    /// Sets the store size limit per segment.
    pub fn with_max_store_bytes(mut self, bytes: u64) -> Self {
        self.max_store_bytes = bytes;
        self
    }

    /// Sets the index size limit per segment.
    pub fn with_max_index_bytes(mut self, bytes: u64) -> Self {
        self.max_index_bytes = bytes;
        self
    }

    /// Sets the offset assigned to the first record of a fresh log.
    pub fn with_initial_offset(mut self, offset: impl Into<Offset>) -> Self {
        self.initial_offset = offset.into();
        self
    }

    /// Replaces unset (zero) size limits with their defaults.
    pub(crate) fn normalized(mut self) -> Self {
        if self.max_store_bytes == 0 {
            self.max_store_bytes = DEFAULT_MAX_STORE_BYTES;
        }
        if self.max_index_bytes == 0 {
            self.max_index_bytes = DEFAULT_MAX_INDEX_BYTES;
        }
        self
    }
}
