//! Error types for commit log operations.

use std::io;

use shale_types::Offset;

/// Errors that can occur during commit log operations.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// Filesystem I/O error.
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),

    /// Read past the populated portion of a store or index file.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// The index memory map has no room for another entry.
    #[error("index is full")]
    IndexFull,

    /// The offset is not covered by any segment.
    #[error("offset out of range: {0}")]
    OffsetOutOfRange(Offset),

    /// CRC mismatch - the record data is corrupted.
    #[error("corrupted record: CRC mismatch")]
    CorruptedRecord,

    /// The record payload is too short to hold the fixed fields.
    #[error("truncated record: {actual} bytes, need at least {expected}")]
    TruncatedRecord { expected: usize, actual: usize },

    /// The offset cannot be expressed as a 32-bit offset relative to its
    /// segment base.
    #[error("offset {offset} does not fit a u32 relative to segment base {base}")]
    RelativeOffsetOverflow { offset: Offset, base: Offset },

    /// The log has been closed; no further operations are valid.
    #[error("log is closed")]
    Closed,
}
