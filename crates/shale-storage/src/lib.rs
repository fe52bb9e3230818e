//! shale-storage: Append-only segmented commit log for Shale
//!
//! This crate implements the durable storage layer of the Shale commit log.
//! Records are opaque byte payloads addressed by monotonically assigned
//! offsets, stored across size-bounded segments that each pair an append-only
//! store file with a memory-mapped offset index.
//!
//! # Record Format
//!
//! Each record is stored as:
//! ```text
//! [offset:u64][value:bytes][crc32:u32]
//!     8B         variable      4B
//! ```
//!
//! - **offset**: the logical position of this record in the log
//! - **value**: the record payload
//! - **crc32**: checksum of offset + value for corruption detection
//!
//! All integers are big-endian. The store file frames every record with an
//! 8-byte length prefix; the index file maps relative offsets to frame
//! positions in fixed 12-byte entries.
//!
//! # File Layout
//!
//! ```text
//! log_dir/
//!   0.store      # framed records of the segment based at offset 0
//!   0.index      # offset index of that segment
//!   2.store      # next segment after rollover
//!   2.index
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bytes::Bytes;
//! use shale_storage::{CommitLog, LogConfig, SegmentedLog};
//!
//! let log = SegmentedLog::open("/var/lib/shale", LogConfig::default())?;
//!
//! let offset = log.append(Bytes::from("event"))?;
//! let record = log.read(offset)?;
//! assert_eq!(record.value().as_ref(), b"event");
//!
//! log.close()?;
//! ```

// Modules
mod config;
mod error;
mod index;
mod log;
mod memory;
mod record;
mod segment;
mod store;

// Re-exports
pub use config::LogConfig;
pub use error::StorageError;
pub use log::{CommitLog, SegmentedLog};
pub use memory::InMemoryLog;
pub use record::Record;
