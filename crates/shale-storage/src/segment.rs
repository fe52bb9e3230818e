//! A segment: one store file plus one index file covering a contiguous
//! offset range.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use shale_types::Offset;
use tracing::debug;

use crate::config::LogConfig;
use crate::index::Index;
use crate::record::Record;
use crate::store::Store;
use crate::StorageError;

/// File extension of the framed record file.
pub(crate) const STORE_EXT: &str = "store";

/// File extension of the offset index file.
pub(crate) const INDEX_EXT: &str = "index";

/// The unit of rollover and truncation.
///
/// A segment owns exactly one store and one index, covers the offsets
/// `base_offset..next_offset`, and is mutated only by the owning log. Both
/// file names carry the base offset as their stem, which is how the log
/// rediscovers segments at startup.
#[derive(Debug)]
pub(crate) struct Segment {
    store: Store,
    index: Index,
    base_offset: Offset,
    next_offset: Offset,
    config: LogConfig,
    store_path: PathBuf,
    index_path: PathBuf,
}

impl Segment {
    /// Opens or creates the segment rooted at `base_offset` under `dir`.
    ///
    /// `next_offset` is recovered from the last index entry: an empty index
    /// means a fresh segment whose first record lands at `base_offset`.
    pub(crate) fn open(
        dir: &Path,
        base_offset: Offset,
        config: &LogConfig,
    ) -> Result<Self, StorageError> {
        let store_path = dir.join(format!("{base_offset}.{STORE_EXT}"));
        let index_path = dir.join(format!("{base_offset}.{INDEX_EXT}"));

        let store_file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&store_path)?;
        let store = Store::new(store_file)?;

        let index_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&index_path)?;
        let index = Index::new(index_file, config.max_index_bytes)?;

        let next_offset = match index.last_entry() {
            Some(entry) => base_offset + u64::from(entry.relative_offset) + 1,
            None => base_offset,
        };

        debug!(%base_offset, %next_offset, "opened segment");

        Ok(Self {
            store,
            index,
            base_offset,
            next_offset,
            config: config.clone(),
            store_path,
            index_path,
        })
    }

    pub(crate) fn base_offset(&self) -> Offset {
        self.base_offset
    }

    pub(crate) fn next_offset(&self) -> Offset {
        self.next_offset
    }

    /// Whether `offset` falls inside this segment's populated range.
    pub(crate) fn contains(&self, offset: Offset) -> bool {
        self.base_offset <= offset && offset < self.next_offset
    }

    /// Appends `value` and returns the absolute offset it was assigned.
    ///
    /// The index entry is written only after the store accepts the frame, so
    /// a failure in between leaves an orphaned frame that no reader can
    /// observe and whose offset is reused by the next successful append.
    pub(crate) fn append(&mut self, value: Bytes) -> Result<Offset, StorageError> {
        let offset = self.next_offset;
        let relative =
            u32::try_from(offset - self.base_offset).map_err(|_| {
                StorageError::RelativeOffsetOverflow {
                    offset,
                    base: self.base_offset,
                }
            })?;

        let record = Record::new(offset, value);
        let (_, position) = self.store.append(&record.to_bytes())?;
        self.index.append(relative, position)?;

        self.next_offset = offset.next();
        Ok(offset)
    }

    /// Reads the record at `offset`.
    pub(crate) fn read(&self, offset: Offset) -> Result<Record, StorageError> {
        debug_assert!(self.contains(offset), "read outside segment range");

        let relative =
            u32::try_from(offset - self.base_offset).map_err(|_| {
                StorageError::RelativeOffsetOverflow {
                    offset,
                    base: self.base_offset,
                }
            })?;

        let entry = self.index.entry(relative)?;
        let payload = self.store.read(entry.position)?;
        Record::from_bytes(&payload)
    }

    /// Whether the segment has reached either size limit.
    ///
    /// Checked after appends: the record that crosses a limit stays in this
    /// segment, and the next append lands in a fresh one.
    pub(crate) fn is_maxed(&self) -> bool {
        self.store.size() >= self.config.max_store_bytes
            || self.index.size() >= self.config.max_index_bytes
    }

    /// Closes the segment: index first (sync + truncate to the populated
    /// prefix), then the store (flush + sync).
    ///
    /// The index must close before the process exits, or the next startup
    /// sees a fully pre-extended file and misreads its entry count.
    pub(crate) fn close(self) -> Result<(), StorageError> {
        self.index.close()?;
        self.store.close()?;
        Ok(())
    }

    /// Closes the segment and deletes both backing files.
    pub(crate) fn remove(self) -> Result<(), StorageError> {
        let store_path = self.store_path.clone();
        let index_path = self.index_path.clone();
        self.close()?;
        fs::remove_file(index_path)?;
        fs::remove_file(store_path)?;
        Ok(())
    }
}
