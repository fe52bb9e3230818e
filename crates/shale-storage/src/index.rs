//! Memory-mapped offset index: the lookup half of a segment.
//!
//! # File Format
//!
//! Fixed-width 12-byte entries, no header:
//! ```text
//! [relative_offset:u32][position:u64]
//!        4B                 8B
//! ```
//!
//! Both fields are big-endian. Entries are dense: the i-th entry describes
//! the record whose relative offset equals i. The stored relative-offset
//! field is redundant with the slot position, but it is what segment
//! recovery reads to find the last assigned offset.
//!
//! A memory map cannot grow without remapping, so the backing file is
//! pre-extended to the configured maximum while open and truncated back to
//! the populated prefix on graceful close. The next open then infers the
//! entry count from the file length alone.

use std::fs::File;

use memmap2::MmapMut;

use crate::StorageError;

const REL_OFFSET_SIZE: u64 = 4;
const POSITION_SIZE: u64 = 8;

/// Width of one index entry: relative offset(4) + position(8).
pub(crate) const ENTRY_SIZE: u64 = REL_OFFSET_SIZE + POSITION_SIZE;

/// One decoded index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndexEntry {
    /// Offset of the record relative to its segment base.
    pub(crate) relative_offset: u32,
    /// Byte position of the record's frame in the store file.
    pub(crate) position: u64,
}

/// Memory-mapped map from relative offset to store position.
///
/// Writes go straight into the map; readers never observe an entry before
/// `size` has advanced past it, which the owning log guarantees by taking
/// its exclusive lock around every append.
#[derive(Debug)]
pub(crate) struct Index {
    file: File,
    mmap: MmapMut,
    size: u64,
}

impl Index {
    /// Wraps an open index file, resuming the populated prefix from the file
    /// length, then pre-extends the file to `max_index_bytes` and maps it.
    pub(crate) fn new(file: File, max_index_bytes: u64) -> Result<Self, StorageError> {
        let size = file.metadata()?.len();
        file.set_len(max_index_bytes)?;

        // SAFETY: the map is private to this Index, the file stays open for
        // the map's whole lifetime, and `close` drops the map before the
        // file is truncated.
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self { file, mmap, size })
    }

    /// Populated bytes: entry count times [`ENTRY_SIZE`].
    pub(crate) fn size(&self) -> u64 {
        self.size
    }

    /// Appends an entry to the populated prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::IndexFull`] when the map has no room for
    /// another entry.
    pub(crate) fn append(&mut self, relative_offset: u32, position: u64) -> Result<(), StorageError> {
        if self.size + ENTRY_SIZE > self.mmap.len() as u64 {
            return Err(StorageError::IndexFull);
        }

        let at = self.size as usize;
        self.mmap[at..at + 4].copy_from_slice(&relative_offset.to_be_bytes());
        self.mmap[at + 4..at + 12].copy_from_slice(&position.to_be_bytes());
        self.size += ENTRY_SIZE;
        Ok(())
    }

    /// Decodes the entry in `slot` (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnexpectedEof`] for slots past the populated
    /// prefix.
    pub(crate) fn entry(&self, slot: u32) -> Result<IndexEntry, StorageError> {
        let at = u64::from(slot) * ENTRY_SIZE;
        if at + ENTRY_SIZE > self.size {
            return Err(StorageError::UnexpectedEof);
        }

        let at = at as usize;
        let relative_offset = u32::from_be_bytes(
            self.mmap[at..at + 4]
                .try_into()
                .expect("slice is exactly 4 bytes"),
        );
        let position = u64::from_be_bytes(
            self.mmap[at + 4..at + 12]
                .try_into()
                .expect("slice is exactly 8 bytes"),
        );

        Ok(IndexEntry {
            relative_offset,
            position,
        })
    }

    /// The most recently appended entry, or `None` for an empty index.
    pub(crate) fn last_entry(&self) -> Option<IndexEntry> {
        if self.size == 0 {
            return None;
        }
        let last_slot = (self.size / ENTRY_SIZE - 1) as u32;
        self.entry(last_slot).ok()
    }

    /// Syncs the map, truncates the file back to the populated prefix, and
    /// closes it.
    ///
    /// The order is load-bearing: sync map, drop map, sync file, truncate,
    /// close. Truncating while mapped would leave pages past end-of-file.
    pub(crate) fn close(self) -> Result<(), StorageError> {
        let Index { file, mmap, size } = self;
        mmap.flush()?;
        drop(mmap);
        file.sync_all()?;
        file.set_len(size)?;
        Ok(())
    }
}
