//! In-memory commit log for tests and non-durable hosts.

use std::collections::VecDeque;
use std::sync::RwLock;

use bytes::Bytes;
use shale_types::Offset;

use crate::log::CommitLog;
use crate::record::Record;
use crate::StorageError;

/// Volatile [`CommitLog`] backed by a deque of records.
///
/// Mirrors the offset semantics of [`SegmentedLog`](crate::SegmentedLog) -
/// dense offsets from an initial offset, coarse prefix truncation - without
/// touching the filesystem. Intended as the substitute implementation in
/// host tests.
#[derive(Debug, Default)]
pub struct InMemoryLog {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    base_offset: Offset,
    records: VecDeque<Record>,
    closed: bool,
}

impl InMemoryLog {
    /// Creates an empty log whose first record lands at offset 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty log whose first record lands at `initial_offset`.
    pub fn with_initial_offset(initial_offset: impl Into<Offset>) -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                base_offset: initial_offset.into(),
                ..Default::default()
            }),
        }
    }
}

impl CommitLog for InMemoryLog {
    fn append(&self, value: Bytes) -> Result<Offset, StorageError> {
        let mut inner = self.inner.write().expect("memory log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        let offset = inner.base_offset + inner.records.len() as u64;
        inner.records.push_back(Record::new(offset, value));
        Ok(offset)
    }

    fn read(&self, offset: Offset) -> Result<Record, StorageError> {
        let inner = self.inner.read().expect("memory log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        if offset < inner.base_offset {
            return Err(StorageError::OffsetOutOfRange(offset));
        }
        let slot = (offset - inner.base_offset) as usize;
        inner
            .records
            .get(slot)
            .cloned()
            .ok_or(StorageError::OffsetOutOfRange(offset))
    }

    fn truncate(&self, lowest: Offset) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("memory log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        let new_base = inner.base_offset.max(lowest + 1);
        while inner
            .records
            .front()
            .is_some_and(|record| record.offset() < new_base)
        {
            inner.records.pop_front();
        }
        inner.base_offset = new_base;
        Ok(())
    }

    fn lowest_offset(&self) -> Result<Offset, StorageError> {
        let inner = self.inner.read().expect("memory log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }
        Ok(inner.base_offset)
    }

    fn highest_offset(&self) -> Result<Option<Offset>, StorageError> {
        let inner = self.inner.read().expect("memory log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        if inner.records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(inner.base_offset + (inner.records.len() as u64 - 1)))
        }
    }

    fn close(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("memory log lock poisoned");
        inner.closed = true;
        Ok(())
    }
}
