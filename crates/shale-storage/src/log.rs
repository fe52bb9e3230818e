//! The commit log: an ordered collection of segments behind one lock.
//!
//! [`SegmentedLog`] routes appends to the active (tail) segment, reads to
//! the segment covering the requested offset, rolls fresh segments when the
//! active one fills, and rebuilds its segment list from the directory
//! contents at startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use bytes::Bytes;
use shale_types::Offset;
use tracing::{debug, warn};

use crate::config::LogConfig;
use crate::record::Record;
use crate::segment::{Segment, INDEX_EXT, STORE_EXT};
use crate::StorageError;

/// The six-operation surface hosts consume the log through.
///
/// Two implementations ship with this crate: [`SegmentedLog`], the durable
/// file-backed engine, and [`InMemoryLog`](crate::InMemoryLog), a volatile
/// stand-in with the same offset semantics for tests and non-durable hosts.
pub trait CommitLog {
    /// Appends `value`, returning the offset it was assigned.
    fn append(&self, value: Bytes) -> Result<Offset, StorageError>;

    /// Reads the record stored at `offset`.
    fn read(&self, offset: Offset) -> Result<Record, StorageError>;

    /// Drops every whole span of records at or below `lowest`. Truncation
    /// is coarse-grained: only spans whose highest record sits at or below
    /// `lowest` are removed.
    fn truncate(&self, lowest: Offset) -> Result<(), StorageError>;

    /// The lowest offset still held.
    fn lowest_offset(&self) -> Result<Offset, StorageError>;

    /// The highest assigned offset, or `None` when the log holds no records.
    fn highest_offset(&self) -> Result<Option<Offset>, StorageError>;

    /// Flushes and releases underlying resources. Subsequent operations fail
    /// with [`StorageError::Closed`]; closing twice is a no-op.
    fn close(&self) -> Result<(), StorageError>;
}

/// Durable, file-backed commit log built from size-bounded segments.
///
/// # Locking
///
/// One readers-writer lock guards the segment list: `append`, `truncate`
/// and `close` take it exclusively, `read` and the offset accessors take it
/// shared. Store files carry their own internal mutex, so concurrent shared
/// readers are safe.
///
/// # Invariants
///
/// - At least one segment exists at all times; the last one is active.
/// - Segment base offsets are strictly increasing and adjacent segments are
///   contiguous: each base offset equals the previous segment's next offset.
#[derive(Debug)]
pub struct SegmentedLog {
    dir: PathBuf,
    config: LogConfig,
    inner: RwLock<LogInner>,
}

#[derive(Debug)]
struct LogInner {
    segments: Vec<Segment>,
    closed: bool,
}

impl SegmentedLog {
    /// Opens the log at `dir`, recovering any segments already on disk.
    ///
    /// Every segment contributes its base offset twice to the directory
    /// listing (once per `.store` and `.index` file); the collected offsets
    /// are sorted and deduplicated before the segments are reopened in
    /// ascending order. A directory without segment files bootstraps a
    /// single empty segment at `config.initial_offset`.
    pub fn open(dir: impl Into<PathBuf>, config: LogConfig) -> Result<Self, StorageError> {
        let dir = dir.into();
        let config = config.normalized();
        fs::create_dir_all(&dir)?;

        let mut base_offsets = Vec::new();
        for dent in fs::read_dir(&dir)? {
            let path = dent?.path();
            match parse_base_offset(&path) {
                Some(base) => base_offsets.push(base),
                None => warn!(path = %path.display(), "skipping foreign file in log directory"),
            }
        }
        base_offsets.sort_unstable();
        base_offsets.dedup();

        let mut segments = Vec::with_capacity(base_offsets.len().max(1));
        for base in base_offsets {
            segments.push(Segment::open(&dir, Offset::new(base), &config)?);
        }
        if segments.is_empty() {
            segments.push(Segment::open(&dir, config.initial_offset, &config)?);
        }

        debug!(dir = %dir.display(), segments = segments.len(), "opened log");

        Ok(Self {
            dir,
            config,
            inner: RwLock::new(LogInner {
                segments,
                closed: false,
            }),
        })
    }

    /// Returns the log directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CommitLog for SegmentedLog {
    fn append(&self, value: Bytes) -> Result<Offset, StorageError> {
        let mut inner = self.inner.write().expect("log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        let active = inner
            .segments
            .last_mut()
            .expect("log holds at least one segment");
        let offset = active.append(value)?;

        // Post-write rollover: the record that crossed the limit stays put,
        // the next append lands in the fresh segment.
        if active.is_maxed() {
            debug!(base_offset = %offset.next(), "rolling new segment");
            let segment = Segment::open(&self.dir, offset.next(), &self.config)?;
            inner.segments.push(segment);
        }

        Ok(offset)
    }

    fn read(&self, offset: Offset) -> Result<Record, StorageError> {
        let inner = self.inner.read().expect("log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        let segment = inner
            .segments
            .iter()
            .find(|segment| segment.contains(offset))
            .ok_or(StorageError::OffsetOutOfRange(offset))?;
        segment.read(offset)
    }

    fn truncate(&self, lowest: Offset) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        let mut retained = Vec::with_capacity(inner.segments.len());
        let mut removed = Vec::new();
        for segment in inner.segments.drain(..) {
            if segment.next_offset() <= lowest + 1 {
                removed.push(segment);
            } else {
                retained.push(segment);
            }
        }
        inner.segments = retained;

        debug_assert!(
            inner
                .segments
                .windows(2)
                .all(|pair| pair[0].next_offset() == pair[1].base_offset()),
            "truncation left an offset gap between segments"
        );

        for segment in removed {
            debug!(base_offset = %segment.base_offset(), "removing truncated segment");
            segment.remove()?;
        }

        if inner.segments.is_empty() {
            // Everything was truncated away; restart at the next offset so
            // the at-least-one-segment invariant holds.
            inner
                .segments
                .push(Segment::open(&self.dir, lowest + 1, &self.config)?);
        }

        Ok(())
    }

    fn lowest_offset(&self) -> Result<Offset, StorageError> {
        let inner = self.inner.read().expect("log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        Ok(inner
            .segments
            .first()
            .expect("log holds at least one segment")
            .base_offset())
    }

    fn highest_offset(&self) -> Result<Option<Offset>, StorageError> {
        let inner = self.inner.read().expect("log lock poisoned");
        if inner.closed {
            return Err(StorageError::Closed);
        }

        let first = inner
            .segments
            .first()
            .expect("log holds at least one segment");
        let last = inner
            .segments
            .last()
            .expect("log holds at least one segment");

        // Offsets are contiguous across segments, so the log is empty
        // exactly when the tail cursor still sits at the head base.
        if last.next_offset() == first.base_offset() {
            Ok(None)
        } else {
            Ok(Some(last.next_offset() - 1))
        }
    }

    fn close(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("log lock poisoned");
        if inner.closed {
            return Ok(());
        }
        inner.closed = true;

        for segment in inner.segments.drain(..) {
            segment.close()?;
        }
        Ok(())
    }
}

/// Extracts the base offset from a segment file name (`<u64>.store` or
/// `<u64>.index`). Anything else is foreign to the log directory.
fn parse_base_offset(path: &Path) -> Option<u64> {
    let ext = path.extension()?.to_str()?;
    if ext != STORE_EXT && ext != INDEX_EXT {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}
