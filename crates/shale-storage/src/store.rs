//! Append-only store file: the byte-level half of a segment.
//!
//! # Frame Format
//!
//! ```text
//! [length:u64][payload:bytes]
//!     8B         variable
//! ```
//!
//! The length is big-endian and counts only the payload. There is no header,
//! footer, or per-frame checksum; recovery relies solely on every append
//! writing `8 + length` contiguous bytes.

use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::sync::Mutex;

use bytes::Bytes;

use crate::StorageError;

/// Width of the length prefix framing every payload.
const LEN_WIDTH: u64 = 8;

/// Append-only file of length-prefixed payloads with a write buffer.
///
/// All operations serialize on an internal mutex: a read must flush the
/// write buffer before touching the file, and a flush racing a concurrent
/// append would corrupt the framing.
#[derive(Debug)]
pub(crate) struct Store {
    inner: Mutex<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    writer: BufWriter<File>,
    size: u64,
}

impl Store {
    /// Wraps an open store file, resuming `size` from the file length.
    pub(crate) fn new(file: File) -> Result<Self, StorageError> {
        let size = file.metadata()?.len();
        Ok(Self {
            inner: Mutex::new(StoreInner {
                writer: BufWriter::new(file),
                size,
            }),
        })
    }

    /// Appends one framed payload.
    ///
    /// Returns the number of bytes added (including the length prefix) and
    /// the byte position the frame starts at. The prefix and payload go to
    /// the writer as a single buffered call, so `size` never advances past a
    /// partially accepted frame.
    pub(crate) fn append(&self, payload: &[u8]) -> Result<(u64, u64), StorageError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");

        let position = inner.size;
        let mut frame = Vec::with_capacity(LEN_WIDTH as usize + payload.len());
        frame.extend_from_slice(&(payload.len() as u64).to_be_bytes());
        frame.extend_from_slice(payload);
        inner.writer.write_all(&frame)?;

        let written = frame.len() as u64;
        inner.size += written;
        Ok((written, position))
    }

    /// Reads the framed payload starting at `position`.
    ///
    /// Flushes the write buffer first so a just-appended frame is visible.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnexpectedEof`] if the file is shorter than
    /// the frame requires.
    pub(crate) fn read(&self, position: u64) -> Result<Bytes, StorageError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.writer.flush()?;

        // The file was opened with append mode, so the explicit seek below
        // never disturbs where subsequent writes land.
        let file = inner.writer.get_mut();
        file.seek(SeekFrom::Start(position))?;

        let mut len_buf = [0u8; LEN_WIDTH as usize];
        file.read_exact(&mut len_buf).map_err(eof)?;
        let len = u64::from_be_bytes(len_buf);

        let mut payload = vec![0u8; len as usize];
        file.read_exact(&mut payload).map_err(eof)?;

        Ok(Bytes::from(payload))
    }

    /// Current size in bytes, counting buffered but unflushed frames.
    pub(crate) fn size(&self) -> u64 {
        self.inner.lock().expect("store mutex poisoned").size
    }

    /// Flushes the write buffer and syncs the file to stable storage.
    ///
    /// The file handle itself closes when the store is dropped.
    pub(crate) fn close(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.writer.flush()?;
        inner.writer.get_ref().sync_all()?;
        Ok(())
    }
}

fn eof(err: io::Error) -> StorageError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => StorageError::UnexpectedEof,
        _ => StorageError::Io(err),
    }
}
