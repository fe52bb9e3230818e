//! Record type and its on-disk codec.
//!
//! # Payload Format
//!
//! Each record serializes as:
//! ```text
//! [offset:u64][value:bytes][crc32:u32]
//!     8B         variable      4B
//! ```
//!
//! All integers are big-endian. There is no inner length field: the store
//! frame already bounds the payload, so the value spans everything between
//! the offset and the trailing checksum.

use bytes::Bytes;
use shale_types::Offset;

use crate::StorageError;

const OFFSET_SIZE: usize = 8;
const CRC_SIZE: usize = 4;

/// Fixed codec overhead: offset(8) + crc32(4).
const FIXED_SIZE: usize = OFFSET_SIZE + CRC_SIZE;

/// A single record in the commit log.
///
/// Records are immutable once appended. The offset is assigned by the log at
/// append time and embedded in the serialized form, so a record read back
/// from disk knows its own position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    offset: Offset,
    value: Bytes,
}

impl Record {
    pub(crate) fn new(offset: Offset, value: Bytes) -> Self {
        Self { offset, value }
    }

    /// Returns the offset assigned to this record.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Returns the record payload.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Consumes the record, returning its payload.
    pub fn into_value(self) -> Bytes {
        self.value
    }

    /// Serializes the record to bytes.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FIXED_SIZE + self.value.len());

        buf.extend_from_slice(&self.offset.as_u64().to_be_bytes());
        buf.extend_from_slice(&self.value);

        let crc = crc32fast::hash(&buf);
        buf.extend_from_slice(&crc.to_be_bytes());

        buf
    }

    /// Deserializes a record from a full store payload.
    ///
    /// Uses zero-copy slicing for the value via [`Bytes::slice`].
    ///
    /// # Errors
    ///
    /// - [`StorageError::TruncatedRecord`] if the payload cannot hold the
    ///   fixed fields
    /// - [`StorageError::CorruptedRecord`] if the CRC doesn't match
    pub(crate) fn from_bytes(data: &Bytes) -> Result<Self, StorageError> {
        if data.len() < FIXED_SIZE {
            return Err(StorageError::TruncatedRecord {
                expected: FIXED_SIZE,
                actual: data.len(),
            });
        }

        let crc_start = data.len() - CRC_SIZE;
        let stored_crc = u32::from_be_bytes(
            data[crc_start..]
                .try_into()
                .expect("slice is exactly 4 bytes after bounds check"),
        );
        let computed_crc = crc32fast::hash(&data[..crc_start]);
        if stored_crc != computed_crc {
            return Err(StorageError::CorruptedRecord);
        }

        let offset = Offset::new(u64::from_be_bytes(
            data[..OFFSET_SIZE]
                .try_into()
                .expect("slice is exactly 8 bytes after bounds check"),
        ));
        let value = data.slice(OFFSET_SIZE..crc_start);

        Ok(Record { offset, value })
    }
}
