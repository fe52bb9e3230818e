//! # shale-types: Core types for Shale
//!
//! This crate contains the shared types used across the Shale commit log:
//! - [`Offset`]: the logical position of a record within a log

use std::fmt::Display;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Logical position of a record within the log.
///
/// Offsets are dense and monotonically increasing: the first record appended
/// to a fresh log sits at the configured initial offset, and every subsequent
/// append takes the next integer. An offset identifies a record for the
/// lifetime of the log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Offset(u64);

impl Offset {
    pub const ZERO: Offset = Offset(0);

    pub fn new(offset: u64) -> Self {
        Self(offset)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The offset immediately after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Advancing an offset by a record count yields an offset.
impl Add<u64> for Offset {
    type Output = Offset;

    fn add(self, rhs: u64) -> Self::Output {
        Offset(self.0 + rhs)
    }
}

/// Stepping an offset back by a record count yields an offset.
impl Sub<u64> for Offset {
    type Output = Offset;

    fn sub(self, rhs: u64) -> Self::Output {
        debug_assert!(self.0 >= rhs, "offset underflow: {} - {}", self.0, rhs);
        Offset(self.0 - rhs)
    }
}

/// The distance between two offsets is a plain record count.
impl Sub for Offset {
    type Output = u64;

    fn sub(self, rhs: Self) -> Self::Output {
        debug_assert!(
            self.0 >= rhs.0,
            "offset distance underflow: {} - {}",
            self.0,
            rhs.0
        );
        self.0 - rhs.0
    }
}

impl From<u64> for Offset {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Offset> for u64 {
    fn from(offset: Offset) -> Self {
        offset.0
    }
}

#[cfg(test)]
mod tests;
