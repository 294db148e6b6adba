//! Fixed-size batching for size-limited persistence.

use std::fmt;
use std::num::NonZeroUsize;

use crate::{CoreError, Result};

/// Maximum items per persisted batch. Zero is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkSize(NonZeroUsize);

impl ChunkSize {
    pub fn new(size: usize) -> Result<Self> {
        NonZeroUsize::new(size).map(Self).ok_or(CoreError::InvalidChunkSize(size))
    }

    #[must_use]
    pub const fn from_non_zero(size: NonZeroUsize) -> Self {
        Self(size)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// The smaller of two limits.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if other.get() < self.get() { other } else { self }
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Split `items` into ordered contiguous slices of `size`; the last slice
/// holds the remainder. Empty input yields no chunks.
///
/// # Errors
/// Returns [`CoreError::InvalidChunkSize`] when `size` is zero.
pub fn chunk<T>(items: &[T], size: usize) -> Result<Vec<&[T]>> {
    let size = ChunkSize::new(size)?;
    Ok(chunks_of(items, size))
}

/// Infallible variant for an already validated size.
#[must_use]
pub fn chunks_of<T>(items: &[T], size: ChunkSize) -> Vec<&[T]> {
    items.chunks(size.get()).collect()
}
