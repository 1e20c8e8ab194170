//! Error types for the wind query engine.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while opening a dataset file.
///
/// None of these are recoverable; a failed open yields no usable handle.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file does not exist.
    #[error("dataset file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be opened or inspected.
    #[error("failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    /// The file length does not match the fixed dataset shape.
    #[error("dataset file is {actual} bytes, expected exactly {expected}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// The operating system refused the read-only mapping.
    #[error("failed to map dataset file: {0}")]
    MapFailed(std::io::Error),
}

/// Recoverable wind-query failures.
///
/// These are normal outcomes near the dataset's spatial and temporal edges,
/// not defects; callers should treat the point as outside coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The horizontal position falls outside the grid.
    #[error("query point outside the horizontal grid")]
    OutOfGrid,

    /// The timestamp is before the first or at/after the last time slice.
    #[error("query time outside the dataset's temporal coverage")]
    OutOfTimeRange,
}
