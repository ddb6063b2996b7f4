//! Error types for the frame-resource pipeline.

use castle_core::SyncError;
use thiserror::Error;

/// Error type for frame preparation.
///
/// None of these are retried: a capacity or layout fault is a programming
/// error and a synchronization fault means the device is gone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Waiting on, querying or signaling the GPU timeline failed.
    #[error("Synchronization error: {0}")]
    Sync(#[from] SyncError),

    /// A record index lies outside an upload buffer.
    #[error("Constant buffer index {index} out of range (capacity {capacity})")]
    CapacityExceeded {
        /// Index that was written or read.
        index: usize,
        /// Number of records the buffer holds.
        capacity: usize,
    },

    /// The ring needs at least two frame resources.
    #[error("Invalid frame resource count {0}: at least 2 are required")]
    InvalidFrameCount(usize),

    /// A render item refers to a mesh missing from the catalog.
    #[error("Unknown geometry '{0}'")]
    UnknownGeometry(String),

    /// Descriptor layout and frame ring disagree on the object count.
    #[error("Object count mismatch: layout has {expected}, ring has {actual}")]
    ObjectCountMismatch {
        /// Object count the descriptor layout was built for.
        expected: usize,
        /// Object count of the frame ring.
        actual: usize,
    },
}

/// Result type alias for frame operations.
pub type FrameResult<T> = Result<T, FrameError>;
