//! Error types for the renderer.

use thiserror::Error;

/// Errors raised while synchronizing with the GPU timeline.
///
/// Both variants are fatal: once the GPU timeline is gone every in-flight
/// frame resource is invalid, so callers propagate these instead of retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The device was lost or removed while the CPU was waiting on it.
    #[error("GPU device lost")]
    DeviceLost,

    /// Backend-specific failure while querying, waiting on or signaling a fence.
    #[error("Timeline backend error: {0}")]
    Backend(String),
}

/// Result type alias for timeline operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Main error type for the renderer.
#[derive(Error, Debug)]
pub enum Error {
    /// GPU synchronization errors
    #[error("Synchronization error: {0}")]
    Sync(#[from] SyncError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the renderer's Error type.
pub type Result<T> = std::result::Result<T, Error>;
