//! Core utilities for the castle renderer.
//!
//! This crate provides foundational types and utilities used across the workspace:
//! - Error types and result aliases
//! - The [`GpuTimeline`] abstraction over GPU completion markers
//! - Logging initialization
//! - Frame timing
//! - Configuration management

mod config;
mod error;
mod logging;
mod timeline;
mod timer;

pub use config::RenderConfig;
pub use error::{Error, Result, SyncError, SyncResult};
pub use logging::init_logging;
pub use timeline::{GpuTimeline, ManualTimeline};
pub use timer::GameTimer;

/// Default number of frame resources (triple buffering).
pub const DEFAULT_FRAME_RESOURCES: usize = 3;
