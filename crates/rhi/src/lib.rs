//! Vulkan backend pieces (Render Hardware Interface).
//!
//! The frame-resource core only needs one thing from a real GPU backend: a
//! completion marker it can compare against. This crate provides it on top
//! of a Vulkan 1.2 timeline semaphore using the `ash` crate.

mod error;

pub mod sync;

pub use error::{RhiError, RhiResult};
pub use sync::TimelineFence;

// Re-export ash types that users might need
pub use ash::vk;
