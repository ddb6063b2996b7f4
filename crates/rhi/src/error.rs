//! RHI-specific error types.

use ash::vk;
use thiserror::Error;

use castle_core::SyncError;

/// RHI-specific error type.
#[derive(Error, Debug)]
pub enum RhiError {
    /// Vulkan API error
    #[error("Vulkan error: {0}")]
    VulkanError(#[from] vk::Result),
}

/// Result type alias for RHI operations.
pub type RhiResult<T> = std::result::Result<T, RhiError>;

impl From<RhiError> for SyncError {
    fn from(err: RhiError) -> Self {
        match err {
            RhiError::VulkanError(vk::Result::ERROR_DEVICE_LOST) => SyncError::DeviceLost,
            other => SyncError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_lost_maps_to_sync_error() {
        let err = RhiError::from(vk::Result::ERROR_DEVICE_LOST);
        assert_eq!(SyncError::from(err), SyncError::DeviceLost);
    }

    #[test]
    fn test_other_errors_map_to_backend() {
        let err = RhiError::from(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        assert!(matches!(SyncError::from(err), SyncError::Backend(_)));
    }
}
