//! Timeline-semaphore completion marker for Vulkan.
//!
//! A Vulkan timeline semaphore is exactly the monotonically increasing
//! counter the frame ring compares fence values against:
//!
//! - the queue signals a value after the frame's command buffers
//! - the host reads the counter without blocking
//! - the host can block until the counter reaches a value
//!
//! # Example
//!
//! ```no_run
//! use castle_core::GpuTimeline;
//! use castle_rhi::{TimelineFence, vk};
//!
//! # fn example(device: ash::Device, queue: vk::Queue) -> Result<(), Box<dyn std::error::Error>> {
//! let fence = TimelineFence::new(device, queue)?;
//!
//! // After submitting a frame's command buffers:
//! fence.signal(1)?;
//!
//! // Before reusing that frame's resources:
//! if fence.completed_value()? < 1 {
//!     fence.wait_for(1)?;
//! }
//! # Ok(())
//! # }
//! ```

use ash::vk;
use tracing::debug;

use castle_core::{GpuTimeline, SyncError, SyncResult};

use crate::error::RhiResult;

/// Vulkan timeline semaphore bound to the queue that signals it.
///
/// # Thread Safety
///
/// Counter reads and host waits are thread-safe in Vulkan. Queue submission
/// requires external synchronization of the queue; the frame loop is the only
/// submitter, so [`signal`](GpuTimeline::signal) is called from one thread.
pub struct TimelineFence {
    /// Logical device owning the semaphore.
    device: ash::Device,
    /// Queue the signal operations are submitted to.
    queue: vk::Queue,
    /// Timeline semaphore handle.
    semaphore: vk::Semaphore,
}

impl TimelineFence {
    /// Creates a timeline semaphore with initial value 0.
    ///
    /// # Errors
    ///
    /// Returns an error if semaphore creation fails.
    pub fn new(device: ash::Device, queue: vk::Queue) -> RhiResult<Self> {
        let mut type_info = vk::SemaphoreTypeCreateInfo::default()
            .semaphore_type(vk::SemaphoreType::TIMELINE)
            .initial_value(0);
        let create_info = vk::SemaphoreCreateInfo::default().push_next(&mut type_info);

        let semaphore = unsafe { device.create_semaphore(&create_info, None)? };

        debug!("Created timeline fence");

        Ok(Self {
            device,
            queue,
            semaphore,
        })
    }

    /// Returns the Vulkan semaphore handle.
    #[inline]
    pub fn handle(&self) -> vk::Semaphore {
        self.semaphore
    }

    fn counter_value(&self) -> RhiResult<u64> {
        let value = unsafe { self.device.get_semaphore_counter_value(self.semaphore)? };
        Ok(value)
    }

    fn host_wait(&self, value: u64) -> RhiResult<()> {
        let semaphores = [self.semaphore];
        let values = [value];
        let wait_info = vk::SemaphoreWaitInfo::default()
            .semaphores(&semaphores)
            .values(&values);
        unsafe { self.device.wait_semaphores(&wait_info, u64::MAX)? };
        Ok(())
    }

    fn queue_signal(&self, value: u64) -> RhiResult<()> {
        let semaphores = [self.semaphore];
        let values = [value];
        let mut timeline_info =
            vk::TimelineSemaphoreSubmitInfo::default().signal_semaphore_values(&values);
        let submit_info = vk::SubmitInfo::default()
            .signal_semaphores(&semaphores)
            .push_next(&mut timeline_info);

        unsafe {
            self.device
                .queue_submit(self.queue, &[submit_info], vk::Fence::null())?;
        }
        Ok(())
    }
}

impl GpuTimeline for TimelineFence {
    fn completed_value(&self) -> SyncResult<u64> {
        self.counter_value().map_err(SyncError::from)
    }

    fn wait_for(&self, value: u64) -> SyncResult<()> {
        debug!("Host wait on timeline value {}", value);
        self.host_wait(value).map_err(SyncError::from)
    }

    fn signal(&self, value: u64) -> SyncResult<()> {
        self.queue_signal(value).map_err(SyncError::from)
    }
}

impl Drop for TimelineFence {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_semaphore(self.semaphore, None);
        }
        debug!("Destroyed timeline fence");
    }
}
