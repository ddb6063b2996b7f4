//! Resources owned by a single frame in flight.

use crate::constants::{ObjectConstants, PassConstants};
use crate::upload_buffer::UploadBuffer;

/// Command-recording memory for one frame.
///
/// Resetting is only legal once the GPU has finished every command list
/// recorded from it, so the ring resets it right after retiring the slot.
#[derive(Debug, Default)]
pub struct CommandAllocator {
    resets: u64,
}

impl CommandAllocator {
    pub fn reset(&mut self) {
        self.resets += 1;
    }

    /// Number of times the allocator was recycled.
    #[inline]
    pub fn reset_count(&self) -> u64 {
        self.resets
    }
}

/// Per-frame data the CPU writes while the GPU may still read other slots.
///
/// ```text
/// 1. Ring advances onto this slot and waits until `fence` is retired
/// 2. Dirty object records and the pass record are rewritten
/// 3. Commands are recorded and submitted
/// 4. The submission signals a new `fence`
/// ```
pub struct FrameResource {
    pub(crate) command_allocator: CommandAllocator,
    /// Fence value of the last submission that used this slot; 0 if none.
    pub(crate) fence: u64,
    pub(crate) object_cb: UploadBuffer<ObjectConstants>,
    pub(crate) pass_cb: UploadBuffer<PassConstants>,
}

impl FrameResource {
    /// Creates a slot with room for `object_count` object records.
    pub fn new(object_count: usize) -> Self {
        Self {
            command_allocator: CommandAllocator::default(),
            fence: 0,
            object_cb: UploadBuffer::new(object_count),
            pass_cb: UploadBuffer::new(1),
        }
    }

    #[inline]
    pub fn fence(&self) -> u64 {
        self.fence
    }

    #[inline]
    pub fn command_allocator(&self) -> &CommandAllocator {
        &self.command_allocator
    }

    #[inline]
    pub fn object_constants(&self) -> &UploadBuffer<ObjectConstants> {
        &self.object_cb
    }

    #[inline]
    pub fn pass_constants(&self) -> &UploadBuffer<PassConstants> {
        &self.pass_cb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_never_submitted() {
        let slot = FrameResource::new(5);
        assert_eq!(slot.fence(), 0);
        assert_eq!(slot.object_constants().element_count(), 5);
        assert_eq!(slot.pass_constants().element_count(), 1);
        assert_eq!(slot.command_allocator().reset_count(), 0);
    }

    #[test]
    fn test_frame_resource_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<FrameResource>();
    }
}
