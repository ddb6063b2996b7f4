//! Ring of frame resources synchronized against the GPU timeline.
//!
//! The ring implements the "frames in flight" pattern: while the GPU works
//! through the submissions of up to N-1 earlier frames, the CPU fills the next
//! slot. Each slot remembers the fence value its last submission signals, and
//! the ring refuses to hand a slot back out until the timeline has reached it.
//!
//! ```text
//! advance()            -> wait until slot.fence retired, reset allocator
//! copy_if_dirty(..)    -> settle object records
//! write_pass_constants -> settle pass record
//! signal_submission()  -> current_fence += 1, slot.fence = current_fence
//! ```

use tracing::{debug, error, info};

use castle_core::{GpuTimeline, SyncError};

use crate::error::{FrameError, FrameResult};
use crate::frame_resource::FrameResource;
use crate::layout::CbvLayout;

/// Fixed-size ring of [`FrameResource`] slots.
///
/// A slot can only be written through the `&mut` returned by
/// [`advance`](Self::advance). Once submitted, the slot is read-only until the
/// ring comes back around to it:
///
/// ```compile_fail
/// use castle_core::ManualTimeline;
/// use castle_renderer::{FrameRing, RenderItem, copy_if_dirty};
/// use glam::Mat4;
///
/// let mut ring = FrameRing::new(2, 1, ManualTimeline::new()).unwrap();
/// ring.advance().unwrap();
/// ring.signal_submission().unwrap();
///
/// let mut item = RenderItem::new("box", "box", Mat4::IDENTITY, 0, 2);
/// copy_if_dirty(ring.current(), &mut item).unwrap();
/// ```
///
/// # Thread Safety
///
/// The ring is driven by a single thread. Only the timeline is shared with
/// whoever completes GPU work.
pub struct FrameRing<T: GpuTimeline> {
    slots: Vec<FrameResource>,
    current: usize,
    /// Last fence value handed out.
    current_fence: u64,
    object_count: usize,
    timeline: T,
}

impl<T: GpuTimeline> FrameRing<T> {
    /// Creates `frame_count` slots, each holding `object_count` object records.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidFrameCount`] if `frame_count < 2`.
    pub fn new(frame_count: usize, object_count: usize, timeline: T) -> FrameResult<Self> {
        if frame_count < 2 {
            error!(frame_count, "Frame ring needs at least two slots");
            return Err(FrameError::InvalidFrameCount(frame_count));
        }

        let slots = (0..frame_count)
            .map(|_| FrameResource::new(object_count))
            .collect();

        info!(frame_count, object_count, "Frame ring created");

        Ok(Self {
            slots,
            // The first advance lands on slot 0.
            current: frame_count - 1,
            current_fence: 0,
            object_count,
            timeline,
        })
    }

    fn retired(&self, fence: u64) -> FrameResult<bool> {
        if fence == 0 {
            return Ok(true);
        }
        Ok(self.timeline.completed_value()? >= fence)
    }

    /// Moves to the next slot and returns it once the GPU has released it.
    ///
    /// Blocks without a timeout while the slot's previous submission is still
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Sync`] if the timeline fails. Device loss is fatal.
    pub fn advance(&mut self) -> FrameResult<&mut FrameResource> {
        self.current = (self.current + 1) % self.slots.len();
        let fence = self.slots[self.current].fence;

        if !self.retired(fence)? {
            debug!(slot = self.current, fence, "Waiting for GPU to release frame resource");
            self.timeline.wait_for(fence).inspect_err(|e| {
                if *e == SyncError::DeviceLost {
                    error!(slot = self.current, fence, "Device lost while waiting on frame resource");
                }
            })?;
        }

        let slot = &mut self.slots[self.current];
        slot.command_allocator.reset();
        Ok(slot)
    }

    /// Marks the current slot as submitted and signals a new fence value.
    ///
    /// Call once the current slot's commands have been handed to the queue.
    pub fn signal_submission(&mut self) -> FrameResult<u64> {
        self.current_fence += 1;
        let fence = self.current_fence;
        self.slots[self.current].fence = fence;
        self.timeline.signal(fence)?;
        debug!(slot = self.current, fence, "Frame submitted");
        Ok(fence)
    }

    /// Whether the next [`advance`](Self::advance) would return without waiting.
    pub fn is_next_slot_ready(&self) -> FrameResult<bool> {
        let next = (self.current + 1) % self.slots.len();
        self.retired(self.slots[next].fence)
    }

    /// Number of slots whose last submission the GPU has not finished.
    pub fn frames_in_flight(&self) -> FrameResult<usize> {
        let completed = self.timeline.completed_value()?;
        Ok(self
            .slots
            .iter()
            .filter(|slot| slot.fence != 0 && completed < slot.fence)
            .count())
    }

    /// Waits until every submitted frame has been retired.
    ///
    /// Fence values are monotonic, so waiting on the last one covers all slots.
    pub fn flush(&self) -> FrameResult<()> {
        if !self.retired(self.current_fence)? {
            info!(fence = self.current_fence, "Flushing frame ring");
            self.timeline.wait_for(self.current_fence)?;
        }
        Ok(())
    }

    /// Returns the index of the slot returned by the last [`advance`](Self::advance).
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Returns a read-only view of the current slot.
    ///
    /// Writable access only comes from [`advance`](Self::advance), after the
    /// slot has been retired.
    #[inline]
    pub fn current(&self) -> &FrameResource {
        &self.slots[self.current]
    }

    /// Slot `index`, if it exists.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<&FrameResource> {
        self.slots.get(index)
    }

    /// Iterates over all slots in ring order.
    pub fn slots(&self) -> impl Iterator<Item = &FrameResource> {
        self.slots.iter()
    }

    /// Last fence value handed out; 0 before the first submission.
    #[inline]
    pub fn current_fence(&self) -> u64 {
        self.current_fence
    }

    /// Returns the number of slots (frames in flight).
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of object records in each slot.
    #[inline]
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Descriptor layout matching this ring.
    #[inline]
    pub fn layout(&self) -> CbvLayout {
        CbvLayout::new(self.slots.len(), self.object_count)
    }

    /// Returns the GPU timeline the fences are signaled on.
    #[inline]
    pub fn timeline(&self) -> &T {
        &self.timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castle_core::ManualTimeline;
    use std::sync::Arc;

    fn ring(frame_count: usize) -> (FrameRing<Arc<ManualTimeline>>, Arc<ManualTimeline>) {
        let timeline = Arc::new(ManualTimeline::new());
        let ring = FrameRing::new(frame_count, 4, timeline.clone()).unwrap();
        (ring, timeline)
    }

    #[test]
    fn test_rejects_single_slot() {
        let timeline = ManualTimeline::new();
        assert!(matches!(
            FrameRing::new(1, 4, timeline),
            Err(FrameError::InvalidFrameCount(1))
        ));
    }

    #[test]
    fn test_first_advance_yields_slot_zero() {
        let (mut ring, _) = ring(3);
        ring.advance().unwrap();
        assert_eq!(ring.current_index(), 0);
    }

    #[test]
    fn test_cycles_through_slots() {
        let (mut ring, timeline) = ring(3);
        let mut visited = Vec::new();
        for _ in 0..6 {
            ring.advance().unwrap();
            visited.push(ring.current_index());
            ring.signal_submission().unwrap();
            timeline.complete_all();
        }
        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(timeline.blocking_waits(), 0);
    }

    #[test]
    fn test_fences_are_sequential() {
        let (mut ring, timeline) = ring(2);
        ring.advance().unwrap();
        assert_eq!(ring.signal_submission().unwrap(), 1);
        ring.advance().unwrap();
        assert_eq!(ring.signal_submission().unwrap(), 2);
        assert_eq!(ring.slot(0).unwrap().fence(), 1);
        assert_eq!(ring.slot(1).unwrap().fence(), 2);
        assert_eq!(timeline.signaled_value(), 2);
    }

    #[test]
    fn test_readiness_and_in_flight() {
        let (mut ring, timeline) = ring(2);
        ring.advance().unwrap();
        ring.signal_submission().unwrap();
        ring.advance().unwrap();
        ring.signal_submission().unwrap();

        assert_eq!(ring.frames_in_flight().unwrap(), 2);
        assert!(!ring.is_next_slot_ready().unwrap());

        timeline.complete(1);
        assert_eq!(ring.frames_in_flight().unwrap(), 1);
        assert!(ring.is_next_slot_ready().unwrap());
    }

    #[test]
    fn test_allocator_reset_on_each_reuse() {
        let (mut ring, timeline) = ring(2);
        for _ in 0..4 {
            ring.advance().unwrap();
            ring.signal_submission().unwrap();
            timeline.complete_all();
        }
        assert_eq!(ring.slot(0).unwrap().command_allocator().reset_count(), 2);
        assert_eq!(ring.slot(1).unwrap().command_allocator().reset_count(), 2);
    }

    #[test]
    fn test_device_lost_is_reported() {
        let (mut ring, timeline) = ring(2);
        for _ in 0..2 {
            ring.advance().unwrap();
            ring.signal_submission().unwrap();
        }
        timeline.lose_device();
        assert!(matches!(
            ring.advance(),
            Err(FrameError::Sync(SyncError::DeviceLost))
        ));
    }

    #[test]
    fn test_flush_with_nothing_submitted() {
        let (ring, timeline) = ring(3);
        ring.flush().unwrap();
        assert_eq!(timeline.blocking_waits(), 0);
    }
}
