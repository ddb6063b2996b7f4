//! Descriptor heap layout for the per-frame constant buffer views.
//!
//! All views of all frame resources live in one heap:
//!
//! ```text
//! [ frame 0 objects | frame 1 objects | ... | frame N-1 objects | pass 0 | ... | pass N-1 ]
//! ```

use tracing::debug;

use castle_core::GpuTimeline;

use crate::error::{FrameError, FrameResult};
use crate::frame_ring::FrameRing;

/// Pure index arithmetic over the descriptor heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CbvLayout {
    pub frame_count: usize,
    pub object_count: usize,
}

impl CbvLayout {
    pub const fn new(frame_count: usize, object_count: usize) -> Self {
        Self {
            frame_count,
            object_count,
        }
    }

    fn check_frame(&self, frame: usize) -> FrameResult<()> {
        if frame >= self.frame_count {
            return Err(FrameError::CapacityExceeded {
                index: frame,
                capacity: self.frame_count,
            });
        }
        Ok(())
    }

    /// Heap index of object `cb_index` in frame `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::CapacityExceeded`] if `frame` or `cb_index` is out
    /// of range; such an index would alias another record.
    pub fn object_index(&self, frame: usize, cb_index: usize) -> FrameResult<usize> {
        self.check_frame(frame)?;
        if cb_index >= self.object_count {
            return Err(FrameError::CapacityExceeded {
                index: cb_index,
                capacity: self.object_count,
            });
        }
        Ok(frame * self.object_count + cb_index)
    }

    /// First heap index of the pass views.
    #[inline]
    pub const fn pass_offset(&self) -> usize {
        self.frame_count * self.object_count
    }

    /// Heap index of frame `frame`'s pass view.
    pub fn pass_index(&self, frame: usize) -> FrameResult<usize> {
        self.check_frame(frame)?;
        Ok(self.pass_offset() + frame)
    }

    /// Total number of views in the heap.
    #[inline]
    pub const fn descriptor_count(&self) -> usize {
        (self.object_count + 1) * self.frame_count
    }

    /// Byte offset of heap entry `index` given the device's descriptor increment.
    #[inline]
    pub const fn byte_offset(index: usize, increment_size: usize) -> usize {
        index * increment_size
    }
}

/// Constant buffer view: a GPU address and a 256-byte aligned size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantBufferView {
    pub buffer_location: u64,
    pub size_in_bytes: u32,
}

/// Descriptor heap filled with a view for every record of every frame resource.
#[derive(Debug)]
pub struct CbvHeap {
    layout: CbvLayout,
    views: Vec<ConstantBufferView>,
}

impl CbvHeap {
    /// Creates the views for all slots of `ring`, in [`CbvLayout`] order.
    pub fn build<T: GpuTimeline>(ring: &FrameRing<T>) -> Self {
        let layout = ring.layout();
        let mut views = Vec::with_capacity(layout.descriptor_count());

        for slot in ring.slots() {
            let buffer = slot.object_constants();
            for i in 0..layout.object_count {
                views.push(ConstantBufferView {
                    buffer_location: buffer.base_address() + (i * buffer.stride()) as u64,
                    size_in_bytes: buffer.stride() as u32,
                });
            }
        }

        for slot in ring.slots() {
            let buffer = slot.pass_constants();
            views.push(ConstantBufferView {
                buffer_location: buffer.base_address(),
                size_in_bytes: buffer.stride() as u32,
            });
        }

        debug!(descriptors = views.len(), "Built constant buffer view heap");
        Self { layout, views }
    }

    #[inline]
    pub fn layout(&self) -> CbvLayout {
        self.layout
    }

    /// View stored at heap entry `index`.
    pub fn view(&self, index: usize) -> Option<&ConstantBufferView> {
        self.views.get(index)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castle_layout() {
        let layout = CbvLayout::new(3, 34);
        assert_eq!(layout.object_index(0, 0), Ok(0));
        assert_eq!(layout.object_index(2, 5), Ok(73));
        assert_eq!(layout.pass_offset(), 102);
        assert_eq!(layout.pass_index(2), Ok(104));
        assert_eq!(layout.descriptor_count(), 105);
    }

    #[test]
    fn test_out_of_range_indices_rejected() {
        let layout = CbvLayout::new(3, 2);

        // Would alias object 0 of frame 1.
        assert_eq!(
            layout.object_index(0, 2),
            Err(FrameError::CapacityExceeded {
                index: 2,
                capacity: 2
            })
        );
        // Would alias the pass view of frame 0.
        assert_eq!(
            layout.object_index(3, 0),
            Err(FrameError::CapacityExceeded {
                index: 3,
                capacity: 3
            })
        );
        // Would land past the end of the heap.
        assert_eq!(
            layout.pass_index(5),
            Err(FrameError::CapacityExceeded {
                index: 5,
                capacity: 3
            })
        );
        assert_eq!(layout.object_index(2, 1), Ok(5));
        assert_eq!(layout.pass_index(2), Ok(layout.descriptor_count() - 1));
    }

    #[test]
    fn test_byte_offset() {
        assert_eq!(CbvLayout::byte_offset(7, 32), 224);
    }
}
