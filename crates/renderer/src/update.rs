//! Per-frame update pass: settle one frame resource before recording.

use tracing::{debug, trace};

use castle_core::{GameTimer, GpuTimeline};
use castle_scene::OrbitCamera;

use crate::constants::{ObjectConstants, PassConstants};
use crate::error::FrameResult;
use crate::frame_resource::FrameResource;
use crate::frame_ring::FrameRing;
use crate::render_item::RenderItem;
use crate::scene_context::SceneContext;

/// Render target dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Writes `item`'s constants into `slot` if the slot has not seen them yet.
///
/// Returns whether a record was written. The dirty count only drops after a
/// successful write.
pub fn copy_if_dirty(slot: &mut FrameResource, item: &mut RenderItem) -> FrameResult<bool> {
    if item.dirty_frames == 0 {
        return Ok(false);
    }

    let constants = ObjectConstants::from_world(item.world);
    slot.object_cb.copy_data(item.cb_index(), &constants)?;
    item.dirty_frames -= 1;
    trace!(
        item = item.name(),
        cb_index = item.cb_index(),
        remaining = item.dirty_frames,
        "Copied object constants"
    );
    Ok(true)
}

/// Overwrites the slot's pass record.
pub fn write_pass_constants(slot: &mut FrameResource, pass: &PassConstants) -> FrameResult<()> {
    slot.pass_cb.copy_data(0, pass)
}

/// Builds the pass record for `camera` rendering into `viewport`.
pub fn build_pass_constants(
    camera: &OrbitCamera,
    viewport: Viewport,
    timer: &GameTimer,
) -> PassConstants {
    PassConstants::new(
        camera.view_matrix(),
        camera.projection_matrix(),
        camera.eye_position(),
    )
    .with_render_target(viewport.width, viewport.height)
    .with_depth_range(camera.near, camera.far)
    .with_time(timer.total_time(), timer.delta_time())
}

/// Outcome of one update pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreparedFrame {
    /// Slot that was settled.
    pub slot: usize,
    /// Fence the slot had to be retired past before writing; 0 if never used.
    pub fence_to_wait: u64,
    /// Object records rewritten this frame.
    pub objects_written: usize,
}

/// Drives the per-frame update sequence.
#[derive(Debug, Default)]
pub struct FrameUpdater {
    frames_prepared: u64,
}

impl FrameUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the next slot and settles its object and pass records.
    ///
    /// May block in [`FrameRing::advance`] until the GPU releases the slot.
    pub fn update<T: GpuTimeline>(
        &mut self,
        ring: &mut FrameRing<T>,
        scene: &mut SceneContext,
        timer: &GameTimer,
        viewport: Viewport,
    ) -> FrameResult<PreparedFrame> {
        let slot = ring.advance()?;
        let fence_to_wait = slot.fence();

        let mut objects_written = 0;
        for item in &mut scene.items {
            if copy_if_dirty(slot, item)? {
                objects_written += 1;
            }
        }

        let pass = build_pass_constants(&scene.camera, viewport, timer);
        write_pass_constants(slot, &pass)?;

        self.frames_prepared += 1;
        let prepared = PreparedFrame {
            slot: ring.current_index(),
            fence_to_wait,
            objects_written,
        };
        debug!(
            frame = self.frames_prepared,
            slot = prepared.slot,
            objects_written,
            "Frame resource settled"
        );
        Ok(prepared)
    }

    /// Number of successful [`update`](Self::update) calls.
    #[inline]
    pub fn frames_prepared(&self) -> u64 {
        self.frames_prepared
    }
}
