//! Drawable objects and their per-frame dirty tracking.

use glam::Mat4;

/// How the index buffer region is assembled into primitives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrimitiveTopology {
    #[default]
    TriangleList,
}

/// One drawable instance of a catalog mesh.
///
/// Every frame resource keeps its own copy of the object's constants. A
/// change to the world matrix therefore has to be written into each of the N
/// slots, which is what `dirty_frames` counts down.
#[derive(Clone, Debug)]
pub struct RenderItem {
    name: String,
    pub(crate) world: Mat4,
    pub(crate) dirty_frames: usize,
    /// Ring depth; every world change re-arms `dirty_frames` to it.
    frame_count: usize,
    cb_index: usize,
    geometry: String,
    topology: PrimitiveTopology,
}

impl RenderItem {
    /// Creates an item that still has to be written into all `frame_count` slots.
    pub fn new(
        name: impl Into<String>,
        geometry: impl Into<String>,
        world: Mat4,
        cb_index: usize,
        frame_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            world,
            dirty_frames: frame_count,
            frame_count,
            cb_index,
            geometry: geometry.into(),
            topology: PrimitiveTopology::TriangleList,
        }
    }

    /// Moves the object; every slot has to pick the new matrix up again.
    pub fn set_world(&mut self, world: Mat4) {
        self.world = world;
        self.dirty_frames = self.frame_count;
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Slots that have not received the current world matrix yet.
    #[inline]
    pub fn dirty_frames(&self) -> usize {
        self.dirty_frames
    }

    /// Ring depth the item re-arms to.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Index of this object's record in every slot's object buffer.
    #[inline]
    pub fn cb_index(&self) -> usize {
        self.cb_index
    }

    /// Catalog key of the mesh to draw.
    #[inline]
    pub fn geometry(&self) -> &str {
        &self.geometry
    }

    #[inline]
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }
}
