//! Constant buffer records read by the shaders.
//!
//! All structures use `#[repr(C)]` and implement `Pod` so they can be copied
//! byte for byte into upload buffers. Matrices are stored transposed, matching
//! the row-major layout the shaders declare.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Required alignment of every constant buffer record.
pub const CONSTANT_BUFFER_ALIGNMENT: usize = 256;

/// Round `byte_size` up to the next multiple of 256.
#[inline]
pub const fn constant_buffer_byte_size(byte_size: usize) -> usize {
    (byte_size + (CONSTANT_BUFFER_ALIGNMENT - 1)) & !(CONSTANT_BUFFER_ALIGNMENT - 1)
}

/// Per-object constants.
///
/// # Memory Layout
///
/// - Offset 0: world matrix (64 bytes)
/// - Total size: 64 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    /// Transposed object-to-world matrix.
    pub world: Mat4,
}

impl Default for ObjectConstants {
    fn default() -> Self {
        Self {
            world: Mat4::IDENTITY,
        }
    }
}

impl ObjectConstants {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Builds the record for an object placed by `world`.
    pub fn from_world(world: Mat4) -> Self {
        Self {
            world: world.transpose(),
        }
    }
}

/// Per-pass constants: camera, viewport and timing.
///
/// # Memory Layout
///
/// - Offset 0: six matrices (384 bytes)
/// - Offset 384: eye position + padding (16 bytes)
/// - Offset 400: render target size and its reciprocal (16 bytes)
/// - Offset 416: near, far, total time, delta time (16 bytes)
/// - Total size: 432 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PassConstants {
    pub view: Mat4,
    pub inv_view: Mat4,
    pub proj: Mat4,
    pub inv_proj: Mat4,
    pub view_proj: Mat4,
    pub inv_view_proj: Mat4,
    pub eye_pos_w: Vec3,
    pub _padding: f32,
    pub render_target_size: Vec2,
    pub inv_render_target_size: Vec2,
    pub near_z: f32,
    pub far_z: f32,
    pub total_time: f32,
    pub delta_time: f32,
}

impl Default for PassConstants {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            inv_view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            inv_proj: Mat4::IDENTITY,
            view_proj: Mat4::IDENTITY,
            inv_view_proj: Mat4::IDENTITY,
            eye_pos_w: Vec3::ZERO,
            _padding: 0.0,
            render_target_size: Vec2::ZERO,
            inv_render_target_size: Vec2::ZERO,
            near_z: 1.0,
            far_z: 1000.0,
            total_time: 0.0,
            delta_time: 0.0,
        }
    }
}

impl PassConstants {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Builds the record from untransposed camera matrices.
    ///
    /// Inverses are derived here and every matrix is transposed on the way in.
    pub fn new(view: Mat4, proj: Mat4, eye_pos_w: Vec3) -> Self {
        let view_proj = proj * view;
        Self {
            view: view.transpose(),
            inv_view: view.inverse().transpose(),
            proj: proj.transpose(),
            inv_proj: proj.inverse().transpose(),
            view_proj: view_proj.transpose(),
            inv_view_proj: view_proj.inverse().transpose(),
            eye_pos_w,
            ..Self::default()
        }
    }

    /// Set the render target size and its reciprocal.
    pub fn with_render_target(mut self, width: u32, height: u32) -> Self {
        let size = Vec2::new(width as f32, height as f32);
        self.render_target_size = size;
        self.inv_render_target_size = Vec2::ONE / size;
        self
    }

    pub fn with_depth_range(mut self, near_z: f32, far_z: f32) -> Self {
        self.near_z = near_z;
        self.far_z = far_z;
        self
    }

    pub fn with_time(mut self, total_time: f32, delta_time: f32) -> Self {
        self.total_time = total_time;
        self.delta_time = delta_time;
        self
    }
}
