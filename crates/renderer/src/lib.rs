//! Frame-resource pipeline for the castle renderer.
//!
//! This crate keeps CPU-side constant data buffered against in-flight GPU work:
//! - Constant buffer records and upload buffers
//! - The frame resource ring and its fence protocol
//! - Descriptor heap layout
//! - The per-frame update pass and draw list emission

pub mod constants;
pub mod draw;
pub mod error;
pub mod frame_resource;
pub mod frame_ring;
pub mod layout;
pub mod render_item;
pub mod scene_context;
pub mod update;
pub mod upload_buffer;

pub use constants::{ObjectConstants, PassConstants, constant_buffer_byte_size};
pub use draw::{DrawCommand, FrameDrawList, PipelineMode, build_draw_list};
pub use error::{FrameError, FrameResult};
pub use frame_resource::{CommandAllocator, FrameResource};
pub use frame_ring::FrameRing;
pub use layout::{CbvHeap, CbvLayout, ConstantBufferView};
pub use render_item::{PrimitiveTopology, RenderItem};
pub use scene_context::SceneContext;
pub use update::{
    FrameUpdater, PreparedFrame, Viewport, build_pass_constants, copy_if_dirty,
    write_pass_constants,
};
pub use upload_buffer::UploadBuffer;
