//! Draw list emission for a settled frame resource.
//!
//! The list carries everything a command recorder needs: which pipeline to
//! bind, which descriptor holds the pass constants, and one indexed draw per
//! render item addressing its region of the merged geometry buffers.

use tracing::{error, trace};

use castle_core::GpuTimeline;

use crate::error::{FrameError, FrameResult};
use crate::frame_ring::FrameRing;
use crate::layout::CbvLayout;
use crate::render_item::PrimitiveTopology;
use crate::scene_context::SceneContext;

/// Pipeline state used for the whole frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineMode {
    #[default]
    Opaque,
    Wireframe,
}

impl PipelineMode {
    /// Selects the pipeline from the wireframe toggle state.
    pub fn from_wireframe(wireframe: bool) -> Self {
        if wireframe {
            Self::Wireframe
        } else {
            Self::Opaque
        }
    }
}

/// One indexed draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    /// Heap index of the object's constant buffer view in this frame.
    pub object_descriptor: usize,
    /// GPU address of the object's constant record.
    pub object_constants_address: u64,
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
    pub instance_count: u32,
    pub topology: PrimitiveTopology,
}

/// Commands for one frame, in render item order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameDrawList {
    pub frame_index: usize,
    pub pipeline: PipelineMode,
    /// Heap index of the frame's pass constant buffer view.
    pub pass_descriptor: usize,
    pub pass_constants_address: u64,
    pub draws: Vec<DrawCommand>,
}

/// Builds the draw list for the ring's current slot.
///
/// # Errors
///
/// - [`FrameError::ObjectCountMismatch`] if `layout` was built for another ring
/// - [`FrameError::UnknownGeometry`] if an item's mesh is not in the catalog
/// - [`FrameError::CapacityExceeded`] if an item's record lies outside the slot
pub fn build_draw_list<T: GpuTimeline>(
    ring: &FrameRing<T>,
    layout: &CbvLayout,
    scene: &SceneContext,
    pipeline: PipelineMode,
) -> FrameResult<FrameDrawList> {
    if layout.object_count != ring.object_count() || layout.frame_count != ring.frame_count() {
        return Err(FrameError::ObjectCountMismatch {
            expected: layout.object_count,
            actual: ring.object_count(),
        });
    }

    let frame_index = ring.current_index();
    let slot = ring.current();

    let draws = scene
        .items
        .iter()
        .map(|item| -> FrameResult<DrawCommand> {
            let region = scene.catalog.region(item.geometry()).ok_or_else(|| {
                error!(item = item.name(), geometry = item.geometry(), "Unknown geometry");
                FrameError::UnknownGeometry(item.geometry().to_string())
            })?;

            Ok(DrawCommand {
                object_descriptor: layout.object_index(frame_index, item.cb_index())?,
                object_constants_address: slot.object_constants().address_of(item.cb_index())?,
                index_count: region.index_count,
                start_index: region.start_index,
                base_vertex: region.base_vertex,
                instance_count: 1,
                topology: item.topology(),
            })
        })
        .collect::<FrameResult<Vec<_>>>()?;

    trace!(frame_index, draws = draws.len(), ?pipeline, "Draw list built");

    Ok(FrameDrawList {
        frame_index,
        pipeline,
        pass_descriptor: layout.pass_index(frame_index)?,
        pass_constants_address: slot.pass_constants().base_address(),
        draws,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_item::RenderItem;
    use castle_core::ManualTimeline;
    use castle_scene::{GeometryCatalogBuilder, GeometryGenerator, OrbitCamera};
    use glam::{Mat4, Vec4};

    fn scene(geometry: &str) -> SceneContext {
        let mut builder = GeometryCatalogBuilder::new();
        builder
            .add("box", &GeometryGenerator::create_box(1.0, 1.0, 1.0), Vec4::ONE)
            .unwrap();
        builder
            .add("spire", &GeometryGenerator::create_diamond(1.0, 1.0), Vec4::ONE)
            .unwrap();
        let items = vec![
            RenderItem::new("a", "box", Mat4::IDENTITY, 0, 2),
            RenderItem::new("b", geometry, Mat4::IDENTITY, 1, 2),
        ];
        SceneContext::new(OrbitCamera::default(), items, builder.build())
    }

    #[test]
    fn test_wireframe_flag() {
        assert_eq!(PipelineMode::from_wireframe(true), PipelineMode::Wireframe);
        assert_eq!(PipelineMode::from_wireframe(false), PipelineMode::Opaque);
    }

    #[test]
    fn test_draws_address_catalog_regions() {
        let mut ring = FrameRing::new(2, 2, ManualTimeline::new()).unwrap();
        ring.advance().unwrap();
        ring.signal_submission().unwrap();
        ring.timeline().complete_all();
        ring.advance().unwrap();

        let scene = scene("spire");
        let layout = ring.layout();
        let list = build_draw_list(&ring, &layout, &scene, PipelineMode::Opaque).unwrap();

        assert_eq!(list.frame_index, 1);
        assert_eq!(list.pass_descriptor, 5);
        assert_eq!(list.draws.len(), 2);
        assert_eq!(list.draws[0].object_descriptor, 2);
        assert_eq!(list.draws[1].object_descriptor, 3);
        assert_eq!(list.draws[1].start_index, 36);
        assert_eq!(list.draws[1].base_vertex, 24);
        assert_eq!(list.draws[1].index_count, 24);
        assert!(list.draws.iter().all(|d| d.instance_count == 1));
    }

    #[test]
    fn test_unknown_geometry() {
        let mut ring = FrameRing::new(2, 2, ManualTimeline::new()).unwrap();
        ring.advance().unwrap();
        let layout = ring.layout();

        let err = build_draw_list(&ring, &layout, &scene("moat"), PipelineMode::Opaque)
            .unwrap_err();
        assert_eq!(err, FrameError::UnknownGeometry("moat".to_string()));
    }

    #[test]
    fn test_layout_must_match_ring() {
        let mut ring = FrameRing::new(2, 2, ManualTimeline::new()).unwrap();
        ring.advance().unwrap();

        let err = build_draw_list(
            &ring,
            &CbvLayout::new(2, 3),
            &scene("spire"),
            PipelineMode::Wireframe,
        )
        .unwrap_err();
        assert!(matches!(err, FrameError::ObjectCountMismatch { .. }));
    }
}
