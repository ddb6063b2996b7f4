//! Everything the update and draw passes read from the scene.

use tracing::info;

use castle_scene::{Castle, GeometryCatalog, OrbitCamera};

use crate::render_item::RenderItem;

/// Camera, render items and merged geometry, passed explicitly to each pass.
#[derive(Debug)]
pub struct SceneContext {
    pub camera: OrbitCamera,
    pub items: Vec<RenderItem>,
    pub catalog: GeometryCatalog,
}

impl SceneContext {
    pub fn new(camera: OrbitCamera, items: Vec<RenderItem>, catalog: GeometryCatalog) -> Self {
        Self {
            camera,
            items,
            catalog,
        }
    }

    /// Turns castle parts into render items numbered in part order.
    pub fn from_castle(castle: Castle, frame_count: usize) -> Self {
        let items: Vec<RenderItem> = castle
            .parts
            .iter()
            .enumerate()
            .map(|(cb_index, part)| {
                RenderItem::new(
                    part.name,
                    part.geometry,
                    part.transform.world_matrix(),
                    cb_index,
                    frame_count,
                )
            })
            .collect();

        info!(items = items.len(), frame_count, "Scene context created");
        Self::new(OrbitCamera::default(), items, castle.catalog)
    }

    /// Size of the per-slot object buffer this scene needs.
    pub fn object_count(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, name: &str) -> Option<&RenderItem> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn item_mut(&mut self, name: &str) -> Option<&mut RenderItem> {
        self.items.iter_mut().find(|item| item.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castle_scene::build_castle;

    #[test]
    fn test_castle_items_numbered_in_order() {
        let scene = SceneContext::from_castle(build_castle().unwrap(), 3);
        assert_eq!(scene.object_count(), 34);
        for (i, item) in scene.items.iter().enumerate() {
            assert_eq!(item.cb_index(), i);
            assert_eq!(item.dirty_frames(), 3);
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let mut scene = SceneContext::from_castle(build_castle().unwrap(), 2);
        assert_eq!(scene.item("spire").unwrap().geometry(), "diamond_spire");
        assert!(scene.item_mut("moat").is_none());
    }
}
