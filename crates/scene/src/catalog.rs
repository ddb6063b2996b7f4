//! Merged vertex/index storage for every castle mesh.
//!
//! Meshes are appended one after another into a single vertex buffer and a
//! single index buffer. Each mesh is addressed by name through a
//! [`SubmeshGeometry`] region, which is what indexed draw calls consume.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use thiserror::Error;
use tracing::debug;

use crate::geometry::MeshData;

/// Error type for scene construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A mesh was registered twice under the same name.
    #[error("Geometry '{0}' is already registered")]
    DuplicateGeometry(String),

    /// A placement refers to a mesh the catalog does not contain.
    #[error("Unknown geometry '{0}'")]
    UnknownGeometry(String),
}

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Vertex format of the merged buffer: position and RGBA color.
///
/// # Memory Layout
///
/// - Offset 0: position (12 bytes)
/// - Offset 12: color (16 bytes)
/// - Total size: 28 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Region of the merged buffers occupied by one mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubmeshGeometry {
    /// Number of indices to draw.
    pub index_count: u32,
    /// First index of the region in the merged index buffer.
    pub start_index: u32,
    /// Value added to each index before fetching a vertex.
    pub base_vertex: i32,
}

/// Accumulates meshes into merged buffers.
#[derive(Debug, Default)]
pub struct GeometryCatalogBuilder {
    vertices: Vec<ColorVertex>,
    indices: Vec<u32>,
    submeshes: HashMap<String, SubmeshGeometry>,
}

impl GeometryCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `mesh` with every vertex painted `color`.
    ///
    /// Indices stay relative to the mesh; the region's `base_vertex` rebases them.
    pub fn add(&mut self, name: &str, mesh: &MeshData, color: Vec4) -> SceneResult<SubmeshGeometry> {
        if self.submeshes.contains_key(name) {
            return Err(SceneError::DuplicateGeometry(name.to_string()));
        }

        let region = SubmeshGeometry {
            index_count: mesh.indices.len() as u32,
            start_index: self.indices.len() as u32,
            base_vertex: self.vertices.len() as i32,
        };

        let color = color.to_array();
        self.vertices
            .extend(mesh.positions.iter().map(|p| ColorVertex {
                position: p.to_array(),
                color,
            }));
        self.indices.extend_from_slice(&mesh.indices);
        self.submeshes.insert(name.to_string(), region);

        debug!(
            name,
            index_count = region.index_count,
            start_index = region.start_index,
            base_vertex = region.base_vertex,
            "Registered submesh"
        );
        Ok(region)
    }

    pub fn build(self) -> GeometryCatalog {
        GeometryCatalog {
            vertices: self.vertices,
            indices: self.indices,
            submeshes: self.submeshes,
        }
    }
}

/// Immutable merged geometry plus the named regions inside it.
#[derive(Debug)]
pub struct GeometryCatalog {
    vertices: Vec<ColorVertex>,
    indices: Vec<u32>,
    submeshes: HashMap<String, SubmeshGeometry>,
}

impl GeometryCatalog {
    /// Look up the region registered under `name`.
    pub fn region(&self, name: &str) -> Option<&SubmeshGeometry> {
        self.submeshes.get(name)
    }

    /// Like [`GeometryCatalog::region`], but missing names are an error.
    pub fn require(&self, name: &str) -> SceneResult<SubmeshGeometry> {
        self.region(name)
            .copied()
            .ok_or_else(|| SceneError::UnknownGeometry(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.submeshes.contains_key(name)
    }

    pub fn vertices(&self) -> &[ColorVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Raw bytes of the merged vertex buffer, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the merged index buffer, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryGenerator;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<ColorVertex>(), 28);
    }

    #[test]
    fn test_regions_are_concatenated() {
        let cube = GeometryGenerator::create_box(1.0, 1.0, 1.0);
        let diamond = GeometryGenerator::create_diamond(1.0, 1.0);

        let mut builder = GeometryCatalogBuilder::new();
        let first = builder.add("cube", &cube, Vec4::ONE).unwrap();
        let second = builder.add("diamond", &diamond, Vec4::ONE).unwrap();
        let catalog = builder.build();

        assert_eq!(first.start_index, 0);
        assert_eq!(first.base_vertex, 0);
        assert_eq!(second.start_index, 36);
        assert_eq!(second.base_vertex, 24);
        assert_eq!(second.index_count, 24);
        assert_eq!(catalog.vertices().len(), 30);
        assert_eq!(catalog.indices().len(), 60);
        assert_eq!(catalog.region("diamond"), Some(&second));
    }

    #[test]
    fn test_rebased_indices_hit_own_vertices() {
        let cube = GeometryGenerator::create_box(1.0, 1.0, 1.0);
        let diamond = GeometryGenerator::create_diamond(1.0, 1.0);
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);

        let mut builder = GeometryCatalogBuilder::new();
        builder.add("cube", &cube, Vec4::ONE).unwrap();
        let region = builder.add("diamond", &diamond, red).unwrap();
        let catalog = builder.build();

        let start = region.start_index as usize;
        let end = start + region.index_count as usize;
        for &index in &catalog.indices()[start..end] {
            let vertex = catalog.vertices()[(index as i32 + region.base_vertex) as usize];
            assert_eq!(vertex.color, red.to_array());
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let cube = GeometryGenerator::create_box(1.0, 1.0, 1.0);
        let mut builder = GeometryCatalogBuilder::new();
        builder.add("cube", &cube, Vec4::ONE).unwrap();

        let err = builder.add("cube", &cube, Vec4::ONE).unwrap_err();
        assert_eq!(err, SceneError::DuplicateGeometry("cube".to_string()));
    }

    #[test]
    fn test_require_unknown() {
        let catalog = GeometryCatalogBuilder::new().build();
        assert!(catalog.region("missing").is_none());
        assert!(matches!(
            catalog.require("missing"),
            Err(SceneError::UnknownGeometry(_))
        ));
    }

    #[test]
    fn test_byte_views() {
        let cube = GeometryGenerator::create_box(1.0, 1.0, 1.0);
        let mut builder = GeometryCatalogBuilder::new();
        builder.add("cube", &cube, Vec4::ONE).unwrap();
        let catalog = builder.build();

        assert_eq!(catalog.vertex_bytes().len(), 24 * 28);
        assert_eq!(catalog.index_bytes().len(), 36 * 4);
    }
}
