//! Scene content for the castle renderer.
//!
//! This crate provides:
//! - Procedural mesh generation
//! - A merged geometry catalog addressed by name
//! - An orbit camera
//! - The castle layout

pub mod camera;
pub mod castle;
pub mod catalog;
pub mod geometry;
pub mod transform;

pub use camera::OrbitCamera;
pub use castle::{Castle, CastlePart, build_castle};
pub use catalog::{
    ColorVertex, GeometryCatalog, GeometryCatalogBuilder, SceneError, SceneResult,
    SubmeshGeometry,
};
pub use geometry::{GeometryGenerator, MeshData};
pub use transform::Transform;
