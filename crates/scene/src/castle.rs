//! The castle: its meshes and where each part stands.

use glam::{Vec3, Vec4};
use tracing::info;

use crate::catalog::{GeometryCatalog, GeometryCatalogBuilder, SceneResult};
use crate::geometry::GeometryGenerator;
use crate::transform::Transform;

/// One placed instance of a catalog mesh.
#[derive(Clone, Debug)]
pub struct CastlePart {
    pub name: &'static str,
    /// Catalog key of the mesh this part draws.
    pub geometry: &'static str,
    pub transform: Transform,
}

/// Geometry catalog plus the ordered part list.
#[derive(Debug)]
pub struct Castle {
    pub catalog: GeometryCatalog,
    pub parts: Vec<CastlePart>,
}

const fn rgb(r: f32, g: f32, b: f32) -> Vec4 {
    Vec4::new(r, g, b, 1.0)
}

const DARK_GREEN: Vec4 = rgb(0.0, 0.392, 0.0);
const DARK_GRAY: Vec4 = rgb(0.663, 0.663, 0.663);
const LIGHT_GRAY: Vec4 = rgb(0.827, 0.827, 0.827);
const GRAY: Vec4 = rgb(0.502, 0.502, 0.502);
const WALL_GRAY: Vec4 = rgb(0.6, 0.6, 0.6);
const ROOF_BROWN: Vec4 = rgb(0.4, 0.2, 0.1);
const DARK_RED: Vec4 = rgb(0.545, 0.0, 0.0);
const GOLD: Vec4 = rgb(1.0, 0.843, 0.0);
const BLACK: Vec4 = rgb(0.0, 0.0, 0.0);

fn register_meshes(builder: &mut GeometryCatalogBuilder) -> SceneResult<()> {
    builder.add("ground", &GeometryGenerator::create_grid(80.0, 80.0, 60, 40), DARK_GREEN)?;
    builder.add(
        "keep_foundation",
        &GeometryGenerator::create_box(20.0, 2.0, 15.0),
        DARK_GRAY,
    )?;
    builder.add("keep_body", &GeometryGenerator::create_box(10.0, 30.0, 12.0), LIGHT_GRAY)?;
    builder.add(
        "outer_wall_long",
        &GeometryGenerator::create_box(60.0, 6.0, 2.0),
        WALL_GRAY,
    )?;
    builder.add(
        "outer_wall_short",
        &GeometryGenerator::create_box(2.0, 6.0, 60.0),
        WALL_GRAY,
    )?;
    builder.add(
        "hex_tower",
        &GeometryGenerator::create_cylinder(3.0, 3.0, 18.0, 6, 1),
        GRAY,
    )?;
    builder.add(
        "torus_roof",
        &GeometryGenerator::create_torus(3.2, 2.5, 20, 20),
        ROOF_BROWN,
    )?;
    builder.add(
        "keep_pyramid_roof",
        &GeometryGenerator::create_pyramid(16.0, 13.0, 8.0),
        DARK_RED,
    )?;
    builder.add(
        "keep_cone_roof",
        &GeometryGenerator::create_cone(2.5, 6.0, 16, 8),
        ROOF_BROWN,
    )?;
    builder.add("diamond_spire", &GeometryGenerator::create_diamond(4.0, 3.0), GOLD)?;
    builder.add(
        "arrow_slit",
        &GeometryGenerator::create_triangular_prism(0.8, 0.3, 5.0),
        BLACK,
    )?;
    builder.add(
        "gable_wedge",
        &GeometryGenerator::create_wedge(4.0, 3.0, 0.5),
        rgb(0.7, 0.7, 0.7),
    )?;
    builder.add(
        "gate_column",
        &GeometryGenerator::create_cylinder(1.0, 1.0, 8.0, 12, 4),
        rgb(0.3, 0.3, 0.3),
    )?;
    builder.add("gatehouse", &GeometryGenerator::create_box(12.0, 8.0, 4.0), rgb(0.5, 0.5, 0.5))?;
    Ok(())
}

fn place(name: &'static str, geometry: &'static str, position: Vec3) -> CastlePart {
    placed_scaled(name, geometry, Vec3::ONE, position)
}

fn placed_scaled(
    name: &'static str,
    geometry: &'static str,
    scale: Vec3,
    position: Vec3,
) -> CastlePart {
    CastlePart {
        name,
        geometry,
        transform: Transform::new().with_scale(scale).with_position(position),
    }
}

fn layout() -> Vec<CastlePart> {
    let torus_scale = Vec3::new(0.8, 0.4, 1.0);
    let keep_tower_scale = Vec3::new(0.7, 1.0, 0.7);
    let keep_cone_scale = Vec3::new(0.8, 1.7, 0.7);
    let gate_tower_scale = Vec3::new(0.6, 1.0, 0.6);
    let gate_cone_scale = Vec3::new(0.6, 1.2, 1.0);
    let column_scale = Vec3::new(0.5, 1.0, 0.5);

    vec![
        place("ground", "ground", Vec3::new(0.0, -0.5, 0.0)),
        place("keep_foundation", "keep_foundation", Vec3::new(0.0, 1.0, 0.0)),
        place("keep_body", "keep_body", Vec3::new(0.0, 6.0, 0.0)),
        place("north_wall", "outer_wall_long", Vec3::new(0.0, 3.0, 30.0)),
        place("south_wall", "outer_wall_long", Vec3::new(0.0, 3.0, -30.0)),
        place("east_wall", "outer_wall_short", Vec3::new(30.0, 3.0, 0.0)),
        place("west_wall", "outer_wall_short", Vec3::new(-30.0, 3.0, 0.0)),
        place("north_west_tower", "hex_tower", Vec3::new(-30.0, 1.0, 30.0)),
        place("north_east_tower", "hex_tower", Vec3::new(30.0, 1.0, 30.0)),
        place("south_west_tower", "hex_tower", Vec3::new(-30.0, 1.0, -30.0)),
        place("south_east_tower", "hex_tower", Vec3::new(30.0, 1.0, -30.0)),
        placed_scaled("north_west_roof", "torus_roof", torus_scale, Vec3::new(-30.0, 11.0, 30.0)),
        placed_scaled("north_east_roof", "torus_roof", torus_scale, Vec3::new(30.0, 11.0, 30.0)),
        placed_scaled("south_west_roof", "torus_roof", torus_scale, Vec3::new(-30.0, 11.0, -30.0)),
        placed_scaled(
            "south_east_roof",
            "torus_roof",
            Vec3::new(0.8, 0.3, 1.0),
            Vec3::new(30.0, 11.0, -30.0),
        ),
        place("keep_roof", "keep_pyramid_roof", Vec3::new(0.0, 25.0, 0.0)),
        placed_scaled("keep_tower_front_left", "hex_tower", keep_tower_scale, Vec3::new(-6.5, 2.0, -5.0)),
        placed_scaled("keep_tower_front_right", "hex_tower", keep_tower_scale, Vec3::new(6.5, 2.0, -5.0)),
        placed_scaled("keep_tower_back_left", "hex_tower", keep_tower_scale, Vec3::new(-6.5, 2.0, 5.0)),
        placed_scaled("keep_tower_back_right", "hex_tower", keep_tower_scale, Vec3::new(6.5, 2.0, 5.0)),
        placed_scaled("keep_cone_front_left", "keep_cone_roof", keep_cone_scale, Vec3::new(-6.5, 16.0, -5.0)),
        placed_scaled("keep_cone_front_right", "keep_cone_roof", keep_cone_scale, Vec3::new(6.5, 16.0, -5.0)),
        placed_scaled("keep_cone_back_left", "keep_cone_roof", keep_cone_scale, Vec3::new(-6.5, 16.0, 5.0)),
        placed_scaled("keep_cone_back_right", "keep_cone_roof", keep_cone_scale, Vec3::new(6.5, 16.0, 5.0)),
        place("spire", "diamond_spire", Vec3::new(0.0, 31.0, 0.0)),
        place("gatehouse", "gatehouse", Vec3::new(0.0, 4.0, 31.0)),
        placed_scaled("gate_tower_left", "hex_tower", gate_tower_scale, Vec3::new(-8.0, 1.0, 31.0)),
        placed_scaled("gate_tower_right", "hex_tower", gate_tower_scale, Vec3::new(8.0, 1.0, 31.0)),
        placed_scaled("gate_cone_left", "keep_cone_roof", gate_cone_scale, Vec3::new(-8.0, 13.5, 31.0)),
        placed_scaled("gate_cone_right", "keep_cone_roof", gate_cone_scale, Vec3::new(8.0, 13.5, 31.0)),
        placed_scaled("gate_column_left", "gate_column", column_scale, Vec3::new(-3.0, 4.0, 34.0)),
        placed_scaled("gate_column_right", "gate_column", column_scale, Vec3::new(3.0, 4.0, 34.0)),
        place("arrow_slit_left", "arrow_slit", Vec3::new(-5.0, 7.0, 31.5)),
        place("arrow_slit_right", "arrow_slit", Vec3::new(5.0, 7.0, 31.5)),
    ]
}

/// Build the castle meshes and the ordered list of placed parts.
pub fn build_castle() -> SceneResult<Castle> {
    let mut builder = GeometryCatalogBuilder::new();
    register_meshes(&mut builder)?;
    let catalog = builder.build();

    let parts = layout();
    for part in &parts {
        catalog.require(part.geometry)?;
    }

    info!(
        meshes = catalog.submesh_count(),
        parts = parts.len(),
        vertices = catalog.vertices().len(),
        indices = catalog.indices().len(),
        "Built castle"
    );
    Ok(Castle { catalog, parts })
}
