//! Procedural mesh generation for the castle parts.
//!
//! All meshes are triangle lists centered on the origin, in a left-handed
//! coordinate system with clockwise front faces.

use glam::Vec3;

/// Positions and indices of one generated mesh.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex positions in object space.
    pub positions: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    // Connects `ring_count` rings of `ring_len` vertices laid out back to back.
    fn push_ring_strip(&mut self, base: u32, ring_count: u32, ring_len: u32) {
        for i in 0..ring_count - 1 {
            for j in 0..ring_len - 1 {
                let a = base + i * ring_len + j;
                let b = base + (i + 1) * ring_len + j;
                self.indices
                    .extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
            }
        }
    }
}

/// Builds the primitive meshes the castle is assembled from.
pub struct GeometryGenerator;

impl GeometryGenerator {
    /// Axis-aligned box with 4 vertices per face.
    pub fn create_box(width: f32, height: f32, depth: f32) -> MeshData {
        let (w, h, d) = (0.5 * width, 0.5 * height, 0.5 * depth);
        let faces = [
            // front (-z)
            [(-w, -h, -d), (-w, h, -d), (w, h, -d), (w, -h, -d)],
            // back (+z)
            [(-w, -h, d), (w, -h, d), (w, h, d), (-w, h, d)],
            // top
            [(-w, h, -d), (-w, h, d), (w, h, d), (w, h, -d)],
            // bottom
            [(-w, -h, -d), (w, -h, -d), (w, -h, d), (-w, -h, d)],
            // left (-x)
            [(-w, -h, d), (-w, h, d), (-w, h, -d), (-w, -h, -d)],
            // right (+x)
            [(w, -h, -d), (w, h, -d), (w, h, d), (w, -h, d)],
        ];

        let mut mesh = MeshData::default();
        for face in faces {
            let base = mesh.positions.len() as u32;
            mesh.positions
                .extend(face.iter().map(|&(x, y, z)| Vec3::new(x, y, z)));
            mesh.push_quad(base, base + 1, base + 2, base + 3);
        }
        mesh
    }

    /// Flat `rows` x `cols` vertex grid in the xz-plane.
    pub fn create_grid(width: f32, depth: f32, rows: u32, cols: u32) -> MeshData {
        assert!(rows >= 2 && cols >= 2, "grid needs at least 2x2 vertices");

        let half_width = 0.5 * width;
        let half_depth = 0.5 * depth;
        let dx = width / (cols - 1) as f32;
        let dz = depth / (rows - 1) as f32;

        let mut mesh = MeshData::default();
        for i in 0..rows {
            let z = half_depth - i as f32 * dz;
            for j in 0..cols {
                let x = -half_width + j as f32 * dx;
                mesh.positions.push(Vec3::new(x, 0.0, z));
            }
        }
        for i in 0..rows - 1 {
            for j in 0..cols - 1 {
                let a = i * cols + j;
                let b = (i + 1) * cols + j;
                mesh.indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
            }
        }
        mesh
    }

    /// Capped frustum along the y-axis; a zero radius omits that cap.
    ///
    /// `create_cylinder(r, 0.0, h, ..)` is a cone and `slices = 6` a hexagonal prism.
    pub fn create_cylinder(
        bottom_radius: f32,
        top_radius: f32,
        height: f32,
        slices: u32,
        stacks: u32,
    ) -> MeshData {
        assert!(slices >= 3 && stacks >= 1, "cylinder needs 3 slices and 1 stack");

        let stack_height = height / stacks as f32;
        let radius_step = (top_radius - bottom_radius) / stacks as f32;
        let d_theta = std::f32::consts::TAU / slices as f32;

        let mut mesh = MeshData::default();
        for i in 0..=stacks {
            let y = -0.5 * height + i as f32 * stack_height;
            let r = bottom_radius + i as f32 * radius_step;
            for j in 0..=slices {
                let (s, c) = (j as f32 * d_theta).sin_cos();
                mesh.positions.push(Vec3::new(r * c, y, r * s));
            }
        }
        mesh.push_ring_strip(0, stacks + 1, slices + 1);

        if top_radius > 0.0 {
            push_cap(&mut mesh, top_radius, 0.5 * height, slices, true);
        }
        if bottom_radius > 0.0 {
            push_cap(&mut mesh, bottom_radius, -0.5 * height, slices, false);
        }
        mesh
    }

    /// Cone of the given base radius and height.
    pub fn create_cone(radius: f32, height: f32, slices: u32, stacks: u32) -> MeshData {
        Self::create_cylinder(radius, 0.0, height, slices, stacks)
    }

    /// Rectangular-base pyramid with its apex on the +y axis.
    pub fn create_pyramid(base_width: f32, base_depth: f32, height: f32) -> MeshData {
        let (w, d, h) = (0.5 * base_width, 0.5 * base_depth, 0.5 * height);
        let corners = [
            Vec3::new(-w, -h, -d),
            Vec3::new(w, -h, -d),
            Vec3::new(w, -h, d),
            Vec3::new(-w, -h, d),
        ];
        let apex = Vec3::new(0.0, h, 0.0);

        let mut mesh = MeshData::default();
        for i in 0..4 {
            let base = mesh.positions.len() as u32;
            mesh.positions
                .extend_from_slice(&[corners[i], apex, corners[(i + 1) % 4]]);
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        let base = mesh.positions.len() as u32;
        mesh.positions.extend_from_slice(&corners);
        mesh.push_quad(base, base + 1, base + 2, base + 3);
        mesh
    }

    /// Square bipyramid (two pyramids joined at their bases).
    pub fn create_diamond(width: f32, height: f32) -> MeshData {
        let (w, h) = (0.5 * width, 0.5 * height);
        let mut mesh = MeshData {
            positions: vec![
                Vec3::new(-w, 0.0, -w),
                Vec3::new(w, 0.0, -w),
                Vec3::new(w, 0.0, w),
                Vec3::new(-w, 0.0, w),
                Vec3::new(0.0, h, 0.0),
                Vec3::new(0.0, -h, 0.0),
            ],
            indices: Vec::with_capacity(24),
        };
        for i in 0..4u32 {
            let next = (i + 1) % 4;
            mesh.indices.extend_from_slice(&[i, 4, next]);
            mesh.indices.extend_from_slice(&[i, next, 5]);
        }
        mesh
    }

    /// Prism with an isosceles triangle cross-section, extruded along z.
    pub fn create_triangular_prism(width: f32, height: f32, depth: f32) -> MeshData {
        let (w, h, d) = (0.5 * width, 0.5 * height, 0.5 * depth);
        let mut mesh = MeshData {
            positions: vec![
                Vec3::new(-w, -h, -d),
                Vec3::new(0.0, h, -d),
                Vec3::new(w, -h, -d),
                Vec3::new(-w, -h, d),
                Vec3::new(0.0, h, d),
                Vec3::new(w, -h, d),
            ],
            indices: vec![0, 1, 2, 5, 4, 3],
        };
        mesh.push_quad(3, 4, 1, 0);
        mesh.push_quad(2, 1, 4, 5);
        mesh.push_quad(0, 2, 5, 3);
        mesh
    }

    /// Wedge with a vertical back face and a slope rising from the front edge.
    pub fn create_wedge(width: f32, height: f32, depth: f32) -> MeshData {
        let (w, h, d) = (0.5 * width, 0.5 * height, 0.5 * depth);
        let mut mesh = MeshData {
            positions: vec![
                Vec3::new(-w, -h, -d),
                Vec3::new(w, -h, -d),
                Vec3::new(-w, -h, d),
                Vec3::new(w, -h, d),
                Vec3::new(-w, h, d),
                Vec3::new(w, h, d),
            ],
            indices: Vec::with_capacity(24),
        };
        mesh.push_quad(0, 1, 3, 2);
        mesh.push_quad(2, 3, 5, 4);
        mesh.push_quad(0, 4, 5, 1);
        mesh.indices.extend_from_slice(&[2, 4, 0, 1, 5, 3]);
        mesh
    }

    /// Torus around the y-axis.
    pub fn create_torus(
        major_radius: f32,
        minor_radius: f32,
        ring_segments: u32,
        tube_segments: u32,
    ) -> MeshData {
        assert!(
            ring_segments >= 3 && tube_segments >= 3,
            "torus needs 3 segments per direction"
        );

        let mut mesh = MeshData::default();
        for i in 0..=ring_segments {
            let (su, cu) = (i as f32 * std::f32::consts::TAU / ring_segments as f32).sin_cos();
            for j in 0..=tube_segments {
                let (sv, cv) = (j as f32 * std::f32::consts::TAU / tube_segments as f32).sin_cos();
                let r = major_radius + minor_radius * cv;
                mesh.positions
                    .push(Vec3::new(r * cu, minor_radius * sv, r * su));
            }
        }
        mesh.push_ring_strip(0, ring_segments + 1, tube_segments + 1);
        mesh
    }
}

fn push_cap(mesh: &mut MeshData, radius: f32, y: f32, slices: u32, top: bool) {
    let base = mesh.positions.len() as u32;
    let d_theta = std::f32::consts::TAU / slices as f32;
    for j in 0..=slices {
        let (s, c) = (j as f32 * d_theta).sin_cos();
        mesh.positions.push(Vec3::new(radius * c, y, radius * s));
    }
    mesh.positions.push(Vec3::new(0.0, y, 0.0));
    let center = base + slices + 1;

    for j in 0..slices {
        if top {
            mesh.indices
                .extend_from_slice(&[center, base + j + 1, base + j]);
        } else {
            mesh.indices
                .extend_from_slice(&[center, base + j, base + j + 1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_box_counts() {
        let mesh = GeometryGenerator::create_box(2.0, 4.0, 6.0);
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_box_extents() {
        let mesh = GeometryGenerator::create_box(2.0, 4.0, 6.0);
        let max = mesh
            .positions
            .iter()
            .fold(Vec3::splat(f32::MIN), |acc, p| acc.max(*p));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_grid_counts() {
        let mesh = GeometryGenerator::create_grid(80.0, 80.0, 60, 40);
        assert_eq!(mesh.positions.len(), 60 * 40);
        assert_eq!(mesh.triangle_count(), 59 * 39 * 2);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_hexagonal_prism() {
        let mesh = GeometryGenerator::create_cylinder(3.0, 3.0, 18.0, 6, 1);
        // 2 rings of 7 + two caps of 7 + center
        assert_eq!(mesh.positions.len(), 14 + 16);
        assert_eq!(mesh.triangle_count(), 12 + 12);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_cone_has_no_top_cap() {
        let cone = GeometryGenerator::create_cone(2.5, 6.0, 16, 8);
        let cylinder = GeometryGenerator::create_cylinder(2.5, 2.5, 6.0, 16, 8);
        assert_eq!(cylinder.triangle_count() - cone.triangle_count(), 16);
        assert_indices_in_range(&cone);
    }

    #[test]
    fn test_pyramid_apex() {
        let mesh = GeometryGenerator::create_pyramid(16.0, 13.0, 8.0);
        assert_eq!(mesh.triangle_count(), 6);
        let top = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert_eq!(top, 4.0);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_diamond_counts() {
        let mesh = GeometryGenerator::create_diamond(4.0, 3.0);
        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_triangular_prism_counts() {
        let mesh = GeometryGenerator::create_triangular_prism(0.8, 0.3, 5.0);
        assert_eq!(mesh.triangle_count(), 8);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_wedge_counts() {
        let mesh = GeometryGenerator::create_wedge(4.0, 3.0, 0.5);
        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_torus_counts() {
        let mesh = GeometryGenerator::create_torus(3.2, 2.5, 20, 20);
        assert_eq!(mesh.positions.len(), 21 * 21);
        assert_eq!(mesh.triangle_count(), 20 * 20 * 2);
        assert_indices_in_range(&mesh);
    }
}
