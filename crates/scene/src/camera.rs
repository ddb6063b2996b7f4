//! Orbit camera circling the scene origin.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

/// Radians of orbit per pixel of left-button drag.
const ROTATE_PER_PIXEL: f32 = 0.25 * PI / 180.0;
/// World units of zoom per pixel of right-button drag.
const ZOOM_PER_PIXEL: f32 = 0.05;

const MIN_PHI: f32 = 0.1;
const MAX_PHI: f32 = PI - 0.1;
const MIN_RADIUS: f32 = 5.0;
const MAX_RADIUS: f32 = 150.0;

/// Camera on a sphere around the origin, described in spherical coordinates.
///
/// Uses a left-handed coordinate system: `theta` is measured in the xz-plane
/// from +x, `phi` from +y.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Azimuth in radians.
    pub theta: f32,
    /// Polar angle in radians, kept inside `[0.1, PI - 0.1]`.
    pub phi: f32,
    /// Distance to the origin, kept inside `[5, 150]`.
    pub radius: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            theta: 1.5 * PI,
            phi: 0.2 * PI,
            radius: 15.0,
            fov_y: 0.25 * PI,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the aspect ratio after a viewport change.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Orbit by a left-button drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.theta += ROTATE_PER_PIXEL * dx;
        self.phi = (self.phi + ROTATE_PER_PIXEL * dy).clamp(MIN_PHI, MAX_PHI);
    }

    /// Move in or out by a right-button drag of `(dx, dy)` pixels.
    pub fn zoom(&mut self, dx: f32, dy: f32) {
        let delta = ZOOM_PER_PIXEL * dx - ZOOM_PER_PIXEL * dy;
        self.radius = (self.radius + delta).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Camera position in world space.
    pub fn eye_position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.radius * sin_phi * cos_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * sin_theta,
        )
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye_position(), Vec3::ZERO, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_default_eye() {
        let camera = OrbitCamera::default();
        let eye = camera.eye_position();

        // theta = 1.5 PI puts the camera on the -z side of the castle.
        assert!(eye.x.abs() < EPSILON);
        assert!(eye.z < 0.0);
        assert!(eye.y > 0.0);
        assert!((eye.length() - 15.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotate_scale() {
        let mut camera = OrbitCamera::default();
        let theta = camera.theta;
        camera.rotate(4.0, 0.0);
        assert!((camera.theta - theta - 1.0_f32.to_radians()).abs() < EPSILON);
    }

    #[test]
    fn test_phi_clamped() {
        let mut camera = OrbitCamera::default();
        camera.rotate(0.0, -10_000.0);
        assert_eq!(camera.phi, 0.1);
        camera.rotate(0.0, 10_000.0);
        assert_eq!(camera.phi, PI - 0.1);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(20.0, 0.0);
        assert!((camera.radius - 16.0).abs() < EPSILON);
        camera.zoom(0.0, 1_000.0);
        assert_eq!(camera.radius, 5.0);
        camera.zoom(10_000.0, 0.0);
        assert_eq!(camera.radius, 150.0);
    }

    #[test]
    fn test_view_maps_origin_in_front() {
        let camera = OrbitCamera::default();
        let origin_view = camera.view_matrix().transform_point3(Vec3::ZERO);

        // Left-handed view space looks down +z.
        assert!(origin_view.z > 0.0);
        assert!((origin_view.z - camera.radius).abs() < EPSILON);
    }

    #[test]
    fn test_projection_depth_range() {
        let camera = OrbitCamera::default();
        let proj = camera.projection_matrix();

        let near = proj.project_point3(Vec3::new(0.0, 0.0, 1.0));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, 1000.0));
        assert!(near.z.abs() < EPSILON);
        assert!((far.z - 1.0).abs() < EPSILON);
    }
}
