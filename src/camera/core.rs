use glam::{Mat3, Mat4, Vec2, Vec3};

use super::ray::Ray;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
}

impl Camera {
    /// World-to-view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// The rotation part of the view matrix.
    #[must_use]
    pub fn view_rotation(&self) -> Mat3 {
        Mat3::from_mat4(self.build_view())
    }

    /// Unit vector from the eye toward the target.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    /// Camera right vector in world space.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.view_rotation().row(0)
    }

    /// Camera up vector in world space (orthogonal to forward).
    #[must_use]
    pub fn true_up(&self) -> Vec3 {
        self.view_rotation().row(1)
    }

    /// Distance between eye and target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// Cast a ray from the eye through a point given in normalized device
    /// coordinates (x right, y up, both in `[-1, 1]`).
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        ray_from_ndc(self.build_matrix(), self.eye, ndc)
    }
}

/// Unproject `ndc` through the inverse of `view_proj` into a ray starting at
/// `origin`.
#[must_use]
pub fn ray_from_ndc(view_proj: Mat4, origin: Vec3, ndc: Vec2) -> Ray {
    let inverse = view_proj.inverse();
    let far = inverse.project_point3(ndc.extend(0.5));
    Ray::new(origin, far - origin)
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
    }

    /// Update from an explicit view-projection matrix and eye position.
    pub fn set(&mut self, view_proj: Mat4, position: Vec3, aspect: f32) {
        self.view_proj = view_proj.to_cols_array_2d();
        self.position = position.to_array();
        self.aspect = aspect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 70.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert!(ray.origin.distance(cam.eye) < 1e-6);
        assert!(ray.direction.distance(Vec3::NEG_Z) < 1e-4);
    }

    #[test]
    fn ndc_up_ray_tilts_upward() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::new(0.0, 1.0));
        assert!(ray.direction.y > 0.0);
        // Top edge of a 70° frustum sits 35° above the view axis.
        let angle = ray.direction.angle_between(Vec3::NEG_Z).to_degrees();
        assert!((angle - 35.0).abs() < 0.1);
    }

    #[test]
    fn basis_vectors_are_orthonormal() {
        let mut cam = camera();
        cam.eye = Vec3::new(-3.0, 3.0, 3.0);
        let (r, u, f) = (cam.right(), cam.true_up(), cam.forward());
        assert!(r.dot(u).abs() < 1e-5);
        assert!(r.dot(f).abs() < 1e-5);
        assert!(u.dot(f).abs() < 1e-5);
        assert!(u.y > 0.0);
    }
}
