use glam::{Mat4, Vec3};

/// Uniform light reaching every surface equally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB color.
    pub color: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Orthographic shadow camera attached to a directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    /// Left bound of the view volume.
    pub left: f32,
    /// Right bound of the view volume.
    pub right: f32,
    /// Top bound of the view volume.
    pub top: f32,
    /// Bottom bound of the view volume.
    pub bottom: f32,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
    /// Shadow map edge length in texels.
    pub map_size: u32,
    /// PCF filter radius in texels.
    pub softness: f32,
}

impl ShadowCamera {
    /// Symmetric shadow camera covering `[-extent, extent]` on both axes.
    #[must_use]
    pub fn symmetric(
        extent: f32,
        near: f32,
        far: f32,
        map_size: u32,
        softness: f32,
    ) -> Self {
        Self {
            left: -extent,
            right: extent,
            top: extent,
            bottom: -extent,
            near,
            far,
            map_size: map_size.max(1),
            softness,
        }
    }

    /// Light-space view-projection for a light at `eye` looking at `target`.
    #[must_use]
    pub fn view_proj(&self, eye: Vec3, target: Vec3) -> Mat4 {
        let direction = (target - eye).normalize_or(Vec3::NEG_Y);
        let up = if direction.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(eye, target, up);
        let projection = Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        );
        projection * view
    }
}

/// Parallel light shining from `position` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Linear RGB color.
    pub color: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Light position; only its direction to `target` affects shading.
    pub position: Vec3,
    /// Point the light is aimed at.
    pub target: Vec3,
    /// Shadow setup, or `None` if the light casts no shadows.
    pub shadow: Option<ShadowCamera>,
}

impl DirectionalLight {
    /// Unit vector from the surface toward the light.
    #[must_use]
    pub fn direction_to_light(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }

    /// Light-space matrix of the shadow camera, identity without shadows.
    #[must_use]
    pub fn shadow_view_proj(&self) -> Mat4 {
        self.shadow.map_or(Mat4::IDENTITY, |shadow| {
            shadow.view_proj(self.position, self.target)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> DirectionalLight {
        DirectionalLight {
            color: Vec3::ONE,
            intensity: 0.2,
            position: Vec3::splat(5.0),
            target: Vec3::ZERO,
            shadow: Some(ShadowCamera::symmetric(7.0, 0.5, 15.0, 1024, 1.5)),
        }
    }

    #[test]
    fn target_projects_to_shadow_map_center() {
        let m = light().shadow_view_proj();
        let p = m.project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        // |(5,5,5)| ≈ 8.66 lies inside [0.5, 15]
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn central_floor_fits_inside_shadow_volume() {
        let m = light().shadow_view_proj();
        for corner in [
            Vec3::new(-4.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, 4.0),
            Vec3::new(-4.0, 0.0, 4.0),
        ] {
            let p = m.project_point3(corner);
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0, "{corner:?} -> {p:?}");
            assert!((0.0..=1.0).contains(&p.z));
        }
    }

    #[test]
    fn vertical_light_has_valid_basis() {
        let mut l = light();
        l.position = Vec3::new(0.0, 10.0, 0.0);
        let m = l.shadow_view_proj();
        assert!(m.is_finite());
    }

    #[test]
    fn direction_points_toward_light() {
        let d = light().direction_to_light();
        assert!(d.distance(Vec3::splat(1.0).normalize()) < 1e-6);
    }
}
