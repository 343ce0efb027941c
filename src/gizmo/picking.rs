//! Ray picking against the view cube's face regions.

use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Quat, Vec3};

use super::face::CubeFace;
use crate::camera::ray::{Quad, Ray};

/// Square hit region floating just outside one cube face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPlane {
    /// Face the region belongs to.
    pub face: CubeFace,
    /// Center of the region, relative to the cube center.
    pub position: Vec3,
    /// XYZ Euler rotation applied to an XY square.
    pub rotation: Vec3,
    /// Edge length.
    pub size: f32,
}

impl HitPlane {
    /// Region for `face` with edge `size` at `offset` from the cube center.
    #[must_use]
    pub fn for_face(face: CubeFace, size: f32, offset: f32) -> Self {
        let rotation = match face {
            CubeFace::Right | CubeFace::Left => Vec3::new(0.0, FRAC_PI_2, 0.0),
            CubeFace::Top | CubeFace::Bottom => Vec3::new(FRAC_PI_2, 0.0, 0.0),
            CubeFace::Front | CubeFace::Back => Vec3::ZERO,
        };
        Self {
            face,
            position: face.axis() * offset,
            rotation,
            size,
        }
    }

    /// Rotation as a quaternion.
    #[must_use]
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// World-space square of this region.
    #[must_use]
    pub fn quad(&self) -> Quad {
        let q = self.orientation();
        Quad::square(self.position, q * Vec3::X, q * Vec3::Y, self.size)
    }

    /// The four corners, counter-clockwise around the square.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 4] {
        let quad = self.quad();
        [
            quad.center - quad.half_u - quad.half_v,
            quad.center + quad.half_u - quad.half_v,
            quad.center + quad.half_u + quad.half_v,
            quad.center - quad.half_u + quad.half_v,
        ]
    }
}

/// Hit regions for all six faces, in [`CubeFace::ALL`] order.
#[must_use]
pub fn hit_planes(size: f32, offset: f32) -> [HitPlane; 6] {
    CubeFace::ALL.map(|face| HitPlane::for_face(face, size, offset))
}

/// Face whose hit region the ray reaches first. Returns `None` if the ray
/// misses everything or reaches the cube body (an edge or corner) before
/// any region.
#[must_use]
pub fn pick(ray: &Ray, planes: &[HitPlane], cube_half_extent: f32) -> Option<CubeFace> {
    let nearest_plane = planes
        .iter()
        .filter_map(|plane| {
            ray.intersect_quad(&plane.quad()).map(|t| (t, plane))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    let cube_t = ray.intersect_aabb(
        Vec3::splat(-cube_half_extent),
        Vec3::splat(cube_half_extent),
    );

    let (plane_t, plane) = nearest_plane?;
    if cube_t.is_some_and(|t| t < plane_t) {
        return None;
    }
    CubeFace::from_offset(plane.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planes() -> [HitPlane; 6] {
        hit_planes(0.7, 0.51)
    }

    #[test]
    fn planes_sit_on_their_faces() {
        for plane in planes() {
            let normal = plane.quad().normal();
            assert!(normal.cross(plane.face.axis()).length() < 1e-5);
            assert_eq!(CubeFace::from_offset(plane.position), Some(plane.face));
            for corner in plane.corners() {
                assert!((corner.dot(plane.face.axis()) - 0.51).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn straight_on_rays_pick_each_face() {
        for face in CubeFace::ALL {
            let ray = Ray::new(face.axis() * 1.75, -face.axis());
            assert_eq!(pick(&ray, &planes(), 0.5), Some(face));
        }
    }

    #[test]
    fn off_center_ray_inside_region() {
        let ray = Ray::new(Vec3::new(0.3, -0.3, 1.75), Vec3::NEG_Z);
        assert_eq!(pick(&ray, &planes(), 0.5), Some(CubeFace::Front));
    }

    #[test]
    fn edge_region_hits_cube_body() {
        // Outside the 0.7 square but still on the unit cube.
        let ray = Ray::new(Vec3::new(0.45, 0.0, 1.75), Vec3::NEG_Z);
        assert_eq!(pick(&ray, &planes(), 0.5), None);
    }

    #[test]
    fn corner_view_picks_nearest_region() {
        let eye = Vec3::new(1.0, 1.0, 1.0).normalize() * 1.75;
        // Aim at the center of the top region.
        let ray = Ray::new(eye, Vec3::new(0.0, 0.51, 0.0) - eye);
        assert_eq!(pick(&ray, &planes(), 0.5), Some(CubeFace::Top));
    }

    #[test]
    fn miss_returns_none() {
        let ray = Ray::new(Vec3::new(3.0, 3.0, 1.75), Vec3::NEG_Z);
        assert_eq!(pick(&ray, &planes(), 0.5), None);
    }
}
