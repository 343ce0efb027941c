//! Rays and the handful of intersection tests picking needs.

use glam::Vec3;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

/// A square (or rectangle) in 3D given by its center and two half-axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Center point.
    pub center: Vec3,
    /// Half-width vector (lies in the quad's plane).
    pub half_u: Vec3,
    /// Half-height vector (lies in the quad's plane).
    pub half_v: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or(Vec3::NEG_Z),
        }
    }

    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the intersection with a double-sided quad, if any.
    #[must_use]
    pub fn intersect_quad(&self, quad: &Quad) -> Option<f32> {
        let normal = quad.half_u.cross(quad.half_v);
        let denom = normal.dot(self.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = normal.dot(quad.center - self.origin) / denom;
        if t < 0.0 {
            return None;
        }
        let local = self.at(t) - quad.center;
        let u = local.dot(quad.half_u) / quad.half_u.length_squared();
        let v = local.dot(quad.half_v) / quad.half_v.length_squared();
        (u.abs() <= 1.0 && v.abs() <= 1.0).then_some(t)
    }

    /// Distance to the nearest intersection with an axis-aligned box seen
    /// from outside (slab test). Returns `None` when the origin is inside
    /// the box or the ray misses.
    #[must_use]
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let inv = self.direction.recip();
        let t0 = (min - self.origin) * inv;
        let t1 = (max - self.origin) * inv;
        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();
        if t_near > t_far || t_near < 0.0 {
            return None;
        }
        Some(t_near)
    }
}

impl Quad {
    /// Square of edge `size` centered at `center`, spanned by the unit
    /// vectors `u` and `v`.
    #[must_use]
    pub fn square(center: Vec3, u: Vec3, v: Vec3, size: f32) -> Self {
        Self {
            center,
            half_u: u * (size * 0.5),
            half_v: v * (size * 0.5),
        }
    }

    /// Unit normal (right-handed from u x v).
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.half_u.cross(self.half_v).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_hit_from_both_sides() {
        let quad = Quad::square(Vec3::ZERO, Vec3::X, Vec3::Y, 1.0);
        let front = Ray::new(Vec3::new(0.1, 0.1, 5.0), Vec3::NEG_Z);
        let back = Ray::new(Vec3::new(0.1, 0.1, -5.0), Vec3::Z);
        assert!((front.intersect_quad(&quad).unwrap() - 5.0).abs() < 1e-5);
        assert!((back.intersect_quad(&quad).unwrap() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn quad_miss_outside_extent() {
        let quad = Quad::square(Vec3::ZERO, Vec3::X, Vec3::Y, 1.0);
        let ray = Ray::new(Vec3::new(0.6, 0.0, 5.0), Vec3::NEG_Z);
        assert!(ray.intersect_quad(&quad).is_none());
    }

    #[test]
    fn quad_behind_origin_is_ignored() {
        let quad = Quad::square(Vec3::ZERO, Vec3::X, Vec3::Y, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray.intersect_quad(&quad).is_none());
    }

    #[test]
    fn parallel_ray_misses_quad() {
        let quad = Quad::square(Vec3::ZERO, Vec3::X, Vec3::Y, 1.0);
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(ray.intersect_quad(&quad).is_none());
    }

    #[test]
    fn aabb_slab_test() {
        let min = Vec3::splat(-0.5);
        let max = Vec3::splat(0.5);
        let hit = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        assert!((hit.intersect_aabb(min, max).unwrap() - 2.5).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(2.0, 0.0, 3.0), Vec3::NEG_Z);
        assert!(miss.intersect_aabb(min, max).is_none());

        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(inside.intersect_aabb(min, max).is_none());
    }

    #[test]
    fn quad_normal_follows_axes() {
        let quad = Quad::square(Vec3::ZERO, Vec3::X, Vec3::Y, 2.0);
        assert_eq!(quad.normal(), Vec3::Z);
    }
}
