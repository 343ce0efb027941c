use glam::{Mat4, Vec2, Vec3};

use super::face::CubeFace;
use super::picking::{self, HitPlane};
use crate::camera::core::Camera;
use crate::options::ViewCubeOptions;

/// Half the edge of the unit cube the labels are drawn on.
pub const CUBE_HALF_EXTENT: f32 = 0.5;

/// Interactive state of the view cube: its camera, hit regions and the
/// hovered face.
#[derive(Debug, Clone)]
pub struct ViewCube {
    camera: Camera,
    planes: [HitPlane; 6],
    hovered: Option<CubeFace>,
    distance: f32,
    highlight_opacity: f32,
}

impl ViewCube {
    /// Gizmo looking at the cube down -Z until the first sync.
    #[must_use]
    pub fn new(options: &ViewCubeOptions, aspect: f32) -> Self {
        Self {
            camera: Camera {
                eye: Vec3::new(0.0, 0.0, options.camera_distance),
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect,
                fovy: options.fovy,
                znear: options.znear,
                zfar: options.zfar,
            },
            planes: picking::hit_planes(options.plane_size, options.plane_offset),
            hovered: None,
            distance: options.camera_distance,
            highlight_opacity: options.highlight_opacity,
        }
    }

    /// Adopt new options, keeping the orientation and hover state.
    pub fn apply_options(&mut self, options: &ViewCubeOptions) {
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.planes = picking::hit_planes(options.plane_size, options.plane_offset);
        self.distance = options.camera_distance;
        self.highlight_opacity = options.highlight_opacity;
        let dir = self.camera.eye.normalize_or(Vec3::Z);
        self.camera.eye = dir * self.distance;
    }

    /// Orient the gizmo camera like `main`: same view rotation, placed on
    /// the `target → eye` direction at the gizmo distance.
    pub fn sync_to_camera(&mut self, main: &Camera) {
        let dir = (main.eye - main.target).normalize_or(Vec3::Z);
        self.camera.eye = dir * self.distance;
        self.camera.target = Vec3::ZERO;
        self.camera.up = main.true_up();
    }

    /// Update the hovered face from a pointer position in the gizmo's
    /// normalized device coordinates. Returns `true` if the hover changed.
    pub fn pointer_moved(&mut self, ndc: Vec2) -> bool {
        let previous = self.hovered.take();
        let ray = self.camera.ray_from_ndc(ndc);
        self.hovered = picking::pick(&ray, &self.planes, CUBE_HALF_EXTENT);
        if self.hovered != previous {
            log::debug!("view cube hover: {:?}", self.hovered);
        }
        self.hovered != previous
    }

    /// Clear the hover when the pointer leaves the gizmo. Returns `true` if
    /// a face was highlighted.
    pub fn pointer_left(&mut self) -> bool {
        self.hovered.take().is_some()
    }

    /// Face a click selects: the hovered one.
    #[must_use]
    pub fn click(&self) -> Option<CubeFace> {
        self.hovered
    }

    /// Currently hovered face.
    #[must_use]
    pub fn hovered(&self) -> Option<CubeFace> {
        self.hovered
    }

    /// Highlight opacity of `face`'s hit region.
    #[must_use]
    pub fn plane_opacity(&self, face: CubeFace) -> f32 {
        if self.hovered == Some(face) {
            self.highlight_opacity
        } else {
            0.0
        }
    }

    /// Hit regions in face order.
    #[must_use]
    pub fn planes(&self) -> &[HitPlane; 6] {
        &self.planes
    }

    /// The gizmo camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// View-projection of the gizmo camera.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        self.camera.build_matrix()
    }

    /// Track the gizmo surface's aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.aspect = aspect;
    }

    /// Eye position that views `target` straight down `-face.axis()` from
    /// the current eye distance.
    #[must_use]
    pub fn snap_position(face: CubeFace, eye: Vec3, target: Vec3) -> Vec3 {
        target + face.axis() * eye.distance(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_camera(eye: Vec3) -> Camera {
        Camera {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.5,
            fovy: 75.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    fn cube() -> ViewCube {
        ViewCube::new(&ViewCubeOptions::default(), 1.0)
    }

    #[test]
    fn sync_copies_direction_and_rotation() {
        let main = main_camera(Vec3::new(-3.0, 3.0, 3.0));
        let mut gizmo = cube();
        gizmo.sync_to_camera(&main);

        let eye = gizmo.camera().eye;
        assert!((eye.length() - 1.75).abs() < 1e-5);
        assert!(eye.normalize().distance(main.eye.normalize()) < 1e-5);

        let a = main.view_rotation();
        let b = gizmo.camera().view_rotation();
        for i in 0..3 {
            assert!(a.col(i).distance(b.col(i)) < 1e-4);
        }
    }

    #[test]
    fn sync_uses_offset_from_target() {
        let mut main = main_camera(Vec3::new(2.0, 0.0, 5.0));
        main.target = Vec3::new(2.0, 0.0, 0.0);
        let mut gizmo = cube();
        gizmo.sync_to_camera(&main);
        assert!(gizmo.camera().eye.distance(Vec3::new(0.0, 0.0, 1.75)) < 1e-5);
    }

    #[test]
    fn hover_center_of_front_face() {
        let mut gizmo = cube();
        gizmo.sync_to_camera(&main_camera(Vec3::new(0.0, 0.0, 5.0)));
        assert!(gizmo.pointer_moved(Vec2::ZERO));
        assert_eq!(gizmo.hovered(), Some(CubeFace::Front));
        assert_eq!(gizmo.plane_opacity(CubeFace::Front), 0.3);
        assert_eq!(gizmo.plane_opacity(CubeFace::Top), 0.0);
        assert!(!gizmo.pointer_moved(Vec2::new(0.01, 0.0)));
    }

    #[test]
    fn hover_clears_on_edges_and_misses() {
        let mut gizmo = cube();
        gizmo.sync_to_camera(&main_camera(Vec3::new(0.0, 0.0, 5.0)));
        let _ = gizmo.pointer_moved(Vec2::ZERO);
        let _ = gizmo.pointer_moved(Vec2::new(0.95, 0.95));
        assert_eq!(gizmo.hovered(), None);
        assert_eq!(gizmo.click(), None);
    }

    #[test]
    fn pointer_left_clears_highlight() {
        let mut gizmo = cube();
        gizmo.sync_to_camera(&main_camera(Vec3::new(0.0, 0.0, 5.0)));
        let _ = gizmo.pointer_moved(Vec2::ZERO);
        assert!(gizmo.pointer_left());
        assert_eq!(gizmo.hovered(), None);
        assert!(!gizmo.pointer_left());
    }

    #[test]
    fn corner_view_center_hits_cube_body() {
        let mut gizmo = cube();
        gizmo.sync_to_camera(&main_camera(Vec3::new(-3.0, 3.0, 3.0)));
        let _ = gizmo.pointer_moved(Vec2::ZERO);
        assert_eq!(gizmo.click(), None);
    }

    #[test]
    fn click_returns_hovered_face() {
        let mut gizmo = cube();
        gizmo.sync_to_camera(&main_camera(Vec3::new(-3.0, 3.0, 3.0)));
        let ndc = gizmo
            .view_proj()
            .project_point3(Vec3::new(0.0, 0.51, 0.0))
            .truncate();
        let _ = gizmo.pointer_moved(ndc);
        assert_eq!(gizmo.click(), Some(CubeFace::Top));
    }

    #[test]
    fn snap_keeps_distance() {
        let target = Vec3::new(1.0, 0.0, 0.0);
        let eye = Vec3::new(-2.0, 3.0, 4.0);
        let d = eye.distance(target);
        for face in CubeFace::ALL {
            let p = ViewCube::snap_position(face, eye, target);
            assert!((p.distance(target) - d).abs() < 1e-5);
            assert!((p - target).normalize().distance(face.axis()) < 1e-5);
        }
    }
}
