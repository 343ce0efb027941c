//! Orbit controls: drag to rotate around a target, drag to pan, scroll to
//! dolly, with optional inertia.
//!
//! Pointer input only accumulates *pending* motion; [`OrbitControls::update`]
//! applies it once per frame. With damping enabled only a fraction of the
//! pending motion is applied per update and the remainder decays, which gives
//! the camera its inertia.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};

use crate::options::ControlsOptions;
use crate::util::easing::EasingFunction;

/// Polar-angle margin keeping the camera off the poles.
const EPS: f32 = 1e-6;
/// Squared movement below which an update reports "no change".
const MOVE_EPSILON_SQ: f32 = 1e-12;

/// Spherical coordinates around the orbit target (Y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Distance from the target.
    pub radius: f32,
    /// Polar angle from +Y, in `[0, π]`.
    pub phi: f32,
    /// Azimuth around +Y, measured from +Z toward +X.
    pub theta: f32,
}

impl Spherical {
    /// Spherical coordinates of an offset vector.
    #[must_use]
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Convert back to an offset vector.
    #[must_use]
    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Clamp phi away from the poles so the view basis stays well defined.
    #[must_use]
    pub fn make_safe(mut self) -> Self {
        self.phi = self.phi.clamp(EPS, PI - EPS);
        self
    }
}

/// An in-flight eased move of the eye around the target.
#[derive(Debug, Clone, Copy)]
struct Transition {
    start_dir: Vec3,
    rotation: Quat,
    radius: f32,
    duration: f32,
    elapsed: f32,
    easing: EasingFunction,
}

impl Transition {
    /// Advance by `dt` and return the offset from the target for the new
    /// time, plus whether the transition finished.
    fn advance(&mut self, dt: f32) -> (Vec3, bool) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = self.easing.evaluate(self.elapsed / self.duration);
        let partial = Quat::IDENTITY.slerp(self.rotation, t);
        (
            partial * self.start_dir * self.radius,
            self.elapsed >= self.duration,
        )
    }
}

/// Orbit controller state.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    position: Vec3,
    target: Vec3,

    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    pending_scale: f32,

    target0: Vec3,
    position0: Vec3,

    transition: Option<Transition>,

    viewport_height: f32,
    fovy: f32,

    enable_damping: bool,
    damping_factor: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    snap_duration: f32,
    snap_easing: EasingFunction,
}

impl OrbitControls {
    /// Controls looking from `position` at `target`. The initial placement
    /// is saved as the reset state.
    #[must_use]
    pub fn new(
        position: Vec3,
        target: Vec3,
        fovy: f32,
        options: &ControlsOptions,
    ) -> Self {
        let mut controls = Self {
            position,
            target,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
            target0: target,
            position0: position,
            transition: None,
            viewport_height: 1.0,
            fovy,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            snap_duration: 0.0,
            snap_easing: EasingFunction::SmoothStep,
        };
        controls.apply_options(options);
        controls
    }

    /// Adopt tuning parameters from `options`. Pending motion is kept.
    pub fn apply_options(&mut self, options: &ControlsOptions) {
        self.enable_damping = options.enable_damping;
        self.damping_factor = options.damping_factor.clamp(0.0, 1.0);
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed;
        self.min_distance = options.min_distance.max(0.0);
        self.max_distance = options.max_distance.max(self.min_distance);
        self.snap_duration = options.snap_duration.max(0.0);
        self.snap_easing = options.snap_easing;
    }

    /// Current eye position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Distance from eye to target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Whether an eased snap is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Height of the viewport receiving pointer input, in pixels. Drag
    /// deltas are normalized against it.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(1.0);
    }

    /// Vertical field of view in degrees, used to scale panning.
    pub fn set_fovy(&mut self, fovy: f32) {
        self.fovy = fovy;
    }

    /// Queue a rotation from a pointer drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.transition = None;
        let scale = TAU / self.viewport_height * self.rotate_speed;
        self.pending_theta -= delta.x * scale;
        self.pending_phi -= delta.y * scale;
    }

    /// Queue a screen-space pan from a pointer drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.transition = None;
        let (right, up) = self.screen_axes();
        let target_distance =
            self.distance() * (self.fovy.to_radians() * 0.5).tan();
        let scale = 2.0 * target_distance / self.viewport_height * self.pan_speed;
        self.pending_pan += right * (-delta.x * scale) + up * (delta.y * scale);
    }

    /// Queue a dolly; positive `steps` move toward the target.
    pub fn dolly(&mut self, steps: f32) {
        self.transition = None;
        self.pending_scale *= 0.95_f32.powf(self.zoom_speed * steps);
    }

    /// Move the eye to `position` immediately, discarding pending motion.
    pub fn set_position(&mut self, position: Vec3) {
        self.transition = None;
        self.clear_pending();
        self.position = position;
    }

    /// Move the eye to `position`, eased over the configured snap duration
    /// (instant when the duration is zero). The distance to the target is
    /// kept from the current position.
    pub fn move_to(&mut self, position: Vec3) {
        self.animate_to(position, self.snap_duration);
    }

    /// Move the eye to `position` over `duration` seconds along an arc
    /// around the target, using the configured snap easing.
    pub fn animate_to(&mut self, position: Vec3, duration: f32) {
        let from = self.position - self.target;
        let to = position - self.target;
        if duration <= 0.0 || from.length_squared() == 0.0 {
            self.set_position(position);
            return;
        }
        self.clear_pending();
        let start_dir = from.normalize();
        let end_dir = to.normalize_or(start_dir);
        self.transition = Some(Transition {
            start_dir,
            rotation: Quat::from_rotation_arc(start_dir, end_dir),
            radius: to.length(),
            duration,
            elapsed: 0.0,
            easing: self.snap_easing,
        });
    }

    /// Record the current placement as the reset state.
    pub fn save_state(&mut self) {
        self.target0 = self.target;
        self.position0 = self.position;
    }

    /// Replace the reset state without moving the camera.
    pub fn set_home(&mut self, position: Vec3, target: Vec3) {
        self.position0 = position;
        self.target0 = target;
    }

    /// Return to the saved placement.
    pub fn reset(&mut self) {
        self.transition = None;
        self.clear_pending();
        self.target = self.target0;
        self.position = self.position0;
    }

    /// Apply pending motion. Returns `true` if the eye or target moved.
    pub fn update(&mut self, dt: f32) -> bool {
        let last_position = self.position;
        let last_target = self.target;

        if let Some(mut transition) = self.transition.take() {
            let (offset, done) = transition.advance(dt);
            self.position = self.target + offset;
            if !done {
                self.transition = Some(transition);
            }
        }

        let mut spherical =
            Spherical::from_offset(self.position - self.target);

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.pending_theta * factor;
        spherical.phi += self.pending_phi * factor;
        spherical = spherical.make_safe();

        self.target += self.pending_pan * factor;
        spherical.radius = (spherical.radius * self.pending_scale)
            .clamp(self.min_distance, self.max_distance);

        self.position = self.target + spherical.to_offset();

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.pending_theta *= decay;
            self.pending_phi *= decay;
            self.pending_pan *= decay;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
        self.pending_scale = 1.0;

        self.position.distance_squared(last_position) > MOVE_EPSILON_SQ
            || self.target.distance_squared(last_target) > MOVE_EPSILON_SQ
    }

    fn clear_pending(&mut self) {
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_pan = Vec3::ZERO;
        self.pending_scale = 1.0;
    }

    /// Camera right and up vectors in world space for the current view.
    fn screen_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use crate::camera::core::Camera;

    use super::*;

    fn options(damping: bool) -> ControlsOptions {
        ControlsOptions {
            enable_damping: damping,
            ..ControlsOptions::default()
        }
    }

    fn controls(damping: bool) -> OrbitControls {
        let mut c = OrbitControls::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            75.0,
            &options(damping),
        );
        c.set_viewport_height(100.0);
        c
    }

    #[test]
    fn spherical_round_trip() {
        let offset = Vec3::new(-3.0, 3.0, 3.0);
        let s = Spherical::from_offset(offset);
        assert!((s.radius - offset.length()).abs() < 1e-5);
        assert!(s.to_offset().distance(offset) < 1e-5);
    }

    #[test]
    fn quarter_drag_rotates_quarter_turn() {
        let mut c = controls(false);
        // 2π · 25 / 100 = π/2
        c.rotate(Vec2::new(25.0, 0.0));
        assert!(c.update(0.016));
        assert!(c.position().distance(Vec3::new(-5.0, 0.0, 0.0)) < 1e-4);
        assert!((c.distance() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn damping_applies_fraction_then_converges() {
        let mut c = controls(true);
        c.rotate(Vec2::new(25.0, 0.0));
        let _ = c.update(0.016);
        let theta = Spherical::from_offset(c.position()).theta;
        assert!((theta + FRAC_PI_2 * 0.05).abs() < 1e-4);

        for _ in 0..600 {
            let _ = c.update(0.016);
        }
        let theta = Spherical::from_offset(c.position()).theta;
        assert!((theta + FRAC_PI_2).abs() < 1e-3);
        assert!(!c.update(0.016));
    }

    #[test]
    fn polar_angle_is_clamped_off_the_pole() {
        let mut c = controls(false);
        c.rotate(Vec2::new(0.0, 500.0));
        let _ = c.update(0.016);
        let p = c.position();
        assert!(p.is_finite());
        assert!(p.y > 4.99);
        // f32 cannot tell phi = EPS from the pole, but the eye keeps a
        // horizontal offset, so the view basis stays well defined.
        assert!(Vec2::new(p.x, p.z).length() > 0.0);
        let camera = Camera {
            eye: p,
            target: c.target(),
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 75.0,
            znear: 0.1,
            zfar: 100.0,
        };
        assert!(camera.build_view().is_finite());
        assert!(camera.build_matrix().is_finite());
    }

    #[test]
    fn snap_to_top_stays_finite() {
        let mut c = controls(true);
        c.set_position(Vec3::new(0.0, 5.0, 0.0));
        let _ = c.update(0.016);
        let p = c.position();
        assert!(p.is_finite());
        assert!((p.y - 5.0).abs() < 1e-4);
        assert!(p.x.abs() < 1e-4 && p.z.abs() < 1e-4);
    }

    #[test]
    fn dolly_scales_distance() {
        let mut c = controls(true);
        c.dolly(1.0);
        let _ = c.update(0.016);
        assert!((c.distance() - 5.0 * 0.95).abs() < 1e-4);
        c.dolly(-1.0);
        let _ = c.update(0.016);
        assert!((c.distance() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn dolly_respects_distance_limits() {
        let mut c = OrbitControls::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            75.0,
            &ControlsOptions {
                min_distance: 4.0,
                max_distance: 6.0,
                ..options(false)
            },
        );
        c.dolly(50.0);
        let _ = c.update(0.016);
        assert!((c.distance() - 4.0).abs() < 1e-4);
        c.dolly(-100.0);
        let _ = c.update(0.016);
        assert!((c.distance() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_eye_and_target_together() {
        let mut c = controls(false);
        c.pan(Vec2::new(-10.0, 0.0));
        let _ = c.update(0.016);
        assert!(c.target().x > 0.0);
        assert!((c.position().x - c.target().x).abs() < 1e-5);
        assert!((c.distance() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn reset_restores_saved_state() {
        let mut c = controls(false);
        c.rotate(Vec2::new(30.0, 10.0));
        c.pan(Vec2::new(5.0, 5.0));
        let _ = c.update(0.016);
        c.reset();
        let _ = c.update(0.016);
        assert!(c.position().distance(Vec3::new(0.0, 0.0, 5.0)) < 1e-4);
        assert!(c.target().length() < 1e-6);
    }

    #[test]
    fn eased_snap_keeps_distance_and_lands_on_goal() {
        let mut c = OrbitControls::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            75.0,
            &ControlsOptions {
                snap_duration: 1.0,
                snap_easing: EasingFunction::Linear,
                ..options(false)
            },
        );
        c.move_to(Vec3::new(5.0, 0.0, 0.0));
        assert!(c.is_animating());

        let _ = c.update(0.5);
        let p = c.position();
        assert!((p.length() - 5.0).abs() < 1e-3);
        assert!(p.x > 3.0 && p.z > 3.0);

        let _ = c.update(0.6);
        assert!(!c.is_animating());
        assert!(c.position().distance(Vec3::new(5.0, 0.0, 0.0)) < 1e-3);
    }

    #[test]
    fn user_input_cancels_snap() {
        let mut c = OrbitControls::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            75.0,
            &ControlsOptions {
                snap_duration: 1.0,
                ..options(false)
            },
        );
        c.move_to(Vec3::new(5.0, 0.0, 0.0));
        c.rotate(Vec2::new(1.0, 0.0));
        assert!(!c.is_animating());
    }
}
