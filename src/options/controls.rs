use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Orbit controls tuning.
pub struct ControlsOptions {
    /// Smooth rotation and panning with inertia.
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update when damping.
    pub damping_factor: f32,
    /// Rotation sensitivity multiplier.
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    pub pan_speed: f32,
    /// Dolly sensitivity multiplier (exponent applied to 0.95 per step).
    pub zoom_speed: f32,
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance from the target.
    pub max_distance: f32,
    /// Duration of a view-cube snap in seconds (0 = instant).
    pub snap_duration: f32,
    /// Easing curve for animated snaps.
    pub snap_easing: EasingFunction,
}

impl Default for ControlsOptions {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: 1000.0,
            snap_duration: 0.0,
            snap_easing: EasingFunction::SmoothStep,
        }
    }
}
