use glam::Vec3;

/// Physically based surface parameters (metal/rough workflow).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    /// Base color, linear RGB.
    pub color: Vec3,
    /// 0 = dielectric, 1 = metal.
    pub metalness: f32,
    /// Perceptual roughness in `[0, 1]`.
    pub roughness: f32,
    /// Strength of the uniform environment term.
    pub env_intensity: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            metalness: 0.0,
            roughness: 1.0,
            env_intensity: 1.0,
        }
    }
}

impl StandardMaterial {
    /// Material of the given color with the remaining parameters default.
    #[must_use]
    pub fn from_color(color: Vec3) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}
