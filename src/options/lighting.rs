use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Ambient + directional light parameters and the shadow setup.
pub struct LightingOptions {
    /// Ambient light color (linear RGB).
    pub ambient_color: [f32; 3],
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Directional light color (linear RGB).
    pub directional_color: [f32; 3],
    /// Directional light intensity.
    pub directional_intensity: f32,
    /// Directional light position; the light shines toward
    /// `directional_target`.
    pub directional_position: [f32; 3],
    /// Point the directional light is aimed at.
    pub directional_target: [f32; 3],
    /// Render the shadow map.
    pub shadows: bool,
    /// Shadow map resolution (square).
    pub shadow_map_size: u32,
    /// Half-extent of the orthographic shadow camera.
    pub shadow_extent: f32,
    /// Shadow camera near plane.
    pub shadow_near: f32,
    /// Shadow camera far plane.
    pub shadow_far: f32,
    /// PCF filter radius in shadow-map texels.
    pub shadow_softness: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.7,
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 0.2,
            directional_position: [5.0, 5.0, 5.0],
            directional_target: [0.0, 0.0, 0.0],
            shadows: true,
            shadow_map_size: 1024,
            shadow_extent: 7.0,
            shadow_near: 0.5,
            shadow_far: 15.0,
            shadow_softness: 1.5,
        }
    }
}
