use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Demo scene contents: a sphere resting on a floor.
pub struct SceneOptions {
    /// Sphere radius.
    pub sphere_radius: f32,
    /// Segments around the sphere's equator.
    pub sphere_width_segments: u32,
    /// Segments from pole to pole.
    pub sphere_height_segments: u32,
    /// Height of the sphere's center above the floor.
    pub sphere_elevation: f32,
    /// Sphere base color (linear RGB).
    pub sphere_color: [f32; 3],
    /// Floor edge length.
    pub floor_size: f32,
    /// Floor base color (linear RGB).
    pub floor_color: [f32; 3],
    /// Metalness shared by both materials.
    pub metalness: f32,
    /// Roughness shared by both materials.
    pub roughness: f32,
    /// Environment reflection strength shared by both materials.
    pub env_intensity: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        let gray = f32::from(0x77_u8) / 255.0;
        Self {
            sphere_radius: 0.5,
            sphere_width_segments: 32,
            sphere_height_segments: 32,
            sphere_elevation: 0.5,
            sphere_color: [1.0, 1.0, 1.0],
            floor_size: 10.0,
            floor_color: [gray, gray, gray],
            metalness: 0.3,
            roughness: 0.4,
            env_intensity: 0.5,
        }
    }
}
