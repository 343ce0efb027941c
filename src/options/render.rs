use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Presentation settings.
pub struct RenderOptions {
    /// Upper bound on the device pixel ratio used for canvas sizing.
    pub max_pixel_ratio: f32,
    /// Clear color of the main viewport (linear RGB).
    pub background: [f32; 3],
    /// Prefer a non-sRGB surface so shader output is written unconverted.
    pub linear_output: bool,
    /// Frame cap for the native viewer (0 = vsync only).
    pub target_fps: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            background: [0.0, 0.0, 0.0],
            linear_output: true,
            target_fps: 0,
        }
    }
}

impl RenderOptions {
    /// Device pixel ratio clamped to `max_pixel_ratio`.
    #[must_use]
    pub fn pixel_ratio(&self, device_pixel_ratio: f64) -> f64 {
        device_pixel_ratio.min(f64::from(self.max_pixel_ratio)).max(0.0)
    }
}
