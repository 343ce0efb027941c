use serde::{Deserialize, Serialize};

/// Window corner the view cube is anchored to when it shares the main
/// surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    #[default]
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// View-cube gizmo layout, camera and appearance.
pub struct ViewCubeOptions {
    /// Edge length of the gizmo viewport in logical pixels.
    pub size: f32,
    /// Gap between the gizmo viewport and the window edges, logical pixels.
    pub margin: f32,
    /// Corner the gizmo viewport is anchored to.
    pub corner: Corner,
    /// Distance of the gizmo camera from the cube center.
    pub camera_distance: f32,
    /// Gizmo camera vertical field of view in degrees.
    pub fovy: f32,
    /// Gizmo camera near plane.
    pub znear: f32,
    /// Gizmo camera far plane.
    pub zfar: f32,
    /// Edge length of each clickable face region.
    pub plane_size: f32,
    /// Distance of the clickable regions from the cube center.
    pub plane_offset: f32,
    /// Hover highlight color (linear RGB).
    pub highlight_color: [f32; 3],
    /// Opacity of the hovered face highlight.
    pub highlight_opacity: f32,
    /// Edge length of the generated face label textures, in texels.
    pub label_size: u32,
}

impl Default for ViewCubeOptions {
    fn default() -> Self {
        Self {
            size: 128.0,
            margin: 16.0,
            corner: Corner::TopRight,
            camera_distance: 1.75,
            fovy: 70.0,
            znear: 0.1,
            zfar: 100.0,
            plane_size: 0.7,
            plane_offset: 0.51,
            highlight_color: [0.0, f32::from(0xc0_u8) / 255.0, 1.0],
            highlight_opacity: 0.3,
            label_size: 64,
        }
    }
}
