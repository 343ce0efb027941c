//! Centralized viewer options with TOML file support.
//!
//! All tweakable settings (camera, orbit controls, lighting, scene contents,
//! view cube, presentation, keybindings) are consolidated here. Options
//! serialize to/from TOML so a viewer can be configured from a file.

mod camera;
mod controls;
mod lighting;
mod render;
mod scene;
mod view_cube;

use std::path::Path;

pub use camera::CameraOptions;
pub use controls::ControlsOptions;
pub use lighting::LightingOptions;
pub use render::RenderOptions;
pub use scene::SceneOptions;
use serde::{Deserialize, Serialize};
pub use view_cube::{Corner, ViewCubeOptions};

use crate::error::ViewCubeError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Main camera projection and initial placement.
    pub camera: CameraOptions,
    /// Orbit controls tuning.
    pub controls: ControlsOptions,
    /// Lighting and shadow parameters.
    pub lighting: LightingOptions,
    /// Demo scene contents.
    pub scene: SceneOptions,
    /// View-cube gizmo options.
    pub view_cube: ViewCubeOptions,
    /// Presentation settings.
    pub render: RenderOptions,
    /// Keyboard binding options.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, ViewCubeError> {
        toml::from_str(content)
            .map_err(|e| ViewCubeError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewCubeError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ViewCubeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewCubeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::ViewerCommand;
    use crate::gizmo::CubeFace;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[lighting]
ambient_intensity = 0.4

[view_cube]
corner = 'bottom_left'
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.lighting.ambient_intensity, 0.4);
        assert_eq!(opts.view_cube.corner, Corner::BottomLeft);
        // Everything else should be default
        assert_eq!(opts.lighting.directional_intensity, 0.2);
        assert_eq!(opts.camera.fovy, 75.0);
        assert_eq!(opts.view_cube.camera_distance, 1.75);
    }

    #[test]
    fn defaults_match_demo_scene() {
        let opts = Options::default();
        assert_eq!(opts.camera.position, [-3.0, 3.0, 3.0]);
        assert_eq!(opts.lighting.shadow_map_size, 1024);
        assert_eq!(opts.scene.sphere_width_segments, 32);
        assert!((opts.scene.floor_color[0] - 0.466_67).abs() < 1e-3);
        assert!(opts.controls.enable_damping);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = Options::from_toml("[camera]\nfovy = 'wide'").unwrap_err();
        assert!(matches!(err, ViewCubeError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyH"),
            Some(ViewerCommand::ResetView)
        );
        assert_eq!(
            opts.keybindings.lookup("Digit3"),
            Some(ViewerCommand::SnapToFace {
                face: CubeFace::Top
            })
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join("viewcube-options-test");
        let path = dir.join("opts.toml");
        let mut opts = Options::default();
        opts.controls.snap_duration = 0.25;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded.controls.snap_duration, 0.25);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
