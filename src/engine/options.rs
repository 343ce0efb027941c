//! Options methods for ViewerEngine

use std::path::Path;

use super::ViewerEngine;
use crate::options::Options;
use crate::renderer::view_cube::ViewCubeRenderer;
use crate::scene::Scene;

impl ViewerEngine {
    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace options and apply every changed section.
    pub fn set_options(&mut self, new: Options) {
        let old = std::mem::replace(&mut self.options, new);
        self.apply_options(&old);
    }

    /// Load options from a TOML file and apply them. Returns `true` on
    /// success.
    pub fn load_options(&mut self, path: &Path) -> bool {
        match Options::load(path) {
            Ok(options) => {
                self.set_options(options);
                true
            }
            Err(e) => {
                log::error!("failed to load options from {}: {e}", path.display());
                false
            }
        }
    }

    /// Save the current options to a TOML file. Returns `true` on success.
    pub fn save_options(&self, path: &Path) -> bool {
        match self.options.save(path) {
            Ok(()) => {
                log::info!("saved options to {}", path.display());
                true
            }
            Err(e) => {
                log::error!("failed to save options to {}: {e}", path.display());
                false
            }
        }
    }

    /// Push the sections that differ from `old` to their subsystems.
    fn apply_options(&mut self, old: &Options) {
        if self.options.camera != old.camera || self.options.controls != old.controls {
            self.apply_camera();
        }
        if self.options.scene != old.scene || self.options.lighting != old.lighting {
            self.apply_scene();
        }
        if self.options.view_cube != old.view_cube {
            self.apply_view_cube(old);
        }
        if self.options.keybindings != old.keybindings {
            self.input
                .set_key_bindings(self.options.keybindings.clone());
        }
        if self.options.render.linear_output != old.render.linear_output {
            log::warn!("render.linear_output takes effect on the next start");
        }
    }

    fn apply_camera(&mut self) {
        self.camera_controller
            .apply_options(&self.options.camera, &self.options.controls);
    }

    /// Rebuild the scene and refresh lights and the shadow map.
    fn apply_scene(&mut self) {
        let device = &self.context.device;
        self.scene =
            Scene::from_options(&self.options.scene, &self.options.lighting);
        self.mesh_pass.upload_scene(device, &self.scene);
        if self.shadow_pass.update(device, &self.context.queue, &self.scene) {
            self.lighting.rebind(device, self.shadow_pass.view());
        }
        self.lighting.update(&self.context.queue, &self.scene);
        self.shadow_dirty = true;
    }

    fn apply_view_cube(&mut self, old: &Options) {
        let options = &self.options.view_cube;
        self.view_cube.apply_options(options);
        if options.label_size == old.view_cube.label_size {
            self.view_cube_renderer
                .set_highlight_color(options.highlight_color);
        } else {
            match ViewCubeRenderer::new(
                &self.context.device,
                &self.context.queue,
                &mut self.shader_composer,
                self.view_cube_renderer.format(),
                options,
            ) {
                Ok(renderer) => self.view_cube_renderer = renderer,
                Err(e) => log::error!("failed to rebuild view cube: {e}"),
            }
        }
        self.update_gizmo_rect();
    }
}
