use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::ViewCubeError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared WGSL modules are registered at construction time. Consuming
/// shaders use `#import viewcube::module_name` to pull in shared code. The
/// composer produces `naga::Module` IR directly, skipping WGSL re-parse at
/// runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path).
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/object.wgsl"),
        file_path: "modules/object.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

/// A top-level shader the renderer compiles.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    /// WGSL source, possibly with `#import` directives.
    pub source: &'static str,
    /// Path used in diagnostics.
    pub file_path: &'static str,
}

/// Lit mesh pass.
pub const MESH_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/mesh.wgsl"),
    file_path: "mesh.wgsl",
};
/// Depth-only shadow pass.
pub const SHADOW_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/shadow.wgsl"),
    file_path: "shadow.wgsl",
};
/// Textured view cube.
pub const VIEW_CUBE_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/view_cube.wgsl"),
    file_path: "view_cube.wgsl",
};
/// View-cube face highlights.
pub const HIGHLIGHT_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/highlight.wgsl"),
    file_path: "highlight.wgsl",
};

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, ViewCubeError> {
        let mut composer = Composer::default();

        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    ViewCubeError::Shader(format!(
                        "failed to register shader module '{}': {e}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        shader: ShaderSource,
    ) -> Result<wgpu::ShaderModule, ViewCubeError> {
        let naga_module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: ShaderSource,
    ) -> Result<naga::Module, ViewCubeError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source,
                file_path: shader.file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                ViewCubeError::Shader(format!(
                    "failed to compose shader '{}': {e}",
                    shader.file_path
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_points(module: &naga::Module) -> Vec<&str> {
        module.entry_points.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in [MESH_SHADER, SHADOW_SHADER, VIEW_CUBE_SHADER, HIGHLIGHT_SHADER] {
            let module = composer
                .compose_naga(shader)
                .unwrap_or_else(|e| panic!("{e}"));
            assert!(entry_points(&module).contains(&"vs_main"), "{}", shader.file_path);
        }
    }

    #[test]
    fn shaders_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in [MESH_SHADER, SHADOW_SHADER, VIEW_CUBE_SHADER, HIGHLIGHT_SHADER] {
            let module = composer.compose_naga(shader).unwrap();
            let _ = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            )
            .validate(&module)
            .unwrap_or_else(|e| panic!("{}: {e:?}", shader.file_path));
        }
    }

    #[test]
    fn shadow_shader_is_depth_only() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(SHADOW_SHADER).unwrap();
        assert_eq!(entry_points(&module), ["vs_main"]);
    }

    #[test]
    fn composition_errors_are_reported() {
        let mut composer = ShaderComposer::new().unwrap();
        let broken = ShaderSource {
            source: "fn f() -> f32 { return 1.0 +; }",
            file_path: "broken.wgsl",
        };
        let err = composer.compose_naga(broken).unwrap_err();
        assert!(matches!(err, ViewCubeError::Shader(msg) if msg.contains("broken.wgsl")));

        let missing = ShaderSource {
            source: "#import viewcube::missing\nfn f() -> f32 { return viewcube::missing::g(); }",
            file_path: "missing.wgsl",
        };
        assert!(composer.compose_naga(missing).is_err());
    }
}
