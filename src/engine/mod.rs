//! The viewer engine: owns the GPU context, scene, camera, and gizmo, and
//! turns input into camera motion.

pub mod command;
mod input;
mod options;

use crate::camera::controller::CameraController;
use crate::camera::core::Camera;
use crate::error::ViewCubeError;
use crate::gizmo::ViewCube;
use crate::gpu::render_context::{RenderContext, SurfaceState};
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::DepthTexture;
use crate::input::{InputProcessor, Rect};
use crate::options::Options;
use crate::renderer::lighting::{self, LightingBinding};
use crate::renderer::mesh_pass::MeshPass;
use crate::renderer::shadow::ShadowPass;
use crate::renderer::view_cube::{self, GizmoTarget, ViewCubeRenderer};
use crate::scene::Scene;

/// The rendering engine behind the viewer.
///
/// Draws the demo scene (a sphere on a floor, ambient plus one shadowed
/// directional light) under orbit controls, and the view cube either in a
/// corner of the main surface or on a surface of its own.
///
/// # Frame loop
///
/// Each frame, call [`update`](Self::update) with the elapsed time, then
/// [`render`](Self::render). Call [`resize`](Self::resize) when the window
/// size changes. Input is forwarded via
/// [`handle_input`](Self::handle_input) or as
/// [`ViewerCommand`](command::ViewerCommand)s through
/// [`execute`](Self::execute).
pub struct ViewerEngine {
    /// Core wgpu device, queue, and main surface.
    pub context: RenderContext,
    shader_composer: ShaderComposer,
    /// Main camera and its orbit controls.
    pub camera_controller: CameraController,
    scene: Scene,
    lighting: LightingBinding,
    shadow_pass: ShadowPass,
    shadow_dirty: bool,
    mesh_pass: MeshPass,
    depth: DepthTexture,
    view_cube: ViewCube,
    view_cube_renderer: ViewCubeRenderer,
    /// The gizmo's own surface; `None` draws it in a corner viewport.
    gizmo_surface: Option<SurfaceState>,
    input: InputProcessor,
    options: Options,
    scale_factor: f64,
}

impl ViewerEngine {
    /// Create the GPU context for `window` and build the scene.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError`] if GPU initialization or shader
    /// composition fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        scale_factor: f64,
        options: Options,
    ) -> Result<Self, ViewCubeError> {
        let context =
            RenderContext::new(window, size, options.render.linear_output)
                .await?;
        Self::new_from_context(context, scale_factor, options)
    }

    /// Engine from a pre-built [`RenderContext`].
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError::Shader`] if a shader fails to compose.
    pub fn new_from_context(
        context: RenderContext,
        scale_factor: f64,
        options: Options,
    ) -> Result<Self, ViewCubeError> {
        let mut shader_composer = ShaderComposer::new()?;
        let device = &context.device;

        let camera_controller =
            CameraController::new(&context, &options.camera, &options.controls);
        let scene = Scene::from_options(&options.scene, &options.lighting);

        let lighting_layout = lighting::create_layout(device);
        let mut mesh_pass = MeshPass::new(
            device,
            &mut shader_composer,
            context.format(),
            &camera_controller.layout,
            &lighting_layout,
        )?;
        mesh_pass.upload_scene(device, &scene);
        let shadow_pass = ShadowPass::new(
            device,
            &mut shader_composer,
            &camera_controller.layout,
            mesh_pass.object_layout(),
            &scene,
        )?;
        let lighting = LightingBinding::new(
            device,
            lighting_layout,
            &scene,
            shadow_pass.view(),
        );

        let (width, height) = context.size();
        let depth = DepthTexture::new(device, "Main Depth", width, height);

        let mut view_cube = ViewCube::new(&options.view_cube, 1.0);
        view_cube.sync_to_camera(&camera_controller.camera);
        let view_cube_renderer = ViewCubeRenderer::new(
            device,
            &context.queue,
            &mut shader_composer,
            context.format(),
            &options.view_cube,
        )?;

        let input = InputProcessor::with_key_bindings(options.keybindings.clone());

        let mut engine = Self {
            context,
            shader_composer,
            camera_controller,
            scene,
            lighting,
            shadow_pass,
            shadow_dirty: true,
            mesh_pass,
            depth,
            view_cube,
            view_cube_renderer,
            gizmo_surface: None,
            input,
            options,
            scale_factor,
        };
        engine.update_gizmo_rect();
        log::info!(
            "viewer engine ready: {} objects, shadows {}",
            engine.scene.objects.len(),
            if engine.scene.has_shadows() { "on" } else { "off" }
        );
        Ok(engine)
    }

    /// Render the view cube into its own surface (e.g. a second canvas)
    /// instead of a corner of the main surface.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError::Gpu`] if the surface cannot be created or
    /// presented to by the current adapter, and [`ViewCubeError::Shader`]
    /// if the gizmo pipelines must be rebuilt for a different format and
    /// fail to compose. The engine stays in corner mode on error.
    pub fn attach_gizmo_surface(
        &mut self,
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<(), ViewCubeError> {
        let surface = self.context.create_secondary_surface(
            target,
            size,
            self.options.render.linear_output,
        )?;
        let format = surface.config.format;
        if format != self.view_cube_renderer.format() {
            self.view_cube_renderer = ViewCubeRenderer::new(
                &self.context.device,
                &self.context.queue,
                &mut self.shader_composer,
                format,
                &self.options.view_cube,
            )?;
        }
        log::info!(
            "view cube attached to its own surface ({:?} {}x{})",
            format,
            surface.config.width,
            surface.config.height
        );
        self.gizmo_surface = Some(surface);
        self.update_gizmo_rect();
        Ok(())
    }

    /// Whether the view cube draws into its own surface.
    pub fn has_gizmo_surface(&self) -> bool {
        self.gizmo_surface.is_some()
    }

    /// Advance orbit controls and sync the gizmo camera, then upload the
    /// per-frame uniforms. Returns `true` if the main camera moved.
    pub fn update(&mut self, dt: f32) -> bool {
        let moved = self.camera_controller.update(dt);
        self.view_cube.sync_to_camera(&self.camera_controller.camera);
        self.camera_controller.update_gpu(&self.context.queue);
        self.view_cube_renderer
            .update(&self.context.queue, &self.view_cube);
        moved
    }

    /// Draw one frame: shadow map (when stale), scene, view cube, present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the main surface cannot provide a
    /// frame. Failures of the gizmo surface are logged and skip the gizmo.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let gizmo_frame = self.acquire_gizmo_frame();

        let mut encoder = self.context.create_encoder();

        if self.shadow_dirty {
            self.shadow_pass.render(&mut encoder, &self.mesh_pass);
            self.shadow_dirty = false;
        }

        self.render_scene(&mut encoder, &view);

        match (&gizmo_frame, self.gizmo_surface.is_some()) {
            (Some(gizmo), _) => {
                let gizmo_view = gizmo
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.view_cube_renderer.render(
                    &mut encoder,
                    &gizmo_view,
                    GizmoTarget::Full,
                );
            }
            (None, false) => {
                let rect = self.corner_rect();
                self.view_cube_renderer.render(
                    &mut encoder,
                    &view,
                    GizmoTarget::Corner(rect),
                );
            }
            (None, true) => {}
        }

        self.context.submit(encoder);
        frame.present();
        if let Some(gizmo) = gizmo_frame {
            gizmo.present();
        }
        Ok(())
    }

    fn render_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let [r, g, b] = self.options.render.background;
        let mut render_pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Discard,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        self.mesh_pass.draw(
            &mut render_pass,
            &self.camera_controller.bind_group,
            &self.lighting.bind_group,
        );
    }

    fn acquire_gizmo_frame(&self) -> Option<wgpu::SurfaceTexture> {
        let surface = self.gizmo_surface.as_ref()?;
        match surface.get_next_frame() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                surface.reconfigure(&self.context.device);
                None
            }
            Err(e) => {
                log::warn!("view cube surface error: {e:?}");
                None
            }
        }
    }

    /// Handle a main surface resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.camera_controller.resize(width, height);
        self.depth =
            DepthTexture::new(&self.context.device, "Main Depth", width, height);
        self.update_gizmo_rect();
    }

    /// Handle a resize of the gizmo's own surface. No-op in corner mode.
    pub fn resize_gizmo_surface(&mut self, width: u32, height: u32) {
        if let Some(surface) = &mut self.gizmo_surface {
            surface.resize(&self.context.device, width, height);
            self.update_gizmo_rect();
        }
    }

    /// Track a DPI change; the corner viewport scales with it.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
        self.update_gizmo_rect();
    }

    /// Current DPI scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// The main camera.
    pub fn camera(&self) -> &Camera {
        &self.camera_controller.camera
    }

    /// The view cube's interaction state.
    pub fn view_cube(&self) -> &ViewCube {
        &self.view_cube
    }

    /// The scene being drawn.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Whether a snap animation is in progress.
    pub fn is_animating(&self) -> bool {
        self.camera_controller.controls.is_animating()
    }

    /// Gizmo viewport on the main surface in corner mode, physical pixels.
    pub fn gizmo_rect(&self) -> Option<Rect> {
        self.gizmo_surface.is_none().then(|| self.corner_rect())
    }

    fn corner_rect(&self) -> Rect {
        let (width, height) = self.context.size();
        view_cube::corner_viewport(
            &self.options.view_cube,
            width,
            height,
            self.scale_factor,
        )
    }

    /// Push the gizmo placement to the input processor and the gizmo
    /// camera's aspect ratio.
    fn update_gizmo_rect(&mut self) {
        let aspect = match &self.gizmo_surface {
            Some(surface) => {
                surface.config.width as f32 / surface.config.height.max(1) as f32
            }
            None => 1.0,
        };
        self.view_cube.set_aspect(aspect);
        self.input.set_gizmo_rect(self.gizmo_rect());
    }
}
