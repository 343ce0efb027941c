//! Depth-only shadow map pass for the directional light.

use wgpu::util::DeviceExt;

use crate::camera::core::CameraUniform;
use crate::error::ViewCubeError;
use crate::gpu::pipeline_helpers;
use crate::gpu::shader_composer::{ShaderComposer, SHADOW_SHADER};
use crate::gpu::texture::DepthTexture;
use crate::renderer::mesh_pass::MeshPass;
use crate::renderer::pipeline_util::{self, PipelineDesc};
use crate::scene::{MeshVertex, Scene};

/// Shadow map, light camera, and the depth-only pipeline that fills it.
pub struct ShadowPass {
    pipeline: wgpu::RenderPipeline,
    map: DepthTexture,
    map_size: u32,
    enabled: bool,
    light_uniform: CameraUniform,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
}

/// Edge length of the shadow map for `scene`; a 1x1 placeholder when the
/// light casts no shadows so the lighting bind group stays valid.
fn map_size(scene: &Scene) -> u32 {
    scene
        .directional
        .shadow
        .map_or(1, |shadow| shadow.map_size.max(1))
}

impl ShadowPass {
    /// Create the shadow map for `scene` and compile the depth pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError::Shader`] if the shadow shader fails to
    /// compose.
    pub fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
        object_layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) -> Result<Self, ViewCubeError> {
        let shader =
            shader_composer.compose(device, "Shadow Shader", SHADOW_SHADER)?;
        let pipeline = pipeline_util::create_pipeline(
            device,
            PipelineDesc {
                label: "Shadow Pipeline",
                shader: &shader,
                bind_group_layouts: &[camera_layout, object_layout],
                vertex_layout: MeshVertex::buffer_layout(),
                color: None,
                cull_mode: None,
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
            },
        );

        let size = map_size(scene);
        let map = DepthTexture::new(device, "Shadow Map", size, size);

        let mut light_uniform = CameraUniform::new();
        light_uniform.set(
            scene.directional.shadow_view_proj(),
            scene.directional.position,
            1.0,
        );
        let light_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Shadow Camera Buffer"),
                contents: bytemuck::cast_slice(&[light_uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let light_bind_group = pipeline_helpers::single_uniform_bind_group(
            device,
            "Shadow Camera Bind Group",
            camera_layout,
            &light_buffer,
        );

        Ok(Self {
            pipeline,
            map,
            map_size: size,
            enabled: scene.has_shadows(),
            light_uniform,
            light_buffer,
            light_bind_group,
        })
    }

    /// Depth view sampled by the mesh pass.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.map.view
    }

    /// Whether the pass renders anything.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Track light and shadow changes. Returns `true` if the shadow map was
    /// recreated and bind groups referencing it must be rebuilt.
    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
    ) -> bool {
        self.enabled = scene.has_shadows();
        self.light_uniform.set(
            scene.directional.shadow_view_proj(),
            scene.directional.position,
            1.0,
        );
        queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::cast_slice(&[self.light_uniform]),
        );

        let size = map_size(scene);
        if size == self.map_size {
            return false;
        }
        log::debug!("shadow map resized to {size}x{size}");
        self.map = DepthTexture::new(device, "Shadow Map", size, size);
        self.map_size = size;
        true
    }

    /// Render every shadow caster into the map. Always clears the map so a
    /// disabled pass leaves it at the far plane.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, mesh_pass: &MeshPass) {
        let mut render_pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.map.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        if !self.enabled {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.light_bind_group, &[]);
        for object in mesh_pass.objects().iter().filter(|o| o.cast_shadow) {
            object.draw(&mut render_pass, 1);
        }
    }
}
