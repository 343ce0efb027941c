//! Lighting uniform and the bind group that pairs it with the shadow map.

use wgpu::util::DeviceExt;

use crate::gpu::pipeline_helpers;
use crate::scene::Scene;

/// Constant depth offset applied before the shadow comparison.
const SHADOW_BIAS: f32 = 0.0005;

/// GPU lighting uniform; layout matches `LightingUniform` in
/// `modules/lighting.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Ambient color premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Directional color premultiplied by intensity.
    pub light_color: [f32; 4],
    /// Unit vector toward the light; `w` is 1 when shadows are enabled.
    pub light_dir: [f32; 4],
    /// World to shadow-map clip space.
    pub shadow_view_proj: [[f32; 4]; 4],
    /// Texel size, PCF radius in texels, depth bias.
    pub shadow_params: [f32; 4],
}

impl LightingUniform {
    /// Build the uniform from the scene's lights.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let ambient = scene.ambient.color * scene.ambient.intensity;
        let light = &scene.directional;
        let color = light.color * light.intensity;
        let dir = light.direction_to_light();
        let (enabled, texel, softness) = light.shadow.map_or(
            (0.0, 0.0, 0.0),
            |shadow| (1.0, 1.0 / shadow.map_size as f32, shadow.softness),
        );
        Self {
            ambient: ambient.extend(1.0).to_array(),
            light_color: color.extend(1.0).to_array(),
            light_dir: dir.extend(enabled).to_array(),
            shadow_view_proj: light.shadow_view_proj().to_cols_array_2d(),
            shadow_params: [texel, softness, SHADOW_BIAS, 0.0],
        }
    }

    /// Whether the shader will sample the shadow map.
    #[must_use]
    pub fn shadows_enabled(&self) -> bool {
        self.light_dir[3] > 0.5
    }
}

/// Lighting uniform buffer plus the shadow map and its comparison sampler,
/// bound together as group 1 of the mesh pipeline.
pub struct LightingBinding {
    /// CPU copy of the uniform.
    pub uniform: LightingUniform,
    buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    /// Bind group layout for group 1.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over `buffer`, the shadow map, and `sampler`.
    pub bind_group: wgpu::BindGroup,
}

impl LightingBinding {
    /// Create the buffer and bind the given shadow map view. `layout` must
    /// come from [`create_layout`].
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        layout: wgpu::BindGroupLayout,
        scene: &Scene,
        shadow_view: &wgpu::TextureView,
    ) -> Self {
        let uniform = LightingUniform::from_scene(scene);
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let sampler = pipeline_helpers::shadow_sampler(device, "Shadow Sampler");
        let bind_group =
            create_bind_group(device, &layout, &buffer, shadow_view, &sampler);
        Self {
            uniform,
            buffer,
            sampler,
            layout,
            bind_group,
        }
    }

    /// Recompute the uniform from `scene` and upload it.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        self.uniform = LightingUniform::from_scene(scene);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Rebuild the bind group after the shadow map was recreated.
    pub fn rebind(&mut self, device: &wgpu::Device, shadow_view: &wgpu::TextureView) {
        self.bind_group = create_bind_group(
            device,
            &self.layout,
            &self.buffer,
            shadow_view,
            &self.sampler,
        );
    }
}

/// Layout of the lighting group: uniform, shadow map, comparison sampler.
pub fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Lighting Bind Group Layout"),
        entries: &[
            pipeline_helpers::uniform_buffer(0),
            pipeline_helpers::depth_texture_2d(1),
            pipeline_helpers::comparison_sampler(2),
        ],
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    shadow_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Lighting Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(shadow_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
