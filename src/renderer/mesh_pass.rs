//! Lit, shadowed indexed-mesh pass for the scene objects.

use glam::{Mat3, Mat4};
use wgpu::util::DeviceExt;

use crate::error::ViewCubeError;
use crate::gpu::pipeline_helpers;
use crate::gpu::shader_composer::{ShaderComposer, MESH_SHADER};
use crate::renderer::pipeline_util::{self, PipelineDesc};
use crate::scene::{MeshVertex, Scene, SceneObject};

/// Per-object uniform; layout matches `ObjectUniform` in
/// `modules/object.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    /// Object-to-world transform.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix's upper 3x3.
    pub normal_matrix: [[f32; 4]; 4],
    /// Base color, alpha 1.
    pub color: [f32; 4],
    /// Metalness, roughness, environment intensity, receives-shadow flag.
    pub material: [f32; 4],
}

impl ObjectUniform {
    /// Uniform for `object`.
    #[must_use]
    pub fn new(object: &SceneObject) -> Self {
        let normal_matrix =
            Mat4::from_mat3(Mat3::from_mat4(object.transform).inverse().transpose());
        let m = &object.material;
        Self {
            model: object.transform.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: m.color.extend(1.0).to_array(),
            material: [
                m.metalness,
                m.roughness,
                m.env_intensity,
                if object.receive_shadow { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// A scene object's GPU buffers.
pub(crate) struct GpuObject {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    bind_group: wgpu::BindGroup,
    /// Drawn into the shadow map.
    pub cast_shadow: bool,
}

impl GpuObject {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        object: &SceneObject,
    ) -> Self {
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertices", object.name)),
                contents: bytemuck::cast_slice(&object.mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Indices", object.name)),
                contents: bytemuck::cast_slice(&object.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Uniform", object.name)),
                contents: bytemuck::cast_slice(&[ObjectUniform::new(object)]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let bind_group = pipeline_helpers::single_uniform_bind_group(
            device,
            &format!("{} Bind Group", object.name),
            layout,
            &uniform_buffer,
        );
        Self {
            vertex_buffer,
            index_buffer,
            index_count: object.mesh.indices.len() as u32,
            bind_group,
            cast_shadow: object.cast_shadow,
        }
    }

    /// Bind the object's uniform at `group` and draw it.
    ///
    /// Caller must set the pipeline and the other bind groups first.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, group: u32) {
        if self.index_count == 0 {
            return;
        }
        render_pass.set_bind_group(group, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Pipeline and uploaded objects for the main scene.
pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    object_layout: wgpu::BindGroupLayout,
    objects: Vec<GpuObject>,
}

impl MeshPass {
    /// Compile the mesh pipeline for `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError::Shader`] if the mesh shader fails to
    /// compose.
    pub fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        lighting_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, ViewCubeError> {
        let shader = shader_composer.compose(device, "Mesh Shader", MESH_SHADER)?;
        let object_layout = pipeline_helpers::single_uniform_layout(
            device,
            "Object Bind Group Layout",
        );
        let pipeline = pipeline_util::create_pipeline(
            device,
            PipelineDesc {
                label: "Mesh Pipeline",
                shader: &shader,
                bind_group_layouts: &[camera_layout, lighting_layout, &object_layout],
                vertex_layout: MeshVertex::buffer_layout(),
                color: Some(pipeline_util::opaque_target(format)),
                cull_mode: Some(wgpu::Face::Back),
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
            },
        );
        Ok(Self {
            pipeline,
            object_layout,
            objects: Vec::new(),
        })
    }

    /// Replace the GPU objects with the contents of `scene`.
    pub fn upload_scene(&mut self, device: &wgpu::Device, scene: &Scene) {
        self.objects = scene
            .objects
            .iter()
            .map(|object| GpuObject::new(device, &self.object_layout, object))
            .collect();
        log::debug!("uploaded {} scene objects", self.objects.len());
    }

    /// Layout of the per-object bind group.
    pub fn object_layout(&self) -> &wgpu::BindGroupLayout {
        &self.object_layout
    }

    /// Uploaded objects in draw order.
    pub(crate) fn objects(&self) -> &[GpuObject] {
        &self.objects
    }

    /// Draw every object.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        camera: &wgpu::BindGroup,
        lighting: &wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera, &[]);
        render_pass.set_bind_group(1, lighting, &[]);
        for object in &self.objects {
            object.draw(render_pass, 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::options::{LightingOptions, SceneOptions};

    fn demo_scene() -> Scene {
        Scene::from_options(&SceneOptions::default(), &LightingOptions::default())
    }

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<ObjectUniform>(), 160);
    }

    #[test]
    fn floor_normal_matrix_maps_z_to_y() {
        let scene = demo_scene();
        let floor = scene.object("Floor").unwrap();
        let uniform = ObjectUniform::new(floor);
        let n = Mat4::from_cols_array_2d(&uniform.normal_matrix)
            .transform_vector3(Vec3::Z);
        assert!(n.distance(Vec3::Y) < 1e-5);
        assert_eq!(uniform.material[3], 1.0);
    }

    #[test]
    fn sphere_uniform_carries_material() {
        let options = SceneOptions::default();
        let scene = demo_scene();
        let sphere = scene.object("Sphere").unwrap();
        let uniform = ObjectUniform::new(sphere);
        assert_eq!(uniform.material[0], options.metalness);
        assert_eq!(uniform.material[1], options.roughness);
        assert_eq!(uniform.material[3], 0.0);
        assert_eq!(uniform.model[3][1], options.sphere_elevation);
    }
}
