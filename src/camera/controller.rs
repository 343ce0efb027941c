use glam::Vec3;
use wgpu::util::DeviceExt;

use super::core::{Camera, CameraUniform};
use super::orbit::OrbitControls;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::options::{CameraOptions, ControlsOptions};

/// Main-view camera: orbit controls plus the GPU uniform they drive.
pub struct CameraController {
    /// Orbit controls owning the eye/target state.
    pub controls: OrbitControls,
    /// Camera rebuilt from the controls every update.
    pub camera: Camera,
    /// CPU copy of the uniform.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Layout shared by every pipeline that reads the camera.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl CameraController {
    /// Create the controller and its GPU resources.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        camera_options: &CameraOptions,
        controls_options: &ControlsOptions,
    ) -> Self {
        let position = Vec3::from_array(camera_options.position);
        let target = Vec3::from_array(camera_options.target);

        let mut controls = OrbitControls::new(
            position,
            target,
            camera_options.fovy,
            controls_options,
        );
        let (width, height) = context.size();
        controls.set_viewport_height(height as f32);

        let camera = Camera {
            eye: position,
            target,
            up: Vec3::Y,
            aspect: aspect_ratio(width, height),
            fovy: camera_options.fovy,
            znear: camera_options.znear,
            zfar: camera_options.zfar,
        };

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = create_camera_layout(&context.device);

        let bind_group = pipeline_helpers::single_uniform_bind_group(
            &context.device,
            "Camera Bind Group",
            &layout,
            &buffer,
        );

        Self {
            controls,
            camera,
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Advance the orbit controls and copy the result into the camera.
    /// Returns `true` if the view changed.
    pub fn update(&mut self, dt: f32) -> bool {
        let moved = self.controls.update(dt);
        self.camera.eye = self.controls.position();
        self.camera.target = self.controls.target();
        moved
    }

    /// Upload the current camera to the GPU.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Track a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = aspect_ratio(width, height);
        self.controls.set_viewport_height(height as f32);
    }

    /// Apply new camera and controls options. The current view is kept;
    /// the configured placement becomes the reset state.
    pub fn apply_options(
        &mut self,
        camera_options: &CameraOptions,
        controls_options: &ControlsOptions,
    ) {
        self.camera.fovy = camera_options.fovy;
        self.camera.znear = camera_options.znear;
        self.camera.zfar = camera_options.zfar;
        self.controls.set_fovy(camera_options.fovy);
        self.controls.apply_options(controls_options);

        self.controls.set_home(
            Vec3::from_array(camera_options.position),
            Vec3::from_array(camera_options.target),
        );
    }
}

/// Bind group layout for a single camera uniform at binding 0.
#[must_use]
pub fn create_camera_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    pipeline_helpers::single_uniform_layout(device, "Camera Bind Group Layout")
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
