//! GPU side of the view cube: the labelled cube and its hover highlights.
//!
//! The gizmo renders either into a corner viewport of the main surface or
//! into a surface of its own. Neither mode uses a depth buffer: the cube is
//! convex and back-face culled, and the highlights draw on top.

use wgpu::util::DeviceExt;

use crate::camera::core::CameraUniform;
use crate::error::ViewCubeError;
use crate::gizmo::{CubeFace, LabelAtlas, ViewCube, CUBE_HALF_EXTENT};
use crate::gpu::pipeline_helpers;
use crate::gpu::shader_composer::{
    ShaderComposer, HIGHLIGHT_SHADER, VIEW_CUBE_SHADER,
};
use crate::gpu::texture::LabelTexture;
use crate::input::Rect;
use crate::options::{Corner, ViewCubeOptions};
use crate::renderer::pipeline_util::{self, PipelineDesc};
use crate::scene::{Mesh, MeshVertex};

/// Vertex of the highlight quads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HighlightVertex {
    /// Cube-space position.
    pub position: [f32; 3],
    /// Straight-alpha RGBA.
    pub color: [f32; 4],
}

impl HighlightVertex {
    fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        }
    }
}

/// Four corners per hit region, colored with the region's current opacity.
#[must_use]
pub fn highlight_vertices(view_cube: &ViewCube, color: [f32; 3]) -> Vec<HighlightVertex> {
    view_cube
        .planes()
        .iter()
        .flat_map(|plane| {
            let alpha = view_cube.plane_opacity(plane.face);
            plane.corners().map(|corner| HighlightVertex {
                position: corner.to_array(),
                color: [color[0], color[1], color[2], alpha],
            })
        })
        .collect()
}

fn highlight_indices() -> Vec<u16> {
    (0..CubeFace::ALL.len() as u16)
        .flat_map(|i| {
            let b = i * 4;
            [b, b + 1, b + 2, b, b + 2, b + 3]
        })
        .collect()
}

/// Corner viewport of the gizmo on a `width` x `height` surface, in
/// physical pixels. The logical size and margin scale with
/// `scale_factor`; the viewport never exceeds the surface.
#[must_use]
pub fn corner_viewport(
    options: &ViewCubeOptions,
    width: u32,
    height: u32,
    scale_factor: f64,
) -> Rect {
    let (width, height) = (width as f32, height as f32);
    let scale = scale_factor as f32;
    let size = (options.size * scale).min(width).min(height).max(1.0);
    let margin = (options.margin * scale)
        .min(((width - size) * 0.5).max(0.0))
        .min(((height - size) * 0.5).max(0.0));
    let x = match options.corner {
        Corner::TopLeft | Corner::BottomLeft => margin,
        Corner::TopRight | Corner::BottomRight => width - size - margin,
    };
    let y = match options.corner {
        Corner::TopLeft | Corner::TopRight => margin,
        Corner::BottomLeft | Corner::BottomRight => height - size - margin,
    };
    Rect {
        x,
        y,
        width: size,
        height: size,
    }
}

/// Where a gizmo frame lands.
#[derive(Debug, Clone, Copy)]
pub enum GizmoTarget {
    /// Draw over existing content inside `viewport`.
    Corner(Rect),
    /// Clear to transparent and fill the whole target.
    Full,
}

/// Pipelines and buffers for drawing the view cube.
pub struct ViewCubeRenderer {
    format: wgpu::TextureFormat,
    cube_pipeline: wgpu::RenderPipeline,
    highlight_pipeline: wgpu::RenderPipeline,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    highlight_vertex_buffer: wgpu::Buffer,
    highlight_index_buffer: wgpu::Buffer,
    highlight_index_count: u32,
    highlight_color: [f32; 3],
    uploaded_hover: Option<Option<CubeFace>>,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    _labels: LabelTexture,
    label_bind_group: wgpu::BindGroup,
}

impl ViewCubeRenderer {
    /// Generate the label textures and compile the gizmo pipelines for
    /// `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCubeError::Shader`] if a gizmo shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shader_composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        options: &ViewCubeOptions,
    ) -> Result<Self, ViewCubeError> {
        let camera_layout =
            pipeline_helpers::single_uniform_layout(device, "View Cube Camera Layout");
        let label_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("View Cube Label Layout"),
                entries: &[
                    pipeline_helpers::texture_2d_array(0),
                    pipeline_helpers::filtering_sampler(1),
                ],
            });

        let cube_shader =
            shader_composer.compose(device, "View Cube Shader", VIEW_CUBE_SHADER)?;
        let cube_pipeline = pipeline_util::create_pipeline(
            device,
            PipelineDesc {
                label: "View Cube Pipeline",
                shader: &cube_shader,
                bind_group_layouts: &[&camera_layout, &label_layout],
                vertex_layout: MeshVertex::buffer_layout(),
                color: Some(pipeline_util::opaque_target(format)),
                cull_mode: Some(wgpu::Face::Back),
                depth_stencil: None,
            },
        );

        let highlight_shader =
            shader_composer.compose(device, "Highlight Shader", HIGHLIGHT_SHADER)?;
        let highlight_pipeline = pipeline_util::create_pipeline(
            device,
            PipelineDesc {
                label: "View Cube Highlight Pipeline",
                shader: &highlight_shader,
                bind_group_layouts: &[&camera_layout],
                vertex_layout: HighlightVertex::buffer_layout(),
                color: Some(pipeline_util::blended_target(format)),
                cull_mode: None,
                depth_stencil: None,
            },
        );

        let cube = Mesh::cube(CUBE_HALF_EXTENT * 2.0);
        let cube_vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("View Cube Vertices"),
                contents: bytemuck::cast_slice(&cube.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let cube_index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("View Cube Indices"),
                contents: bytemuck::cast_slice(&cube.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let highlight_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("View Cube Highlight Vertices"),
            size: (size_of::<HighlightVertex>() * 4 * CubeFace::ALL.len())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let indices = highlight_indices();
        let highlight_index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("View Cube Highlight Indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("View Cube Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = pipeline_helpers::single_uniform_bind_group(
            device,
            "View Cube Camera Bind Group",
            &camera_layout,
            &camera_buffer,
        );

        let labels =
            LabelTexture::new(device, queue, &LabelAtlas::generate(options.label_size));
        let label_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("View Cube Label Bind Group"),
            layout: &label_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&labels.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&labels.sampler),
                },
            ],
        });

        Ok(Self {
            format,
            cube_pipeline,
            highlight_pipeline,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube.indices.len() as u32,
            highlight_vertex_buffer,
            highlight_index_buffer,
            highlight_index_count: indices.len() as u32,
            highlight_color: options.highlight_color,
            uploaded_hover: None,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            _labels: labels,
            label_bind_group,
        })
    }

    /// Color format the pipelines were built for.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Change the highlight color and force the quads to be re-uploaded
    /// on the next [`update`](Self::update).
    pub fn set_highlight_color(&mut self, color: [f32; 3]) {
        self.highlight_color = color;
        self.uploaded_hover = None;
    }

    /// Upload the gizmo camera, and the highlight quads if the hovered face
    /// changed since the last upload.
    pub fn update(&mut self, queue: &wgpu::Queue, view_cube: &ViewCube) {
        self.camera_uniform.update_view_proj(view_cube.camera());
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        let hovered = view_cube.hovered();
        if self.uploaded_hover != Some(hovered) {
            let vertices = highlight_vertices(view_cube, self.highlight_color);
            queue.write_buffer(
                &self.highlight_vertex_buffer,
                0,
                bytemuck::cast_slice(&vertices),
            );
            self.uploaded_hover = Some(hovered);
        }
    }

    /// Record the gizmo pass into `view`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        target: GizmoTarget,
    ) {
        let load = match target {
            GizmoTarget::Corner(_) => wgpu::LoadOp::Load,
            GizmoTarget::Full => wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
        };
        let mut render_pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("View Cube Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

        if let GizmoTarget::Corner(rect) = target {
            render_pass.set_viewport(rect.x, rect.y, rect.width, rect.height, 0.0, 1.0);
        }

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        render_pass.set_pipeline(&self.cube_pipeline);
        render_pass.set_bind_group(1, &self.label_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
        render_pass.set_index_buffer(
            self.cube_index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(0..self.cube_index_count, 0, 0..1);

        if self.uploaded_hover.flatten().is_some() {
            render_pass.set_pipeline(&self.highlight_pipeline);
            render_pass.set_vertex_buffer(0, self.highlight_vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                self.highlight_index_buffer.slice(..),
                wgpu::IndexFormat::Uint16,
            );
            render_pass.draw_indexed(0..self.highlight_index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn highlight_vertex_layout() {
        assert_eq!(size_of::<HighlightVertex>(), 28);
        assert_eq!(highlight_indices().len(), 36);
        assert_eq!(highlight_indices()[6..12], [4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn only_hovered_plane_is_opaque() {
        let options = ViewCubeOptions::default();
        let mut cube = ViewCube::new(&options, 1.0);
        let idle = highlight_vertices(&cube, options.highlight_color);
        assert_eq!(idle.len(), 24);
        assert!(idle.iter().all(|v| v.color[3] == 0.0));

        assert!(cube.pointer_moved(Vec2::ZERO));
        let hovered = cube.hovered().unwrap();
        let vertices = highlight_vertices(&cube, options.highlight_color);
        for (i, v) in vertices.iter().enumerate() {
            let expected = if i / 4 == hovered.index() {
                options.highlight_opacity
            } else {
                0.0
            };
            assert_eq!(v.color[3], expected);
            assert_eq!(v.color[..3], options.highlight_color);
        }
    }

    #[test]
    fn corner_viewport_positions() {
        let options = ViewCubeOptions::default();
        let rect = corner_viewport(&options, 800, 600, 1.0);
        assert_eq!((rect.x, rect.y), (800.0 - 128.0 - 16.0, 16.0));
        assert_eq!((rect.width, rect.height), (128.0, 128.0));

        let bottom_left = ViewCubeOptions {
            corner: Corner::BottomLeft,
            ..Default::default()
        };
        let rect = corner_viewport(&bottom_left, 800, 600, 2.0);
        assert_eq!((rect.x, rect.y), (32.0, 600.0 - 256.0 - 32.0));
        assert_eq!(rect.width, 256.0);
    }

    #[test]
    fn corner_viewport_fits_tiny_surface() {
        let options = ViewCubeOptions::default();
        let rect = corner_viewport(&options, 100, 60, 1.0);
        assert_eq!(rect.width, 60.0);
        assert!(rect.x >= 0.0 && rect.y >= 0.0);
        assert!(rect.x + rect.width <= 100.0);
        assert!(rect.y + rect.height <= 60.0);
    }
}
