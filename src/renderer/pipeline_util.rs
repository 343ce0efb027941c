use crate::gpu::texture::DEPTH_FORMAT;

/// Depth-stencil state of the opaque passes: write, `Less`.
pub fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Everything that varies between the crate's indexed pipelines.
pub struct PipelineDesc<'a> {
    /// Debug label; also prefixes the layout label.
    pub label: &'a str,
    /// Composed module with `vs_main` and, if `color` is set, `fs_main`.
    pub shader: &'a wgpu::ShaderModule,
    /// Bind group layouts in group order.
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    /// Single vertex buffer layout.
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
    /// Color target, or `None` for a depth-only pipeline.
    pub color: Option<wgpu::ColorTargetState>,
    /// Face culling.
    pub cull_mode: Option<wgpu::Face>,
    /// Depth state, or `None` for passes without a depth attachment.
    pub depth_stencil: Option<wgpu::DepthStencilState>,
}

/// Create an indexed triangle-list render pipeline.
pub fn create_pipeline(
    device: &wgpu::Device,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", desc.label)),
            bind_group_layouts: desc.bind_group_layouts,
            push_constant_ranges: &[],
        });

    let targets = [desc.color];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[desc.vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: targets[0].is_some().then(|| wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &targets,
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: desc.depth_stencil,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Opaque color target for `format`.
pub fn opaque_target(format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
    wgpu::ColorTargetState {
        format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    }
}

/// Alpha-blended color target for `format`.
pub fn blended_target(format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
    wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        write_mask: wgpu::ColorWrites::ALL,
    }
}
