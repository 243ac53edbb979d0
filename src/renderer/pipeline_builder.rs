//! # WGPU Pipeline Builder Utilities
//!
//! This module provides a builder pattern for creating WGPU render pipelines,
//! reducing boilerplate and keeping pipeline creation maintainable.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! let pipeline = PipelineBuilder::new(&device, surface_format)
//!     .with_label("My Pipeline")
//!     .with_shader(shader_source)
//!     .with_vertex_buffer(CubieVertex::desc())
//!     .with_bind_group_layout(&bind_group_layout)
//!     .build();
//! ```

/// Builder for creating render pipelines with common patterns used in the
/// cube renderer.
///
/// ## Default Configuration
///
/// - Vertex entry point: `"vs_main"`
/// - Fragment entry point: `"fs_main"`
/// - Blend state: `REPLACE` (no blending)
/// - Cull mode: `Back` face culling
/// - Primitive topology: `TriangleList`
/// - Front face: Counter-clockwise
/// - No depth testing
pub struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    surface_format: wgpu::TextureFormat,
    label: Option<&'a str>,
    shader_source: Option<&'a str>,
    vertex_entry: Option<&'a str>,
    fragment_entry: Option<&'a str>,
    vertex_buffers: Vec<wgpu::VertexBufferLayout<'a>>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    blend_state: Option<wgpu::BlendState>,
    cull_mode: Option<wgpu::Face>,
    depth_stencil: Option<wgpu::DepthStencilState>,
}

impl<'a> PipelineBuilder<'a> {
    /// Create a new pipeline builder with default settings.
    pub fn new(device: &'a wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            surface_format,
            label: None,
            shader_source: None,
            vertex_entry: Some("vs_main"),
            fragment_entry: Some("fs_main"),
            vertex_buffers: Vec::new(),
            bind_group_layouts: Vec::new(),
            blend_state: Some(wgpu::BlendState::REPLACE),
            cull_mode: Some(wgpu::Face::Back),
            depth_stencil: None,
        }
    }

    /// Set the pipeline label for debugging purposes.
    ///
    /// The label is applied to the pipeline, shader module, and pipeline
    /// layout.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the shader source code (WGSL format).
    ///
    /// Required; the source should contain both vertex and fragment entry
    /// points.
    pub fn with_shader(mut self, source: &'a str) -> Self {
        self.shader_source = Some(source);
        self
    }

    /// Add a vertex buffer layout to the pipeline.
    ///
    /// May be called multiple times for multiple vertex buffers (for example,
    /// a per-vertex buffer plus a per-instance buffer).
    pub fn with_vertex_buffer(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_buffers.push(layout);
        self
    }

    /// Add a bind group layout to the pipeline.
    pub fn with_bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    /// Set a custom blend state for color blending.
    pub fn with_blend_state(mut self, blend: wgpu::BlendState) -> Self {
        self.blend_state = Some(blend);
        self
    }

    /// Disable face culling, rendering both sides of every triangle.
    pub fn with_no_culling(mut self) -> Self {
        self.cull_mode = None;
        self
    }

    /// Set depth and stencil testing configuration.
    pub fn with_depth_stencil(mut self, depth_stencil: wgpu::DepthStencilState) -> Self {
        self.depth_stencil = Some(depth_stencil);
        self
    }

    /// Build the render pipeline with the configured parameters.
    ///
    /// # Panics
    ///
    /// Panics if no shader source was provided.
    pub fn build(self) -> wgpu::RenderPipeline {
        let shader_source = self.shader_source.expect("Shader source must be provided");

        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: self.label,
                source: wgpu::ShaderSource::Wgsl(shader_source.into()),
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: self.label,
                bind_group_layouts: &self.bind_group_layouts,
                push_constant_ranges: &[],
            });

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: self.vertex_entry,
                    buffers: &self.vertex_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: self.fragment_entry,
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: self.blend_state,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: self.cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: self.depth_stencil,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
    }
}
