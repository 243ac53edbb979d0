//! Renderer for the 27-cubie puzzle.
//!
//! One shared 36-vertex cube mesh is drawn with 27 instances; each instance
//! carries its cubie's model matrix and six sticker colors. Instance data is
//! rebuilt from the registry and uploaded with `queue.write_buffer` every
//! frame, so the animation path never touches the mesh.

use wgpu::util::DeviceExt;

use crate::game::cubie::CubieRegistry;
use crate::game::CubeState;
use crate::renderer::pipeline_builder::PipelineBuilder;
use crate::renderer::uniform::Uniforms;
use crate::renderer::vertex::{CubieInstance, CubieVertex};

const INSTANCE_COUNT: usize = 27;

/// Pipeline and buffers for drawing the cube.
pub struct CubeRenderer {
    pub pipeline: wgpu::RenderPipeline,
    /// Shared cubie mesh.
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Per-cubie model matrices and sticker colors, rewritten each frame.
    pub instance_buffer: wgpu::Buffer,
    /// GPU buffer holding the view-projection matrix.
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    /// Depth buffer, recreated on resize.
    pub depth_texture: Option<wgpu::Texture>,
}

impl CubeRenderer {
    pub fn new(device: &wgpu::Device, surface_config: &wgpu::SurfaceConfiguration) -> Self {
        let uniforms = Uniforms::new();
        let uniform_buffer = uniforms.create_buffer(device);
        let (uniform_bind_group, uniform_bind_group_layout) =
            uniforms.create_bind_group(&uniform_buffer, device);

        let pipeline = PipelineBuilder::new(device, surface_config.format)
            .with_label("Cube Pipeline")
            .with_shader(include_str!("shaders/cube.wgsl"))
            .with_vertex_buffer(CubieVertex::desc())
            .with_vertex_buffer(CubieInstance::desc())
            .with_bind_group_layout(&uniform_bind_group_layout)
            .with_no_culling()
            .with_depth_stencil(wgpu::DepthStencilState {
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                format: wgpu::TextureFormat::Depth24Plus,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            })
            .build();

        let vertices = CubieVertex::create_cube_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cubie Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instances = [CubieInstance {
            model: [[0.0; 4]; 4],
            face_colors: [[0.0; 4]; 6],
        }; INSTANCE_COUNT];
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cubie Instance Buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            pipeline,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            instance_buffer,
            uniform_buffer,
            uniform_bind_group,
            depth_texture: None,
        }
    }

    /// Recreates the depth texture when the surface size changes and returns
    /// a view onto it.
    pub fn update_depth_texture(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let stale = match &self.depth_texture {
            Some(texture) => texture.width() != width || texture.height() != height,
            None => true,
        };
        if stale {
            self.depth_texture = Some(device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Depth24Plus,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            }));
        }
        self.depth_texture
            .as_ref()
            .expect("depth texture created above")
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Rebuilds all 27 instances from the registry and uploads them.
    pub fn update_instances(&self, queue: &wgpu::Queue, registry: &CubieRegistry) {
        let instances: Vec<CubieInstance> = registry
            .cubies()
            .iter()
            .map(CubieInstance::from_cubie)
            .collect();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
    }

    /// Uploads the frame's camera matrix and draws all cubies.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        cube: &CubeState,
        pass: &mut wgpu::RenderPass,
        aspect: f32,
    ) {
        let uniforms = Uniforms {
            view_proj: cube.camera.view_proj(aspect).into(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, uniforms.as_bytes());

        self.update_instances(queue, &cube.registry);

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..INSTANCE_COUNT as u32);
    }
}
