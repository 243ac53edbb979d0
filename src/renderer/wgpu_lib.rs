//! WGPU-based renderer for the cube app.
//!
//! This module provides [`WgpuRenderer`], which manages the GPU device and
//! surface, the depth buffer, and orchestrates the render passes for a frame:
//! a clear pass, the instanced cube pass, and the text overlay pass.
//!
//! # Usage
//! Create a [`WgpuRenderer`] via [`WgpuRenderer::new`] and call
//! [`WgpuRenderer::update_canvas`] each frame to render the current state.

use crate::game::CubeState;
use crate::renderer::cube_renderer::CubeRenderer;
use crate::renderer::text::TextRenderer;
use wgpu::{SurfaceTexture, TextureView};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.07,
    g: 0.07,
    b: 0.09,
    a: 1.0,
};

/// Main WGPU renderer: owns the surface, device, queue, and the cube
/// renderer.
pub struct WgpuRenderer {
    /// The WGPU surface for presenting rendered frames.
    pub surface: wgpu::Surface<'static>,
    /// The surface configuration (format, size, etc.).
    pub surface_config: wgpu::SurfaceConfiguration,
    /// The WGPU device for resource creation.
    pub device: wgpu::Device,
    /// The WGPU queue for submitting commands.
    pub queue: wgpu::Queue,
    /// Pipeline and buffers for the 27 cubies.
    pub cube_renderer: CubeRenderer,
}

impl WgpuRenderer {
    /// Initializes a new [`WgpuRenderer`] and all associated GPU resources.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Self {
        let adapter = Self::create_adapter(instance, &surface).await;
        let (device, queue) = Self::create_device(&adapter).await;
        let surface_config = Self::create_surface_config(&surface, &adapter, width, height);

        surface.configure(&device, &surface_config);

        let cube_renderer = CubeRenderer::new(&device, &surface_config);

        Self {
            surface,
            surface_config,
            device,
            queue,
            cube_renderer,
        }
    }

    /// Reconfigures the surface after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Renders the current frame to the surface.
    ///
    /// Returns the surface texture for the caller to present after the
    /// encoder is submitted.
    pub fn update_canvas(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        cube: &CubeState,
        text_renderer: &mut TextRenderer,
    ) -> Result<SurfaceTexture, String> {
        let (surface_texture, surface_view) = self.get_surface_texture_and_view()?;
        let depth_texture_view = self.update_depth_texture();

        self.clear_render_target(encoder, &surface_view, &depth_texture_view);
        self.render_cube(encoder, &surface_view, &depth_texture_view, cube);
        self.render_text(encoder, &surface_view, text_renderer);

        Ok(surface_texture)
    }

    /// Blocks until the GPU has finished all outstanding work.
    pub fn cleanup(&self) {
        self.device.poll(wgpu::Maintain::Wait);
    }

    // Private helper methods

    async fn create_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> wgpu::Adapter {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(surface),
            })
            .await
            .expect("Failed to find an appropriate adapter")
    }

    async fn create_device(adapter: &wgpu::Adapter) -> (wgpu::Device, wgpu::Queue) {
        adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .expect("Failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> wgpu::SurfaceConfiguration {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .find(|&&f| f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .copied()
            .unwrap_or(capabilities.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: capabilities.alpha_modes[0],
            view_formats: vec![],
        }
    }

    fn get_surface_texture_and_view(&self) -> Result<(SurfaceTexture, TextureView), String> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Outdated) => {
                return Err("WGPU surface outdated".to_string());
            }
            Err(_) => {
                return Err("Failed to acquire next swap chain texture".to_string());
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok((surface_texture, surface_view))
    }

    fn update_depth_texture(&mut self) -> TextureView {
        let (width, height) = (self.surface_config.width, self.surface_config.height);
        self.cube_renderer
            .update_depth_texture(&self.device, width, height)
    }

    fn clear_render_target(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        depth_texture_view: &TextureView,
    ) {
        let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_texture_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
    }

    fn render_cube(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        depth_texture_view: &TextureView,
        cube: &CubeState,
    ) {
        let aspect = self.surface_config.width as f32 / self.surface_config.height as f32;

        let mut cube_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Cube Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_texture_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        self.cube_renderer
            .render(&self.queue, cube, &mut cube_pass, aspect);
    }

    fn render_text(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        text_renderer: &mut TextRenderer,
    ) {
        self.prepare_text_renderer(text_renderer);

        let mut text_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Text Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = text_renderer.render(&mut text_pass) {
            println!("Text render failed: {:?}", e);
        }
        drop(text_pass);

        // Release atlas space for glyphs no longer on screen.
        text_renderer.trim();
    }

    fn prepare_text_renderer(&self, text_renderer: &mut TextRenderer) {
        text_renderer.resize(
            &self.queue,
            glyphon::Resolution {
                width: self.surface_config.width,
                height: self.surface_config.height,
            },
        );

        if let Err(e) = text_renderer.prepare(&self.device, &self.queue, &self.surface_config) {
            println!("Failed to prepare text renderer: {:?}", e);
        }
    }
}
