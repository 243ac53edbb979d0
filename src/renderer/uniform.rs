//! Uniform buffer utilities for wgpu rendering.
//!
//! This module provides the [`Uniforms`] struct for storing and uploading the
//! per-frame view-projection matrix to the GPU, plus helpers for buffer and
//! bind group creation.

use wgpu::util::DeviceExt;

/// Uniforms for the cube render pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::new()
    }
}

impl Uniforms {
    /// Creates a new [`Uniforms`] with all elements set to zero.
    pub fn new() -> Self {
        Self {
            view_proj: [[0.0; 4]; 4],
        }
    }

    /// Returns the raw bytes of the uniform struct for uploading to the GPU.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Creates a GPU buffer containing the uniform data.
    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: self.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Creates a bind group and layout for the uniform buffer.
    ///
    /// # Returns
    /// A tuple of (`wgpu::BindGroup`, `wgpu::BindGroupLayout`) for binding
    /// the uniform buffer in a pipeline.
    pub fn create_bind_group(
        &self,
        buffer: &wgpu::Buffer,
        device: &wgpu::Device,
    ) -> (wgpu::BindGroup, wgpu::BindGroupLayout) {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("uniform_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });
        (bind_group, layout)
    }
}
