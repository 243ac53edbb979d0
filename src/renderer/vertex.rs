//! Vertex and instance definitions for cubie rendering.
//!
//! This module provides the [`CubieVertex`] struct describing the shared cube
//! mesh, and [`CubieInstance`], the per-cubie data (model matrix and six face
//! colors) streamed to the GPU every frame. One 36-vertex mesh is drawn 27
//! times with instancing.

use cgmath::Matrix4;

use crate::game::cubie::Cubie;
use crate::game::CUBIE_SIZE;

/// Vertex data for the shared cubie mesh.
///
/// Each vertex carries:
/// - `position`: corner position in the cubie's local space.
/// - `normal`: outward face normal in local space.
/// - `face_index`: which of the six faces the vertex belongs to, used to
///   select the sticker color from the instance data.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubieVertex {
    /// Corner position in cubie-local space.
    pub position: [f32; 3],
    /// Outward face normal in cubie-local space.
    pub normal: [f32; 3],
    /// Face index in `0..6`: +X, -X, +Y, -Y, +Z, -Z.
    pub face_index: u32,
}

impl CubieVertex {
    /// Returns the vertex buffer layout for use in a wgpu pipeline.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubieVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: (2 * std::mem::size_of::<[f32; 3]>()) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }

    /// Generates the 36 vertices of one cubie: six faces of two triangles
    /// each, centered at the origin.
    pub fn create_cube_vertices() -> Vec<CubieVertex> {
        let h = CUBIE_SIZE / 2.0;
        let mut vertices = Vec::with_capacity(36);

        // (normal, face_index, four corners in counter-clockwise order as
        // seen from outside)
        let faces: [([f32; 3], u32, [[f32; 3]; 4]); 6] = [
            (
                [1.0, 0.0, 0.0],
                0,
                [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]],
            ),
            (
                [-1.0, 0.0, 0.0],
                1,
                [[-h, -h, h], [-h, h, h], [-h, h, -h], [-h, -h, -h]],
            ),
            (
                [0.0, 1.0, 0.0],
                2,
                [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
            ),
            (
                [0.0, -1.0, 0.0],
                3,
                [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
            ),
            (
                [0.0, 0.0, 1.0],
                4,
                [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            ),
            (
                [0.0, 0.0, -1.0],
                5,
                [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            ),
        ];

        for (normal, face_index, corners) in faces {
            for &i in &[0usize, 1, 2, 0, 2, 3] {
                vertices.push(CubieVertex {
                    position: corners[i],
                    normal,
                    face_index,
                });
            }
        }

        vertices
    }
}

/// Per-cubie instance data: the model matrix as four column vectors plus one
/// RGBA sticker color per face.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubieInstance {
    /// Model matrix columns (cubie pose).
    pub model: [[f32; 4]; 4],
    /// Sticker colors indexed by face: +X, -X, +Y, -Y, +Z, -Z.
    pub face_colors: [[f32; 4]; 6],
}

/// Sticker palette. Interior faces get the dark plastic color.
const COLOR_RIGHT: [f32; 4] = [0.80, 0.12, 0.10, 1.0]; // +X red
const COLOR_LEFT: [f32; 4] = [0.95, 0.45, 0.08, 1.0]; // -X orange
const COLOR_UP: [f32; 4] = [0.92, 0.92, 0.92, 1.0]; // +Y white
const COLOR_DOWN: [f32; 4] = [0.95, 0.85, 0.10, 1.0]; // -Y yellow
const COLOR_FRONT: [f32; 4] = [0.10, 0.65, 0.20, 1.0]; // +Z green
const COLOR_BACK: [f32; 4] = [0.10, 0.30, 0.80, 1.0]; // -Z blue
const COLOR_INTERIOR: [f32; 4] = [0.08, 0.08, 0.10, 1.0];

impl CubieInstance {
    /// Builds the instance data for one cubie from its live pose.
    ///
    /// Sticker colors derive from the home grid coordinate, so they travel
    /// with the piece as it moves around the cube.
    pub fn from_cubie(cubie: &Cubie) -> Self {
        let model = Matrix4::from_translation(cubie.pose.position)
            * Matrix4::from(cubie.pose.orientation);
        let [hx, hy, hz] = cubie.home_grid;
        let pick = |boundary: bool, color: [f32; 4]| if boundary { color } else { COLOR_INTERIOR };
        Self {
            model: model.into(),
            face_colors: [
                pick(hx == 2, COLOR_RIGHT),
                pick(hx == 0, COLOR_LEFT),
                pick(hy == 2, COLOR_UP),
                pick(hy == 0, COLOR_DOWN),
                pick(hz == 2, COLOR_FRONT),
                pick(hz == 0, COLOR_BACK),
            ],
        }
    }

    /// Returns the instance buffer layout: four mat4 columns and six colors,
    /// stepped per instance.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const VEC4: u64 = std::mem::size_of::<[f32; 4]>() as u64;
        const ATTRS: [wgpu::VertexAttribute; 10] = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: VEC4,
                shader_location: 4,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 2 * VEC4,
                shader_location: 5,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 3 * VEC4,
                shader_location: 6,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 4 * VEC4,
                shader_location: 7,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 5 * VEC4,
                shader_location: 8,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 6 * VEC4,
                shader_location: 9,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 7 * VEC4,
                shader_location: 10,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 8 * VEC4,
                shader_location: 11,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 9 * VEC4,
                shader_location: 12,
                format: wgpu::VertexFormat::Float32x4,
            },
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubieInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}
