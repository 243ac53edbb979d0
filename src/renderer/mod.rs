//! Rendering: GPU setup, the instanced cube pass, and the text overlay.

pub mod cube_renderer;
pub mod pipeline_builder;
pub mod text;
pub mod uniform;
pub mod vertex;
pub mod wgpu_lib;
