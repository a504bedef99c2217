//! GPU buffer management

pub mod transform_buffer;
pub mod mesh_buffer;

pub use transform_buffer::{FrameUniforms, TransformBuffer, TransformUniform};
pub use mesh_buffer::{vertex_layout, MeshBuffers};
