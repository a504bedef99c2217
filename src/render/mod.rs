//! Rendering system and GPU interfaces

pub mod context;
pub mod buffer;
pub mod shader;
pub mod pipeline;
pub mod texture;
pub mod renderer;

pub use renderer::{RenderConfig, TerrainRenderer};
