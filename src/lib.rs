//! Terrascape - procedural terrain meshes rendered with wgpu
//!
//! Noise feeds a height field, the height field is tessellated into a
//! shared-vertex triangle mesh, and the mesh is drawn by [`render::TerrainRenderer`].

pub mod core;
pub mod config;
pub mod terrain;
pub mod scene;
pub mod render;
