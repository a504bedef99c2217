//! Procedural terrain: noise, height fields and tessellation

pub mod sampler;
pub mod height_field;
pub mod mesh;
pub mod generator;

pub use sampler::{FractalNoise, NoiseSampler};
pub use height_field::{ComputedHeightField, FlatHeightField, HeightField};
pub use mesh::{create_from_height_field, create_xz_grid, Face, Mesh, Vertex};
pub use generator::{GenerationSettings, TerrainGenerator};
