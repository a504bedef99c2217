//! Render pipelines

pub mod terrain;

pub use terrain::TerrainPipeline;
