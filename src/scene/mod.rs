//! Terrain scene lifecycle

pub mod config;
pub mod terrain_scene;

pub use config::SceneConfig;
pub use terrain_scene::TerrainScene;
