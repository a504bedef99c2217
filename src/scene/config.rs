//! Scene configuration

use serde::{Deserialize, Serialize};

use crate::core::camera::ProjectionKind;
use crate::terrain::GenerationSettings;

/// Configuration for the terrain scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Grid cells along X
    pub columns: u32,
    /// Grid cells along Z
    pub rows: u32,
    /// Noise parameters for the height field
    pub generation: GenerationSettings,
    /// Projection used at startup
    pub projection: ProjectionKind,
    /// Initial distance of the orbit camera from the terrain center
    pub camera_distance: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            columns: 1280,
            rows: 1280,
            generation: GenerationSettings::default(),
            projection: ProjectionKind::Perspective,
            camera_distance: 2.0,
        }
    }
}

impl SceneConfig {
    /// Square grid of `size x size` cells
    pub fn with_grid_size(mut self, size: u32) -> Self {
        self.columns = size;
        self.rows = size;
        self
    }
}
