//! Noise-driven terrain mesh generation

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::height_field::ComputedHeightField;
use super::mesh::{create_from_height_field, Mesh};
use super::sampler::FractalNoise;
use crate::core::{Error, Result};

/// Parameters controlling the noise character of the terrain
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub octaves: u32,      // FBM octaves (detail levels)
    pub amplitude: f64,    // Height contribution of the first octave; 0 gives flat terrain, negative inverts
    pub frequency: f64,    // Noise periods across the grid for the first octave
    pub persistence: f64,  // Amplitude multiplier per octave
    pub lacunarity: f64,   // Frequency multiplier per octave
    pub seed: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            octaves: 1,
            amplitude: 0.2,
            frequency: 2.0,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 12345,
        }
    }
}

impl GenerationSettings {
    /// Most octaves a noise sum may have (same limit as `noise::Fbm::MAX_OCTAVES`)
    pub const MAX_OCTAVES: u32 = 32;

    /// Highest frequency any octave may reach. Noise inputs are sampled over
    /// the unit square, so this also bounds the noise coordinates.
    pub const MAX_FREQUENCY: f64 = 1e9;

    /// Frequency of the last octave: `frequency * lacunarity^(octaves - 1)`
    pub fn top_frequency(&self) -> f64 {
        let steps = self.octaves.saturating_sub(1).min(i32::MAX as u32) as i32;
        self.frequency * self.lacunarity.powi(steps)
    }

    /// Check the settings describe a usable noise sum
    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 || self.octaves > Self::MAX_OCTAVES {
            return Err(Error::InvalidSettings(format!(
                "octaves must be in 1..={}, got {}",
                Self::MAX_OCTAVES, self.octaves
            )));
        }
        let finite = [
            ("amplitude", self.amplitude),
            ("persistence", self.persistence),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidSettings(format!("{} must be finite, got {}", name, value)));
            }
        }
        let positive = [
            ("frequency", self.frequency),
            ("lacunarity", self.lacunarity),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSettings(format!("{} must be finite and positive, got {}", name, value)));
            }
        }
        let top = self.top_frequency();
        if !top.is_finite() || top > Self::MAX_FREQUENCY {
            return Err(Error::InvalidSettings(format!(
                "octave {} reaches frequency {:e}, above the limit of {:e}",
                self.octaves, top, Self::MAX_FREQUENCY
            )));
        }
        Ok(())
    }
}

/// Builds terrain meshes from generation settings
pub struct TerrainGenerator {
    settings: GenerationSettings,
    noise: FractalNoise,
}

impl TerrainGenerator {
    /// Create a generator, rejecting invalid settings
    pub fn new(settings: GenerationSettings) -> Result<Self> {
        settings.validate()?;
        let noise = FractalNoise::new(&settings);
        Ok(Self { settings, noise })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn noise(&self) -> &FractalNoise {
        &self.noise
    }

    /// Sample the noise on a `columns x rows` grid
    pub fn height_field(&self, columns: u32, rows: u32) -> Result<ComputedHeightField> {
        ComputedHeightField::from_noise(columns, rows, &self.noise)
    }

    /// Generate the terrain mesh for a `columns x rows` grid
    pub fn generate(&self, columns: u32, rows: u32) -> Result<Mesh> {
        let start = Instant::now();

        let field = self.height_field(columns, rows)?;
        let mesh = create_from_height_field(columns, rows, &field)?;

        let (lo, hi) = field.height_range();
        log::info!(
            "Generated {}x{} terrain: {} vertices, {} faces, heights {:.3}..{:.3} in {:.1}ms",
            columns, rows,
            mesh.vertex_count(), mesh.face_count(),
            lo, hi,
            start.elapsed().as_secs_f64() * 1000.0
        );
        log::debug!("Generation settings: {:?}", self.settings);

        Ok(mesh)
    }
}
