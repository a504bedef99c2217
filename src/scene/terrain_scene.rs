//! Terrain scene: owns the generated mesh and the current view state

use glam::DMat4;

use super::config::SceneConfig;
use crate::core::{Error, Result};
use crate::render::buffer::{FrameUniforms, TransformUniform};
use crate::terrain::{GenerationSettings, Mesh, TerrainGenerator};

enum SceneState {
    Unloaded,
    Loaded { mesh: Mesh, generation: u64 },
}

/// A single terrain mesh plus the matrices it is drawn with.
///
/// Lifecycle: `Unloaded -> load -> Loaded -> (update* -> frame)* -> unload`.
/// The mesh is rebuilt wholesale by `regenerate`, never edited in place.
pub struct TerrainScene {
    config: SceneConfig,
    state: SceneState,
    /// Incremented on every successful load or regeneration
    generations: u64,
    view: DMat4,
    projection: DMat4,
    model: DMat4,
    elapsed: f64,
}

impl TerrainScene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            state: SceneState::Unloaded,
            generations: 0,
            view: DMat4::IDENTITY,
            projection: DMat4::IDENTITY,
            model: DMat4::IDENTITY,
            elapsed: 0.0,
        }
    }

    /// Generate the terrain mesh. Fails if the scene is already loaded.
    pub fn load(&mut self) -> Result<()> {
        if self.is_loaded() {
            return Err(Error::AlreadyLoaded);
        }
        let mesh = self.build(&self.config.generation)?;
        self.generations += 1;
        self.state = SceneState::Loaded { mesh, generation: self.generations };
        log::info!("Scene loaded (generation {})", self.generations);
        Ok(())
    }

    /// Rebuild the mesh with new settings.
    ///
    /// On failure the previous mesh and settings stay in place.
    pub fn regenerate(&mut self, settings: GenerationSettings) -> Result<()> {
        if !self.is_loaded() {
            return Err(Error::NotLoaded("regenerate"));
        }
        let mesh = self.build(&settings)?;
        self.generations += 1;
        self.config.generation = settings;
        self.state = SceneState::Loaded { mesh, generation: self.generations };
        Ok(())
    }

    fn build(&self, settings: &GenerationSettings) -> Result<Mesh> {
        TerrainGenerator::new(settings.clone())?.generate(self.config.columns, self.config.rows)
    }

    /// Advance scene time
    pub fn update(&mut self, elapsed_secs: f64) {
        self.elapsed = elapsed_secs;
    }

    /// Per-frame draw input. Fails before `load` and after `unload`.
    pub fn frame(&self) -> Result<FrameUniforms> {
        match &self.state {
            SceneState::Loaded { mesh, generation } => Ok(FrameUniforms {
                transforms: TransformUniform::new(&self.projection, &self.view, &self.model),
                index_count: mesh.index_count(),
                generation: *generation,
            }),
            SceneState::Unloaded => Err(Error::NotLoaded("draw")),
        }
    }

    /// Drop the mesh; the scene can be loaded again afterwards
    pub fn unload(&mut self) {
        if self.is_loaded() {
            log::info!("Scene unloaded");
        }
        self.state = SceneState::Unloaded;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SceneState::Loaded { .. })
    }

    /// The current mesh
    pub fn mesh(&self) -> Result<&Mesh> {
        match &self.state {
            SceneState::Loaded { mesh, .. } => Ok(mesh),
            SceneState::Unloaded => Err(Error::NotLoaded("access the mesh")),
        }
    }

    /// Generation number of the current mesh, if loaded
    pub fn generation(&self) -> Option<u64> {
        match &self.state {
            SceneState::Loaded { generation, .. } => Some(*generation),
            SceneState::Unloaded => None,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.config.generation
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn set_view_matrix(&mut self, view: DMat4) {
        self.view = view;
    }

    pub fn set_projection_matrix(&mut self, projection: DMat4) {
        self.projection = projection;
    }
}
