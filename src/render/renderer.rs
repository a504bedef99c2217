//! Terrain renderer: owns every GPU resource the scene draws with

use serde::{Deserialize, Serialize};

use super::buffer::{FrameUniforms, MeshBuffers, TransformBuffer};
use super::pipeline::TerrainPipeline;
use super::texture::DepthTexture;
use crate::core::{Error, Result};
use crate::terrain::Mesh;

/// Render settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Draw triangle edges only (needs `POLYGON_MODE_LINE`)
    pub wireframe: bool,
    /// Background color (linear RGBA)
    pub clear_color: [f64; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wireframe: true,
            clear_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Pipelines, uniforms, depth target and the uploaded mesh.
///
/// Buffers are released when replaced, on [`release`](Self::release), or
/// when the renderer is dropped.
pub struct TerrainRenderer {
    fill: TerrainPipeline,
    /// Present only when the device supports line polygon mode
    wireframe: Option<TerrainPipeline>,
    use_wireframe: bool,
    transforms: TransformBuffer,
    depth: DepthTexture,
    mesh: Option<MeshBuffers>,
    clear_color: wgpu::Color,
}

impl TerrainRenderer {
    /// Validate shaders and build all pipelines. Nothing is returned on failure.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &RenderConfig,
    ) -> Result<Self> {
        let transforms = TransformBuffer::new(device);
        let layout = transforms.bind_group_layout();

        let fill = TerrainPipeline::new(device, surface_format, layout, wgpu::PolygonMode::Fill)?;
        let wireframe = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(TerrainPipeline::new(device, surface_format, layout, wgpu::PolygonMode::Line)?)
        } else {
            if config.wireframe {
                log::warn!("Device lacks POLYGON_MODE_LINE, drawing filled triangles");
            }
            None
        };

        let [r, g, b, a] = config.clear_color;
        let mut renderer = Self {
            fill,
            wireframe,
            use_wireframe: false,
            transforms,
            depth: DepthTexture::new(device, width, height),
            mesh: None,
            clear_color: wgpu::Color { r, g, b, a },
        };
        renderer.set_wireframe(config.wireframe);
        Ok(renderer)
    }

    /// Replace the uploaded mesh wholesale
    pub fn upload(&mut self, device: &wgpu::Device, mesh: &Mesh, generation: u64) {
        // Drop the old buffers before allocating the new ones
        self.mesh = None;
        self.mesh = Some(MeshBuffers::upload(device, mesh, generation));
    }

    /// Free the mesh buffers; drawing fails until the next upload
    pub fn release(&mut self) {
        if self.mesh.take().is_some() {
            log::info!("Released terrain mesh buffers");
        }
    }

    /// Generation of the uploaded mesh, if any
    pub fn uploaded_generation(&self) -> Option<u64> {
        self.mesh.as_ref().map(MeshBuffers::generation)
    }

    /// Draw the uploaded mesh into `target`
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        queue: &wgpu::Queue,
        frame: &FrameUniforms,
    ) -> Result<()> {
        let mesh = self.mesh.as_ref().ok_or(Error::NotLoaded("draw"))?;
        if mesh.generation() != frame.generation || mesh.index_count() != frame.index_count {
            return Err(Error::InvalidMesh(format!(
                "uploaded mesh is generation {} ({} indices), frame expects generation {} ({} indices)",
                mesh.generation(), mesh.index_count(), frame.generation, frame.index_count
            )));
        }

        self.transforms.update(queue, &frame.transforms);
        self.pipeline().render(
            encoder,
            target,
            &self.depth,
            self.transforms.bind_group(),
            mesh,
            self.clear_color,
        );
        Ok(())
    }

    /// Recreate the depth target for a new surface size
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 || self.depth_size() == (width, height) {
            return;
        }
        self.depth = DepthTexture::new(device, width, height);
    }

    /// Size of the current depth target
    pub fn depth_size(&self) -> (u32, u32) {
        (self.depth.width(), self.depth.height())
    }

    /// Switch between wireframe and filled triangles.
    ///
    /// Returns whether wireframe is now active.
    pub fn set_wireframe(&mut self, enabled: bool) -> bool {
        self.use_wireframe = enabled && self.wireframe.is_some();
        self.use_wireframe
    }

    pub fn is_wireframe(&self) -> bool {
        self.pipeline().polygon_mode() == wgpu::PolygonMode::Line
    }

    fn pipeline(&self) -> &TerrainPipeline {
        match (&self.wireframe, self.use_wireframe) {
            (Some(wireframe), true) => wireframe,
            _ => &self.fill,
        }
    }
}
