//! Terrain mesh pipeline

use naga::ShaderStage;

use crate::core::Result;
use crate::render::buffer::{vertex_layout, MeshBuffers};
use crate::render::shader::{self, FRAGMENT_SHADER, TRANSFORM_MEMBERS, VERTEX_SHADER};
use crate::render::texture::DepthTexture;

/// Render pipeline drawing an indexed triangle list with one solid color
pub struct TerrainPipeline {
    pipeline: wgpu::RenderPipeline,
    polygon_mode: wgpu::PolygonMode,
}

impl TerrainPipeline {
    /// Validate the shader pair and build the pipeline.
    ///
    /// `PolygonMode::Line` requires `Features::POLYGON_MODE_LINE` on the device.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        transforms_layout: &wgpu::BindGroupLayout,
        polygon_mode: wgpu::PolygonMode,
    ) -> Result<Self> {
        let vertex = shader::compile("terrain_vertex", VERTEX_SHADER, ShaderStage::Vertex)?;
        shader::require_uniform_members(&vertex, &TRANSFORM_MEMBERS)?;
        let fragment = shader::compile("terrain_fragment", FRAGMENT_SHADER, ShaderStage::Fragment)?;

        let vertex_module = shader::create_module(device, &vertex, VERTEX_SHADER);
        let fragment_module = shader::create_module(device, &fragment, FRAGMENT_SHADER);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain_pipeline_layout"),
            bind_group_layouts: &[transforms_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(match polygon_mode {
                wgpu::PolygonMode::Line => "terrain_pipeline_wireframe",
                _ => "terrain_pipeline",
            }),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(&vertex.entry_point),
                buffers: &[vertex_layout()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                // Tessellated faces wind clockwise seen from above
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(&fragment.entry_point),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self { pipeline, polygon_mode })
    }

    pub fn polygon_mode(&self) -> wgpu::PolygonMode {
        self.polygon_mode
    }

    /// Clear the target and draw the full index range of `mesh`
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        depth: &DepthTexture,
        transforms: &wgpu::BindGroup,
        mesh: &MeshBuffers,
        clear_color: wgpu::Color,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("terrain_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, transforms, &[]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer().slice(..));
        pass.set_index_buffer(mesh.index_buffer().slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.index_count(), 0, 0..1);
    }
}
