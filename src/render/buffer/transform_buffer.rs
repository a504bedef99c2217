//! GPU uniform buffer for the terrain transforms

use bytemuck::{Pod, Zeroable};
use glam::DMat4;

/// Transform uniform data for GPU (must match the `Transforms` struct in
/// `terrain_vertex.wgsl` exactly)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    /// Projection matrix (64 bytes, offset 0)
    pub projection: [[f32; 4]; 4],
    /// View matrix (64 bytes, offset 64)
    pub view: [[f32; 4]; 4],
    /// Model matrix (64 bytes, offset 128)
    pub model: [[f32; 4]; 4],
}

impl TransformUniform {
    /// Narrow double precision matrices for upload
    pub fn new(projection: &DMat4, view: &DMat4, model: &DMat4) -> Self {
        Self {
            projection: projection.as_mat4().to_cols_array_2d(),
            view: view.as_mat4().to_cols_array_2d(),
            model: model.as_mat4().to_cols_array_2d(),
        }
    }
}

impl Default for TransformUniform {
    fn default() -> Self {
        Self::new(&DMat4::IDENTITY, &DMat4::IDENTITY, &DMat4::IDENTITY)
    }
}

/// Everything a frame needs to draw the current mesh
#[derive(Clone, Copy, Debug)]
pub struct FrameUniforms {
    pub transforms: TransformUniform,
    /// Indices to draw, three per face
    pub index_count: u32,
    /// Mesh generation the frame was built for
    pub generation: u64,
}

/// GPU buffer for the transform uniform
pub struct TransformBuffer {
    /// Uniform buffer
    buffer: wgpu::Buffer,
    /// Bind group layout
    bind_group_layout: wgpu::BindGroupLayout,
    /// Bind group
    bind_group: wgpu::BindGroup,
}

impl TransformBuffer {
    /// Create new transform buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("terrain_transforms"),
            size: std::mem::size_of::<TransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain_transforms_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain_transforms_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Write this frame's matrices
    pub fn update(&self, queue: &wgpu::Queue, uniform: &TransformUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Get bind group layout
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Get bind group
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
