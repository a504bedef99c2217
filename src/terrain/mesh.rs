//! Height-field tessellation into a shared-vertex triangle mesh

use bytemuck::{Pod, Zeroable};

use super::height_field::{intersection_count, FlatHeightField, HeightField};
use crate::core::{Error, Result};

/// Mesh vertex, laid out for direct upload as a vertex buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangle as three indices into the mesh's vertex list.
///
/// Layout matches a `u32` index buffer, three indices per face.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Face {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
}

impl Face {
    pub const fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn indices(&self) -> [u32; 3] {
        [self.v0, self.v1, self.v2]
    }
}

/// Immutable triangle mesh
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Build a mesh, checking every face index against the vertex count
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self> {
        if faces.len() as u64 * 3 > u32::MAX as u64 {
            return Err(Error::InvalidMesh(format!("{} faces exceed the u32 index range", faces.len())));
        }
        let count = vertices.len();
        if let Some((i, face)) = faces
            .iter()
            .enumerate()
            .find(|(_, f)| f.indices().iter().any(|&v| v as usize >= count))
        {
            return Err(Error::InvalidMesh(format!(
                "face {} {:?} references a vertex outside 0..{}",
                i, face.indices(), count
            )));
        }
        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of indices in the index buffer (three per face).
    /// Construction guarantees it fits a `u32`.
    pub fn index_count(&self) -> u32 {
        (self.faces.len() * 3) as u32
    }

    /// Raw vertex bytes for GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw `u32` index bytes for GPU upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.faces)
    }
}

/// Flat grid over `[-0.5, 0.5]` in X and Z
pub fn create_xz_grid(columns: u32, rows: u32) -> Result<Mesh> {
    create_from_height_field(columns, rows, &FlatHeightField)
}

/// Tessellate a height field into two triangles per grid cell.
///
/// Vertex `(x, y)` sits at index `x * (rows + 1) + y`. Every quad is split
/// along the same diagonal (v0-v2), which can show artifacts on steep slopes.
pub fn create_from_height_field<H: HeightField + ?Sized>(
    columns: u32,
    rows: u32,
    field: &H,
) -> Result<Mesh> {
    let vertex_count = intersection_count(columns, rows)?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for x in 0..=columns {
        for y in 0..=rows {
            let height = field.height(x, y);
            vertices.push(Vertex {
                position: [
                    x as f32 / columns as f32 - 0.5,
                    height as f32,
                    y as f32 / rows as f32 - 0.5,
                ],
                normal: field.normal(x, y).to_array(),
            });
        }
    }

    let stride = rows + 1;
    let mut faces = Vec::with_capacity(columns as usize * rows as usize * 2);
    for x in 0..columns {
        for y in 0..rows {
            let v0 = x * stride + y;
            let v1 = (x + 1) * stride + y;
            let v2 = (x + 1) * stride + y + 1;
            let v3 = x * stride + y + 1;

            faces.push(Face::new(v0, v1, v2));
            faces.push(Face::new(v0, v2, v3));
        }
    }

    Mesh::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::height_field::ComputedHeightField;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(std::mem::size_of::<Face>(), 12);
    }

    #[test]
    fn test_counts() {
        for (columns, rows) in [(1, 1), (1, 5), (4, 3), (16, 16), (33, 7)] {
            let mesh = create_xz_grid(columns, rows).unwrap();
            assert_eq!(mesh.vertex_count(), ((columns + 1) * (rows + 1)) as usize);
            assert_eq!(mesh.face_count(), (2 * columns * rows) as usize);
            assert_eq!(mesh.index_count(), 6 * columns * rows);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = create_xz_grid(9, 5).unwrap();
        let count = mesh.vertex_count() as u32;
        assert!(mesh.faces().iter().flat_map(|f| f.indices()).all(|i| i < count));
    }

    #[test]
    fn test_flat_grid_positions() {
        let (columns, rows) = (4, 5);
        let mesh = create_xz_grid(columns, rows).unwrap();

        for x in 0..=columns {
            for y in 0..=rows {
                let v = mesh.vertices()[(x * (rows + 1) + y) as usize];
                assert_eq!(v.position[0], x as f32 / columns as f32 - 0.5);
                assert_eq!(v.position[1], 0.0);
                assert_eq!(v.position[2], y as f32 / rows as f32 - 0.5);
                assert_eq!(v.normal, [0.0, 1.0, 0.0]);
            }
        }
    }

    #[test]
    fn test_grid_2x2() {
        let mesh = create_xz_grid(2, 2).unwrap();
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.face_count(), 8);

        // Grid (1, 1) is the center vertex
        assert_eq!(mesh.vertices()[4].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices()[0].position, [-0.5, 0.0, -0.5]);
        assert_eq!(mesh.vertices()[8].position, [0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_grid_1x1_faces() {
        let mesh = create_xz_grid(1, 1).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces(), &[Face::new(0, 2, 3), Face::new(0, 3, 1)]);
    }

    #[test]
    fn test_uniform_winding() {
        // Every face winds the same way: clockwise seen from +Y
        let mesh = create_xz_grid(3, 3).unwrap();
        for face in mesh.faces() {
            let [a, b, c] = face.indices().map(|i| glam::Vec3::from(mesh.vertices()[i as usize].position));
            assert!((b - a).cross(c - a).y < 0.0, "face {:?} winds the other way", face);
        }
    }

    #[test]
    fn test_zero_grid_rejected() {
        assert!(matches!(create_xz_grid(0, 1), Err(Error::InvalidGrid { .. })));
        assert!(matches!(create_xz_grid(1, 0), Err(Error::InvalidGrid { .. })));
    }

    #[test]
    fn test_index_overflow_rejected() {
        // Fails before allocating anything
        assert!(matches!(create_xz_grid(40_000, 40_000), Err(Error::InvalidGrid { .. })));
    }

    #[test]
    fn test_height_field_drives_y_and_normals() {
        let field = ComputedHeightField::from_fn(4, 4, |c, r| (c as f64) * 0.1 + (r as f64) * 0.01).unwrap();
        let mesh = create_from_height_field(4, 4, &field).unwrap();

        let v = mesh.vertices()[2 * 5 + 3];
        assert_eq!(v.position[1], (2.0 * 0.1 + 3.0 * 0.01) as f32);
        assert_eq!(v.normal, field.normal(2, 3).to_array());
        assert!(v.normal[0] < 0.0);
    }

    #[test]
    fn test_mesh_new_rejects_bad_index() {
        let vertices = vec![Vertex::default(); 3];
        assert!(Mesh::new(vertices.clone(), vec![Face::new(0, 1, 2)]).is_ok());
        assert!(matches!(
            Mesh::new(vertices, vec![Face::new(0, 1, 3)]),
            Err(Error::InvalidMesh(_))
        ));
    }

    #[test]
    fn test_upload_bytes() {
        let mesh = create_xz_grid(2, 3).unwrap();
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertex_count() * 24);
        assert_eq!(mesh.index_bytes().len(), mesh.index_count() as usize * 4);

        let indices: &[u32] = bytemuck::cast_slice(mesh.index_bytes());
        assert_eq!(&indices[..3], &mesh.faces()[0].indices());
    }
}
