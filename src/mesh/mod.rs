//! Triangle meshes extracted from sampled fields
//!
//! [`marching_cubes`] works purely in grid index space: vertex `(i, j, k)`
//! sits on sample `(i, j, k)`. [`Mesh::to_field_space`] moves a mesh into
//! the sampler's field-space box afterwards.

mod marching_cubes;

pub use marching_cubes::marching_cubes;

use glam::DVec3;

use crate::cache::GridSampler;

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position
    pub position: DVec3,
    /// Unit surface normal
    pub normal: DVec3,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: DVec3, normal: DVec3) -> Self {
        Vertex { position, normal }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Mesh vertices
    pub vertices: Vec<Vertex>,
    /// Triangle indices, three per face
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no faces
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Component-wise min and max of the vertex positions
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.min(v.position), hi.max(v.position))
        }))
    }

    /// Apply `f` to every vertex position
    pub fn map_positions(&mut self, mut f: impl FnMut(DVec3) -> DVec3) {
        for v in &mut self.vertices {
            v.position = f(v.position);
        }
    }

    /// Move an index-space mesh into `sampler`'s field-space box.
    ///
    /// Normals are corrected for non-uniform cell sizes.
    pub fn to_field_space<S: GridSampler + ?Sized>(&mut self, sampler: &S) {
        let [nx, ny, nz] = sampler.resolution();
        let cell = sampler.bounds().span() / DVec3::new(nx as f64, ny as f64, nz as f64);
        for v in &mut self.vertices {
            v.position = sampler.grid_to_field(v.position);
            v.normal = (v.normal / cell).normalize_or_zero();
        }
    }
}
