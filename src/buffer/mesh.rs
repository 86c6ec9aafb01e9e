//! Indexed triangle geometry.

use glam::Vec3;

use super::{GeomBuffer, Geometry, VertexLayout};
use crate::render::Primitive;

/// Indexed triangles, 9 floats per vertex.
#[derive(Debug, Clone)]
pub struct MeshGeom {
    buffer: GeomBuffer,
}

impl Default for MeshGeom {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshGeom {
    /// Empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: GeomBuffer::new(
                "Mesh Geometry",
                VertexLayout::MESH,
                Primitive::Triangles,
            ),
        }
    }

    /// Empty mesh pre-sized for `vertices` vertices and `indices` indices,
    /// so large procedural builds do not reallocate.
    #[must_use]
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        let mut geom = Self::new();
        geom.buffer.reserve(vertices, indices);
        geom
    }

    /// Reserve room for more vertices and indices.
    pub fn reserve(&mut self, vertices: usize, indices: usize) {
        self.buffer.reserve(vertices, indices);
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(
        &mut self,
        pos: Vec3,
        normal: Vec3,
        color: [f32; 3],
    ) -> u32 {
        self.buffer
            .push_vertex(pos.to_array(), Some(normal.to_array()), color)
    }

    /// Append a triangle by vertex index.
    pub fn add_triangle(&mut self, i: u32, j: u32, k: u32) {
        self.buffer.indices.extend_from_slice(&[i, j, k]);
        self.buffer.dirty = true;
    }

    /// Number of triangles.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.buffer.indices.len() / 3
    }
}

impl Geometry for MeshGeom {
    fn buffer(&self) -> &GeomBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut GeomBuffer {
        &mut self.buffer
    }
}
