//! Line-list geometry.

use glam::Vec3;

use super::{GeomBuffer, Geometry, VertexLayout};
use crate::render::Primitive;

/// Independent line segments, 6 floats per vertex.
#[derive(Debug, Clone)]
pub struct LineGeom {
    buffer: GeomBuffer,
}

impl Default for LineGeom {
    fn default() -> Self {
        Self::new()
    }
}

impl LineGeom {
    /// Empty line geometry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: GeomBuffer::new(
                "Line Geometry",
                VertexLayout::LINE,
                Primitive::Lines,
            ),
        }
    }

    /// Empty line geometry with room for `lines` segments.
    #[must_use]
    pub fn with_capacity(lines: usize) -> Self {
        let mut geom = Self::new();
        geom.buffer.reserve(lines * 2, 0);
        geom
    }

    /// Append a single vertex. Vertices pair up into segments in order.
    pub fn add_vertex(&mut self, pos: Vec3, color: [f32; 3]) -> u32 {
        self.buffer.push_vertex(pos.to_array(), None, color)
    }

    /// Append one segment from `pos_a` to `pos_b`.
    pub fn add_line(
        &mut self,
        pos_a: Vec3,
        color_a: [f32; 3],
        pos_b: Vec3,
        color_b: [f32; 3],
    ) {
        let _ = self.add_vertex(pos_a, color_a);
        let _ = self.add_vertex(pos_b, color_b);
    }

    /// Number of complete segments.
    #[must_use]
    pub fn num_lines(&self) -> u32 {
        self.buffer.num_verts() / 2
    }
}

impl Geometry for LineGeom {
    fn buffer(&self) -> &GeomBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut GeomBuffer {
        &mut self.buffer
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::assoc::AtomVertexAssoc;
    use crate::color::test_util::Scripted;
    use crate::structure::Structure;

    #[test]
    fn two_atom_line_recolors_end_to_end() {
        let p0 = Vec3::new(1.0, 2.0, 3.0);
        let p1 = Vec3::new(-4.0, 5.0, 0.5);

        let mut s = Structure::new();
        let chain = s.add_chain("A");
        let res = s.add_residue(chain, "LIG", 1, Default::default());
        let a0 = s.add_atom(res, "C1", "C", p0, 0.0);
        let a1 = s.add_atom(res, "C2", "C", p1, 0.0);
        let s = Arc::new(s);

        let mut lines = LineGeom::new();
        lines.add_line(p0, [0.0; 3], p1, [0.0; 3]);
        let mut assoc = AtomVertexAssoc::new();
        assoc.add_assoc(a0, 0, 1);
        assoc.add_assoc(a1, 1, 2);
        lines.set_association(Arc::clone(&s), assoc.into());

        let mut op = Scripted::new(vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        lines.color_by(&mut op, None);

        assert_eq!(
            lines.buffer().vertices(),
            &[1.0, 2.0, 3.0, 1.0, 0.0, 0.0, -4.0, 5.0, 0.5, 0.0, 0.0, 1.0]
        );
        assert_eq!(lines.num_lines(), 1);
    }
}
