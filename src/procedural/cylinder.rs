//! Open unit cylinder.

use std::f32::consts::TAU;

use glam::{Mat3, Vec2, Vec3};

use crate::buffer::{Geometry, MeshGeom};
use crate::error::GeomError;

/// Unit cylinder along Z: a ring at `z = -0.5` and a ring at `z = +0.5`,
/// radial normals, no caps.
#[derive(Debug, Clone)]
pub struct ProtoCylinder {
    ring: Vec<Vec2>,
}

impl ProtoCylinder {
    /// Build the template. Needs `arcs >= 3`.
    pub fn new(arcs: u32) -> Result<Self, GeomError> {
        if arcs < 3 {
            return Err(GeomError::InvalidTemplate(format!(
                "cylinder needs arcs >= 3, got {arcs}"
            )));
        }
        let ring = (0..arcs)
            .map(|j| Vec2::from_angle(TAU * j as f32 / arcs as f32))
            .collect();
        Ok(Self { ring })
    }

    /// Points per ring.
    #[must_use]
    pub fn arcs(&self) -> u32 {
        self.ring.len() as u32
    }

    /// Vertices appended per instance.
    #[must_use]
    pub fn num_vertices(&self) -> u32 {
        2 * self.arcs()
    }

    /// Indices appended per instance.
    #[must_use]
    pub fn num_indices(&self) -> u32 {
        6 * self.arcs()
    }

    /// Append a cylinder scaled to `(radius, radius, length)`, rotated by
    /// `rotation` and centered at `center`.
    ///
    /// The bottom ring (local `-Z`) gets `color_bottom`, the top ring
    /// `color_top`. Returns the index of the first bottom-ring vertex; the
    /// top ring starts `arcs()` vertices later.
    #[allow(clippy::too_many_arguments)]
    pub fn add_transformed(
        &self,
        target: &mut MeshGeom,
        center: Vec3,
        length: f32,
        radius: f32,
        rotation: Mat3,
        color_bottom: [f32; 3],
        color_top: [f32; 3],
    ) -> u32 {
        let arcs = self.arcs();
        target.reserve(
            self.num_vertices() as usize,
            self.num_indices() as usize,
        );
        let base = target.num_verts();

        for (z, color) in [(-0.5, color_bottom), (0.5, color_top)] {
            for p in &self.ring {
                let local = Vec3::new(p.x * radius, p.y * radius, z * length);
                let normal = rotation * p.extend(0.0);
                let _ =
                    target.add_vertex(center + rotation * local, normal, color);
            }
        }

        for i in 0..arcs {
            let i1 = (i + 1) % arcs;
            let (b0, b1) = (base + i, base + i1);
            let (t0, t1) = (base + arcs + i, base + arcs + i1);
            target.add_triangle(b0, b1, t0);
            target.add_triangle(b1, t1, t0);
        }
        base
    }
}
