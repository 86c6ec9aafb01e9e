//! Latitude/longitude unit sphere.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::buffer::{Geometry, MeshGeom};
use crate::error::GeomError;

/// Unit sphere tessellated into `stacks` latitude rings of `arcs` points.
///
/// Rings run pole to pole, so the first and last rings collapse onto the
/// poles and contribute degenerate triangles. The vertex count stays
/// exactly `stacks * arcs`.
#[derive(Debug, Clone)]
pub struct ProtoSphere {
    stacks: u32,
    arcs: u32,
    /// Unit positions, which double as outward normals.
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl ProtoSphere {
    /// Build the template. Needs `stacks >= 2` and `arcs >= 3`.
    pub fn new(stacks: u32, arcs: u32) -> Result<Self, GeomError> {
        if stacks < 2 || arcs < 3 {
            return Err(GeomError::InvalidTemplate(format!(
                "sphere needs stacks >= 2 and arcs >= 3, got {stacks}x{arcs}"
            )));
        }

        let mut normals = Vec::with_capacity((stacks * arcs) as usize);
        for i in 0..stacks {
            let phi = PI * i as f32 / (stacks - 1) as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for j in 0..arcs {
                let theta = TAU * j as f32 / arcs as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();
                normals.push(Vec3::new(
                    sin_phi * cos_theta,
                    cos_phi,
                    sin_phi * sin_theta,
                ));
            }
        }

        // Counter-clockwise seen from outside.
        let mut indices =
            Vec::with_capacity(((stacks - 1) * arcs * 6) as usize);
        for i in 0..stacks - 1 {
            for j in 0..arcs {
                let j1 = (j + 1) % arcs;
                let a = i * arcs + j;
                let b = (i + 1) * arcs + j;
                let c = (i + 1) * arcs + j1;
                let d = i * arcs + j1;
                indices.extend_from_slice(&[a, c, b, a, d, c]);
            }
        }

        Ok(Self {
            stacks,
            arcs,
            normals,
            indices,
        })
    }

    /// Latitude rings.
    #[must_use]
    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    /// Points per ring.
    #[must_use]
    pub fn arcs(&self) -> u32 {
        self.arcs
    }

    /// Vertices appended per instance.
    #[must_use]
    pub fn num_vertices(&self) -> u32 {
        self.normals.len() as u32
    }

    /// Indices appended per instance.
    #[must_use]
    pub fn num_indices(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Template triangle indices, relative to the instance base.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Append a sphere of `radius` at `center`. Returns the index of its
    /// first vertex.
    pub fn add_transformed(
        &self,
        target: &mut MeshGeom,
        center: Vec3,
        radius: f32,
        color: [f32; 3],
    ) -> u32 {
        target.reserve(self.normals.len(), self.indices.len());
        let base = target.num_verts();
        for &n in &self.normals {
            let _ = target.add_vertex(center + n * radius, n, color);
        }
        for tri in self.indices.chunks_exact(3) {
            target.add_triangle(base + tri[0], base + tri[1], base + tri[2]);
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_counts() {
        let sphere = ProtoSphere::new(4, 6).unwrap();
        assert_eq!(sphere.num_vertices(), 4 * 6);
        assert_eq!(sphere.num_indices(), (4 - 1) * 6 * 2 * 3);
        assert!(sphere.indices().iter().all(|&i| i < sphere.num_vertices()));
    }

    #[test]
    fn rejects_degenerate_tessellation() {
        assert!(ProtoSphere::new(1, 6).is_err());
        assert!(ProtoSphere::new(4, 2).is_err());
    }

    #[test]
    fn instances_are_offset_and_outward() {
        let sphere = ProtoSphere::new(5, 8).unwrap();
        let mut mesh = MeshGeom::new();
        let center = Vec3::new(10.0, -2.0, 3.0);
        let _ = sphere.add_transformed(&mut mesh, Vec3::ZERO, 1.0, [1.0; 3]);
        let base = sphere.add_transformed(&mut mesh, center, 2.0, [1.0; 3]);
        assert_eq!(base, sphere.num_vertices());
        assert_eq!(mesh.num_verts(), 2 * sphere.num_vertices());

        let verts = mesh.buffer().vertices();
        let pos = |i: u32| Vec3::from_slice(&verts[i as usize * 9..]);
        let indices = mesh.buffer().indices();
        let second = &indices[sphere.num_indices() as usize..];
        assert!(second.iter().all(|&i| i >= base && i < 2 * base));
        for tri in second.chunks_exact(3) {
            let (a, b, c) = (pos(tri[0]), pos(tri[1]), pos(tri[2]));
            let face = (b - a).cross(c - a);
            let outward = (a + b + c) / 3.0 - center;
            assert!(face.dot(outward) >= -1e-5, "inward triangle {tri:?}");
            assert!((a.distance(center) - 2.0).abs() < 1e-4);
        }
    }
}
