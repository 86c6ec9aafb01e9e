//! Tube cross-section profile and ring stitching.

use std::f32::consts::TAU;

use glam::{Mat3, Vec2, Vec3};

use crate::buffer::{Geometry, MeshGeom};
use crate::error::GeomError;
use crate::spline::{sample_closed, SplinePoint};

/// Control points of the round cross-section used by [`TubeProfile::round`].
const ROUND_CONTROL_POINTS: usize = 8;

/// Closed 2D cross-section extruded along a path, one ring per path
/// sample.
///
/// The profile lives in the local XY plane; `add_transformed` maps local X
/// to the frame normal, Y to the binormal and Z to the tangent.
#[derive(Debug, Clone)]
pub struct TubeProfile {
    points: Vec<Vec2>,
    normals: Vec<Vec2>,
}

impl TubeProfile {
    /// Smooth a counter-clockwise control polygon into `sample_count`
    /// points with a periodic cardinal spline of the given tangent
    /// `strength` (0.5 is Catmull-Rom; lower is flatter).
    pub fn new(
        control: &[Vec2],
        sample_count: usize,
        strength: f32,
    ) -> Result<Self, GeomError> {
        if control.len() < 3 || sample_count < 3 {
            return Err(GeomError::InvalidTemplate(format!(
                "profile needs >= 3 control points and samples, got {} and \
                 {sample_count}",
                control.len()
            )));
        }
        let points = sample_closed(control, sample_count, strength);
        let n = points.len();
        let normals = (0..n)
            .map(|i| {
                let d = points[(i + 1) % n] - points[(i + n - 1) % n];
                Vec2::new(d.y, -d.x).normalize_or_zero()
            })
            .collect();
        Ok(Self { points, normals })
    }

    /// Unit octagon smoothed into `samples` points with the given tangent
    /// `strength`.
    pub fn round(samples: usize, strength: f32) -> Result<Self, GeomError> {
        let control: Vec<Vec2> = (0..ROUND_CONTROL_POINTS)
            .map(|i| {
                Vec2::from_angle(TAU * i as f32 / ROUND_CONTROL_POINTS as f32)
            })
            .collect();
        Self::new(&control, samples, strength)
    }

    /// Exact unit circle with `samples` points.
    pub fn circle(samples: usize) -> Result<Self, GeomError> {
        if samples < 3 {
            return Err(GeomError::InvalidTemplate(format!(
                "profile needs >= 3 samples, got {samples}"
            )));
        }
        let points: Vec<Vec2> = (0..samples)
            .map(|i| Vec2::from_angle(TAU * i as f32 / samples as f32))
            .collect();
        Ok(Self {
            normals: points.clone(),
            points,
        })
    }

    /// Vertices per ring.
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        self.points.len() as u32
    }

    /// Profile points in the local plane.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Append one ring and, unless it starts a new tube, stitch it to the
    /// ring appended just before.
    ///
    /// Previous-ring vertex `i` connects to new-ring vertex
    /// `(i + offset) % sample_count`, which lets the profile's start index
    /// rotate between segments without a seam. Returns the index of the new
    /// ring's first vertex.
    #[allow(clippy::too_many_arguments)]
    pub fn add_transformed(
        &self,
        target: &mut MeshGeom,
        center: Vec3,
        radius: f32,
        rotation: Mat3,
        color: [f32; 3],
        is_first: bool,
        offset: u32,
    ) -> u32 {
        let n = self.sample_count();
        let stitch = !is_first && target.num_verts() >= n;
        target.reserve(n as usize, if stitch { 6 * n as usize } else { 0 });

        let base = target.num_verts();
        for (p, normal) in self.points.iter().zip(&self.normals) {
            let local = Vec3::new(p.x * radius, p.y * radius, 0.0);
            let _ = target.add_vertex(
                center + rotation * local,
                rotation * normal.extend(0.0),
                color,
            );
        }
        if !stitch {
            return base;
        }

        let prev = base - n;
        let offset = offset % n;
        if offset == 0 {
            for i in 0..n {
                let i1 = (i + 1) % n;
                target.add_triangle(prev + i, prev + i1, base + i);
                target.add_triangle(prev + i1, base + i1, base + i);
            }
        } else {
            for i in 0..n {
                let i1 = (i + 1) % n;
                let cur = base + (i + offset) % n;
                let cur1 = base + (i1 + offset) % n;
                target.add_triangle(prev + i, prev + i1, cur);
                target.add_triangle(prev + i1, cur1, cur);
            }
        }
        base
    }
}

/// Offset that best lines up a ring at `frame` with the previous ring,
/// whose frame normal was `prev_normal`.
///
/// The angle from the previous normal (projected onto this frame's plane)
/// to the current normal is snapped to whole profile steps.
#[must_use]
pub fn ring_offset(
    prev_normal: Vec3,
    frame: &SplinePoint,
    samples: u32,
) -> u32 {
    if samples == 0 {
        return 0;
    }
    let t = frame.tangent;
    let p = (prev_normal - t * t.dot(prev_normal)).normalize_or_zero();
    if p == Vec3::ZERO {
        return 0;
    }
    let theta = t.dot(p.cross(frame.normal)).atan2(p.dot(frame.normal));
    let step = TAU / samples as f32;
    (-(theta / step).round() as i64).rem_euclid(i64::from(samples)) as u32
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    fn octagon() -> Vec<Vec2> {
        (0..8)
            .map(|i| Vec2::from_angle(TAU * i as f32 / 8.0))
            .collect()
    }

    fn two_rings(offset: u32) -> MeshGeom {
        let profile = TubeProfile::circle(8).unwrap();
        let mut mesh = MeshGeom::new();
        let first = profile.add_transformed(
            &mut mesh,
            Vec3::ZERO,
            1.0,
            Mat3::IDENTITY,
            [1.0; 3],
            true,
            0,
        );
        assert_eq!(first, 0);
        assert_eq!(mesh.num_triangles(), 0);
        let _ = profile.add_transformed(
            &mut mesh,
            Vec3::Z,
            1.0,
            Mat3::IDENTITY,
            [1.0; 3],
            false,
            offset,
        );
        mesh
    }

    #[test]
    fn stitching_stays_in_bounds_for_any_offset() {
        for offset in [0, 3] {
            let mesh = two_rings(offset);
            assert_eq!(mesh.num_triangles(), 8 * 2);
            assert!(mesh.buffer().indices().iter().all(|&i| i < 16));
        }
    }

    #[test]
    fn offset_relabels_the_new_ring() {
        let plain = two_rings(0);
        let shifted = two_rings(3);
        // Previous-ring vertex 0 connects to new-ring vertex 3.
        assert_eq!(&plain.buffer().indices()[..3], &[0, 1, 8]);
        assert_eq!(&shifted.buffer().indices()[..3], &[0, 1, 11]);
    }

    #[test]
    fn stitched_faces_point_outward() {
        let mesh = two_rings(0);
        let verts = mesh.buffer().vertices();
        let pos = |i: u32| Vec3::from_slice(&verts[i as usize * 9..]);
        for tri in mesh.buffer().indices().chunks_exact(3) {
            let (a, b, c) = (pos(tri[0]), pos(tri[1]), pos(tri[2]));
            let face = (b - a).cross(c - a);
            let mid = (a + b + c) / 3.0;
            assert!(face.dot(Vec3::new(mid.x, mid.y, 0.0)) > 0.0);
        }
    }

    #[test]
    fn smoothed_profile_normals_point_outward() {
        let profile = TubeProfile::round(24, 0.5).unwrap();
        assert_eq!(profile.sample_count(), 24);
        for (p, n) in profile.points.iter().zip(&profile.normals) {
            assert!(p.dot(*n) > 0.9, "p={p:?} n={n:?}");
        }
    }

    #[test]
    fn rejects_degenerate_profiles() {
        assert!(TubeProfile::new(&octagon()[..2], 8, 0.5).is_err());
        assert!(TubeProfile::new(&octagon(), 2, 0.5).is_err());
        assert!(TubeProfile::circle(2).is_err());
    }

    #[test]
    fn ring_offset_undoes_frame_roll() {
        let samples = 8;
        let step = TAU / samples as f32;
        for k in 0..samples {
            let roll = Quat::from_rotation_z(k as f32 * step);
            let frame = SplinePoint {
                pos: Vec3::ZERO,
                tangent: Vec3::Z,
                normal: roll * Vec3::X,
                binormal: roll * Vec3::Y,
            };
            let offset = ring_offset(Vec3::X, &frame, samples);
            assert_eq!(offset, (samples - k) % samples, "k={k}");
        }
    }
}
