//! Backbone-trace passes: CA line trace and spline tube.

use std::sync::Arc;

use glam::Mat3;

use super::{attach, GeomBuilder, UNCOLORED};
use crate::assoc::TraceVertexAssoc;
use crate::buffer::{Geometry, LineGeom, MeshGeom};
use crate::color::ColorOp;
use crate::error::GeomError;
use crate::options::TubeFrames;
use crate::procedural::ring_offset;
use crate::spline::{
    build_frames, compute_frenet_frames, compute_rmf, compute_tangents,
    sample_open, CATMULL_ROM,
};
use crate::structure::Structure;

impl GeomBuilder {
    /// Polyline through the trace atoms of every backbone trace. Each line
    /// end is bound to its residue's slice, so colors blend along each
    /// segment.
    pub fn line_trace(
        &self,
        structure: &Arc<Structure>,
        op: &mut dyn ColorOp,
    ) -> LineGeom {
        let max_gap = self.options.trace_max_gap;
        let mut assoc = TraceVertexAssoc::new(1);
        let mut geom = LineGeom::new();

        for trace in structure.backbone_traces(max_gap) {
            if trace.len() < 2 {
                log::debug!(
                    "line trace: skipping single-residue trace in chain {}",
                    trace.chain
                );
                continue;
            }
            let positions = trace.positions(structure);
            let t = assoc.add_trace(trace);
            for (i, pair) in positions.windows(2).enumerate() {
                let v = geom.num_verts();
                geom.add_line(pair[0], UNCOLORED, pair[1], UNCOLORED);
                assoc.add_assoc(t, i, v, v + 1);
                assoc.add_assoc(t, i + 1, v + 1, v + 2);
            }
        }

        log::debug!(
            "line trace: {} traces, {} segments",
            assoc.traces().len(),
            geom.num_lines()
        );
        attach(geom, structure, assoc.into(), op)
    }

    /// Tube swept along a Catmull-Rom spline through the trace atoms, with
    /// `spline_detail` rings per residue.
    ///
    /// Rings follow the frames picked by `tube_frames`. With Frenet frames,
    /// roll between consecutive rings is absorbed by the stitching offset
    /// so the tube does not twist.
    pub fn tube(
        &mut self,
        structure: &Arc<Structure>,
        op: &mut dyn ColorOp,
    ) -> Result<MeshGeom, GeomError> {
        let profile = self.templates.profile(
            self.options.tube_profile_samples,
            self.options.tube_profile_strength,
        )?;
        let opts = &self.options;
        let detail = opts.spline_detail.max(1) as usize;
        let ring = profile.sample_count();
        let mut assoc = TraceVertexAssoc::new(detail);
        let mut geom = MeshGeom::new();

        for trace in structure.backbone_traces(opts.trace_max_gap) {
            if trace.len() < 2 {
                log::debug!(
                    "tube: skipping single-residue trace in chain {}",
                    trace.chain
                );
                continue;
            }
            let control = trace.positions(structure);
            let samples = control.len() * detail;
            let path = sample_open(&control, samples, CATMULL_ROM);
            let tangents = compute_tangents(&path);
            let mut frames = build_frames(&path, &tangents);
            match opts.tube_frames {
                TubeFrames::Frenet => compute_frenet_frames(&mut frames),
                TubeFrames::RotationMinimizing => compute_rmf(&mut frames),
            }

            let rings = frames.len();
            geom.reserve(
                rings * ring as usize,
                (rings - 1) * ring as usize * 6,
            );
            let t = assoc.add_trace(trace);
            let mut prev_normal = None;
            for (slice, frame) in frames.iter().enumerate() {
                let offset =
                    prev_normal.map_or(0, |n| ring_offset(n, frame, ring));
                let rotation = Mat3::from_cols(
                    frame.normal,
                    frame.binormal,
                    frame.tangent,
                );
                let start = profile.add_transformed(
                    &mut geom,
                    frame.pos,
                    opts.tube_radius,
                    rotation,
                    UNCOLORED,
                    slice == 0,
                    offset,
                );
                assoc.add_assoc(t, slice, start, start + ring);
                prev_normal = Some(frame.normal);
            }
        }

        log::debug!(
            "tube: {} traces, {} vertices, {} triangles",
            assoc.traces().len(),
            geom.num_verts(),
            geom.num_triangles()
        );
        Ok(attach(geom, structure, assoc.into(), op))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::assoc::VertexAssoc;
    use crate::color::test_util::Scripted;
    use crate::color::Uniform;
    use crate::options::GeometryOptions;
    use crate::structure::test_util::{straight_chain, two_chains};
    use crate::structure::StructureView;

    fn tube_options() -> GeometryOptions {
        GeometryOptions {
            tube_profile_samples: 8,
            spline_detail: 2,
            ..GeometryOptions::default()
        }
    }

    fn ring_colors(mesh: &MeshGeom, ring: usize) -> Vec<[f32; 3]> {
        mesh.buffer()
            .vertices()
            .chunks(9)
            .skip(ring * 8)
            .take(8)
            .map(|v| [v[6], v[7], v[8]])
            .collect()
    }

    #[test]
    fn line_trace_colors_follow_trace_atoms() {
        let s = Arc::new(straight_chain(3));
        let mut colors = vec![[0.0; 3]; 9];
        colors[1] = [1.0, 0.0, 0.0];
        colors[4] = [0.0, 1.0, 0.0];
        colors[7] = [0.0, 0.0, 1.0];
        let mut op = Scripted::new(colors);
        let geom = GeomBuilder::default().line_trace(&s, &mut op);

        assert_eq!(geom.num_lines(), 2);
        let v = geom.buffer().vertices();
        assert_eq!(&v[3..6], &[1.0, 0.0, 0.0]);
        assert_eq!(&v[9..12], &[0.0, 1.0, 0.0]);
        assert_eq!(&v[15..18], &[0.0, 1.0, 0.0]);
        assert_eq!(&v[21..24], &[0.0, 0.0, 1.0]);
        assert!(Vec3::from_slice(&v[6..9]).distance(s.atoms[4].pos) < 1e-6);
    }

    #[test]
    fn tube_has_one_ring_per_slice() {
        let s = Arc::new(straight_chain(4));
        let mut builder = GeomBuilder::new(tube_options());
        let geom = builder.tube(&s, &mut Uniform([0.5; 3])).unwrap();
        // 4 residues * 2 slices, 8 vertices per ring.
        assert_eq!(geom.num_verts(), 64);
        assert_eq!(geom.num_triangles(), 7 * 16);
        assert!(geom.buffer().indices().iter().all(|&i| i < 64));
        assert!(matches!(
            geom.buffer().association(),
            Some(VertexAssoc::Trace(t)) if t.len() == 8 && t.factor() == 2
        ));
    }

    fn assert_rings_on_path(geom: &MeshGeom, radius: f32) {
        let v = geom.buffer().vertices();
        for ring in v.chunks(9 * 8) {
            let center = ring
                .chunks(9)
                .map(Vec3::from_slice)
                .fold(Vec3::ZERO, |acc, p| acc + p)
                / 8.0;
            for vertex in ring.chunks(9) {
                let p = Vec3::from_slice(vertex);
                let n = Vec3::from_slice(&vertex[3..6]);
                assert!((p.distance(center) - radius).abs() < 1e-3);
                assert!(n.dot(p - center) > 0.0);
            }
        }
    }

    #[test]
    fn tube_rings_stay_on_the_path() {
        let s = Arc::new(two_chains(6));
        let opts = tube_options();
        let radius = opts.tube_radius;
        let mut builder = GeomBuilder::new(opts);
        let geom = builder.tube(&s, &mut Uniform([0.5; 3])).unwrap();
        assert_eq!(geom.num_verts(), 2 * 12 * 8);
        assert_rings_on_path(&geom, radius);
    }

    #[test]
    fn rotation_minimizing_tube_matches_frenet_topology() {
        let s = Arc::new(two_chains(6));
        let opts = GeometryOptions {
            tube_frames: TubeFrames::RotationMinimizing,
            ..tube_options()
        };
        let radius = opts.tube_radius;
        let mut builder = GeomBuilder::new(opts);
        let rmf = builder.tube(&s, &mut Uniform([0.5; 3])).unwrap();
        builder.set_options(tube_options());
        let frenet = builder.tube(&s, &mut Uniform([0.5; 3])).unwrap();

        assert_eq!(rmf.num_verts(), frenet.num_verts());
        assert_eq!(rmf.num_triangles(), frenet.num_triangles());
        assert_rings_on_path(&rmf, radius);
    }

    #[test]
    fn tube_recolor_skips_hidden_residues() {
        let s = Arc::new(straight_chain(4));
        let mut builder = GeomBuilder::new(tube_options());
        let mut geom = builder.tube(&s, &mut Uniform([0.0; 3])).unwrap();

        let hidden = s.trace_atom(1).unwrap();
        let view = StructureView::select(&s, |a| a.index() != hidden);
        let mut op = Scripted::new(vec![[1.0, 1.0, 1.0]]);
        geom.color_by(&mut op, Some(&view));

        // Residue 1 owns slices 2 and 3.
        for ring in 0..8 {
            let expected = if (2..4).contains(&ring) { 0.0 } else { 1.0 };
            for c in ring_colors(&geom, ring) {
                assert!(
                    c.iter().all(|v| (v - expected).abs() < 1e-5),
                    "ring {ring}: {c:?}"
                );
            }
        }
        assert_eq!((op.begins, op.ends), (1, 1));
    }
}
