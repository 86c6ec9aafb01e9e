//! Trace-keyed vertex association.
//!
//! A binding names a backbone trace and a slice along it. With an
//! interpolation factor `k`, residue `r` of a trace owns slices
//! `r*k .. (r+1)*k`, and per-residue colors are up-sampled with the same
//! spline spacing the builders use for positions.

use rustc_hash::FxHashMap;

use super::{broadcast, ColorTarget};
use crate::color::ColorScope;
use crate::spline::interpolate_colors;
use crate::structure::{BackboneTrace, StructureView};

#[derive(Debug, Clone, Copy)]
struct TraceBinding {
    trace: usize,
    slice: usize,
    start: u32,
    end: u32,
}

/// A run of consecutive residues of one build-time trace, with their
/// colors.
struct ColorRun {
    trace: usize,
    first: usize,
    colors: Vec<[f32; 3]>,
}

/// Bindings from `(trace, slice)` to vertex ranges.
#[derive(Debug, Clone)]
pub struct TraceVertexAssoc {
    traces: Vec<BackboneTrace>,
    /// Trace atom to `(trace, position)`.
    location: FxHashMap<usize, (usize, usize)>,
    factor: usize,
    closed: bool,
    bindings: Vec<TraceBinding>,
}

impl TraceVertexAssoc {
    /// Empty association with `factor` slices per residue.
    #[must_use]
    pub fn new(factor: usize) -> Self {
        Self {
            traces: Vec::new(),
            location: FxHashMap::default(),
            factor: factor.max(1),
            closed: false,
            bindings: Vec::new(),
        }
    }

    /// Treat full traces as closed loops when up-sampling colors.
    #[must_use]
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Register a build-time trace and return its index.
    pub fn add_trace(&mut self, trace: BackboneTrace) -> usize {
        let t = self.traces.len();
        for (pos, &atom) in trace.atoms.iter().enumerate() {
            let _ = self.location.insert(atom, (t, pos));
        }
        self.traces.push(trace);
        t
    }

    /// Bind vertices `start..end` to slice `slice` of trace `trace`.
    pub fn add_assoc(
        &mut self,
        trace: usize,
        slice: usize,
        start: u32,
        end: u32,
    ) {
        self.bindings.push(TraceBinding {
            trace,
            slice,
            start,
            end,
        });
    }

    /// Slices per residue.
    #[must_use]
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Registered traces.
    #[must_use]
    pub fn traces(&self) -> &[BackboneTrace] {
        &self.traces
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no bindings are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn recolor(
        &self,
        scope: &ColorScope<'_>,
        view: &StructureView<'_>,
        data: &mut [f32],
        target: ColorTarget,
    ) -> usize {
        if self.bindings.is_empty() {
            return 0;
        }
        let slices = self.slice_colors(scope, view);
        self.bindings
            .iter()
            .filter_map(|b| {
                slices
                    .get(&(b.trace, b.slice))
                    .map(|&c| broadcast(data, target, b.start, b.end, c))
            })
            .sum()
    }

    /// Fine color per visible `(trace, slice)`.
    pub(crate) fn slice_colors(
        &self,
        scope: &ColorScope<'_>,
        view: &StructureView<'_>,
    ) -> FxHashMap<(usize, usize), [f32; 3]> {
        let mut slices = FxHashMap::default();
        for run in self.color_runs(scope, view) {
            let whole = run.first == 0
                && run.colors.len() == self.traces[run.trace].len();
            let fine = interpolate_colors(
                &run.colors,
                self.factor,
                self.closed && whole,
            );
            let base = run.first * self.factor;
            for (j, color) in fine.into_iter().enumerate() {
                let _ = slices.insert((run.trace, base + j), color);
            }
        }
        slices
    }

    /// Split the view's trace atoms into runs of consecutive build-time
    /// residues and color each residue through its trace atom. Atoms that
    /// are not trace atoms are skipped.
    fn color_runs(
        &self,
        scope: &ColorScope<'_>,
        view: &StructureView<'_>,
    ) -> Vec<ColorRun> {
        let mut visible: Vec<(usize, usize, usize)> = view
            .atom_indices()
            .iter()
            .filter_map(|&atom| {
                self.location.get(&atom).map(|&(t, pos)| (t, pos, atom))
            })
            .collect();
        visible.sort_unstable();
        visible.dedup();

        let structure = view.structure();
        let mut runs: Vec<ColorRun> = Vec::new();
        for (trace, pos, atom) in visible {
            let color = scope.color_for(structure.atom_ref(atom));
            match runs.last_mut() {
                Some(run)
                    if run.trace == trace
                        && run.first + run.colors.len() == pos =>
                {
                    run.colors.push(color);
                }
                _ => runs.push(ColorRun {
                    trace,
                    first: pos,
                    colors: vec![color],
                }),
            }
        }
        runs
    }
}
