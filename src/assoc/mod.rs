//! Vertex associations: which structural unit owns which vertex range.
//!
//! Builders register `(unit, start..end)` bindings while they append
//! geometry. Recoloring walks a [`StructureView`], computes one color per
//! visible unit and broadcasts it into the color field of every bound
//! vertex. Positions, normals and indices are never touched, and units
//! outside the view keep their previous color.

mod atom;
mod trace;

pub use atom::AtomVertexAssoc;
pub use trace::TraceVertexAssoc;

use crate::color::ColorScope;
use crate::structure::StructureView;

/// Location of the color triple inside an interleaved vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTarget {
    /// Float offset of the color within one vertex.
    pub offset: usize,
    /// Floats per vertex.
    pub stride: usize,
}

/// The association attached to a geometry buffer.
#[derive(Debug, Clone)]
pub enum VertexAssoc {
    /// One binding per atom.
    Atom(AtomVertexAssoc),
    /// One binding per `(trace, slice)` cross-section.
    Trace(TraceVertexAssoc),
}

impl VertexAssoc {
    /// Number of registered bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Atom(a) => a.len(),
            Self::Trace(t) => t.len(),
        }
    }

    /// Whether no bindings are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewrite the colors of every vertex bound to a unit in `view`.
    ///
    /// Returns the number of vertices written. The caller owns the
    /// operator phase through `scope`.
    pub fn recolor(
        &self,
        scope: &ColorScope<'_>,
        view: &StructureView<'_>,
        data: &mut [f32],
        target: ColorTarget,
    ) -> usize {
        match self {
            Self::Atom(a) => a.recolor(scope, view, data, target),
            Self::Trace(t) => t.recolor(scope, view, data, target),
        }
    }
}

impl From<AtomVertexAssoc> for VertexAssoc {
    fn from(assoc: AtomVertexAssoc) -> Self {
        Self::Atom(assoc)
    }
}

impl From<TraceVertexAssoc> for VertexAssoc {
    fn from(assoc: TraceVertexAssoc) -> Self {
        Self::Trace(assoc)
    }
}

/// Write `color` into vertices `start..end`. Vertices past the end of
/// `data` are ignored. Returns the number of vertices written.
fn broadcast(
    data: &mut [f32],
    target: ColorTarget,
    start: u32,
    end: u32,
    color: [f32; 3],
) -> usize {
    let mut written = 0;
    for v in start..end {
        let base = target.offset + v as usize * target.stride;
        let Some(slot) = data.get_mut(base..base + 3) else {
            break;
        };
        slot.copy_from_slice(&color);
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_stays_inside_color_fields() {
        let target = ColorTarget {
            offset: 3,
            stride: 6,
        };
        let mut data = vec![9.0; 18];
        let written = broadcast(&mut data, target, 1, 3, [0.1, 0.2, 0.3]);
        assert_eq!(written, 2);
        assert_eq!(&data[0..6], &[9.0; 6]);
        assert_eq!(&data[6..12], &[9.0, 9.0, 9.0, 0.1, 0.2, 0.3]);
        assert_eq!(&data[12..18], &[9.0, 9.0, 9.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn broadcast_clips_ranges_past_the_end() {
        let target = ColorTarget {
            offset: 3,
            stride: 6,
        };
        let mut data = vec![0.0; 12];
        assert_eq!(broadcast(&mut data, target, 1, 5, [1.0; 3]), 1);
    }
}
