//! Atom-keyed vertex association.

use rustc_hash::FxHashMap;

use super::{broadcast, ColorTarget};
use crate::color::ColorScope;
use crate::structure::StructureView;

#[derive(Debug, Clone, Copy)]
struct AtomBinding {
    atom: usize,
    start: u32,
    end: u32,
}

/// Bindings from atom index to vertex ranges.
#[derive(Debug, Clone, Default)]
pub struct AtomVertexAssoc {
    bindings: Vec<AtomBinding>,
}

impl AtomVertexAssoc {
    /// Empty association.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty association with room for `bindings` entries.
    #[must_use]
    pub fn with_capacity(bindings: usize) -> Self {
        Self {
            bindings: Vec::with_capacity(bindings),
        }
    }

    /// Bind vertices `start..end` to `atom`.
    pub fn add_assoc(&mut self, atom: usize, start: u32, end: u32) {
        self.bindings.push(AtomBinding { atom, start, end });
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

        // Rebuilt every call: the view may differ between calls.
        let mut colors: FxHashMap<usize, [f32; 3]> = FxHashMap::default();
        colors.reserve(view.len());
        for atom in view.atoms() {
            let _ = colors.insert(atom.index(), scope.color_for(atom));
        }

        self.bindings
            .iter()
            .filter_map(|b| {
                colors
                    .get(&b.atom)
                    .map(|&c| broadcast(data, target, b.start, b.end, c))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::test_util::Scripted;
    use crate::structure::test_util::straight_chain;

    const TARGET: ColorTarget = ColorTarget {
        offset: 3,
        stride: 6,
    };

    #[test]
    fn atoms_outside_view_keep_their_color() {
        let s = straight_chain(1);
        let mut assoc = AtomVertexAssoc::new();
        for atom in 0..3 {
            assoc.add_assoc(atom, atom as u32 * 2, atom as u32 * 2 + 2);
        }
        let mut data = vec![0.5; 6 * 6];
        let mut op = Scripted::new(vec![[1.0, 0.0, 0.0]]);
        let view = StructureView::from_atoms(&s, [0, 2]);
        let written = {
            let scope = ColorScope::begin(&mut op, &s);
            assoc.recolor(&scope, &view, &mut data, TARGET)
        };
        assert_eq!(written, 4);
        // Atom 1 owns vertices 2 and 3.
        for v in 2..4 {
            assert_eq!(&data[v * 6 + 3..v * 6 + 6], &[0.5; 3]);
        }
        for v in [0, 1, 4, 5] {
            assert_eq!(&data[v * 6 + 3..v * 6 + 6], &[1.0, 0.0, 0.0]);
        }
        assert_eq!(op.lookups.get(), 2);
    }

    #[test]
    fn empty_association_is_a_no_op() {
        let s = straight_chain(1);
        let assoc = AtomVertexAssoc::new();
        let mut data = vec![0.5; 12];
        let mut op = Scripted::new(vec![[1.0, 0.0, 0.0]]);
        let scope = ColorScope::begin(&mut op, &s);
        let view = StructureView::full(&s);
        assert_eq!(assoc.recolor(&scope, &view, &mut data, TARGET), 0);
        assert_eq!(data, vec![0.5; 12]);
    }
}
