//! Two-phase color operators.
//!
//! A [`ColorOp`] maps atoms to RGB triples. Operators that need global
//! statistics (value ranges, chain lengths) gather them in
//! [`ColorOp::begin`] and release them in [`ColorOp::end`]. Both must run
//! exactly once per logical recolor, which [`ColorScope`] enforces: it calls
//! `begin` when created and `end` when dropped, and geometry containers
//! accept an existing scope so an aggregator can recolor several buffers
//! inside one phase.

mod ops;
mod ramp;

pub use ops::{
    ByBFactor, ByChain, ByElement, BySecondaryStructure, Rainbow, Uniform,
};
pub use ramp::ColorRamp;

use crate::structure::{AtomRef, Structure};

/// Atom → color mapping with optional whole-structure setup.
pub trait ColorOp {
    /// Gather whatever global state `color_for` needs.
    fn begin(&mut self, _structure: &Structure) {}

    /// Write the color of `atom` into `out`.
    fn color_for(&self, atom: AtomRef<'_>, out: &mut [f32; 3]);

    /// Release state gathered in `begin`.
    fn end(&mut self, _structure: &Structure) {}
}

/// An open begin/end phase of a color operator.
///
/// Created with [`ColorScope::begin`]; `end` runs on drop.
pub struct ColorScope<'s> {
    op: &'s mut dyn ColorOp,
    structure: &'s Structure,
}

impl<'s> ColorScope<'s> {
    /// Enter the operator's phase for `structure`.
    pub fn begin(op: &'s mut dyn ColorOp, structure: &'s Structure) -> Self {
        op.begin(structure);
        Self { op, structure }
    }

    /// Color of `atom` under the scoped operator.
    #[must_use]
    pub fn color_for(&self, atom: AtomRef<'_>) -> [f32; 3] {
        let mut out = [0.0; 3];
        self.op.color_for(atom, &mut out);
        out
    }

    /// Structure the phase was entered for.
    #[must_use]
    pub fn structure(&self) -> &'s Structure {
        self.structure
    }
}

impl Drop for ColorScope<'_> {
    fn drop(&mut self) {
        self.op.end(self.structure);
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::cell::Cell;

    use super::ColorOp;
    use crate::structure::{AtomRef, Structure};

    /// Operator returning a fixed color per atom index and counting phase
    /// calls.
    pub(crate) struct Scripted {
        pub colors: Vec<[f32; 3]>,
        pub begins: usize,
        pub ends: usize,
        pub lookups: Cell<usize>,
    }

    impl Scripted {
        pub(crate) fn new(colors: Vec<[f32; 3]>) -> Self {
            Self {
                colors,
                begins: 0,
                ends: 0,
                lookups: Cell::new(0),
            }
        }
    }

    impl ColorOp for Scripted {
        fn begin(&mut self, _structure: &Structure) {
            self.begins += 1;
        }

        fn color_for(&self, atom: AtomRef<'_>, out: &mut [f32; 3]) {
            self.lookups.set(self.lookups.get() + 1);
            *out = self.colors[atom.index() % self.colors.len()];
        }

        fn end(&mut self, _structure: &Structure) {
            self.ends += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::Scripted;
    use super::*;
    use crate::structure::test_util::straight_chain;

    #[test]
    fn scope_runs_begin_and_end_once() {
        let s = straight_chain(2);
        let mut op = Scripted::new(vec![[1.0, 0.0, 0.0]]);
        {
            let scope = ColorScope::begin(&mut op, &s);
            assert_eq!(scope.color_for(s.atom_ref(0)), [1.0, 0.0, 0.0]);
            assert_eq!(scope.color_for(s.atom_ref(1)), [1.0, 0.0, 0.0]);
        }
        assert_eq!(op.begins, 1);
        assert_eq!(op.ends, 1);
        assert_eq!(op.lookups.get(), 2);
    }
}
