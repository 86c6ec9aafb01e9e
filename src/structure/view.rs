//! Ordered atom subsets of a structure.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{AtomRef, BackboneTrace, Structure};

/// An arbitrary sub-traversal of a structure: a subset of its atoms in a
/// caller-chosen order.
///
/// Views are what recoloring walks. A view need not match the traversal
/// used when geometry was built; atoms outside it keep whatever color their
/// vertices already have.
#[derive(Clone)]
pub struct StructureView<'a> {
    structure: &'a Structure,
    atoms: Vec<usize>,
    members: FxHashSet<usize>,
}

impl<'a> StructureView<'a> {
    fn new(structure: &'a Structure, atoms: Vec<usize>) -> Self {
        let members = atoms.iter().copied().collect();
        Self {
            structure,
            atoms,
            members,
        }
    }

    /// View over every atom, in index order.
    #[must_use]
    pub fn full(structure: &'a Structure) -> Self {
        Self::new(structure, (0..structure.atom_count()).collect())
    }

    /// View over the given atom indices, in the given order. Indices out of
    /// range are dropped.
    pub fn from_atoms(
        structure: &'a Structure,
        atoms: impl IntoIterator<Item = usize>,
    ) -> Self {
        let atoms = atoms
            .into_iter()
            .filter(|&a| a < structure.atom_count())
            .collect();
        Self::new(structure, atoms)
    }

    /// View over the atoms accepted by `predicate`, in index order.
    pub fn select(
        structure: &'a Structure,
        predicate: impl Fn(AtomRef<'_>) -> bool,
    ) -> Self {
        let atoms = (0..structure.atom_count())
            .filter(|&a| predicate(structure.atom_ref(a)))
            .collect();
        Self::new(structure, atoms)
    }

    /// The underlying structure.
    #[must_use]
    pub fn structure(&self) -> &'a Structure {
        self.structure
    }

    /// Number of atoms in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Atom indices in view order.
    #[must_use]
    pub fn atom_indices(&self) -> &[usize] {
        &self.atoms
    }

    /// Whether atom `index` is part of the view.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// View atoms grouped by chain, as `(chain index, atom indices)`.
    /// Chains appear in the order their first atom appears in the view;
    /// atoms keep view order within each group.
    #[must_use]
    pub fn chains(&self) -> Vec<(usize, Vec<usize>)> {
        let mut slot: FxHashMap<usize, usize> = FxHashMap::default();
        let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
        for &a in &self.atoms {
            let chain = self.structure.atom_ref(a).chain_index();
            let i = *slot.entry(chain).or_insert_with(|| {
                groups.push((chain, Vec::new()));
                groups.len() - 1
            });
            groups[i].1.push(a);
        }
        groups
    }

    /// Atoms in view order.
    pub fn atoms(&self) -> impl Iterator<Item = AtomRef<'a>> + '_ {
        let structure = self.structure;
        self.atoms.iter().map(move |&a| structure.atom_ref(a))
    }

    /// Backbone traces restricted to residues whose trace atom is in the
    /// view. A trace of the full structure that is only partly visible
    /// yields one trace per visible run.
    #[must_use]
    pub fn backbone_traces(&self, max_gap: f32) -> Vec<BackboneTrace> {
        self.structure
            .traces_where(max_gap, |a| self.members.contains(&a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::test_util::{straight_chain, two_chains};

    #[test]
    fn full_view_covers_every_atom() {
        let s = straight_chain(4);
        let view = StructureView::full(&s);
        assert_eq!(view.len(), 12);
        assert_eq!(view.backbone_traces(4.2), s.backbone_traces(4.2));
    }

    #[test]
    fn from_atoms_keeps_order_and_drops_out_of_range() {
        let s = straight_chain(2);
        let view = StructureView::from_atoms(&s, [5, 0, 99]);
        assert_eq!(view.atom_indices(), &[5, 0]);
    }

    #[test]
    fn partial_view_splits_traces() {
        let s = straight_chain(5);
        // Hide residue 2's CA.
        let hidden = s.trace_atom(2).unwrap();
        let view = StructureView::select(&s, |a| a.index() != hidden);
        let traces = view.backbone_traces(4.2);
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].residues, vec![0, 1]);
        assert_eq!(traces[1].residues, vec![3, 4]);
    }

    #[test]
    fn chains_group_in_view_order() {
        let s = two_chains(2);
        let view = StructureView::from_atoms(&s, [3, 0, 2, 1]);
        assert_eq!(view.chains(), vec![(1, vec![3, 2]), (0, vec![0, 1])]);
        assert!(view.contains(2));
        assert!(!StructureView::from_atoms(&s, [1]).contains(2));
    }
}
