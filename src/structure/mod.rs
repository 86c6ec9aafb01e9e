//! Minimal molecular structure model consumed by the geometry builders.
//!
//! Chains own residues, residues own atoms, and every atom carries a
//! stable index into [`Structure::atoms`] that association tables use as a
//! key. The model is append-only: indices handed out by the `add_*`
//! methods stay valid for the structure's lifetime.

mod view;

use glam::Vec3;
use rustc_hash::FxHashMap;
pub use view::StructureView;

/// Secondary structure assignment of a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondaryStructure {
    /// Alpha (or 3-10, pi) helix.
    Helix,
    /// Beta strand.
    Sheet,
    /// Anything else.
    #[default]
    Coil,
}

/// A single atom.
#[derive(Debug, Clone)]
pub struct Atom {
    /// Atom name, e.g. `CA`.
    pub name: String,
    /// Element symbol, e.g. `C`.
    pub element: String,
    /// Cartesian position in angstroms.
    pub pos: Vec3,
    /// Temperature factor.
    pub b_factor: f32,
    /// Owning residue index.
    pub residue: usize,
}

/// A residue: an ordered group of atoms inside one chain.
#[derive(Debug, Clone)]
pub struct Residue {
    /// Three-letter residue name.
    pub name: String,
    /// Author residue number.
    pub number: i32,
    /// Secondary structure assignment.
    pub ss: SecondaryStructure,
    /// Owning chain index.
    pub chain: usize,
    /// Atom indices in insertion order.
    pub atoms: Vec<usize>,
}

/// A chain: an ordered list of residues.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Chain identifier.
    pub name: String,
    /// Residue indices in sequence order.
    pub residues: Vec<usize>,
}

/// One contiguous backbone path within a chain.
///
/// `atoms[i]` is the trace atom (`CA` for amino acids, `P` for nucleotides)
/// of residue `residues[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackboneTrace {
    /// Chain the trace belongs to.
    pub chain: usize,
    /// Residue indices along the trace.
    pub residues: Vec<usize>,
    /// Trace atom index per residue.
    pub atoms: Vec<usize>,
}

impl BackboneTrace {
    /// Number of residues on the trace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the trace has no residues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Trace atom positions, in order.
    #[must_use]
    pub fn positions(&self, structure: &Structure) -> Vec<Vec3> {
        self.atoms.iter().map(|&a| structure.atoms[a].pos).collect()
    }
}

/// Borrowed handle to one atom of a structure, passed to color operators.
#[derive(Clone, Copy)]
pub struct AtomRef<'a> {
    structure: &'a Structure,
    index: usize,
}

impl<'a> AtomRef<'a> {
    /// Stable atom index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The atom record.
    #[must_use]
    pub fn atom(&self) -> &'a Atom {
        &self.structure.atoms[self.index]
    }

    /// Index of the owning residue.
    #[must_use]
    pub fn residue_index(&self) -> usize {
        self.atom().residue
    }

    /// The owning residue.
    #[must_use]
    pub fn residue(&self) -> &'a Residue {
        &self.structure.residues[self.residue_index()]
    }

    /// Index of the owning chain.
    #[must_use]
    pub fn chain_index(&self) -> usize {
        self.residue().chain
    }

    /// The owning chain.
    #[must_use]
    pub fn chain(&self) -> &'a Chain {
        &self.structure.chains[self.chain_index()]
    }

    /// Position of this residue within its chain.
    #[must_use]
    pub fn residue_position(&self) -> usize {
        let res = self.residue_index();
        self.chain()
            .residues
            .iter()
            .position(|&r| r == res)
            .unwrap_or(0)
    }

    /// The structure this atom belongs to.
    #[must_use]
    pub fn structure(&self) -> &'a Structure {
        self.structure
    }
}

/// Hierarchical chain → residue → atom container.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// All chains, in insertion order.
    pub chains: Vec<Chain>,
    /// All residues, across chains.
    pub residues: Vec<Residue>,
    /// All atoms, across residues. The position is the atom's stable index.
    pub atoms: Vec<Atom>,
    /// Bonds as ordered atom index pairs.
    pub bonds: Vec<(usize, usize)>,
}

impl Structure {
    /// Empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chain and return its index.
    pub fn add_chain(&mut self, name: &str) -> usize {
        self.chains.push(Chain {
            name: name.to_owned(),
            residues: Vec::new(),
        });
        self.chains.len() - 1
    }

    /// Append a residue to `chain` and return its index.
    pub fn add_residue(
        &mut self,
        chain: usize,
        name: &str,
        number: i32,
        ss: SecondaryStructure,
    ) -> usize {
        let idx = self.residues.len();
        self.residues.push(Residue {
            name: name.to_owned(),
            number,
            ss,
            chain,
            atoms: Vec::new(),
        });
        self.chains[chain].residues.push(idx);
        idx
    }

    /// Append an atom to `residue` and return its stable index.
    pub fn add_atom(
        &mut self,
        residue: usize,
        name: &str,
        element: &str,
        pos: Vec3,
        b_factor: f32,
    ) -> usize {
        let idx = self.atoms.len();
        self.atoms.push(Atom {
            name: name.to_owned(),
            element: element.to_owned(),
            pos,
            b_factor,
            residue,
        });
        self.residues[residue].atoms.push(idx);
        idx
    }

    /// Record a bond between two atoms.
    pub fn connect(&mut self, a: usize, b: usize) {
        self.bonds.push((a.min(b), a.max(b)));
    }

    /// Handle to atom `index`.
    #[must_use]
    pub fn atom_ref(&self, index: usize) -> AtomRef<'_> {
        AtomRef {
            structure: self,
            index,
        }
    }

    /// Number of atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Replace the bond list with bonds inferred from covalent radii.
    pub fn derive_bonds(&mut self, tolerance: f32) {
        self.bonds = self.infer_bonds(tolerance);
    }

    /// Bonds inferred from covalent radii, sorted, without touching the
    /// stored bond list.
    ///
    /// Two atoms are bonded when their distance is below the sum of their
    /// covalent radii plus `tolerance`. Uses a uniform grid so the cost is
    /// linear in atom count for typical structures.
    #[must_use]
    pub fn infer_bonds(&self, tolerance: f32) -> Vec<(usize, usize)> {
        const CELL: f32 = 3.2;
        let cell_of = |p: Vec3| -> (i32, i32, i32) {
            (
                (p.x / CELL).floor() as i32,
                (p.y / CELL).floor() as i32,
                (p.z / CELL).floor() as i32,
            )
        };

        let mut grid: FxHashMap<(i32, i32, i32), Vec<usize>> =
            FxHashMap::default();
        for (i, atom) in self.atoms.iter().enumerate() {
            grid.entry(cell_of(atom.pos)).or_default().push(i);
        }

        let mut bonds = Vec::new();
        for (i, atom) in self.atoms.iter().enumerate() {
            let (cx, cy, cz) = cell_of(atom.pos);
            let ri = covalent_radius(&atom.element);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(cell) = grid.get(&(cx + dx, cy + dy, cz + dz))
                        else {
                            continue;
                        };
                        for &j in cell.iter().filter(|&&j| j > i) {
                            let other = &self.atoms[j];
                            let cutoff = ri
                                + covalent_radius(&other.element)
                                + tolerance;
                            let d2 = atom.pos.distance_squared(other.pos);
                            if d2 > 1e-6 && d2 < cutoff * cutoff {
                                bonds.push((i, j));
                            }
                        }
                    }
                }
            }
        }
        bonds.sort_unstable();
        log::debug!(
            "inferred {} bonds for {} atoms",
            bonds.len(),
            self.atoms.len()
        );
        bonds
    }

    /// Trace atom of a residue: `CA` for amino acids, `P` for nucleotides.
    #[must_use]
    pub fn trace_atom(&self, residue: usize) -> Option<usize> {
        let atoms = &self.residues[residue].atoms;
        atoms
            .iter()
            .copied()
            .find(|&a| self.atoms[a].name == "CA")
            .or_else(|| {
                atoms.iter().copied().find(|&a| self.atoms[a].name == "P")
            })
    }

    /// Split every chain into contiguous backbone traces.
    ///
    /// A trace breaks at residues without a trace atom and wherever two
    /// consecutive trace atoms are farther apart than `max_gap`.
    #[must_use]
    pub fn backbone_traces(&self, max_gap: f32) -> Vec<BackboneTrace> {
        self.traces_where(max_gap, |_| true)
    }

    /// Like [`Structure::backbone_traces`], additionally breaking at
    /// residues whose trace atom fails `keep`.
    pub(crate) fn traces_where(
        &self,
        max_gap: f32,
        keep: impl Fn(usize) -> bool,
    ) -> Vec<BackboneTrace> {
        let mut traces = Vec::new();
        for (chain_idx, chain) in self.chains.iter().enumerate() {
            let mut current = BackboneTrace {
                chain: chain_idx,
                residues: Vec::new(),
                atoms: Vec::new(),
            };
            for &res in &chain.residues {
                let trace_atom = self.trace_atom(res).filter(|&a| keep(a));
                let Some(atom) = trace_atom else {
                    flush_trace(&mut traces, &mut current);
                    continue;
                };
                if let Some(&prev) = current.atoms.last() {
                    let gap =
                        self.atoms[prev].pos.distance(self.atoms[atom].pos);
                    if gap > max_gap {
                        flush_trace(&mut traces, &mut current);
                    }
                }
                current.residues.push(res);
                current.atoms.push(atom);
            }
            flush_trace(&mut traces, &mut current);
        }
        traces
    }
}

fn flush_trace(traces: &mut Vec<BackboneTrace>, current: &mut BackboneTrace) {
    if current.is_empty() {
        return;
    }
    traces.push(BackboneTrace {
        chain: current.chain,
        residues: std::mem::take(&mut current.residues),
        atoms: std::mem::take(&mut current.atoms),
    });
}

/// Covalent radius in angstroms for bond inference.
fn covalent_radius(element: &str) -> f32 {
    match element.trim().to_ascii_uppercase().as_str() {
        "H" => 0.31,
        "N" => 0.71,
        "O" => 0.66,
        "S" => 1.05,
        "P" => 1.07,
        "SE" => 1.20,
        "FE" => 1.32,
        _ => 0.76,
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use glam::Vec3;

    use super::{SecondaryStructure, Structure};

    /// Straight chain of `n` residues along +X (3.8 Å CA spacing), each
    /// residue carrying N, CA and C atoms.
    pub(crate) fn straight_chain(n: usize) -> Structure {
        let mut s = Structure::new();
        let chain = s.add_chain("A");
        for i in 0..n {
            let ss = if i < n / 2 {
                SecondaryStructure::Helix
            } else {
                SecondaryStructure::Coil
            };
            let res = s.add_residue(chain, "ALA", i as i32 + 1, ss);
            let x = i as f32 * 3.8;
            let n_pos = Vec3::new(x - 1.2, 0.5, 0.0);
            let c_pos = Vec3::new(x + 1.2, 0.5, 0.0);
            let _ = s.add_atom(res, "N", "N", n_pos, 10.0);
            let _ = s.add_atom(res, "CA", "C", Vec3::new(x, 0.0, 0.0), 20.0);
            let _ = s.add_atom(res, "C", "C", c_pos, 30.0);
        }
        s
    }

    /// A bent two-chain structure used by trace-based tests.
    pub(crate) fn two_chains(n: usize) -> Structure {
        let mut s = Structure::new();
        for (c, name) in ["A", "B"].iter().enumerate() {
            let chain = s.add_chain(name);
            for i in 0..n {
                let res = s.add_residue(
                    chain,
                    "GLY",
                    i as i32 + 1,
                    SecondaryStructure::Coil,
                );
                let t = i as f32 * 0.6;
                let pos = Vec3::new(
                    t.cos() * 5.0,
                    t.sin() * 5.0,
                    i as f32 * 1.5 + c as f32 * 30.0,
                );
                let _ = s.add_atom(res, "CA", "C", pos, i as f32);
            }
        }
        s
    }
}
