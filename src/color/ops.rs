//! Built-in color operators.

use std::collections::HashMap;

use super::{ColorOp, ColorRamp};
use crate::options::ColorOptions;
use crate::structure::{AtomRef, SecondaryStructure, Structure};

/// Same color for every atom.
#[derive(Debug, Clone, Copy)]
pub struct Uniform(pub [f32; 3]);

impl ColorOp for Uniform {
    fn color_for(&self, _atom: AtomRef<'_>, out: &mut [f32; 3]) {
        *out = self.0;
    }
}

/// Color by chain index, cycling through a palette.
#[derive(Debug, Clone)]
pub struct ByChain {
    palette: Vec<[f32; 3]>,
    fallback: [f32; 3],
}

impl ByChain {
    /// Operator using the configured chain palette.
    #[must_use]
    pub fn from_options(colors: &ColorOptions) -> Self {
        Self {
            palette: colors.chain_palette.clone(),
            fallback: colors.fallback,
        }
    }
}

impl ColorOp for ByChain {
    fn color_for(&self, atom: AtomRef<'_>, out: &mut [f32; 3]) {
        *out = if self.palette.is_empty() {
            self.fallback
        } else {
            self.palette[atom.chain_index() % self.palette.len()]
        };
    }
}

/// Color by the secondary structure of the owning residue.
#[derive(Debug, Clone, Copy)]
pub struct BySecondaryStructure {
    helix: [f32; 3],
    sheet: [f32; 3],
    coil: [f32; 3],
}

impl BySecondaryStructure {
    /// Operator using the configured helix/sheet/coil colors.
    #[must_use]
    pub fn from_options(colors: &ColorOptions) -> Self {
        Self {
            helix: colors.helix,
            sheet: colors.sheet,
            coil: colors.coil,
        }
    }
}

impl ColorOp for BySecondaryStructure {
    fn color_for(&self, atom: AtomRef<'_>, out: &mut [f32; 3]) {
        *out = match atom.residue().ss {
            SecondaryStructure::Helix => self.helix,
            SecondaryStructure::Sheet => self.sheet,
            SecondaryStructure::Coil => self.coil,
        };
    }
}

/// Color by element symbol.
#[derive(Debug, Clone)]
pub struct ByElement {
    table: HashMap<String, [f32; 3]>,
    fallback: [f32; 3],
}

impl ByElement {
    /// Operator using the configured element table.
    #[must_use]
    pub fn from_options(colors: &ColorOptions) -> Self {
        Self {
            table: colors.elements.clone(),
            fallback: colors.fallback,
        }
    }
}

impl ColorOp for ByElement {
    fn color_for(&self, atom: AtomRef<'_>, out: &mut [f32; 3]) {
        let symbol = atom.atom().element.trim().to_ascii_uppercase();
        *out = self.table.get(&symbol).copied().unwrap_or(self.fallback);
    }
}

/// Gradient along each chain, N-terminus to C-terminus.
///
/// Residue positions are normalized by chain length, which is computed
/// once per phase in [`ColorOp::begin`].
#[derive(Debug, Clone)]
pub struct Rainbow {
    ramp: ColorRamp,
    residue_t: Vec<f32>,
}

impl Rainbow {
    /// Rainbow over the given ramp.
    #[must_use]
    pub fn new(ramp: ColorRamp) -> Self {
        Self {
            ramp,
            residue_t: Vec::new(),
        }
    }

    /// Rainbow over the configured gradient stops.
    #[must_use]
    pub fn from_options(colors: &ColorOptions) -> Self {
        Self::new(ColorRamp::new(colors.gradient.clone()))
    }
}

impl ColorOp for Rainbow {
    fn begin(&mut self, structure: &Structure) {
        self.residue_t = vec![0.0; structure.residues.len()];
        for chain in &structure.chains {
            let span = chain.residues.len().saturating_sub(1).max(1) as f32;
            for (pos, &res) in chain.residues.iter().enumerate() {
                self.residue_t[res] = pos as f32 / span;
            }
        }
    }

    fn color_for(&self, atom: AtomRef<'_>, out: &mut [f32; 3]) {
        let t = self
            .residue_t
            .get(atom.residue_index())
            .copied()
            .unwrap_or(0.0);
        *out = self.ramp.sample(t);
    }

    fn end(&mut self, _structure: &Structure) {
        self.residue_t = Vec::new();
    }
}

/// Color by temperature factor, normalized to the structure's B-factor
/// range. The range is computed in [`ColorOp::begin`].
#[derive(Debug, Clone)]
pub struct ByBFactor {
    ramp: ColorRamp,
    range: Option<(f32, f32)>,
}

impl ByBFactor {
    /// B-factor coloring over the given ramp.
    #[must_use]
    pub fn new(ramp: ColorRamp) -> Self {
        Self { ramp, range: None }
    }

    /// B-factor coloring over the configured gradient stops.
    #[must_use]
    pub fn from_options(colors: &ColorOptions) -> Self {
        Self::new(ColorRamp::new(colors.gradient.clone()))
    }
}

impl ColorOp for ByBFactor {
    fn begin(&mut self, structure: &Structure) {
        self.range = structure.atoms.iter().map(|a| a.b_factor).fold(
            None,
            |acc, b| match acc {
                None => Some((b, b)),
                Some((lo, hi)) => Some((lo.min(b), hi.max(b))),
            },
        );
    }

    fn color_for(&self, atom: AtomRef<'_>, out: &mut [f32; 3]) {
        let t = match self.range {
            Some((lo, hi)) if hi > lo => {
                (atom.atom().b_factor - lo) / (hi - lo)
            }
            _ => 0.0,
        };
        *out = self.ramp.sample(t);
    }

    fn end(&mut self, _structure: &Structure) {
        self.range = None;
    }
}
