use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Color palette options used by the built-in color operators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// Chain colors, cycled by chain index.
    pub chain_palette: Vec<[f32; 3]>,
    /// RGB color for helix residues.
    pub helix: [f32; 3],
    /// RGB color for sheet residues.
    pub sheet: [f32; 3],
    /// RGB color for coil residues.
    pub coil: [f32; 3],
    /// Gradient stops for rainbow and B-factor coloring (low → high).
    pub gradient: Vec<[f32; 3]>,
    /// Element colors keyed by uppercase element symbol.
    pub elements: HashMap<String, [f32; 3]>,
    /// Color for elements missing from the table.
    pub fallback: [f32; 3],
}

impl Default for ColorOptions {
    fn default() -> Self {
        let mut elements = HashMap::new();
        let _ = elements.insert("C".to_owned(), [0.56, 0.56, 0.56]);
        let _ = elements.insert("N".to_owned(), [0.19, 0.31, 0.97]);
        let _ = elements.insert("O".to_owned(), [1.0, 0.05, 0.05]);
        let _ = elements.insert("S".to_owned(), [1.0, 0.78, 0.2]);
        let _ = elements.insert("P".to_owned(), [1.0, 0.5, 0.0]);
        let _ = elements.insert("H".to_owned(), [0.9, 0.9, 0.9]);
        let _ = elements.insert("FE".to_owned(), [0.88, 0.4, 0.2]);
        let _ = elements.insert("MG".to_owned(), [0.54, 1.0, 0.0]);
        let _ = elements.insert("ZN".to_owned(), [0.49, 0.5, 0.69]);

        Self {
            chain_palette: vec![
                [0.35, 0.6, 0.9],
                [0.95, 0.6, 0.2],
                [0.4, 0.8, 0.4],
                [0.85, 0.35, 0.45],
                [0.65, 0.5, 0.85],
                [0.9, 0.85, 0.3],
            ],
            helix: [0.9, 0.3, 0.4],
            sheet: [0.95, 0.8, 0.2],
            coil: [0.75, 0.75, 0.75],
            gradient: vec![
                [0.1, 0.2, 0.9],
                [0.1, 0.8, 0.2],
                [1.0, 0.9, 0.1],
                [0.9, 0.15, 0.1],
            ],
            elements,
            fallback: [0.8, 0.3, 0.8],
        }
    }
}

impl ColorOptions {
    /// Look up an element color by symbol (case-insensitive). Falls back
    /// to [`ColorOptions::fallback`].
    #[must_use]
    pub fn element(&self, symbol: &str) -> [f32; 3] {
        self.elements
            .get(symbol.trim().to_ascii_uppercase().as_str())
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Chain color for a chain index, cycling through the palette.
    #[must_use]
    pub fn chain(&self, chain_idx: usize) -> [f32; 3] {
        if self.chain_palette.is_empty() {
            return self.fallback;
        }
        self.chain_palette[chain_idx % self.chain_palette.len()]
    }
}
