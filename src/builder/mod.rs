//! Geometry-building passes over a structure.
//!
//! Each pass walks the structure once, instances procedural templates into
//! a fresh buffer, records which vertices belong to which atom or trace
//! slice, attaches that association and applies the initial coloring. The
//! returned geometry is ready for later `color_by` calls without a rebuild.
//!
//! | Pass | Output | Association |
//! |---|---|---|
//! | [`GeomBuilder::lines`] | bond half-lines | atom |
//! | [`GeomBuilder::spheres`] | one sphere per atom | atom |
//! | [`GeomBuilder::ball_and_stick`] | spheres + bond cylinders | atom |
//! | [`GeomBuilder::line_trace`] | trace polyline | trace, 1 slice |
//! | [`GeomBuilder::tube`] | smoothed tube | trace, `k` slices |

mod atoms;
mod trace;

use std::sync::Arc;

use crate::assoc::VertexAssoc;
use crate::buffer::Geometry;
use crate::color::ColorOp;
use crate::options::GeometryOptions;
use crate::procedural::Templates;
use crate::structure::Structure;

/// Placeholder color written at build time, before the first recolor.
const UNCOLORED: [f32; 3] = [1.0, 1.0, 1.0];

/// Builds geometry for a structure using shared, cached templates.
#[derive(Debug, Default)]
pub struct GeomBuilder {
    options: GeometryOptions,
    templates: Templates,
}

impl GeomBuilder {
    /// Builder with the given tessellation and sizing options.
    #[must_use]
    pub fn new(options: GeometryOptions) -> Self {
        Self {
            options,
            templates: Templates::new(),
        }
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    /// Replace the options. Cached templates stay valid; new tessellation
    /// levels are built on demand.
    pub fn set_options(&mut self, options: GeometryOptions) {
        self.options = options;
    }
}

/// Attach `assoc` to `geom` and apply the initial coloring.
fn attach<G: Geometry>(
    mut geom: G,
    structure: &Arc<Structure>,
    assoc: VertexAssoc,
    op: &mut dyn ColorOp,
) -> G {
    geom.set_association(Arc::clone(structure), assoc);
    geom.color_by(op, None);
    geom
}
