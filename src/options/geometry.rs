use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How tube cross-sections are oriented along the backbone spline.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TubeFrames {
    /// Curvature-based frames, realigned ring to ring by a stitching
    /// offset.
    #[default]
    Frenet,
    /// Rotation-minimizing frames carried along the path.
    RotationMinimizing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
#[schemars(title = "Geometry", inline)]
/// Tessellation and sizing options for the geometry builders.
pub struct GeometryOptions {
    /// Latitude rings of the unit sphere template.
    #[schemars(title = "Sphere Stacks", range(min = 2, max = 64))]
    pub sphere_stacks: u32,
    /// Longitude samples of the unit sphere template.
    #[schemars(title = "Sphere Arcs", range(min = 3, max = 64))]
    pub sphere_arcs: u32,
    /// Radial samples of the unit cylinder template.
    #[schemars(title = "Cylinder Arcs", range(min = 3, max = 64))]
    pub cylinder_arcs: u32,
    /// Sphere radius in angstroms for the space-filling builder.
    pub sphere_radius: f32,
    /// Atom sphere radius in angstroms for ball-and-stick.
    pub atom_radius: f32,
    /// Bond cylinder radius in angstroms for ball-and-stick.
    pub bond_radius: f32,
    /// Backbone tube radius in angstroms.
    pub tube_radius: f32,
    /// Number of points around the tube cross-section.
    #[schemars(title = "Tube Samples", range(min = 3, max = 64))]
    pub tube_profile_samples: u32,
    /// Tangent strength of the cross-section smoothing spline.
    /// `0.5` gives a Catmull-Rom profile; lower values flatten it.
    #[schemars(title = "Tube Roundness", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub tube_profile_strength: f32,
    /// Cross-section slices per residue along a trace (interpolation
    /// factor).
    #[schemars(title = "Spline Detail", range(min = 1, max = 16))]
    pub spline_detail: u32,
    /// Frame construction for tube rings.
    #[schemars(title = "Tube Frames")]
    pub tube_frames: TubeFrames,
    /// Maximum trace-atom distance in angstroms before a trace is split.
    pub trace_max_gap: f32,
    /// Slack in angstroms added to covalent radii when inferring bonds for
    /// structures that carry none.
    pub bond_tolerance: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            sphere_stacks: 12,
            sphere_arcs: 16,
            cylinder_arcs: 12,
            sphere_radius: 1.5,
            atom_radius: 0.3,
            bond_radius: 0.12,
            tube_radius: 0.3,
            tube_profile_samples: 12,
            tube_profile_strength: 0.5,
            spline_detail: 4,
            tube_frames: TubeFrames::Frenet,
            trace_max_gap: 4.2,
            bond_tolerance: 0.4,
        }
    }
}
