// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Procedural molecular geometry with in-place recoloring.
//!
//! Builders turn a [`structure::Structure`] into GPU-ready line and
//! triangle buffers (wireframe, spheres, ball-and-stick, CA trace, spline
//! tube). Every buffer remembers which vertices belong to which atom, or to
//! which slice of a backbone trace, so a new coloring only rewrites the
//! color floats of the affected vertices and marks the buffer dirty. The
//! next draw re-uploads it; positions, normals and topology never change.
//!
//! # Key entry points
//!
//! - [`builder::GeomBuilder`] - geometry passes over a structure
//! - [`buffer::Geometry`] - recolor / bind / draw surface of a buffer
//! - [`color::ColorOp`] - coloring operators and their begin/end phase
//! - [`geom::MultiGeom`] - several geometries recolored in one phase
//! - [`render::RenderBackend`] - the GPU seam, with
//!   [`render::WgpuBackend`] as the wgpu implementation
//! - [`options::Options`] - tessellation, sizing and color configuration
//!
//! # Layout
//!
//! Line vertices are 6 floats (position, color); mesh vertices are 9
//! (position, normal, color). Indices are `u32`.

pub mod assoc;
pub mod buffer;
pub mod builder;
pub mod color;
pub mod error;
pub mod geom;
pub mod options;
pub mod procedural;
pub mod render;
pub mod spline;
pub mod structure;
