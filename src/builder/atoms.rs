//! Atom-level passes: lines, spheres, ball-and-stick.

use std::borrow::Cow;
use std::sync::Arc;

use glam::{Mat3, Quat, Vec3};

use super::{attach, GeomBuilder, UNCOLORED};
use crate::assoc::AtomVertexAssoc;
use crate::buffer::{Geometry, LineGeom, MeshGeom};
use crate::color::ColorOp;
use crate::error::GeomError;
use crate::procedural::ProtoSphere;
use crate::structure::{Atom, Structure};

/// Bonds shorter than this are not drawn as cylinders.
const MIN_BOND_LENGTH: f32 = 1e-4;

impl GeomBuilder {
    /// Wireframe: each bond as two half-lines meeting at the midpoint, each
    /// half bound to its end atom. Atoms without bonds get a small
    /// three-axis cross.
    pub fn lines(
        &self,
        structure: &Arc<Structure>,
        op: &mut dyn ColorOp,
    ) -> LineGeom {
        let bonds = self.bonds(structure);
        let mut bonded = vec![false; structure.atom_count()];
        let mut geom = LineGeom::with_capacity(bonds.len() * 2);
        let mut assoc = AtomVertexAssoc::with_capacity(bonds.len() * 2);

        for &(a, b) in bonds.iter() {
            let Some((atom_a, atom_b)) = bond_atoms(structure, a, b) else {
                continue;
            };
            bonded[a] = true;
            bonded[b] = true;
            let mid = (atom_a.pos + atom_b.pos) * 0.5;
            let v = geom.num_verts();
            geom.add_line(atom_a.pos, UNCOLORED, mid, UNCOLORED);
            geom.add_line(mid, UNCOLORED, atom_b.pos, UNCOLORED);
            assoc.add_assoc(a, v, v + 2);
            assoc.add_assoc(b, v + 2, v + 4);
        }

        let half = self.options.atom_radius;
        for (i, atom) in structure.atoms.iter().enumerate() {
            if bonded[i] {
                continue;
            }
            let v = geom.num_verts();
            for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                geom.add_line(
                    atom.pos - axis * half,
                    UNCOLORED,
                    atom.pos + axis * half,
                    UNCOLORED,
                );
            }
            assoc.add_assoc(i, v, v + 6);
        }

        log::debug!(
            "lines: {} bonds, {} vertices",
            bonds.len(),
            geom.num_verts()
        );
        attach(geom, structure, assoc.into(), op)
    }

    /// Space-filling spheres of `sphere_radius`, one per atom.
    pub fn spheres(
        &mut self,
        structure: &Arc<Structure>,
        op: &mut dyn ColorOp,
    ) -> Result<MeshGeom, GeomError> {
        let sphere = self
            .templates
            .sphere(self.options.sphere_stacks, self.options.sphere_arcs)?;
        let mut geom = sphere_mesh(&sphere, structure.atom_count(), 0, 0);
        let mut assoc = AtomVertexAssoc::with_capacity(structure.atom_count());
        add_atom_spheres(
            &sphere,
            structure,
            self.options.sphere_radius,
            &mut geom,
            &mut assoc,
        );

        log::debug!(
            "spheres: {} atoms, {} vertices, {} triangles",
            structure.atom_count(),
            geom.num_verts(),
            geom.num_triangles()
        );
        Ok(attach(geom, structure, assoc.into(), op))
    }

    /// Small spheres of `atom_radius` plus one cylinder of `bond_radius` per
    /// bond. The bottom ring of each cylinder is bound to the first bond
    /// atom and the top ring to the second, so the colors of the two
    /// halves blend across the bond.
    pub fn ball_and_stick(
        &mut self,
        structure: &Arc<Structure>,
        op: &mut dyn ColorOp,
    ) -> Result<MeshGeom, GeomError> {
        let sphere = self
            .templates
            .sphere(self.options.sphere_stacks, self.options.sphere_arcs)?;
        let cylinder = self.templates.cylinder(self.options.cylinder_arcs)?;

        let bond_list = self.bonds(structure);
        let bonds = bond_list.len();
        let mut geom = sphere_mesh(
            &sphere,
            structure.atom_count(),
            bonds * cylinder.num_vertices() as usize,
            bonds * cylinder.num_indices() as usize,
        );
        let mut assoc =
            AtomVertexAssoc::with_capacity(structure.atom_count() + 2 * bonds);
        add_atom_spheres(
            &sphere,
            structure,
            self.options.atom_radius,
            &mut geom,
            &mut assoc,
        );

        let arcs = cylinder.arcs();
        for &(a, b) in bond_list.iter() {
            let Some((atom_a, atom_b)) = bond_atoms(structure, a, b) else {
                continue;
            };
            let axis = atom_b.pos - atom_a.pos;
            let length = axis.length();
            if length < MIN_BOND_LENGTH {
                log::warn!("skipping zero-length bond ({a}, {b})");
                continue;
            }
            let rotation = Mat3::from_quat(Quat::from_rotation_arc(
                Vec3::Z,
                axis / length,
            ));
            let start = cylinder.add_transformed(
                &mut geom,
                (atom_a.pos + atom_b.pos) * 0.5,
                length,
                self.options.bond_radius,
                rotation,
                UNCOLORED,
                UNCOLORED,
            );
            assoc.add_assoc(a, start, start + arcs);
            assoc.add_assoc(b, start + arcs, start + 2 * arcs);
        }

        log::debug!(
            "ball-and-stick: {} atoms, {} bonds, {} vertices, {} triangles",
            structure.atom_count(),
            bonds,
            geom.num_verts(),
            geom.num_triangles()
        );
        Ok(attach(geom, structure, assoc.into(), op))
    }

    /// The structure's bonds, or bonds inferred with `bond_tolerance` when
    /// it has none.
    fn bonds<'s>(
        &self,
        structure: &'s Structure,
    ) -> Cow<'s, [(usize, usize)]> {
        if structure.bonds.is_empty() {
            Cow::Owned(structure.infer_bonds(self.options.bond_tolerance))
        } else {
            Cow::Borrowed(&structure.bonds)
        }
    }
}

/// Both atoms of a bond, or `None` (with a warning) if either index is out
/// of range.
fn bond_atoms(
    structure: &Structure,
    a: usize,
    b: usize,
) -> Option<(&Atom, &Atom)> {
    let pair = structure.atoms.get(a).zip(structure.atoms.get(b));
    if pair.is_none() {
        log::warn!("bond ({a}, {b}) references a missing atom");
    }
    pair
}

/// Mesh pre-sized for `atoms` sphere instances plus extra room.
fn sphere_mesh(
    sphere: &ProtoSphere,
    atoms: usize,
    extra_vertices: usize,
    extra_indices: usize,
) -> MeshGeom {
    MeshGeom::with_capacity(
        atoms * sphere.num_vertices() as usize + extra_vertices,
        atoms * sphere.num_indices() as usize + extra_indices,
    )
}

fn add_atom_spheres(
    sphere: &ProtoSphere,
    structure: &Structure,
    radius: f32,
    geom: &mut MeshGeom,
    assoc: &mut AtomVertexAssoc,
) {
    for (i, atom) in structure.atoms.iter().enumerate() {
        let start = sphere.add_transformed(geom, atom.pos, radius, UNCOLORED);
        assoc.add_assoc(i, start, start + sphere.num_vertices());
    }
}
