//! Procedural primitive templates.
//!
//! Each template is a unit shape precomputed once per tessellation level
//! and instanced many times with `add_transformed`, which appends scaled,
//! rotated and translated copies to a [`MeshGeom`](crate::buffer::MeshGeom)
//! with indices offset by the target's current vertex count. Templates are
//! immutable after construction; only the target buffer is written.

mod cylinder;
mod sphere;
mod tube_profile;

use std::sync::Arc;

pub use cylinder::ProtoCylinder;
use rustc_hash::FxHashMap;
pub use sphere::ProtoSphere;
pub use tube_profile::{ring_offset, TubeProfile};

use crate::error::GeomError;

/// Session-wide cache of templates keyed by tessellation level.
#[derive(Debug, Default)]
pub struct Templates {
    spheres: FxHashMap<(u32, u32), Arc<ProtoSphere>>,
    cylinders: FxHashMap<u32, Arc<ProtoCylinder>>,
    profiles: FxHashMap<(u32, u32), Arc<TubeProfile>>,
}

impl Templates {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sphere template for `(stacks, arcs)`, built on first request.
    pub fn sphere(
        &mut self,
        stacks: u32,
        arcs: u32,
    ) -> Result<Arc<ProtoSphere>, GeomError> {
        if let Some(sphere) = self.spheres.get(&(stacks, arcs)) {
            return Ok(Arc::clone(sphere));
        }
        let sphere = Arc::new(ProtoSphere::new(stacks, arcs)?);
        log::debug!("built sphere template {stacks}x{arcs}");
        let _ = self.spheres.insert((stacks, arcs), Arc::clone(&sphere));
        Ok(sphere)
    }

    /// Cylinder template for `arcs`, built on first request.
    pub fn cylinder(
        &mut self,
        arcs: u32,
    ) -> Result<Arc<ProtoCylinder>, GeomError> {
        if let Some(cylinder) = self.cylinders.get(&arcs) {
            return Ok(Arc::clone(cylinder));
        }
        let cylinder = Arc::new(ProtoCylinder::new(arcs)?);
        log::debug!("built cylinder template with {arcs} arcs");
        let _ = self.cylinders.insert(arcs, Arc::clone(&cylinder));
        Ok(cylinder)
    }

    /// Round tube profile with `samples` points per ring and the given
    /// smoothing `strength`, built on first request. Strengths are keyed by
    /// their bit pattern.
    pub fn profile(
        &mut self,
        samples: u32,
        strength: f32,
    ) -> Result<Arc<TubeProfile>, GeomError> {
        let key = (samples, strength.to_bits());
        if let Some(profile) = self.profiles.get(&key) {
            return Ok(Arc::clone(profile));
        }
        let profile =
            Arc::new(TubeProfile::round(samples as usize, strength)?);
        log::debug!(
            "built tube profile with {samples} samples, strength {strength}"
        );
        let _ = self.profiles.insert(key, Arc::clone(&profile));
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_built_once() {
        let mut templates = Templates::new();
        let a = templates.sphere(6, 8).unwrap();
        let b = templates.sphere(6, 8).unwrap();
        let c = templates.sphere(6, 10).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));

        let x = templates.cylinder(12).unwrap();
        let y = templates.cylinder(12).unwrap();
        assert!(Arc::ptr_eq(&x, &y));

        let p = templates.profile(12, 0.5).unwrap();
        let q = templates.profile(12, 0.5).unwrap();
        let r = templates.profile(12, 0.25).unwrap();
        assert!(Arc::ptr_eq(&p, &q));
        assert!(!Arc::ptr_eq(&p, &r));
        assert_eq!(templates.profiles.len(), 2);
    }

    #[test]
    fn invalid_levels_are_not_cached() {
        let mut templates = Templates::new();
        assert!(templates.cylinder(2).is_err());
        assert!(templates.cylinders.is_empty());
        assert!(templates.profile(2, 0.5).is_err());
        assert!(templates.profiles.is_empty());
    }
}
