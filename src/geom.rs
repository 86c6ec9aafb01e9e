//! Named aggregate of geometries built from one structure.

use std::sync::Arc;

use crate::buffer::Geometry;
use crate::color::{ColorOp, ColorScope};
use crate::error::GeomError;
use crate::render::{DrawContext, RenderBackend};
use crate::structure::{Structure, StructureView};

/// Owns several geometries (for example spheres plus a tube) under one
/// name and forwards draw and recolor calls to each.
pub struct MultiGeom {
    name: String,
    structure: Arc<Structure>,
    children: Vec<Box<dyn Geometry>>,
}

impl MultiGeom {
    /// Empty aggregate for geometry built from `structure`.
    #[must_use]
    pub fn new(name: impl Into<String>, structure: Arc<Structure>) -> Self {
        Self {
            name: name.into(),
            structure,
            children: Vec::new(),
        }
    }

    /// Add a child geometry.
    pub fn push(&mut self, geom: impl Geometry + 'static) {
        self.children.push(Box::new(geom));
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Box<dyn Geometry>] {
        &self.children
    }

    /// Recolor every child within a single operator phase, so `begin` and
    /// `end` run once regardless of the number of children.
    pub fn color_by(
        &mut self,
        op: &mut dyn ColorOp,
        view: Option<&StructureView<'_>>,
    ) {
        let structure = Arc::clone(&self.structure);
        let scope = ColorScope::begin(op, &structure);
        let full;
        let view = match view {
            Some(view) => view,
            None => {
                full = StructureView::full(&structure);
                &full
            }
        };
        for child in &mut self.children {
            child.recolor_in(&scope, view);
        }
    }

    /// Draw every child, stopping at the first backend error.
    pub fn draw(
        &mut self,
        backend: &mut dyn RenderBackend,
        ctx: &DrawContext<'_>,
    ) -> Result<(), GeomError> {
        for child in &mut self.children {
            child.draw(backend, ctx)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MultiGeom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiGeom")
            .field("name", &self.name)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GeomBuilder;
    use crate::color::test_util::Scripted;
    use crate::color::Uniform;
    use crate::options::GeometryOptions;
    use crate::render::test_util::{CountingCamera, RecordingBackend};
    use crate::render::{DrawPass, Shader, ShaderTable, ShadingStyle};
    use crate::structure::test_util::straight_chain;

    fn sample(structure: &Arc<Structure>) -> MultiGeom {
        let mut builder = GeomBuilder::new(GeometryOptions {
            sphere_stacks: 4,
            sphere_arcs: 6,
            ..GeometryOptions::default()
        });
        let mut op = Uniform([0.0; 3]);
        let mut multi = MultiGeom::new("protein", Arc::clone(structure));
        multi.push(builder.spheres(structure, &mut op).unwrap());
        multi.push(builder.line_trace(structure, &mut op));
        multi
    }

    #[test]
    fn one_phase_for_all_children() {
        let s = Arc::new(straight_chain(3));
        let mut multi = sample(&s);
        assert_eq!(multi.len(), 2);

        let mut op = Scripted::new(vec![[1.0, 0.5, 0.0]]);
        multi.color_by(&mut op, None);
        assert_eq!((op.begins, op.ends), (1, 1));
        for child in multi.children() {
            let layout = child.buffer().layout();
            let first = &child.buffer().vertices()
                [layout.color_offset..layout.color_offset + 3];
            assert_eq!(first, &[1.0, 0.5, 0.0]);
        }
    }

    #[test]
    fn draw_reaches_every_child() {
        let s = Arc::new(straight_chain(2));
        let mut multi = sample(&s);
        let shader = Shader {
            id: 1,
            position: 0,
            normal: Some(1),
            color: Some(2),
        };
        let shaders = ShaderTable::new().with(
            ShadingStyle::Phong,
            DrawPass::Color,
            shader,
        );
        let camera = CountingCamera::default();
        let ctx = DrawContext {
            camera: &camera,
            shaders: &shaders,
            style: ShadingStyle::Phong,
            pass: DrawPass::Color,
        };
        let mut backend = RecordingBackend::default();
        multi.draw(&mut backend, &ctx).unwrap();
        assert_eq!(backend.draws.len(), 2);
        assert_eq!(backend.created, 2);
        assert_eq!(camera.binds.get(), 2);
    }
}
