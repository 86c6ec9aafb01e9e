//! Interleaved vertex containers with lazy upload.
//!
//! [`LineGeom`] and [`MeshGeom`] own a flat `f32` vertex stream in a fixed
//! [`VertexLayout`] and, for meshes, a `u32` triangle index stream. Every
//! append marks the container dirty; [`GeomBuffer::bind`] pushes data to the
//! backend only when dirty. Recoloring goes through the attached
//! [`VertexAssoc`] and rewrites color fields in place.

mod line;
mod mesh;

use std::sync::Arc;

pub use line::LineGeom;
pub use mesh::MeshGeom;

use crate::assoc::{ColorTarget, VertexAssoc};
use crate::color::{ColorOp, ColorScope};
use crate::error::GeomError;
use crate::render::{BufferHandle, DrawContext, Primitive, RenderBackend};
use crate::structure::{Structure, StructureView};

const F32_BYTES: usize = size_of::<f32>();

/// Per-vertex float layout of an interleaved stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Floats per vertex.
    pub stride: usize,
    /// Float offset of the normal, if the layout carries one.
    pub normal_offset: Option<usize>,
    /// Float offset of the color.
    pub color_offset: usize,
}

impl VertexLayout {
    /// position(3) + color(3).
    pub const LINE: Self = Self {
        stride: 6,
        normal_offset: None,
        color_offset: 3,
    };

    /// position(3) + normal(3) + color(3).
    pub const MESH: Self = Self {
        stride: 9,
        normal_offset: Some(3),
        color_offset: 6,
    };

    /// Where recoloring writes.
    #[must_use]
    pub fn color_target(self) -> ColorTarget {
        ColorTarget {
            offset: self.color_offset,
            stride: self.stride,
        }
    }
}

#[derive(Debug, Clone)]
struct ColorBinding {
    structure: Arc<Structure>,
    assoc: VertexAssoc,
}

/// Interleaved storage shared by line and mesh geometry.
#[derive(Debug, Clone)]
pub struct GeomBuffer {
    label: &'static str,
    layout: VertexLayout,
    primitive: Primitive,
    vertices: Vec<f32>,
    indices: Vec<u32>,
    dirty: bool,
    handle: Option<BufferHandle>,
    binding: Option<ColorBinding>,
}

impl GeomBuffer {
    fn new(
        label: &'static str,
        layout: VertexLayout,
        primitive: Primitive,
    ) -> Self {
        Self {
            label,
            layout,
            primitive,
            vertices: Vec::new(),
            indices: Vec::new(),
            dirty: false,
            handle: None,
            binding: None,
        }
    }

    /// Reserve room for `vertices` more vertices and `indices` more indices.
    pub fn reserve(&mut self, vertices: usize, indices: usize) {
        self.vertices.reserve(vertices * self.layout.stride);
        self.indices.reserve(indices);
    }

    /// Vertex layout of this buffer.
    #[must_use]
    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    /// Current vertex count; the base index for the next append.
    #[must_use]
    pub fn num_verts(&self) -> u32 {
        (self.vertices.len() / self.layout.stride) as u32
    }

    /// The interleaved vertex stream.
    #[must_use]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// The triangle index stream (empty for lines).
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Whether the backend copy is stale.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Backend handle, once [`GeomBuffer::bind`] has run.
    #[must_use]
    pub fn handle(&self) -> Option<BufferHandle> {
        self.handle
    }

    /// Attach the association built alongside this geometry, replacing any
    /// previous one.
    pub fn set_association(
        &mut self,
        structure: Arc<Structure>,
        assoc: VertexAssoc,
    ) {
        self.binding = Some(ColorBinding { structure, assoc });
    }

    /// The attached association, if any.
    #[must_use]
    pub fn association(&self) -> Option<&VertexAssoc> {
        self.binding.as_ref().map(|b| &b.assoc)
    }

    /// Recolor with `op`, running its begin/end phase once.
    ///
    /// `view` defaults to the whole structure the association was built
    /// for. Without an association this does nothing.
    pub fn color_by(
        &mut self,
        op: &mut dyn ColorOp,
        view: Option<&StructureView<'_>>,
    ) {
        let Some(binding) = &self.binding else {
            return;
        };
        let structure = Arc::clone(&binding.structure);
        let scope = ColorScope::begin(op, &structure);
        match view {
            Some(view) => self.recolor_in(&scope, view),
            None => self.recolor_in(&scope, &StructureView::full(&structure)),
        }
    }

    /// Recolor inside a phase the caller already entered. Never calls
    /// `begin`/`end`.
    pub fn recolor_in(
        &mut self,
        scope: &ColorScope<'_>,
        view: &StructureView<'_>,
    ) {
        let Some(binding) = &self.binding else {
            return;
        };
        let owned = Arc::as_ptr(&binding.structure);
        if !std::ptr::eq(view.structure(), owned)
            || !std::ptr::eq(scope.structure(), owned)
        {
            log::warn!(
                "{}: recolor view belongs to a different structure",
                self.label
            );
            return;
        }
        let written = binding.assoc.recolor(
            scope,
            view,
            &mut self.vertices,
            self.layout.color_target(),
        );
        if written > 0 {
            self.dirty = true;
        }
    }

    /// Make this buffer current on `backend`, uploading only if dirty.
    pub fn bind(
        &mut self,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), GeomError> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = backend.create_buffer(self.label)?;
                self.handle = Some(handle);
                self.dirty = true;
                handle
            }
        };
        if self.dirty {
            log::trace!(
                "{}: uploading {} vertices, {} indices",
                self.label,
                self.num_verts(),
                self.indices.len()
            );
            backend.upload_vertices(handle, &self.vertices);
            if self.primitive == Primitive::Triangles {
                backend.upload_indices(handle, &self.indices);
            }
            self.dirty = false;
        }
        backend.bind_buffer(handle);
        Ok(())
    }

    /// Draw with the shader resolved from `ctx`. A pass without a shader
    /// draws nothing. Every attribute enabled here is disabled again before
    /// returning.
    pub fn draw(
        &mut self,
        backend: &mut dyn RenderBackend,
        ctx: &DrawContext<'_>,
    ) -> Result<(), GeomError> {
        let Some(shader) = ctx.shaders.shader(ctx.style, ctx.pass) else {
            return Ok(());
        };
        ctx.camera.bind(&shader, backend);
        self.bind(backend)?;

        let stride = (self.layout.stride * F32_BYTES) as u32;
        let mut enabled = Vec::with_capacity(3);
        backend.enable_attribute(shader.position, 3, stride, 0);
        enabled.push(shader.position);
        if let (Some(location), Some(offset)) =
            (shader.normal, self.layout.normal_offset)
        {
            backend.enable_attribute(
                location,
                3,
                stride,
                (offset * F32_BYTES) as u32,
            );
            enabled.push(location);
        }
        if let Some(location) = shader.color {
            backend.enable_attribute(
                location,
                3,
                stride,
                (self.layout.color_offset * F32_BYTES) as u32,
            );
            enabled.push(location);
        }

        match self.primitive {
            Primitive::Lines => {
                backend.draw_arrays(Primitive::Lines, self.num_verts());
            }
            Primitive::Triangles => backend
                .draw_indexed(Primitive::Triangles, self.indices.len() as u32),
        }

        for location in enabled {
            backend.disable_attribute(location);
        }
        Ok(())
    }

    fn push_vertex(
        &mut self,
        pos: [f32; 3],
        normal: Option<[f32; 3]>,
        color: [f32; 3],
    ) -> u32 {
        let index = self.num_verts();
        self.vertices.extend_from_slice(&pos);
        if let Some(normal) = normal {
            self.vertices.extend_from_slice(&normal);
        }
        self.vertices.extend_from_slice(&color);
        self.dirty = true;
        index
    }
}

/// Common surface of line and mesh geometry.
///
/// Everything forwards to the underlying [`GeomBuffer`]; aggregators hold
/// `Box<dyn Geometry>`.
pub trait Geometry {
    /// The underlying buffer.
    fn buffer(&self) -> &GeomBuffer;

    /// The underlying buffer, mutably.
    fn buffer_mut(&mut self) -> &mut GeomBuffer;

    /// Current vertex count.
    fn num_verts(&self) -> u32 {
        self.buffer().num_verts()
    }

    /// See [`GeomBuffer::color_by`].
    fn color_by(
        &mut self,
        op: &mut dyn ColorOp,
        view: Option<&StructureView<'_>>,
    ) {
        self.buffer_mut().color_by(op, view);
    }

    /// See [`GeomBuffer::set_association`].
    fn set_association(
        &mut self,
        structure: Arc<Structure>,
        assoc: VertexAssoc,
    ) {
        self.buffer_mut().set_association(structure, assoc);
    }

    /// See [`GeomBuffer::recolor_in`].
    fn recolor_in(
        &mut self,
        scope: &ColorScope<'_>,
        view: &StructureView<'_>,
    ) {
        self.buffer_mut().recolor_in(scope, view);
    }

    /// See [`GeomBuffer::bind`].
    fn bind(
        &mut self,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), GeomError> {
        self.buffer_mut().bind(backend)
    }

    /// See [`GeomBuffer::draw`].
    fn draw(
        &mut self,
        backend: &mut dyn RenderBackend,
        ctx: &DrawContext<'_>,
    ) -> Result<(), GeomError> {
        self.buffer_mut().draw(backend, ctx)
    }
}
