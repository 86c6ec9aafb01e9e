//! Rendering backend seam.
//!
//! Geometry containers talk to the GPU only through [`RenderBackend`]:
//! create a buffer, upload floats/indices, toggle vertex attributes, issue
//! a draw. Shader selection and camera uniforms are supplied by the caller
//! through [`ShaderLookup`] and [`Camera`]. [`WgpuBackend`] is the `wgpu`
//! implementation.

mod dynamic_buffer;
mod wgpu_backend;

pub use dynamic_buffer::DynamicBuffer;
use rustc_hash::FxHashMap;
pub use wgpu_backend::{
    line_vertex_layout, mesh_vertex_layout, DrawCommand, WgpuBackend,
};

use crate::error::GeomError;

/// Opaque backend buffer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Primitive topology of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent line segments (vertex pairs).
    Lines,
    /// Independent triangles (index triples).
    Triangles,
}

/// GPU command surface used by geometry containers.
pub trait RenderBackend {
    /// Allocate a new buffer pair (vertex + index storage).
    fn create_buffer(&mut self, label: &str) -> Result<BufferHandle, GeomError>;

    /// Replace the vertex contents of `buffer`.
    fn upload_vertices(&mut self, buffer: BufferHandle, data: &[f32]);

    /// Replace the index contents of `buffer`.
    fn upload_indices(&mut self, buffer: BufferHandle, data: &[u32]);

    /// Make `buffer` the source of subsequent attribute and draw calls.
    fn bind_buffer(&mut self, buffer: BufferHandle);

    /// Enable a float vertex attribute at `location`.
    fn enable_attribute(
        &mut self,
        location: u32,
        components: u32,
        stride_bytes: u32,
        offset_bytes: u32,
    );

    /// Disable the vertex attribute at `location`.
    fn disable_attribute(&mut self, location: u32);

    /// Draw `count` vertices of the bound buffer.
    fn draw_arrays(&mut self, primitive: Primitive, count: u32);

    /// Draw `count` indices of the bound buffer.
    fn draw_indexed(&mut self, primitive: Primitive, count: u32);
}

/// Shading model requested by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadingStyle {
    /// Per-pixel Phong lighting.
    Phong,
    /// Hemisphere lighting.
    Hemilight,
    /// Unlit vertex colors.
    Flat,
}

/// Render pass a draw belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawPass {
    /// Main color pass.
    Color,
    /// Silhouette outline pass.
    Outline,
    /// Selection highlight pass.
    Select,
    /// Object-id picking pass.
    Pick,
}

/// A resolved shader program and the attribute locations it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shader {
    /// Backend program identifier.
    pub id: u32,
    /// Location of the position attribute (always present).
    pub position: u32,
    /// Location of the normal attribute, if the program reads normals.
    pub normal: Option<u32>,
    /// Location of the color attribute, if the program reads colors.
    pub color: Option<u32>,
}

/// Maps `(style, pass)` to a shader, or `None` when the pass draws nothing
/// for this style.
pub trait ShaderLookup {
    /// Resolve the shader for a style/pass pair.
    fn shader(&self, style: ShadingStyle, pass: DrawPass) -> Option<Shader>;
}

/// Table-backed [`ShaderLookup`].
#[derive(Debug, Clone, Default)]
pub struct ShaderTable {
    entries: FxHashMap<(ShadingStyle, DrawPass), Shader>,
}

impl ShaderTable {
    /// Empty table: every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `shader` for a style/pass pair, replacing any previous one.
    pub fn insert(
        &mut self,
        style: ShadingStyle,
        pass: DrawPass,
        shader: Shader,
    ) {
        let _ = self.entries.insert((style, pass), shader);
    }

    /// Builder-style [`ShaderTable::insert`].
    #[must_use]
    pub fn with(
        mut self,
        style: ShadingStyle,
        pass: DrawPass,
        shader: Shader,
    ) -> Self {
        self.insert(style, pass, shader);
        self
    }
}

impl ShaderLookup for ShaderTable {
    fn shader(&self, style: ShadingStyle, pass: DrawPass) -> Option<Shader> {
        self.entries.get(&(style, pass)).copied()
    }
}

/// Supplies view/projection uniforms for a shader.
pub trait Camera {
    /// Bind this camera's transform uniforms to `shader`.
    fn bind(&self, shader: &Shader, backend: &mut dyn RenderBackend);
}

/// Everything a geometry needs to issue one draw, besides the backend.
#[derive(Clone, Copy)]
pub struct DrawContext<'a> {
    /// Camera whose uniforms are bound before drawing.
    pub camera: &'a dyn Camera,
    /// Shader resolver.
    pub shaders: &'a dyn ShaderLookup,
    /// Requested shading style.
    pub style: ShadingStyle,
    /// Pass being rendered.
    pub pass: DrawPass,
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::cell::Cell;

    use rustc_hash::FxHashSet;

    use super::{BufferHandle, Camera, Primitive, RenderBackend, Shader};
    use crate::error::GeomError;

    /// Backend double that records every call.
    #[derive(Default)]
    pub(crate) struct RecordingBackend {
        pub created: u32,
        pub vertex_uploads: usize,
        pub index_uploads: usize,
        pub last_vertices: Vec<f32>,
        pub last_indices: Vec<u32>,
        pub bound: Option<BufferHandle>,
        pub enabled: FxHashSet<u32>,
        pub enable_calls: Vec<(u32, u32, u32, u32)>,
        pub draws: Vec<(Primitive, u32, bool)>,
    }

    impl RenderBackend for RecordingBackend {
        fn create_buffer(
            &mut self,
            _label: &str,
        ) -> Result<BufferHandle, GeomError> {
            self.created += 1;
            Ok(BufferHandle(self.created))
        }

        fn upload_vertices(&mut self, _buffer: BufferHandle, data: &[f32]) {
            self.vertex_uploads += 1;
            self.last_vertices = data.to_vec();
        }

        fn upload_indices(&mut self, _buffer: BufferHandle, data: &[u32]) {
            self.index_uploads += 1;
            self.last_indices = data.to_vec();
        }

        fn bind_buffer(&mut self, buffer: BufferHandle) {
            self.bound = Some(buffer);
        }

        fn enable_attribute(
            &mut self,
            location: u32,
            components: u32,
            stride_bytes: u32,
            offset_bytes: u32,
        ) {
            let _ = self.enabled.insert(location);
            self.enable_calls
                .push((location, components, stride_bytes, offset_bytes));
        }

        fn disable_attribute(&mut self, location: u32) {
            let _ = self.enabled.remove(&location);
        }

        fn draw_arrays(&mut self, primitive: Primitive, count: u32) {
            self.draws.push((primitive, count, false));
        }

        fn draw_indexed(&mut self, primitive: Primitive, count: u32) {
            self.draws.push((primitive, count, true));
        }
    }

    /// Camera that counts how often it was bound.
    #[derive(Default)]
    pub(crate) struct CountingCamera {
        pub binds: Cell<usize>,
    }

    impl Camera for CountingCamera {
        fn bind(&self, _shader: &Shader, _backend: &mut dyn RenderBackend) {
            self.binds.set(self.binds.get() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIT: Shader = Shader {
        id: 1,
        position: 0,
        normal: Some(1),
        color: Some(2),
    };

    #[test]
    fn shader_table_misses_unregistered_pairs() {
        let table =
            ShaderTable::new().with(ShadingStyle::Phong, DrawPass::Color, LIT);
        assert_eq!(
            table.shader(ShadingStyle::Phong, DrawPass::Color),
            Some(LIT)
        );
        assert_eq!(table.shader(ShadingStyle::Phong, DrawPass::Pick), None);
        assert_eq!(table.shader(ShadingStyle::Flat, DrawPass::Color), None);
    }
}
