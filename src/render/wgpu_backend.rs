//! `wgpu` implementation of [`RenderBackend`].
//!
//! Uploads go straight to GPU buffers through the queue. Draw calls are
//! recorded as [`DrawCommand`]s together with the attribute layout that was
//! enabled at the time; the caller replays them into a render pass once it
//! has chosen pipelines, since pipeline state in `wgpu` is baked rather than
//! toggled per attribute.

use std::collections::BTreeMap;

use super::{BufferHandle, DynamicBuffer, Primitive, RenderBackend};
use crate::error::GeomError;

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 2 => Float32x3];

const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x3,
];

/// Vertex layout of a line buffer: position(3) + color(3), 24 bytes.
#[must_use]
pub fn line_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 6 * size_of::<f32>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_ATTRIBUTES,
    }
}

/// Vertex layout of a mesh buffer: position(3) + normal(3) + color(3),
/// 36 bytes.
#[must_use]
pub fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 9 * size_of::<f32>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRIBUTES,
    }
}

/// One recorded draw call.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    /// Buffer bound when the draw was issued.
    pub buffer: BufferHandle,
    /// Primitive topology.
    pub primitive: Primitive,
    /// Vertex or index count.
    pub count: u32,
    /// Whether `count` refers to indices.
    pub indexed: bool,
    /// Vertex stride in bytes.
    pub array_stride: wgpu::BufferAddress,
    /// Attributes enabled at draw time, sorted by location.
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl DrawCommand {
    /// Vertex buffer layout matching the enabled attributes, for pipeline
    /// creation.
    #[must_use]
    pub fn vertex_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    /// Primitive topology for pipeline creation.
    #[must_use]
    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        match self.primitive {
            Primitive::Lines => wgpu::PrimitiveTopology::LineList,
            Primitive::Triangles => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

struct GpuGeometry {
    vertices: DynamicBuffer,
    indices: DynamicBuffer,
}

/// Backend writing to `wgpu` buffers and recording draws for replay.
pub struct WgpuBackend<'d> {
    device: &'d wgpu::Device,
    queue: &'d wgpu::Queue,
    buffers: Vec<GpuGeometry>,
    bound: Option<BufferHandle>,
    enabled: BTreeMap<u32, wgpu::VertexAttribute>,
    stride: wgpu::BufferAddress,
    commands: Vec<DrawCommand>,
}

impl<'d> WgpuBackend<'d> {
    /// Backend over an existing device/queue pair.
    #[must_use]
    pub fn new(device: &'d wgpu::Device, queue: &'d wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            buffers: Vec::new(),
            bound: None,
            enabled: BTreeMap::new(),
            stride: 0,
            commands: Vec::new(),
        }
    }

    /// Draw calls recorded since the last [`WgpuBackend::take_commands`].
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded draw calls (typically once per frame).
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Replay recorded draws into `pass`.
    ///
    /// `pipeline_for` picks the pipeline for each command; commands without
    /// one are skipped.
    pub fn replay<'a>(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        pipeline_for: impl Fn(&DrawCommand) -> Option<&'a wgpu::RenderPipeline>,
    ) {
        for cmd in &self.commands {
            let Some(pipeline) = pipeline_for(cmd) else {
                continue;
            };
            let Some(gpu) = self.buffers.get(cmd.buffer.0 as usize) else {
                continue;
            };
            if cmd.count == 0 || gpu.vertices.is_empty() {
                continue;
            }
            pass.set_pipeline(pipeline);
            pass.set_vertex_buffer(
                0,
                gpu.vertices.buffer().slice(..gpu.vertices.len()),
            );
            if cmd.indexed {
                if gpu.indices.is_empty() {
                    continue;
                }
                pass.set_index_buffer(
                    gpu.indices.buffer().slice(..gpu.indices.len()),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..cmd.count, 0, 0..1);
            } else {
                pass.draw(0..cmd.count, 0..1);
            }
        }
    }

    /// GPU buffer sizes: `(handle, used_bytes, allocated_bytes)`.
    #[must_use]
    pub fn buffer_info(&self) -> Vec<(BufferHandle, u64, u64)> {
        self.buffers
            .iter()
            .enumerate()
            .map(|(i, g)| {
                (
                    BufferHandle(i as u32),
                    g.vertices.len() + g.indices.len(),
                    g.vertices.capacity() + g.indices.capacity(),
                )
            })
            .collect()
    }

    fn record(&mut self, primitive: Primitive, count: u32, indexed: bool) {
        let Some(buffer) = self.bound else {
            log::warn!("draw issued with no buffer bound");
            return;
        };
        self.commands.push(DrawCommand {
            buffer,
            primitive,
            count,
            indexed,
            array_stride: self.stride,
            attributes: self.enabled.values().copied().collect(),
        });
    }
}

impl RenderBackend for WgpuBackend<'_> {
    fn create_buffer(
        &mut self,
        label: &str,
    ) -> Result<BufferHandle, GeomError> {
        let id = u32::try_from(self.buffers.len()).map_err(|_| {
            GeomError::Backend(format!("{label}: buffer handle overflow"))
        })?;
        self.buffers.push(GpuGeometry {
            vertices: DynamicBuffer::new(
                self.device,
                &format!("{label} Vertex"),
                0,
                wgpu::BufferUsages::VERTEX,
            ),
            indices: DynamicBuffer::new(
                self.device,
                &format!("{label} Index"),
                0,
                wgpu::BufferUsages::INDEX,
            ),
        });
        Ok(BufferHandle(id))
    }

    fn upload_vertices(&mut self, buffer: BufferHandle, data: &[f32]) {
        if let Some(gpu) = self.buffers.get_mut(buffer.0 as usize) {
            let _ = gpu.vertices.write(self.device, self.queue, data);
        }
    }

    fn upload_indices(&mut self, buffer: BufferHandle, data: &[u32]) {
        if let Some(gpu) = self.buffers.get_mut(buffer.0 as usize) {
            let _ = gpu.indices.write(self.device, self.queue, data);
        }
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
        let format = match components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            4 => wgpu::VertexFormat::Float32x4,
            n => {
                log::warn!("unsupported attribute width {n} at {location}");
                return;
            }
        };
        self.stride = wgpu::BufferAddress::from(stride_bytes);
        let _ = self.enabled.insert(
            location,
            wgpu::VertexAttribute {
                format,
                offset: wgpu::BufferAddress::from(offset_bytes),
                shader_location: location,
            },
        );
    }

    fn disable_attribute(&mut self, location: u32) {
        let _ = self.enabled.remove(&location);
    }

    fn draw_arrays(&mut self, primitive: Primitive, count: u32) {
        self.record(primitive, count, false);
    }

    fn draw_indexed(&mut self, primitive: Primitive, count: u32) {
        self.record(primitive, count, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_layouts_match_interleaved_strides() {
        let line = line_vertex_layout();
        assert_eq!(line.array_stride, 24);
        assert_eq!(line.attributes[1].offset, 12);
        assert_eq!(line.attributes[1].shader_location, 2);

        let mesh = mesh_vertex_layout();
        assert_eq!(mesh.array_stride, 36);
        assert_eq!(mesh.attributes[1].offset, 12);
        assert_eq!(mesh.attributes[2].offset, 24);
    }

    #[test]
    fn command_topology_follows_primitive() {
        let cmd = DrawCommand {
            buffer: BufferHandle(0),
            primitive: Primitive::Lines,
            count: 2,
            indexed: false,
            array_stride: 24,
            attributes: LINE_ATTRIBUTES.to_vec(),
        };
        assert_eq!(cmd.topology(), wgpu::PrimitiveTopology::LineList);
        assert_eq!(cmd.vertex_layout().attributes.len(), 2);
    }
}
