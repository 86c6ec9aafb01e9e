//! Growable GPU buffers.

/// A GPU buffer that grows when an upload exceeds its capacity.
///
/// Grows to twice the requested size (at least 1 KiB more than before) and
/// never shrinks. Growth replaces the underlying `wgpu::Buffer`, so callers
/// must not cache slices across writes.
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u64,
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Empty buffer with at least `initial_capacity` bytes.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: u64,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = aligned(initial_capacity.max(64));
        Self {
            buffer: allocate(device, label, capacity, usage),
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    /// Replace the buffer contents with `data`, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = bytes.len() as u64;

        let reallocated = needed > self.capacity;
        if reallocated {
            let new_capacity =
                aligned((needed * 2).max(self.capacity + 1024));
            self.buffer =
                allocate(device, &self.label, new_capacity, self.usage);
            self.capacity = new_capacity;
            log::trace!(
                "{}: grew to {} bytes",
                self.label,
                self.capacity
            );
        }

        if needed > 0 {
            // write_buffer requires a 4-byte multiple; f32/u32 data always is.
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = needed;
        reallocated
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last upload.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the last upload was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated bytes.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

fn allocate(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Round up to `wgpu::COPY_BUFFER_ALIGNMENT`.
fn aligned(size: u64) -> u64 {
    size.div_ceil(wgpu::COPY_BUFFER_ALIGNMENT) * wgpu::COPY_BUFFER_ALIGNMENT
}
