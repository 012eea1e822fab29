//! Uniform buffer addressed through dynamic offsets.
//!
//! The naive renderer issues one draw call per object, each with its own model
//! transform. Rather than one buffer (and one `write_buffer`) per object, every
//! object's uniforms are packed into a single CPU-side byte array at aligned
//! strides, uploaded once per frame, and selected at draw time with a dynamic
//! bind group offset.

use crate::context::Context;
use bytemuck::Pod;
use std::marker::PhantomData;
use std::mem;

/// Rounds `size` up to the next multiple of `alignment`.
#[inline]
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// CPU-side packing of uniform entries at an aligned stride.
#[derive(Clone, Debug)]
pub struct UniformPacker<T: Pod> {
    data: Vec<u8>,
    stride: u64,
    count: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformPacker<T> {
    /// Creates an empty packer whose entries start at multiples of `alignment`.
    pub fn new(alignment: u64) -> Self {
        Self {
            data: Vec::new(),
            stride: aligned_stride(mem::size_of::<T>() as u64, alignment.max(1)),
            count: 0,
            _marker: PhantomData,
        }
    }

    /// Distance in bytes between two consecutive entries.
    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of packed entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The packed bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Removes every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
        self.count = 0;
    }

    /// Appends an entry and returns its byte offset.
    pub fn push(&mut self, value: &T) -> u32 {
        let offset = self.count as u64 * self.stride;
        let bytes = bytemuck::bytes_of(value);
        self.data.extend_from_slice(bytes);
        self.data
            .resize(self.data.len() + (self.stride as usize - bytes.len()), 0);
        self.count += 1;
        offset as u32
    }
}

/// A uniform buffer holding many `T` entries, bound with dynamic offsets.
///
/// ```ignore
/// uniforms.clear();
/// let offsets: Vec<u32> = objects.iter().map(|o| uniforms.push(&o.uniforms())).collect();
/// if uniforms.flush() {
///     // the buffer was reallocated, rebuild the bind group
/// }
/// for offset in offsets {
///     pass.set_bind_group(1, &bind_group, &[offset]);
///     pass.draw_indexed(..);
/// }
/// ```
pub struct DynamicUniformBuffer<T: Pod> {
    packer: UniformPacker<T>,
    buffer: wgpu::Buffer,
    capacity: u64,
    label: &'static str,
}

impl<T: Pod> DynamicUniformBuffer<T> {
    /// Creates a new dynamic uniform buffer with room for 256 entries.
    pub fn new(label: &'static str) -> Self {
        Self::with_capacity(label, 256)
    }

    /// Creates a new dynamic uniform buffer with room for `initial_capacity` entries.
    pub fn with_capacity(label: &'static str, initial_capacity: usize) -> Self {
        let ctxt = Context::get();
        let alignment = ctxt.device.limits().min_uniform_buffer_offset_alignment as u64;
        let packer = UniformPacker::new(alignment);
        let capacity = packer.stride() * initial_capacity.max(1) as u64;

        Self {
            buffer: Self::allocate(label, capacity),
            packer,
            capacity,
            label,
        }
    }

    fn allocate(label: &'static str, size: u64) -> wgpu::Buffer {
        Context::get().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Number of entries pushed since the last [`clear`](Self::clear).
    #[inline]
    pub fn len(&self) -> usize {
        self.packer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packer.is_empty()
    }

    /// Forgets the entries of the previous frame.
    pub fn clear(&mut self) {
        self.packer.clear();
    }

    /// Pushes an entry and returns the dynamic offset selecting it.
    ///
    /// [`flush`](Self::flush) must run before the offset is used for drawing.
    pub fn push(&mut self, value: &T) -> u32 {
        self.packer.push(value)
    }

    /// Uploads every pushed entry with a single write.
    ///
    /// Returns `true` if the buffer had to grow, in which case bind groups
    /// referencing it must be recreated.
    pub fn flush(&mut self) -> bool {
        if self.packer.is_empty() {
            return false;
        }

        let required = self.packer.bytes().len() as u64;
        let grew = required > self.capacity;

        if grew {
            let mut new_capacity = self.capacity.max(self.packer.stride());
            while new_capacity < required {
                new_capacity *= 2;
            }

            log::debug!(
                "Growing uniform buffer `{}` from {} to {} bytes.",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer = Self::allocate(self.label, new_capacity);
            self.capacity = new_capacity;
        }

        Context::get().write_buffer(&self.buffer, 0, self.packer.bytes());
        grew
    }

    /// Binding covering a single entry, for use with a dynamic offset.
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(mem::size_of::<T>() as u64),
        })
    }

    /// Returns a reference to the underlying GPU buffer.
    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
