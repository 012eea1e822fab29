//! Wrapper for a wgpu buffer object.

use crate::context::Context;
use bytemuck::Pod;

/// A vector of elements kept on the RAM and mirrored to a GPU buffer on demand.
///
/// Modifications go through [`data_mut`](Self::data_mut), which marks the
/// vector dirty. The next [`load_to_gpu`](Self::load_to_gpu) writes the data
/// into the existing buffer when it fits, and only reallocates a bigger one
/// when it does not.
pub struct GPUVec<T: Pod> {
    dirty: bool,
    usage: wgpu::BufferUsages,
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    data: Vec<T>,
}

impl<T: Pod> GPUVec<T> {
    /// Creates a new `GPUVec` that is not yet uploaded to the GPU.
    pub fn new(data: Vec<T>, buf_type: BufferType, label: &'static str) -> GPUVec<T> {
        GPUVec {
            dirty: true,
            usage: buf_type.to_wgpu(),
            label,
            buffer: None,
            data,
        }
    }

    /// Creates a new empty `GPUVec`.
    pub fn new_empty(buf_type: BufferType, label: &'static str) -> GPUVec<T> {
        GPUVec::new(Vec::new(), buf_type, label)
    }

    /// Is this vector empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The length of this vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Mutably accesses the vector.
    ///
    /// This method will mark this vector as `dirty`.
    #[inline]
    pub fn data_mut(&mut self) -> &mut Vec<T> {
        self.dirty = true;
        &mut self.data
    }

    /// Immutably accesses the vector.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns `true` if the cpu data and gpu data are out of sync.
    #[inline]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the wgpu buffer if it exists.
    #[inline]
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Number of elements the current GPU buffer can hold.
    #[inline]
    pub fn gpu_capacity(&self) -> usize {
        self.buffer
            .as_ref()
            .map(|b| b.size() as usize / std::mem::size_of::<T>())
            .unwrap_or(0)
    }

    /// Loads the vector from the RAM to the GPU.
    ///
    /// Returns `true` if a new buffer had to be allocated. Empty vectors are
    /// never uploaded.
    pub fn load_to_gpu(&mut self) -> bool {
        if !self.dirty || self.data.is_empty() {
            return false;
        }

        let ctxt = Context::get();
        let bytes = bytemuck::cast_slice(&self.data);
        self.dirty = false;

        match self.buffer {
            Some(ref buffer) if bytes.len() as u64 <= buffer.size() => {
                ctxt.write_buffer(buffer, 0, bytes);
                false
            }
            _ => {
                self.buffer = Some(ctxt.create_buffer_init(
                    Some(self.label),
                    bytes,
                    self.usage | wgpu::BufferUsages::COPY_DST,
                ));
                true
            }
        }
    }
}

/// Type of gpu buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferType {
    /// A vertex buffer, also used for per-instance data.
    Array,
    /// An index buffer.
    ElementArray,
}

impl BufferType {
    /// Converts to wgpu buffer usages.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::BufferUsages {
        match self {
            BufferType::Array => wgpu::BufferUsages::VERTEX,
            BufferType::ElementArray => wgpu::BufferUsages::INDEX,
        }
    }
}
