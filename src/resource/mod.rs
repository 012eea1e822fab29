//! GPU resources.

pub use crate::resource::dynamic_buffer::{aligned_stride, DynamicUniformBuffer, UniformPacker};
pub use crate::resource::gpu_vector::{BufferType, GPUVec};
pub use crate::resource::instance_buffer::{
    hidden_transform, InstanceBuffer, InstanceData, InstanceSlots, SlotsUpdate,
};
pub use crate::resource::mesh3d::{
    GpuMesh3d, IndexedMesh, MeshVertex, VertexIndex, VERTEX_INDEX_FORMAT,
};

mod dynamic_buffer;
mod gpu_vector;
mod instance_buffer;
mod mesh3d;
