//! Data structure of a mesh stored on the GPU.

use crate::procedural::RenderMesh;
use crate::resource::gpu_vector::{BufferType, GPUVec};
use std::mem;

/// The type used for vertex indices.
pub type VertexIndex = u32;
/// The wgpu IndexFormat for the vertex index type.
pub const VERTEX_INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

/// Interleaved vertex attributes of a [`GpuMesh3d`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout: position at location 0, normal at location 1.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A mesh drawn with indexed triangles.
pub trait IndexedMesh {
    /// Number of indices one draw of the mesh covers.
    fn num_indices(&self) -> u32;
}

/// A 3D mesh stored on the GPU.
///
/// Built once from a [`RenderMesh`] and shared (behind an `Rc`) by every object
/// drawing it.
pub struct GpuMesh3d {
    vertices: GPUVec<MeshVertex>,
    indices: GPUVec<VertexIndex>,
}

impl GpuMesh3d {
    /// Interleaves the vertex data of `mesh`, computing normals if it has none.
    pub fn vertices_of(mesh: &RenderMesh) -> Vec<MeshVertex> {
        let computed;
        let normals = match mesh.normals {
            Some(ref ns) => ns,
            None => {
                let mut ns = Vec::new();
                crate::procedural::utils::compute_normals(&mesh.coords, &mesh.indices, &mut ns);
                computed = ns;
                &computed
            }
        };

        mesh.coords
            .iter()
            .zip(normals.iter())
            .map(|(p, n)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }

    /// Uploads `mesh` to the GPU.
    pub fn from_render_mesh(mesh: &RenderMesh) -> GpuMesh3d {
        let mut vertices = GPUVec::new(
            Self::vertices_of(mesh),
            BufferType::Array,
            "mesh vertex buffer",
        );
        let mut indices = GPUVec::new(
            mesh.flat_indices(),
            BufferType::ElementArray,
            "mesh index buffer",
        );

        vertices.load_to_gpu();
        indices.load_to_gpu();

        GpuMesh3d { vertices, indices }
    }

    /// The vertex buffer, `None` if the mesh is empty.
    #[inline]
    pub fn vertex_buffer(&self) -> Option<&wgpu::Buffer> {
        self.vertices.buffer()
    }

    /// The index buffer, `None` if the mesh is empty.
    #[inline]
    pub fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.indices.buffer()
    }

    /// Number of indices to draw.
    #[inline]
    pub fn num_indices(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Number of triangles of the mesh.
    #[inline]
    pub fn num_triangles(&self) -> u32 {
        self.num_indices() / 3
    }

    /// Binds the vertex and index buffers of this mesh.
    ///
    /// Returns `false`, binding nothing, if the mesh is empty.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        match (self.vertex_buffer(), self.index_buffer()) {
            (Some(vertices), Some(indices)) => {
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_index_buffer(indices.slice(..), VERTEX_INDEX_FORMAT);
                true
            }
            _ => false,
        }
    }
}

impl IndexedMesh for GpuMesh3d {
    #[inline]
    fn num_indices(&self) -> u32 {
        GpuMesh3d::num_indices(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedural;
    use glamx::Vec3;

    #[test]
    fn vertices_are_interleaved() {
        let mesh = procedural::unit_cuboid();
        let vertices = GpuMesh3d::vertices_of(&mesh);

        assert_eq!(vertices.len(), 24);
        assert_eq!(vertices[0].normal, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[0].position[0], 0.5);
    }

    #[test]
    fn missing_normals_are_computed() {
        let mesh = RenderMesh::new(
            vec![
                Vec3::ZERO,
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            None,
            None,
        );
        let vertices = GpuMesh3d::vertices_of(&mesh);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }
}
