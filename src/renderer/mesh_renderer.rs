//! Lit mesh rendering, one draw per object or one instanced draw.

use crate::color::Color;
use crate::context::Context;
use crate::light::{GpuLights, LightCollection};
use crate::renderer::{IndexedDraw, RenderStats};
use crate::resource::{DynamicUniformBuffer, GpuMesh3d, InstanceBuffer, InstanceData, MeshVertex};
use bytemuck::{Pod, Zeroable};
use glamx::Mat4;
use std::mem;

/// Frame-level uniforms (camera, model color, lights).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
    lights: GpuLights,
}

/// Object-level uniforms of the per-object path.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
}

/// Draws a [`GpuMesh3d`] with ambient and directional lighting.
///
/// [`prepare`](Self::prepare) must be called once per frame before any draw.
pub struct MeshRenderer {
    object_pipeline: wgpu::RenderPipeline,
    instanced_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    object_bind_group: wgpu::BindGroup,
    object_uniforms: DynamicUniformBuffer<ObjectUniforms>,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshRenderer {
    /// Creates the pipelines of both rendering paths.
    pub fn new() -> MeshRenderer {
        let ctxt = Context::get();

        let frame_bind_group_layout =
            ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("mesh_frame_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            mem::size_of::<FrameUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let object_bind_group_layout =
            ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("mesh_object_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            mem::size_of::<ObjectUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let shader =
            ctxt.create_shader_module(Some("mesh_shader"), include_str!("../builtin/mesh.wgsl"));

        let object_layout = ctxt.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_object_pipeline_layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });
        let instanced_layout = ctxt.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_instanced_pipeline_layout"),
            bind_group_layouts: &[&frame_bind_group_layout],
            push_constant_ranges: &[],
        });

        let object_pipeline = Self::create_pipeline(
            "mesh_object_pipeline",
            &object_layout,
            &shader,
            "vs_object",
            &[MeshVertex::layout()],
        );
        let instanced_pipeline = Self::create_pipeline(
            "mesh_instanced_pipeline",
            &instanced_layout,
            &shader,
            "vs_instanced",
            &[MeshVertex::layout(), InstanceData::layout()],
        );

        let frame_buffer = ctxt.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh_frame_uniform_buffer"),
            size: mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_frame_bind_group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let object_uniforms = DynamicUniformBuffer::new("mesh_object_uniform_buffer");
        let object_bind_group =
            Self::create_object_bind_group(&object_bind_group_layout, &object_uniforms);

        MeshRenderer {
            object_pipeline,
            instanced_pipeline,
            frame_buffer,
            frame_bind_group,
            object_bind_group_layout,
            object_bind_group,
            object_uniforms,
        }
    }

    fn create_pipeline(
        label: &str,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        vertex_entry: &str,
        buffers: &[wgpu::VertexBufferLayout],
    ) -> wgpu::RenderPipeline {
        let ctxt = Context::get();

        ctxt.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(vertex_entry),
                buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctxt.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Context::depth_format(),
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_object_bind_group(
        layout: &wgpu::BindGroupLayout,
        uniforms: &DynamicUniformBuffer<ObjectUniforms>,
    ) -> wgpu::BindGroup {
        Context::get().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.binding(),
            }],
        })
    }

    /// Uploads the camera, model color and lights of this frame.
    pub fn prepare(&mut self, view_proj: Mat4, color: Color, lights: &LightCollection) {
        let uniforms = FrameUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            color: [color.r, color.g, color.b, color.a],
            lights: lights.to_gpu(),
        };

        Context::get().write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Issues one draw per `(mesh, transform, draw)` triple.
    ///
    /// Each object binds its mesh and selects its uniforms before drawing,
    /// the way a scene graph with independent nodes would.
    pub fn draw_objects<'a>(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        objects: impl IntoIterator<Item = (&'a GpuMesh3d, &'a Mat4, IndexedDraw)>,
        stats: &mut RenderStats,
    ) {
        self.object_uniforms.clear();
        let draws: Vec<(&GpuMesh3d, u32, IndexedDraw)> = objects
            .into_iter()
            .map(|(mesh, m, draw)| {
                let offset = self.object_uniforms.push(&ObjectUniforms {
                    model: m.to_cols_array_2d(),
                });
                (mesh, offset, draw)
            })
            .collect();

        if draws.is_empty() {
            return;
        }

        if self.object_uniforms.flush() {
            self.object_bind_group = Self::create_object_bind_group(
                &self.object_bind_group_layout,
                &self.object_uniforms,
            );
        }

        pass.set_pipeline(&self.object_pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (mesh, offset, draw) in draws {
            if !mesh.bind(pass) {
                continue;
            }

            pass.set_bind_group(1, &self.object_bind_group, &[offset]);
            pass.draw_indexed(0..draw.index_count, 0, 0..draw.instances);
            stats.record_draw(draw);
        }
    }

    /// Issues `draw`, a single instanced draw covering the slots of `instances`.
    pub fn draw_instanced(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        mesh: &GpuMesh3d,
        instances: &mut InstanceBuffer,
        draw: IndexedDraw,
        stats: &mut RenderStats,
    ) {
        let Some(instance_buffer) = instances.upload() else {
            return;
        };

        if !mesh.bind(pass) {
            return;
        }

        pass.set_pipeline(&self.instanced_pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_vertex_buffer(1, instance_buffer.slice(..));
        pass.draw_indexed(0..draw.index_count, 0, 0..draw.instances);
        stats.record_draw(draw);
    }
}
