//! A renderer for unlit, one pixel wide line segments.

use crate::color::Color;
use crate::context::Context;
use crate::renderer::RenderStats;
use crate::resource::{BufferType, GPUVec};
use bytemuck::{Pod, Zeroable};
use glamx::{Mat4, Vec3};
use std::mem;

/// A colored line segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineSegment {
    /// First endpoint.
    pub a: Vec3,
    /// Second endpoint.
    pub b: Vec3,
    /// Color of the whole segment.
    pub color: Color,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ViewUniforms {
    view_proj: [[f32; 4]; 4],
}

/// Structure which manages the display of a persistent set of line segments.
///
/// Unlike immediate-mode line drawing, the segments are kept across frames
/// and only re-uploaded after [`set_segments`](Self::set_segments).
pub struct LineRenderer {
    pipeline: wgpu::RenderPipeline,
    view_uniform_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
    vertices: GPUVec<LineVertex>,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRenderer {
    /// Creates a new line renderer with no segment.
    pub fn new() -> LineRenderer {
        let ctxt = Context::get();

        let view_bind_group_layout =
            ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("line_view_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctxt.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line_pipeline_layout"),
            bind_group_layouts: &[&view_bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader =
            ctxt.create_shader_module(Some("line_shader"), include_str!("../builtin/grid.wgsl"));

        let vertex_buffer_layout = wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4],
        };

        let pipeline = ctxt.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_buffer_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctxt.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Context::depth_format(),
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let view_uniform_buffer = ctxt.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line_view_uniform_buffer"),
            size: mem::size_of::<ViewUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let view_bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("line_view_bind_group"),
            layout: &view_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_uniform_buffer.as_entire_binding(),
            }],
        });

        LineRenderer {
            pipeline,
            view_uniform_buffer,
            view_bind_group,
            vertices: GPUVec::new_empty(BufferType::Array, "line_vertex_buffer"),
        }
    }

    /// Replaces the segments drawn every frame.
    pub fn set_segments(&mut self, segments: &[LineSegment]) {
        let vertices = self.vertices.data_mut();
        vertices.clear();

        for s in segments {
            let color = [s.color.r, s.color.g, s.color.b, s.color.a];
            vertices.push(LineVertex {
                position: s.a.to_array(),
                color,
            });
            vertices.push(LineVertex {
                position: s.b.to_array(),
                color,
            });
        }
    }

    /// Number of segments drawn every frame.
    pub fn num_segments(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Draws every segment with a single draw call.
    pub fn render(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        view_proj: Mat4,
        stats: &mut RenderStats,
    ) {
        let num_vertices = self.vertices.len() as u32;
        if num_vertices == 0 {
            return;
        }

        self.vertices.load_to_gpu();
        let Some(buffer) = self.vertices.buffer() else {
            return;
        };

        let uniforms = ViewUniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        Context::get().write_buffer(&self.view_uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.view_bind_group, &[]);
        pass.set_vertex_buffer(0, buffer.slice(..));
        pass.draw(0..num_vertices, 0..1);
        stats.record_lines(num_vertices / 2);
    }
}
