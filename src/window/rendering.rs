//! Rendering functionality.

use std::time::Instant;

use crate::context::Context;
use crate::event::WindowEvent;
use crate::renderer::RenderStats;
use crate::scene::Scene;

use super::Window;

impl Window {
    /// Renders one frame of `scene`, with the UI drawn by the last
    /// [`draw_ui`](Self::draw_ui) on top.
    ///
    /// Handles the pending events, advances the camera, records the draws of
    /// the frame into `stats` and presents.
    ///
    /// Returns `false` once the window should close.
    pub fn render(&mut self, scene: &mut Scene, stats: &mut RenderStats) -> bool {
        self.handle_events(scene.camera_mut());

        if self.should_close() {
            return false;
        }

        let now = Instant::now();
        self.frame_time = now.duration_since(self.curr_time).as_secs_f32();
        self.curr_time = now;

        let (w, h) = self.canvas.size();
        scene.handle_event(&WindowEvent::FramebufferSize(w, h));
        scene.update(self.frame_time);

        let frame = match self.canvas.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring.");
                self.canvas.reconfigure();
                return true;
            }
            Err(e) => {
                log::warn!("Failed to acquire surface texture: {}", e);
                return true;
            }
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let ctxt = Context::get();
        let mut encoder = ctxt.create_command_encoder(Some("instagrid_frame_encoder"));

        {
            let bg = self.background;
            let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: bg.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.canvas.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        stats.begin_frame();

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.canvas.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            scene.render(&mut pass, stats);
        }

        stats.end_frame();
        ctxt.submit(std::iter::once(encoder.finish()));

        self.egui_context
            .renderer
            .render(&frame_view, self.canvas.depth_view(), w, h);

        self.canvas.present(frame);

        !self.should_close()
    }
}
