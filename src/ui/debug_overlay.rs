//! Renderer statistics drawn at the bottom of the window.

use crate::renderer::FrameStats;
use crate::ui::{Portal, PortalHosts};

/// Id of the host layer of the overlay.
pub const DEBUG_HOST_ID: &str = "debug";

/// Weight of the newest sample in the frame rate moving average.
const FPS_SMOOTHING: f32 = 0.1;

/// One line of text describing `stats`.
pub fn stats_text(stats: &FrameStats) -> String {
    format!(
        "Draw Calls: {} Lines: {} Points: {} Triangles: {} Frame: {}",
        stats.calls, stats.lines, stats.points, stats.triangles, stats.frame
    )
}

/// Overlay panel showing the statistics of the last rendered frame.
///
/// It is redrawn every frame through a [`Portal`] so it stays on top of
/// the scene and of the control panel.
#[derive(Debug)]
pub struct DebugOverlay {
    portal: Portal,
    fps: Option<f32>,
}

impl DebugOverlay {
    pub fn new(hosts: &PortalHosts) -> DebugOverlay {
        DebugOverlay {
            portal: Portal::new(hosts, DEBUG_HOST_ID)
                .with_anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(0.0, 0.0)),
            fps: None,
        }
    }

    /// Smoothed frames per second, if at least one frame was timed.
    pub fn fps(&self) -> Option<f32> {
        self.fps
    }

    /// Accounts for a frame that took `dt` seconds.
    pub fn record_frame_time(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        let sample = 1.0 / dt;
        self.fps = Some(match self.fps {
            Some(fps) => fps + (sample - fps) * FPS_SMOOTHING,
            None => sample,
        });
    }

    /// Draws the overlay for `stats`.
    pub fn show(&mut self, ctx: &egui::Context, stats: &FrameStats) {
        let text = stats_text(stats);
        let fps = self.fps;
        let width = ctx.content_rect().width();

        self.portal.show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::WHITE)
                .inner_margin(egui::Margin::symmetric(8, 4))
                .show(ui, |ui| {
                    ui.set_min_width((width - 16.0).max(0.0));
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(text)
                                .monospace()
                                .color(egui::Color32::BLACK),
                        );

                        if let Some(fps) = fps {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(
                                    egui::RichText::new(format!("{:.0} FPS", fps))
                                        .monospace()
                                        .color(egui::Color32::DARK_GREEN),
                                );
                            });
                        }
                    });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_every_counter() {
        let stats = FrameStats {
            calls: 101,
            triangles: 1200,
            lines: 22,
            points: 0,
            frame: 7,
        };

        assert_eq!(
            stats_text(&stats),
            "Draw Calls: 101 Lines: 22 Points: 0 Triangles: 1200 Frame: 7"
        );
    }

    #[test]
    fn fps_is_smoothed() {
        let mut overlay = DebugOverlay::new(&PortalHosts::new());
        assert_eq!(overlay.fps(), None);

        overlay.record_frame_time(0.0);
        assert_eq!(overlay.fps(), None);

        overlay.record_frame_time(1.0 / 50.0);
        assert!((overlay.fps().unwrap() - 50.0).abs() < 1.0e-3);

        overlay.record_frame_time(1.0 / 100.0);
        let fps = overlay.fps().unwrap();
        assert!(fps > 50.0 && fps < 100.0);
    }

    #[test]
    fn overlay_owns_the_debug_host() {
        let hosts = PortalHosts::new();
        let mut overlay = DebugOverlay::new(&hosts);
        let ctx = egui::Context::default();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            overlay.show(ctx, &FrameStats::default());
        });
        assert!(hosts.contains(DEBUG_HOST_ID));

        drop(overlay);
        assert!(!hosts.contains(DEBUG_HOST_ID));
    }
}
