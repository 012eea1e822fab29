//! The top-level demo: UI state wired into the scene and the control panel.

use crate::config::DemoConfig;
use crate::context::Context;
use crate::error::InstagridError;
use crate::loader::load_model_or_cuboid;
use crate::renderer::{FrameStats, RenderStats};
use crate::scene::{RenderMode, Scene};
use crate::ui::{Controls, DebugOverlay, PortalHosts};
use crate::window::{CanvasSetup, Window};

/// Title of the demo window.
pub const WINDOW_TITLE: &str = "instagrid";

/// UI state of the demo: the control panel values and the debug overlay.
pub struct App {
    controls: Controls,
    hosts: PortalHosts,
    overlay: DebugOverlay,
}

impl App {
    pub fn new(config: &DemoConfig) -> App {
        let hosts = PortalHosts::new();
        let overlay = DebugOverlay::new(&hosts);

        App {
            controls: Controls::new(config.mode, config.count, config.max_count),
            hosts,
            overlay,
        }
    }

    /// The rendering strategy selected in the control panel.
    pub fn mode(&self) -> RenderMode {
        self.controls.mode
    }

    /// The grid dimension selected in the control panel.
    pub fn count(&self) -> u32 {
        self.controls.count
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    /// Host layers currently attached to the UI.
    pub fn hosts(&self) -> &PortalHosts {
        &self.hosts
    }

    pub fn overlay(&self) -> &DebugOverlay {
        &self.overlay
    }

    /// Draws the control panel and the statistics of the last frame, which
    /// took `frame_time` seconds.
    ///
    /// Returns `true` if a control changed.
    pub fn ui(&mut self, ctx: &egui::Context, stats: &FrameStats, frame_time: f32) -> bool {
        self.overlay.record_frame_time(frame_time);
        let changed = self.controls.show(ctx);
        self.overlay.show(ctx, stats);

        if changed {
            log::debug!(
                "Controls changed: {} rendering of {} objects.",
                self.controls.mode,
                self.controls.num_objects()
            );
        }

        changed
    }

    /// Pushes the UI state to the scene.
    pub fn apply(&self, scene: &mut Scene) {
        scene.apply(self.controls.mode, self.controls.count);
    }
}

/// Opens the demo window and runs it until it is closed.
pub async fn run(config: DemoConfig) -> Result<(), InstagridError> {
    config.validate()?;

    let model = load_model_or_cuboid(&config.model_path);
    let mut window = Window::new(
        WINDOW_TITLE,
        config.width,
        config.height,
        CanvasSetup {
            vsync: config.vsync,
        },
    )
    .await?;

    let mut scene = Scene::new(&model, &config);
    let mut stats = RenderStats::new();
    let mut app = App::new(&config);

    log::info!(
        "Rendering a {}x{} grid in {} mode.",
        config.count,
        config.count,
        config.mode
    );

    while window.render(&mut scene, &mut stats) {
        let frame_time = window.frame_time();
        window.draw_ui(|ctx| {
            app.ui(ctx, stats.last_frame(), frame_time);
        });
        app.apply(&mut scene);
    }

    log::info!("Window closed after {} frames.", stats.frame());

    // GPU resources must be released before the context goes away.
    drop(scene);
    drop(window);
    Context::reset();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::DEBUG_HOST_ID;

    #[test]
    fn state_starts_from_the_configuration() {
        let config = DemoConfig {
            mode: RenderMode::Instanced,
            count: 42,
            ..DemoConfig::default()
        };
        let app = App::new(&config);

        assert_eq!(app.mode(), RenderMode::Instanced);
        assert_eq!(app.count(), 42);
        assert_eq!(app.controls().max_count, 500);
        assert!(app.hosts().is_empty());
    }

    #[test]
    fn ui_mounts_the_overlay_and_times_frames() {
        let mut app = App::new(&DemoConfig::default());
        let ctx = egui::Context::default();

        let mut changed = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changed = app.ui(ctx, &FrameStats::default(), 1.0 / 60.0);
        });

        assert!(!changed);
        assert!(app.hosts().contains(DEBUG_HOST_ID));
        assert!(app.overlay().fps().is_some());
    }

    #[test]
    fn controls_are_editable() {
        let mut app = App::new(&DemoConfig::default());
        app.controls_mut().mode = RenderMode::Instanced;
        app.controls_mut().count = 3;

        assert_eq!(app.mode(), RenderMode::Instanced);
        assert_eq!(app.count(), 3);
    }
}
