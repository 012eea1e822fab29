//! Control panel selecting the rendering strategy and the grid dimension.

use crate::scene::RenderMode;

/// `"{count}x{count}={count*count}"`, the number of objects drawn.
pub fn count_label(count: u32) -> String {
    format!("{}x{}={}", count, count, count as u64 * count as u64)
}

/// State edited by the control panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Controls {
    /// Rendering strategy.
    pub mode: RenderMode,
    /// Grid dimension.
    pub count: u32,
    /// Upper bound of the grid dimension slider.
    pub max_count: u32,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            mode: RenderMode::Naive,
            count: 10,
            max_count: 500,
        }
    }
}

impl Controls {
    pub fn new(mode: RenderMode, count: u32, max_count: u32) -> Controls {
        Controls {
            mode,
            count: count.min(max_count),
            max_count,
        }
    }

    /// Number of objects of the grid.
    pub fn num_objects(&self) -> u64 {
        self.count as u64 * self.count as u64
    }

    /// Draws the panel widgets into `ui`. Returns `true` if a value changed.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        egui::ComboBox::from_id_salt("render_mode")
            .selected_text(self.mode.label())
            .show_ui(ui, |ui| {
                for mode in RenderMode::ALL {
                    changed |= ui
                        .selectable_value(&mut self.mode, mode, mode.label())
                        .changed();
                }
            });

        changed |= ui
            .add(egui::Slider::new(&mut self.count, 0..=self.max_count))
            .changed();

        ui.label(count_label(self.count));

        changed
    }

    /// Draws the panel in the top-right corner of the window.
    pub fn show(&mut self, ctx: &egui::Context) -> bool {
        egui::Window::new("Controls")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| self.ui(ui))
            .and_then(|response| response.inner)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_shows_object_count() {
        assert_eq!(count_label(10), "10x10=100");
        assert_eq!(count_label(0), "0x0=0");
        assert_eq!(count_label(500), "500x500=250000");
    }

    #[test]
    fn defaults_match_the_demo() {
        let controls = Controls::default();
        assert_eq!(controls.mode, RenderMode::Naive);
        assert_eq!(controls.count, 10);
        assert_eq!(controls.max_count, 500);
        assert_eq!(controls.num_objects(), 100);
    }

    #[test]
    fn count_is_clamped_to_the_slider_range() {
        let controls = Controls::new(RenderMode::Instanced, 800, 500);
        assert_eq!(controls.count, 500);
    }

    #[test]
    fn showing_without_input_changes_nothing() {
        let ctx = egui::Context::default();
        let mut controls = Controls::default();
        let mut changed = true;

        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                changed = controls.show(ctx);
            });
        }

        assert!(!changed);
        assert_eq!(controls, Controls::default());
    }
}
