//! Egui integration for the overlay and the control panel.

use egui::RawInput;

use crate::event::{Action, Key, Modifiers, MouseButton, WindowEvent};
use crate::renderer::EguiRenderer;

use super::Window;

pub(crate) struct EguiContext {
    pub(crate) renderer: EguiRenderer,
    pub(crate) raw_input: RawInput,
    pub(crate) start_time: std::time::Instant,
}

impl EguiContext {
    pub(crate) fn new() -> Self {
        Self {
            renderer: EguiRenderer::new(),
            raw_input: RawInput::default(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// The egui pointer button matching a window mouse button.
pub fn egui_pointer_button(button: MouseButton) -> Option<egui::PointerButton> {
    match button {
        MouseButton::Button1 => Some(egui::PointerButton::Primary),
        MouseButton::Button2 => Some(egui::PointerButton::Secondary),
        MouseButton::Button3 => Some(egui::PointerButton::Middle),
        MouseButton::Button4 => None,
    }
}

/// The egui modifiers matching window modifiers.
pub fn egui_modifiers(modifiers: Modifiers) -> egui::Modifiers {
    egui::Modifiers {
        alt: modifiers.contains(Modifiers::Alt),
        ctrl: modifiers.contains(Modifiers::Control),
        shift: modifiers.contains(Modifiers::Shift),
        mac_cmd: false,
        command: modifiers.contains(Modifiers::Control),
    }
}

/// The egui key matching a window key.
pub fn egui_key(key: Key) -> Option<egui::Key> {
    Some(match key {
        Key::Escape => egui::Key::Escape,
        Key::Tab => egui::Key::Tab,
        Key::Back => egui::Key::Backspace,
        Key::Return => egui::Key::Enter,
        Key::Space => egui::Key::Space,
        Key::Delete => egui::Key::Delete,
        Key::Home => egui::Key::Home,
        Key::End => egui::Key::End,
        Key::Left => egui::Key::ArrowLeft,
        Key::Up => egui::Key::ArrowUp,
        Key::Right => egui::Key::ArrowRight,
        Key::Down => egui::Key::ArrowDown,
        _ => return None,
    })
}

/// Converts a window event, in physical pixels, to the egui events it produces.
///
/// `cursor_pos` is the last known cursor position, needed by button events.
pub fn egui_events(
    event: &WindowEvent,
    cursor_pos: Option<(f64, f64)>,
    scale_factor: f32,
) -> Vec<egui::Event> {
    let to_logical =
        |(x, y): (f64, f64)| egui::Pos2::new(x as f32 / scale_factor, y as f32 / scale_factor);

    match *event {
        WindowEvent::CursorPos(x, y, _) => vec![egui::Event::PointerMoved(to_logical((x, y)))],
        WindowEvent::MouseButton(button, action, modifiers) => {
            match (egui_pointer_button(button), cursor_pos) {
                (Some(button), Some(pos)) => vec![egui::Event::PointerButton {
                    pos: to_logical(pos),
                    button,
                    pressed: action == Action::Press,
                    modifiers: egui_modifiers(modifiers),
                }],
                _ => vec![],
            }
        }
        // Scroll values are already scaled to points by the canvas.
        WindowEvent::Scroll(x, y, modifiers) => vec![egui::Event::MouseWheel {
            unit: egui::MouseWheelUnit::Point,
            delta: egui::Vec2::new(x as f32, y as f32),
            modifiers: egui_modifiers(modifiers),
        }],
        WindowEvent::Char(ch) if !ch.is_control() => vec![egui::Event::Text(ch.to_string())],
        WindowEvent::Key(key, action, modifiers) => egui_key(key)
            .map(|key| egui::Event::Key {
                key,
                physical_key: None,
                pressed: action == Action::Press,
                repeat: false,
                modifiers: egui_modifiers(modifiers),
            })
            .into_iter()
            .collect(),
        _ => vec![],
    }
}

impl Window {
    /// The egui context the UI is drawn with.
    pub fn egui_context(&self) -> &egui::Context {
        self.egui_context.renderer.context()
    }

    /// Checks if egui is currently capturing mouse input.
    ///
    /// Returns `true` if the mouse hovers or drags an egui widget, in which
    /// case the camera does not see the event.
    pub fn is_egui_capturing_mouse(&self) -> bool {
        self.egui_context.renderer.wants_pointer_input()
    }

    /// Checks if egui is currently capturing keyboard input.
    pub fn is_egui_capturing_keyboard(&self) -> bool {
        self.egui_context.renderer.wants_keyboard_input()
    }

    /// Feed a window event to egui for processing.
    pub(crate) fn feed_egui_event(&mut self, event: &WindowEvent) {
        let events = egui_events(event, self.cursor_pos(), self.scale_factor() as f32);
        self.egui_context.raw_input.events.extend(events);
    }

    /// Draws an immediate mode UI using egui.
    ///
    /// The UI is drawn on top of the 3D scene during the next frame.
    pub fn draw_ui<F>(&mut self, ui_fn: F)
    where
        F: FnOnce(&egui::Context),
    {
        let time = Some(self.egui_context.start_time.elapsed().as_secs_f64());
        let scale_factor = self.canvas.scale_factor() as f32;

        self.egui_context
            .renderer
            .context()
            .set_pixels_per_point(scale_factor);

        let mut raw_input = std::mem::take(&mut self.egui_context.raw_input);
        raw_input.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(
                self.width() as f32 / scale_factor,
                self.height() as f32 / scale_factor,
            ),
        ));
        raw_input.time = time;
        raw_input.predicted_dt = if self.frame_time > 0.0 {
            self.frame_time
        } else {
            1.0 / 60.0
        };

        self.egui_context.renderer.begin_frame(raw_input);
        ui_fn(self.egui_context.renderer.context());
        self.egui_context.renderer.end_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_converted_to_points() {
        let events = egui_events(&WindowEvent::CursorPos(200.0, 100.0, Modifiers::empty()), None, 2.0);
        assert_eq!(events, vec![egui::Event::PointerMoved(egui::pos2(100.0, 50.0))]);
    }

    #[test]
    fn button_needs_a_cursor_position() {
        let press = WindowEvent::MouseButton(MouseButton::LEFT, Action::Press, Modifiers::Shift);
        assert!(egui_events(&press, None, 1.0).is_empty());

        let events = egui_events(&press, Some((10.0, 20.0)), 1.0);
        assert_eq!(events.len(), 1);
        match &events[0] {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
            } => {
                assert_eq!(*pos, egui::pos2(10.0, 20.0));
                assert_eq!(*button, egui::PointerButton::Primary);
                assert!(*pressed);
                assert!(modifiers.shift);
            }
            other => panic!("unexpected event {:?}", other),
        }

        let extra = WindowEvent::MouseButton(MouseButton::Button4, Action::Press, Modifiers::empty());
        assert!(egui_events(&extra, Some((0.0, 0.0)), 1.0).is_empty());
    }

    #[test]
    fn text_and_keys() {
        assert_eq!(
            egui_events(&WindowEvent::Char('a'), None, 1.0),
            vec![egui::Event::Text("a".to_string())]
        );
        assert!(egui_events(&WindowEvent::Char('\u{8}'), None, 1.0).is_empty());
        assert!(egui_events(&WindowEvent::Key(Key::Unknown, Action::Press, Modifiers::empty()), None, 1.0).is_empty());
        assert_eq!(egui_key(Key::Back), Some(egui::Key::Backspace));
        assert!(egui_events(&WindowEvent::Close, None, 1.0).is_empty());
    }

    fn pointer_captured_at(x: f64, y: f64) -> bool {
        let ctx = egui::Context::default();
        let moved = WindowEvent::CursorPos(x, y, Modifiers::empty());

        for _ in 0..3 {
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::vec2(800.0, 600.0),
                )),
                events: egui_events(&moved, None, 1.0),
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                egui::Area::new(egui::Id::new("panel"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        ui.allocate_exact_size(egui::vec2(100.0, 100.0), egui::Sense::hover());
                    });
            });
        }

        ctx.wants_pointer_input()
    }

    #[test]
    fn pointer_over_the_ui_is_captured() {
        assert!(pointer_captured_at(50.0, 50.0));
        assert!(!pointer_captured_at(500.0, 500.0));
    }
}
