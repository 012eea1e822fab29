//! Event handling functionality.

use crate::camera::Camera3d;
use crate::event::{Action, Key, WindowEvent};

use super::Window;

/// Whether `event` is forwarded to the camera, given what egui captures.
///
/// Releases always go through so that a drag ending over the UI does not
/// leave a button held down.
pub(crate) fn reaches_camera(event: &WindowEvent, egui_pointer: bool, egui_keyboard: bool) -> bool {
    match *event {
        WindowEvent::MouseButton(_, Action::Release, _) | WindowEvent::Key(_, Action::Release, _) => {
            true
        }
        _ if event.is_keyboard_event() => !egui_keyboard,
        _ if event.is_mouse_event() => !egui_pointer,
        _ => true,
    }
}

impl Window {
    /// Dispatches the events received since the last frame, then polls new ones.
    ///
    /// egui sees every event first. Events it captures do not reach the
    /// camera, except releases.
    pub(crate) fn handle_events(&mut self, camera: &mut dyn Camera3d) {
        for event in self.pending_events() {
            self.handle_event(camera, &event)
        }

        self.canvas.poll_events();
    }

    pub(crate) fn handle_event(&mut self, camera: &mut dyn Camera3d, event: &WindowEvent) {
        match *event {
            WindowEvent::Key(Key::Escape, Action::Release, _) | WindowEvent::Close => {
                self.close();
            }
            _ => {}
        }

        self.feed_egui_event(event);

        if reaches_camera(
            event,
            self.is_egui_capturing_mouse(),
            self.is_egui_capturing_keyboard(),
        ) {
            camera.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera3d;
    use crate::event::{Modifiers, MouseButton};
    use glamx::Vec3;

    fn route(camera: &mut OrbitCamera3d, event: WindowEvent, egui_pointer: bool) {
        if reaches_camera(&event, egui_pointer, false) {
            camera.handle_event(&event);
        }
    }

    #[test]
    fn ui_captures_presses_but_not_releases() {
        let m = Modifiers::empty();
        let press = WindowEvent::MouseButton(MouseButton::Button2, Action::Press, m);
        let release = WindowEvent::MouseButton(MouseButton::Button2, Action::Release, m);

        assert!(!reaches_camera(&press, true, false));
        assert!(reaches_camera(&release, true, false));
        assert!(!reaches_camera(&WindowEvent::CursorPos(1.0, 1.0, m), true, false));
        assert!(!reaches_camera(&WindowEvent::Scroll(0.0, 1.0, m), true, false));
        assert!(reaches_camera(&press, false, true));
        assert!(reaches_camera(&WindowEvent::FramebufferSize(8, 8), true, true));
    }

    #[test]
    fn drag_released_over_the_ui_ends() {
        let m = Modifiers::empty();
        let mut camera = OrbitCamera3d::new(Vec3::new(0.0, 10.0, 20.0), Vec3::ZERO);
        camera.handle_event(&WindowEvent::FramebufferSize(800, 600));

        route(&mut camera, WindowEvent::CursorPos(0.0, 0.0, m), false);
        route(
            &mut camera,
            WindowEvent::MouseButton(MouseButton::Button2, Action::Press, m),
            false,
        );
        // The cursor reaches the control panel, which then sees the release.
        route(&mut camera, WindowEvent::CursorPos(10.0, 0.0, m), false);
        route(
            &mut camera,
            WindowEvent::MouseButton(MouseButton::Button2, Action::Release, m),
            true,
        );

        let eye = camera.eye();
        route(&mut camera, WindowEvent::CursorPos(50.0, 0.0, m), false);
        assert!((camera.eye() - eye).length() < 1.0e-6);
    }
}
