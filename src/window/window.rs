//! The demo window.

use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use crate::color::{Color, BLACK};
use crate::error::InstagridError;
use crate::event::{Action, Key, MouseButton, WindowEvent};
use crate::window::egui_integration::EguiContext;
use crate::window::wgpu_canvas::{CanvasSetup, WgpuCanvas};

/// Structure representing a window, its GPU surface and its egui context.
pub struct Window {
    events: Receiver<WindowEvent>,
    pub(crate) canvas: WgpuCanvas,
    pub(crate) egui_context: EguiContext,
    pub(crate) background: Color,
    pub(crate) curr_time: Instant,
    pub(crate) frame_time: f32,
    should_close: bool,
}

impl Window {
    /// Opens a window of `width x height` logical pixels.
    ///
    /// This initializes the global wgpu context.
    pub async fn new(
        title: &str,
        width: u32,
        height: u32,
        setup: CanvasSetup,
    ) -> Result<Window, InstagridError> {
        let (event_send, event_receive) = mpsc::channel();
        let canvas = WgpuCanvas::open(title, width, height, setup, event_send).await?;

        let (width, height) = canvas.size();
        log::info!(
            "Opened a {}x{} window, surface format {:?}.",
            width,
            height,
            canvas.surface_format()
        );

        Ok(Window {
            events: event_receive,
            canvas,
            egui_context: EguiContext::new(),
            background: BLACK,
            curr_time: Instant::now(),
            frame_time: 0.0,
            should_close: false,
        })
    }

    /// Indicates whether this window should be closed.
    #[inline]
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Closes the window at the end of the current frame.
    pub fn close(&mut self) {
        self.should_close = true;
    }

    /// The window width, in physical pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.canvas.size().0
    }

    /// The window height, in physical pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.canvas.size().1
    }

    /// The scale factor between logical and physical pixels.
    pub fn scale_factor(&self) -> f64 {
        self.canvas.scale_factor()
    }

    /// Duration of the last frame, in seconds.
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Sets the window title.
    pub fn set_title(&mut self, title: &str) {
        self.canvas.set_title(title);
    }

    /// The current state of a keyboard key.
    pub fn get_key(&self, key: Key) -> Action {
        self.canvas.get_key(key)
    }

    /// The current state of a mouse button.
    pub fn get_mouse_button(&self, button: MouseButton) -> Action {
        self.canvas.get_mouse_button(button)
    }

    /// The last known cursor position, in physical pixels.
    pub fn cursor_pos(&self) -> Option<(f64, f64)> {
        self.canvas.cursor_pos()
    }

    pub(crate) fn pending_events(&self) -> Vec<WindowEvent> {
        self.events.try_iter().collect()
    }
}
