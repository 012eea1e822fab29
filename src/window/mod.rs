//! The window, and things to handle the rendering loop and events.

mod egui_integration;
mod events;
mod rendering;
mod wgpu_canvas;
mod window;

pub use egui_integration::{egui_events, egui_key, egui_modifiers, egui_pointer_button};
pub use wgpu_canvas::{CanvasSetup, WgpuCanvas};
pub use window::Window;
