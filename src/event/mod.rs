//! Window events consumed by the cameras and the UI.

pub use self::window_event::{Action, Key, Modifiers, MouseButton, WindowEvent};

mod window_event;
