//! The window event type and its components.

/// An event emitted by the window.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum WindowEvent {
    /// The window framebuffer was resized to the given physical size.
    FramebufferSize(u32, u32),
    /// The user asked to close the window.
    Close,
    /// The cursor moved to the given physical position.
    CursorPos(f64, f64, Modifiers),
    /// A mouse button changed state.
    MouseButton(MouseButton, Action, Modifiers),
    /// The mouse wheel scrolled.
    Scroll(f64, f64, Modifiers),
    /// A key changed state.
    Key(Key, Action, Modifiers),
    /// A character was typed.
    Char(char),
}

impl WindowEvent {
    /// Tests if this event is related to the keyboard.
    pub fn is_keyboard_event(&self) -> bool {
        matches!(self, WindowEvent::Key(..) | WindowEvent::Char(..))
    }

    /// Tests if this event is related to the mouse.
    pub fn is_mouse_event(&self) -> bool {
        matches!(
            self,
            WindowEvent::MouseButton(..) | WindowEvent::CursorPos(..) | WindowEvent::Scroll(..)
        )
    }
}

/// State of a key or mouse button.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    /// The key or button was released.
    Release,
    /// The key or button was pressed.
    Press,
}

/// Mouse buttons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseButton {
    /// Left button.
    Button1,
    /// Right button.
    Button2,
    /// Middle button.
    Button3,
    /// Any other button.
    Button4,
}

impl MouseButton {
    /// Number of distinct mouse buttons.
    pub const COUNT: usize = 4;

    /// The left mouse button.
    pub const LEFT: MouseButton = MouseButton::Button1;
    /// The right mouse button.
    pub const RIGHT: MouseButton = MouseButton::Button2;
    /// The middle mouse button.
    pub const MIDDLE: MouseButton = MouseButton::Button3;
}

/// Keyboard keys the demo reacts to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    Escape,
    Tab,
    Back,
    Return,
    Space,
    Delete,
    Home,
    End,
    Left,
    Up,
    Right,
    Down,
    LShift,
    RShift,
    LControl,
    RControl,
    LAlt,
    RAlt,
    Unknown,
}

impl Key {
    /// Number of distinct keys.
    pub const COUNT: usize = Key::Unknown as usize + 1;
}

bitflags! {
    #[doc = "Key modifiers"]
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct Modifiers: u32 {
        const Shift   = 0b0001;
        const Control = 0b0010;
        const Alt     = 0b0100;
        const Super   = 0b1000;
    }
}
