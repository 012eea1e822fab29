//! wgpu surface and winit window, with event polling.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent as WinitWindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::context::Context;
use crate::error::InstagridError;
use crate::event::{Action, Key, Modifiers, MouseButton, WindowEvent};

// winit allows a single event loop per program and it is neither Send nor
// Sync, so it lives in thread-local storage.
thread_local! {
    static EVENT_LOOP: RefCell<Option<EventLoop<()>>> = const { RefCell::new(None) };
    static PENDING_WINDOW_EVENTS: RefCell<HashMap<WindowId, Vec<PendingEvent>>> =
        RefCell::new(HashMap::new());
}

/// An event together with the canvas state update it implies.
#[derive(Clone, Debug)]
enum PendingEvent {
    WindowEvent(WindowEvent),
    ButtonState(MouseButton, Action),
    KeyState(Key, Action),
    CursorPos(f64, f64),
    Modifiers(ModifiersState),
    Resize { width: u32, height: u32 },
}

/// Canvas options.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanvasSetup {
    /// Is vsync enabled?
    pub vsync: bool,
}

impl Default for CanvasSetup {
    fn default() -> Self {
        CanvasSetup { vsync: true }
    }
}

/// A native window with its wgpu surface and depth buffer.
pub struct WgpuCanvas {
    window: Arc<Window>,
    window_id: WindowId,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    cursor_pos: Option<(f64, f64)>,
    key_states: [Action; Key::COUNT],
    button_states: [Action; MouseButton::COUNT],
    out_events: Sender<WindowEvent>,
    modifiers_state: ModifiersState,
    #[allow(dead_code)]
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl WgpuCanvas {
    /// Opens a new window and initializes the wgpu context.
    pub async fn open(
        title: &str,
        width: u32,
        height: u32,
        setup: CanvasSetup,
        out_events: Sender<WindowEvent>,
    ) -> Result<Self, InstagridError> {
        let window_attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width as f64, height as f64));

        let window = EVENT_LOOP.with(|event_loop_cell| {
            let mut event_loop_opt = event_loop_cell.borrow_mut();
            if event_loop_opt.is_none() {
                let event_loop =
                    EventLoop::new().map_err(|e| InstagridError::Window(e.to_string()))?;
                *event_loop_opt = Some(event_loop);
            }

            let event_loop = event_loop_opt
                .as_ref()
                .ok_or_else(|| InstagridError::Window("event loop unavailable".to_string()))?;
            #[allow(deprecated)]
            event_loop
                .create_window(window_attrs)
                .map_err(|e| InstagridError::Window(e.to_string()))
        })?;
        let window = Arc::new(window);

        let (surface, surface_format) = if Context::is_initialized() {
            let ctxt = Context::get();
            let surface = ctxt.instance.create_surface(window.clone())?;
            let surface_format = Self::preferred_format(&surface, &ctxt.adapter)?;
            (surface, surface_format)
        } else {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let surface = instance.create_surface(window.clone())?;

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await?;
            log::info!("Using GPU adapter: {}", adapter.get_info().name);

            let (device, queue) = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("instagrid device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    ..Default::default()
                })
                .await?;

            let surface_format = Self::preferred_format(&surface, &adapter)?;
            Context::init(instance, device, queue, adapter, surface_format);

            (surface, surface_format)
        };

        let ctxt = Context::get();
        let surface_caps = surface.get_capabilities(&ctxt.adapter);

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let present_mode = if setup.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctxt.device, &surface_config);

        let (depth_texture, depth_view) = Self::create_depth_texture(&ctxt.device, width, height);
        let window_id = window.id();

        Ok(WgpuCanvas {
            window,
            window_id,
            surface,
            surface_config,
            cursor_pos: None,
            key_states: [Action::Release; Key::COUNT],
            button_states: [Action::Release; MouseButton::COUNT],
            out_events,
            modifiers_state: ModifiersState::default(),
            depth_texture,
            depth_view,
        })
    }

    // Non-sRGB formats are preferred so colors are written as computed.
    fn preferred_format(
        surface: &wgpu::Surface<'_>,
        adapter: &wgpu::Adapter,
    ) -> Result<wgpu::TextureFormat, InstagridError> {
        let surface_caps = surface.get_capabilities(adapter);
        surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| {
                InstagridError::Window("the surface supports no texture format".to_string())
            })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Context::depth_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Polls events from the window system.
    ///
    /// Window events are sent to the output channel. Key, button and cursor
    /// states are updated and the surface follows the window size.
    pub fn poll_events(&mut self) {
        struct EventCollector;

        impl ApplicationHandler for EventCollector {
            fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

            fn window_event(
                &mut self,
                _event_loop: &ActiveEventLoop,
                window_id: WindowId,
                event: WinitWindowEvent,
            ) {
                let pending_events = translate_event(event);

                if !pending_events.is_empty() {
                    PENDING_WINDOW_EVENTS.with(|storage| {
                        storage
                            .borrow_mut()
                            .entry(window_id)
                            .or_default()
                            .extend(pending_events);
                    });
                }
            }
        }

        EVENT_LOOP.with(|event_loop_cell| {
            if let Some(ref mut event_loop) = *event_loop_cell.borrow_mut() {
                let mut collector = EventCollector;
                let _ = event_loop.pump_app_events(Some(Duration::ZERO), &mut collector);
            }
        });

        let events = PENDING_WINDOW_EVENTS.with(|storage| {
            storage
                .borrow_mut()
                .remove(&self.window_id)
                .unwrap_or_default()
        });

        for event in events {
            match event {
                PendingEvent::WindowEvent(we) => {
                    let _ = self.out_events.send(self.with_modifiers(we));
                }
                PendingEvent::ButtonState(button, action) => {
                    self.button_states[button as usize] = action;
                }
                PendingEvent::KeyState(key, action) => {
                    self.key_states[key as usize] = action;
                }
                PendingEvent::CursorPos(x, y) => {
                    self.cursor_pos = Some((x, y));
                }
                PendingEvent::Modifiers(m) => {
                    self.modifiers_state = m;
                }
                PendingEvent::Resize { width, height } => self.resize(width, height),
            }
        }
    }

    fn with_modifiers(&self, event: WindowEvent) -> WindowEvent {
        let modifiers = translate_modifiers(self.modifiers_state);

        match event {
            WindowEvent::CursorPos(x, y, _) => WindowEvent::CursorPos(x, y, modifiers),
            WindowEvent::MouseButton(b, a, _) => WindowEvent::MouseButton(b, a, modifiers),
            WindowEvent::Scroll(x, y, _) => WindowEvent::Scroll(x, y, modifiers),
            WindowEvent::Key(k, a, _) => WindowEvent::Key(k, a, modifiers),
            other => other,
        }
    }

    /// Resizes the surface and the depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let ctxt = Context::get();
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&ctxt.device, &self.surface_config);

        let (depth_texture, depth_view) = Self::create_depth_texture(&ctxt.device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Configures the surface again, after it was lost or became outdated.
    pub fn reconfigure(&mut self) {
        let (width, height) = self.size();
        self.resize(width, height);
    }

    /// Gets the current surface texture for rendering.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Presents the current frame.
    pub fn present(&self, frame: wgpu::SurfaceTexture) {
        self.window.pre_present_notify();
        frame.present();
    }

    /// Gets the depth texture view for rendering.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Gets the surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// The size of the render surface, in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// The current position of the cursor, if known.
    pub fn cursor_pos(&self) -> Option<(f64, f64)> {
        self.cursor_pos
    }

    /// The scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    /// Set the window title.
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title)
    }

    /// The state of a mouse button.
    pub fn get_mouse_button(&self, button: MouseButton) -> Action {
        self.button_states[button as usize]
    }

    /// The state of a key.
    pub fn get_key(&self, key: Key) -> Action {
        self.key_states[key as usize]
    }
}

fn translate_event(event: WinitWindowEvent) -> Vec<PendingEvent> {
    match event {
        WinitWindowEvent::CloseRequested => vec![PendingEvent::WindowEvent(WindowEvent::Close)],
        WinitWindowEvent::Resized(size) if size.width > 0 && size.height > 0 => vec![
            PendingEvent::Resize {
                width: size.width,
                height: size.height,
            },
            PendingEvent::WindowEvent(WindowEvent::FramebufferSize(size.width, size.height)),
        ],
        WinitWindowEvent::CursorMoved { position, .. } => vec![
            PendingEvent::CursorPos(position.x, position.y),
            PendingEvent::WindowEvent(WindowEvent::CursorPos(
                position.x,
                position.y,
                Modifiers::empty(),
            )),
        ],
        WinitWindowEvent::MouseInput { state, button, .. } => {
            let action = translate_action(state);
            let button = translate_mouse_button(button);
            vec![
                PendingEvent::ButtonState(button, action),
                PendingEvent::WindowEvent(WindowEvent::MouseButton(
                    button,
                    action,
                    Modifiers::empty(),
                )),
            ]
        }
        WinitWindowEvent::MouseWheel { delta, .. } => {
            let (x, y) = match delta {
                MouseScrollDelta::LineDelta(dx, dy) => (dx as f64 * 10.0, dy as f64 * 10.0),
                MouseScrollDelta::PixelDelta(delta) => (delta.x, delta.y),
            };
            vec![PendingEvent::WindowEvent(WindowEvent::Scroll(
                x,
                y,
                Modifiers::empty(),
            ))]
        }
        WinitWindowEvent::KeyboardInput { event, .. } => {
            let action = translate_action(event.state);
            let key = translate_key(event.physical_key);
            let mut events = vec![
                PendingEvent::KeyState(key, action),
                PendingEvent::WindowEvent(WindowEvent::Key(key, action, Modifiers::empty())),
            ];

            if action == Action::Press {
                if let winit::keyboard::Key::Character(ref c) = event.logical_key {
                    events.extend(c.chars().map(|ch| PendingEvent::WindowEvent(WindowEvent::Char(ch))));
                }
            }

            events
        }
        WinitWindowEvent::ModifiersChanged(new_modifiers) => {
            vec![PendingEvent::Modifiers(new_modifiers.state())]
        }
        _ => vec![],
    }
}

fn translate_action(action: ElementState) -> Action {
    match action {
        ElementState::Pressed => Action::Press,
        ElementState::Released => Action::Release,
    }
}

fn translate_modifiers(modifiers: ModifiersState) -> Modifiers {
    let mut res = Modifiers::empty();
    if modifiers.shift_key() {
        res.insert(Modifiers::Shift)
    }
    if modifiers.control_key() {
        res.insert(Modifiers::Control)
    }
    if modifiers.alt_key() {
        res.insert(Modifiers::Alt)
    }
    if modifiers.super_key() {
        res.insert(Modifiers::Super)
    }
    res
}

fn translate_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Button1,
        winit::event::MouseButton::Right => MouseButton::Button2,
        winit::event::MouseButton::Middle => MouseButton::Button3,
        _ => MouseButton::Button4,
    }
}

fn translate_key(physical_key: PhysicalKey) -> Key {
    let PhysicalKey::Code(key_code) = physical_key else {
        return Key::Unknown;
    };

    match key_code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Back,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Return,
        KeyCode::Space => Key::Space,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ShiftLeft => Key::LShift,
        KeyCode::ShiftRight => Key::RShift,
        KeyCode::ControlLeft => Key::LControl,
        KeyCode::ControlRight => Key::RControl,
        KeyCode::AltLeft => Key::LAlt,
        KeyCode::AltRight => Key::RAlt,
        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_buttons_follow_the_camera_convention() {
        assert_eq!(
            translate_mouse_button(winit::event::MouseButton::Left),
            MouseButton::LEFT
        );
        assert_eq!(
            translate_mouse_button(winit::event::MouseButton::Right),
            MouseButton::RIGHT
        );
        assert_eq!(
            translate_mouse_button(winit::event::MouseButton::Middle),
            MouseButton::MIDDLE
        );
        assert_eq!(
            translate_mouse_button(winit::event::MouseButton::Back),
            MouseButton::Button4
        );
    }

    #[test]
    fn keys_and_modifiers() {
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Unknown);
        assert_eq!(translate_action(ElementState::Pressed), Action::Press);

        let m = translate_modifiers(ModifiersState::SHIFT | ModifiersState::CONTROL);
        assert_eq!(m, Modifiers::Shift | Modifiers::Control);
    }

    #[test]
    fn empty_resizes_are_ignored() {
        let event = WinitWindowEvent::Resized(winit::dpi::PhysicalSize::new(0, 720));
        assert!(translate_event(event).is_empty());

        let event = WinitWindowEvent::Resized(winit::dpi::PhysicalSize::new(1280, 720));
        assert!(matches!(
            translate_event(event).as_slice(),
            [
                PendingEvent::Resize {
                    width: 1280,
                    height: 720
                },
                PendingEvent::WindowEvent(WindowEvent::FramebufferSize(1280, 720))
            ]
        ));
    }
}
