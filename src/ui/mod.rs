//! egui widgets drawn over the scene.

pub use self::controls::{count_label, Controls};
pub use self::debug_overlay::{stats_text, DebugOverlay, DEBUG_HOST_ID};
pub use self::portal::{Portal, PortalHosts};

mod controls;
mod debug_overlay;
mod portal;
