//! Structures responsible for issuing draw calls.

pub use self::egui_renderer::EguiRenderer;
pub use self::line_renderer::{LineRenderer, LineSegment};
pub use self::mesh_renderer::MeshRenderer;
pub use self::stats::{FrameStats, IndexedDraw, RenderStats};

mod egui_renderer;
mod line_renderer;
mod mesh_renderer;
mod stats;
