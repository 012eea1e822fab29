//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the demo.
#[derive(Debug, Error)]
pub enum InstagridError {
    /// The winit event loop or window could not be created.
    #[error("failed to create window: {0}")]
    Window(String),

    /// The wgpu surface could not be created for the window.
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter compatible with the window surface was found.
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The GPU device could not be acquired.
    #[error("failed to acquire GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The model file could not be read or parsed.
    #[error("failed to load model {path}: {source}")]
    Model {
        /// Path of the model that failed to load.
        path: PathBuf,
        /// The loader error.
        #[source]
        source: tobj::LoadError,
    },

    /// The model file parsed but contains no triangles.
    #[error("model {0} contains no triangles")]
    EmptyModel(PathBuf),

    /// Invalid command-line configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
