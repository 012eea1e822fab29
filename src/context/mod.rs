//! Global wgpu context.

pub use self::context::Context;

mod context;
