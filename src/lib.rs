/*!
# Instagrid

Naive vs. instanced rendering of a grid of 3D models.

This crate opens a window showing an `N x N` grid of copies of one model and
lets you switch, at runtime, between two rendering strategies:

* **naive**: every copy is its own scene object and costs one draw call;
* **instanced**: all copies share a single instanced draw call.

A debug overlay at the bottom of the window shows the renderer statistics of
the last frame (draw calls, lines, points, triangles, frame counter) so the
difference between both strategies is visible immediately.

```no_run
use instagrid::prelude::*;

fn main() -> Result<(), InstagridError> {
    env_logger::init();
    let config = DemoConfig::default();
    pollster::block_on(instagrid::app::run(config))
}
```

Controls of the default orbit camera:

* `left click + drag`: pan.
* `middle click + drag` or `scroll`: dolly in / out.
* `right click + drag`: rotate around the target.
* the camera slowly auto-rotates when auto-rotation is enabled.

The only piece of logic with a real invariant is the instance buffer update,
see [`resource::InstanceSlots`].
*/
#![allow(non_upper_case_globals)]
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

#[macro_use]
extern crate bitflags;
#[cfg(feature = "serde")]
extern crate serde;

pub extern crate egui;
pub use glamx;

pub mod app;
pub mod camera;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod light;
pub mod loader;
pub mod procedural;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod ui;
pub mod window;

pub mod prelude {
    pub use crate::app::App;
    pub use crate::camera::*;
    pub use crate::color::*;
    pub use crate::config::DemoConfig;
    pub use crate::context::*;
    pub use crate::error::InstagridError;
    pub use crate::event::*;
    pub use crate::light::*;
    pub use crate::renderer::*;
    pub use crate::resource::*;
    pub use crate::scene::*;
    pub use crate::ui::*;
    pub use crate::window::*;
    pub use glamx::{Mat4, Quat, Vec2, Vec3};
    pub use std::cell::RefCell;
    pub use std::rc::Rc;
}
