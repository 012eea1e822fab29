//! The demo scene: object placement, object renderers and their assembly.

pub use self::grid::{grid_points, GridHelper, GridPoints, DEFAULT_STEP};
pub use self::objects::{
    ObjectRenderer, Objects, ObjectsInstanced, ObjectsNaive, RenderMode, SceneObject,
};
pub use self::scene::{default_lights, initial_camera, Scene};

mod grid;
mod objects;
mod scene;
