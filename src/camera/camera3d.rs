use crate::event::WindowEvent;
use glamx::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Trait that all camera implementations must implement.
///
/// Cameras control the viewpoint from which the 3D scene is rendered. The
/// window feeds them every event it receives (unless the UI captured it), then
/// calls [`update`](Self::update) once per frame before reading the matrices.
pub trait Camera3d {
    /// Handles window events to update camera state.
    fn handle_event(&mut self, event: &WindowEvent);

    /// Returns the camera's position in world space.
    fn eye(&self) -> Vec3;

    /// Returns the view matrix (world space to camera space).
    fn view_transform(&self) -> Mat4;

    /// Returns the projection matrix (camera space to clip space).
    fn projection(&self) -> Mat4;

    /// Returns the combined projection and view transformation matrix.
    fn transformation(&self) -> Mat4 {
        self.projection() * self.view_transform()
    }

    /// Returns the near and far clipping plane distances.
    fn clip_planes(&self) -> (f32, f32);

    /// Updates the camera state for the current frame.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the previous frame, in seconds
    fn update(&mut self, dt: f32);

    /// Projects a 3D point in world coordinates to 2D screen coordinates.
    ///
    /// The origin of the screen coordinates is at the bottom-left corner.
    fn project(&self, world_coord: Vec3, size: Vec2) -> Vec2 {
        let h_normalized_coord = self.transformation() * world_coord.extend(1.0);
        let normalized_coord = h_normalized_coord.xyz() / h_normalized_coord.w;

        Vec2::new(
            (1.0 + normalized_coord.x) * size.x / 2.0,
            (1.0 + normalized_coord.y) * size.y / 2.0,
        )
    }
}
