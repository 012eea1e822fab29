use crate::camera::Camera3d;
use crate::event::{Action, MouseButton, WindowEvent};
use glamx::{Mat4, Vec2, Vec3};
use std::f32;

const MIN_POLAR: f32 = 0.01;
const MAX_POLAR: f32 = f32::consts::PI - 0.01;

/// Orbit camera.
///
/// The camera sits on a sphere centered on its target and always looks at it.
/// The eye position is stored in spherical coordinates around the Y axis:
/// `theta` is the azimuth measured from `+Z` towards `+X` and `phi` the polar
/// angle measured from `+Y`.
///
/// # Default Controls
/// - **Left mouse + drag**: pan (moves the target in the view plane)
/// - **Middle mouse + drag**: dolly in / out
/// - **Right mouse + drag**: rotate around the target
/// - **Mouse wheel**: dolly in / out
///
/// When auto-rotation is enabled, the azimuth advances by
/// `2π / 60 * auto_rotate_speed` radians per second, so a speed of `2.0`
/// completes one turn every 30 seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbitCamera3d {
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,

    min_radius: f32,
    max_radius: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    pan_speed: f32,
    auto_rotate: bool,
    auto_rotate_speed: f32,

    pan_button: Option<MouseButton>,
    dolly_button: Option<MouseButton>,
    rotate_button: Option<MouseButton>,
    pressed: [bool; MouseButton::COUNT],

    fov: f32,
    znear: f32,
    zfar: f32,
    last_cursor_pos: Option<Vec2>,
    last_framebuffer_size: Vec2,
}

impl Default for OrbitCamera3d {
    fn default() -> Self {
        OrbitCamera3d::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }
}

impl OrbitCamera3d {
    /// Creates a new orbit camera with default settings.
    ///
    /// Default frustum: 75° vertical field of view, near plane at 0.1, far plane at 10000.
    ///
    /// # Arguments
    /// * `eye` - Initial camera position
    /// * `at` - Initial point to look at
    pub fn new(eye: Vec3, at: Vec3) -> OrbitCamera3d {
        OrbitCamera3d::new_with_frustum(75.0f32.to_radians(), 0.1, 10_000.0, eye, at)
    }

    /// Creates a new orbit camera with custom frustum parameters.
    ///
    /// # Arguments
    /// * `fov` - Vertical field of view in radians
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    /// * `eye` - Initial camera position
    /// * `at` - Initial point to look at
    pub fn new_with_frustum(fov: f32, znear: f32, zfar: f32, eye: Vec3, at: Vec3) -> OrbitCamera3d {
        let mut res = OrbitCamera3d {
            target: Vec3::ZERO,
            radius: 1.0,
            theta: 0.0,
            phi: f32::consts::FRAC_PI_2,
            min_radius: 0.1,
            max_radius: zfar * 0.5,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            pan_button: Some(MouseButton::LEFT),
            dolly_button: Some(MouseButton::MIDDLE),
            rotate_button: Some(MouseButton::RIGHT),
            pressed: [false; MouseButton::COUNT],
            fov,
            znear,
            zfar,
            last_cursor_pos: None,
            last_framebuffer_size: Vec2::new(800.0, 600.0),
        };

        res.look_at(eye, at);
        res
    }

    /// Moves the camera to `eye` and makes it orbit around `at`.
    pub fn look_at(&mut self, eye: Vec3, at: Vec3) {
        let offset = eye - at;
        let radius = offset.length();

        self.target = at;
        self.radius = radius.clamp(self.min_radius, self.max_radius);

        if radius > 0.0 {
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        }

        self.update_restrictions();
    }

    /// The point this camera orbits around.
    #[inline]
    pub fn at(&self) -> Vec3 {
        self.target
    }

    /// Distance between the eye and the target.
    #[inline]
    pub fn dist(&self) -> f32 {
        self.radius
    }

    /// The azimuth angle, in radians.
    #[inline]
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// The polar angle measured from the up axis, in radians.
    #[inline]
    pub fn phi(&self) -> f32 {
        self.phi
    }

    /// The vertical field of view, in radians.
    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Enables or disables auto-rotation around the target.
    #[inline]
    pub fn set_auto_rotate(&mut self, auto_rotate: bool) {
        self.auto_rotate = auto_rotate;
    }

    /// Whether auto-rotation is enabled.
    #[inline]
    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    fn is_pressed(&self, button: Option<MouseButton>) -> bool {
        button.is_some_and(|b| self.pressed[b as usize])
    }

    fn update_restrictions(&mut self) {
        self.radius = self.radius.clamp(self.min_radius, self.max_radius);
        self.phi = self.phi.clamp(MIN_POLAR, MAX_POLAR);
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    #[doc(hidden)]
    pub fn handle_rotate(&mut self, dpos: Vec2) {
        let height = self.last_framebuffer_size.y.max(1.0);
        self.theta -= f32::consts::TAU * dpos.x / height * self.rotate_speed;
        self.phi -= f32::consts::TAU * dpos.y / height * self.rotate_speed;
        self.update_restrictions();
    }

    #[doc(hidden)]
    pub fn handle_pan(&mut self, dpos: Vec2) {
        let height = self.last_framebuffer_size.y.max(1.0);
        // Half the visible height at the target distance.
        let half_extent = self.radius * (self.fov / 2.0).tan();
        let scale = 2.0 * half_extent / height * self.pan_speed;

        let dir = (self.target - self.eye()).normalize();
        let right = dir.cross(Vec3::Y).normalize();
        let up = right.cross(dir);

        self.target += -right * (dpos.x * scale) + up * (dpos.y * scale);
    }

    #[doc(hidden)]
    pub fn handle_dolly(&mut self, dy: f32) {
        if dy > 0.0 {
            self.radius /= self.zoom_scale();
        } else if dy < 0.0 {
            self.radius *= self.zoom_scale();
        }
        self.update_restrictions();
    }

    #[doc(hidden)]
    pub fn handle_scroll(&mut self, yoff: f32) {
        // Scrolling up moves the eye towards the target.
        self.handle_dolly(-yoff);
    }
}

impl Camera3d for OrbitCamera3d {
    fn handle_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vec2::new(x as f32, y as f32);

                if let Some(last_pos) = self.last_cursor_pos {
                    let dpos = curr_pos - last_pos;

                    if self.is_pressed(self.rotate_button) {
                        self.handle_rotate(dpos);
                    }

                    if self.is_pressed(self.pan_button) {
                        self.handle_pan(dpos);
                    }

                    if self.is_pressed(self.dolly_button) {
                        self.handle_dolly(dpos.y);
                    }
                }

                self.last_cursor_pos = Some(curr_pos);
            }
            WindowEvent::MouseButton(button, action, _) => {
                self.pressed[button as usize] = action == Action::Press;
            }
            WindowEvent::Scroll(_, off, _) => self.handle_scroll(off as f32),
            WindowEvent::FramebufferSize(w, h) => {
                self.last_framebuffer_size = Vec2::new(w.max(1) as f32, h.max(1) as f32);
            }
            _ => {}
        }
    }

    fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();

        self.target
            + Vec3::new(
                self.radius * sin_phi * sin_theta,
                self.radius * cos_phi,
                self.radius * sin_phi * cos_theta,
            )
    }

    fn view_transform(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    fn projection(&self) -> Mat4 {
        let aspect = self.last_framebuffer_size.x / self.last_framebuffer_size.y;
        Mat4::perspective_rh(self.fov, aspect, self.znear, self.zfar)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            self.theta -= f32::consts::TAU / 60.0 * self.auto_rotate_speed * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1.0e-3
    }

    fn drag(camera: &mut OrbitCamera3d, button: MouseButton, from: Vec2, to: Vec2) {
        let m = Modifiers::empty();
        camera.handle_event(&WindowEvent::CursorPos(from.x as f64, from.y as f64, m));
        camera.handle_event(&WindowEvent::MouseButton(button, Action::Press, m));
        camera.handle_event(&WindowEvent::CursorPos(to.x as f64, to.y as f64, m));
        camera.handle_event(&WindowEvent::MouseButton(button, Action::Release, m));
    }

    #[test]
    fn eye_matches_constructor() {
        let eye = Vec3::new(30.0, 40.0, 50.0);
        let at = Vec3::new(1.0, 0.0, -2.0);
        let camera = OrbitCamera3d::new(eye, at);

        assert!(approx(camera.eye(), eye));
        assert!(approx(camera.at(), at));
        assert!((camera.dist() - (eye - at).length()).abs() < 1.0e-3);
    }

    #[test]
    fn right_drag_rotates_around_target() {
        let mut camera = OrbitCamera3d::new(Vec3::new(0.0, 10.0, 20.0), Vec3::ZERO);
        let dist = camera.dist();
        let theta = camera.theta();

        drag(&mut camera, MouseButton::RIGHT, Vec2::new(100.0, 100.0), Vec2::new(150.0, 100.0));

        assert!((camera.dist() - dist).abs() < 1.0e-3);
        assert!(camera.theta() < theta);
        assert!(approx(camera.at(), Vec3::ZERO));
    }

    #[test]
    fn left_drag_pans_target_and_eye_together() {
        let mut camera = OrbitCamera3d::new(Vec3::new(0.0, 10.0, 20.0), Vec3::ZERO);
        let offset = camera.eye() - camera.at();

        drag(&mut camera, MouseButton::LEFT, Vec2::new(100.0, 100.0), Vec2::new(160.0, 130.0));

        assert!(!approx(camera.at(), Vec3::ZERO));
        assert!(approx(camera.eye() - camera.at(), offset));
    }

    #[test]
    fn scroll_and_middle_drag_dolly() {
        let mut camera = OrbitCamera3d::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        let m = Modifiers::empty();

        camera.handle_event(&WindowEvent::Scroll(0.0, 1.0, m));
        assert!(camera.dist() < 100.0);

        let dist = camera.dist();
        drag(&mut camera, MouseButton::MIDDLE, Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
        assert!(camera.dist() > dist);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut camera = OrbitCamera3d::new(Vec3::new(0.0, 10.0, 20.0), Vec3::ZERO);
        camera.handle_rotate(Vec2::new(0.0, 100_000.0));
        assert!(camera.phi() >= MIN_POLAR);
        camera.handle_rotate(Vec2::new(0.0, -100_000.0));
        assert!(camera.phi() <= MAX_POLAR);
    }

    #[test]
    fn auto_rotation_completes_a_turn_in_thirty_seconds() {
        let mut camera = OrbitCamera3d::new(Vec3::new(0.0, 10.0, 20.0), Vec3::ZERO);
        camera.set_auto_rotate(true);
        let eye = camera.eye();
        let theta = camera.theta();

        for _ in 0..15 * 60 {
            camera.update(1.0 / 60.0);
        }
        assert!((camera.theta() - (theta - f32::consts::PI)).abs() < 1.0e-2);

        for _ in 0..15 * 60 {
            camera.update(1.0 / 60.0);
        }
        assert!((camera.eye() - eye).length() < 0.1);
    }

    #[test]
    fn auto_rotation_disabled_keeps_camera_still() {
        let mut camera = OrbitCamera3d::new(Vec3::new(0.0, 10.0, 20.0), Vec3::ZERO);
        let eye = camera.eye();
        camera.update(1.0);
        assert!(approx(camera.eye(), eye));
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut camera = OrbitCamera3d::new(Vec3::new(10.0, 10.0, 10.0), Vec3::new(1.0, 2.0, 3.0));
        camera.handle_event(&WindowEvent::FramebufferSize(800, 600));
        let p = camera.project(camera.at(), Vec2::new(800.0, 600.0));
        assert!((p - Vec2::new(400.0, 300.0)).length() < 1.0e-2);
    }
}
