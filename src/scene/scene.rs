//! Assembly of the demo scene.

use std::rc::Rc;

use glamx::Vec3;

use crate::camera::{Camera3d, OrbitCamera3d};
use crate::color::{Color, SILVER};
use crate::config::DemoConfig;
use crate::event::WindowEvent;
use crate::light::{Light, LightCollection};
use crate::procedural::RenderMesh;
use crate::renderer::{LineRenderer, MeshRenderer, RenderStats};
use crate::resource::GpuMesh3d;
use crate::scene::{GridHelper, Objects, RenderMode};

/// Intensity of the ambient light.
pub const AMBIENT_INTENSITY: f32 = 0.35;
/// Intensity of the directional key light.
pub const KEY_LIGHT_INTENSITY: f32 = 0.75;

/// The lights of the scene: an ambient term and a directional key light.
pub fn default_lights() -> LightCollection {
    let mut lights = LightCollection::new();
    lights.add(Light::ambient().with_intensity(AMBIENT_INTENSITY));
    lights.add(Light::directional(Vec3::new(-0.5, -1.0, -0.3)).with_intensity(KEY_LIGHT_INTENSITY));
    lights
}

/// The orbit camera looking at the grid from above one of its corners.
pub fn initial_camera(dim: u32, step: f32, auto_rotate: bool) -> OrbitCamera3d {
    let extent = (dim.saturating_add(1) as f32 * step).max(10.0);
    let mut camera = OrbitCamera3d::new(Vec3::new(0.8, 0.65, 0.8) * extent, Vec3::ZERO);
    camera.set_auto_rotate(auto_rotate);
    camera
}

/// Camera, lights, ground grid and objects of the demo.
pub struct Scene {
    camera: OrbitCamera3d,
    lights: LightCollection,
    grid: GridHelper,
    step: f32,
    model_color: Color,
    objects: Objects<GpuMesh3d>,
    mesh_renderer: MeshRenderer,
    line_renderer: LineRenderer,
}

impl Scene {
    /// Uploads `model` and lays out the initial grid described by `config`.
    pub fn new(model: &RenderMesh, config: &DemoConfig) -> Scene {
        let mesh = Rc::new(GpuMesh3d::from_render_mesh(model));
        let grid = GridHelper::under_objects(config.count, config.step);
        let mut line_renderer = LineRenderer::new();
        line_renderer.set_segments(&grid.segments());

        Scene {
            camera: initial_camera(config.count, config.step, config.auto_rotate),
            lights: default_lights(),
            grid,
            step: config.step,
            model_color: SILVER,
            objects: Objects::new(mesh, config.mode, config.count, config.step),
            mesh_renderer: MeshRenderer::new(),
            line_renderer,
        }
    }

    pub fn camera(&self) -> &OrbitCamera3d {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera3d {
        &mut self.camera
    }

    pub fn objects(&self) -> &Objects<GpuMesh3d> {
        &self.objects
    }

    pub fn grid(&self) -> &GridHelper {
        &self.grid
    }

    /// Applies the UI state: rendering strategy and grid dimension.
    pub fn apply(&mut self, mode: RenderMode, dim: u32) {
        self.objects.set_mode(mode);

        if self.objects.set_dim(dim) {
            self.grid = GridHelper::under_objects(dim, self.step);
            self.line_renderer.set_segments(&self.grid.segments());
        }
    }

    /// Forwards an input event to the camera.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        self.camera.handle_event(event);
    }

    /// Advances the camera by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.camera.update(dt);
    }

    /// Draws the grid and the objects.
    pub fn render(&mut self, pass: &mut wgpu::RenderPass<'_>, stats: &mut RenderStats) {
        let view_proj = self.camera.transformation();

        self.line_renderer.render(pass, view_proj, stats);

        self.mesh_renderer
            .prepare(view_proj, self.model_color, &self.lights);
        self.objects.render(pass, &mut self.mesh_renderer, stats);
    }
}
