//! The two ways of drawing one model at every grid point.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use glamx::{Mat4, Vec3};

use crate::error::InstagridError;
use crate::renderer::{IndexedDraw, MeshRenderer, RenderStats};
use crate::resource::{GpuMesh3d, IndexedMesh, InstanceBuffer, SlotsUpdate};
use crate::scene::GridPoints;

/// Rendering strategy of the objects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderMode {
    /// One scene object, and one draw call, per point.
    #[default]
    Naive,
    /// A single instanced draw call for all points.
    Instanced,
}

impl RenderMode {
    /// Every mode, in the order the control panel lists them.
    pub const ALL: [RenderMode; 2] = [RenderMode::Naive, RenderMode::Instanced];

    /// Label displayed by the control panel.
    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Naive => "Naive",
            RenderMode::Instanced => "Instanced",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RenderMode {
    type Err = InstagridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naive" => Ok(RenderMode::Naive),
            "instanced" => Ok(RenderMode::Instanced),
            _ => Err(InstagridError::Config(format!(
                "unknown render mode `{s}`, expected `naive` or `instanced`"
            ))),
        }
    }
}

/// An independent scene object: a transform and a shared handle to its mesh.
#[derive(Debug)]
pub struct SceneObject<M> {
    pub transform: Mat4,
    pub mesh: Rc<M>,
}

impl<M> Clone for SceneObject<M> {
    fn clone(&self) -> Self {
        SceneObject {
            transform: self.transform,
            mesh: self.mesh.clone(),
        }
    }
}

/// One scene object per point.
pub struct ObjectsNaive<M> {
    mesh: Rc<M>,
    objects: Vec<SceneObject<M>>,
}

impl<M> ObjectsNaive<M> {
    pub fn new(mesh: Rc<M>, points: &[Vec3]) -> Self {
        let mut res = ObjectsNaive {
            mesh,
            objects: Vec::new(),
        };
        res.set_points(points);
        res
    }

    /// Replaces the objects by one object per point.
    pub fn set_points(&mut self, points: &[Vec3]) {
        self.objects.clear();
        self.objects.extend(points.iter().map(|p| SceneObject {
            transform: Mat4::from_translation(*p),
            mesh: self.mesh.clone(),
        }));
    }

    pub fn objects(&self) -> &[SceneObject<M>] {
        &self.objects
    }
}

impl<M: IndexedMesh> ObjectsNaive<M> {
    /// One single-instance draw per object, in object order.
    pub fn draws(&self) -> impl Iterator<Item = IndexedDraw> + '_ {
        self.objects
            .iter()
            .map(|o| IndexedDraw::single(o.mesh.num_indices()))
    }
}

impl ObjectsNaive<GpuMesh3d> {
    /// Issues one draw call per object.
    pub fn render(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        renderer: &mut MeshRenderer,
        stats: &mut RenderStats,
    ) {
        renderer.draw_objects(
            pass,
            self.objects
                .iter()
                .zip(self.draws())
                .map(|(o, draw)| (&*o.mesh, &o.transform, draw)),
            stats,
        );
    }
}

/// All points drawn by a single instanced mesh.
pub struct ObjectsInstanced<M> {
    mesh: Rc<M>,
    instances: InstanceBuffer,
}

impl<M> ObjectsInstanced<M> {
    /// Creates the instanced mesh, its capacity is the number of points.
    pub fn new(mesh: Rc<M>, points: &[Vec3]) -> Self {
        let mut res = ObjectsInstanced {
            mesh,
            instances: InstanceBuffer::new(),
        };
        res.set_points(points);
        res
    }

    /// Moves the instances to `points`, hiding the slots left over.
    pub fn set_points(&mut self, points: &[Vec3]) -> SlotsUpdate {
        self.instances.update(points)
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }
}

impl<M: IndexedMesh> ObjectsInstanced<M> {
    /// The single draw covering every slot, hidden ones included.
    ///
    /// `None` when there is no slot at all.
    pub fn draw(&self) -> Option<IndexedDraw> {
        let instances = self.instances.num_instances();
        (instances > 0).then(|| IndexedDraw {
            index_count: self.mesh.num_indices(),
            instances,
        })
    }
}

impl ObjectsInstanced<GpuMesh3d> {
    /// Issues a single instanced draw call covering every slot.
    pub fn render(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        renderer: &mut MeshRenderer,
        stats: &mut RenderStats,
    ) {
        let Some(draw) = self.draw() else {
            return;
        };

        renderer.draw_instanced(pass, &self.mesh, &mut self.instances, draw, stats);
    }
}

/// The object renderer in use.
pub enum ObjectRenderer<M> {
    Naive(ObjectsNaive<M>),
    Instanced(ObjectsInstanced<M>),
}

impl<M> ObjectRenderer<M> {
    fn new(mode: RenderMode, mesh: Rc<M>, points: &[Vec3]) -> Self {
        match mode {
            RenderMode::Naive => ObjectRenderer::Naive(ObjectsNaive::new(mesh, points)),
            RenderMode::Instanced => {
                ObjectRenderer::Instanced(ObjectsInstanced::new(mesh, points))
            }
        }
    }

    pub fn mode(&self) -> RenderMode {
        match self {
            ObjectRenderer::Naive(_) => RenderMode::Naive,
            ObjectRenderer::Instanced(_) => RenderMode::Instanced,
        }
    }
}

/// The objects of the scene: a model drawn at every point of a square grid.
pub struct Objects<M> {
    mesh: Rc<M>,
    grid: GridPoints,
    renderer: ObjectRenderer<M>,
}

impl<M> Objects<M> {
    /// Draws `mesh` on a `dim x dim` grid of spacing `step`.
    pub fn new(mesh: Rc<M>, mode: RenderMode, dim: u32, step: f32) -> Self {
        let grid = GridPoints::new(dim, step);
        let renderer = ObjectRenderer::new(mode, mesh.clone(), grid.points());

        Objects {
            mesh,
            grid,
            renderer,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    pub fn dim(&self) -> u32 {
        self.grid.dim()
    }

    pub fn points(&self) -> &[Vec3] {
        self.grid.points()
    }

    pub fn renderer(&self) -> &ObjectRenderer<M> {
        &self.renderer
    }

    /// Switches the rendering strategy.
    ///
    /// The previous renderer is dropped. Switching to instanced mode always
    /// starts from a fresh instance buffer sized after the current points.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode == self.mode() {
            return;
        }

        log::info!(
            "Switching to {} rendering of {} objects.",
            mode,
            self.grid.points().len()
        );
        self.renderer = ObjectRenderer::new(mode, self.mesh.clone(), self.grid.points());
    }

    /// Changes the grid dimension. Objects are only updated if it changed.
    pub fn set_dim(&mut self, dim: u32) -> bool {
        if !self.grid.set_dim(dim) {
            return false;
        }

        let points = self.grid.points();
        match &mut self.renderer {
            ObjectRenderer::Naive(naive) => naive.set_points(points),
            ObjectRenderer::Instanced(instanced) => {
                instanced.set_points(points);
            }
        }

        true
    }
}

impl<M: IndexedMesh> Objects<M> {
    /// The draws the active strategy issues in one frame.
    pub fn draws(&self) -> Vec<IndexedDraw> {
        match &self.renderer {
            ObjectRenderer::Naive(naive) => naive.draws().collect(),
            ObjectRenderer::Instanced(instanced) => instanced.draw().into_iter().collect(),
        }
    }
}

impl Objects<GpuMesh3d> {
    /// Draws the objects with the active strategy.
    pub fn render(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        renderer: &mut MeshRenderer,
        stats: &mut RenderStats,
    ) {
        match &mut self.renderer {
            ObjectRenderer::Naive(naive) => naive.render(pass, renderer, stats),
            ObjectRenderer::Instanced(instanced) => instanced.render(pass, renderer, stats),
        }
    }
}
