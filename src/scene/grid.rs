//! Placement of the objects and the ground grid under them.

use crate::color::{Color, GRID_CENTER_LINE, GRID_LINE};
use crate::renderer::LineSegment;
use glamx::Vec3;

/// Default distance between two neighboring objects.
pub const DEFAULT_STEP: f32 = 5.0;

/// Computes the `dim x dim` positions of the objects on the XZ plane.
///
/// Coordinates along each axis are `(i - dim / 2) * step` for `i` in
/// `0..dim` (a real division, odd dimensions are offset by half a step). The
/// list is x-major: all the points with the first x coordinate come first.
pub fn grid_points(dim: u32, step: f32) -> Vec<Vec3> {
    let half = dim as f32 / 2.0;
    let range: Vec<f32> = (0..dim).map(|i| (i as f32 - half) * step).collect();

    range
        .iter()
        .flat_map(|x| range.iter().map(move |z| Vec3::new(*x, 0.0, *z)))
        .collect()
}

/// Grid points recomputed only when the dimension changes.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPoints {
    dim: u32,
    step: f32,
    points: Vec<Vec3>,
}

impl GridPoints {
    pub fn new(dim: u32, step: f32) -> Self {
        GridPoints {
            dim,
            step,
            points: grid_points(dim, step),
        }
    }

    /// Changes the dimension, returns `true` if the points were recomputed.
    pub fn set_dim(&mut self, dim: u32) -> bool {
        if dim == self.dim {
            return false;
        }

        self.dim = dim;
        self.points = grid_points(dim, self.step);
        true
    }

    #[inline]
    pub fn dim(&self) -> u32 {
        self.dim
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

/// A square grid of lines on the XZ plane.
///
/// `divisions + 1` lines run along each axis, spanning `size` units and
/// centered on `position`. When `divisions` is even, the two lines crossing
/// at the center use `center_color`.
#[derive(Clone, Debug, PartialEq)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub position: Vec3,
    pub center_color: Color,
    pub grid_color: Color,
}

impl GridHelper {
    /// A grid of `divisions` cells per side, centered at the origin.
    pub fn new(size: f32, divisions: u32) -> Self {
        GridHelper {
            size,
            divisions,
            position: Vec3::ZERO,
            center_color: GRID_CENTER_LINE,
            grid_color: GRID_LINE,
        }
    }

    /// The grid drawn under `dim x dim` objects spaced by `step`.
    pub fn under_objects(dim: u32, step: f32) -> Self {
        GridHelper {
            position: Vec3::new(-step / 2.0, 0.0, -step / 2.0),
            ..GridHelper::new(dim.saturating_add(1) as f32 * step, dim)
        }
    }

    /// Number of line segments of the grid.
    pub fn num_segments(&self) -> usize {
        2 * (self.divisions as usize + 1)
    }

    /// The line segments of the grid, in world coordinates.
    ///
    /// With no division, the two center lines collapse onto one edge of the
    /// grid.
    pub fn segments(&self) -> Vec<LineSegment> {
        let half = self.size / 2.0;
        let cell = if self.divisions == 0 {
            0.0
        } else {
            self.size / self.divisions as f32
        };
        let center = (self.divisions % 2 == 0).then_some(self.divisions / 2);
        let mut res = Vec::with_capacity(self.num_segments());

        for i in 0..=self.divisions {
            let k = -half + i as f32 * cell;
            let color = if Some(i) == center {
                self.center_color
            } else {
                self.grid_color
            };

            res.push(LineSegment {
                a: self.position + Vec3::new(-half, 0.0, k),
                b: self.position + Vec3::new(half, 0.0, k),
                color,
            });
            res.push(LineSegment {
                a: self.position + Vec3::new(k, 0.0, -half),
                b: self.position + Vec3::new(k, 0.0, half),
                color,
            });
        }

        res
    }
}
