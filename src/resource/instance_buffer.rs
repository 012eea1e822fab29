//! Per-instance transforms of an instanced draw.
//!
//! The transform array only ever grows. When the number of instances drops,
//! the slots past the new count are kept and overwritten with a zero-scale
//! transform, which collapses every vertex of that copy onto a single point so
//! nothing of it is rasterized. Growing back into those slots then costs a
//! buffer write instead of a reallocation.

use crate::resource::gpu_vector::{BufferType, GPUVec};
use glamx::{Mat4, Vec3};
use std::mem;

/// The transform written into unused instance slots.
#[inline]
pub fn hidden_transform() -> Mat4 {
    Mat4::from_scale(Vec3::ZERO)
}

/// What a call to [`InstanceSlots::update`] did to the slot array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotsUpdate {
    /// Capacity before the update.
    pub previous_capacity: usize,
    /// Capacity after the update, `max(previous_capacity, live)`.
    pub capacity: usize,
    /// Number of slots holding a visible transform.
    pub live: usize,
}

impl SlotsUpdate {
    /// Whether the slot array had to grow.
    #[inline]
    pub fn grew(&self) -> bool {
        self.capacity > self.previous_capacity
    }

    /// Number of slots that were hidden by this update.
    #[inline]
    pub fn hidden(&self) -> usize {
        self.capacity - self.live
    }
}

/// CPU side of an instance buffer: one transform per slot.
///
/// Invariants after every [`update`](Self::update) with `P` points on a
/// capacity `C`:
/// * slots `[0, P)` hold the translation to the matching point;
/// * slots `[P, C)` hold [`hidden_transform`];
/// * the capacity is `max(C, P)`, so it is never smaller than the live count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceSlots {
    transforms: Vec<Mat4>,
    live: usize,
}

impl InstanceSlots {
    /// Creates an empty slot array. Its first update sets the capacity to the
    /// number of points.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one transform per point and hides the remaining slots.
    pub fn update(&mut self, points: &[Vec3]) -> SlotsUpdate {
        let previous_capacity = self.transforms.len();
        let live = points.len();

        if live > previous_capacity {
            self.transforms.resize(live, hidden_transform());
        }

        let (visible, stale) = self.transforms.split_at_mut(live);

        for (slot, point) in visible.iter_mut().zip(points) {
            *slot = Mat4::from_translation(*point);
        }

        stale.fill(hidden_transform());
        self.live = live;

        SlotsUpdate {
            previous_capacity,
            capacity: self.transforms.len(),
            live,
        }
    }

    /// Number of slots, visible or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.transforms.len()
    }

    /// Number of slots holding a visible transform.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Every slot, including hidden ones.
    #[inline]
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// Whether the slot `i` is hidden.
    #[inline]
    pub fn is_hidden(&self, i: usize) -> bool {
        self.transforms.get(i) == Some(&hidden_transform())
    }
}

/// Per-instance vertex attributes, a column-major model matrix.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
}

impl From<&Mat4> for InstanceData {
    fn from(m: &Mat4) -> Self {
        InstanceData {
            model: m.to_cols_array_2d(),
        }
    }
}

impl InstanceData {
    /// Instance buffer layout: the matrix columns at locations 2 to 5.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4
        ];

        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Instance slots mirrored to a GPU vertex buffer.
///
/// The GPU buffer is sized after the slot capacity, so it is reallocated only
/// when the point count exceeds every previous one.
pub struct InstanceBuffer {
    slots: InstanceSlots,
    data: GPUVec<InstanceData>,
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceBuffer {
    /// Creates an empty instance buffer.
    pub fn new() -> Self {
        InstanceBuffer {
            slots: InstanceSlots::new(),
            data: GPUVec::new_empty(BufferType::Array, "instance buffer"),
        }
    }

    /// Updates the slots from `points` and stages them for upload.
    pub fn update(&mut self, points: &[Vec3]) -> SlotsUpdate {
        let update = self.slots.update(points);
        let data = self.data.data_mut();
        data.clear();
        data.extend(self.slots.transforms().iter().map(InstanceData::from));

        if update.grew() {
            log::debug!(
                "Instance slots grew from {} to {}.",
                update.previous_capacity,
                update.capacity
            );
        }

        update
    }

    /// The CPU-side slots.
    #[inline]
    pub fn slots(&self) -> &InstanceSlots {
        &self.slots
    }

    /// Number of instances an instanced draw must cover.
    #[inline]
    pub fn num_instances(&self) -> u32 {
        self.slots.capacity() as u32
    }

    /// Uploads pending changes and returns the GPU buffer, `None` while there
    /// is no slot at all.
    pub fn upload(&mut self) -> Option<&wgpu::Buffer> {
        if self.data.load_to_gpu() {
            log::debug!(
                "Allocated instance buffer for {} instances.",
                self.data.gpu_capacity()
            );
        }

        self.data.buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, -(i as f32))).collect()
    }

    #[test]
    fn first_update_sets_capacity() {
        let mut slots = InstanceSlots::new();
        let up = slots.update(&points(4));

        assert_eq!(up.previous_capacity, 0);
        assert_eq!(up.capacity, 4);
        assert!(up.grew());
        assert_eq!(slots.live_count(), 4);
        assert_eq!(
            slots.transforms()[3],
            Mat4::from_translation(Vec3::new(3.0, 0.0, -3.0))
        );
    }

    #[test]
    fn shrinking_hides_stale_slots() {
        let mut slots = InstanceSlots::new();
        slots.update(&points(9));
        let up = slots.update(&points(4));

        assert_eq!(up.capacity, 9);
        assert!(!up.grew());
        assert_eq!(up.hidden(), 5);
        assert!((0..4).all(|i| !slots.is_hidden(i)));
        assert!((4..9).all(|i| slots.is_hidden(i)));
    }

    #[test]
    fn regrowing_reuses_slots_then_extends() {
        let mut slots = InstanceSlots::new();
        slots.update(&points(9));
        slots.update(&points(4));

        let up = slots.update(&points(6));
        assert_eq!(up.capacity, 9);
        assert!(!up.grew());
        assert!((0..6).all(|i| !slots.is_hidden(i)));
        assert!((6..9).all(|i| slots.is_hidden(i)));

        let up = slots.update(&points(16));
        assert!(up.grew());
        assert_eq!(up.capacity, 16);
        assert_eq!(up.hidden(), 0);
    }

    #[test]
    fn zero_points_hide_everything() {
        let mut slots = InstanceSlots::new();
        assert_eq!(slots.update(&[]).capacity, 0);

        slots.update(&points(3));
        let up = slots.update(&[]);
        assert_eq!(up.capacity, 3);
        assert_eq!(slots.live_count(), 0);
        assert!((0..3).all(|i| slots.is_hidden(i)));
    }

    #[test]
    fn hidden_transform_collapses_geometry() {
        let m = hidden_transform();
        assert_eq!(m.transform_point3(Vec3::new(1.0, 2.0, 3.0)), Vec3::ZERO);
        assert!(!InstanceSlots::new().is_hidden(0));
    }

    #[test]
    fn instance_data_is_column_major() {
        let data = InstanceData::from(&Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(data.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(mem::size_of::<InstanceData>(), 64);
    }
}
