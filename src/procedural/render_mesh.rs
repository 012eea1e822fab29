use super::utils;
use glamx::Vec3;

/// Geometric description of a triangle mesh.
///
/// Vertex coordinates and normals share the same index buffer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderMesh {
    /// Coordinates of the mesh vertices.
    pub coords: Vec<Vec3>,
    /// Coordinates of the mesh normals.
    pub normals: Option<Vec<Vec3>>,
    /// Index buffer of the mesh.
    pub indices: Vec<[u32; 3]>,
}

impl RenderMesh {
    /// Creates a new `RenderMesh`.
    ///
    /// If no `indices` is provided, trivial, sequential indices are generated.
    pub fn new(
        coords: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        indices: Option<Vec<[u32; 3]>>,
    ) -> RenderMesh {
        let indices = indices.unwrap_or_else(|| {
            (0..coords.len() as u32 / 3)
                .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
                .collect()
        });

        RenderMesh {
            coords,
            normals,
            indices,
        }
    }

    /// Whether or not this triangle mesh has normals.
    #[inline]
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// The number of triangles on this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// The number of vertices on this mesh.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.coords.len()
    }

    /// Returns `true` if the mesh has no triangle.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the index buffer flattened to one index per corner.
    pub fn flat_indices(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }

    /// Recomputes the mesh normals from its faces.
    pub fn recompute_normals(&mut self) {
        let mut new_normals = Vec::new();
        utils::compute_normals(&self.coords, &self.indices, &mut new_normals);
        self.normals = Some(new_normals);
    }

    /// Scales each vertex of this mesh.
    ///
    /// Normals are rescaled by the inverse scale and renormalized.
    pub fn scale_by(&mut self, s: Vec3) {
        for c in self.coords.iter_mut() {
            *c *= s;
        }

        if let Some(ref mut normals) = self.normals {
            for n in normals.iter_mut() {
                *n = (*n / s).normalize_or_zero();
            }
        }
    }

    /// Appends the vertices and triangles of `other` to this mesh.
    ///
    /// If only one of both meshes has normals, they are recomputed for the
    /// whole result.
    pub fn append(&mut self, other: RenderMesh) {
        let base = self.coords.len() as u32;
        let had_geometry = !self.coords.is_empty();

        self.indices.extend(
            other
                .indices
                .iter()
                .map(|t| [t[0] + base, t[1] + base, t[2] + base]),
        );
        self.coords.extend(other.coords);

        match (self.normals.is_some(), other.normals) {
            (true, Some(other_ns)) => {
                if let Some(ns) = self.normals.as_mut() {
                    ns.extend(other_ns)
                }
            }
            (false, Some(other_ns)) if !had_geometry => self.normals = Some(other_ns),
            (false, None) => {}
            _ => self.recompute_normals(),
        }
    }

    /// The axis-aligned bounding box of the vertices, if any.
    pub fn aabb(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.coords.first()?;
        Some(
            self.coords
                .iter()
                .fold((first, first), |(mins, maxs), c| (mins.min(*c), maxs.max(*c))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> RenderMesh {
        RenderMesh::new(
            vec![
                Vec3::new(offset, 0.0, 0.0),
                Vec3::new(offset, 0.0, 1.0),
                Vec3::new(offset + 1.0, 0.0, 0.0),
            ],
            None,
            None,
        )
    }

    #[test]
    fn trivial_indices() {
        let mesh = triangle(0.0);
        assert_eq!(mesh.indices, vec![[0, 1, 2]]);
        assert_eq!(mesh.flat_indices(), vec![0, 1, 2]);
        assert!(!mesh.has_normals());
    }

    #[test]
    fn append_offsets_indices() {
        let mut mesh = triangle(0.0);
        mesh.append(triangle(2.0));

        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.indices, vec![[0, 1, 2], [3, 4, 5]]);
        assert!(!mesh.has_normals());

        let (mins, maxs) = mesh.aabb().unwrap();
        assert_eq!(mins, Vec3::ZERO);
        assert_eq!(maxs, Vec3::new(3.0, 0.0, 1.0));
    }

    #[test]
    fn append_with_partial_normals_recomputes() {
        let mut with_normals = triangle(0.0);
        with_normals.recompute_normals();

        let mut mesh = triangle(5.0);
        mesh.append(with_normals);

        let normals = mesh.normals.unwrap();
        assert_eq!(normals.len(), 6);
        assert!(normals.iter().all(|n| (*n - Vec3::Y).length() < 1.0e-6));
    }

    #[test]
    fn append_to_empty_keeps_normals() {
        let mut other = triangle(0.0);
        other.normals = Some(vec![Vec3::X; 3]);

        let mut mesh = RenderMesh::new(Vec::new(), None, None);
        assert!(mesh.aabb().is_none());
        mesh.append(other);
        assert_eq!(mesh.normals, Some(vec![Vec3::X; 3]));
    }
}
