use super::RenderMesh;
use glamx::Vec3;

/// Generates a cuboid (box) mesh with the specified extents.
///
/// # Arguments
/// * `extents` - The full dimensions of the cuboid along each axis (width, height, depth)
pub fn cuboid(extents: Vec3) -> RenderMesh {
    let mut cuboid = unit_cuboid();
    cuboid.scale_by(extents);

    cuboid
}

/// Generates a unit cuboid mesh centered at the origin.
///
/// Every face has its own four vertices so that normals stay flat.
pub fn unit_cuboid() -> RenderMesh {
    // (normal, tangent u, tangent v) with u x v == normal.
    const FACES: [[Vec3; 3]; 6] = [
        [Vec3::X, Vec3::NEG_Z, Vec3::Y],
        [Vec3::NEG_X, Vec3::Z, Vec3::Y],
        [Vec3::Y, Vec3::X, Vec3::NEG_Z],
        [Vec3::NEG_Y, Vec3::X, Vec3::Z],
        [Vec3::Z, Vec3::X, Vec3::Y],
        [Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y],
    ];

    let mut coords = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(12);

    for [n, u, v] in FACES {
        let base = coords.len() as u32;
        let center = n * 0.5;

        coords.push(center - u * 0.5 - v * 0.5);
        coords.push(center + u * 0.5 - v * 0.5);
        coords.push(center + u * 0.5 + v * 0.5);
        coords.push(center - u * 0.5 + v * 0.5);
        normals.extend([n; 4]);

        faces.push([base, base + 1, base + 2]);
        faces.push([base, base + 2, base + 3]);
    }

    RenderMesh::new(coords, Some(normals), Some(faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedural::utils::compute_normals;

    #[test]
    fn unit_cuboid_faces_are_outward() {
        let mesh = unit_cuboid();
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.num_vertices(), 24);

        let mut computed = Vec::new();
        compute_normals(&mesh.coords, &mesh.indices, &mut computed);
        let normals = mesh.normals.unwrap();

        for (a, b) in computed.iter().zip(normals.iter()) {
            assert!((*a - *b).length() < 1.0e-6);
        }
    }

    #[test]
    fn cuboid_extents() {
        let mesh = cuboid(Vec3::new(2.0, 3.0, 4.0));
        let (mins, maxs) = mesh.aabb().unwrap();
        assert_eq!(mins, Vec3::new(-1.0, -1.5, -2.0));
        assert_eq!(maxs, Vec3::new(1.0, 1.5, 2.0));
    }
}
