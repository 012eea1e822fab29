//! Utilities useful for various generations tasks.

use glamx::Vec3;

/// Computes the normals of a set of vertices.
///
/// Each vertex normal is the mean of the unit normals of the faces sharing
/// it. Vertices referenced by no face get a zero normal.
pub fn compute_normals(coordinates: &[Vec3], faces: &[[u32; 3]], normals: &mut Vec<Vec3>) {
    let mut divisor: Vec<f32> = vec![0.0; coordinates.len()];

    normals.clear();
    normals.resize(coordinates.len(), Vec3::ZERO);

    // Accumulate normals ...
    for f in faces.iter() {
        let edge1 = coordinates[f[1] as usize] - coordinates[f[0] as usize];
        let edge2 = coordinates[f[2] as usize] - coordinates[f[0] as usize];
        let normal = edge1.cross(edge2).normalize_or_zero();

        for i in f {
            normals[*i as usize] += normal;
            divisor[*i as usize] += 1.0;
        }
    }

    // ... and compute the mean
    for (n, divisor) in normals.iter_mut().zip(divisor.iter()) {
        if *divisor > 0.0 {
            *n /= *divisor
        }
    }
}
