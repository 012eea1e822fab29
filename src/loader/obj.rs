//! Wavefront OBJ loading through `tobj`.

use std::io::BufRead;
use std::path::Path;

use glamx::Vec3;

use crate::error::InstagridError;
use crate::procedural::{self, RenderMesh};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Loads every model of an OBJ file and merges them into a single mesh.
///
/// Materials are ignored. Missing normals are computed from the faces.
pub fn load_model(path: &Path) -> Result<RenderMesh, InstagridError> {
    let (models, _materials) =
        tobj::load_obj(path, &load_options()).map_err(|source| InstagridError::Model {
            path: path.to_path_buf(),
            source,
        })?;

    merge(models, path)
}

/// Same as [`load_model`] but reads the OBJ content from `reader`.
///
/// `path` is only used for error reporting. `mtllib` statements are ignored.
pub fn load_model_buf<R: BufRead>(
    reader: &mut R,
    path: &Path,
) -> Result<RenderMesh, InstagridError> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default())).map_err(
            |source| InstagridError::Model {
                path: path.to_path_buf(),
                source,
            },
        )?;

    merge(models, path)
}

/// Loads the model at `path`, or a unit cuboid if that fails.
pub fn load_model_or_cuboid(path: &Path) -> RenderMesh {
    match load_model(path) {
        Ok(mesh) => {
            log::info!(
                "Loaded {}: {} vertices, {} triangles.",
                path.display(),
                mesh.num_vertices(),
                mesh.num_triangles()
            );
            mesh
        }
        Err(e) => {
            log::warn!("{e}. Falling back to a unit cuboid.");
            procedural::unit_cuboid()
        }
    }
}

fn to_vec3s(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3).map(Vec3::from_slice).collect()
}

fn merge(models: Vec<tobj::Model>, path: &Path) -> Result<RenderMesh, InstagridError> {
    let mut merged = RenderMesh::new(Vec::new(), None, Some(Vec::new()));

    for model in models {
        let mesh = model.mesh;
        let coords = to_vec3s(&mesh.positions);
        let normals = (mesh.normals.len() == mesh.positions.len())
            .then(|| to_vec3s(&mesh.normals));
        let indices = mesh
            .indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();

        log::debug!(
            "OBJ model `{}`: {} vertices, normals: {}.",
            model.name,
            coords.len(),
            normals.is_some()
        );
        merged.append(RenderMesh::new(coords, normals, Some(indices)));
    }

    if merged.is_empty() {
        return Err(InstagridError::EmptyModel(path.to_path_buf()));
    }

    if !merged.has_normals() {
        merged.recompute_normals();
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_OBJECTS: &str = "\
o first
v 0 0 0
v 0 0 1
v 1 0 0
f 1 2 3
o second
v 0 1 0
v 0 1 1
v 1 1 1
v 1 1 0
f 4 5 6 7
";

    #[test]
    fn objects_are_merged_and_triangulated() {
        let mesh =
            load_model_buf(&mut Cursor::new(TWO_OBJECTS), Path::new("two.obj")).unwrap();

        assert_eq!(mesh.num_triangles(), 3);
        assert_eq!(mesh.num_vertices(), 7);
        assert!(mesh.indices.iter().flatten().all(|i| (*i as usize) < 7));

        let normals = mesh.normals.unwrap();
        assert!(normals.iter().all(|n| (*n - Vec3::Y).length() < 1.0e-5));
    }

    #[test]
    fn empty_model_is_an_error() {
        let res = load_model_buf(&mut Cursor::new("o nothing\nv 0 0 0\n"), Path::new("e.obj"));
        assert!(matches!(res, Err(InstagridError::EmptyModel(_))));
    }

    #[test]
    fn missing_file_falls_back_to_cuboid() {
        let path = Path::new("this/model/does/not/exist.obj");
        assert!(matches!(
            load_model(path),
            Err(InstagridError::Model { .. })
        ));
        assert_eq!(load_model_or_cuboid(path), procedural::unit_cuboid());
    }
}
