//! Triangle meshes from Wavefront OBJ files.

use std::{fs, path::Path};

use indexmap::IndexMap;
use thiserror::Error;
use wavefront_obj::obj::{self, ObjSet, VTNIndex};

use super::{Shape, primitives::Triangle};
use crate::geometry::{EPSILON, WorldPoint, WorldVector};

const DEFAULT_GROUP_NAME: &str = "default";

#[derive(Debug, Error)]
pub enum ObjOpenError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    ParseError(#[from] wavefront_obj::ParseError),
}

/// Loads a mesh as a group with one child group per named OBJ group.
pub fn group_from_obj(path: impl AsRef<Path>) -> Result<Shape, ObjOpenError> {
    let path = path.as_ref();
    let _span = tracing::debug_span!("load_obj", path = %path.display()).entered();
    let content = fs::read_to_string(path)?;
    group_from_obj_str(&content)
}

pub fn group_from_obj_str(content: &str) -> Result<Shape, ObjOpenError> {
    let parsed = obj::parse(content)?;
    Ok(build_group(parsed))
}

fn build_group(set: ObjSet) -> Shape {
    // Keyed by object and group name, in order of first appearance.
    let mut groups: IndexMap<(String, String), Vec<Shape>> = IndexMap::new();
    let mut skipped = 0usize;

    for object in &set.objects {
        let point = |i: usize| {
            let v = &object.vertices[i];
            WorldPoint::new(v.x, v.y, v.z)
        };
        let normal = |i: usize| {
            let n = &object.normals[i];
            WorldVector::new(n.x, n.y, n.z).try_normalize(EPSILON)
        };

        for geometry in &object.geometry {
            for shape in &geometry.shapes {
                let &obj::Primitive::Triangle(a, b, c) = &shape.primitive else {
                    skipped += 1;
                    continue;
                };

                // Degenerate vertex normals fall back to the flat face normal.
                let normals = vertex_normals(a, b, c)
                    .and_then(|[na, nb, nc]| Some([normal(na)?, normal(nb)?, normal(nc)?]));
                let triangle = match normals {
                    Some([na, nb, nc]) => {
                        Triangle::smooth(point(a.0), point(b.0), point(c.0), na, nb, nc)
                    }
                    None => Triangle::new(point(a.0), point(b.0), point(c.0)),
                };

                let group_name = shape
                    .groups
                    .first()
                    .map_or(DEFAULT_GROUP_NAME, String::as_str);
                groups
                    .entry((object.name.clone(), group_name.to_owned()))
                    .or_default()
                    .push(Shape::primitive(triangle));
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Ignored non-triangle OBJ primitives");
    }
    tracing::debug!(
        groups = groups.len(),
        triangles = groups.values().map(Vec::len).sum::<usize>(),
        "Loaded OBJ mesh"
    );

    Shape::group(groups.into_values().map(Shape::group))
}

/// Normal indices of the three corners, if every corner has one.
fn vertex_normals(a: VTNIndex, b: VTNIndex, c: VTNIndex) -> Option<[usize; 3]> {
    Some([a.2?, b.2?, c.2?])
}
