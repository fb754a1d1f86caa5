use crate::geometry::{self, BoundingBox, Ray, WorldPoint, WorldVector};

use super::{Geometry, LocalHit, LocalHits};

/// Two sided triangle, optionally with per vertex normals for smooth shading.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    points: geometry::Triangle<WorldPoint>,
    normals: Option<geometry::Triangle<WorldVector>>,
    flat_normal: WorldVector,
}

impl Triangle {
    pub fn new(p1: WorldPoint, p2: WorldPoint, p3: WorldPoint) -> Triangle {
        let points = geometry::Triangle::new(p1, p2, p3);
        let [e1, e2] = points.edges();
        Triangle {
            points,
            normals: None,
            flat_normal: e2.cross(&e1).normalize(),
        }
    }

    /// Triangle whose normal is interpolated from the three vertex normals.
    pub fn smooth(
        p1: WorldPoint,
        p2: WorldPoint,
        p3: WorldPoint,
        n1: WorldVector,
        n2: WorldVector,
        n3: WorldVector,
    ) -> Triangle {
        Triangle {
            normals: Some(geometry::Triangle::new(n1, n2, n3)),
            ..Triangle::new(p1, p2, p3)
        }
    }

    pub fn points(&self) -> &geometry::Triangle<WorldPoint> {
        &self.points
    }

    pub fn is_smooth(&self) -> bool {
        self.normals.is_some()
    }
}

impl Geometry for Triangle {
    fn intersect(&self, ray: &Ray) -> LocalHits {
        self.points
            .intersect(ray)
            .map(|(t, uv)| LocalHit {
                t,
                normal: match &self.normals {
                    Some(normals) => uv.interpolate_triangle(normals),
                    None => self.flat_normal,
                },
            })
            .into_iter()
            .collect()
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.points.iter())
    }
}
