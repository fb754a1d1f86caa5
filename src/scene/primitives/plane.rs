use crate::geometry::{BoundingBox, FloatType, Ray, WorldPoint, WorldVector};

use super::{Geometry, LocalHit, LocalHits, axis_plane_distance};

/// Infinite xz plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane;

impl Geometry for Plane {
    fn intersect(&self, ray: &Ray) -> LocalHits {
        axis_plane_distance(ray.origin.y, ray.direction.y, 0.0)
            .map(|t| LocalHit {
                t,
                normal: WorldVector::y(),
            })
            .into_iter()
            .collect()
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            WorldPoint::new(FloatType::NEG_INFINITY, 0.0, FloatType::NEG_INFINITY),
            WorldPoint::new(FloatType::INFINITY, 0.0, FloatType::INFINITY),
        )
    }
}
