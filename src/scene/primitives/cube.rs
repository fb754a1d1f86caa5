use crate::geometry::{BoundingBox, Ray, RayIntersectionExt as _, WorldPoint, WorldVector};

use super::{Geometry, LocalHit, LocalHits, unit_box};

/// Axis aligned cube spanning [-1, 1] on every axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Cube;

impl Cube {
    /// Normal of the face whose axis has the largest coordinate magnitude.
    /// On edges and corners the first of +x, -x, +y, -y, +z, -z wins.
    pub fn normal_at(&self, point: &WorldPoint) -> WorldVector {
        let mut best = WorldVector::x();
        let mut best_value = point.x;
        for axis in 0..3 {
            for sign in [1.0, -1.0] {
                let value = sign * point[axis];
                if value > best_value {
                    best_value = value;
                    best = WorldVector::zeros();
                    best[axis] = sign;
                }
            }
        }
        best
    }
}

impl Geometry for Cube {
    fn intersect(&self, ray: &Ray) -> LocalHits {
        let (t_min, t_max) = unit_box().intersect(ray);
        if t_min < t_max {
            [t_min, t_max]
                .into_iter()
                .map(|t| LocalHit {
                    t,
                    normal: self.normal_at(&ray.point_at(t)),
                })
                .collect()
        } else {
            LocalHits::new()
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        unit_box()
    }
}
