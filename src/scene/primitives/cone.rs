use crate::geometry::{BoundingBox, EPSILON, FloatType, Ray, WorldPoint, WorldVector};

use super::{Geometry, LocalHit, LocalHits, axis_plane_distance, solve_quadratic};

/// Internally the apex sits at y = 0 and the capped base at y = -2.
const Y_SHIFT: FloatType = 1.0;
const APEX_Y: FloatType = 0.0;
const BASE_Y: FloatType = -2.0;
const CAP_RADIUS: FloatType = 1.0;

/// Single nappe cone `x² + z² = y²` with its apex at y = 1, reaching down to y = -1
/// where a unit disk caps it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Cone;

impl Cone {
    fn shifted(point: &WorldPoint) -> WorldPoint {
        WorldPoint::new(point.x, point.y - Y_SHIFT, point.z)
    }

    pub fn normal_at(&self, point: &WorldPoint) -> WorldVector {
        let p = Self::shifted(point);
        if (p.y - BASE_Y).abs() < EPSILON {
            -WorldVector::y()
        } else {
            WorldVector::new(p.x, (p.x * p.x + p.z * p.z).sqrt(), p.z)
        }
    }

    fn walls(ray: &Ray) -> impl Iterator<Item = FloatType> + '_ {
        let (o, d) = (&ray.origin, &ray.direction);
        let a = d.x * d.x + d.z * d.z - d.y * d.y;
        let b = 2.0 * (o.x * d.x + o.z * d.z - o.y * d.y);
        let c = o.x * o.x + o.z * o.z - o.y * o.y;
        solve_quadratic(a, b, c)
            .into_iter()
            .flatten()
            .filter(move |&t| {
                let y = o.y + d.y * t;
                y > BASE_Y && y <= APEX_Y
            })
    }

    fn cap(ray: &Ray) -> Option<FloatType> {
        let t = axis_plane_distance(ray.origin.y, ray.direction.y, BASE_Y)?;
        let p = ray.point_at(t);
        (p.x * p.x + p.z * p.z < CAP_RADIUS * CAP_RADIUS).then_some(t)
    }
}

impl Geometry for Cone {
    fn intersect(&self, ray: &Ray) -> LocalHits {
        let shifted = Ray::new(Self::shifted(&ray.origin), ray.direction);
        let mut hits: LocalHits = Self::walls(&shifted)
            .chain(Self::cap(&shifted))
            .map(|t| LocalHit {
                t,
                normal: self.normal_at(&ray.point_at(t)),
            })
            .collect();
        hits.sort_unstable_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }

    /// The walls widen to radius 2 at the base, past the capping disk.
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            WorldPoint::new(-2.0, -1.0, -2.0),
            WorldPoint::new(2.0, 1.0, 2.0),
        )
    }
}
