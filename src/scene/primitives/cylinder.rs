use crate::geometry::{BoundingBox, EPSILON, FloatType, Ray, WorldPoint, WorldVector};

use super::{Geometry, LocalHit, LocalHits, axis_plane_distance, overlap, solve_quadratic, unit_box};

const TOP_Y: FloatType = 1.0;
const BOTTOM_Y: FloatType = -1.0;

/// Closed cylinder of radius 1 around the y axis, capped at y = -1 and y = 1.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Cylinder;

/// Parameter interval where the ray's line is inside one of the cylinder's slabs.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Span {
    Empty,
    /// The line runs parallel to the slab and stays inside it.
    Everything,
    Range([FloatType; 2]),
}

impl Span {
    fn as_range(&self) -> Option<[FloatType; 2]> {
        match self {
            Span::Empty => None,
            Span::Everything => Some([FloatType::NEG_INFINITY, FloatType::INFINITY]),
            Span::Range(r) => Some(*r),
        }
    }
}

impl Cylinder {
    pub fn normal_at(&self, point: &WorldPoint) -> WorldVector {
        if (point.y - BOTTOM_Y).abs() < EPSILON {
            -WorldVector::y()
        } else if (point.y - TOP_Y).abs() < EPSILON {
            WorldVector::y()
        } else {
            WorldVector::new(point.x, 0.0, point.z)
        }
    }

    /// Where the line is within the infinite tube.
    fn walls(ray: &Ray) -> Span {
        let a = ray.direction.x * ray.direction.x + ray.direction.z * ray.direction.z;
        if a.abs() < EPSILON {
            let r2 = ray.origin.x * ray.origin.x + ray.origin.z * ray.origin.z;
            return if r2 < 1.0 { Span::Everything } else { Span::Empty };
        }
        let b = 2.0 * (ray.origin.x * ray.direction.x + ray.origin.z * ray.direction.z);
        let c = ray.origin.x * ray.origin.x + ray.origin.z * ray.origin.z - 1.0;
        solve_quadratic(a, b, c).map_or(Span::Empty, Span::Range)
    }

    /// Where the line is between the two cap planes.
    fn caps(ray: &Ray) -> Span {
        let top = axis_plane_distance(ray.origin.y, ray.direction.y, TOP_Y);
        let bottom = axis_plane_distance(ray.origin.y, ray.direction.y, BOTTOM_Y);
        match (top, bottom) {
            (Some(top), Some(bottom)) => Span::Range([top.min(bottom), top.max(bottom)]),
            _ if ray.origin.y > BOTTOM_Y && ray.origin.y < TOP_Y => Span::Everything,
            _ => Span::Empty,
        }
    }

    /// Entry and exit distance.
    ///
    /// Horizontal and vertical lines skip the interval overlap and return the walls or
    /// caps directly, which also keeps tangent grazes of the walls.
    fn hit_range(ray: &Ray) -> Option<[FloatType; 2]> {
        match (Self::walls(ray), Self::caps(ray)) {
            (Span::Range(walls), Span::Everything) => Some(walls),
            (Span::Everything, Span::Range(caps)) => Some(caps),
            (Span::Range(walls), Span::Range(caps)) => overlap(&[walls, caps]),
            _ => None,
        }
    }

    /// Plain interval overlap, no special handling of axis aligned lines.
    #[cfg(test)]
    fn hit_range_general(ray: &Ray) -> Option<[FloatType; 2]> {
        overlap(&[
            Self::walls(ray).as_range()?,
            Self::caps(ray).as_range()?,
        ])
    }
}

impl Geometry for Cylinder {
    fn intersect(&self, ray: &Ray) -> LocalHits {
        Self::hit_range(ray)
            .into_iter()
            .flatten()
            .map(|t| LocalHit {
                t,
                normal: self.normal_at(&ray.point_at(t)),
            })
            .collect()
    }

    fn bounding_box(&self) -> BoundingBox {
        unit_box()
    }
}
