mod aabb;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod transform;
mod triangle;

pub use aabb::BoundingBox;
pub use ray_box_intersection::RayIntersectionExt;
pub use transform::Transform;
pub use triangle::{BarycentricCoordinates, Triangle};

use nalgebra::{Matrix4, Point3, Vector3};

pub type FloatType = f64;

/// Tolerance used for all degenerate-geometry decisions and for nudging secondary rays.
pub const EPSILON: FloatType = 1e-5;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type WorldMatrix = Matrix4<FloatType>;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray, not necessarily normalized.
    /// Hit distances are measured in multiples of its length.
    pub direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray { origin, direction }
    }

    pub fn point_at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }

    /// Maps the ray through a homogeneous matrix.
    /// The direction is not renormalized, so `t` values stay comparable across spaces.
    pub fn transform(&self, matrix: &WorldMatrix) -> Ray {
        Ray {
            origin: matrix.transform_point(&self.origin),
            direction: matrix.transform_vector(&self.direction),
        }
    }

    /// Moves the origin a tiny step along the direction, to escape the surface it starts on.
    pub fn bump_forward(&self) -> Ray {
        Ray {
            origin: self.point_at(EPSILON),
            direction: self.direction,
        }
    }
}

/// Mirror `v` around a normalized `normal`.
pub fn reflect(v: &WorldVector, normal: &WorldVector) -> WorldVector {
    v - normal * (2.0 * v.dot(normal))
}
