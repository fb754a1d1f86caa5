//! Unit-sized primitives, all working in their own object space.

mod cone;
mod cube;
mod cylinder;
mod plane;
mod sphere;
mod triangle;

pub use cone::Cone;
pub use cube::Cube;
pub use cylinder::Cylinder;
pub use plane::Plane;
pub use sphere::Sphere;
pub use triangle::Triangle;

use arrayvec::ArrayVec;

use crate::geometry::{BoundingBox, EPSILON, FloatType, Ray, WorldPoint, WorldVector};

/// Intersection with a primitive, in the primitive's object space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalHit {
    pub t: FloatType,
    /// Outward surface normal, not necessarily normalized.
    pub normal: WorldVector,
}

/// A convex primitive is crossed at most twice, the spare room covers degenerate grazing cases.
pub type LocalHits = ArrayVec<LocalHit, 4>;

pub trait Geometry {
    /// All intersections of the ray's line with the surface, negative `t` included.
    fn intersect(&self, ray: &Ray) -> LocalHits;
    fn bounding_box(&self) -> BoundingBox;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Plane(Plane),
    Cube(Cube),
    Cylinder(Cylinder),
    Cone(Cone),
    Triangle(Triangle),
}

impl Geometry for Primitive {
    fn intersect(&self, ray: &Ray) -> LocalHits {
        match self {
            Primitive::Sphere(g) => g.intersect(ray),
            Primitive::Plane(g) => g.intersect(ray),
            Primitive::Cube(g) => g.intersect(ray),
            Primitive::Cylinder(g) => g.intersect(ray),
            Primitive::Cone(g) => g.intersect(ray),
            Primitive::Triangle(g) => g.intersect(ray),
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        match self {
            Primitive::Sphere(g) => g.bounding_box(),
            Primitive::Plane(g) => g.bounding_box(),
            Primitive::Cube(g) => g.bounding_box(),
            Primitive::Cylinder(g) => g.bounding_box(),
            Primitive::Cone(g) => g.bounding_box(),
            Primitive::Triangle(g) => g.bounding_box(),
        }
    }
}

macro_rules! impl_from_geometry {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Primitive {
                fn from(g: $variant) -> Primitive {
                    Primitive::$variant(g)
                }
            }
        )*
    };
}

impl_from_geometry!(Sphere, Plane, Cube, Cylinder, Cone, Triangle);

/// The [-1, 1] cube that bounds all the finite unit primitives.
fn unit_box() -> BoundingBox {
    BoundingBox::new(
        WorldPoint::new(-1.0, -1.0, -1.0),
        WorldPoint::new(1.0, 1.0, 1.0),
    )
}

/// Distance along a 1D ray to a plane, None if the ray is (almost) parallel to it.
fn axis_plane_distance(origin: FloatType, direction: FloatType, plane: FloatType) -> Option<FloatType> {
    if direction.abs() < EPSILON {
        None
    } else {
        Some((plane - origin) / direction)
    }
}

/// Both roots of `a t^2 + b t + c`, smaller first for positive `a`.
/// None if there is no real solution or the equation is (almost) linear.
fn solve_quadratic(a: FloatType, b: FloatType, c: FloatType) -> Option<[FloatType; 2]> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a.abs() < EPSILON {
        return None;
    }
    let sqrt_disc = discriminant.sqrt();
    Some([(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)])
}

/// Overlap of a set of closed `t` intervals, if it has nonzero length.
fn overlap(ranges: &[[FloatType; 2]]) -> Option<[FloatType; 2]> {
    let max_min = ranges
        .iter()
        .map(|r| r[0].min(r[1]))
        .fold(FloatType::NEG_INFINITY, FloatType::max);
    let min_max = ranges
        .iter()
        .map(|r| r[0].max(r[1]))
        .fold(FloatType::INFINITY, FloatType::min);
    (max_min < min_max).then_some([max_min, min_max])
}

#[cfg(test)]
pub mod test {
    use super::*;
    use assert2::assert;

    pub fn ray(origin: [FloatType; 3], direction: [FloatType; 3]) -> Ray {
        Ray::new(origin.into(), direction.into())
    }

    pub fn ts(hits: &LocalHits) -> Vec<FloatType> {
        hits.iter().map(|h| h.t).collect()
    }

    /// Compares hit distances with the tolerance of five-decimal reference values.
    pub fn assert_ts(hits: &LocalHits, expected: &[FloatType]) {
        let actual = ts(hits);
        assert!(actual.len() == expected.len(), "{actual:?} != {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-4, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn overlap_of_disjoint_ranges_is_none() {
        assert!(overlap(&[[0.0, 1.0], [2.0, 3.0]]).is_none());
        assert!(overlap(&[[0.0, 1.0], [1.0, 3.0]]).is_none());
    }

    #[test]
    fn overlap_ignores_order_within_range() {
        assert!(overlap(&[[3.0, 0.0], [1.0, 5.0]]) == Some([1.0, 3.0]));
    }

    #[test]
    fn quadratic_rejects_linear_equation() {
        assert!(solve_quadratic(1e-7, 1.0, 1.0).is_none());
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_none());
        assert!(solve_quadratic(1.0, 0.0, -4.0) == Some([-2.0, 2.0]));
    }
}
