use itertools::iproduct;
use nalgebra::{Point, Scalar};

use super::{FloatType, Ray, WorldMatrix, WorldPoint, ray_box_intersection::RayIntersectionExt as _};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }
}

impl<T: Scalar + Copy, const D: usize> AABB<Point<T, D>> {
    /// Per-coordinate pairing of the two boxes' mins with `min_f` and maxes with `max_f`.
    fn zip_coords(
        &self,
        rhs: &Self,
        min_f: impl Fn(T, T) -> T,
        max_f: impl Fn(T, T) -> T,
    ) -> Self {
        AABB {
            min: Point::from(self.min.coords.zip_map(&rhs.min.coords, min_f)),
            max: Point::from(self.max.coords.zip_map(&rhs.max.coords, max_f)),
        }
    }
}

/// Axis aligned volume that conservatively encloses a shape.
///
/// Two states are encoded in the coordinates instead of a separate flag:
/// an empty box has `min > max` (the identity of [`BoundingBox::span`]),
/// and a box with any infinite coordinate is unbounded.
pub type BoundingBox = AABB<WorldPoint>;

impl BoundingBox {
    pub fn empty() -> BoundingBox {
        AABB::new(
            WorldPoint::from(nalgebra::Vector3::repeat(FloatType::INFINITY)),
            WorldPoint::from(nalgebra::Vector3::repeat(FloatType::NEG_INFINITY)),
        )
    }

    pub fn unbounded() -> BoundingBox {
        AABB::new(
            WorldPoint::from(nalgebra::Vector3::repeat(FloatType::NEG_INFINITY)),
            WorldPoint::from(nalgebra::Vector3::repeat(FloatType::INFINITY)),
        )
    }

    /// Smallest box containing all the points, empty if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> BoundingBox {
        points
            .into_iter()
            .fold(BoundingBox::empty(), |acc, p| acc.span(&AABB::new(*p, *p)))
    }

    pub fn is_empty(&self) -> bool {
        self.min
            .iter()
            .zip(self.max.iter())
            .any(|(min, max)| min > max)
    }

    pub fn is_unbounded(&self) -> bool {
        !self.is_empty()
            && self
                .min
                .iter()
                .chain(self.max.iter())
                .any(|x| x.is_infinite())
    }

    /// Smallest box containing both boxes.
    pub fn span(&self, other: &BoundingBox) -> BoundingBox {
        if self.is_empty() {
            *other
        } else if other.is_empty() {
            *self
        } else {
            self.zip_coords(other, FloatType::min, FloatType::max)
        }
    }

    pub fn corners(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        iproduct!(
            [self.min.x, self.max.x],
            [self.min.y, self.max.y],
            [self.min.z, self.max.z]
        )
        .map(|(x, y, z)| WorldPoint::new(x, y, z))
    }

    /// Box enclosing this box after mapping it through the matrix.
    /// Empty stays empty, anything with an infinite extent becomes fully unbounded.
    pub fn transform(&self, matrix: &WorldMatrix) -> BoundingBox {
        if self.is_empty() {
            *self
        } else if self.is_unbounded() {
            BoundingBox::unbounded()
        } else {
            let corners: Vec<WorldPoint> = self
                .corners()
                .map(|corner| matrix.transform_point(&corner))
                .collect();
            BoundingBox::from_points(&corners)
        }
    }

    /// Conservative test whether the line of the ray may touch the box.
    /// False means the ray certainly misses, at any `t`, negative included.
    pub fn maybe_hits(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            false
        } else if self.is_unbounded() {
            true
        } else {
            let (t_min, t_max) = self.intersect(ray);
            t_min <= t_max
        }
    }
}
