use std::ops::{Add, Index, Mul, Sub};

use nalgebra::{DefaultAllocator, DimName, OPoint, OVector, Scalar, allocator::Allocator};

use super::FloatType;

#[derive(Clone, Debug, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.0.iter()
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T: Scalar, D: DimName> Triangle<OPoint<T, D>>
where
    DefaultAllocator: Allocator<D>,
    for<'a> &'a OPoint<T, D>: Sub<Output = OVector<T, D>>,
{
    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [OVector<T, D>; 2] {
        [&self.0[1] - &self.0[0], &self.0[2] - &self.0[0]]
    }
}

/// Position inside a triangle, as weights of the second and third vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BarycentricCoordinates {
    pub u: FloatType,
    pub v: FloatType,
}

impl BarycentricCoordinates {
    pub fn interpolate<T>(&self, a: &T, b: &T, c: &T) -> T
    where
        for<'a> &'a T: Mul<FloatType, Output = T>,
        T: Add<Output = T>,
    {
        let w = 1.0 - self.u - self.v;
        a * w + b * self.u + c * self.v
    }

    pub fn interpolate_triangle<T>(&self, triangle: &Triangle<T>) -> T
    where
        for<'a> &'a T: Mul<FloatType, Output = T>,
        T: Add<Output = T>,
    {
        self.interpolate(&triangle[0], &triangle[1], &triangle[2])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{WorldPoint, WorldVector};
    use assert2::assert;

    #[test]
    fn edges() {
        let t = Triangle::new(
            WorldPoint::new(0.0, 1.0, 0.0),
            WorldPoint::new(-1.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
        );
        let [e1, e2] = t.edges();
        assert!(e1 == WorldVector::new(-1.0, -1.0, 0.0));
        assert!(e2 == WorldVector::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn interpolate_corners() {
        let t = Triangle::new(
            WorldVector::new(0.0, 1.0, 0.0),
            WorldVector::new(-1.0, 0.0, 0.0),
            WorldVector::new(1.0, 0.0, 0.0),
        );
        let at = |u, v| BarycentricCoordinates { u, v }.interpolate_triangle(&t);
        assert!(at(0.0, 0.0) == t[0]);
        assert!(at(1.0, 0.0) == t[1]);
        assert!(at(0.0, 1.0) == t[2]);
        assert!(at(0.5, 0.5) == WorldVector::zeros());
    }
}
