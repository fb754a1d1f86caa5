use crate::geometry::{BoundingBox, Ray, WorldPoint, WorldVector};

use super::{Geometry, LocalHit, LocalHits, unit_box};

/// Unit sphere centered at the origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sphere;

impl Sphere {
    pub fn normal_at(&self, point: &WorldPoint) -> WorldVector {
        point.coords
    }
}

impl Geometry for Sphere {
    fn intersect(&self, ray: &Ray) -> LocalHits {
        let oc = ray.origin.coords;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&oc);
        let c = oc.dot(&oc) - 1.0;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 || a == 0.0 {
            return LocalHits::new();
        }
        let sqrt_disc = discriminant.sqrt();
        [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
            .into_iter()
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{
        FloatType,
        test::{NonzeroWorldVectorWrapper, WorldPointWrapper, approx_eq},
    };
    use crate::scene::primitives::test::{assert_ts, ray};
    use assert2::assert;
    use test_case::test_case;
    use test_strategy::proptest;

    #[test_case([0.0, 0.0, -5.0], &[4.0, 6.0] ; "through_center")]
    #[test_case([0.0, 1.0, -5.0], &[5.0, 5.0] ; "tangent")]
    #[test_case([0.0, 2.0, -5.0], &[] ; "miss")]
    #[test_case([0.0, 0.0, 0.0], &[-1.0, 1.0] ; "inside")]
    #[test_case([0.0, 0.0, 5.0], &[-6.0, -4.0] ; "behind")]
    fn hits(origin: [FloatType; 3], expected: &[FloatType]) {
        assert_ts(&Sphere.intersect(&ray(origin, [0.0, 0.0, 1.0])), expected);
    }

    #[test]
    fn normal_is_radial() {
        let s = 3f64.sqrt() / 3.0;
        let n = Sphere.normal_at(&WorldPoint::new(s, s, s));
        assert!(approx_eq(n.as_slice(), &[s, s, s]));
    }

    #[test]
    fn hits_carry_normals() {
        let hits = Sphere.intersect(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]));
        assert!(hits[0].normal == WorldVector::new(0.0, 0.0, -1.0));
        assert!(hits[1].normal == WorldVector::new(0.0, 0.0, 1.0));
    }

    /// A line through the sphere hits it zero or two times, and the two hits are
    /// symmetric about the point of closest approach to the center.
    #[proptest]
    fn hits_are_symmetric(origin: WorldPointWrapper, direction: NonzeroWorldVectorWrapper) {
        let r = Ray::new(*origin, *direction);
        let hits = Sphere.intersect(&r);
        assert!(hits.len() == 0 || hits.len() == 2);
        if hits.len() == 2 {
            let closest = -r.origin.coords.dot(&r.direction) / r.direction.norm_squared();
            let mid = (hits[0].t + hits[1].t) / 2.0;
            assert!((mid - closest).abs() <= 1e-6 * (1.0 + closest.abs()));
            assert!(hits[0].t <= hits[1].t);
        }
    }
}
