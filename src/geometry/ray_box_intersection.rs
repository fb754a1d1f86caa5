use crate::geometry::{BoundingBox, EPSILON, FloatType, Ray};

pub trait RayIntersectionExt {
    /// Calculate first and last ray intersection with the box.
    /// Returns minimum and maximum distance along the ray, the ray intersects if min <= max.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType);
}

impl RayIntersectionExt for BoundingBox {
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        // Near-zero direction components count as parallel, the distance to that slab
        // becomes infinite. Zero numerator times infinity is NaN, that happens when the ray
        // is parallel and lies exactly in the slab bounding plane; we blend to +-infinity,
        // so that the range becomes infinite.
        let to_slab = |bound: FloatType, origin: FloatType, direction: FloatType, nan: FloatType| {
            let distance = bound - origin;
            let t = if direction.abs() >= EPSILON {
                distance / direction
            } else {
                distance * FloatType::INFINITY
            };
            if t.is_nan() { nan } else { t }
        };

        let mut min_t = FloatType::NEG_INFINITY;
        let mut max_t = FloatType::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let to_min = to_slab(self.min[axis], origin, direction, FloatType::NEG_INFINITY);
            let to_max = to_slab(self.max[axis], origin, direction, FloatType::INFINITY);

            min_t = min_t.max(to_min.min(to_max));
            max_t = max_t.min(to_min.max(to_max));
        }

        (min_t, max_t)
    }
}
