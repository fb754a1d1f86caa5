//! Hits along a ray, with everything shading needs precomputed.

use ordered_float::OrderedFloat;

use crate::{
    geometry::{FloatType, Ray, WorldPoint, WorldVector, reflect},
    material::{Material, refractive_index},
    scene::{RawHit, ShapeId},
};

/// Single ray/surface hit.
#[derive(Clone, Debug)]
pub struct Intersection<'a> {
    t: FloatType,
    shape: ShapeId,
    point: WorldPoint,
    eye: WorldVector,
    /// Faces the eye, flipped when hitting the surface from behind.
    normal: WorldVector,
    inside: bool,
    reflect: WorldVector,
    material: &'a Material,
    n1: FloatType,
    n2: FloatType,
    total_internal_reflection: bool,
    refract: WorldVector,
    reflectance: FloatType,
}

impl<'a> Intersection<'a> {
    /// Derives the shading state of a hit crossing from a medium with index `n1` into `n2`.
    pub fn new(ray: &Ray, hit: &RawHit<'a>, n1: FloatType, n2: FloatType) -> Intersection<'a> {
        let point = ray.point_at(hit.t);
        let eye = -ray.direction;
        let mut normal = hit.normal;
        let inside = normal.dot(&eye) < 0.0;
        if inside {
            normal = -normal;
        }

        let ratio = n1 / n2;
        let cos_i = eye.dot(&normal);
        let sin2_t = ratio * ratio * (1.0 - cos_i * cos_i);
        let total_internal_reflection = sin2_t > 1.0;

        let (refract, reflectance) = if total_internal_reflection {
            (WorldVector::zeros(), 1.0)
        } else {
            let cos_t = (1.0 - sin2_t).sqrt();
            let refract = normal * (ratio * cos_i - cos_t) - eye * ratio;
            let cos = if n1 > n2 { cos_t } else { cos_i };
            (refract, schlick(n1, n2, cos))
        };

        Intersection {
            t: hit.t,
            shape: hit.shape,
            point,
            eye,
            normal,
            inside,
            reflect: reflect(&ray.direction, &normal),
            material: hit.material,
            n1,
            n2,
            total_internal_reflection,
            refract,
            reflectance,
        }
    }

    pub fn t(&self) -> FloatType {
        self.t
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn point(&self) -> &WorldPoint {
        &self.point
    }

    pub fn eye(&self) -> &WorldVector {
        &self.eye
    }

    pub fn normal(&self) -> &WorldVector {
        &self.normal
    }

    pub fn inside(&self) -> bool {
        self.inside
    }

    pub fn reflect(&self) -> &WorldVector {
        &self.reflect
    }

    pub fn material(&self) -> &'a Material {
        self.material
    }

    pub fn n1(&self) -> FloatType {
        self.n1
    }

    pub fn n2(&self) -> FloatType {
        self.n2
    }

    pub fn total_internal_reflection(&self) -> bool {
        self.total_internal_reflection
    }

    /// Direction of the transmitted ray, zero under total internal reflection.
    pub fn refract(&self) -> &WorldVector {
        &self.refract
    }

    /// Fraction of light reflected rather than transmitted.
    pub fn reflectance(&self) -> FloatType {
        self.reflectance
    }
}

/// Schlick's approximation of Fresnel reflectance.
fn schlick(n1: FloatType, n2: FloatType, cos: FloatType) -> FloatType {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos).powi(5)
}

/// All hits of a ray, sorted by `t`.
#[derive(Clone, Debug, Default)]
pub struct Intersections<'a> {
    list: Vec<Intersection<'a>>,
}

impl<'a> Intersections<'a> {
    /// Sorts the hits and works out the refractive indices on both sides of each.
    ///
    /// Shapes the ray has entered but not yet left are kept on a stack. A hit on a
    /// shape already on the stack leaves it, any other hit enters a new one.
    /// Only correct for transparent volumes that nest without partial overlaps.
    pub fn new(ray: &Ray, mut hits: Vec<RawHit<'a>>) -> Intersections<'a> {
        hits.sort_by_key(|hit| OrderedFloat(hit.t));

        let mut containers: Vec<(ShapeId, FloatType)> = Vec::new();
        let current = |containers: &[(ShapeId, FloatType)]| {
            containers
                .last()
                .map_or(refractive_index::VACUUM, |(_, index)| *index)
        };

        let list = hits
            .iter()
            .map(|hit| {
                let position = containers.iter().position(|(id, _)| *id == hit.shape);
                let (n1, n2) = match position {
                    Some(position) => {
                        let (_, leaving) = containers.remove(position);
                        (leaving, current(&containers))
                    }
                    None => {
                        let entering = hit.material.refractive_index();
                        let n1 = current(&containers);
                        containers.push((hit.shape, entering));
                        (n1, entering)
                    }
                };
                Intersection::new(ray, hit, n1, n2)
            })
            .collect();

        Intersections { list }
    }

    /// Closest hit at or in front of the ray origin.
    pub fn hit(&self) -> Option<&Intersection<'a>> {
        self.list.iter().find(|i| i.t >= 0.0)
    }

    /// Hits in front of the origin on surfaces that cast shadows, closest first.
    pub fn shadow_hits(&self) -> impl Iterator<Item = &Intersection<'a>> {
        self.list
            .iter()
            .filter(|i| i.t >= 0.0 && i.material.casts_shadow())
    }

    pub fn shadow_hit(&self) -> Option<&Intersection<'a>> {
        self.shadow_hits().next()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Intersection<'a>> {
        self.list.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intersection<'a>> {
        self.list.iter()
    }
}

impl<'s, 'a> IntoIterator for &'s Intersections<'a> {
    type Item = &'s Intersection<'a>;
    type IntoIter = std::slice::Iter<'s, Intersection<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
