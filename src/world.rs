//! Scene root and the recursive shading pipeline.

use bon::bon;

use crate::{
    geometry::{EPSILON, Ray, WorldPoint},
    intersection::{Intersection, Intersections},
    material::Light,
    scene::Shape,
    util::{BLACK, Color, ColorExt as _},
};

pub const DEFAULT_MAX_BOUNCES: u32 = 4;

/// Shapes and lights of a scene.
///
/// Rendering only ever borrows the world immutably, so it can be shared across
/// worker threads once built.
#[derive(Debug)]
pub struct World {
    root: Shape,
    lights: Vec<Light>,
    max_bounces: u32,
}

#[bon]
impl World {
    #[builder]
    pub fn new(
        #[builder(default)] shapes: Vec<Shape>,
        #[builder(default)] lights: Vec<Light>,
        /// Recursion budget for reflected and refracted rays.
        #[builder(default = DEFAULT_MAX_BOUNCES)]
        max_bounces: u32,
    ) -> Self {
        let root = Shape::group(shapes);
        tracing::debug!(
            stats = %root.statistics(),
            lights = lights.len(),
            max_bounces,
            "Created world"
        );
        World {
            root,
            lights,
            max_bounces,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        World::builder().build()
    }
}

impl World {
    pub fn add_shape(&mut self, shape: Shape) {
        self.root.add(shape);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn shapes(&self) -> &[Shape] {
        self.root.children()
    }

    /// Group holding every top level shape.
    pub fn root(&self) -> &Shape {
        &self.root
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn max_bounces(&self) -> u32 {
        self.max_bounces
    }

    pub fn intersect(&self, ray: &Ray) -> Intersections<'_> {
        Intersections::new(ray, self.root.intersect(ray))
    }

    /// Color seen along a primary ray, with the world's full bounce budget.
    pub fn color_at(&self, ray: &Ray) -> Color {
        self.color_at_depth(ray, self.max_bounces)
    }

    /// Color seen along a ray with `depth` reflection/refraction bounces remaining.
    pub fn color_at_depth(&self, ray: &Ray, depth: u32) -> Color {
        match self.intersect(ray).hit() {
            Some(hit) => self.shade_hit(hit, depth),
            None => BLACK,
        }
    }

    pub fn shade_hit(&self, hit: &Intersection<'_>, depth: u32) -> Color {
        let material = hit.material();
        let surface = self
            .lights
            .iter()
            .map(|light| {
                let visible = self.visible_light_color(hit.point(), light);
                material.lighting(light, hit.point(), hit.eye(), hit.normal(), &visible)
            })
            .fold(BLACK, |acc, c| acc + c);

        let reflected = self.reflected_color(hit, depth);
        let refracted = self.refracted_color(hit, depth);

        if material.reflectivity() > 0.0 && material.transparency() > 0.0 {
            let reflectance = hit.reflectance();
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        }
    }

    pub fn reflected_color(&self, hit: &Intersection<'_>, depth: u32) -> Color {
        let reflectivity = hit.material().reflectivity();
        if depth == 0 || reflectivity == 0.0 {
            return BLACK;
        }
        let ray = Ray::new(*hit.point(), *hit.reflect()).bump_forward();
        self.color_at_depth(&ray, depth - 1) * reflectivity
    }

    pub fn refracted_color(&self, hit: &Intersection<'_>, depth: u32) -> Color {
        let transparency = hit.material().transparency();
        if depth == 0 || transparency == 0.0 || hit.total_internal_reflection() {
            return BLACK;
        }
        let ray = Ray::new(*hit.point(), *hit.refract()).bump_forward();
        self.color_at_depth(&ray, depth - 1) * transparency
    }

    /// Light intensity that reaches `point`, after passing through every shadow
    /// casting surface between it and the light.
    ///
    /// Each surface crossed filters the light by its color and transparency. The
    /// square root accounts for a closed solid being crossed twice, so opaque
    /// surfaces block the light completely.
    pub fn visible_light_color(&self, point: &WorldPoint, light: &Light) -> Color {
        let light_to_point = point - light.position;
        let distance = light_to_point.norm();
        let ray = Ray::new(light.position, light_to_point / distance);

        self.intersect(&ray)
            .shadow_hits()
            .take_while(|i| i.t() < distance - EPSILON)
            .fold(light.intensity, |color, i| {
                let material = i.material();
                let filter = material.pattern().color_at(i.point()) * material.transparency();
                color.component_mul(&filter.sqrt())
            })
    }

    pub fn is_shadowed(&self, point: &WorldPoint, light: &Light) -> bool {
        self.visible_light_color(point, light).is_black()
    }
}

#[cfg(test)]
pub mod test {
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, SQRT_2};

    use super::*;
    use crate::{
        geometry::{FloatType, Transform, WorldVector, test::approx_eq},
        material::{Material, Pattern},
        util::{WHITE, test::TOLERANCE},
    };
    use assert2::{assert, let_assert};
    use test_case::test_case;

    fn ray(origin: [FloatType; 3], direction: [FloatType; 3]) -> Ray {
        Ray::new(origin.into(), direction.into())
    }

    fn outer_material(ambient: FloatType) -> Material {
        Material::builder()
            .pattern(Color::new(0.8, 1.0, 0.6))
            .ambient(ambient)
            .diffuse(0.7)
            .specular(0.2)
            .build()
            .unwrap()
    }

    fn inner_material(ambient: FloatType) -> Material {
        Material::builder().ambient(ambient).build().unwrap()
    }

    fn default_light() -> Light {
        Light::new(WorldPoint::new(-10.0, 10.0, -10.0), WHITE)
    }

    /// Two concentric spheres lit from the upper left front.
    pub fn default_world() -> World {
        default_world_with(outer_material(0.1), inner_material(0.1))
    }

    fn default_world_with(outer: Material, inner: Material) -> World {
        World::builder()
            .shapes(vec![
                Shape::sphere().with_material(outer),
                Shape::sphere()
                    .with_transform(Transform::uniform_scaling(0.5).unwrap())
                    .with_material(inner),
            ])
            .lights(vec![default_light()])
            .build()
    }

    fn assert_color(actual: Color, expected: [FloatType; 3]) {
        let expected = Color::new(expected[0], expected[1], expected[2]);
        assert!(actual.approx_eq(&expected, TOLERANCE), "{actual:?} != {expected:?}");
    }

    #[test]
    fn empty_world() {
        let w = World::default();
        assert!(w.shapes().is_empty());
        assert!(w.lights().is_empty());
        assert!(w.max_bounces() == DEFAULT_MAX_BOUNCES);
        assert!(w.color_at(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0])) == BLACK);
    }

    #[test]
    fn add_shapes_and_lights() {
        let mut w = World::builder().max_bounces(7).build();
        w.add_shape(Shape::sphere());
        w.add_shape(Shape::cube());
        w.add_light(default_light());
        assert!(w.shapes().len() == 2);
        assert!(w.lights() == [default_light()]);
        assert!(w.max_bounces() == 7);
    }

    #[test]
    fn intersect_default_world() {
        let w = default_world();
        let xs = w.intersect(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]));
        let ts: Vec<_> = xs.iter().map(Intersection::t).collect();
        assert!(approx_eq(&ts, &[4.0, 4.5, 5.5, 6.0]));
    }

    #[test]
    fn shade_from_outside() {
        let w = default_world();
        let xs = w.intersect(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]));
        let_assert!(Some(hit) = xs.hit());
        assert_color(w.shade_hit(hit, 0), [0.38066, 0.47583, 0.2855]);
    }

    #[test]
    fn shade_from_inside() {
        let mut w = default_world_with(outer_material(0.1), inner_material(0.1));
        w.lights = vec![Light::new(WorldPoint::new(0.0, 0.25, 0.0), WHITE)];
        let xs = w.intersect(&ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]));
        let_assert!(Some(hit) = xs.hit());
        assert!(approx_eq(&[hit.t()], &[0.5]));
        assert_color(w.shade_hit(hit, 0), [0.90498, 0.90498, 0.90498]);
    }

    #[test]
    fn color_when_ray_misses() {
        let w = default_world();
        assert!(w.color_at(&ray([0.0, 0.0, -5.0], [0.0, 1.0, 0.0])) == BLACK);
    }

    #[test]
    fn color_when_ray_hits() {
        let w = default_world();
        let c = w.color_at(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]));
        assert_color(c, [0.38066, 0.47583, 0.2855]);
    }

    #[test]
    fn color_with_intersection_behind_ray() {
        let w = default_world_with(outer_material(1.0), inner_material(1.0));
        let c = w.color_at(&ray([0.0, 0.0, 0.75], [0.0, 0.0, -1.0]));
        assert_color(c, [1.0, 1.0, 1.0]);
    }

    #[test_case(0.0, 10.0, 0.0, false ; "nothing_collinear")]
    #[test_case(10.0, -10.0, 10.0, true ; "object_between_point_and_light")]
    #[test_case(-20.0, 20.0, -20.0, false ; "object_behind_light")]
    #[test_case(-2.0, 2.0, -2.0, false ; "object_behind_point")]
    fn shadowed(x: FloatType, y: FloatType, z: FloatType, expected: bool) {
        let w = default_world();
        assert!(w.is_shadowed(&WorldPoint::new(x, y, z), &default_light()) == expected);
    }

    fn floor(material: Material) -> Shape {
        Shape::plane()
            .with_transform(Transform::translation(0.0, -1.0, 0.0))
            .with_material(material)
    }

    #[test]
    fn transparent_occluder_tints_light() {
        let light = Light::new(WorldPoint::new(0.0, 10.0, 0.0), WHITE);
        let filter = Material::builder()
            .pattern(Color::new(1.0, 0.5, 0.0))
            .transparency(0.5)
            .build()
            .unwrap();
        let w = World::builder().shapes(vec![floor(filter)]).build();

        let below = WorldPoint::new(0.0, -2.0, 0.0);
        assert_color(w.visible_light_color(&below, &light), [0.70711, 0.5, 0.0]);
        assert!(!w.is_shadowed(&below, &light));

        let above = WorldPoint::new(0.0, 0.0, 0.0);
        assert!(w.visible_light_color(&above, &light) == WHITE);
    }

    #[test]
    fn non_casting_shapes_let_light_through() {
        let invisible = Material::builder().casts_shadow(false).build().unwrap();
        let w = World::builder()
            .shapes(vec![Shape::sphere().with_material(invisible)])
            .build();
        let light = Light::new(WorldPoint::new(0.0, 0.0, -10.0), WHITE);
        assert!(!w.is_shadowed(&WorldPoint::new(0.0, 0.0, 10.0), &light));
    }

    #[test]
    fn reflected_color_of_matte_surface() {
        let w = default_world_with(outer_material(0.1), inner_material(1.0));
        let xs = w.intersect(&ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]));
        let_assert!(Some(hit) = xs.hit());
        assert!(w.reflected_color(hit, DEFAULT_MAX_BOUNCES) == BLACK);
    }

    fn reflective_floor_world() -> World {
        let mut w = default_world();
        w.add_shape(floor(Material::builder().reflectivity(0.5).build().unwrap()));
        w
    }

    fn floor_ray() -> Ray {
        ray([0.0, 0.0, -3.0], [0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2])
    }

    #[test]
    fn reflected_color_of_reflective_surface() {
        let w = reflective_floor_world();
        let xs = w.intersect(&floor_ray());
        let_assert!(Some(hit) = xs.hit());
        assert!((hit.t() - SQRT_2).abs() < 1e-9);
        assert_color(w.reflected_color(hit, 1), [0.19033, 0.23791, 0.14275]);
        assert_color(w.shade_hit(hit, 1), [0.87676, 0.92434, 0.82917]);
    }

    #[test]
    fn reflected_color_at_max_depth() {
        let w = reflective_floor_world();
        let xs = w.intersect(&floor_ray());
        let_assert!(Some(hit) = xs.hit());
        assert!(w.reflected_color(hit, 0) == BLACK);
    }

    #[test]
    fn mutually_reflective_surfaces_terminate() {
        let mirror = || Material::builder().reflectivity(1.0).build().unwrap();
        let w = World::builder()
            .shapes(vec![
                floor(mirror()),
                Shape::plane()
                    .with_transform(Transform::translation(0.0, 1.0, 0.0))
                    .with_material(mirror()),
            ])
            .lights(vec![Light::new(WorldPoint::origin(), WHITE)])
            .max_bounces(32)
            .build();
        let c = w.color_at(&ray([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]));
        assert!(c.r > 0.0 && c.r.is_finite());
    }

    #[test]
    fn refracted_color_of_opaque_surface() {
        let w = default_world();
        let xs = w.intersect(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]));
        let_assert!(Some(hit) = xs.hit());
        assert!(w.refracted_color(hit, 5) == BLACK);
    }

    #[test]
    fn refracted_color_at_max_depth() {
        let w = default_world_with(Material::glass(), inner_material(0.1));
        let xs = w.intersect(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]));
        let_assert!(Some(hit) = xs.hit());
        assert!(w.refracted_color(hit, 0) == BLACK);
    }

    #[test]
    fn refracted_color_under_total_internal_reflection() {
        let w = default_world_with(Material::glass(), inner_material(0.1));
        let xs = w.intersect(&ray([0.0, 0.0, FRAC_1_SQRT_2], [0.0, 1.0, 0.0]));
        let_assert!(Some(hit) = xs.get(1));
        assert!(hit.total_internal_reflection());
        assert!(w.refracted_color(hit, 5) == BLACK);
    }

    /// Glass pane at z = 0 in front of a red wall at z = 5.
    fn glass_pane_world() -> World {
        let unlit = |pattern: Color, transparency: FloatType| {
            Material::builder()
                .pattern(pattern)
                .ambient(if transparency > 0.0 { 0.0 } else { 1.0 })
                .diffuse(0.0)
                .specular(0.0)
                .transparency(transparency)
                .refractive_index(1.5)
                .build()
                .unwrap()
        };
        let facing_z = Transform::rotation_x(FRAC_PI_2);
        World::builder()
            .shapes(vec![
                Shape::plane()
                    .with_transform(facing_z.clone())
                    .with_material(unlit(WHITE, 1.0)),
                Shape::plane()
                    .with_transform(facing_z.then(&Transform::translation(0.0, 0.0, 5.0)))
                    .with_material(unlit(Color::new(1.0, 0.0, 0.0), 0.0)),
            ])
            .lights(vec![Light::new(WorldPoint::new(0.0, 0.0, -10.0), WHITE)])
            .build()
    }

    #[test]
    fn refracted_color_passes_straight_through_perpendicular_pane() {
        let w = glass_pane_world();
        let r = ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]);
        let xs = w.intersect(&r);
        let_assert!(Some(hit) = xs.hit());
        assert!(approx_eq(&[hit.t()], &[5.0]));
        assert!((hit.refract() - WorldVector::z()).norm() < 1e-9);
        assert_color(w.refracted_color(hit, 1), [1.0, 0.0, 0.0]);
        assert_color(w.color_at(&r), [1.0, 0.0, 0.0]);
    }

    fn transparent_floor_world(floor_material: Material) -> World {
        let mut w = default_world();
        w.add_shape(floor(floor_material));
        w.add_shape(
            Shape::sphere()
                .with_transform(Transform::translation(0.0, -3.5, -0.5))
                .with_material(
                    Material::builder()
                        .pattern(Color::new(1.0, 0.0, 0.0))
                        .ambient(0.5)
                        .build()
                        .unwrap(),
                ),
        );
        w
    }

    #[test]
    fn shade_transparent_floor() {
        let w = transparent_floor_world(
            Material::builder()
                .transparency(0.5)
                .refractive_index(1.5)
                .build()
                .unwrap(),
        );
        let xs = w.intersect(&floor_ray());
        let_assert!(Some(hit) = xs.hit());
        assert!((hit.t() - SQRT_2).abs() < 1e-9);
        assert_color(w.shade_hit(hit, 5), [1.20377, 0.68643, 0.68643]);
    }

    #[test]
    fn shade_reflective_transparent_floor() {
        let w = transparent_floor_world(
            Material::builder()
                .reflectivity(0.5)
                .transparency(0.5)
                .refractive_index(1.5)
                .build()
                .unwrap(),
        );
        let xs = w.intersect(&floor_ray());
        let_assert!(Some(hit) = xs.hit());
        assert_color(w.shade_hit(hit, 5), [1.19001, 0.69643, 0.69243]);
    }

    #[test]
    fn patterned_occluder_filters_by_its_color() {
        let light = Light::new(WorldPoint::new(0.5, 10.0, 0.0), WHITE);
        let stripes = Material::builder()
            .pattern(Pattern::stripe(WHITE, BLACK))
            .transparency(1.0)
            .build()
            .unwrap();
        let w = World::builder().shapes(vec![floor(stripes)]).build();
        assert!(w.visible_light_color(&WorldPoint::new(0.5, -2.0, 0.0), &light) == WHITE);

        let over_black_stripe = Light {
            position: WorldPoint::new(1.5, 10.0, 0.0),
            ..light
        };
        assert!(w.is_shadowed(&WorldPoint::new(1.5, -2.0, 0.0), &over_black_stripe));
    }
}
