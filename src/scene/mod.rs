//! Shape tree: transformed primitives, groups and CSG combinations.

mod csg;
mod group;
pub mod mesh;
pub mod primitives;
mod stats;

pub use csg::{Csg, CsgOperation};
pub use group::Group;
pub use stats::SceneStats;

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use primitives::{Cone, Cube, Cylinder, Geometry as _, Plane, Primitive, Sphere, Triangle};

use crate::geometry::{BoundingBox, FloatType, Ray, Transform, WorldPoint, WorldVector};
use crate::material::Material;

index_vec::define_index_type! {
    /// Identity of a leaf shape, unique within the process.
    pub struct ShapeId = u32;
}

static NEXT_SHAPE_ID: AtomicU32 = AtomicU32::new(0);

impl ShapeId {
    fn next() -> ShapeId {
        ShapeId::from_raw(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unprocessed hit, before the intersection list works out refraction.
#[derive(Copy, Clone, Debug)]
pub struct RawHit<'a> {
    pub t: FloatType,
    /// Unit normal in the space of the ray that was passed in.
    pub normal: WorldVector,
    pub material: &'a Material,
    pub shape: ShapeId,
}

#[derive(Debug)]
pub enum ShapeKind {
    Primitive {
        geometry: Primitive,
        material: Material,
        id: ShapeId,
    },
    Group(Group),
    Csg(Box<Csg>),
}

/// Node of the shape tree, places its content into the parent's space.
///
/// Shapes are deliberately not `Clone`, so that a leaf id never appears twice in a scene.
#[derive(Debug)]
pub struct Shape {
    transform: Transform,
    kind: ShapeKind,
    /// Bounds in the parent's space, dropped on every mutation.
    bounds: OnceLock<BoundingBox>,
}

impl Shape {
    fn from_kind(kind: ShapeKind) -> Shape {
        Shape {
            transform: Transform::identity(),
            kind,
            bounds: OnceLock::new(),
        }
    }

    /// Leaf shape with the default material and a fresh id.
    pub fn primitive(geometry: impl Into<Primitive>) -> Shape {
        Shape::from_kind(ShapeKind::Primitive {
            geometry: geometry.into(),
            material: Material::default(),
            id: ShapeId::next(),
        })
    }

    pub fn sphere() -> Shape {
        Shape::primitive(Sphere)
    }

    pub fn plane() -> Shape {
        Shape::primitive(Plane)
    }

    pub fn cube() -> Shape {
        Shape::primitive(Cube)
    }

    pub fn cylinder() -> Shape {
        Shape::primitive(Cylinder)
    }

    pub fn cone() -> Shape {
        Shape::primitive(Cone)
    }

    pub fn triangle(p1: WorldPoint, p2: WorldPoint, p3: WorldPoint) -> Shape {
        Shape::primitive(Triangle::new(p1, p2, p3))
    }

    pub fn group(children: impl IntoIterator<Item = Shape>) -> Shape {
        Shape::from_kind(ShapeKind::Group(Group::new(children)))
    }

    pub fn csg(operation: CsgOperation, left: Shape, right: Shape) -> Shape {
        Shape::from_kind(ShapeKind::Csg(Box::new(Csg::new(operation, left, right))))
    }

    pub fn union(left: Shape, right: Shape) -> Shape {
        Shape::csg(CsgOperation::Union, left, right)
    }

    pub fn intersection(left: Shape, right: Shape) -> Shape {
        Shape::csg(CsgOperation::Intersection, left, right)
    }

    pub fn difference(left: Shape, right: Shape) -> Shape {
        Shape::csg(CsgOperation::Difference, left, right)
    }

    pub fn with_transform(mut self, transform: Transform) -> Shape {
        self.set_transform(transform);
        self
    }

    pub fn with_material(mut self, material: Material) -> Shape {
        self.set_material(material);
        self
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.bounds = OnceLock::new();
    }

    /// Sets the material of every leaf below this shape.
    pub fn set_material(&mut self, material: Material) {
        match &mut self.kind {
            ShapeKind::Primitive { material: m, .. } => *m = material,
            ShapeKind::Group(group) => {
                for child in group.children_mut() {
                    child.set_material(material.clone());
                }
            }
            ShapeKind::Csg(csg) => {
                for operand in csg.operands_mut() {
                    operand.set_material(material.clone());
                }
            }
        }
    }

    /// Appends a child to a group shape.
    ///
    /// Panics if the shape is not a group.
    pub fn add(&mut self, child: Shape) {
        match &mut self.kind {
            ShapeKind::Group(group) => group.add(child),
            _ => panic!("Only groups can have children added"),
        }
        self.bounds = OnceLock::new();
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Material of the first leaf, None for a shape without leaves.
    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            ShapeKind::Primitive { material, .. } => Some(material),
            ShapeKind::Group(group) => group.children().iter().find_map(Shape::material),
            ShapeKind::Csg(csg) => csg.left().material(),
        }
    }

    /// Id of a leaf shape.
    pub fn id(&self) -> Option<ShapeId> {
        match &self.kind {
            ShapeKind::Primitive { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Direct children, the two operands for CSG.
    pub fn children(&self) -> &[Shape] {
        match &self.kind {
            ShapeKind::Primitive { .. } => &[],
            ShapeKind::Group(group) => group.children(),
            ShapeKind::Csg(csg) => csg.operands(),
        }
    }

    /// Conservative bounds of the shape in its parent's space.
    pub fn bounding_box(&self) -> BoundingBox {
        *self.bounds.get_or_init(|| {
            let local = match &self.kind {
                ShapeKind::Primitive { geometry, .. } => geometry.bounding_box(),
                ShapeKind::Group(group) => group.bounding_box(),
                ShapeKind::Csg(csg) => csg.bounding_box(),
            };
            let bounds = local.transform(self.transform.matrix());
            tracing::trace!(?bounds, "Computed shape bounds");
            bounds
        })
    }

    /// False if the ray's line certainly misses the shape.
    pub fn maybe_hits(&self, ray: &Ray) -> bool {
        self.bounding_box().maybe_hits(ray)
    }

    /// All hits of the ray's line with the shape, in no particular order.
    pub fn intersect(&self, ray: &Ray) -> Vec<RawHit<'_>> {
        let mut hits = Vec::new();
        self.collect_hits(ray, &mut hits);
        hits
    }

    pub(crate) fn collect_hits<'a>(&'a self, ray: &Ray, out: &mut Vec<RawHit<'a>>) {
        let start = out.len();
        let local_ray = self.transform.ray_to_local(ray);
        match &self.kind {
            ShapeKind::Primitive {
                geometry,
                material,
                id,
            } => out.extend(geometry.intersect(&local_ray).into_iter().map(|hit| RawHit {
                t: hit.t,
                normal: hit.normal,
                material,
                shape: *id,
            })),
            ShapeKind::Group(group) => {
                if !self.maybe_hits(ray) {
                    return;
                }
                for child in group.children() {
                    child.collect_hits(&local_ray, out);
                }
            }
            ShapeKind::Csg(csg) => csg.collect_hits(&local_ray, out),
        }
        for hit in &mut out[start..] {
            hit.normal = self.transform.normal_to_world(&hit.normal);
        }
    }

    pub fn statistics(&self) -> SceneStats {
        SceneStats::of(self)
    }
}
