use crate::geometry::{BoundingBox, Ray};

use super::{RawHit, Shape};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CsgOperation {
    Union,
    Intersection,
    /// Left minus right.
    Difference,
}

impl CsgOperation {
    /// Whether a hit on one operand is on the surface of the combined solid,
    /// given where the ray was just before reaching it.
    pub fn keeps(self, on_left: bool, in_left: bool, in_right: bool) -> bool {
        match self {
            CsgOperation::Union => (on_left && !in_right) || (!on_left && !in_left),
            CsgOperation::Intersection => (on_left && in_right) || (!on_left && in_left),
            CsgOperation::Difference => (on_left && !in_right) || (!on_left && in_left),
        }
    }
}

/// Boolean combination of two solids.
#[derive(Debug)]
pub struct Csg {
    operation: CsgOperation,
    operands: [Shape; 2],
}

impl Csg {
    pub fn new(operation: CsgOperation, left: Shape, right: Shape) -> Csg {
        Csg {
            operation,
            operands: [left, right],
        }
    }

    pub fn operation(&self) -> CsgOperation {
        self.operation
    }

    pub fn left(&self) -> &Shape {
        &self.operands[0]
    }

    pub fn right(&self) -> &Shape {
        &self.operands[1]
    }

    pub fn operands(&self) -> &[Shape] {
        &self.operands
    }

    pub(super) fn operands_mut(&mut self) -> &mut [Shape] {
        &mut self.operands
    }

    /// Union of the operand bounds, also valid for intersection and difference.
    pub fn bounding_box(&self) -> BoundingBox {
        self.left().bounding_box().span(&self.right().bounding_box())
    }

    /// Walks the hits of both operands in order, tracking whether the ray is inside
    /// each of them, and keeps those on the combined surface.
    pub(super) fn collect_hits<'a>(&'a self, ray: &Ray, out: &mut Vec<RawHit<'a>>) {
        let mut tagged: Vec<(bool, RawHit<'a>)> = Vec::new();
        for (operand, on_left) in self.operands.iter().zip([true, false]) {
            tagged.extend(operand.intersect(ray).into_iter().map(|hit| (on_left, hit)));
        }
        tagged.sort_by(|a, b| a.1.t.total_cmp(&b.1.t));

        let mut in_left = false;
        let mut in_right = false;
        for (on_left, hit) in tagged {
            if self.operation.keeps(on_left, in_left, in_right) {
                out.push(hit);
            }
            if on_left {
                in_left = !in_left;
            } else {
                in_right = !in_right;
            }
        }
    }
}
