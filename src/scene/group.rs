use crate::geometry::BoundingBox;

use super::Shape;

/// Ordered collection of shapes sharing one transform.
#[derive(Debug, Default)]
pub struct Group {
    children: Vec<Shape>,
}

impl Group {
    /// Below this many children the group doesn't bother with bounds and
    /// always reports itself as unbounded.
    pub const BOUNDS_THRESHOLD: usize = 5;

    pub fn new(children: impl IntoIterator<Item = Shape>) -> Group {
        Group {
            children: children.into_iter().collect(),
        }
    }

    pub fn add(&mut self, child: Shape) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub(super) fn children_mut(&mut self) -> &mut [Shape] {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Bounds in the group's own space.
    pub fn bounding_box(&self) -> BoundingBox {
        if self.children.len() < Self::BOUNDS_THRESHOLD {
            BoundingBox::unbounded()
        } else {
            self.children
                .iter()
                .fold(BoundingBox::empty(), |acc, child| acc.span(&child.bounding_box()))
        }
    }
}
