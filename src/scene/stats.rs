use std::fmt::Display;

use super::{Shape, ShapeKind};

/// Shape tree summary, for logging before a render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub primitives: usize,
    pub groups: usize,
    pub csg_nodes: usize,
    /// Largest number of children in a single group.
    pub max_fan_out: usize,
    /// Number of nodes on the longest root to leaf path.
    pub depth: usize,
}

impl SceneStats {
    pub fn of(shape: &Shape) -> SceneStats {
        let mut stats = SceneStats::default();
        stats.visit(shape, 1);
        stats
    }

    fn visit(&mut self, shape: &Shape, depth: usize) {
        self.depth = self.depth.max(depth);
        match shape.kind() {
            ShapeKind::Primitive { .. } => self.primitives += 1,
            ShapeKind::Group(group) => {
                self.groups += 1;
                self.max_fan_out = self.max_fan_out.max(group.len());
            }
            ShapeKind::Csg(_) => self.csg_nodes += 1,
        }
        for child in shape.children() {
            self.visit(child, depth + 1);
        }
    }
}

impl Display for SceneStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} primitives, {} groups (max {} children), {} CSG nodes, depth {}",
            self.primitives, self.groups, self.max_fan_out, self.csg_nodes, self.depth
        )
    }
}
