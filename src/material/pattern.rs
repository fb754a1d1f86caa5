use std::sync::LazyLock;

use noise::{NoiseFn as _, Perlin};

use crate::{
    geometry::{FloatType, Transform, WorldPoint},
    util::{Color, WHITE},
};

static PERLIN: LazyLock<Perlin> = LazyLock::new(|| Perlin::new(Perlin::DEFAULT_SEED));

/// Color as a function of position.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    Solid(Color),
    /// Alternates every unit of x.
    Stripe(Color, Color),
    /// Blends from the first color to the second and back over two units of x.
    Gradient(Color, Color),
    /// Alternates with every unit of distance from the y axis.
    Ring(Color, Color),
    /// 3D checker board of unit cubes.
    Checker(Color, Color),
    /// Source pattern evaluated at a point displaced by Perlin noise.
    /// The noise has unit frequency in this pattern's space, so its transform sets the scale.
    Noise {
        magnitude: FloatType,
        source: Box<Pattern>,
    },
}

/// Pattern placed in space by its own transform.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    kind: PatternKind,
    transform: Transform,
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Pattern {
        Pattern {
            kind,
            transform: Transform::identity(),
        }
    }

    pub fn solid(color: Color) -> Pattern {
        Pattern::new(PatternKind::Solid(color))
    }

    pub fn stripe(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Stripe(a, b))
    }

    pub fn gradient(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Gradient(a, b))
    }

    pub fn ring(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Ring(a, b))
    }

    pub fn checker(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Checker(a, b))
    }

    pub fn noise(source: Pattern, magnitude: FloatType) -> Pattern {
        Pattern::new(PatternKind::Noise {
            magnitude,
            source: Box::new(source),
        })
    }

    pub fn with_transform(self, transform: Transform) -> Pattern {
        Pattern { transform, ..self }
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn color_at(&self, point: &WorldPoint) -> Color {
        let p = self.transform.inverse().transform_point(point);
        let (a, b, mix) = match &self.kind {
            PatternKind::Solid(color) => return *color,
            PatternKind::Noise { magnitude, source } => {
                let displaced = WorldPoint::new(
                    p.x + magnitude * PERLIN.get([p.x, p.y, p.z]),
                    p.y + magnitude * PERLIN.get([p.y, p.z, p.x]),
                    p.z + magnitude * PERLIN.get([p.z, p.x, p.y]),
                );
                return source.color_at(&self.transform.transform_point(&displaced));
            }
            PatternKind::Stripe(a, b) => (a, b, parity(p.x.floor())),
            PatternKind::Gradient(a, b) => {
                let saw = p.x - 2.0 * (p.x / 2.0).floor();
                (a, b, 1.0 - (1.0 - saw).abs())
            }
            PatternKind::Ring(a, b) => (a, b, parity(p.x.hypot(p.z).floor())),
            PatternKind::Checker(a, b) => (a, b, parity(p.x.floor() + p.y.floor() + p.z.floor())),
        };

        if mix <= 0.0 {
            *a
        } else if mix >= 1.0 {
            *b
        } else {
            *a + (*b - *a) * mix
        }
    }
}

/// 0 for even, 1 for odd whole numbers.
fn parity(whole: FloatType) -> FloatType {
    whole.rem_euclid(2.0)
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::solid(WHITE)
    }
}

impl From<Color> for Pattern {
    fn from(color: Color) -> Self {
        Pattern::solid(color)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::{BLACK, ColorExt as _};
    use assert2::assert;
    use test_case::test_case;

    fn at(pattern: &Pattern, x: FloatType, y: FloatType, z: FloatType) -> Color {
        pattern.color_at(&WorldPoint::new(x, y, z))
    }

    #[test_case(0.0, 0.0, 0.0, WHITE)]
    #[test_case(0.0, 1.0, 0.0, WHITE ; "constant_in_y")]
    #[test_case(0.0, 0.0, 2.0, WHITE ; "constant_in_z")]
    #[test_case(0.9, 0.0, 0.0, WHITE)]
    #[test_case(1.0, 0.0, 0.0, BLACK)]
    #[test_case(-0.1, 0.0, 0.0, BLACK)]
    #[test_case(-1.0, 0.0, 0.0, BLACK)]
    #[test_case(-1.1, 0.0, 0.0, WHITE)]
    fn stripe(x: FloatType, y: FloatType, z: FloatType, expected: Color) {
        assert!(at(&Pattern::stripe(WHITE, BLACK), x, y, z) == expected);
    }

    #[test]
    fn gradient_goes_there_and_back() {
        let p = Pattern::gradient(WHITE, BLACK);
        assert!(at(&p, 0.0, 0.0, 0.0) == WHITE);
        assert!(at(&p, 0.25, 0.0, 0.0).approx_eq(&Color::new(0.75, 0.75, 0.75), 1e-12));
        assert!(at(&p, 0.5, 0.0, 0.0).approx_eq(&Color::new(0.5, 0.5, 0.5), 1e-12));
        assert!(at(&p, 1.0, 0.0, 0.0) == BLACK);
        assert!(at(&p, 1.5, 0.0, 0.0).approx_eq(&Color::new(0.5, 0.5, 0.5), 1e-12));
        assert!(at(&p, 2.0, 0.0, 0.0) == WHITE);
        assert!(at(&p, -0.5, 0.0, 0.0).approx_eq(&Color::new(0.5, 0.5, 0.5), 1e-12));
    }

    #[test_case(0.0, 0.0, WHITE)]
    #[test_case(1.0, 0.0, BLACK)]
    #[test_case(0.0, 1.0, BLACK)]
    #[test_case(0.708, 0.708, BLACK ; "diagonal")]
    #[test_case(2.0, 0.0, WHITE)]
    fn ring(x: FloatType, z: FloatType, expected: Color) {
        assert!(at(&Pattern::ring(WHITE, BLACK), x, 0.0, z) == expected);
    }

    #[test_case(0.0, 0.0, 0.0, WHITE)]
    #[test_case(0.99, 0.0, 0.0, WHITE)]
    #[test_case(1.01, 0.0, 0.0, BLACK)]
    #[test_case(0.0, 1.01, 0.0, BLACK)]
    #[test_case(0.0, 0.0, 1.01, BLACK)]
    #[test_case(-0.5, 0.5, 0.0, BLACK)]
    #[test_case(-0.5, -0.5, 0.5, WHITE)]
    fn checker(x: FloatType, y: FloatType, z: FloatType, expected: Color) {
        assert!(at(&Pattern::checker(WHITE, BLACK), x, y, z) == expected);
    }

    #[test]
    fn transform_is_applied_once() {
        let p = Pattern::stripe(WHITE, BLACK).with_transform(Transform::scaling(2.0, 2.0, 2.0).unwrap());
        assert!(at(&p, 1.5, 0.0, 0.0) == WHITE);
        assert!(at(&p, 2.5, 0.0, 0.0) == BLACK);

        let p = Pattern::stripe(WHITE, BLACK).with_transform(Transform::translation(0.5, 0.0, 0.0));
        assert!(at(&p, 1.0, 0.0, 0.0) == WHITE);
        assert!(at(&p, 1.6, 0.0, 0.0) == BLACK);
    }

    #[test]
    fn solid_ignores_position() {
        let c = Color::new(0.1, 0.2, 0.3);
        let p = Pattern::from(c);
        assert!(at(&p, 12.0, -3.0, 0.5) == c);
    }

    #[test]
    fn noise_without_magnitude_is_the_source() {
        let source = Pattern::stripe(WHITE, BLACK).with_transform(Transform::translation(0.3, 0.0, 0.0));
        let noisy = Pattern::noise(source.clone(), 0.0)
            .with_transform(Transform::uniform_scaling(0.25).unwrap());
        for i in 0..200 {
            let x = i as FloatType * 0.037 - 3.0;
            assert!(at(&noisy, x, 0.4, -1.3) == at(&source, x, 0.4, -1.3));
        }
    }

    #[test]
    fn noise_displaces_stripe_edges() {
        let source = Pattern::stripe(WHITE, BLACK);
        let noisy = Pattern::noise(source.clone(), 0.8);
        let mut changed = 0;
        for i in 0..1000 {
            let x = i as FloatType * 0.01;
            let color = at(&noisy, x, 0.37, 0.61);
            assert!(color == WHITE || color == BLACK);
            assert!(color == at(&noisy, x, 0.37, 0.61));
            if color != at(&source, x, 0.37, 0.61) {
                changed += 1;
            }
        }
        assert!(changed > 0);
        assert!(changed < 1000);
    }
}
