use crate::geometry::FloatType;

pub type Color = rgb::RGB<FloatType>;

pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
};
pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
};

/// Operations on colors as light intensities, that `rgb` doesn't provide.
pub trait ColorExt {
    /// Hadamard product, filters one light through another.
    fn component_mul(&self, rhs: &Self) -> Self;
    fn sqrt(&self) -> Self;
    fn is_black(&self) -> bool;
    fn approx_eq(&self, rhs: &Self, tolerance: FloatType) -> bool;
}

impl ColorExt for Color {
    fn component_mul(&self, rhs: &Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }

    fn sqrt(&self) -> Color {
        Color::new(self.r.sqrt(), self.g.sqrt(), self.b.sqrt())
    }

    fn is_black(&self) -> bool {
        *self == BLACK
    }

    fn approx_eq(&self, rhs: &Color, tolerance: FloatType) -> bool {
        (self.r - rhs.r).abs() <= tolerance
            && (self.g - rhs.g).abs() <= tolerance
            && (self.b - rhs.b).abs() <= tolerance
    }
}

/// Maps a 0-1 linear color to pixel type compatible with module image.
pub fn color_to_image(color: Color) -> image::Rgb<u8> {
    image::Rgb([
        (color.r * 255.0).round().clamp(0.0, 255.0) as u8,
        (color.g * 255.0).round().clamp(0.0, 255.0) as u8,
        (color.b * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
