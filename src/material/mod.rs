mod pattern;

pub use pattern::{Pattern, PatternKind};

use bon::bon;

use crate::{
    error::{Error, Result},
    geometry::{FloatType, WorldPoint, WorldVector, reflect},
    util::{Color, ColorExt as _},
};

/// Common refractive indices.
pub mod refractive_index {
    use crate::geometry::FloatType;

    pub const VACUUM: FloatType = 1.0;
    pub const AIR: FloatType = 1.00029;
    pub const WATER: FloatType = 1.333;
    pub const GLASS: FloatType = 1.52;
    pub const DIAMOND: FloatType = 2.417;
}

/// Point light source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    pub position: WorldPoint,
    pub intensity: Color,
}

impl Light {
    pub fn new(position: WorldPoint, intensity: Color) -> Light {
        Light {
            position,
            intensity,
        }
    }
}

/// Phong surface parameters, plus how the surface reflects and transmits secondary rays.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pattern: Pattern,
    ambient: FloatType,
    diffuse: FloatType,
    specular: FloatType,
    shininess: FloatType,
    reflectivity: FloatType,
    transparency: FloatType,
    refractive_index: FloatType,
    casts_shadow: bool,
}

#[bon]
impl Material {
    #[builder]
    pub fn new(
        #[builder(into, default)] pattern: Pattern,
        #[builder(default = 0.1)] ambient: FloatType,
        #[builder(default = 0.9)] diffuse: FloatType,
        #[builder(default = 0.9)] specular: FloatType,
        #[builder(default = 200.0)] shininess: FloatType,
        #[builder(default = 0.0)] reflectivity: FloatType,
        #[builder(default = 0.0)] transparency: FloatType,
        #[builder(default = refractive_index::VACUUM)] refractive_index: FloatType,
        #[builder(default = true)] casts_shadow: bool,
    ) -> Result<Self> {
        check("ambient", ambient, ambient >= 0.0)?;
        check("diffuse", diffuse, diffuse >= 0.0)?;
        check("specular", specular, specular >= 0.0)?;
        check("shininess", shininess, shininess >= 0.0)?;
        check("reflectivity", reflectivity, (0.0..=1.0).contains(&reflectivity))?;
        check("transparency", transparency, (0.0..=1.0).contains(&transparency))?;
        check("refractive_index", refractive_index, refractive_index >= 1.0)?;

        Ok(Material {
            pattern,
            ambient,
            diffuse,
            specular,
            shininess,
            reflectivity,
            transparency,
            refractive_index,
            casts_shadow,
        })
    }
}

fn check(parameter: &'static str, value: FloatType, valid: bool) -> Result<()> {
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidMaterial { parameter, value })
    }
}

impl Default for Material {
    fn default() -> Self {
        Material {
            pattern: Pattern::default(),
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
            reflectivity: 0.0,
            transparency: 0.0,
            refractive_index: refractive_index::VACUUM,
            casts_shadow: true,
        }
    }
}

impl Material {
    /// Fully transparent glass.
    pub fn glass() -> Material {
        Material {
            transparency: 1.0,
            refractive_index: refractive_index::GLASS,
            ..Default::default()
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn ambient(&self) -> FloatType {
        self.ambient
    }

    pub fn diffuse(&self) -> FloatType {
        self.diffuse
    }

    pub fn specular(&self) -> FloatType {
        self.specular
    }

    pub fn shininess(&self) -> FloatType {
        self.shininess
    }

    pub fn reflectivity(&self) -> FloatType {
        self.reflectivity
    }

    pub fn transparency(&self) -> FloatType {
        self.transparency
    }

    pub fn refractive_index(&self) -> FloatType {
        self.refractive_index
    }

    pub fn casts_shadow(&self) -> bool {
        self.casts_shadow
    }

    /// Phong shading of a single light at a surface point.
    ///
    /// `visible_light` is the light's intensity after passing through whatever lies
    /// between the light and the point. Diffuse and specular terms use it, while the
    /// ambient term always uses the full intensity.
    pub fn lighting(
        &self,
        light: &Light,
        point: &WorldPoint,
        eye: &WorldVector,
        normal: &WorldVector,
        visible_light: &Color,
    ) -> Color {
        let surface = self.pattern.color_at(point);
        let ambient = surface.component_mul(&light.intensity) * self.ambient;
        if visible_light.is_black() {
            return ambient;
        }

        let effective = surface.component_mul(visible_light);
        let to_light = (light.position - point).normalize();

        let light_dot_normal = to_light.dot(normal);
        if light_dot_normal < 0.0 {
            // Light is on the other side of the surface
            return ambient;
        }
        let diffuse = effective * (self.diffuse * light_dot_normal);

        let reflect_dot_eye = reflect(&-to_light, normal).dot(eye);
        if reflect_dot_eye <= 0.0 {
            return ambient + diffuse;
        }
        let specular = *visible_light * (self.specular * reflect_dot_eye.powf(self.shininess));

        ambient + diffuse + specular
    }
}
