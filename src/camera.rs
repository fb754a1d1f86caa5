use assert2::assert;
use bon::bon;

use crate::geometry::{FloatType, Ray, Transform, WorldPoint};

/// Pinhole camera looking down -z of its own space, with the image plane at z = -1.
#[derive(Clone, Debug)]
pub struct Camera {
    hsize: u32,
    vsize: u32,
    field_of_view: FloatType,
    /// View transform, maps world space to camera space.
    transform: Transform,

    half_width: FloatType,
    half_height: FloatType,
    /// Size of a pixel on the image plane
    pixel_size: FloatType,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        hsize: u32,
        vsize: u32,
        /// Horizontal or vertical angle of view in radians, whichever side of the image is longer.
        field_of_view: FloatType,
        #[builder(default = Transform::identity())] transform: Transform,
    ) -> Self {
        assert!(hsize > 0);
        assert!(vsize > 0);
        assert!(field_of_view > 0.0);
        assert!(field_of_view < std::f64::consts::PI);

        let half_view = (field_of_view / 2.0).tan();
        let aspect = hsize as FloatType / vsize as FloatType;
        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        Camera {
            hsize,
            vsize,
            field_of_view,
            transform,
            half_width,
            half_height,
            pixel_size: half_width * 2.0 / hsize as FloatType,
        }
    }
}

impl Camera {
    pub fn hsize(&self) -> u32 {
        self.hsize
    }

    pub fn vsize(&self) -> u32 {
        self.vsize
    }

    pub fn field_of_view(&self) -> FloatType {
        self.field_of_view
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn pixel_size(&self) -> FloatType {
        self.pixel_size
    }

    /// Ray from the camera through the center of pixel (`x`, `y`), `y` going down.
    pub fn ray_for_pixel(&self, x: u32, y: u32) -> Ray {
        let world_x = self.half_width - (x as FloatType + 0.5) * self.pixel_size;
        let world_y = self.half_height - (y as FloatType + 0.5) * self.pixel_size;

        let to_world = self.transform.inverse();
        let pixel = to_world.transform_point(&WorldPoint::new(world_x, world_y, -1.0));
        let origin = to_world.transform_point(&WorldPoint::origin());
        Ray::new(origin, (pixel - origin).normalize())
    }
}
