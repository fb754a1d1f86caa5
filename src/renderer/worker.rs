use image::RgbImage;

use crate::{
    camera::Camera, renderer::RenderSettings, renderer::machinery::Band, util::color_to_image,
    world::World,
};

/// Per-thread rendering state.
pub struct Worker {
    buffer: RgbImage,
}

impl Worker {
    pub fn new(width: u32, settings: &RenderSettings) -> Self {
        Self {
            buffer: RgbImage::new(width, settings.band_height.get()),
        }
    }

    /// Traces every pixel of the band into the worker's buffer, returns the rendered rows.
    pub fn render_band(
        &mut self,
        world: &World,
        camera: &Camera,
        settings: &RenderSettings,
        band: &Band,
    ) -> &RgbImage {
        for row in 0..band.height {
            for x in 0..camera.hsize() {
                let ray = camera.ray_for_pixel(x, band.y + row);
                let color = world.color_at_depth(&ray, settings.max_bounces);
                self.buffer.put_pixel(x, row, color_to_image(color));
            }
        }
        &self.buffer
    }
}
