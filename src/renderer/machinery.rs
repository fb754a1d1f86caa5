use std::{
    ops::Deref as _,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Instant,
};

use image::{GenericImage, GenericImageView, RgbImage};

use crate::{
    camera::Camera,
    renderer::{RenderSettings, worker::Worker},
    world::World,
};

/// Horizontal strip of image rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Band {
    pub y: u32,
    pub height: u32,
}

impl Band {
    /// Cuts `image_height` rows into bands of `band_height`, the last one possibly shorter.
    fn split(image_height: u32, band_height: u32) -> Vec<Band> {
        (0..image_height)
            .step_by(band_height as usize)
            .map(|y| Band {
                y,
                height: band_height.min(image_height - y),
            })
            .collect()
    }
}

/// Number of finished and total bands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderProgress {
    pub finished: usize,
    pub total: usize,
}

impl RenderProgress {
    pub fn percent(&self) -> f32 {
        100.0 * (self.finished as f32) / (self.total as f32)
    }

    pub fn is_finished(&self) -> bool {
        self.finished == self.total
    }
}

struct RenderState {
    image: Mutex<RgbImage>,

    bands: Vec<Band>,
    next_band_index: AtomicUsize,
    finished_bands: AtomicUsize,
}

impl RenderState {
    fn get_next_band(&self) -> Option<&Band> {
        let id = self.next_band_index.fetch_add(1, Ordering::AcqRel);
        self.bands.get(id)
    }
}

/// Renders the world in parallel and blocks until the image is complete.
///
/// `progress_callback` is called from the worker threads after every finished band.
pub fn render<F>(
    world: &World,
    camera: &Camera,
    settings: &RenderSettings,
    progress_callback: F,
) -> anyhow::Result<RgbImage>
where
    F: Fn(RenderProgress) + Sync,
{
    let (width, height) = (camera.hsize(), camera.vsize());
    let bands = Band::split(height, settings.band_height.get());
    let total = bands.len();
    let thread_count = settings.threads.get().min(total);

    tracing::info!(
        width,
        height,
        bands = total,
        threads = thread_count,
        max_bounces = settings.max_bounces,
        scene = %world.root().statistics(),
        "Rendering"
    );
    let start = Instant::now();

    let state = RenderState {
        image: Mutex::new(RgbImage::new(width, height)),
        bands,
        next_band_index: AtomicUsize::new(0),
        finished_bands: AtomicUsize::new(0),
    };

    thread::scope(|scope| -> anyhow::Result<()> {
        let handles = (0..thread_count)
            .map(|worker_id| {
                let state = &state;
                let progress_callback = &progress_callback;

                thread::Builder::new()
                    .name(format!("worker{worker_id}"))
                    .spawn_scoped(scope, move || -> anyhow::Result<()> {
                        let mut worker = Worker::new(width, settings);

                        while let Some(band) = state.get_next_band() {
                            let buffer = worker.render_band(world, camera, settings, band);
                            state
                                .image
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .copy_from(
                                    buffer.view(0, 0, width, band.height).deref(),
                                    0,
                                    band.y,
                                )?;

                            let finished = state.finished_bands.fetch_add(1, Ordering::AcqRel) + 1;
                            tracing::trace!(worker_id, y = band.y, "Finished band");
                            progress_callback(RenderProgress { finished, total });
                        }
                        Ok(())
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for handle in handles {
            handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
        }
        Ok(())
    })?;

    tracing::info!(elapsed = ?start.elapsed(), "Render finished");
    Ok(state.image.into_inner().unwrap_or_else(PoisonError::into_inner))
}
