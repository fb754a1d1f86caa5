mod machinery;
mod worker;

pub use crate::renderer::machinery::{RenderProgress, render};

use std::num::{NonZeroU32, NonZeroUsize};

use crate::world::DEFAULT_MAX_BOUNCES;

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    /// Bounce budget for each primary ray, overrides the world's own.
    pub max_bounces: u32,
    /// Rows per unit of work handed to a worker thread.
    pub band_height: NonZeroU32,
    pub threads: NonZeroUsize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            max_bounces: DEFAULT_MAX_BOUNCES,
            band_height: NonZeroU32::new(16).unwrap_or(NonZeroU32::MIN),
            threads: NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN),
        }
    }
}
