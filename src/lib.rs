mod camera;
pub mod error;
pub mod geometry;
pub mod intersection;
pub mod material;
mod renderer;
pub mod scene;
pub mod util;
pub mod world;

pub use crate::renderer::{RenderProgress, RenderSettings, render};
pub use camera::Camera;
pub use error::{Error, Result};
pub use material::{Light, Material, Pattern};
pub use scene::Shape;
pub use util::Color;
pub use world::World;
