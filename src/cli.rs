use std::{f64::consts::PI, num::NonZeroU32, path::PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use miniray::{
    Camera, Color, Light, Material, Pattern, RenderSettings, Shape, World,
    geometry::{Transform, WorldPoint, WorldVector},
    material::refractive_index,
    render,
    scene::mesh,
    util::{BLACK, WHITE},
};

#[derive(Parser)]
#[command(name = "miniray-cli")]
#[command(about = "Renders one of the built in scenes to a PNG file", long_about = None)]
struct Cli {
    /// Image width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f64,

    /// Reflection and refraction recursion limit
    #[arg(long)]
    max_bounces: Option<u32>,

    /// Rows rendered by a worker at a time
    #[arg(long, default_value_t = NonZeroU32::new(16).unwrap_or(NonZeroU32::MIN))]
    band_height: NonZeroU32,

    #[arg(long, value_enum, default_value_t = SceneChoice::Csg)]
    scene: SceneChoice,

    /// Wavefront OBJ file, required by the mesh scene
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Output PNG file
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SceneChoice {
    /// Dice made from a cube with spherical pips carved out
    Csg,
    /// Nested glass spheres over a checkered floor
    Refraction,
    /// Triangle mesh loaded from `--obj`
    Mesh,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if !(cli.fov > 0.0 && cli.fov < 180.0) {
        bail!("Field of view must be between 0 and 180 degrees, got {}", cli.fov);
    }
    if cli.width == 0 || cli.height == 0 {
        bail!("Image size must be non-zero");
    }

    let world = match cli.scene {
        SceneChoice::Csg => csg_scene()?,
        SceneChoice::Refraction => refraction_scene()?,
        SceneChoice::Mesh => {
            let Some(path) = &cli.obj else {
                bail!("The mesh scene needs an OBJ file, pass it with --obj");
            };
            mesh_scene(mesh::group_from_obj(path).with_context(|| {
                format!("Loading mesh {}", path.display())
            })?)?
        }
    };

    let camera = Camera::builder()
        .hsize(cli.width)
        .vsize(cli.height)
        .field_of_view(cli.fov * PI / 180.0)
        .transform(Transform::view_transform(
            WorldPoint::new(0.0, 2.5, -6.0),
            WorldPoint::new(0.0, 0.5, 0.0),
            WorldVector::y(),
        )?)
        .build();

    let settings = RenderSettings {
        max_bounces: cli.max_bounces.unwrap_or(world.max_bounces()),
        band_height: cli.band_height,
        ..Default::default()
    };

    let bar = ProgressBar::no_length();
    let image = render(&world, &camera, &settings, |progress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.finished as u64);
    })?;
    bar.finish();

    image
        .save(&cli.output)
        .with_context(|| format!("Writing {}", cli.output.display()))?;
    tracing::info!(output = %cli.output.display(), "Saved image");

    Ok(())
}

fn checkered_floor() -> miniray::Result<Shape> {
    Ok(Shape::plane().with_material(
        Material::builder()
            .pattern(Pattern::checker(Color::new(0.9, 0.9, 0.9), Color::new(0.2, 0.2, 0.25)))
            .specular(0.0)
            .reflectivity(0.1)
            .build()?,
    ))
}

fn lights() -> Vec<Light> {
    vec![
        Light::new(WorldPoint::new(-8.0, 10.0, -10.0), Color::new(0.8, 0.8, 0.8)),
        Light::new(WorldPoint::new(6.0, 6.0, -4.0), Color::new(0.3, 0.3, 0.35)),
    ]
}

fn csg_scene() -> miniray::Result<World> {
    let ivory = Material::builder()
        .pattern(Color::new(0.95, 0.92, 0.85))
        .diffuse(0.8)
        .specular(0.4)
        .shininess(80.0)
        .build()?;
    let pip = |x: f64, y: f64, z: f64| -> miniray::Result<Shape> {
        Ok(Shape::sphere().with_transform(
            Transform::uniform_scaling(0.2)?.then(&Transform::translation(x, y, z)),
        ))
    };

    let pips = Shape::group([
        pip(0.0, 1.0, 0.0)?,
        pip(-0.4, 0.4, -1.0)?,
        pip(0.0, 0.0, -1.0)?,
        pip(0.4, -0.4, -1.0)?,
        pip(-1.0, 0.4, 0.4)?,
        pip(-1.0, -0.4, -0.4)?,
    ]);
    let rounded = Shape::intersection(
        Shape::cube(),
        Shape::sphere().with_transform(Transform::uniform_scaling(1.5)?),
    );
    let mut die = Shape::difference(rounded, pips).with_transform(
        Transform::rotation_y(-0.5).then(&Transform::translation(0.0, 1.0, 0.0)),
    );
    die.set_material(ivory);

    let hollow_tube = Shape::difference(
        Shape::cylinder(),
        Shape::cylinder().with_transform(Transform::scaling(0.8, 1.1, 0.8)?),
    )
    .with_transform(
        Transform::scaling(0.6, 0.5, 0.6)?.then(&Transform::translation(2.2, 0.5, 0.8)),
    )
    .with_material(
        Material::builder()
            .pattern(Color::new(0.7, 0.3, 0.2))
            .reflectivity(0.3)
            .build()?,
    );

    Ok(World::builder()
        .shapes(vec![checkered_floor()?, die, hollow_tube])
        .lights(lights())
        .build())
}

fn refraction_scene() -> miniray::Result<World> {
    let glass = |index: f64, tint: Color| {
        Material::builder()
            .pattern(tint)
            .ambient(0.0)
            .diffuse(0.1)
            .specular(1.0)
            .shininess(300.0)
            .reflectivity(0.9)
            .transparency(0.9)
            .refractive_index(index)
            .build()
    };

    let outer = Shape::sphere()
        .with_transform(Transform::uniform_scaling(1.2)?.then(&Transform::translation(0.0, 1.2, 0.0)))
        .with_material(glass(refractive_index::GLASS, WHITE)?);
    let inner = Shape::sphere()
        .with_transform(Transform::uniform_scaling(0.6)?.then(&Transform::translation(0.0, 1.2, 0.0)))
        .with_material(glass(refractive_index::VACUUM, Color::new(0.9, 0.95, 1.0))?);
    let cone = Shape::cone()
        .with_transform(Transform::scaling(0.4, 0.7, 0.4)?.then(&Transform::translation(-2.2, 0.7, 1.0)))
        .with_material(glass(refractive_index::DIAMOND, Color::new(0.6, 0.9, 0.7))?);
    let wall = Shape::plane()
        .with_transform(Transform::rotation_x(PI / 2.0).then(&Transform::translation(0.0, 0.0, 6.0)))
        .with_material(
            Material::builder()
                .pattern(
                    Pattern::noise(
                        Pattern::stripe(Color::new(0.45, 0.2, 0.2), BLACK)
                            .with_transform(Transform::uniform_scaling(0.5)?),
                        0.3,
                    )
                    .with_transform(Transform::uniform_scaling(0.4)?),
                )
                .specular(0.0)
                .build()?,
        );

    Ok(World::builder()
        .shapes(vec![checkered_floor()?, wall, outer, inner, cone])
        .lights(lights())
        .max_bounces(6)
        .build())
}

fn mesh_scene(mut model: Shape) -> miniray::Result<World> {
    model.set_material(
        Material::builder()
            .pattern(Color::new(0.75, 0.8, 0.9))
            .specular(0.5)
            .reflectivity(0.15)
            .build()?,
    );
    tracing::info!(stats = %model.statistics(), "Mesh loaded");
    Ok(World::builder()
        .shapes(vec![checkered_floor()?, model])
        .lights(lights())
        .build())
}
