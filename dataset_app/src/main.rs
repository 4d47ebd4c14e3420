//! Dataset generator
//!
//! Renders `num_images` random scenes and writes one image and one scene
//! record per output index.
//!
//! ```text
//! render_images --properties_json data/properties.json --num_images 100 --seed 7
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use scene_composer::foundation::logging;
use scene_composer::prelude::*;
use scene_composer::render::RenderDevice;

/// Generate a labeled synthetic scene dataset
///
/// Unset flags take their value from `--config` if given, otherwise from the
/// built-in defaults shown below.
#[derive(Debug, Parser)]
#[command(name = "render_images", version, about)]
struct Args {
    /// TOML or RON file with a full generator configuration
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base scene file [default: data/base_scene.blend]
    #[arg(long = "base_scene_blendfile", value_name = "FILE")]
    base_scene_blendfile: Option<PathBuf>,

    /// Property catalog JSON [default: data/properties.json]
    #[arg(long = "properties_json", value_name = "FILE")]
    properties_json: Option<PathBuf>,

    /// Shape asset directory [default: data/shapes]
    #[arg(long = "shape_dir", value_name = "DIR")]
    shape_dir: Option<PathBuf>,

    /// Material asset directory [default: data/materials]
    #[arg(long = "material_dir", value_name = "DIR")]
    material_dir: Option<PathBuf>,

    /// Image output directory [default: ../output/images/]
    #[arg(long = "output_image_dir", value_name = "DIR")]
    output_image_dir: Option<PathBuf>,

    /// Scene record output directory [default: ../output/scenes/]
    #[arg(long = "output_scene_dir", value_name = "DIR")]
    output_scene_dir: Option<PathBuf>,

    /// First output index [default: 0]
    #[arg(long = "start_index")]
    start_index: Option<u32>,

    /// Output indices stop before this value [default: 5]
    #[arg(long = "num_images")]
    num_images: Option<u32>,

    /// Image width [default: 320]
    #[arg(long = "width")]
    width: Option<u32>,

    /// Image height [default: 240]
    #[arg(long = "height")]
    height: Option<u32>,

    /// Camera position jitter [default: 0.5]
    #[arg(long = "camera_jitter")]
    camera_jitter: Option<f32>,

    /// Key light position jitter [default: 1.0]
    #[arg(long = "key_light_jitter")]
    key_light_jitter: Option<f32>,

    /// Fill light position jitter [default: 1.0]
    #[arg(long = "fill_light_jitter")]
    fill_light_jitter: Option<f32>,

    /// Back light position jitter [default: 1.0]
    #[arg(long = "back_light_jitter")]
    back_light_jitter: Option<f32>,

    /// Fewest objects per scene [default: 3]
    #[arg(long = "min_objects")]
    min_objects: Option<usize>,

    /// Most objects per scene [default: 10]
    #[arg(long = "max_objects")]
    max_objects: Option<usize>,

    /// Minimum free ground between objects [default: 0.25]
    #[arg(long = "min_dist")]
    min_dist: Option<f32>,

    /// Minimum offset along each cardinal direction [default: 0.4]
    #[arg(long = "margin")]
    margin: Option<f32>,

    /// Minimum visible pixels per object [default: 200]
    #[arg(long = "min_pixels_per_object")]
    min_pixels_per_object: Option<u32>,

    /// Position samples per object before replacing all objects [default: 50]
    #[arg(long = "max_retries")]
    max_retries: Option<u32>,

    /// Placement restarts per image before giving up [default: 100]
    #[arg(long = "max_scene_attempts")]
    max_scene_attempts: Option<u32>,

    /// Threshold of the directional relationship test [default: 0.2]
    #[arg(long = "relationship_eps")]
    relationship_eps: Option<f32>,

    /// Samples per pixel [default: 512]
    #[arg(long = "render_num_samples")]
    render_num_samples: Option<u32>,

    /// Minimum transparent bounces [default: 8]
    #[arg(long = "render_min_bounces")]
    render_min_bounces: Option<u32>,

    /// Maximum transparent bounces [default: 8]
    #[arg(long = "render_max_bounces")]
    render_max_bounces: Option<u32>,

    /// Render tile size [default: 256]
    #[arg(long = "render_tile_size")]
    render_tile_size: Option<u32>,

    /// Render on the CPU instead of the GPU
    #[arg(long = "use_cpu")]
    use_cpu: bool,

    /// Base seed; image i uses seed + i [default: random]
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

macro_rules! override_with {
    ($target:expr, $value:expr) => {
        if let Some(value) = $value {
            $target = value;
        }
    };
}

impl Args {
    /// Apply every flag that was given on top of `config`
    fn apply(self, config: &mut GeneratorConfig) {
        let paths = &mut config.paths;
        override_with!(paths.base_scene_blendfile, self.base_scene_blendfile);
        override_with!(paths.properties_json, self.properties_json);
        override_with!(paths.shape_dir, self.shape_dir);
        override_with!(paths.material_dir, self.material_dir);
        override_with!(paths.output_image_dir, self.output_image_dir);
        override_with!(paths.output_scene_dir, self.output_scene_dir);

        let render = &mut config.render;
        override_with!(render.width, self.width);
        override_with!(render.height, self.height);
        override_with!(render.num_samples, self.render_num_samples);
        override_with!(render.min_bounces, self.render_min_bounces);
        override_with!(render.max_bounces, self.render_max_bounces);
        override_with!(render.tile_size, self.render_tile_size);
        if self.use_cpu {
            render.device = RenderDevice::Cpu;
        }

        let jitter = &mut config.jitter;
        override_with!(jitter.camera, self.camera_jitter);
        override_with!(jitter.key_light, self.key_light_jitter);
        override_with!(jitter.fill_light, self.fill_light_jitter);
        override_with!(jitter.back_light, self.back_light_jitter);

        let placement = &mut config.placement;
        override_with!(placement.min_objects, self.min_objects);
        override_with!(placement.max_objects, self.max_objects);
        override_with!(placement.min_dist, self.min_dist);
        override_with!(placement.margin, self.margin);
        override_with!(placement.max_retries, self.max_retries);

        override_with!(config.visibility.min_pixels_per_object, self.min_pixels_per_object);

        let scene = &mut config.scene;
        override_with!(scene.start_index, self.start_index);
        override_with!(scene.num_images, self.num_images);
        override_with!(scene.max_scene_attempts, self.max_scene_attempts);
        override_with!(scene.relationship_eps, self.relationship_eps);
        if self.seed.is_some() {
            scene.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    // Every label must resolve before the first scene is attempted.
    let catalog = PropertyCatalog::load(&config.paths.properties_json)
        .context("Failed to load property catalog")?;

    for dir in [&config.paths.output_image_dir, &config.paths.output_scene_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let base_seed = config.scene.seed.unwrap_or_else(rand::random);
    log::info!(
        "Generating images {}..{} with base seed {}",
        config.scene.start_index,
        config.scene.num_images,
        base_seed
    );

    let mut renderer = PreviewRenderer::new();
    let mut composer = SceneComposer::new(&config, &catalog, &mut renderer);
    for image_index in config.scene.start_index..config.scene.num_images {
        composer
            .generate(image_index, base_seed)
            .with_context(|| format!("Failed to generate image {image_index}"))?;
    }

    log::info!("Dataset generation finished");
    Ok(())
}
