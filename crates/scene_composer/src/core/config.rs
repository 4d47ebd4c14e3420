//! # Generator Configuration
//!
//! Every knob of the dataset generator, grouped by the subsystem that reads it.
//! The command line builds one of these; it can also be loaded from a TOML or
//! RON file through the [`Config`] trait, with flags applied on top.
//!
//! ## Configuration Categories
//!
//! - **Paths**: Inputs (base scene, catalog, asset dirs) and output dirs
//! - **Render**: Resolution and backend quality settings
//! - **Jitter**: Per-scene perturbation of camera and lights
//! - **Placement**: Object count, separation, margin and retry bounds
//! - **Visibility**: Minimum visible pixels per object
//! - **Scene**: Output index range, scene retry bound, relationship threshold

use serde::{Serialize, Deserialize};
use std::path::PathBuf;

pub use crate::config::{Config, ConfigError};

/// # Path Configuration
///
/// Input assets and output directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base scene file handed to the renderer
    pub base_scene_blendfile: PathBuf,
    /// JSON property catalog (colors, materials, shapes, sizes)
    pub properties_json: PathBuf,
    /// Directory holding one asset per shape token
    pub shape_dir: PathBuf,
    /// Directory holding one asset per material token
    pub material_dir: PathBuf,
    /// Where rendered images are written
    pub output_image_dir: PathBuf,
    /// Where scene records are written
    pub output_scene_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_scene_blendfile: PathBuf::from("data/base_scene.blend"),
            properties_json: PathBuf::from("data/properties.json"),
            shape_dir: PathBuf::from("data/shapes"),
            material_dir: PathBuf::from("data/materials"),
            output_image_dir: PathBuf::from("../output/images/"),
            output_scene_dir: PathBuf::from("../output/scenes/"),
        }
    }
}

/// Compute device requested from the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderDevice {
    /// CPU rendering
    Cpu,
    /// GPU rendering
    Gpu,
}

/// # Render Settings
///
/// Resolution and quality parameters passed to
/// [`SceneRenderer::set_render_params`](crate::render::SceneRenderer::set_render_params).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel
    pub num_samples: u32,
    /// Minimum transparent bounces
    pub min_bounces: u32,
    /// Maximum transparent bounces
    pub max_bounces: u32,
    /// Render tile edge in pixels
    pub tile_size: u32,
    /// Compute device
    pub device: RenderDevice,
}

impl RenderSettings {
    /// Set the output resolution
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the compute device
    pub fn with_device(mut self, device: RenderDevice) -> Self {
        self.device = device;
        self
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.min_bounces > self.max_bounces {
            return Err(ConfigError::Invalid(format!(
                "render_min_bounces ({}) exceeds render_max_bounces ({})",
                self.min_bounces, self.max_bounces
            )));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid("render_tile_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            num_samples: 512,
            min_bounces: 8,
            max_bounces: 8,
            tile_size: 256,
            device: RenderDevice::Gpu,
        }
    }
}

/// # Jitter Configuration
///
/// Maximum per-axis displacement applied to the camera and each light.
/// A magnitude of zero leaves that object untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Camera position jitter
    pub camera: f32,
    /// Key light position jitter
    pub key_light: f32,
    /// Fill light position jitter
    pub fill_light: f32,
    /// Back light position jitter
    pub back_light: f32,
}

impl JitterConfig {
    /// No jitter at all
    pub fn none() -> Self {
        Self {
            camera: 0.0,
            key_light: 0.0,
            fill_light: 0.0,
            back_light: 0.0,
        }
    }
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            camera: 0.5,
            key_light: 1.0,
            fill_light: 1.0,
            back_light: 1.0,
        }
    }
}

/// # Placement Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Fewest objects per scene
    pub min_objects: usize,
    /// Most objects per scene
    pub max_objects: usize,
    /// Minimum surface gap between any two objects
    pub min_dist: f32,
    /// Minimum offset along every horizontal direction between two objects
    pub margin: f32,
    /// Position samples per object before the scene is restarted
    pub max_retries: u32,
    /// Objects are placed in `[-ground_extent, ground_extent]` on x and y
    pub ground_extent: f32,
}

impl PlacementConfig {
    /// Set the object count range
    pub fn with_object_range(mut self, min_objects: usize, max_objects: usize) -> Self {
        self.min_objects = min_objects;
        self.max_objects = max_objects;
        self
    }

    /// Set the retry bound per object
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            min_objects: 3,
            max_objects: 10,
            min_dist: 0.25,
            margin: 0.4,
            max_retries: 50,
            ground_extent: 3.0,
        }
    }
}

/// # Visibility Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Scenes with any object showing fewer pixels are rejected; an object
    /// with no visible pixels at all is rejected regardless
    pub min_pixels_per_object: u32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            min_pixels_per_object: 200,
        }
    }
}

/// # Scene Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// First output index
    pub start_index: u32,
    /// Output indices run up to, but excluding, this value
    pub num_images: u32,
    /// Placement restarts allowed per image before giving up
    pub max_scene_attempts: u32,
    /// Threshold of the directional relationship test
    pub relationship_eps: f32,
    /// Base seed; each image uses `seed + image_index`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            start_index: 0,
            num_images: 5,
            max_scene_attempts: 100,
            relationship_eps: 0.2,
            seed: None,
        }
    }
}

/// # Complete Generator Configuration
///
/// Top-level configuration covering every subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Input and output paths
    pub paths: PathsConfig,
    /// Renderer settings
    pub render: RenderSettings,
    /// Camera and light jitter
    pub jitter: JitterConfig,
    /// Object placement
    pub placement: PlacementConfig,
    /// Visibility rejection
    pub visibility: VisibilityConfig,
    /// Output range and scene-level retry
    pub scene: SceneConfig,
}

impl GeneratorConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.render.validate()?;

        let placement = &self.placement;
        if placement.max_objects == 0 {
            return Err(ConfigError::Invalid("max_objects must be at least 1".to_string()));
        }
        if placement.min_objects > placement.max_objects {
            return Err(ConfigError::Invalid(format!(
                "min_objects ({}) exceeds max_objects ({})",
                placement.min_objects, placement.max_objects
            )));
        }
        if placement.min_dist < 0.0 || placement.margin < 0.0 {
            return Err(ConfigError::Invalid("min_dist and margin must be non-negative".to_string()));
        }
        if placement.ground_extent <= 0.0 {
            return Err(ConfigError::Invalid("ground_extent must be positive".to_string()));
        }
        if placement.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be at least 1".to_string()));
        }

        let jitter = &self.jitter;
        if [jitter.camera, jitter.key_light, jitter.fill_light, jitter.back_light]
            .iter()
            .any(|j| *j < 0.0)
        {
            return Err(ConfigError::Invalid("jitter magnitudes must be non-negative".to_string()));
        }

        if self.scene.max_scene_attempts == 0 {
            return Err(ConfigError::Invalid("max_scene_attempts must be at least 1".to_string()));
        }

        Ok(())
    }
}

impl Config for GeneratorConfig {}
