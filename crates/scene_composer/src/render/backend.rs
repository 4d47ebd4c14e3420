//! Renderer collaborator interface
//!
//! A renderer owns the base scene file, material and shape assets and the
//! actual image synthesis. The composer hands it a [`StagedScene`] and asks
//! for two things back: a rendered image and per-object visible pixel counts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::math::Vec3;
use crate::render::{Camera, RenderSettings};
use crate::scene::{BaseScene, ObjectRecord, SceneLights};

/// Errors reported by a renderer
#[derive(Error, Debug)]
pub enum RenderError {
    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Base scene file could not be loaded
    #[error("Base scene error: {0}")]
    BaseScene(#[from] ConfigError),

    /// A call arrived before the renderer was ready for it
    #[error("Renderer not ready: {0}")]
    NotReady(&'static str),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Projected position of a point: pixel column, pixel row and view depth
///
/// Serialized as a `[x, y, depth]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(i32, i32, f32)", into = "(i32, i32, f32)")]
pub struct PixelCoords {
    /// Column, 0 at the left edge
    pub x: i32,
    /// Row, 0 at the top edge
    pub y: i32,
    /// Distance along the camera viewing axis
    pub depth: f32,
}

impl From<(i32, i32, f32)> for PixelCoords {
    fn from((x, y, depth): (i32, i32, f32)) -> Self {
        Self { x, y, depth }
    }
}

impl From<PixelCoords> for (i32, i32, f32) {
    fn from(p: PixelCoords) -> Self {
        (p.x, p.y, p.depth)
    }
}

/// Everything a renderer needs to draw one scene configuration
#[derive(Debug, Clone)]
pub struct StagedScene {
    /// Jittered camera
    pub camera: Camera,
    /// Jittered lights
    pub lights: SceneLights,
    /// Placed objects in placement order
    pub objects: Vec<ObjectRecord>,
}

/// Capability interface of the external renderer
pub trait SceneRenderer {
    /// Open the base scene and report its camera, lights and ground
    fn open_base_scene(&mut self, path: &Path) -> Result<BaseScene, RenderError>;

    /// Make the material assets in `dir` available
    fn load_materials(&mut self, dir: &Path) -> Result<(), RenderError>;

    /// Make the shape assets in `dir` available
    fn load_shapes(&mut self, dir: &Path) -> Result<(), RenderError> {
        log::debug!("Renderer ignores shape directory {:?}", dir);
        Ok(())
    }

    /// Apply resolution and quality settings
    fn set_render_params(&mut self, settings: &RenderSettings) -> Result<(), RenderError>;

    /// Current output resolution as `(width, height)`
    fn resolution(&self) -> (u32, u32);

    /// Render `scene` and write the image to `output_path`
    fn render(&mut self, scene: &StagedScene, output_path: &Path) -> Result<(), RenderError>;

    /// Project a world point into the output image
    fn project_to_pixel(&self, camera: &Camera, point: &Vec3) -> PixelCoords {
        let (width, height) = self.resolution();
        camera.project_to_pixel(point, width, height)
    }

    /// Count the pixels each object covers after occlusion, in object order
    fn visible_pixel_counts(&mut self, scene: &StagedScene) -> Result<Vec<u32>, RenderError>;
}
