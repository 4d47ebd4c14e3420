//! Scripted renderer for tests

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::foundation::math::Vec3;
use crate::render::{PixelCoords, RenderError, RenderSettings, SceneRenderer, StagedScene};
use crate::scene::{BaseScene, ObjectRecord};

/// Visible pixel count reported once the script runs out
pub(crate) const DEFAULT_VISIBLE_PIXELS: u32 = 10_000;

/// Renderer whose answers are fixed up front
pub(crate) struct ScriptedRenderer {
    pub base_scene: BaseScene,
    pub settings: RenderSettings,
    pub visibility: VecDeque<Vec<u32>>,
    pub hidden_passes: u32,
    pub render_failures: u32,
    pub render_calls: u32,
    pub visibility_calls: u32,
    pub rendered: Vec<PathBuf>,
    pub materials_dir: Option<PathBuf>,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self {
            base_scene: BaseScene::default(),
            settings: RenderSettings::default(),
            visibility: VecDeque::new(),
            hidden_passes: 0,
            render_failures: 0,
            render_calls: 0,
            visibility_calls: 0,
            rendered: Vec::new(),
            materials_dir: None,
        }
    }

    /// Answer successive visibility queries with these counts
    pub fn with_visibility(mut self, counts: Vec<Vec<u32>>) -> Self {
        self.visibility = counts.into();
        self
    }

    /// Report every object as fully hidden for the first `passes` queries
    pub fn with_hidden_passes(mut self, passes: u32) -> Self {
        self.hidden_passes = passes;
        self
    }

    /// Fail the first `failures` render calls
    pub fn with_render_failures(mut self, failures: u32) -> Self {
        self.render_failures = failures;
        self
    }
}

impl SceneRenderer for ScriptedRenderer {
    fn open_base_scene(&mut self, _path: &Path) -> Result<BaseScene, RenderError> {
        Ok(self.base_scene.clone())
    }

    fn load_materials(&mut self, dir: &Path) -> Result<(), RenderError> {
        self.materials_dir = Some(dir.to_path_buf());
        Ok(())
    }

    fn set_render_params(&mut self, settings: &RenderSettings) -> Result<(), RenderError> {
        self.settings = settings.clone();
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        (self.settings.width, self.settings.height)
    }

    fn render(&mut self, _scene: &StagedScene, output_path: &Path) -> Result<(), RenderError> {
        self.render_calls += 1;
        if self.render_failures > 0 {
            self.render_failures -= 1;
            return Err(RenderError::Backend("scripted render failure".to_string()));
        }
        std::fs::write(output_path, b"scripted")?;
        self.rendered.push(output_path.to_path_buf());
        Ok(())
    }

    fn visible_pixel_counts(&mut self, scene: &StagedScene) -> Result<Vec<u32>, RenderError> {
        self.visibility_calls += 1;
        if self.hidden_passes > 0 {
            self.hidden_passes -= 1;
            return Ok(vec![0; scene.objects.len()]);
        }
        Ok(self
            .visibility
            .pop_front()
            .unwrap_or_else(|| vec![DEFAULT_VISIBLE_PIXELS; scene.objects.len()]))
    }
}

/// Plain gray rubber sphere resting at `coords`
pub(crate) fn object_at(coords: Vec3, radius: f32) -> ObjectRecord {
    ObjectRecord {
        shape: "sphere".to_string(),
        size: "small".to_string(),
        size_value: radius,
        material: "rubber".to_string(),
        color: "gray".to_string(),
        rotation: 0.0,
        coords,
        pixel_coords: PixelCoords::default(),
        pixel_count_visible: 0,
        shape_token: "Sphere".to_string(),
        material_token: "Rubber".to_string(),
        rgba: [0.34, 0.34, 0.34, 1.0],
        radius,
    }
}
