//! CPU preview renderer
//!
//! Draws every object as the disc its bounding sphere projects to, with a
//! per-pixel depth test. The same rasterisation backs the visible pixel
//! counts, so occlusion between objects is handled consistently with the
//! image it writes. Shapes, materials and lighting are approximated; this is
//! a stand-in for a production renderer, not a replacement.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::config::{Config, ConfigFormat};
use crate::render::{RenderError, RenderSettings, SceneRenderer, StagedScene};
use crate::scene::BaseScene;

/// Ground color at the top and bottom of the frame
const GROUND_FAR: [f32; 3] = [0.62, 0.62, 0.60];
const GROUND_NEAR: [f32; 3] = [0.42, 0.42, 0.41];

/// One object projected to screen space
#[derive(Debug, Clone, Copy)]
struct Disc {
    index: usize,
    center_x: f32,
    center_y: f32,
    radius_px: f32,
    depth: f32,
    radius: f32,
}

/// Frontmost object at a pixel and how squarely its surface faces the camera
#[derive(Debug, Clone, Copy)]
struct Fragment {
    index: usize,
    facing: f32,
}

/// Software renderer producing flat-shaded previews
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    settings: RenderSettings,
    materials: Vec<String>,
    shapes: Vec<String>,
}

impl PreviewRenderer {
    /// Create a renderer with default settings
    pub fn new() -> Self {
        Self {
            settings: RenderSettings::default(),
            materials: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Material asset names found by the last [`SceneRenderer::load_materials`]
    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    /// Shape asset names found by the last [`SceneRenderer::load_shapes`]
    pub fn shapes(&self) -> &[String] {
        &self.shapes
    }

    /// Shape and material tokens in `scene` with no matching asset file
    ///
    /// An empty asset list means the directory was never scanned or is
    /// missing, in which case nothing is reported for that kind.
    pub fn missing_assets<'s>(&self, scene: &'s StagedScene) -> Vec<&'s str> {
        let mut missing: Vec<&str> = Vec::new();
        for object in &scene.objects {
            let checks = [
                (&self.shapes, object.shape_token.as_str()),
                (&self.materials, object.material_token.as_str()),
            ];
            for (assets, token) in checks {
                if !assets.is_empty() && !assets.iter().any(|name| name == token) && !missing.contains(&token) {
                    missing.push(token);
                }
            }
        }
        missing
    }

    fn project_discs(&self, scene: &StagedScene) -> Vec<Disc> {
        let (width, height) = self.resolution();
        let focal = scene.camera.focal_length_px(height);

        scene
            .objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| {
                let (ndc, depth) = scene.camera.project_to_ndc(&object.coords)?;
                if depth < scene.camera.near {
                    return None;
                }
                Some(Disc {
                    index,
                    center_x: (ndc.x + 1.0) * 0.5 * width as f32,
                    center_y: (ndc.y + 1.0) * 0.5 * height as f32,
                    radius_px: object.radius * focal / depth,
                    depth,
                    radius: object.radius,
                })
            })
            .collect()
    }

    fn rasterize(&self, scene: &StagedScene) -> Vec<Option<Fragment>> {
        let (width, height) = self.resolution();
        let (w, h) = (width as usize, height as usize);
        let mut fragments: Vec<Option<Fragment>> = vec![None; w * h];
        let mut depth_buffer = vec![f32::INFINITY; w * h];

        for disc in self.project_discs(scene) {
            if disc.radius_px <= 0.0 {
                continue;
            }
            let min_x = (disc.center_x - disc.radius_px).floor().max(0.0) as usize;
            let max_x = (disc.center_x + disc.radius_px).ceil().min(width as f32) as usize;
            let min_y = (disc.center_y - disc.radius_px).floor().max(0.0) as usize;
            let max_y = (disc.center_y + disc.radius_px).ceil().min(height as f32) as usize;
            let inv_r2 = 1.0 / (disc.radius_px * disc.radius_px);

            for y in min_y..max_y {
                for x in min_x..max_x {
                    let dx = x as f32 + 0.5 - disc.center_x;
                    let dy = y as f32 + 0.5 - disc.center_y;
                    let d2 = (dx * dx + dy * dy) * inv_r2;
                    if d2 > 1.0 {
                        continue;
                    }

                    let facing = (1.0 - d2).sqrt();
                    let z = disc.depth - disc.radius * facing;
                    let slot = y * w + x;
                    if z < depth_buffer[slot] {
                        depth_buffer[slot] = z;
                        fragments[slot] = Some(Fragment { index: disc.index, facing });
                    }
                }
            }
        }

        fragments
    }

    fn shade(scene: &StagedScene, fragment: Fragment) -> [f32; 3] {
        let object = &scene.objects[fragment.index];
        let diffuse = 0.35 + 0.65 * fragment.facing;
        let specular = if object.material_token.to_ascii_lowercase().contains("metal") {
            0.35 * fragment.facing.powi(12)
        } else {
            0.0
        };

        let [r, g, b, _] = object.rgba;
        [r * diffuse + specular, g * diffuse + specular, b * diffuse + specular]
    }

    fn list_assets(dir: &Path, kind: &str) -> Vec<String> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("No {} directory at {:?} ({}); continuing without it", kind, dir, e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path: PathBuf| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        log::info!("Found {} {} asset(s) in {:?}", names.len(), kind, dir);
        names
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer for PreviewRenderer {
    fn open_base_scene(&mut self, path: &Path) -> Result<BaseScene, RenderError> {
        if ConfigFormat::from_path(path).is_err() {
            log::warn!("Preview renderer cannot read {:?}; using the built-in base scene", path);
            return Ok(BaseScene::default());
        }
        Ok(BaseScene::load_from_file(path)?)
    }

    fn load_materials(&mut self, dir: &Path) -> Result<(), RenderError> {
        self.materials = Self::list_assets(dir, "material");
        Ok(())
    }

    fn load_shapes(&mut self, dir: &Path) -> Result<(), RenderError> {
        self.shapes = Self::list_assets(dir, "shape");
        Ok(())
    }

    fn set_render_params(&mut self, settings: &RenderSettings) -> Result<(), RenderError> {
        settings
            .validate()
            .map_err(|e| RenderError::Backend(e.to_string()))?;
        log::debug!(
            "Preview renderer at {}x{} (samples, bounces and device are ignored)",
            settings.width,
            settings.height
        );
        self.settings = settings.clone();
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        (self.settings.width, self.settings.height)
    }

    fn render(&mut self, scene: &StagedScene, output_path: &Path) -> Result<(), RenderError> {
        for token in self.missing_assets(scene) {
            log::warn!("No asset file for {:?}; drawing it with the preview shading", token);
        }

        let (width, height) = self.resolution();
        let fragments = self.rasterize(scene);

        let image = RgbaImage::from_fn(width, height, |x, y| {
            let color = match fragments[(y * width + x) as usize] {
                Some(fragment) => Self::shade(scene, fragment),
                None => {
                    let t = y as f32 / height.max(1) as f32;
                    [0, 1, 2].map(|c| GROUND_FAR[c] + (GROUND_NEAR[c] - GROUND_FAR[c]) * t)
                }
            };
            let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
            Rgba([r, g, b, 255])
        });

        image.save(output_path)?;
        log::debug!("Preview image written to {:?}", output_path);
        Ok(())
    }

    fn visible_pixel_counts(&mut self, scene: &StagedScene) -> Result<Vec<u32>, RenderError> {
        let mut counts = vec![0u32; scene.objects.len()];
        for fragment in self.rasterize(scene).into_iter().flatten() {
            counts[fragment.index] += 1;
        }
        Ok(counts)
    }
}
