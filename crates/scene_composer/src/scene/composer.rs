//! Scene composer
//!
//! Drives one output index from base scene to persisted record:
//! initialize → place → resolve visibility → relate → render → save.
//!
//! Placement exhaustion and occlusion restart placement for the same image,
//! up to `max_scene_attempts` times. Render failures are retried at the call
//! site until the renderer succeeds, since the scene itself is not at fault.
//! The record is written only after the image.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assets::PropertyCatalog;
use crate::core::config::GeneratorConfig;
use crate::render::{SceneRenderer, StagedScene};
use crate::scene::{
    compute_all_relationships, BaseScene, PlacementPlanner, SceneError, SceneInitializer,
    SceneRecord, VisibilityResolver,
};

/// Output of one successful [`SceneComposer::generate`] call
#[derive(Debug, Clone)]
pub struct GeneratedScene {
    /// Record written to `scene_path`
    pub record: SceneRecord,
    /// Rendered image
    pub image_path: PathBuf,
    /// Scene record
    pub scene_path: PathBuf,
    /// Placement attempts used, 1 if the first one was accepted
    pub scene_attempts: u32,
    /// Render calls made, 1 if the first one succeeded
    pub render_attempts: u32,
}

/// A validated scene that has not been rendered yet
#[derive(Debug, Clone)]
pub struct ComposedScene {
    /// Record to persist after rendering
    pub record: SceneRecord,
    /// What the renderer draws
    pub staged: StagedScene,
    /// Placement attempts used
    pub attempts: u32,
}

/// Composes, renders and persists scenes one output index at a time
pub struct SceneComposer<'a, R: SceneRenderer + ?Sized> {
    config: &'a GeneratorConfig,
    catalog: &'a PropertyCatalog,
    renderer: &'a mut R,
}

impl<'a, R: SceneRenderer + ?Sized> SceneComposer<'a, R> {
    /// Create a composer over a renderer
    pub fn new(config: &'a GeneratorConfig, catalog: &'a PropertyCatalog, renderer: &'a mut R) -> Self {
        Self {
            config,
            catalog,
            renderer,
        }
    }

    /// Seed of the generator used for `image_index`
    pub fn scene_seed(base_seed: u64, image_index: u32) -> u64 {
        base_seed.wrapping_add(u64::from(image_index))
    }

    /// Image path for `image_index`
    pub fn image_path(&self, image_index: u32) -> PathBuf {
        self.config.paths.output_image_dir.join(format!("{image_index}.png"))
    }

    /// Scene record path for `image_index`
    pub fn scene_path(&self, image_index: u32) -> PathBuf {
        self.config.paths.output_scene_dir.join(format!("{image_index}.json"))
    }

    /// Generate, render and persist the scene for `image_index`
    ///
    /// The same `base_seed` and index always produce the same scene.
    pub fn generate(&mut self, image_index: u32, base_seed: u64) -> Result<GeneratedScene, SceneError> {
        let mut rng = StdRng::seed_from_u64(Self::scene_seed(base_seed, image_index));
        let placement = &self.config.placement;
        let num_objects = rng.gen_range(placement.min_objects..=placement.max_objects);

        let image_path = self.image_path(image_index);
        let scene_path = self.scene_path(image_index);
        log::info!(
            "Generating image {} with {} objects -> {:?}",
            image_index,
            num_objects,
            image_path
        );

        let base = self.prepare()?;
        let composed = self.compose(&base, image_index, num_objects, &mut rng)?;
        let render_attempts = self.render_until_success(&composed.staged, &image_path);

        composed.record.save(&scene_path)?;
        log::info!(
            "Image {} done: {} scene attempt(s), {} render attempt(s)",
            image_index,
            composed.attempts,
            render_attempts
        );

        Ok(GeneratedScene {
            record: composed.record,
            image_path,
            scene_path,
            scene_attempts: composed.attempts,
            render_attempts,
        })
    }

    /// Load the base scene and push assets and settings to the renderer
    pub fn prepare(&mut self) -> Result<BaseScene, SceneError> {
        let paths = &self.config.paths;
        let settings = &self.config.render;

        let mut base = self.renderer.open_base_scene(&paths.base_scene_blendfile)?;
        self.renderer.load_materials(&paths.material_dir)?;
        self.renderer.load_shapes(&paths.shape_dir)?;
        self.renderer.set_render_params(settings)?;

        base.camera.set_aspect_ratio(settings.aspect_ratio());
        Ok(base)
    }

    /// Build a validated scene without rendering it
    ///
    /// Jitter and ground axes are fixed once; only placement and visibility
    /// are retried.
    pub fn compose<G: Rng + ?Sized>(
        &mut self,
        base: &BaseScene,
        image_index: u32,
        num_objects: usize,
        rng: &mut G,
    ) -> Result<ComposedScene, SceneError> {
        let initialized = SceneInitializer::new(self.config.jitter.clone()).initialize(base, rng)?;
        let planner = PlacementPlanner::new(self.catalog, &self.config.placement);
        let resolver = VisibilityResolver::new(&self.config.visibility);
        let max_attempts = self.config.scene.max_scene_attempts;

        for attempt in 1..=max_attempts {
            let objects = match planner.plan(num_objects, &initialized.directions, &initialized.camera, rng) {
                Ok(objects) => objects,
                Err(e) if e.is_recoverable() => {
                    log::warn!("Image {} attempt {}: {}; replacing objects", image_index, attempt, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let mut staged = StagedScene {
                camera: initialized.camera.clone(),
                lights: initialized.lights.clone(),
                objects,
            };

            match resolver.resolve(&mut *self.renderer, &mut staged) {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    log::warn!("Image {} attempt {}: {}; replacing objects", image_index, attempt, e);
                    continue;
                }
                Err(e) => return Err(e),
            }

            let relationships = compute_all_relationships(
                &staged.objects,
                &initialized.directions,
                self.config.scene.relationship_eps,
            );
            let record = SceneRecord {
                image_index,
                objects: staged.objects.clone(),
                directions: initialized.directions.to_map(),
                relationships,
            };

            log::debug!("Image {} accepted on attempt {}", image_index, attempt);
            return Ok(ComposedScene {
                record,
                staged,
                attempts: attempt,
            });
        }

        Err(SceneError::AttemptsExhausted {
            image_index,
            attempts: max_attempts,
        })
    }

    /// Render until the renderer reports success; returns the number of calls
    pub fn render_until_success(&mut self, staged: &StagedScene, image_path: &Path) -> u32 {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.renderer.render(staged, image_path) {
                Ok(()) => return attempts,
                Err(e) => log::error!("Render of {:?} failed (attempt {}): {}", image_path, attempts, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::properties::tests::test_catalog;
    use crate::render::testing::ScriptedRenderer;
    use crate::scene::Direction;

    fn scratch_config(name: &str) -> GeneratorConfig {
        let root = std::env::temp_dir().join(format!("scene_composer_{}_{}", name, std::process::id()));
        let mut config = GeneratorConfig::default();
        config.paths.output_image_dir = root.join("images");
        config.paths.output_scene_dir = root.join("scenes");
        std::fs::create_dir_all(&config.paths.output_image_dir).unwrap();
        std::fs::create_dir_all(&config.paths.output_scene_dir).unwrap();
        config
    }

    fn cleanup(config: &GeneratorConfig) {
        if let Some(root) = config.paths.output_image_dir.parent() {
            std::fs::remove_dir_all(root).ok();
        }
    }

    #[test]
    fn test_generate_writes_image_then_record() {
        let config = scratch_config("generate");
        let catalog = test_catalog();
        let mut renderer = ScriptedRenderer::new();

        let generated = SceneComposer::new(&config, &catalog, &mut renderer).generate(4, 1234).unwrap();

        assert!(generated.image_path.ends_with("4.png"));
        assert!(Path::new(&generated.image_path).exists());
        let saved = SceneRecord::load(&generated.scene_path).unwrap();
        assert_eq!(saved.image_index, 4);
        assert_eq!(saved.objects.len(), generated.record.objects.len());
        assert!((3..=10).contains(&saved.objects.len()));
        assert_eq!(saved.relationships, generated.record.relationships);
        assert_eq!(saved.directions.len(), 6);
        assert_eq!(renderer.materials_dir, Some(config.paths.material_dir.clone()));

        cleanup(&config);
    }

    #[test]
    fn test_render_failures_are_retried() {
        let config = scratch_config("render_retry");
        let catalog = test_catalog();
        let mut renderer = ScriptedRenderer::new().with_render_failures(3);

        let generated = SceneComposer::new(&config, &catalog, &mut renderer).generate(0, 7).unwrap();

        assert_eq!(generated.render_attempts, 4);
        assert_eq!(renderer.render_calls, 4);
        assert_eq!(renderer.rendered.len(), 1);
        assert!(generated.scene_path.exists());

        cleanup(&config);
    }

    #[test]
    fn test_occluded_scene_restarts_placement() {
        let config = scratch_config("occluded");
        let catalog = test_catalog();
        // Two rejected visibility passes, then the default answer.
        let mut renderer = ScriptedRenderer::new().with_hidden_passes(2);

        let generated = SceneComposer::new(&config, &catalog, &mut renderer).generate(1, 99).unwrap();

        assert!(generated.scene_attempts >= 3);
        assert_eq!(renderer.visibility_calls, 3);
        assert!(generated
            .record
            .objects
            .iter()
            .all(|o| o.pixel_count_visible >= config.visibility.min_pixels_per_object));

        cleanup(&config);
    }

    #[test]
    fn test_attempts_are_bounded() {
        let mut config = scratch_config("bounded");
        config.scene.max_scene_attempts = 3;
        let catalog = test_catalog();
        let mut renderer = ScriptedRenderer::new().with_hidden_passes(5);

        let result = SceneComposer::new(&config, &catalog, &mut renderer).generate(2, 5);

        assert!(matches!(
            result,
            Err(SceneError::AttemptsExhausted { image_index: 2, attempts: 3 })
        ));
        assert_eq!(renderer.render_calls, 0);
        assert!(!config.paths.output_scene_dir.join("2.json").exists());

        cleanup(&config);
    }

    #[test]
    fn test_five_objects_all_or_nothing() {
        let mut config = scratch_config("five");
        config.placement = config.placement.with_object_range(5, 5).with_max_retries(50);
        config.placement.min_dist = 0.9;
        let catalog = test_catalog();

        for seed in 0..10 {
            let mut renderer = ScriptedRenderer::new();
            let mut composer = SceneComposer::new(&config, &catalog, &mut renderer);
            let base = composer.prepare().unwrap();
            let mut rng = StdRng::seed_from_u64(seed);

            match composer.compose(&base, 0, 5, &mut rng) {
                Ok(composed) => {
                    assert_eq!(composed.record.objects.len(), 5);
                    assert_eq!(composed.staged.objects.len(), 5);
                }
                Err(e) => assert!(matches!(e, SceneError::AttemptsExhausted { .. })),
            }
        }

        cleanup(&config);
    }

    #[test]
    fn test_same_seed_replays_scene() {
        let config = scratch_config("replay");
        let catalog = test_catalog();

        let mut first_renderer = ScriptedRenderer::new();
        let first = SceneComposer::new(&config, &catalog, &mut first_renderer).generate(3, 2024).unwrap();
        let mut second_renderer = ScriptedRenderer::new();
        let second = SceneComposer::new(&config, &catalog, &mut second_renderer).generate(3, 2024).unwrap();

        assert_eq!(first.record, second.record);
        assert_eq!(SceneComposer::<ScriptedRenderer>::scene_seed(2024, 3), 2027);

        cleanup(&config);
    }

    #[test]
    fn test_relationships_match_positions() {
        let config = scratch_config("relations");
        let catalog = test_catalog();
        let mut renderer = ScriptedRenderer::new();

        let generated = SceneComposer::new(&config, &catalog, &mut renderer).generate(6, 31).unwrap();
        let record = &generated.record;
        let set = record.direction_set().unwrap();

        for direction in Direction::HORIZONTAL {
            let axis = set.vector(direction);
            for (i, a) in record.objects.iter().enumerate() {
                for (j, b) in record.objects.iter().enumerate() {
                    let related = record.relationships[&direction][i].contains(&j);
                    assert_eq!(related, i != j && (b.coords - a.coords).dot(&axis) > 0.2);
                }
            }
        }

        cleanup(&config);
    }
}
