//! Visibility and projection resolver
//!
//! Fills in each object's pixel coordinates and visible pixel count, and
//! rejects scenes where any object is (nearly) hidden.

use crate::core::config::VisibilityConfig;
use crate::render::{RenderError, SceneRenderer, StagedScene};
use crate::scene::SceneError;

/// Annotates staged objects with projection and visibility data
pub struct VisibilityResolver<'a> {
    config: &'a VisibilityConfig,
}

impl<'a> VisibilityResolver<'a> {
    /// Create a resolver with the given thresholds
    pub fn new(config: &'a VisibilityConfig) -> Self {
        Self { config }
    }

    /// Project every object and check it covers enough pixels
    ///
    /// Objects are annotated even when the scene is rejected, so the caller
    /// can log what went wrong.
    pub fn resolve<R: SceneRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        scene: &mut StagedScene,
    ) -> Result<(), SceneError> {
        for object in &mut scene.objects {
            object.pixel_coords = renderer.project_to_pixel(&scene.camera, &object.coords);
        }

        let counts = renderer.visible_pixel_counts(scene)?;
        if counts.len() != scene.objects.len() {
            return Err(SceneError::Render(RenderError::Backend(format!(
                "renderer returned {} visibility counts for {} objects",
                counts.len(),
                scene.objects.len()
            ))));
        }

        for (object, &count) in scene.objects.iter_mut().zip(&counts) {
            object.pixel_count_visible = count;
        }

        // A fully hidden object is rejected even when the threshold is zero.
        let required = self.config.min_pixels_per_object;
        if let Some((index, &visible)) = counts
            .iter()
            .enumerate()
            .find(|&(_, &c)| c == 0 || c < required)
        {
            return Err(SceneError::Occluded {
                object_index: index,
                visible,
                required,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::testing::{object_at, ScriptedRenderer};
    use crate::scene::BaseScene;

    fn staged(positions: &[Vec3]) -> StagedScene {
        let base = BaseScene::default();
        StagedScene {
            camera: base.camera,
            lights: base.lights,
            objects: positions.iter().map(|p| object_at(*p, 0.35)).collect(),
        }
    }

    #[test]
    fn test_annotates_projection_and_counts() {
        let config = VisibilityConfig { min_pixels_per_object: 100 };
        let resolver = VisibilityResolver::new(&config);
        let mut renderer = ScriptedRenderer::new().with_visibility(vec![vec![150, 400]]);
        let mut scene = staged(&[Vec3::new(0.0, 0.0, 0.35), Vec3::new(1.0, 1.0, 0.35)]);

        resolver.resolve(&mut renderer, &mut scene).unwrap();

        assert_eq!(scene.objects[0].pixel_count_visible, 150);
        assert_eq!(scene.objects[1].pixel_count_visible, 400);
        let expected = scene.camera.project_to_pixel(&scene.objects[1].coords, 320, 240);
        assert_eq!(scene.objects[1].pixel_coords, expected);
        assert!(scene.objects[0].pixel_coords.depth > 0.0);
    }

    #[test]
    fn test_under_visible_object_rejects_scene() {
        let config = VisibilityConfig { min_pixels_per_object: 200 };
        let resolver = VisibilityResolver::new(&config);
        let mut renderer = ScriptedRenderer::new().with_visibility(vec![vec![500, 199, 0]]);
        let mut scene = staged(&[Vec3::zeros(), Vec3::x(), Vec3::y()]);

        match resolver.resolve(&mut renderer, &mut scene) {
            Err(SceneError::Occluded { object_index, visible, required }) => {
                assert_eq!(object_index, 1);
                assert_eq!(visible, 199);
                assert_eq!(required, 200);
            }
            other => panic!("expected occlusion, got {other:?}"),
        }
    }

    #[test]
    fn test_hidden_object_rejected_at_zero_threshold() {
        let config = VisibilityConfig { min_pixels_per_object: 0 };
        let resolver = VisibilityResolver::new(&config);
        let mut renderer = ScriptedRenderer::new().with_visibility(vec![vec![500, 0]]);
        let mut scene = staged(&[Vec3::zeros(), Vec3::x()]);

        match resolver.resolve(&mut renderer, &mut scene) {
            Err(SceneError::Occluded { object_index, visible, .. }) => {
                assert_eq!(object_index, 1);
                assert_eq!(visible, 0);
            }
            other => panic!("expected occlusion, got {other:?}"),
        }

        let mut renderer = ScriptedRenderer::new().with_visibility(vec![vec![500, 1]]);
        assert!(resolver.resolve(&mut renderer, &mut scene).is_ok());
    }

    #[test]
    fn test_count_mismatch_is_a_render_error() {
        let config = VisibilityConfig::default();
        let resolver = VisibilityResolver::new(&config);
        let mut renderer = ScriptedRenderer::new().with_visibility(vec![vec![500]]);
        let mut scene = staged(&[Vec3::zeros(), Vec3::x()]);

        assert!(matches!(
            resolver.resolve(&mut renderer, &mut scene),
            Err(SceneError::Render(_))
        ));
    }
}
