//! Scene initializer
//!
//! Applies per-scene jitter to the base camera and lights and derives the
//! camera-aligned ground axes every later stage works in.

use rand::Rng;

use crate::core::config::JitterConfig;
use crate::foundation::math::{utils, Vec3};
use crate::render::Camera;
use crate::scene::{BaseScene, DirectionSet, LightRole, SceneError, SceneLights};

/// Camera, lights and axes of one scene after jitter
#[derive(Debug, Clone)]
pub struct InitializedScene {
    /// Jittered camera
    pub camera: Camera,
    /// Jittered lights
    pub lights: SceneLights,
    /// Ground axes derived from the jittered camera
    pub directions: DirectionSet,
}

/// Per-scene setup of camera, lights and ground axes
#[derive(Debug, Clone)]
pub struct SceneInitializer {
    jitter: JitterConfig,
}

impl SceneInitializer {
    /// Create an initializer with the given jitter magnitudes
    pub fn new(jitter: JitterConfig) -> Self {
        Self { jitter }
    }

    /// Jitter the base scene and derive its ground axes
    ///
    /// The camera is jittered before the axes are derived, so the axes always
    /// describe the camera the image is rendered from. Lights are jittered
    /// afterwards in key, back, fill order.
    pub fn initialize<R: Rng + ?Sized>(
        &self,
        base: &BaseScene,
        rng: &mut R,
    ) -> Result<InitializedScene, SceneError> {
        let mut camera = base.camera.clone();
        if self.jitter.camera > 0.0 {
            camera.translate(jitter_offset(rng, self.jitter.camera));
        }

        let directions = derive_directions(&camera, &base.ground_normal)?;

        let mut lights = base.lights.clone();
        for role in LightRole::ALL {
            let magnitude = self.light_jitter(role);
            if magnitude > 0.0 {
                *lights.position_mut(role) += jitter_offset(rng, magnitude);
            }
        }

        log::debug!(
            "Initialized scene: camera at {:?}, behind {:?}, left {:?}",
            camera.position,
            directions.vector(crate::scene::Direction::Behind),
            directions.vector(crate::scene::Direction::Left)
        );

        Ok(InitializedScene {
            camera,
            lights,
            directions,
        })
    }

    fn light_jitter(&self, role: LightRole) -> f32 {
        match role {
            LightRole::Key => self.jitter.key_light,
            LightRole::Fill => self.jitter.fill_light,
            LightRole::Back => self.jitter.back_light,
        }
    }
}

/// Independent uniform offset in `[-magnitude, magnitude)` on each axis
pub fn jitter_offset<R: Rng + ?Sized>(rng: &mut R, magnitude: f32) -> Vec3 {
    Vec3::from_fn(|_, _| 2.0 * magnitude * (rng.gen::<f32>() - 0.5))
}

/// Project the camera's axes onto the ground plane
///
/// `behind` and `left` are the camera's forward and left axes with their
/// normal component removed; `above` is the camera's up axis projected onto
/// the normal. All three are unit length.
pub fn derive_directions(camera: &Camera, ground_normal: &Vec3) -> Result<DirectionSet, SceneError> {
    let behind = utils::try_normalize(&utils::reject_from(&camera.forward(), ground_normal))
        .ok_or(SceneError::DegenerateCamera("viewing axis is parallel to the ground normal"))?;
    let left = utils::try_normalize(&utils::reject_from(&camera.left(), ground_normal))
        .ok_or(SceneError::DegenerateCamera("left axis is parallel to the ground normal"))?;
    let above = utils::try_normalize(&utils::project_onto(&camera.up_axis(), ground_normal))
        .ok_or(SceneError::DegenerateCamera("up axis lies in the ground plane"))?;

    Ok(DirectionSet::new(behind, left, above))
}
