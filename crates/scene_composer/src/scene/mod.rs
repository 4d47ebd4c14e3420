//! Scene composition
//!
//! The pipeline that turns a base scene and a property catalog into one
//! labeled image:
//!
//! 1. [`initializer`] jitters camera and lights and derives ground axes
//! 2. [`placement`] samples objects under separation and margin rules
//! 3. [`visibility`] projects objects and rejects occluded configurations
//! 4. [`relationships`] labels left/right/front/behind between every pair
//! 5. [`composer`] drives the steps, retries, renders and persists

pub mod base_scene;
pub mod directions;
pub mod initializer;
pub mod placement;
pub mod visibility;
pub mod relationships;
pub mod record;
pub mod composer;

use thiserror::Error;

use crate::render::RenderError;

pub use base_scene::{BaseScene, LightRole, SceneLights};
pub use directions::{Direction, DirectionSet};
pub use initializer::{InitializedScene, SceneInitializer};
pub use placement::{PlacementPlanner, Rejection};
pub use visibility::VisibilityResolver;
pub use relationships::{compute_all_relationships, DEFAULT_RELATIONSHIP_EPS};
pub use record::{ObjectRecord, Relationships, SceneRecord};
pub use composer::{GeneratedScene, SceneComposer};

/// Scene generation errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// One object could not be placed within the retry budget
    #[error("Could not place object {object_index} after {attempts} attempts")]
    PlacementExhausted {
        /// Index of the object that failed
        object_index: usize,
        /// Position samples tried
        attempts: u32,
    },

    /// An object covers too few pixels
    #[error("Object {object_index} shows {visible} pixels, {required} required")]
    Occluded {
        /// Index of the hidden object
        object_index: usize,
        /// Pixels it covers
        visible: u32,
        /// Configured minimum
        required: u32,
    },

    /// Every scene attempt for one image was rejected
    #[error("No valid scene for image {image_index} after {attempts} attempts")]
    AttemptsExhausted {
        /// Output index
        image_index: u32,
        /// Scene attempts made
        attempts: u32,
    },

    /// Ground axes cannot be derived from the camera
    #[error("Degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    /// Renderer failure outside the retried render call
    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene record encoding error
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SceneError {
    /// Whether restarting placement for the same image may succeed
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::PlacementExhausted { .. } | Self::Occluded { .. })
    }
}
