//! # Scene Composer
//!
//! Procedural scene composition for synthetic image datasets. Each scene is a
//! random arrangement of simple objects on a ground plane, rendered through an
//! external renderer and described by a side-car record of object attributes
//! and camera-relative spatial relationships.
//!
//! ## Features
//!
//! - **Scene Initializer**: camera and light jitter, camera-aligned ground axes
//! - **Placement Planner**: separation- and margin-aware random placement
//! - **Visibility Resolver**: pixel projection and occlusion rejection
//! - **Relationship Computer**: front/behind/left/right adjacency lists
//! - **Renderer Abstraction**: any backend implementing [`render::SceneRenderer`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_composer::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeneratorConfig::default();
//!     let catalog = PropertyCatalog::load(&config.paths.properties_json)?;
//!     let mut renderer = PreviewRenderer::new();
//!     let mut composer = SceneComposer::new(&config, &catalog, &mut renderer);
//!     composer.generate(0, 42)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod scene;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        foundation::math::{Vec3, Mat4, Point3},
        assets::{PropertyCatalog, CatalogError},
        render::{
            Camera, PixelCoords, PreviewRenderer, RenderDevice, RenderError, RenderSettings,
            SceneRenderer, StagedScene,
        },
        scene::{
            compute_all_relationships, BaseScene, Direction, DirectionSet, ObjectRecord,
            SceneComposer, SceneError, SceneRecord,
        },
        core::config::{GeneratorConfig, JitterConfig, PathsConfig, PlacementConfig, SceneConfig, VisibilityConfig},
        config::{Config, ConfigError},
    };
}
