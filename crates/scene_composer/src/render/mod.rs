//! Rendering module
//!
//! The composer never rasterises anything itself. Everything it needs from a
//! renderer goes through [`SceneRenderer`], so the placement and labeling
//! logic runs the same against the CPU [`PreviewRenderer`], a production
//! backend, or a scripted fake in tests.

pub mod camera;
pub mod backend;
pub mod preview;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::Camera;
pub use backend::{PixelCoords, RenderError, SceneRenderer, StagedScene};
pub use preview::PreviewRenderer;
pub use crate::core::config::{RenderDevice, RenderSettings};
