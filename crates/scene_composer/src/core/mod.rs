//! # Core Module
//!
//! Shared configuration that every subsystem reads from.
//!
//! ## Organization
//!
//! - **Config**: Generator configuration grouped by subsystem
//! - **Foundation**: Low-level utilities (math, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    GeneratorConfig,
    PathsConfig,
    JitterConfig,
    PlacementConfig,
    VisibilityConfig,
    SceneConfig,
    RenderSettings,
    RenderDevice,
    Config,
    ConfigError,
};
