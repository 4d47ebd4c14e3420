//! Base scene description
//!
//! The fixed part of every image: camera, the three-point light rig and the
//! ground plane. A renderer reports it from whatever scene file it opens; the
//! preview renderer reads it from TOML or RON.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::Vec3;
use crate::render::Camera;

/// Named lights of the base scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightRole {
    /// Main light
    Key,
    /// Shadow fill light
    Fill,
    /// Rim light behind the objects
    Back,
}

impl LightRole {
    /// Every light, in the order their jitter is drawn
    pub const ALL: [Self; 3] = [Self::Key, Self::Back, Self::Fill];
}

/// Light positions in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLights {
    /// Key light position
    pub key: Vec3,
    /// Fill light position
    pub fill: Vec3,
    /// Back light position
    pub back: Vec3,
}

impl SceneLights {
    /// Position of one light
    pub fn position(&self, role: LightRole) -> Vec3 {
        match role {
            LightRole::Key => self.key,
            LightRole::Fill => self.fill,
            LightRole::Back => self.back,
        }
    }

    /// Mutable position of one light
    pub fn position_mut(&mut self, role: LightRole) -> &mut Vec3 {
        match role {
            LightRole::Key => &mut self.key,
            LightRole::Fill => &mut self.fill,
            LightRole::Back => &mut self.back,
        }
    }
}

impl Default for SceneLights {
    fn default() -> Self {
        Self {
            key: Vec3::new(6.44, -2.91, 4.22),
            fill: Vec3::new(-4.67, -4.01, 3.01),
            back: Vec3::new(-1.19, 2.66, 5.85),
        }
    }
}

/// Camera, lights and ground of the base scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseScene {
    /// Camera before jitter
    pub camera: Camera,
    /// Lights before jitter
    pub lights: SceneLights,
    /// Normal of the ground plane objects rest on
    pub ground_normal: Vec3,
}

impl Default for BaseScene {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            lights: SceneLights::default(),
            ground_normal: Vec3::z(),
        }
    }
}

impl Config for BaseScene {}
