//! Scene and object records written next to every rendered image

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::PixelCoords;
use crate::scene::{Direction, DirectionSet, SceneError};

/// For each horizontal direction, object `i` maps to the sorted indices of the
/// objects lying that way from it
pub type Relationships = BTreeMap<Direction, Vec<Vec<usize>>>;

/// One placed object
///
/// Attribute fields hold catalog labels. Renderer-facing data (tokens, RGBA,
/// footprint radius) is kept alongside but never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Shape label
    pub shape: String,
    /// Size label
    pub size: String,
    /// Radius the size label maps to
    pub size_value: f32,
    /// Material label
    pub material: String,
    /// Color name
    pub color: String,
    /// Rotation about the ground normal in degrees, `[0, 360)`
    pub rotation: f32,
    /// Object centre in world space
    #[serde(rename = "3d_coords")]
    pub coords: Vec3,
    /// Projected centre; filled in by the visibility resolver
    #[serde(default)]
    pub pixel_coords: PixelCoords,
    /// Unoccluded pixels; filled in by the visibility resolver
    #[serde(default)]
    pub pixel_count_visible: u32,

    /// Renderer token of the shape
    #[serde(skip)]
    pub shape_token: String,
    /// Renderer token of the material
    #[serde(skip)]
    pub material_token: String,
    /// Color as RGBA in `0.0..=1.0`
    #[serde(skip)]
    pub rgba: [f32; 4],
    /// Ground footprint radius used for separation and drawing
    #[serde(skip)]
    pub radius: f32,
}

/// Everything known about one generated image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Output index; also the base file name of the image and record
    pub image_index: u32,
    /// Objects in placement order
    pub objects: Vec<ObjectRecord>,
    /// Camera-aligned unit directions
    pub directions: BTreeMap<Direction, Vec3>,
    /// Directional adjacency lists
    pub relationships: Relationships,
}

impl SceneRecord {
    /// Directions as a [`DirectionSet`]
    pub fn direction_set(&self) -> Option<DirectionSet> {
        DirectionSet::from_map(&self.directions)
    }

    /// Write the record as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a record back from JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(serde_json::from_reader(reader)?)
    }
}
