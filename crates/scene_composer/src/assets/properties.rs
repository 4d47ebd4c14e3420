//! Property catalog loader
//!
//! Loads the JSON catalog naming every color, material, shape and size an
//! object may take. The file looks like:
//!
//! ```json
//! {
//!   "colors":    { "red": [173, 35, 35] },
//!   "materials": { "rubber": "Rubber" },
//!   "shapes":    { "cube": "SmoothCube_v2" },
//!   "sizes":     { "large": 0.7 }
//! }
//! ```
//!
//! Materials and shapes map a human label to the renderer token. Entries are
//! kept in label order so sampling is reproducible for a given seed.

use std::collections::BTreeMap;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read property catalog {path}: {source}")]
    Io {
        /// Catalog path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not valid JSON or has the wrong shape
    #[error("Malformed property catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A category has no entries
    #[error("Property catalog has no {0}")]
    Empty(&'static str),

    /// A size scalar is not a positive finite number
    #[error("Size '{label}' has invalid radius {radius}")]
    InvalidSize {
        /// Size label
        label: String,
        /// Offending value
        radius: f32,
    },
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    colors: BTreeMap<String, [u8; 3]>,
    materials: BTreeMap<String, String>,
    shapes: BTreeMap<String, String>,
    sizes: BTreeMap<String, f32>,
}

/// A named color with its normalized RGBA value
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEntry {
    /// Color name
    pub name: String,
    /// RGBA in `0.0..=1.0`, alpha always 1
    pub rgba: [f32; 4],
}

/// A label paired with the token the renderer knows it by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Human label written to scene records
    pub label: String,
    /// Renderer asset token
    pub token: String,
}

/// A size label and its scalar radius
#[derive(Debug, Clone, PartialEq)]
pub struct SizeEntry {
    /// Size label
    pub label: String,
    /// Object radius in world units
    pub radius: f32,
}

/// Immutable catalog of object properties
#[derive(Debug, Clone)]
pub struct PropertyCatalog {
    colors: Vec<ColorEntry>,
    materials: Vec<CatalogEntry>,
    shapes: Vec<CatalogEntry>,
    sizes: Vec<SizeEntry>,
}

impl PropertyCatalog {
    /// Load the catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::from_json_str(&contents)?;
        log::info!(
            "Loaded property catalog {:?}: {} colors, {} materials, {} shapes, {} sizes",
            path,
            catalog.colors.len(),
            catalog.materials.len(),
            catalog.shapes.len(),
            catalog.sizes.len()
        );
        Ok(catalog)
    }

    /// Parse the catalog from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;

        let colors: Vec<ColorEntry> = raw
            .colors
            .into_iter()
            .map(|(name, rgb)| ColorEntry {
                name,
                rgba: [
                    f32::from(rgb[0]) / 255.0,
                    f32::from(rgb[1]) / 255.0,
                    f32::from(rgb[2]) / 255.0,
                    1.0,
                ],
            })
            .collect();
        let materials = to_entries(raw.materials);
        let shapes = to_entries(raw.shapes);
        let sizes: Vec<SizeEntry> = raw
            .sizes
            .into_iter()
            .map(|(label, radius)| SizeEntry { label, radius })
            .collect();

        if colors.is_empty() {
            return Err(CatalogError::Empty("colors"));
        }
        if materials.is_empty() {
            return Err(CatalogError::Empty("materials"));
        }
        if shapes.is_empty() {
            return Err(CatalogError::Empty("shapes"));
        }
        if sizes.is_empty() {
            return Err(CatalogError::Empty("sizes"));
        }
        if let Some(bad) = sizes.iter().find(|s| !(s.radius.is_finite() && s.radius > 0.0)) {
            return Err(CatalogError::InvalidSize {
                label: bad.label.clone(),
                radius: bad.radius,
            });
        }

        Ok(Self {
            colors,
            materials,
            shapes,
            sizes,
        })
    }

    /// All colors
    pub fn colors(&self) -> &[ColorEntry] {
        &self.colors
    }

    /// All materials
    pub fn materials(&self) -> &[CatalogEntry] {
        &self.materials
    }

    /// All shapes
    pub fn shapes(&self) -> &[CatalogEntry] {
        &self.shapes
    }

    /// All sizes
    pub fn sizes(&self) -> &[SizeEntry] {
        &self.sizes
    }

    /// Look up a color by name
    pub fn color(&self, name: &str) -> Option<&ColorEntry> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// Look up a shape by label
    pub fn shape(&self, label: &str) -> Option<&CatalogEntry> {
        self.shapes.iter().find(|s| s.label == label)
    }

    /// Look up a material by label
    pub fn material(&self, label: &str) -> Option<&CatalogEntry> {
        self.materials.iter().find(|m| m.label == label)
    }

    /// Uniformly pick a size
    pub fn choose_size<R: Rng + ?Sized>(&self, rng: &mut R) -> &SizeEntry {
        // Non-empty by construction.
        &self.sizes[rng.gen_range(0..self.sizes.len())]
    }

    /// Uniformly pick a shape
    pub fn choose_shape<R: Rng + ?Sized>(&self, rng: &mut R) -> &CatalogEntry {
        &self.shapes[rng.gen_range(0..self.shapes.len())]
    }

    /// Uniformly pick a material
    pub fn choose_material<R: Rng + ?Sized>(&self, rng: &mut R) -> &CatalogEntry {
        &self.materials[rng.gen_range(0..self.materials.len())]
    }

    /// Uniformly pick a color
    pub fn choose_color<R: Rng + ?Sized>(&self, rng: &mut R) -> &ColorEntry {
        &self.colors[rng.gen_range(0..self.colors.len())]
    }
}

fn to_entries(map: BTreeMap<String, String>) -> Vec<CatalogEntry> {
    map.into_iter()
        .map(|(label, token)| CatalogEntry { label, token })
        .collect()
}
