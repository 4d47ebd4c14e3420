//! Asset module
//!
//! Read-only lookup tables shared by every generated scene.

pub mod properties;

pub use properties::{CatalogEntry, CatalogError, ColorEntry, PropertyCatalog, SizeEntry};
