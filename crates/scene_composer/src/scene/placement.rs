//! Object placement planner
//!
//! Samples object attributes and ground positions one object at a time. A
//! candidate position is rejected when it:
//!
//! - leaves less than `min_dist` of free ground between its footprint and any
//!   placed object's footprint,
//! - sits within `margin` of a placed object along one of the four
//!   horizontal directions, which would make the left/right/front/behind
//!   label of that pair ambiguous,
//! - does not project inside the image frame with `margin` to spare.
//!
//! After `max_retries` rejected samples for one object the whole list is
//! dropped and the caller restarts the scene.

use std::f32::consts::SQRT_2;
use std::fmt;

use rand::Rng;

use crate::assets::{CatalogEntry, PropertyCatalog};
use crate::core::config::PlacementConfig;
use crate::foundation::math::{utils, Vec3};
use crate::render::{Camera, PixelCoords};
use crate::scene::{Direction, DirectionSet, ObjectRecord, SceneError};

/// Why a candidate position was turned down
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Free ground between footprints is below `min_dist`
    TooClose {
        /// Index of the conflicting object
        other: usize,
        /// Free ground left between the two footprints
        gap: f32,
    },
    /// Offset along a horizontal direction is positive but below `margin`
    Margin {
        /// Index of the conflicting object
        other: usize,
        /// Direction along which the offset was measured
        direction: Direction,
        /// Offset along that direction
        offset: f32,
    },
    /// Centre does not project inside the image with `margin` to spare
    OutOfFrame,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooClose { other, gap } => write!(f, "gap {gap:.3} to object {other}"),
            Self::Margin { other, direction, offset } => {
                write!(f, "offset {offset:.3} {direction} of object {other}")
            }
            Self::OutOfFrame => f.write_str("outside the image frame"),
        }
    }
}

/// Resting radius of `shape` at catalog radius `size_radius`
///
/// Cubes are shrunk by √2 so their corners, not their faces, stay within the
/// nominal radius. The result sets the object's height above the ground and
/// its drawn size; separation is always measured with the catalog radius.
pub fn footprint_radius(shape: &CatalogEntry, size_radius: f32) -> f32 {
    let is_cube = shape.label.eq_ignore_ascii_case("cube")
        || shape.token.to_ascii_lowercase().contains("cube");
    if is_cube {
        size_radius / SQRT_2
    } else {
        size_radius
    }
}

/// Samples objects subject to separation, margin and frame constraints
pub struct PlacementPlanner<'a> {
    catalog: &'a PropertyCatalog,
    config: &'a PlacementConfig,
}

impl<'a> PlacementPlanner<'a> {
    /// Create a planner drawing attributes from `catalog`
    pub fn new(catalog: &'a PropertyCatalog, config: &'a PlacementConfig) -> Self {
        Self { catalog, config }
    }

    /// Place exactly `num_objects` objects
    ///
    /// Returns [`SceneError::PlacementExhausted`] as soon as one object
    /// cannot be placed; no partial list is ever returned.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        num_objects: usize,
        directions: &DirectionSet,
        camera: &Camera,
        rng: &mut R,
    ) -> Result<Vec<ObjectRecord>, SceneError> {
        let mut objects: Vec<ObjectRecord> = Vec::with_capacity(num_objects);
        let extent = self.config.ground_extent;

        for index in 0..num_objects {
            let size = self.catalog.choose_size(rng);
            let shape = self.catalog.choose_shape(rng);
            let material = self.catalog.choose_material(rng);
            let color = self.catalog.choose_color(rng);
            let rotation = 360.0 * rng.gen::<f32>();
            let radius = footprint_radius(shape, size.radius);

            let mut coords = None;
            for attempt in 1..=self.config.max_retries {
                let candidate = Vec3::new(
                    rng.gen_range(-extent..extent),
                    rng.gen_range(-extent..extent),
                    radius,
                );
                match self.check_candidate(&candidate, size.radius, &objects, directions, camera) {
                    Ok(()) => {
                        coords = Some(candidate);
                        break;
                    }
                    Err(reason) => {
                        log::trace!("Object {} attempt {}: rejected, {}", index, attempt, reason);
                    }
                }
            }

            let Some(coords) = coords else {
                return Err(SceneError::PlacementExhausted {
                    object_index: index,
                    attempts: self.config.max_retries,
                });
            };

            objects.push(ObjectRecord {
                shape: shape.label.clone(),
                size: size.label.clone(),
                size_value: size.radius,
                material: material.label.clone(),
                color: color.name.clone(),
                rotation,
                coords,
                pixel_coords: PixelCoords::default(),
                pixel_count_visible: 0,
                shape_token: shape.token.clone(),
                material_token: material.token.clone(),
                rgba: color.rgba,
                radius,
            });
        }

        Ok(objects)
    }

    /// Test one candidate centre against the objects placed so far
    ///
    /// `reach` is the candidate's catalog radius, the furthest any part of it
    /// extends from its centre on the ground. Placed objects are measured by
    /// their `size_value` for the same reason.
    pub fn check_candidate(
        &self,
        candidate: &Vec3,
        reach: f32,
        placed: &[ObjectRecord],
        directions: &DirectionSet,
        camera: &Camera,
    ) -> Result<(), Rejection> {
        let normal = directions.vector(Direction::Above);

        for (other, object) in placed.iter().enumerate() {
            let delta = candidate - object.coords;

            let ground_dist = utils::reject_from(&delta, &normal).magnitude();
            let gap = ground_dist - reach - object.size_value;
            if gap < self.config.min_dist {
                return Err(Rejection::TooClose { other, gap });
            }

            for direction in Direction::HORIZONTAL {
                let offset = delta.dot(&directions.vector(direction));
                if 0.0 < offset && offset < self.config.margin {
                    return Err(Rejection::Margin { other, direction, offset });
                }
            }
        }

        if !camera.is_in_frame_with_margin(candidate, self.config.margin) {
            return Err(Rejection::OutOfFrame);
        }

        Ok(())
    }
}
