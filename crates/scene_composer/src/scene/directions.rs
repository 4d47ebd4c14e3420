//! Camera-relative direction vocabulary

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Named direction on the ground plane, relative to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the camera
    Front,
    /// Away from the camera
    Behind,
    /// Camera left
    Left,
    /// Camera right
    Right,
    /// Along the ground normal
    Above,
    /// Against the ground normal
    Below,
}

impl Direction {
    /// All six directions
    pub const ALL: [Self; 6] = [
        Self::Behind,
        Self::Front,
        Self::Left,
        Self::Right,
        Self::Above,
        Self::Below,
    ];

    /// Directions that take part in relationships
    pub const HORIZONTAL: [Self; 4] = [Self::Left, Self::Right, Self::Front, Self::Behind];

    /// The opposite direction
    pub const fn opposite(self) -> Self {
        match self {
            Self::Front => Self::Behind,
            Self::Behind => Self::Front,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Above => Self::Below,
            Self::Below => Self::Above,
        }
    }

    /// Whether the direction lies in the ground plane
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Self::Above | Self::Below)
    }

    /// Lowercase name used in scene records
    pub const fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Behind => "behind",
            Self::Left => "left",
            Self::Right => "right",
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit vectors for all six directions
///
/// Stores the three primary axes; the other three are their negations, so
/// `front == -behind`, `right == -left` and `below == -above` hold exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionSet {
    behind: Vec3,
    left: Vec3,
    above: Vec3,
}

impl DirectionSet {
    /// Build from the three primary unit axes
    pub fn new(behind: Vec3, left: Vec3, above: Vec3) -> Self {
        Self { behind, left, above }
    }

    /// Unit vector of `direction`
    pub fn vector(&self, direction: Direction) -> Vec3 {
        match direction {
            Direction::Behind => self.behind,
            Direction::Front => -self.behind,
            Direction::Left => self.left,
            Direction::Right => -self.left,
            Direction::Above => self.above,
            Direction::Below => -self.above,
        }
    }

    /// Name-indexed map, as written to scene records
    pub fn to_map(&self) -> BTreeMap<Direction, Vec3> {
        Direction::ALL
            .iter()
            .map(|&d| (d, self.vector(d)))
            .collect()
    }

    /// Rebuild from a scene record's map, if the three primary axes are present
    pub fn from_map(map: &BTreeMap<Direction, Vec3>) -> Option<Self> {
        Some(Self {
            behind: *map.get(&Direction::Behind)?,
            left: *map.get(&Direction::Left)?,
            above: *map.get(&Direction::Above)?,
        })
    }
}
