//! Leg geometry parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::NUM_LEGS;
use crate::geom::Vec3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Origin of one joint relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointGeometry {
    /// Units: meters
    pub translation: Vec3,

    /// Units: radians
    #[serde(default = "zero_rotation")]
    pub rotation: Vec3,
}

/// Geometry of one leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegGeometry {
    /// Hip joint relative to the base centre.
    pub hip: JointGeometry,

    /// Upper leg joint relative to the hip.
    pub upper: JointGeometry,

    /// Lower leg joint relative to the upper leg joint.
    pub lower: JointGeometry,

    /// Foot relative to the lower leg joint.
    pub foot: JointGeometry,
}

/// Geometry of the whole robot.
///
/// Frame: robot body, X forward, Y left, Z up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadGeometry {
    /// One entry per leg, in `LegId` order.
    pub legs: [LegGeometry; NUM_LEGS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointGeometry {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            rotation: Vec3::zeros(),
        }
    }
}

impl QuadGeometry {
    /// Build a left/right symmetric robot.
    ///
    /// - `hip_x`, `hip_y`: hip offsets from the base centre
    /// - `upper_y`: lateral offset of the upper leg joint from the hip (positive is outwards)
    /// - `upper_len`, `lower_len`: lengths of the two leg segments, which hang straight down
    ///   when all joints are zero.
    pub fn symmetric(
        hip_x: f64,
        hip_y: f64,
        upper_y: f64,
        upper_len: f64,
        lower_len: f64,
    ) -> Self {
        let leg = |sx: f64, sy: f64| LegGeometry {
            hip: JointGeometry::new(sx * hip_x, sy * hip_y, 0.0),
            upper: JointGeometry::new(0.0, sy * upper_y, 0.0),
            lower: JointGeometry::new(0.0, 0.0, -upper_len),
            foot: JointGeometry::new(0.0, 0.0, -lower_len),
        };

        Self {
            legs: [
                leg(1.0, 1.0),
                leg(1.0, -1.0),
                leg(-1.0, 1.0),
                leg(-1.0, -1.0),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn zero_rotation() -> Vec3 {
    Vec3::zeros()
}
