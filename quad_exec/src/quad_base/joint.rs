//! A single joint in a leg's kinematic chain

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::JointGeometry;
use crate::geom::Vec3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A joint with a fixed origin relative to its parent and a variable angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadJoint {
    /// Offset of this joint from its parent joint (the base for the hip).
    ///
    /// Units: meters
    pub translation: Vec3,

    /// Fixed roll, pitch, yaw of the joint's origin.
    ///
    /// Units: radians
    pub rotation: Vec3,

    /// Current joint angle. Unused for the foot.
    ///
    /// Units: radians
    pub theta: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl QuadJoint {
    pub fn new(translation: Vec3, rotation: Vec3, theta: f64) -> Self {
        Self {
            translation,
            rotation,
            theta,
        }
    }

    pub fn x(&self) -> f64 {
        self.translation.x
    }

    pub fn y(&self) -> f64 {
        self.translation.y
    }

    pub fn z(&self) -> f64 {
        self.translation.z
    }
}

impl From<&JointGeometry> for QuadJoint {
    fn from(geom: &JointGeometry) -> Self {
        Self::new(geom.translation, geom.rotation, 0.0)
    }
}
