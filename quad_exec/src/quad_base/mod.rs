//! # Quadruped kinematic model
//!
//! The robot is modelled as a base carrying four legs, each a chain of four joints (hip, upper
//! leg, lower leg, foot). Legs are always stored in `LegId` order, which is also the order of the
//! 12 entry joint vectors (hip, upper, lower for each leg).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod base;
mod gait_config;
mod geometry;
mod joint;
mod leg;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use comms_if::tc::{PoseCmd, VelCmd};

// Internal
pub use base::*;
pub use gait_config::*;
pub use geometry::*;
pub use joint::*;
pub use leg::*;
use crate::geom::Vec3;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of legs on the robot.
pub const NUM_LEGS: usize = 4;

/// Number of joints in each leg's chain, including the (unactuated) foot.
pub const NUM_LEG_LINKS: usize = 4;

/// Number of actuated joints per leg.
pub const NUM_ACT_JOINTS_PER_LEG: usize = 3;

/// Number of actuated joints on the robot.
pub const NUM_JOINTS: usize = NUM_LEGS * NUM_ACT_JOINTS_PER_LEG;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Body velocities.
///
/// The planar gait only uses `linear.x`, `linear.y` and `angular.z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocities {
    /// Units: meters/second
    pub linear: Vec3,

    /// Units: radians/second
    pub angular: Vec3,
}

/// Body pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Units: meters
    pub position: Vec3,

    /// Roll, pitch and yaw.
    ///
    /// Units: radians
    pub orientation: Vec3,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Identifies one of the legs. The discriminant is the leg's index in every per-leg array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegId {
    LeftFront = 0,
    RightFront = 1,
    LeftBack = 2,
    RightBack = 3,
}

/// Errors associated with the kinematic model.
#[derive(Debug, thiserror::Error)]
pub enum QuadBaseError {
    #[error(
        "Knee orientation must be exactly two characters (front legs, back legs), found \"{0}\""
    )]
    InvalidKneeOrientation(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegId {
    /// All legs in storage order.
    pub const ALL: [LegId; NUM_LEGS] = [
        LegId::LeftFront,
        LegId::RightFront,
        LegId::LeftBack,
        LegId::RightBack,
    ];

    /// Index of this leg into per-leg arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Velocities {
    /// Zero velocity.
    pub fn zero() -> Self {
        Self {
            linear: Vec3::zeros(),
            angular: Vec3::zeros(),
        }
    }
}

impl Default for Velocities {
    fn default() -> Self {
        Self::zero()
    }
}

impl Pose {
    /// Build a pose from a position and roll, pitch, yaw angles.
    pub fn new(position: Vec3, orientation: Vec3) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn roll(&self) -> f64 {
        self.orientation.x
    }

    pub fn pitch(&self) -> f64 {
        self.orientation.y
    }

    pub fn yaw(&self) -> f64 {
        self.orientation.z
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }
}

impl From<&VelCmd> for Velocities {
    fn from(cmd: &VelCmd) -> Self {
        Self {
            linear: Vec3::from(cmd.linear_ms),
            angular: Vec3::from(cmd.angular_rads),
        }
    }
}

impl From<&PoseCmd> for Pose {
    fn from(cmd: &PoseCmd) -> Self {
        Self::new(
            Vec3::new(cmd.x_m, cmd.y_m, cmd.z_m),
            Vec3::new(cmd.roll_rad, cmd.pitch_rad, cmd.yaw_rad),
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
