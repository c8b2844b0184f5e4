//! Gait configuration

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::geom::Vec3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the walking gait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitConfig {
    /// Knee orientation of the front and back legs, one character each. `>` bends the knee
    /// backwards (direction -1), `<` forwards (direction +1). Any other character is treated as
    /// `>`.
    pub knee_orientation: String,

    /// True if the legs are pantograph legs.
    pub pantograph_leg: bool,

    /// Scale applied to the linear velocity estimated by odometry.
    pub odom_scalar: f64,

    /// Maximum commanded linear velocity about each axis.
    ///
    /// Units: meters/second
    pub max_linear_velocity: Vec3,

    /// Maximum commanded yaw rate.
    ///
    /// Units: radians/second
    pub max_angular_velocity: f64,

    /// Forward shift of the nominal foot position to move the centre of mass.
    ///
    /// Units: meters
    pub com_x_translation: f64,

    /// Peak foot lift during swing.
    ///
    /// Units: meters
    pub swing_height: f64,

    /// Depth the foot is pushed below the nominal stance during stance.
    ///
    /// Units: meters
    pub stance_depth: f64,

    /// Duration of the stance phase.
    ///
    /// Units: seconds
    pub stance_duration: f64,

    /// Nominal height of the body above the feet.
    ///
    /// Units: meters
    pub nominal_height: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            knee_orientation: String::from(">>"),
            pantograph_leg: false,
            odom_scalar: 1.0,
            max_linear_velocity: Vec3::new(0.5, 0.25, 0.0),
            max_angular_velocity: 1.0,
            com_x_translation: 0.0,
            swing_height: 0.04,
            stance_depth: 0.0,
            stance_duration: 0.25,
            nominal_height: 0.2,
        }
    }
}
