//! # Quadruped control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A body velocity command.
///
/// The planar gait only uses the X and Y linear components and the Z angular component, the
/// others are carried for completeness.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VelCmd {
    /// Linear velocity of the body.
    ///
    /// Units: meters/second,
    /// Frame: Robot body
    pub linear_ms: [f64; 3],

    /// Angular velocity of the body (roll, pitch, yaw rates).
    ///
    /// Units: radians/second,
    /// Frame: Robot body
    pub angular_rads: [f64; 3],
}

/// A body pose command, relative to the nominal standing pose.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseCmd {
    /// Units: meters
    #[serde(default)]
    pub x_m: f64,

    /// Units: meters
    #[serde(default)]
    pub y_m: f64,

    /// Units: meters
    #[serde(default)]
    pub z_m: f64,

    /// Units: radians
    #[serde(default)]
    pub roll_rad: f64,

    /// Units: radians
    #[serde(default)]
    pub pitch_rad: f64,

    /// Units: radians
    #[serde(default)]
    pub yaw_rad: f64,
}
