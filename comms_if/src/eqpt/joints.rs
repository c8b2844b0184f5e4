//! # Leg Joint Equipment Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of actuated joints on the robot (hip, upper and lower for each of the four legs).
pub const NUM_JOINTS: usize = 12;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Joint position demands produced by locomotion control.
///
/// Ordered by leg (left front, right front, left back, right back) and then hip, upper, lower
/// within each leg.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct JointDems {
    /// Demanded joint positions.
    ///
    /// Units: radians
    pub pos_rad: [f64; NUM_JOINTS],
}

/// Servo demands, in the same order as `JointDems`, ready for the servo writer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServoDems {
    /// Pin each demand must be written to on the PWM driver.
    pub pin_id: [u8; NUM_JOINTS],

    /// Demanded servo angle.
    ///
    /// Units: degrees
    pub angle_deg: [f64; NUM_JOINTS],

    /// Demanded servo pulse width.
    ///
    /// Units: microseconds
    pub pulse_us: [f64; NUM_JOINTS],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for JointDems {
    fn default() -> Self {
        Self {
            pos_rad: [0.0; NUM_JOINTS],
        }
    }
}

impl From<[f64; NUM_JOINTS]> for JointDems {
    fn from(pos_rad: [f64; NUM_JOINTS]) -> Self {
        Self { pos_rad }
    }
}
