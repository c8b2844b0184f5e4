//! # Quadruped Executable Parameters
//!
//! This module provide parameters for the quadruped executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// LocoCtrl parameter file, relative to the params directory
    pub loco_ctrl_params: String,

    /// Servo calibration parameter file, relative to the params directory
    pub servo_cal_params: String,

    /// If true module archives are written into the session directory
    #[serde(default)]
    pub archive: bool,

    /// Minimum level of the log, one of `info`, `debug` or `trace`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn default_log_level() -> String {
    String::from("debug")
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
