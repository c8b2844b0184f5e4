//! # Quadruped library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access the
//! locomotion core defined inside the quadruped crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geometry - points, rotations and rigid transformations
pub mod geom;

/// Kinematic model of the robot - joints, legs, the base and gait configuration
pub mod quad_base;

/// Body controller - converts a body pose command into foot targets
pub mod body_ctrl;

/// Kinematics - analytic inverse kinematics for each leg
pub mod kinematics;

/// Leg controller - gait timing and foot trajectory generation
pub mod leg_ctrl;

/// Odometry - estimates body velocity from foot motion
pub mod odometry;

/// Locomotion control module - runs the full control tick from commands to joint angles
pub mod loco_ctrl;

/// Servo calibration - converts joint angles into servo demands
pub mod servo_cal;

/// Data store for the executable
pub mod data_store;

/// Parameters for the executable
pub mod params;
