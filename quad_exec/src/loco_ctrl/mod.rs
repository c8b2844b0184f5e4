//! # Locomotion control module
//!
//! Runs one control tick of the locomotion core: the held body pose command is converted to foot
//! targets, the held velocity command adds the gait on top, inverse kinematics produces the joint
//! angles and odometry estimates the resulting body velocity.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;
use crate::quad_base::QuadBaseError;
use util::archive::ArchiveError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LocoCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LocoCtrlError {
    #[error("Invalid gait configuration: {0}")]
    InvalidGaitConfig(QuadBaseError),

    #[error("Cannot create the archive directory: {0}")]
    ArchiveDirError(std::io::Error),

    #[error("Archive error: {0}")]
    ArchiveError(ArchiveError),
}
