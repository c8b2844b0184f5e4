//! # Data Store

use chrono::Utc;
use comms_if::eqpt::joints::{JointDems, ServoDems};
use log::{info, warn};

use crate::{loco_ctrl, servo_cal::ServoCal};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the robot has been put into safe mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SafeModeCause {
    MakeSafeTc,
    ServoCalError,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    // Safe mode variables
    /// Determines if the robot is in safe mode.
    pub safe: bool,

    /// Gives the reason for the robot being in safe mode.
    pub safe_cause: Option<SafeModeCause>,

    // LocoCtrl
    pub loco_ctrl: loco_ctrl::LocoCtrl,
    pub loco_ctrl_input: loco_ctrl::InputData,
    pub loco_ctrl_output: Option<loco_ctrl::OutputData>,
    pub loco_ctrl_status_rpt: loco_ctrl::StatusReport,

    // Servos
    pub servo_cal: ServoCal,
    pub joint_dems: JointDems,
    pub servo_dems: Option<ServoDems>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of telecommands dropped, either invalid or received in safe mode
    pub num_dropped_tcs: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Create a new data store around the initialised modules.
    pub fn new(loco_ctrl: loco_ctrl::LocoCtrl, servo_cal: ServoCal) -> Self {
        Self {
            num_cycles: 0,
            is_1_hz_cycle: false,
            safe: false,
            safe_cause: None,
            loco_ctrl,
            loco_ctrl_input: loco_ctrl::InputData::at(Utc::now()),
            loco_ctrl_output: None,
            loco_ctrl_status_rpt: loco_ctrl::StatusReport::default(),
            servo_cal,
            joint_dems: JointDems::default(),
            servo_dems: None,
            num_consec_cycle_overruns: 0,
            num_dropped_tcs: 0,
        }
    }

    /// Puts the robot into safe mode with the given cause.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if !self.safe {
            warn!("Make safe requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);

            // Make loco_ctrl safe
            self.loco_ctrl.make_safe();

            // Drop any command already accepted this cycle
            self.loco_ctrl_input.vel_cmd = None;
            self.loco_ctrl_input.pose_cmd = None;
        }
    }

    /// Attempts to disable the safe mode by clearing the given cause.
    ///
    /// Returns `Ok(())` if this cause was cleared and safe mode was disabled, or `Err(())`
    /// otherwise. To remove safe mode the provided cause must match the initial reason for safe
    /// mode being enabled.
    ///
    /// If safe mode was not enabled `Ok(())` is returned
    pub fn make_unsafe(&mut self, cause: SafeModeCause) -> Result<(), ()> {
        if !self.safe {
            return Ok(());
        }

        match self.safe_cause {
            Some(root_cause) => {
                if cause == root_cause {
                    self.safe = false;
                    self.safe_cause = None;
                    info!("Make unsafe requested, root cause match, safe mode disabled");
                    Ok(())
                } else {
                    Err(())
                }
            }
            None => Ok(()),
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        let cycles_per_second = (cycle_frequency_hz.round() as u128).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_second == 0;

        self.loco_ctrl_input = loco_ctrl::InputData::at(Utc::now());
        self.loco_ctrl_output = None;
        self.loco_ctrl_status_rpt = loco_ctrl::StatusReport::default();
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::Vec3;
    use crate::quad_base::{GaitConfig, QuadGeometry, Velocities};
    use crate::servo_cal::{self, ServoCalibration};

    fn data_store() -> DataStore {
        let loco_ctrl = loco_ctrl::LocoCtrl::new(
            loco_ctrl::Params {
                gait: GaitConfig::default(),
                geometry: QuadGeometry::symmetric(0.175, 0.105, 0.06, 0.141, 0.141),
            },
            Utc::now(),
        )
        .unwrap();

        let mut pin = 0u8;
        let servos = [(); comms_if::eqpt::joints::NUM_JOINTS].map(|_| {
            pin += 1;
            ServoCalibration {
                alias: format!("joint_{}", pin - 1),
                pin_id: pin - 1,
                actuation_range_deg: 180.0,
                min_pulse_us: 500.0,
                max_pulse_us: 2500.0,
                default_position_deg: 90.0,
                direction: 1.0,
            }
        });

        DataStore::new(loco_ctrl, ServoCal::new(servo_cal::Params { servos }))
    }

    #[test]
    fn test_safe_mode() {
        let mut ds = data_store();
        assert!(!ds.safe);

        ds.loco_ctrl_input.vel_cmd = Some(Velocities {
            linear: Vec3::new(0.1, 0.0, 0.0),
            angular: Vec3::zeros(),
        });
        ds.make_safe(SafeModeCause::MakeSafeTc);

        assert!(ds.safe);
        assert!(ds.loco_ctrl_input.vel_cmd.is_none());

        // The cause must match to leave safe mode
        assert!(ds.make_unsafe(SafeModeCause::ServoCalError).is_err());
        assert!(ds.safe);
        assert!(ds.make_unsafe(SafeModeCause::MakeSafeTc).is_ok());
        assert!(!ds.safe);
        assert!(ds.safe_cause.is_none());

        // Already unsafe
        assert!(ds.make_unsafe(SafeModeCause::ServoCalError).is_ok());
    }

    #[test]
    fn test_cycles() {
        let mut ds = data_store();

        ds.cycle_start(50.0);
        assert!(ds.is_1_hz_cycle);
        ds.cycle_end();

        ds.cycle_start(50.0);
        assert!(!ds.is_1_hz_cycle);
        assert_eq!(ds.num_cycles, 1);
    }
}
