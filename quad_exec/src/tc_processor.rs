//! # Telecommand processor module
//!
//! The telecommand processor handles various TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use comms_if::tc::{PoseCmd, Tc, TcType, VelCmd};
use quad_lib::{
    data_store::{DataStore, SafeModeCause},
    quad_base::{GaitConfig, Pose, Velocities},
};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules. While in safe mode only the
/// `UNSAFE` and `HEARTBEAT` TCs are executed. Any TC whose payload cannot be decoded is dropped,
/// leaving the previous command in force.
pub(crate) fn exec(ds: &mut DataStore, tc: &Tc) {
    if ds.safe && tc.tc_type != TcType::MakeUnsafe && tc.tc_type != TcType::Heartbeat {
        warn!("In safe mode, dropping {:?} TC", tc.tc_type);
        ds.num_dropped_tcs += 1;
        return;
    }

    // Handle different Tcs
    match tc.tc_type {
        TcType::None => (),
        TcType::Heartbeat => {
            debug!("Recieved Heartbeat");
        }
        TcType::MakeSafe => {
            debug!("Recieved MakeSafe command");
            ds.make_safe(SafeModeCause::MakeSafeTc);
        }
        TcType::MakeUnsafe => {
            debug!("Recieved MakeUnsafe command");
            ds.make_unsafe(SafeModeCause::MakeSafeTc).ok();
        }
        TcType::VelCmd => match tc.decode_payload::<VelCmd>() {
            Ok(cmd) => ds.loco_ctrl_input.vel_cmd = Some(Velocities::from(&cmd)),
            Err(e) => drop_tc(ds, e),
        },
        TcType::PoseCmd => match tc.decode_payload::<PoseCmd>() {
            Ok(cmd) => ds.loco_ctrl_input.pose_cmd = Some(Pose::from(&cmd)),
            Err(e) => drop_tc(ds, e),
        },
        TcType::GaitConfig => match tc.decode_payload::<GaitConfig>() {
            Ok(cfg) => {
                if let Err(e) = ds.loco_ctrl.set_gait_config(cfg) {
                    drop_tc(ds, e)
                }
            }
            Err(e) => drop_tc(ds, e),
        },
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn drop_tc<E: std::fmt::Display>(ds: &mut DataStore, e: E) {
    warn!("Dropping TC: {}", e);
    ds.num_dropped_tcs += 1;
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;
    use comms_if::eqpt::joints::NUM_JOINTS;
    use quad_lib::{
        loco_ctrl::{LocoCtrl, Params},
        quad_base::QuadGeometry,
        servo_cal::{self, ServoCal, ServoCalibration},
    };

    fn data_store() -> DataStore {
        let loco_ctrl = LocoCtrl::new(
            Params {
                gait: GaitConfig::default(),
                geometry: QuadGeometry::symmetric(0.175, 0.105, 0.06, 0.141, 0.141),
            },
            Utc::now(),
        )
        .unwrap();

        let servos = [(); NUM_JOINTS].map(|_| ServoCalibration {
            alias: String::from("joint"),
            pin_id: 0,
            actuation_range_deg: 180.0,
            min_pulse_us: 500.0,
            max_pulse_us: 2500.0,
            default_position_deg: 90.0,
            direction: 1.0,
        });

        DataStore::new(loco_ctrl, ServoCal::new(servo_cal::Params { servos }))
    }

    fn tc(json: &str) -> Tc {
        Tc::from_json(json).unwrap()
    }

    #[test]
    fn test_commands() {
        let mut ds = data_store();

        exec(
            &mut ds,
            &tc(r#"{"type": "VEL", "payload": {"linear_ms": [0.1, 0.0, 0.0], "angular_rads": [0.0, 0.0, 0.2]}}"#),
        );
        let v = ds.loco_ctrl_input.vel_cmd.unwrap();
        assert_eq!(v.linear.x, 0.1);
        assert_eq!(v.angular.z, 0.2);

        exec(&mut ds, &tc(r#"{"type": "POSE", "payload": {"z_m": -0.03}}"#));
        assert_eq!(ds.loco_ctrl_input.pose_cmd.unwrap().position.z, -0.03);

        let mut cfg = GaitConfig::default();
        cfg.swing_height = 0.06;
        let json = format!(
            r#"{{"type": "GAIT", "payload": {}}}"#,
            serde_json::to_string(&cfg).unwrap()
        );
        exec(&mut ds, &tc(&json));
        assert_eq!(ds.loco_ctrl.gait_config().swing_height, 0.06);
        assert_eq!(ds.num_dropped_tcs, 0);
    }

    #[test]
    fn test_invalid_payloads() {
        let mut ds = data_store();

        exec(&mut ds, &tc(r#"{"type": "VEL", "payload": {"linear_ms": "fast"}}"#));
        assert!(ds.loco_ctrl_input.vel_cmd.is_none());

        let mut cfg = GaitConfig::default();
        cfg.knee_orientation = String::from(">>>");
        let json = format!(
            r#"{{"type": "GAIT", "payload": {}}}"#,
            serde_json::to_string(&cfg).unwrap()
        );
        exec(&mut ds, &tc(&json));
        assert_eq!(ds.loco_ctrl.gait_config(), &GaitConfig::default());

        assert_eq!(ds.num_dropped_tcs, 2);
    }

    #[test]
    fn test_safe_mode_gating() {
        let mut ds = data_store();

        exec(&mut ds, &tc(r#"{"type": "SAFE"}"#));
        assert!(ds.safe);

        exec(&mut ds, &tc(r#"{"type": "POSE", "payload": {"x_m": 0.02}}"#));
        assert!(ds.loco_ctrl_input.pose_cmd.is_none());
        assert_eq!(ds.num_dropped_tcs, 1);

        exec(&mut ds, &tc(r#"{"type": "UNSAFE"}"#));
        assert!(!ds.safe);

        exec(&mut ds, &tc(r#"{"type": "POSE", "payload": {"x_m": 0.02}}"#));
        assert_eq!(ds.loco_ctrl_input.pose_cmd.unwrap().position.x, 0.02);
    }
}
