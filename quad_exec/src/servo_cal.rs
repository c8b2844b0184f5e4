//! # Servo calibration
//!
//! Converts joint angle demands into the angle and pulse width each servo must be driven to. Every
//! servo has its own zero offset and mounting direction, and maps its actuation range linearly
//! onto a pulse width range.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use comms_if::eqpt::joints::{ServoDems, NUM_JOINTS};
use util::maths::lin_map;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Calibration of a single servo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServoCalibration {
    /// Human readable name of the joint, e.g. `lf_hip`.
    pub alias: String,

    /// Channel of the PWM driver the servo is connected to.
    pub pin_id: u8,

    /// Units: degrees
    #[serde(default = "default_actuation_range_deg")]
    pub actuation_range_deg: f64,

    /// Pulse width at the start of the actuation range.
    ///
    /// Units: microseconds
    #[serde(default = "default_min_pulse_us")]
    pub min_pulse_us: f64,

    /// Pulse width at the end of the actuation range.
    ///
    /// Units: microseconds
    #[serde(default = "default_max_pulse_us")]
    pub max_pulse_us: f64,

    /// Servo angle corresponding to a zero joint angle.
    ///
    /// Units: degrees
    pub default_position_deg: f64,

    /// +1 if a positive joint angle increases the servo angle, -1 otherwise.
    #[serde(default = "default_direction")]
    pub direction: f64,
}

/// Parameters for the servo calibration, one entry per joint in joint demand order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Params {
    pub servos: [ServoCalibration; NUM_JOINTS],
}

/// Servo calibration.
#[derive(Debug, Clone)]
pub struct ServoCal {
    params: Params,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ServoCalError {
    #[error("Servo {alias} angle of {angle_deg:.2} deg is outside of its range of 0 to {range_deg} deg")]
    AngleOutOfRange {
        alias: String,
        angle_deg: f64,
        range_deg: f64,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ServoCalibration {
    /// Servo angle for a joint angle.
    pub fn angle_deg(&self, joint_rad: f64) -> Result<f64, ServoCalError> {
        let angle_deg = self.default_position_deg + self.direction * joint_rad.to_degrees();

        if !(0.0..=self.actuation_range_deg).contains(&angle_deg) {
            return Err(ServoCalError::AngleOutOfRange {
                alias: self.alias.clone(),
                angle_deg,
                range_deg: self.actuation_range_deg,
            });
        }

        Ok(angle_deg)
    }

    /// Pulse width for a servo angle already checked by `angle_deg`.
    pub fn pulse_us(&self, angle_deg: f64) -> f64 {
        lin_map(
            (0.0, self.actuation_range_deg),
            (self.min_pulse_us, self.max_pulse_us),
            angle_deg,
        )
    }
}

impl ServoCal {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Compute the demands of every servo.
    ///
    /// If any joint is out of its servo's range no demands are produced.
    pub fn servo_dems(&self, joint_pos_rad: &[f64; NUM_JOINTS]) -> Result<ServoDems, ServoCalError> {
        let mut dems = ServoDems {
            pin_id: [0; NUM_JOINTS],
            angle_deg: [0.0; NUM_JOINTS],
            pulse_us: [0.0; NUM_JOINTS],
        };

        for (i, (servo, joint)) in self.params.servos.iter().zip(joint_pos_rad.iter()).enumerate() {
            let angle = servo.angle_deg(*joint)?;

            dems.pin_id[i] = servo.pin_id;
            dems.angle_deg[i] = angle;
            dems.pulse_us[i] = servo.pulse_us(angle);
        }

        Ok(dems)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn default_actuation_range_deg() -> f64 {
    180.0
}

fn default_min_pulse_us() -> f64 {
    500.0
}

fn default_max_pulse_us() -> f64 {
    2500.0
}

fn default_direction() -> f64 {
    1.0
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn servo(pin_id: u8, direction: f64) -> ServoCalibration {
        ServoCalibration {
            alias: format!("servo_{}", pin_id),
            pin_id,
            actuation_range_deg: 180.0,
            min_pulse_us: 500.0,
            max_pulse_us: 2500.0,
            default_position_deg: 90.0,
            direction,
        }
    }

    fn servo_cal() -> ServoCal {
        let mut i = 0u8;
        let servos = [(); NUM_JOINTS].map(|_| {
            i += 1;
            servo(i - 1, if i % 2 == 0 { -1.0 } else { 1.0 })
        });
        ServoCal::new(Params { servos })
    }

    #[test]
    fn test_angle_and_pulse() {
        let s = servo(0, 1.0);

        assert_abs_diff_eq!(s.angle_deg(0.0).unwrap(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.pulse_us(90.0), 1500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            s.angle_deg(std::f64::consts::FRAC_PI_4).unwrap(),
            135.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(s.pulse_us(0.0), 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.pulse_us(180.0), 2500.0, epsilon = 1e-9);

        // Reversed servos mirror about the default position
        let r = servo(1, -1.0);
        assert_abs_diff_eq!(
            r.angle_deg(std::f64::consts::FRAC_PI_4).unwrap(),
            45.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_out_of_range() {
        let s = servo(3, 1.0);

        assert!(matches!(
            s.angle_deg(2.0),
            Err(ServoCalError::AngleOutOfRange { .. })
        ));
        assert!(s.angle_deg(-2.0).is_err());

        // One bad joint rejects the whole set of demands
        let cal = servo_cal();
        let mut joints = [0.0; NUM_JOINTS];
        joints[7] = 3.0;
        assert!(cal.servo_dems(&joints).is_err());
    }

    #[test]
    fn test_servo_dems() {
        let cal = servo_cal();
        let mut joints = [0.0; NUM_JOINTS];
        joints[0] = 0.1;
        joints[1] = 0.1;

        let dems = cal.servo_dems(&joints).unwrap();

        assert_eq!(dems.pin_id[5], 5);
        assert_abs_diff_eq!(dems.angle_deg[0], 90.0 + 0.1f64.to_degrees(), epsilon = 1e-9);
        assert_abs_diff_eq!(dems.angle_deg[1], 90.0 - 0.1f64.to_degrees(), epsilon = 1e-9);
        assert_abs_diff_eq!(dems.pulse_us[11], 1500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_load_defaults() {
        let s: ServoCalibration = util::params::from_str(
            "alias = \"lf_hip\"\npin_id = 4\ndefault_position_deg = 95.0\n",
        )
        .unwrap();

        assert_eq!(s.actuation_range_deg, 180.0);
        assert_eq!(s.min_pulse_us, 500.0);
        assert_eq!(s.max_pulse_us, 2500.0);
        assert_eq!(s.direction, 1.0);
    }
}
