//! Foot trajectory planner
//!
//! During stance the foot is swept backwards along a shallow cosine, during swing it follows a
//! degree 11 Bezier curve whose control points are scaled from a reference step 0.4 m long and
//! 0.15 m high.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::f64::consts::PI;

use crate::geom::Transformation;
use crate::quad_base::QuadLeg;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of Bezier control points.
pub const NUM_CONTROL_POINTS: usize = 12;

/// Reference step length the X control points are defined for.
///
/// Units: meters
const REF_STEP_LENGTH: f64 = 0.4;

/// Reference swing height the Z control points are defined for.
///
/// Units: meters
const REF_SWING_HEIGHT: f64 = 0.15;

/// 0! to 12!
const FACTORIAL: [f64; NUM_CONTROL_POINTS + 1] = [
    1.0,
    1.0,
    2.0,
    6.0,
    24.0,
    120.0,
    720.0,
    5040.0,
    40320.0,
    362880.0,
    3628800.0,
    39916800.0,
    479001600.0,
];

const REF_X: [f64; NUM_CONTROL_POINTS] = [
    -0.15, -0.2805, -0.3, -0.3, -0.3, 0.0, 0.0, 0.0, 0.3032, 0.3032, 0.2826, 0.15,
];

const REF_Z: [f64; NUM_CONTROL_POINTS] = [
    -0.5, -0.5, -0.3611, -0.3611, -0.3611, -0.3611, -0.3611, -0.3214, -0.3214, -0.3214, -0.5,
    -0.5,
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory planner for a single leg.
#[derive(Debug, Clone, Default)]
pub struct TrajPlanner {
    /// Output of the last call, `None` before the first call.
    prev_foot_position: Option<Transformation>,

    control_points_x: [f64; NUM_CONTROL_POINTS],
    control_points_z: [f64; NUM_CONTROL_POINTS],

    height_ratio: f64,
    length_ratio: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset `foot_position` along the leg's trajectory.
    ///
    /// `rotation` is the heading of the step in the XY plane. The leg's gait phase is set to
    /// stance or swing depending on which signal dominates.
    pub fn generate(
        &mut self,
        leg: &mut QuadLeg,
        foot_position: Transformation,
        step_length: f64,
        rotation: f64,
        swing_signal: f64,
        stance_signal: f64,
    ) -> Transformation {
        self.update_control_points_height(leg.gait_config.swing_height);

        let prev = *self.prev_foot_position.get_or_insert(foot_position);

        if step_length == 0.0 {
            self.prev_foot_position = Some(foot_position);
            leg.gait_phase = true;
            return foot_position;
        }

        self.update_control_points_length(step_length);

        let mut x = 0.0;
        let mut z = 0.0;

        if stance_signal > swing_signal {
            leg.gait_phase = true;

            x = (step_length / 2.0) * (1.0 - 2.0 * stance_signal);
            z = -leg.gait_config.stance_depth * ((PI * x) / step_length).cos();
        } else if stance_signal < swing_signal {
            leg.gait_phase = false;

            let n = NUM_CONTROL_POINTS - 1;
            for i in 0..NUM_CONTROL_POINTS {
                let coeff = FACTORIAL[n] / (FACTORIAL[i] * FACTORIAL[n - i]);
                let b = coeff
                    * swing_signal.powi(i as i32)
                    * (1.0 - swing_signal).powi((n - i) as i32);

                x += b * self.control_points_x[i];
                z -= b * self.control_points_z[i];
            }
        }

        let mut output = foot_position.translate(x * rotation.cos(), x * rotation.sin(), z);

        // Between phases the foot holds where it was
        if swing_signal == 0.0 && stance_signal == 0.0 && step_length > 0.0 {
            output = prev;
        }

        self.prev_foot_position = Some(output);

        output
    }

    fn update_control_points_height(&mut self, swing_height: f64) {
        let ratio = swing_height / REF_SWING_HEIGHT;

        if self.height_ratio != ratio {
            self.height_ratio = ratio;

            for (cp, r) in self.control_points_z.iter_mut().zip(REF_Z.iter()) {
                *cp = -(r * ratio + 0.5 * ratio);
            }
        }
    }

    fn update_control_points_length(&mut self, step_length: f64) {
        let ratio = step_length / REF_STEP_LENGTH;

        if self.length_ratio != ratio {
            self.length_ratio = ratio;

            for (i, r) in REF_X.iter().enumerate() {
                self.control_points_x[i] = r * ratio;
            }
            self.control_points_x[0] = -step_length / 2.0;
            self.control_points_x[NUM_CONTROL_POINTS - 1] = step_length / 2.0;
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
