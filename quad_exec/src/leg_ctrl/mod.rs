//! # Leg controller
//!
//! Turns a body velocity command into a foot target for each leg. Step lengths come from the
//! Raibert heuristic, gait timing from the `PhaseGen` and the foot path from one `TrajPlanner`
//! per leg.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod phase_gen;
mod traj_planner;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::trace;
use serde::Serialize;

// Internal
pub use phase_gen::*;
pub use traj_planner::*;
use crate::geom::Transformation;
use crate::quad_base::{LegId, QuadBase, QuadLeg, Velocities, NUM_LEGS};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Step parameters computed on the last velocity command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StepPlan {
    /// Magnitude of the commanded planar velocity, including the tangential velocity from the
    /// yaw rate.
    ///
    /// Units: meters/second
    pub velocity: f64,

    /// Units: meters
    pub step_x: f64,

    /// Units: meters
    pub step_y: f64,

    /// Arc length of the yaw component of the step.
    ///
    /// Units: meters
    pub step_theta: f64,

    /// Units: radians
    pub heading_delta: f64,

    /// Units: meters
    pub step_lengths: [f64; NUM_LEGS],

    /// Heading of each leg's step in the XY plane.
    ///
    /// Units: radians
    pub rotations: [f64; NUM_LEGS],

    /// True if the command was clamped to the gait's velocity limits.
    pub velocity_limited: bool,
}

/// Leg controller state.
#[derive(Debug, Clone, Default)]
pub struct LegCtrl {
    phase_gen: PhaseGen,

    traj_planners: [TrajPlanner; NUM_LEGS],

    step_plan: StepPlan,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegCtrl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate foot targets for the given velocity command.
    ///
    /// `foot_positions` are the nominal (hip frame) foot targets from the body controller. The
    /// returned velocities are the command after limiting.
    pub fn velocity_command(
        &mut self,
        base: &mut QuadBase,
        foot_positions: [Transformation; NUM_LEGS],
        velocities: Velocities,
        now: DateTime<Utc>,
    ) -> ([Transformation; NUM_LEGS], Velocities) {
        let cfg = base.gait_config().clone();

        // ---- LIMITS ----

        let mut limited = velocities;
        limited.linear.x = clamp(
            &velocities.linear.x,
            &-cfg.max_linear_velocity.x,
            &cfg.max_linear_velocity.x,
        );
        limited.linear.y = clamp(
            &velocities.linear.y,
            &-cfg.max_linear_velocity.y,
            &cfg.max_linear_velocity.y,
        );
        limited.angular.z = clamp(
            &velocities.angular.z,
            &-cfg.max_angular_velocity,
            &cfg.max_angular_velocity,
        );

        // ---- STEP PLANNING ----

        let center_to_nominal = base.leg(LegId::LeftFront).center_to_nominal();

        let tangential = limited.angular.z * center_to_nominal;
        let velocity = (limited.linear.x.powi(2) + (limited.linear.y + tangential).powi(2)).sqrt();

        let step_x = raibert_heuristic(cfg.stance_duration, limited.linear.x);
        let step_y = raibert_heuristic(cfg.stance_duration, limited.linear.y);
        let step_theta = raibert_heuristic(cfg.stance_duration, tangential);

        let heading_delta = if center_to_nominal > 0.0 {
            ((step_theta / 2.0) / center_to_nominal).sin() * 2.0
        } else {
            0.0
        };

        let mut step_lengths = [0f64; NUM_LEGS];
        let mut rotations = [0f64; NUM_LEGS];
        for (i, leg) in base.legs().iter().enumerate() {
            let (l, r) = transform_leg(leg, step_x, step_y, heading_delta);
            step_lengths[i] = l;
            rotations[i] = r;
        }
        let mean_step_length = step_lengths.iter().sum::<f64>() / NUM_LEGS as f64;

        self.step_plan = StepPlan {
            velocity,
            step_x,
            step_y,
            step_theta,
            heading_delta,
            step_lengths,
            rotations,
            velocity_limited: limited != velocities,
        };

        trace!("Step plan: {:?}", self.step_plan);

        // ---- TRAJECTORIES ----

        self.phase_gen.run(&cfg, velocity, mean_step_length, now);

        let swing = *self.phase_gen.swing_signal();
        let stance = *self.phase_gen.stance_signal();

        let mut targets = foot_positions;
        for (i, leg) in base.legs_mut().iter_mut().enumerate() {
            targets[i] = self.traj_planners[i].generate(
                leg,
                foot_positions[i],
                step_lengths[i],
                rotations[i],
                swing[i],
                stance[i],
            );
        }

        (targets, limited)
    }

    /// The step plan from the last velocity command.
    pub fn step_plan(&self) -> &StepPlan {
        &self.step_plan
    }

    pub fn phase_gen(&self) -> &PhaseGen {
        &self.phase_gen
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Distance the foot should be placed from its nominal position to sustain the given velocity.
pub fn raibert_heuristic(stance_duration: f64, target_velocity: f64) -> f64 {
    (stance_duration / 2.0) * target_velocity
}

/// Step length and heading of a leg for the given planar step.
///
/// The zero stance is translated by `(step_x, step_y)` and rotated about the base centre by
/// `heading_delta`. Returns `(step_length, rotation)`.
pub fn transform_leg(leg: &QuadLeg, step_x: f64, step_y: f64, heading_delta: f64) -> (f64, f64) {
    let zero_stance = leg.zero_stance();
    let transformed = zero_stance
        .translate(step_x, step_y, 0.0)
        .rotate_z(heading_delta);

    let dx = transformed.x() - zero_stance.x();
    let dy = transformed.y() - zero_stance.y();

    ((dx.powi(2) + dy.powi(2)).sqrt() * 2.0, dy.atan2(dx))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::Vec3;
    use crate::quad_base::{GaitConfig, QuadGeometry};
    use approx::assert_abs_diff_eq;
    use chrono::Duration;

    fn base() -> QuadBase {
        QuadBase::new(
            &QuadGeometry::symmetric(0.175, 0.105, 0.06, 0.141, 0.141),
            GaitConfig::default(),
        )
        .unwrap()
    }

    fn nominal(base: &QuadBase) -> [Transformation; NUM_LEGS] {
        let mut t = [Transformation::identity(); NUM_LEGS];
        for (i, leg) in base.legs().iter().enumerate() {
            t[i] = Transformation::from_point(Vec3::new(0.0, leg.upper().y(), -0.2));
        }
        t
    }

    fn vel(x: f64, y: f64, yaw: f64) -> Velocities {
        Velocities {
            linear: Vec3::new(x, y, 0.0),
            angular: Vec3::new(0.0, 0.0, yaw),
        }
    }

    #[test]
    fn test_stopped() {
        let mut base = base();
        let mut lc = LegCtrl::new();
        let feet = nominal(&base);

        let (targets, v) = lc.velocity_command(&mut base, feet, Velocities::zero(), Utc::now());

        assert_eq!(targets, feet);
        assert_eq!(v, Velocities::zero());
        assert!(base.gait_phases().iter().all(|p| *p));
        assert!(!lc.phase_gen().is_running());
        assert_eq!(lc.step_plan().step_lengths, [0.0; NUM_LEGS]);
    }

    #[test]
    fn test_forward_step_plan() {
        let mut base = base();
        let mut lc = LegCtrl::new();
        let feet = nominal(&base);
        let t0 = Utc::now();

        lc.velocity_command(&mut base, feet, vel(0.1, 0.0, 0.0), t0);

        let plan = lc.step_plan();
        assert_abs_diff_eq!(plan.step_x, 0.0125, epsilon = 1e-12);
        assert_abs_diff_eq!(plan.step_y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(plan.heading_delta, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(plan.velocity, 0.1, epsilon = 1e-12);
        for i in 0..NUM_LEGS {
            assert_abs_diff_eq!(plan.step_lengths[i], 0.025, epsilon = 1e-12);
            assert_abs_diff_eq!(plan.rotations[i], 0.0, epsilon = 1e-12);
        }
        assert!(!plan.velocity_limited);

        // Once the gate opens the first leg is in stance, ahead of its nominal position
        let (targets, _) = lc.velocity_command(
            &mut base,
            feet,
            vel(0.1, 0.0, 0.0),
            t0 + Duration::milliseconds(200),
        );
        assert!(lc.phase_gen().stance_signal()[0] > 0.0);
        assert!(base.leg(LegId::LeftFront).gait_phase);
        assert!(!base.leg(LegId::RightFront).gait_phase);
        assert!(targets[0].x() < 0.0125 && targets[0].x() > -0.0125);
    }

    #[test]
    fn test_velocity_limits() {
        let mut base = base();
        let mut lc = LegCtrl::new();
        let feet = nominal(&base);

        let (_, v) = lc.velocity_command(&mut base, feet, vel(2.0, -2.0, 5.0), Utc::now());

        assert_eq!(v.linear.x, 0.5);
        assert_eq!(v.linear.y, -0.25);
        assert_eq!(v.angular.z, 1.0);
        assert!(lc.step_plan().velocity_limited);
    }

    #[test]
    fn test_turning_steps() {
        let mut base = base();
        let mut lc = LegCtrl::new();
        let feet = nominal(&base);

        lc.velocity_command(&mut base, feet, vel(0.0, 0.0, 0.5), Utc::now());

        let plan = *lc.step_plan();
        let ctn = base.leg(LegId::LeftFront).center_to_nominal();
        assert_abs_diff_eq!(plan.step_theta, 0.125 * 0.5 * ctn, epsilon = 1e-12);
        assert!(plan.heading_delta > 0.0);

        // Turning left moves the front feet left and the back feet right
        assert!(plan.rotations[LegId::LeftFront.index()].sin() > 0.0);
        assert!(plan.rotations[LegId::RightFront.index()].sin() > 0.0);
        assert!(plan.rotations[LegId::LeftBack.index()].sin() < 0.0);
        assert!(plan.rotations[LegId::RightBack.index()].sin() < 0.0);

        // Legs are symmetric about the centre so all step lengths match
        for i in 1..NUM_LEGS {
            assert_abs_diff_eq!(plan.step_lengths[i], plan.step_lengths[0], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_transform_leg() {
        let base = base();
        let (l, r) = transform_leg(base.leg(LegId::RightBack), 0.0, 0.02, 0.0);

        assert_abs_diff_eq!(l, 0.04, epsilon = 1e-12);
        assert_abs_diff_eq!(r, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }
}
