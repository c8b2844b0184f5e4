//! # Odometry
//!
//! Estimates the body's planar velocity from the motion of the feet that are in contact with the
//! ground. A foot in contact is fixed in the world, so its apparent motion in the base frame is
//! the body's motion reversed. Only half of each displacement is credited since body and foot
//! share the relative motion.
//!
//! With every foot or no foot in contact there is no usable reference and the estimate is reset
//! to zero.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::trace;

// Internal
use crate::geom::Vec3;
use crate::quad_base::{QuadBase, Velocities, NUM_LEGS};
use util::{maths::wrap_pi, time::duration_to_seconds};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Weight of the previous estimate in the exponential smoothing.
pub const BETA: f64 = 0.1;

/// Smallest time step used in the estimate.
///
/// Units: seconds
pub const MIN_DT_S: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Velocity estimator state.
#[derive(Debug, Clone)]
pub struct Odometry {
    prev_foot_positions: [Vec3; NUM_LEGS],

    /// Units: radians
    prev_theta: [f64; NUM_LEGS],

    prev_time: DateTime<Utc>,

    prev_velocities: Velocities,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Odometry {
    /// Start a new estimator from the current state of the base.
    pub fn new(base: &QuadBase, now: DateTime<Utc>) -> Self {
        let mut prev_foot_positions = [Vec3::zeros(); NUM_LEGS];
        for (i, foot) in base.foot_positions_from_base().iter().enumerate() {
            prev_foot_positions[i] = foot.point;
        }

        Self {
            prev_foot_positions,
            prev_theta: [0f64; NUM_LEGS],
            prev_time: now,
            prev_velocities: Velocities::zero(),
        }
    }

    /// Estimate the body velocity at `now`.
    pub fn get_velocities(&mut self, base: &QuadBase, now: DateTime<Utc>) -> Velocities {
        let contacts = base.contacts();
        let num_contacts = contacts.iter().filter(|c| **c).count();

        let mut feet = [Vec3::zeros(); NUM_LEGS];
        for (i, foot) in base.foot_positions_from_base().iter().enumerate() {
            feet[i] = foot.point;
        }

        let mut thetas = [0f64; NUM_LEGS];
        for (i, foot) in feet.iter().enumerate() {
            thetas[i] = foot.x.atan2(foot.y);
        }

        let velocities = if num_contacts == 0 || num_contacts == NUM_LEGS {
            Velocities::zero()
        } else {
            let mut sum_x = 0f64;
            let mut sum_y = 0f64;
            let mut sum_theta = 0f64;

            for i in 0..NUM_LEGS {
                if !contacts[i] {
                    continue;
                }

                sum_x += (self.prev_foot_positions[i].x - feet[i].x) / 2.0;
                sum_y += (self.prev_foot_positions[i].y - feet[i].y) / 2.0;
                // Bearings jump by 2 pi where atan2 wraps
                sum_theta += wrap_pi(thetas[i] - self.prev_theta[i]);
            }

            let dt = match duration_to_seconds(now - self.prev_time) {
                Some(s) if s > MIN_DT_S => s,
                _ => MIN_DT_S,
            };
            let scalar = base.gait_config().odom_scalar;

            let mut v = Velocities::zero();
            v.linear.x =
                (1.0 - BETA) * (sum_x * scalar / dt) + BETA * self.prev_velocities.linear.x;
            v.linear.y =
                (1.0 - BETA) * (sum_y * scalar / dt) + BETA * self.prev_velocities.linear.y;
            v.angular.z = (1.0 - BETA) * (sum_theta / dt) + BETA * self.prev_velocities.angular.z;

            v
        };

        trace!("Odometry estimate: {:?}", velocities);

        self.prev_foot_positions = feet;
        self.prev_theta = thetas;
        self.prev_time = now;
        self.prev_velocities = velocities;

        velocities
    }

    /// The last estimate.
    pub fn velocities(&self) -> &Velocities {
        &self.prev_velocities
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::quad_base::{GaitConfig, LegId, QuadGeometry, NUM_JOINTS};
    use approx::assert_abs_diff_eq;
    use chrono::Duration;

    fn base() -> QuadBase {
        QuadBase::new(
            &QuadGeometry::symmetric(0.175, 0.105, 0.06, 0.141, 0.141),
            GaitConfig::default(),
        )
        .unwrap()
    }

    /// Swing every upper leg by the same angle, moving all feet along X.
    fn move_feet(base: &mut QuadBase, upper_rad: f64) {
        let mut joints = [0f64; NUM_JOINTS];
        for leg in 0..NUM_LEGS {
            joints[leg * 3 + 1] = upper_rad;
        }
        base.update_joint_positions(&joints);
    }

    #[test]
    fn test_degenerate_support() {
        let t0 = Utc::now();
        let mut base = base();
        let mut odom = Odometry::new(&base, t0);

        // All feet down
        move_feet(&mut base, 0.2);
        let v = odom.get_velocities(&base, t0 + Duration::milliseconds(20));
        assert_eq!(v, Velocities::zero());
        assert_eq!(odom.velocities(), &Velocities::zero());

        // No feet down
        base.set_contacts([false; NUM_LEGS]);
        move_feet(&mut base, -0.2);
        let v = odom.get_velocities(&base, t0 + Duration::milliseconds(40));
        assert_eq!(v, Velocities::zero());
    }

    #[test]
    fn test_two_leg_support() {
        let t0 = Utc::now();
        let mut base = base();
        base.set_contacts([true, false, false, true]);
        let mut odom = Odometry::new(&base, t0);

        let x0 = base.leg(LegId::LeftFront).foot_from_base().x();

        // Feet sweep backwards, so the body moves forwards
        move_feet(&mut base, 0.1);
        let x1 = base.leg(LegId::LeftFront).foot_from_base().x();
        assert!(x1 < x0);

        let v = odom.get_velocities(&base, t0 + Duration::milliseconds(100));

        // Two contact legs each credit half of the same displacement
        let expected = (1.0 - BETA) * ((x0 - x1) / 0.1);
        assert_abs_diff_eq!(v.linear.x, expected, epsilon = 1e-9);
        assert!(v.linear.x > 0.0);
        assert_abs_diff_eq!(v.linear.y, 0.0, epsilon = 1e-9);

        // Holding still decays the estimate by the smoothing factor
        let v2 = odom.get_velocities(&base, t0 + Duration::milliseconds(200));
        assert_abs_diff_eq!(v2.linear.x, BETA * expected, epsilon = 1e-9);
    }

    #[test]
    fn test_yaw_rate() {
        let t0 = Utc::now();
        let mut base = base();
        let mut odom = Odometry::new(&base, t0);

        // Full support only records the bearings
        let t1 = t0 + Duration::milliseconds(20);
        assert_eq!(odom.get_velocities(&base, t1), Velocities::zero());

        let bearing = |b: &QuadBase, id: LegId| {
            let p = b.leg(id).foot_from_base();
            p.x().atan2(p.y())
        };
        let before = [bearing(&base, LegId::LeftFront), bearing(&base, LegId::RightBack)];

        // Diagonal support, feet swept backwards
        base.set_contacts([true, false, false, true]);
        move_feet(&mut base, 0.15);
        let after = [bearing(&base, LegId::LeftFront), bearing(&base, LegId::RightBack)];

        let v = odom.get_velocities(&base, t1 + Duration::milliseconds(50));

        let sum_theta = (after[0] - before[0]) + (after[1] - before[1]);
        let expected = (1.0 - BETA) * sum_theta / 0.05;
        assert!(sum_theta.abs() > 1e-3);
        assert_abs_diff_eq!(v.angular.z, expected, epsilon = 1e-9);

        // Holding still decays the rate by the smoothing factor
        let v2 = odom.get_velocities(&base, t1 + Duration::milliseconds(100));
        assert_abs_diff_eq!(v2.angular.z, BETA * expected, epsilon = 1e-9);
        assert_eq!(odom.velocities(), &v2);
    }

    #[test]
    fn test_zero_dt() {
        let t0 = Utc::now();
        let mut base = base();
        base.set_contacts([true, false, false, false]);
        let mut odom = Odometry::new(&base, t0);

        move_feet(&mut base, 0.05);
        let v = odom.get_velocities(&base, t0);

        assert!(v.linear.x.is_finite());
        assert!(v.angular.z.is_finite());
    }
}
