//! # Body controller
//!
//! Converts a body pose command into per-leg foot targets. The body is moved by moving the feet
//! the opposite way, so every term of the pose is applied negated.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::geom::Transformation;
use crate::kinematics;
use crate::quad_base::{Pose, QuadBase, QuadLeg, NUM_LEGS};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Fraction of the zero stance height the body may be lowered by.
pub const MAX_Z_TRANSLATION_FRACTION: f64 = 0.65;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Body controller. Stateless, the robot model is passed in on each call.
#[derive(Debug, Default, Clone, Copy)]
pub struct BodyCtrl;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BodyCtrl {
    pub fn new() -> Self {
        Self
    }

    /// Compute the hip frame foot target of every leg for the given body pose.
    pub fn pose_command(&self, base: &QuadBase, pose: &Pose) -> [Transformation; NUM_LEGS] {
        let mut targets = [Transformation::identity(); NUM_LEGS];

        for (target, leg) in targets.iter_mut().zip(base.legs().iter()) {
            *target = Self::leg_pose_command(leg, pose);
        }

        targets
    }

    fn leg_pose_command(leg: &QuadLeg, pose: &Pose) -> Transformation {
        let zero_stance = leg.zero_stance();

        let req_x = -pose.position.x;
        let req_y = -pose.position.y;
        let max_z = -zero_stance.z() * MAX_Z_TRANSLATION_FRACTION;
        let req_z = util::maths::clamp(&-(zero_stance.z() + pose.position.z), &0.0, &max_z);

        let foot = zero_stance
            .translate(req_x, req_y, req_z)
            .rotate_z(-pose.yaw())
            .rotate_y(-pose.pitch())
            .rotate_x(-pose.roll());

        kinematics::transform_to_hip(foot, leg)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::Vec3;
    use crate::quad_base::{GaitConfig, LegId, QuadGeometry};
    use approx::assert_abs_diff_eq;

    fn base() -> QuadBase {
        QuadBase::new(
            &QuadGeometry::symmetric(0.175, 0.105, 0.06, 0.141, 0.141),
            GaitConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_nominal_height() {
        let base = base();
        let pose = Pose::new(Vec3::new(0.0, 0.0, 0.2), Vec3::zeros());

        let targets = BodyCtrl::new().pose_command(&base, &pose);

        for (leg, t) in base.legs().iter().zip(targets.iter()) {
            // Foot sits below the upper leg joint at the commanded height
            assert_abs_diff_eq!(t.x(), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(t.y(), leg.upper().y(), epsilon = 1e-12);
            assert_abs_diff_eq!(t.z(), -0.2, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_height_clamped() {
        let base = base();

        // Asking to stand taller than the legs allows keeps the legs straight
        let tall = BodyCtrl::new().pose_command(&base, &Pose::new(Vec3::new(0.0, 0.0, 0.5), Vec3::zeros()));
        assert_abs_diff_eq!(tall[0].z(), -0.282, epsilon = 1e-12);

        // Asking to crouch to the ground stops at 65% of the stance height
        let low = BodyCtrl::new().pose_command(&base, &Pose::default());
        assert_abs_diff_eq!(low[0].z(), -0.282 * 0.35, epsilon = 1e-12);
    }

    #[test]
    fn test_translation_and_yaw() {
        let base = base();

        // Moving the body forwards moves the feet backwards
        let pose = Pose::new(Vec3::new(0.02, -0.01, 0.2), Vec3::zeros());
        let t = BodyCtrl::new().pose_command(&base, &pose);
        assert_abs_diff_eq!(t[LegId::LeftFront.index()].x(), -0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(t[LegId::LeftFront.index()].y(), 0.07, epsilon = 1e-12);

        // Yawing the body left swings the front left foot to the right in the body frame
        let pose = Pose::new(Vec3::new(0.0, 0.0, 0.2), Vec3::new(0.0, 0.0, 0.1));
        let t = BodyCtrl::new().pose_command(&base, &pose);
        let lf = base.leg(LegId::LeftFront);
        let zs = lf.zero_stance();
        let (s, c) = (-0.1f64).sin_cos();
        assert_abs_diff_eq!(
            t[0].x(),
            c * zs.x() - s * zs.y() - lf.hip().x(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            t[0].y(),
            s * zs.x() + c * zs.y() - lf.hip().y(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_roll_and_pitch() {
        let base = base();

        // Standing at 0.2 m the front left foot is at (0.175, 0.165, -0.2) in the base frame.
        // Pitch is undone before roll, then the hip offset (0.175, 0.105, 0) is removed.
        let pose = Pose::new(Vec3::new(0.0, 0.0, 0.2), Vec3::new(0.05, 0.1, 0.0));
        let t = BodyCtrl::new().pose_command(&base, &pose);

        let (sp, cp) = (-0.1f64).sin_cos();
        let (x, y, z) = (0.175, 0.165, -0.2);
        let (x, z) = (cp * x + sp * z, -sp * x + cp * z);
        let (sr, cr) = (-0.05f64).sin_cos();
        let (y, z) = (cr * y - sr * z, sr * y + cr * z);

        let lf = t[LegId::LeftFront.index()];
        assert_abs_diff_eq!(lf.x(), x - 0.175, epsilon = 1e-12);
        assert_abs_diff_eq!(lf.y(), y - 0.105, epsilon = 1e-12);
        assert_abs_diff_eq!(lf.z(), z, epsilon = 1e-12);

        assert_abs_diff_eq!(lf.x(), 0.019092412253, epsilon = 1e-9);
        assert_abs_diff_eq!(lf.y(), 0.050721075110, epsilon = 1e-9);
        assert_abs_diff_eq!(lf.z(), -0.189549682860, epsilon = 1e-9);
    }
}
