//! The robot base, owning the four legs

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{
    GaitConfig, KneeDirection, LegId, QuadBaseError, QuadGeometry, QuadLeg, Velocities,
    NUM_ACT_JOINTS_PER_LEG, NUM_JOINTS, NUM_LEGS,
};
use super::leg::{HIP, LOWER, UPPER};
use crate::geom::Transformation;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The robot base.
#[derive(Debug, Clone)]
pub struct QuadBase {
    legs: [QuadLeg; NUM_LEGS],

    gait_config: GaitConfig,

    /// Last estimated body velocity.
    pub speed: Velocities,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl QuadBase {
    /// Create a new base from the robot's geometry and gait configuration.
    pub fn new(geometry: &QuadGeometry, gait_config: GaitConfig) -> Result<Self, QuadBaseError> {
        let g = &geometry.legs;

        let mut base = Self {
            legs: [
                QuadLeg::new(LegId::LeftFront, &g[0], gait_config.clone()),
                QuadLeg::new(LegId::RightFront, &g[1], gait_config.clone()),
                QuadLeg::new(LegId::LeftBack, &g[2], gait_config.clone()),
                QuadLeg::new(LegId::RightBack, &g[3], gait_config.clone()),
            ],
            gait_config: gait_config.clone(),
            speed: Velocities::zero(),
        };

        base.set_gait_config(gait_config)?;

        Ok(base)
    }

    /// Apply a new gait configuration to the base and all legs.
    ///
    /// The front legs take their knee direction from the first character of the knee orientation
    /// and the back legs from the second. If the orientation is invalid nothing is changed.
    pub fn set_gait_config(&mut self, gait_config: GaitConfig) -> Result<(), QuadBaseError> {
        let chars: Vec<char> = gait_config.knee_orientation.chars().collect();
        if chars.len() != 2 {
            return Err(QuadBaseError::InvalidKneeOrientation(
                gait_config.knee_orientation,
            ));
        }

        for (i, leg) in self.legs.iter_mut().enumerate() {
            // Indexes are always in range for NUM_LEGS legs
            leg.id = LegId::ALL[i];
            leg.knee_direction = KneeDirection::from_char(if i < 2 { chars[0] } else { chars[1] });
            leg.is_pantograph = gait_config.pantograph_leg;
            leg.gait_config = gait_config.clone();
        }

        self.gait_config = gait_config;

        Ok(())
    }

    pub fn gait_config(&self) -> &GaitConfig {
        &self.gait_config
    }

    pub fn leg(&self, id: LegId) -> &QuadLeg {
        &self.legs[id.index()]
    }

    pub fn leg_mut(&mut self, id: LegId) -> &mut QuadLeg {
        &mut self.legs[id.index()]
    }

    pub fn legs(&self) -> &[QuadLeg; NUM_LEGS] {
        &self.legs
    }

    pub fn legs_mut(&mut self) -> &mut [QuadLeg; NUM_LEGS] {
        &mut self.legs
    }

    /// Current joint angles, hip, upper, lower for each leg.
    pub fn joint_positions(&self) -> [f64; NUM_JOINTS] {
        let mut pos = [0f64; NUM_JOINTS];

        for (i, leg) in self.legs.iter().enumerate() {
            let idx = i * NUM_ACT_JOINTS_PER_LEG;
            pos[idx] = leg.joints[HIP].theta;
            pos[idx + 1] = leg.joints[UPPER].theta;
            pos[idx + 2] = leg.joints[LOWER].theta;
        }

        pos
    }

    /// Set all joint angles, in the same order as `joint_positions`.
    pub fn update_joint_positions(&mut self, positions: &[f64; NUM_JOINTS]) {
        for (i, leg) in self.legs.iter_mut().enumerate() {
            let idx = i * NUM_ACT_JOINTS_PER_LEG;
            leg.set_joints(positions[idx], positions[idx + 1], positions[idx + 2]);
        }
    }

    /// Set the contact flag of each leg.
    pub fn set_contacts(&mut self, contacts: [bool; NUM_LEGS]) {
        for (leg, contact) in self.legs.iter_mut().zip(contacts.iter()) {
            leg.in_contact = *contact;
        }
    }

    /// Contact flag of each leg.
    pub fn contacts(&self) -> [bool; NUM_LEGS] {
        let mut c = [false; NUM_LEGS];
        for (i, leg) in self.legs.iter().enumerate() {
            c[i] = leg.in_contact;
        }
        c
    }

    /// Gait phase of each leg (true is stance).
    pub fn gait_phases(&self) -> [bool; NUM_LEGS] {
        let mut p = [false; NUM_LEGS];
        for (i, leg) in self.legs.iter().enumerate() {
            p[i] = leg.gait_phase;
        }
        p
    }

    /// Foot position of each leg in the base frame.
    pub fn foot_positions_from_base(&self) -> [Transformation; NUM_LEGS] {
        let mut feet = [Transformation::identity(); NUM_LEGS];
        for (i, leg) in self.legs.iter().enumerate() {
            feet[i] = leg.foot_from_base();
        }
        feet
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn geometry() -> QuadGeometry {
        QuadGeometry::symmetric(0.175, 0.105, 0.06, 0.141, 0.141)
    }

    #[test]
    fn test_knee_direction() {
        let mut cfg = GaitConfig::default();
        cfg.knee_orientation = String::from("><");

        let base = QuadBase::new(&geometry(), cfg).unwrap();

        assert_eq!(base.leg(LegId::LeftFront).knee_direction, KneeDirection::Backward);
        assert_eq!(base.leg(LegId::RightFront).knee_direction, KneeDirection::Backward);
        assert_eq!(base.leg(LegId::LeftBack).knee_direction, KneeDirection::Forward);
        assert_eq!(base.leg(LegId::RightBack).knee_direction, KneeDirection::Forward);

        // Unknown characters bend backwards
        let mut cfg = GaitConfig::default();
        cfg.knee_orientation = String::from("x<");
        let base = QuadBase::new(&geometry(), cfg).unwrap();
        assert_eq!(base.leg(LegId::LeftFront).knee_direction.sign(), -1.0);
        assert_eq!(base.leg(LegId::LeftBack).knee_direction.sign(), 1.0);
    }

    #[test]
    fn test_invalid_knee_orientation() {
        let mut cfg = GaitConfig::default();
        cfg.knee_orientation = String::from(">");
        assert!(matches!(
            QuadBase::new(&geometry(), cfg),
            Err(QuadBaseError::InvalidKneeOrientation(_))
        ));

        // A failed update leaves the previous config in place
        let mut base = QuadBase::new(&geometry(), GaitConfig::default()).unwrap();
        let mut cfg = GaitConfig::default();
        cfg.knee_orientation = String::from("<<<");
        cfg.swing_height = 1.0;
        assert!(base.set_gait_config(cfg).is_err());
        assert_eq!(base.gait_config(), &GaitConfig::default());
        assert_eq!(base.leg(LegId::LeftBack).gait_config.swing_height, 0.04);
    }

    #[test]
    fn test_leg_ids_and_order() {
        let base = QuadBase::new(&geometry(), GaitConfig::default()).unwrap();

        for (i, leg) in base.legs().iter().enumerate() {
            assert_eq!(leg.id.index(), i);
        }

        // Left legs are at +Y, front legs at +X
        assert!(base.leg(LegId::LeftFront).hip().y() > 0.0);
        assert!(base.leg(LegId::RightFront).hip().y() < 0.0);
        assert!(base.leg(LegId::LeftBack).hip().x() < 0.0);
    }

    #[test]
    fn test_zero_stance_and_fk() {
        let mut cfg = GaitConfig::default();
        cfg.com_x_translation = 0.01;
        let mut base = QuadBase::new(&geometry(), cfg).unwrap();

        let lf = base.leg(LegId::LeftFront);
        let zs = lf.zero_stance();
        assert_abs_diff_eq!(zs.x(), 0.185, epsilon = 1e-12);
        assert_abs_diff_eq!(zs.y(), 0.165, epsilon = 1e-12);
        assert_abs_diff_eq!(zs.z(), -0.282, epsilon = 1e-12);
        assert_abs_diff_eq!(
            lf.center_to_nominal(),
            (0.175f64.powi(2) + 0.165f64.powi(2)).sqrt(),
            epsilon = 1e-12
        );

        // With all joints at zero the foot hangs straight below the upper joint
        let foot = lf.foot_from_base();
        assert_abs_diff_eq!(foot.x(), 0.175, epsilon = 1e-12);
        assert_abs_diff_eq!(foot.y(), 0.165, epsilon = 1e-12);
        assert_abs_diff_eq!(foot.z(), -0.282, epsilon = 1e-12);

        // Bending the knee by 90 degrees swings the lower segment forwards
        let mut joints = [0f64; NUM_JOINTS];
        joints[2] = -std::f64::consts::FRAC_PI_2;
        base.update_joint_positions(&joints);
        assert_eq!(base.joint_positions(), joints);

        let foot = base.leg(LegId::LeftFront).foot_from_hip();
        assert_abs_diff_eq!(foot.x(), 0.141, epsilon = 1e-12);
        assert_abs_diff_eq!(foot.z(), -0.141, epsilon = 1e-12);
    }

    #[test]
    fn test_contacts() {
        let mut base = QuadBase::new(&geometry(), GaitConfig::default()).unwrap();

        // Legs start in contact and in stance
        assert_eq!(base.contacts(), [true; NUM_LEGS]);
        assert_eq!(base.gait_phases(), [true; NUM_LEGS]);

        base.set_contacts([true, false, false, true]);
        assert_eq!(base.contacts(), [true, false, false, true]);
    }
}
