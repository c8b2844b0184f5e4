//! A single leg

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{GaitConfig, LegGeometry, LegId, QuadJoint, NUM_LEG_LINKS};
use crate::geom::{Transformation, Vec3};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

pub const HIP: usize = 0;
pub const UPPER: usize = 1;
pub const LOWER: usize = 2;
pub const FOOT: usize = 3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One leg of the robot.
#[derive(Debug, Clone)]
pub struct QuadLeg {
    /// The joint chain, ordered hip, upper, lower, foot.
    pub joints: [QuadJoint; NUM_LEG_LINKS],

    pub id: LegId,

    pub knee_direction: KneeDirection,

    pub is_pantograph: bool,

    /// True if the foot is on the ground.
    pub in_contact: bool,

    /// True while the leg is in its stance phase.
    pub gait_phase: bool,

    pub gait_config: GaitConfig,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which way the knee bends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KneeDirection {
    /// `>`, sign -1
    Backward,

    /// `<`, sign +1
    Forward,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl KneeDirection {
    /// Parse a knee orientation character. Anything but `<` bends backwards.
    pub fn from_char(c: char) -> Self {
        match c {
            '<' => KneeDirection::Forward,
            _ => KneeDirection::Backward,
        }
    }

    /// Sign used by the IK solver.
    pub fn sign(self) -> f64 {
        match self {
            KneeDirection::Backward => -1.0,
            KneeDirection::Forward => 1.0,
        }
    }
}

impl QuadLeg {
    /// Create a leg from its geometry. Knee direction and pantograph flag are set by
    /// `QuadBase::set_gait_config`.
    pub fn new(id: LegId, geometry: &LegGeometry, gait_config: GaitConfig) -> Self {
        Self {
            joints: [
                QuadJoint::from(&geometry.hip),
                QuadJoint::from(&geometry.upper),
                QuadJoint::from(&geometry.lower),
                QuadJoint::from(&geometry.foot),
            ],
            id,
            knee_direction: KneeDirection::Backward,
            is_pantograph: false,
            in_contact: true,
            gait_phase: true,
            gait_config,
        }
    }

    pub fn hip(&self) -> &QuadJoint {
        &self.joints[HIP]
    }

    pub fn upper(&self) -> &QuadJoint {
        &self.joints[UPPER]
    }

    pub fn lower(&self) -> &QuadJoint {
        &self.joints[LOWER]
    }

    pub fn foot(&self) -> &QuadJoint {
        &self.joints[FOOT]
    }

    /// Set the three actuated joint angles.
    pub fn set_joints(&mut self, hip: f64, upper: f64, lower: f64) {
        self.joints[HIP].theta = hip;
        self.joints[UPPER].theta = upper;
        self.joints[LOWER].theta = lower;
    }

    /// Position of the foot in the hip frame (before the hip rotation is applied).
    pub fn foot_from_hip(&self) -> Transformation {
        let mut foot = Transformation::identity();

        for i in (1..NUM_LEG_LINKS).rev() {
            let j = &self.joints[i];
            foot = foot.translate(j.x(), j.y(), j.z());

            if i > 1 {
                foot = foot.rotate_y(self.joints[i - 1].theta);
            }
        }

        foot
    }

    /// Position of the foot in the base frame.
    pub fn foot_from_base(&self) -> Transformation {
        let hip = self.hip();

        Transformation::from_point(self.foot_from_hip().point)
            .rotate_x(hip.theta)
            .translate(hip.x(), hip.y(), hip.z())
    }

    /// Nominal foot position in the base frame with the leg hanging straight down.
    pub fn zero_stance(&self) -> Transformation {
        let (hip, upper, lower, foot) = (self.hip(), self.upper(), self.lower(), self.foot());

        Transformation::from_point(Vec3::new(
            hip.x() + upper.x() + self.gait_config.com_x_translation,
            hip.y() + upper.y(),
            hip.z() + upper.z() + lower.z() + foot.z(),
        ))
    }

    /// Horizontal distance from the base centre to the nominal foot position.
    pub fn center_to_nominal(&self) -> f64 {
        let x = self.hip().x() + self.upper().x();
        let y = self.hip().y() + self.upper().y();

        (x.powi(2) + y.powi(2)).sqrt()
    }
}
