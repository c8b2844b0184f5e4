//! # Leg inverse kinematics
//!
//! Analytic solution for a leg made of a hip roll joint followed by two pitch joints (upper and
//! lower leg). The target foot position is given in the hip frame, i.e. relative to the hip joint
//! origin but in base-aligned axes (see `transform_to_hip`).
//!
//! A frame of targets is solved atomically: if any leg cannot be solved none of the joint angles
//! change.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use std::f64::consts::{FRAC_PI_2, PI};

// Internal
use crate::geom::Transformation;
use crate::quad_base::{
    LegId, QuadBase, QuadLeg, NUM_ACT_JOINTS_PER_LEG, NUM_JOINTS, NUM_LEGS, NUM_LEG_LINKS,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Solution for a single leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegSolution {
    /// The target is reachable.
    ///
    /// Units: radians
    Solved {
        hip_rad: f64,
        upper_rad: f64,
        lower_rad: f64,
    },

    /// The target lies outside the leg's workspace. Only the hip angle could be computed.
    Unreachable { hip_rad: f64 },
}

/// Reasons a frame of IK targets is rejected.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum IkError {
    #[error("The target for the {0:?} leg is out of reach")]
    Unreachable(LegId),

    #[error("The solution for the {0:?} leg is not a number")]
    NotANumber(LegId),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LegSolution {
    /// The joint angles (hip, upper, lower), or `None` if the leg is unreachable.
    pub fn angles(&self) -> Option<[f64; NUM_ACT_JOINTS_PER_LEG]> {
        match *self {
            LegSolution::Solved {
                hip_rad,
                upper_rad,
                lower_rad,
            } => Some([hip_rad, upper_rad, lower_rad]),
            LegSolution::Unreachable { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Solve all legs, returning the new joint angles or the first leg that failed.
pub fn try_inverse(
    base: &QuadBase,
    targets: &[Transformation; NUM_LEGS],
) -> Result<[f64; NUM_JOINTS], IkError> {
    let mut joints = [0f64; NUM_JOINTS];

    for (i, (leg, target)) in base.legs().iter().zip(targets.iter()).enumerate() {
        let angles = match solve_leg(leg, target).angles() {
            Some(a) => a,
            None => return Err(IkError::Unreachable(leg.id)),
        };

        if angles.iter().any(|a| a.is_nan()) {
            return Err(IkError::NotANumber(leg.id));
        }

        let idx = i * NUM_ACT_JOINTS_PER_LEG;
        joints[idx..idx + NUM_ACT_JOINTS_PER_LEG].copy_from_slice(&angles);
    }

    Ok(joints)
}

/// Solve all legs, falling back to `current` for the whole frame if any leg fails.
pub fn inverse(
    base: &QuadBase,
    current: &[f64; NUM_JOINTS],
    targets: &[Transformation; NUM_LEGS],
) -> [f64; NUM_JOINTS] {
    match try_inverse(base, targets) {
        Ok(j) => j,
        Err(e) => {
            warn!("IK frame rejected, holding joint positions: {}", e);
            *current
        }
    }
}

/// Solve a single leg for a target in the hip frame.
pub fn solve_leg(leg: &QuadLeg, target: &Transformation) -> LegSolution {
    let upper = leg.upper();
    let lower = leg.lower();
    let foot = leg.foot();

    // Lateral offset of the foot from the hip roll axis
    let l0: f64 = leg.joints[1..NUM_LEG_LINKS].iter().map(|j| j.y()).sum();

    // Segment lengths (negative as the segments hang below their joints) and the angle each
    // segment makes with the vertical
    let l1 = -(lower.x().powi(2) + lower.z().powi(2)).sqrt();
    let ik_alpha = (lower.x() / l1).acos() - FRAC_PI_2;

    let l2 = -(foot.x().powi(2) + foot.z().powi(2)).sqrt();
    let ik_beta = (foot.x() / l2).acos() - FRAC_PI_2;

    let (y, z) = (target.y(), target.z());

    let hip_rad = -((y / z).atan() - (FRAC_PI_2 - (-l0 / (y.powi(2) + z.powi(2)).sqrt()).acos()));

    // Move the target into the plane of the leg
    let in_plane = target
        .rotate_x(-hip_rad)
        .translate(-upper.x(), 0.0, -upper.z());
    let (x, z) = (in_plane.x(), in_plane.z());

    let target_to_foot = (x.powi(2) + z.powi(2)).sqrt();
    if target_to_foot >= l1.abs() + l2.abs() {
        return LegSolution::Unreachable { hip_rad };
    }

    let knee_dir = leg.knee_direction.sign();

    let mut lower_rad =
        knee_dir * ((z.powi(2) + x.powi(2) - l1.powi(2) - l2.powi(2)) / (2.0 * l1 * l2)).acos();
    let mut upper_rad =
        (x / z).atan() - ((l2 * lower_rad.sin()) / (l1 + l2 * lower_rad.cos())).atan();

    lower_rad += ik_beta - ik_alpha;
    upper_rad += ik_alpha;

    // atan folds the upper angle into the wrong half plane for one knee direction
    if (knee_dir < 0.0 && upper_rad < 0.0) || (knee_dir > 0.0 && upper_rad > 0.0) {
        upper_rad += PI;
    }

    LegSolution::Solved {
        hip_rad,
        upper_rad,
        lower_rad,
    }
}

/// Express a base frame position relative to the leg's hip.
pub fn transform_to_hip(position: Transformation, leg: &QuadLeg) -> Transformation {
    let hip = leg.hip();
    position.translate(-hip.x(), -hip.y(), -hip.z())
}

/// Express a hip frame position in the base frame.
pub fn transform_to_base(position: Transformation, leg: &QuadLeg) -> Transformation {
    let hip = leg.hip();
    position.translate(hip.x(), hip.y(), hip.z())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
