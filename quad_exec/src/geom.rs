//! # Geometry
//!
//! Points and rigid transformations used throughout the kinematic model. A `Transformation` is a
//! plain value: every operation consumes `self` and returns the transformed copy, so chains such
//! as `t.translate(..).rotate_z(..)` never alias.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TYPES
// ---------------------------------------------------------------------------

/// A 3D point or vector.
pub type Vec3 = Vector3<f64>;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Accumulated orientation of a transformation.
///
/// The matrix is kept up to date by the elementary rotations applied to a `Transformation` but
/// is not used to compute any positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub matrix: Matrix3<f64>,
}

/// A point together with the orientation accumulated while moving it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub rotation: Rotation,
    pub point: Vec3,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Rotation {
    /// The identity rotation.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Pre-multiply by an elementary rotation about X.
    pub fn rotate_x(self, phi: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vec3::x_axis(), phi).into_inner() * self.matrix,
        }
    }

    /// Pre-multiply by an elementary rotation about Y.
    pub fn rotate_y(self, theta: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vec3::y_axis(), theta).into_inner() * self.matrix,
        }
    }

    /// Pre-multiply by an elementary rotation about Z.
    pub fn rotate_z(self, psi: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&Vec3::z_axis(), psi).into_inner() * self.matrix,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    /// Identity transformation at the origin.
    pub fn identity() -> Self {
        Self {
            rotation: Rotation::identity(),
            point: Vec3::zeros(),
        }
    }

    /// Transformation with no rotation located at `point`.
    pub fn from_point(point: Vec3) -> Self {
        Self {
            rotation: Rotation::identity(),
            point,
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x
    }

    pub fn y(&self) -> f64 {
        self.point.y
    }

    pub fn z(&self) -> f64 {
        self.point.z
    }

    /// Move the point by the given deltas.
    pub fn translate(mut self, dx: f64, dy: f64, dz: f64) -> Self {
        self.point += Vec3::new(dx, dy, dz);
        self
    }

    /// Rotate the point about the X axis.
    pub fn rotate_x(self, phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        let p = self.point;

        Self {
            rotation: self.rotation.rotate_x(phi),
            point: Vec3::new(p.x, c * p.y - s * p.z, s * p.y + c * p.z),
        }
    }

    /// Rotate the point about the Y axis.
    pub fn rotate_y(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        let p = self.point;

        Self {
            rotation: self.rotation.rotate_y(theta),
            point: Vec3::new(c * p.x + s * p.z, p.y, -s * p.x + c * p.z),
        }
    }

    /// Rotate the point about the Z axis.
    pub fn rotate_z(self, psi: f64) -> Self {
        let (s, c) = psi.sin_cos();
        let p = self.point;

        Self {
            rotation: self.rotation.rotate_z(psi),
            point: Vec3::new(c * p.x - s * p.y, s * p.x + c * p.y, p.z),
        }
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_elementary_rotations() {
        let t = Transformation::from_point(Vec3::new(1.0, 0.0, 0.0));

        // X is unchanged by a rotation about X
        let rx = t.rotate_x(FRAC_PI_2);
        assert_abs_diff_eq!(rx.x(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rx.y(), 0.0, epsilon = 1e-12);

        // +90 deg about Z takes X onto Y
        let rz = t.rotate_z(FRAC_PI_2);
        assert_abs_diff_eq!(rz.x(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rz.y(), 1.0, epsilon = 1e-12);

        // +90 deg about Y takes X onto -Z
        let ry = t.rotate_y(FRAC_PI_2);
        assert_abs_diff_eq!(ry.x(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ry.z(), -1.0, epsilon = 1e-12);

        // Y onto Z about X
        let ry_x = Transformation::from_point(Vec3::new(0.0, 1.0, 0.0)).rotate_x(FRAC_PI_2);
        assert_abs_diff_eq!(ry_x.y(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ry_x.z(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_value_semantics() {
        let a = Transformation::from_point(Vec3::new(0.1, 0.2, 0.3));
        let b = a.translate(1.0, 1.0, 1.0).rotate_z(0.5);

        // The original is untouched
        assert_eq!(a.point, Vec3::new(0.1, 0.2, 0.3));
        assert_abs_diff_eq!(b.z(), 1.3, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_bookkeeping() {
        let t = Transformation::identity()
            .rotate_z(0.3)
            .rotate_y(-0.2)
            .rotate_x(0.1);

        // The accumulated matrix applied to a point matches the point path
        let p = Vec3::new(0.4, -0.1, 0.25);
        let moved = Transformation::from_point(p)
            .rotate_z(0.3)
            .rotate_y(-0.2)
            .rotate_x(0.1);
        let by_matrix = t.rotation.matrix * p;

        assert_abs_diff_eq!(moved.x(), by_matrix.x, epsilon = 1e-12);
        assert_abs_diff_eq!(moved.y(), by_matrix.y, epsilon = 1e-12);
        assert_abs_diff_eq!(moved.z(), by_matrix.z, epsilon = 1e-12);
    }
}
