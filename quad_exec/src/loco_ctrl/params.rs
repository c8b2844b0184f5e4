//! Parameters structure for LocoCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::quad_base::{GaitConfig, QuadGeometry};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Locomotion control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    // ---- GAIT ----

    /// Gait used on startup, may be replaced by a `GAIT` telecommand.
    pub gait: GaitConfig,

    // ---- GEOMETRY ----

    /// Joint offsets of every leg.
    ///
    /// Units: meters,
    /// Frame: Robot body
    pub geometry: QuadGeometry,
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_params() {
        let toml_str = r#"
            [gait]
            knee_orientation = "><"
            pantograph_leg = false
            odom_scalar = 1.0
            max_linear_velocity = [0.5, 0.25, 0.0]
            max_angular_velocity = 1.0
            com_x_translation = 0.0
            swing_height = 0.04
            stance_depth = 0.0
            stance_duration = 0.25
            nominal_height = 0.2

            [[geometry.legs]]
            hip = { translation = [0.175, 0.105, 0.0] }
            upper = { translation = [0.0, 0.06, 0.0] }
            lower = { translation = [0.0, 0.0, -0.141] }
            foot = { translation = [0.0, 0.0, -0.141] }

            [[geometry.legs]]
            hip = { translation = [0.175, -0.105, 0.0] }
            upper = { translation = [0.0, -0.06, 0.0] }
            lower = { translation = [0.0, 0.0, -0.141] }
            foot = { translation = [0.0, 0.0, -0.141] }

            [[geometry.legs]]
            hip = { translation = [-0.175, 0.105, 0.0] }
            upper = { translation = [0.0, 0.06, 0.0] }
            lower = { translation = [0.0, 0.0, -0.141] }
            foot = { translation = [0.0, 0.0, -0.141] }

            [[geometry.legs]]
            hip = { translation = [-0.175, -0.105, 0.0] }
            upper = { translation = [0.0, -0.06, 0.0] }
            lower = { translation = [0.0, 0.0, -0.141] }
            foot = { translation = [0.0, 0.0, -0.141] }
        "#;

        let params: Params = util::params::from_str(toml_str).unwrap();

        assert_eq!(params.gait.knee_orientation, "><");
        assert_eq!(
            params.geometry,
            QuadGeometry::symmetric(0.175, 0.105, 0.06, 0.141, 0.141)
        );
    }
}
