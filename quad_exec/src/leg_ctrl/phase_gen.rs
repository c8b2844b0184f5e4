//! Gait phase generator
//!
//! Produces the stance and swing phase signals of each leg from the time since the last touch
//! down. Each signal runs from 0 to 1 over its phase and is 0 outside it. The front left leg runs
//! on its own clock and the other three legs are shifted by half a stride.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::trace;

// Internal
use crate::quad_base::{GaitConfig, NUM_LEGS};
use util::time::duration_to_seconds;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Duration of the swing phase.
///
/// Units: seconds
pub const SWING_PERIOD_S: f64 = 0.25;

/// Clock offset of each leg as a fraction of the stride period.
const LEG_PHASE_OFFSETS: [f64; NUM_LEGS] = [0.0, 0.5, 0.5, 0.5];

/// Stance signal of the first leg which must be reached before any leg is allowed to enter
/// stance after a start.
const STARTUP_STANCE_THRESHOLD: f64 = 0.5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Phase generator state.
#[derive(Debug, Clone, Default)]
pub struct PhaseGen {
    /// Start of the current stride, `None` while stopped.
    last_touch_down: Option<DateTime<Utc>>,

    /// Set once the first leg has passed half of its first stance.
    has_swung: bool,

    stance_signal: [f64; NUM_LEGS],

    swing_signal: [f64; NUM_LEGS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PhaseGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the phase signals to `now`.
    ///
    /// A zero `target_velocity` stops the gait and resets the generator. Timing does not depend
    /// on `_step_length`.
    pub fn run(
        &mut self,
        gait_config: &GaitConfig,
        target_velocity: f64,
        _step_length: f64,
        now: DateTime<Utc>,
    ) {
        let stance_period = gait_config.stance_duration;
        let stride_period = stance_period + SWING_PERIOD_S;

        if target_velocity == 0.0 {
            self.last_touch_down = None;
            self.has_swung = false;
            self.stance_signal = [0.0; NUM_LEGS];
            self.swing_signal = [0.0; NUM_LEGS];
            return;
        }

        let mut last_touch_down = self.last_touch_down.unwrap_or(now);
        if seconds_since(last_touch_down, now) >= stride_period {
            last_touch_down = now;
        }
        self.last_touch_down = Some(last_touch_down);

        let elapsed = util::maths::clamp(
            &seconds_since(last_touch_down, now),
            &0.0,
            &stride_period,
        );

        for i in 0..NUM_LEGS {
            let clock = elapsed - LEG_PHASE_OFFSETS[i] * stride_period;

            self.stance_signal[i] = if clock > 0.0 && clock < stance_period {
                clock / stance_period
            } else {
                0.0
            };

            self.swing_signal[i] = if clock > -SWING_PERIOD_S && clock < 0.0 {
                (clock + SWING_PERIOD_S) / SWING_PERIOD_S
            } else if clock > SWING_PERIOD_S && clock < stride_period {
                (clock - stance_period) / SWING_PERIOD_S
            } else {
                0.0
            };
        }

        // Hold every leg out of stance until the first leg is well into its first stance
        if !self.has_swung && self.stance_signal[0] < STARTUP_STANCE_THRESHOLD {
            self.stance_signal = [0.0; NUM_LEGS];
        } else {
            self.has_swung = true;
        }

        trace!(
            "Phase signals: stance {:?}, swing {:?}",
            self.stance_signal,
            self.swing_signal
        );
    }

    /// Stance signal of each leg.
    pub fn stance_signal(&self) -> &[f64; NUM_LEGS] {
        &self.stance_signal
    }

    /// Swing signal of each leg.
    pub fn swing_signal(&self) -> &[f64; NUM_LEGS] {
        &self.swing_signal
    }

    /// True while the gait is running.
    pub fn is_running(&self) -> bool {
        self.last_touch_down.is_some()
    }

    pub fn has_swung(&self) -> bool {
        self.has_swung
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn seconds_since(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    duration_to_seconds(now - then).unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
