//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Number of microseconds in a second
pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    if let Some(ns) = duration.num_nanoseconds() {
        Some(ns as f64 / NANOS_PER_SECOND as f64)
    }
    else if let Some(us) = duration.num_microseconds() {
        Some(us as f64 / MICROS_PER_SECOND as f64)
    }
    else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_conversion() {
        assert_eq!(
            duration_to_seconds(chrono::Duration::milliseconds(250)),
            Some(0.25)
        );
        assert_eq!(
            duration_to_seconds(chrono::Duration::milliseconds(-1500)),
            Some(-1.5)
        );
    }
}
