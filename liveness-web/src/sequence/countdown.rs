//! Countdown buckets
//!
//! The value is looked up by explicit half-open time ranges
//! ([0, step) → N, [step, 2·step) → N-1, ...) instead of dividing elapsed
//! time, so a poll landing exactly on a boundary never shows a stale
//! number.

use serde::Serialize;

/// Countdown as rendered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CountdownState {
    pub is_counting_down: bool,
    pub countdown_value: u32,
    /// True only on the call that fired the capture
    pub should_capture: bool,
}

/// Countdown number for `elapsed_ms` since the countdown began.
/// Negative elapsed time (clock skew) reads as the first number.
pub fn countdown_value(elapsed_ms: f64, step_ms: f64, steps: u32) -> u32 {
    for bucket in 1..=steps {
        if elapsed_ms < step_ms * bucket as f64 {
            return steps - (bucket - 1);
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_two_one_zero() {
        let values: Vec<u32> = [
            0.0, 999.0, 1000.0, 1999.0, 2000.0, 2999.0, 3000.0, 3001.0, 60_000.0,
        ]
        .iter()
        .map(|t| countdown_value(*t, 1000.0, 3))
        .collect();
        assert_eq!(values, vec![3, 3, 2, 2, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_monotonic_over_fine_sweep() {
        let mut last = 3;
        let mut seen = vec![3];
        for ms in 0..4000 {
            let v = countdown_value(ms as f64, 1000.0, 3);
            assert!(v <= last);
            if v != last {
                seen.push(v);
                last = v;
            }
        }
        assert_eq!(seen, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_negative_elapsed() {
        assert_eq!(countdown_value(-50.0, 1000.0, 3), 3);
    }
}
