//! One-shot capture latch
//!
//! `fire` succeeds once per sequence run and leaves a single pending
//! event; `take` hands that event out at most once. Both stay inert until
//! `reset`.

use serde::Serialize;

/// Emitted once when the countdown reaches zero
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CaptureEvent {
    /// Run counter of the sequence that fired
    pub sequence_id: u64,
    pub fired_at_ms: f64,
}

#[derive(Debug, Default)]
pub struct CaptureLatch {
    fired: bool,
    pending: Option<CaptureEvent>,
}

impl CaptureLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true only for the first call since the last reset
    pub fn fire(&mut self, event: CaptureEvent) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        self.pending = Some(event);
        true
    }

    pub fn take(&mut self) -> Option<CaptureEvent> {
        self.pending.take()
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    pub fn reset(&mut self) {
        self.fired = false;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(at: f64) -> CaptureEvent {
        CaptureEvent { sequence_id: 1, fired_at_ms: at }
    }

    #[test]
    fn test_fires_once() {
        let mut latch = CaptureLatch::new();
        assert!(latch.fire(event(10.0)));
        assert!(!latch.fire(event(20.0)));
        assert_eq!(latch.take(), Some(event(10.0)));
        assert_eq!(latch.take(), None);
        // Consumed but still fired: no second event
        assert!(!latch.fire(event(30.0)));
        assert!(latch.is_fired());
    }

    #[test]
    fn test_reset_rearms() {
        let mut latch = CaptureLatch::new();
        latch.fire(event(10.0));
        latch.reset();
        assert_eq!(latch.take(), None);
        assert!(latch.fire(event(40.0)));
    }
}
