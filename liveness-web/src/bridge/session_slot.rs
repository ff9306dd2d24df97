//! The bridge's single session slot
//!
//! Every open and close bumps a generation counter, so work started
//! against one session (an in-flight model load) cannot land on the next.

use std::cell::RefCell;

use log::debug;

use crate::clock::Clock;
use crate::error::{LivenessError, Result};
use crate::sequence::CaptureEvent;
use crate::session::CaptureSession;

pub struct SessionSlot<C: Clock> {
    generation: u64,
    session: Option<CaptureSession<C>>,
}

impl<C: Clock> SessionSlot<C> {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            session: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Install `session`, replacing any previous one. Returns its generation.
    pub fn open(&mut self, session: CaptureSession<C>) -> u64 {
        self.generation += 1;
        self.session = Some(session);
        self.generation
    }

    pub fn close(&mut self) -> Option<CaptureSession<C>> {
        self.generation += 1;
        self.session.take()
    }

    pub fn with<T>(&mut self, f: impl FnOnce(&mut CaptureSession<C>) -> Result<T>) -> Result<T> {
        match self.session.as_mut() {
            Some(session) => f(session),
            None => Err(LivenessError::NotInitialized),
        }
    }

    /// Apply a model load that began at `generation`. `Ok(false)` when the
    /// session it was started for is gone.
    pub fn finish_model_load(
        &mut self,
        generation: u64,
        outcome: std::result::Result<(), String>,
    ) -> Result<bool> {
        if generation != self.generation {
            debug!(
                "model load for session {} ignored, session {} is current",
                generation, self.generation
            );
            return Ok(false);
        }
        self.with(|session| match outcome {
            Ok(()) => {
                session.mark_model_ready();
                Ok(true)
            }
            Err(reason) => Err(session.mark_model_failed(reason)),
        })
    }

    fn take_capture_event(&mut self) -> Option<CaptureEvent> {
        self.session.as_mut()?.take_capture_event()
    }
}

impl<C: Clock> Default for SessionSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Take a fired capture out of the slot and hand it to `deliver`. The slot
/// borrow is released first, so `deliver` may use the slot again.
pub fn deliver_capture<C: Clock>(
    slot: &RefCell<SessionSlot<C>>,
    deliver: impl FnOnce(CaptureEvent),
) -> bool {
    let event = slot.borrow_mut().take_capture_event();
    match event {
        Some(event) => {
            deliver(event);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::LivenessConfig;
    use crate::hand::fixtures;
    use crate::session::CapturePhase;

    fn open_session<'a>(slot: &mut SessionSlot<&'a ManualClock>, clock: &'a ManualClock) -> u64 {
        let session = CaptureSession::open(LivenessConfig::default(), clock).unwrap();
        slot.open(session)
    }

    fn ready_slot(clock: &ManualClock) -> RefCell<SessionSlot<&ManualClock>> {
        let mut slot = SessionSlot::new();
        let generation = open_session(&mut slot, clock);
        assert!(slot.finish_model_load(generation, Ok(())).unwrap());
        RefCell::new(slot)
    }

    /// Show poses 1-3 then keep polling through the countdown, delivering
    /// after every tick
    fn run_to_capture(
        slot: &RefCell<SessionSlot<&ManualClock>>,
        clock: &ManualClock,
        mut on_capture: impl FnMut(CaptureEvent),
    ) {
        for hand in [fixtures::pose_one(), fixtures::pose_two(), fixtures::pose_three()] {
            for _ in 0..32 {
                slot.borrow_mut()
                    .with(|s| s.process_frame(Some(&hand)))
                    .unwrap();
                deliver_capture(slot, &mut on_capture);
                clock.advance(100.0);
            }
        }
        for _ in 0..80 {
            slot.borrow_mut().with(|s| Ok(s.poll())).unwrap();
            deliver_capture(slot, &mut on_capture);
            clock.advance(50.0);
        }
    }

    #[test]
    fn test_open_close_bump_generation() {
        let clock = ManualClock::new(0.0);
        let mut slot = SessionSlot::new();
        let first = open_session(&mut slot, &clock);
        let second = open_session(&mut slot, &clock);
        assert_eq!((first, second), (1, 2));
        assert!(slot.close().is_some());
        assert_eq!(slot.generation(), 3);
        assert!(!slot.is_open());
        assert!(matches!(
            slot.with(|_| Ok(())),
            Err(LivenessError::NotInitialized)
        ));
    }

    #[test]
    fn test_stale_model_load_ignored() {
        let clock = ManualClock::new(0.0);
        let mut slot = SessionSlot::new();
        let stale = open_session(&mut slot, &clock);
        slot.close();
        let current = open_session(&mut slot, &clock);

        assert!(!slot.finish_model_load(stale, Ok(())).unwrap());
        assert!(!slot.finish_model_load(stale, Err("timeout".into())).unwrap());
        let frame = slot.with(|s| s.process_frame(None));
        assert!(matches!(frame, Err(LivenessError::NotInitialized)));

        assert!(slot.finish_model_load(current, Ok(())).unwrap());
        assert!(slot.with(|s| s.process_frame(None)).unwrap().is_some());
    }

    #[test]
    fn test_model_load_after_close() {
        let clock = ManualClock::new(0.0);
        let mut slot = SessionSlot::new();
        let generation = open_session(&mut slot, &clock);
        slot.close();
        assert!(!slot.finish_model_load(generation, Ok(())).unwrap());
    }

    #[test]
    fn test_current_model_failure_surfaces() {
        let clock = ManualClock::new(0.0);
        let mut slot = SessionSlot::new();
        let generation = open_session(&mut slot, &clock);
        let err = slot.finish_model_load(generation, Err("404".into()));
        assert!(matches!(err, Err(LivenessError::ModelLoad(ref r)) if r == "404"));
    }

    #[test]
    fn test_capture_delivered_exactly_once() {
        let clock = ManualClock::new(0.0);
        let slot = ready_slot(&clock);

        let mut delivered = Vec::new();
        run_to_capture(&slot, &clock, |event| delivered.push(event));

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].sequence_id, 1);
        assert!(!deliver_capture(&slot, |_| panic!("delivered twice")));
        let phase = slot.borrow_mut().with(|s| Ok(s.phase())).unwrap();
        assert_eq!(phase, CapturePhase::Capturing);
    }

    #[test]
    fn test_deliver_may_reenter_slot() {
        let clock = ManualClock::new(0.0);
        let slot = ready_slot(&clock);

        let mut calls = 0;
        run_to_capture(&slot, &clock, |_| {
            calls += 1;
            slot.borrow_mut()
                .with(|s| {
                    s.finish_capture();
                    Ok(())
                })
                .unwrap();
        });

        assert_eq!(calls, 1);
        let phase = slot.borrow_mut().with(|s| Ok(s.phase())).unwrap();
        assert_eq!(phase, CapturePhase::Captured);
    }

    #[test]
    fn test_nothing_delivered_without_session() {
        let slot: RefCell<SessionSlot<&ManualClock>> = RefCell::new(SessionSlot::new());
        assert!(!deliver_capture(&slot, |_| panic!("no session")));
    }
}
