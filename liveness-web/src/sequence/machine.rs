//! Sequence state machine
//!
//! Walks pose 1 → 2 → 3, each held continuously for the configured time,
//! then runs the countdown and fires the capture once. Time is always
//! passed in by the caller (milliseconds, host clock), so the machine is
//! deterministic under test.
//!
//! Two loops drive it: `update` from the frame classifier and
//! `countdown_state` from the UI poll. Either may be the one that fires.

use log::{debug, info};
use serde::Serialize;

use crate::classifier::PoseLabel;
use crate::config::SequenceConfig;

use super::countdown::{countdown_value, CountdownState};
use super::latch::{CaptureEvent, CaptureLatch};
use super::step::SequenceStep;

// ============================================================================
// SNAPSHOTS
// ============================================================================

/// Result of one `update` call
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SequenceTick {
    /// The target pose completed its hold on this tick
    pub is_stable: bool,
    /// How long the target pose has been held so far
    pub stable_time_ms: f64,
    /// True only on the call that fired the capture
    pub should_capture: bool,
}

/// Read-only view of the machine for the host
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SequenceState {
    pub current_step: SequenceStep,
    /// Pose being waited for; stays at the last pose once counting down
    pub target_pose: PoseLabel,
    pub stable_since_ms: Option<f64>,
    pub counting_down: bool,
    pub countdown_start_ms: Option<f64>,
    pub capture_fired: bool,
    pub sequence_id: u64,
}

// ============================================================================
// MACHINE
// ============================================================================

pub struct SequenceMachine {
    config: SequenceConfig,
    step: SequenceStep,
    target: PoseLabel,
    stable_since: Option<f64>,
    countdown_start: Option<f64>,
    latch: CaptureLatch,
    sequence_id: u64,
}

impl SequenceMachine {
    pub fn new(config: SequenceConfig) -> Self {
        Self {
            config,
            step: SequenceStep::Idle,
            target: PoseLabel::One,
            stable_since: None,
            countdown_start: None,
            latch: CaptureLatch::new(),
            sequence_id: 0,
        }
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn step(&self) -> SequenceStep {
        self.step
    }

    /// Begin a new run at pose 1, discarding any previous progress
    pub fn start_sequence(&mut self) {
        self.sequence_id += 1;
        self.clear();
        self.step = SequenceStep::first();
        info!("sequence {} started", self.sequence_id);
    }

    /// Back to idle
    pub fn reset_sequence(&mut self) {
        self.clear();
        self.step = SequenceStep::Idle;
        debug!("sequence reset");
    }

    fn clear(&mut self) {
        self.target = PoseLabel::One;
        self.stable_since = None;
        self.countdown_start = None;
        self.latch.reset();
    }

    /// Feed one classified frame.
    ///
    /// While awaiting a pose, a frame counts toward the hold only if it
    /// shows the target pose at or above the confidence threshold; any
    /// other frame (wrong pose, low confidence, no hand) restarts the hold.
    /// During the countdown the pose is ignored and the countdown advances.
    pub fn update(&mut self, pose: PoseLabel, confidence: f32, now_ms: f64) -> SequenceTick {
        match self.step {
            SequenceStep::Idle | SequenceStep::Captured => SequenceTick::default(),
            SequenceStep::Countdown => SequenceTick {
                should_capture: self.countdown_state(now_ms).should_capture,
                ..SequenceTick::default()
            },
            SequenceStep::AwaitPose(target) => self.hold(target, pose, confidence, now_ms),
        }
    }

    fn hold(
        &mut self,
        target: PoseLabel,
        pose: PoseLabel,
        confidence: f32,
        now_ms: f64,
    ) -> SequenceTick {
        if pose != target || confidence < self.config.confidence_threshold {
            if self.stable_since.take().is_some() {
                debug!("pose {} hold broken", target.index());
            }
            return SequenceTick::default();
        }

        let since = *self.stable_since.get_or_insert(now_ms);
        let held = (now_ms - since).max(0.0);

        if held < self.config.stability_hold_ms {
            return SequenceTick {
                stable_time_ms: held,
                ..SequenceTick::default()
            };
        }

        self.advance(target, now_ms);
        SequenceTick {
            is_stable: true,
            stable_time_ms: held,
            should_capture: false,
        }
    }

    fn advance(&mut self, completed: PoseLabel, now_ms: f64) {
        self.stable_since = None;
        match completed.next() {
            Some(next) => {
                info!("pose {} held, now waiting for pose {}", completed.index(), next.index());
                self.target = next;
                self.step = SequenceStep::AwaitPose(next);
            }
            None => {
                info!("all poses held, countdown started");
                self.step = SequenceStep::Countdown;
                self.countdown_start = Some(now_ms);
            }
        }
    }

    pub fn pose_state(&self) -> SequenceState {
        SequenceState {
            current_step: self.step,
            target_pose: self.target,
            stable_since_ms: self.stable_since,
            counting_down: self.step == SequenceStep::Countdown,
            countdown_start_ms: self.countdown_start,
            capture_fired: self.latch.is_fired(),
            sequence_id: self.sequence_id,
        }
    }

    /// Countdown number at `now_ms` without side effects. The full count
    /// outside the countdown, 0 once captured.
    pub fn countdown_value(&self, now_ms: f64) -> u32 {
        match (self.step, self.countdown_start) {
            (SequenceStep::Countdown, Some(start)) => countdown_value(
                now_ms - start,
                self.config.countdown_step_ms,
                self.config.countdown_steps,
            ),
            (SequenceStep::Captured, _) => 0,
            _ => self.config.countdown_steps,
        }
    }

    /// Recompute the countdown, firing the capture when it reaches zero.
    /// Safe to call any number of times; only one call per run reports
    /// `should_capture`.
    pub fn countdown_state(&mut self, now_ms: f64) -> CountdownState {
        let value = self.countdown_value(now_ms);
        if self.step != SequenceStep::Countdown {
            return CountdownState {
                is_counting_down: false,
                countdown_value: value,
                should_capture: false,
            };
        }

        let should_capture = value == 0
            && self.latch.fire(CaptureEvent {
                sequence_id: self.sequence_id,
                fired_at_ms: now_ms,
            });

        if should_capture {
            info!("sequence {} capture fired at {:.0} ms", self.sequence_id, now_ms);
            self.step = SequenceStep::Captured;
            self.countdown_start = None;
        }

        CountdownState {
            is_counting_down: self.step == SequenceStep::Countdown,
            countdown_value: value,
            should_capture,
        }
    }

    /// Prompt for the current step
    pub fn current_pose_instruction(&self, now_ms: f64) -> String {
        let secs = (self.config.stability_hold_ms / 1000.0).round() as u64;
        let unit = if secs == 1 { "second" } else { "seconds" };
        match self.step {
            SequenceStep::Idle => "Lift your hand to start".to_string(),
            SequenceStep::AwaitPose(PoseLabel::One) => {
                format!("Show 1 finger (index finger up) - hold for {} {}", secs, unit)
            }
            SequenceStep::AwaitPose(PoseLabel::Two) => {
                format!("Show 2 fingers (peace sign) - hold for {} {}", secs, unit)
            }
            SequenceStep::AwaitPose(_) => format!("Show 3 fingers - hold for {} {}", secs, unit),
            SequenceStep::Countdown => {
                format!("Hold still! Capturing in {}...", self.countdown_value(now_ms))
            }
            SequenceStep::Captured => "Photo captured!".to_string(),
        }
    }

    /// The capture event, handed out at most once per run
    pub fn take_capture_event(&mut self) -> Option<CaptureEvent> {
        self.latch.take()
    }
}

impl Default for SequenceMachine {
    fn default() -> Self {
        Self::new(SequenceConfig::default())
    }
}
