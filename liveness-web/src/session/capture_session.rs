//! Capture session - one liveness modal from open to close
//!
//! Owns the classifier, the sequence machine and the clock. The host
//! drives it from two loops: `process_*` per detection frame (≈100 ms)
//! and `poll` per UI tick (≈50 ms). `poll` also recomputes the countdown,
//! so a capture missed by the frame loop still fires.

use log::{debug, info, warn};
use serde::Serialize;

use crate::classifier::{PoseClassifier, PoseLabel};
use crate::clock::Clock;
use crate::config::LivenessConfig;
use crate::error::{LivenessError, Result};
use crate::hand::HandSkeleton;
use crate::sequence::{CaptureEvent, CountdownState, SequenceMachine, SequenceState, SequenceStep};

use super::feedback::{
    detection_status, focus_point, pose_indicators, DetectionStatus, FocusPoint, FrameReport,
    PoseIndicator,
};

/// Hand-landmark model lifecycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ModelReadiness {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePhase {
    /// Detection loop running
    Detecting,
    /// Capture fired, the host is taking the photo
    Capturing,
    /// Photo taken, waiting for confirm or retake
    Captured,
}

/// Everything the UI renders on one tick
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UiSnapshot {
    pub instruction: String,
    pub step: SequenceStep,
    pub target_pose: PoseLabel,
    pub countdown: CountdownState,
    pub indicators: [PoseIndicator; 3],
    pub detection_status: DetectionStatus,
    pub focus_point: Option<FocusPoint>,
    pub phase: CapturePhase,
    pub readiness: ModelReadiness,
}

pub struct CaptureSession<C: Clock> {
    config: LivenessConfig,
    classifier: PoseClassifier,
    machine: SequenceMachine,
    clock: C,
    readiness: ModelReadiness,
    phase: CapturePhase,
    last_frame: Option<FrameReport>,
}

impl<C: Clock> CaptureSession<C> {
    /// Validate `config`, build the pipeline and start at pose 1
    pub fn open(config: LivenessConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let mut machine = SequenceMachine::new(config.sequence.clone());
        machine.start_sequence();
        Ok(Self {
            classifier: PoseClassifier::new(config.classifier.clone()),
            machine,
            clock,
            config,
            readiness: ModelReadiness::Loading,
            phase: CapturePhase::Detecting,
            last_frame: None,
        })
    }

    pub fn config(&self) -> &LivenessConfig {
        &self.config
    }

    pub fn readiness(&self) -> &ModelReadiness {
        &self.readiness
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn last_frame(&self) -> Option<&FrameReport> {
        self.last_frame.as_ref()
    }

    pub fn mark_model_ready(&mut self) {
        info!("hand landmark model ready");
        self.readiness = ModelReadiness::Ready;
    }

    /// Record a model load failure. The returned error is for the host to
    /// surface; nothing retries.
    pub fn mark_model_failed(&mut self, reason: impl Into<String>) -> LivenessError {
        let reason = reason.into();
        warn!("hand landmark model failed: {}", reason);
        self.readiness = ModelReadiness::Failed(reason.clone());
        LivenessError::ModelLoad(reason)
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.readiness {
            ModelReadiness::Ready => Ok(()),
            _ => Err(LivenessError::NotInitialized),
        }
    }

    // ========================================================================
    // FRAME LOOP
    // ========================================================================

    /// Classify one frame and feed the machine.
    ///
    /// `Ok(None)` once capture has started; frames are ignored until retake.
    pub fn process_frame(&mut self, hand: Option<&HandSkeleton>) -> Result<Option<FrameReport>> {
        self.ensure_ready()?;
        if self.phase != CapturePhase::Detecting {
            return Ok(None);
        }

        let classification = self.classifier.classify(hand);
        let target = self.machine.step().target_pose();
        let now = self.clock.now_ms();
        let tick = self
            .machine
            .update(classification.pose, classification.confidence, now);

        let report = FrameReport {
            classification,
            tick,
            target,
        };
        self.last_frame = Some(report.clone());
        Ok(Some(report))
    }

    /// Frame from the model's flat `num_hands × 21 × 3` output. A malformed
    /// buffer counts as a frame without a hand.
    pub fn process_raw(&mut self, data: &[f32], num_hands: usize) -> Result<Option<FrameReport>> {
        let hand = match HandSkeleton::from_flat_hands(data, num_hands) {
            Ok(hand) => hand,
            Err(err) => {
                debug!("dropping landmarks: {}", err);
                None
            }
        };
        self.process_frame(hand.as_ref())
    }

    /// The landmark model threw for this frame
    pub fn process_source_failure(&mut self) -> Result<Option<FrameReport>> {
        self.process_frame(None)
    }

    // ========================================================================
    // UI LOOP
    // ========================================================================

    pub fn poll(&mut self) -> UiSnapshot {
        let now = self.clock.now_ms();
        let countdown = self.machine.countdown_state(now);
        let state = self.machine.pose_state();

        UiSnapshot {
            instruction: self.machine.current_pose_instruction(now),
            step: state.current_step,
            target_pose: state.target_pose,
            countdown,
            indicators: pose_indicators(state.current_step),
            detection_status: detection_status(state.current_step, self.last_frame.as_ref()),
            focus_point: self
                .last_frame
                .as_ref()
                .and_then(|f| focus_point(&f.classification, &self.config.feedback)),
            phase: self.phase,
            readiness: self.readiness.clone(),
        }
    }

    pub fn pose_state(&self) -> SequenceState {
        self.machine.pose_state()
    }

    pub fn countdown_state(&mut self) -> CountdownState {
        let now = self.clock.now_ms();
        self.machine.countdown_state(now)
    }

    pub fn current_pose_instruction(&self) -> String {
        self.machine.current_pose_instruction(self.clock.now_ms())
    }

    // ========================================================================
    // CAPTURE FLOW
    // ========================================================================

    /// Consume the capture event; stops the detection loop
    pub fn take_capture_event(&mut self) -> Option<CaptureEvent> {
        let event = self.machine.take_capture_event()?;
        if self.phase == CapturePhase::Detecting {
            info!("capturing photo for sequence {}", event.sequence_id);
            self.phase = CapturePhase::Capturing;
        }
        Some(event)
    }

    pub fn finish_capture(&mut self) {
        self.phase = CapturePhase::Captured;
    }

    pub fn start_sequence(&mut self) {
        self.machine.start_sequence();
        self.last_frame = None;
    }

    pub fn reset_sequence(&mut self) {
        self.machine.reset_sequence();
        self.last_frame = None;
    }

    /// Discard the photo and run the challenge again from pose 1
    pub fn retake(&mut self) {
        info!("retake requested");
        self.start_sequence();
        self.phase = CapturePhase::Detecting;
    }

    pub fn set_frame_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.config.feedback.frame_width = width;
            self.config.feedback.frame_height = height;
        }
    }

    pub fn close(self) {
        debug!("capture session closed at step {}", self.machine.step().index());
    }
}
