//! Sequence steps

use serde::Serialize;

use crate::classifier::PoseLabel;

/// Step of the 1-2-3 challenge.
///
/// Numbered 0-5 for the host: 0 idle, 1-3 awaiting that pose,
/// 4 countdown, 5 captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum SequenceStep {
    Idle,
    AwaitPose(PoseLabel),
    Countdown,
    Captured,
}

impl SequenceStep {
    pub fn first() -> Self {
        SequenceStep::AwaitPose(PoseLabel::One)
    }

    pub fn index(&self) -> u8 {
        match self {
            SequenceStep::Idle => 0,
            SequenceStep::AwaitPose(pose) => pose.index(),
            SequenceStep::Countdown => 4,
            SequenceStep::Captured => 5,
        }
    }

    pub fn target_pose(&self) -> Option<PoseLabel> {
        match self {
            SequenceStep::AwaitPose(pose) => Some(*pose),
            _ => None,
        }
    }
}

impl From<SequenceStep> for u8 {
    fn from(step: SequenceStep) -> u8 {
        step.index()
    }
}
