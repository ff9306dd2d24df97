//! UI feedback derived from the machine and the last frame

use serde::Serialize;

use crate::classifier::{PoseClassification, PoseLabel};
use crate::config::FeedbackConfig;
use crate::hand::Finger;
use crate::sequence::{SequenceStep, SequenceTick};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorStatus {
    Pending,
    Detecting,
    Completed,
}

/// Progress dot for one of the three poses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PoseIndicator {
    pub pose: PoseLabel,
    pub status: IndicatorStatus,
}

/// Status line under the video
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    /// Target pose just completed its hold, or the sequence is past the poses
    Detected,
    /// Target pose visible but still holding, or no hand yet
    Detecting,
    /// A hand is visible showing the wrong pose
    NotDetected,
}

/// Focus marker position, percent of the frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FocusPoint {
    pub x: f32,
    pub y: f32,
}

/// One classified frame plus what the machine made of it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub classification: PoseClassification,
    pub tick: SequenceTick,
    /// Pose the machine was waiting for when the frame arrived
    pub target: Option<PoseLabel>,
}

pub fn pose_indicators(step: SequenceStep) -> [PoseIndicator; 3] {
    PoseLabel::SEQUENCE.map(|pose| {
        let status = match step {
            SequenceStep::Idle => IndicatorStatus::Pending,
            SequenceStep::Countdown | SequenceStep::Captured => IndicatorStatus::Completed,
            SequenceStep::AwaitPose(target) if pose.index() < target.index() => {
                IndicatorStatus::Completed
            }
            SequenceStep::AwaitPose(target) if pose == target => IndicatorStatus::Detecting,
            SequenceStep::AwaitPose(_) => IndicatorStatus::Pending,
        };
        PoseIndicator { pose, status }
    })
}

pub fn detection_status(step: SequenceStep, last: Option<&FrameReport>) -> DetectionStatus {
    if matches!(step, SequenceStep::Countdown | SequenceStep::Captured) {
        return DetectionStatus::Detected;
    }
    let Some(frame) = last else {
        return DetectionStatus::Detecting;
    };
    if frame.tick.is_stable {
        DetectionStatus::Detected
    } else if !frame.classification.detected || Some(frame.classification.pose) == frame.target {
        DetectionStatus::Detecting
    } else {
        DetectionStatus::NotDetected
    }
}

/// Mean of the fingertips that make the detected pose, or the box centre
/// for an unrecognized hand, as a clamped frame percentage
pub fn focus_point(
    classification: &PoseClassification,
    cfg: &FeedbackConfig,
) -> Option<FocusPoint> {
    if !classification.detected {
        return None;
    }

    let fingers: &[Finger] = match classification.pose {
        PoseLabel::One => &[Finger::Index],
        PoseLabel::Two => &[Finger::Index, Finger::Middle],
        PoseLabel::Three => &[Finger::Index, Finger::Middle, Finger::Ring],
        PoseLabel::None => &[],
    };

    let tips: Vec<_> = fingers
        .iter()
        .filter_map(|f| classification.keypoints.get(f.tip()))
        .collect();

    let (x, y) = if tips.is_empty() {
        classification.bounding_box?.center()
    } else {
        let n = tips.len() as f32;
        (
            tips.iter().map(|p| p.x).sum::<f32>() / n,
            tips.iter().map(|p| p.y).sum::<f32>() / n,
        )
    };

    Some(FocusPoint {
        x: (x / cfg.frame_width * 100.0).clamp(cfg.focus_min_x, cfg.focus_max_x),
        y: (y / cfg.frame_height * 100.0).clamp(cfg.focus_min_y, cfg.focus_max_y),
    })
}
