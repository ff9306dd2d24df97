//! Session module - capture flow for one liveness modal
//!
//! Re-exports only. All logic in submodules.

mod capture_session;
mod feedback;

pub use capture_session::{CapturePhase, CaptureSession, ModelReadiness, UiSnapshot};
pub use feedback::{
    detection_status, focus_point, pose_indicators, DetectionStatus, FocusPoint, FrameReport,
    IndicatorStatus, PoseIndicator,
};
