//! Liveness Web - hand-gesture liveness check for selfie capture
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! The user shows 1, 2 and 3 fingers, each held for a few seconds; a
//! short countdown then signals the host to take the photo exactly once.

mod bridge;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod error;
pub mod hand;
pub mod sequence;
pub mod session;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    close_capture_session, get_countdown_state, get_current_pose_instruction, get_pose_state,
    open_capture_session, poll_capture_state, set_capture_callback, submit_hand_landmarks,
    take_capture_event,
};

pub use classifier::{PoseClassification, PoseClassifier, PoseLabel};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LivenessConfig;
pub use error::{LivenessError, Result};
pub use hand::HandSkeleton;
pub use sequence::{CaptureEvent, SequenceMachine};
pub use session::{CaptureSession, UiSnapshot};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::init_console_logger(log::LevelFilter::Info);
}
