//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod console_logger;
mod session_bridge;
mod session_slot;

pub use console_logger::init_console_logger;

pub use session_bridge::{
    // Session lifecycle
    open_capture_session,
    close_capture_session,
    initialize_detector,
    set_detector_ready,
    set_log_level,
    // Detection loop
    submit_hand_landmarks,
    report_detection_failure,
    // UI loop
    poll_capture_state,
    get_pose_state,
    get_countdown_state,
    get_current_pose_instruction,
    get_hand_connections,
    // Sequence control
    start_sequence,
    reset_sequence,
    retake_photo,
    mark_photo_captured,
    set_frame_size,
    // Capture delivery
    set_capture_callback,
    clear_capture_callback,
    take_capture_event,
};
