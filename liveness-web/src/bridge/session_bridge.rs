//! Capture session JS bridge
//!
//! The host opens one session per liveness modal and drives it from two
//! `setInterval` loops: `submit_hand_landmarks` after each model inference
//! and `poll_capture_state` for the UI. Structured results go back as JSON
//! strings.
//!
//! Capture delivery: when a registered callback exists it is called once,
//! right after the recomputation that fired, with the event JSON. Without
//! one the event waits for `take_capture_event`. The call happens with the
//! session borrow released, so the callback may call back into this module.

use std::cell::RefCell;

use log::{info, warn, LevelFilter};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::clock::SystemClock;
use crate::config::LivenessConfig;
use crate::error::{LivenessError, Result};
use crate::hand::hand_connections;
use crate::session::CaptureSession;

use super::console_logger::init_console_logger;
use super::session_slot::{deliver_capture, SessionSlot};

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<SessionSlot<SystemClock>> = const { RefCell::new(SessionSlot::new()) };
    static CAPTURE_CALLBACK: RefCell<Option<js_sys::Function>> = const { RefCell::new(None) };
}

fn with_session<T>(f: impl FnOnce(&mut CaptureSession<SystemClock>) -> Result<T>) -> Result<T> {
    SESSION.with(|cell| cell.borrow_mut().with(f))
}

fn to_json<T: Serialize>(value: &T) -> std::result::Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Hand a fired capture to the registered callback
fn dispatch_capture() {
    let Some(callback) = CAPTURE_CALLBACK.with(|cell| cell.borrow().clone()) else {
        return;
    };
    SESSION.with(|cell| {
        deliver_capture(cell, |event| match serde_json::to_string(&event) {
            Ok(json) => {
                if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    warn!("capture callback threw: {:?}", err);
                }
            }
            Err(err) => warn!("capture event not serializable: {}", err),
        });
    });
}

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================

/// Open a new session, replacing any previous one. `config_json` may be a
/// partial `LivenessConfig`; missing fields use defaults.
#[wasm_bindgen]
pub fn open_capture_session(config_json: Option<String>) -> std::result::Result<(), JsValue> {
    let config = match config_json {
        Some(json) => LivenessConfig::from_json(&json)?,
        None => LivenessConfig::default(),
    };
    let session = CaptureSession::open(config, SystemClock::new())?;
    let generation = SESSION.with(|cell| cell.borrow_mut().open(session));
    info!("capture session {} opened", generation);
    Ok(())
}

/// Drop the session and any registered callback
#[wasm_bindgen]
pub fn close_capture_session() {
    CAPTURE_CALLBACK.with(|cell| cell.borrow_mut().take());
    if let Some(session) = SESSION.with(|cell| cell.borrow_mut().close()) {
        session.close();
    }
}

/// Await the host's model-loading promise. A rejection marks the session
/// failed and rejects with the load error. A promise that settles after its
/// session was closed or replaced is ignored.
#[wasm_bindgen]
pub async fn initialize_detector(
    model_promise: js_sys::Promise,
) -> std::result::Result<(), JsValue> {
    let generation = SESSION.with(|cell| {
        let slot = cell.borrow();
        if slot.is_open() {
            Ok(slot.generation())
        } else {
            Err(LivenessError::NotInitialized)
        }
    })?;

    let outcome = JsFuture::from(model_promise)
        .await
        .map(|_| ())
        .map_err(|err| err.as_string().unwrap_or_else(|| format!("{:?}", err)));
    SESSION.with(|cell| cell.borrow_mut().finish_model_load(generation, outcome))?;
    Ok(())
}

/// For hosts that load the model themselves
#[wasm_bindgen]
pub fn set_detector_ready() -> std::result::Result<(), JsValue> {
    Ok(with_session(|session| {
        session.mark_model_ready();
        Ok(())
    })?)
}

#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    match level.parse::<LevelFilter>() {
        Ok(filter) => init_console_logger(filter),
        Err(_) => warn!("unknown log level {:?}", level),
    }
}

// ============================================================================
// DETECTION LOOP
// ============================================================================

/// Landmarks for one frame: flat `num_hands × 21 × 3` pixel coordinates.
/// Returns the frame report JSON, or `"null"` once capture has started.
#[wasm_bindgen]
pub fn submit_hand_landmarks(
    data: &[f32],
    num_hands: usize,
) -> std::result::Result<String, JsValue> {
    let report = with_session(|session| session.process_raw(data, num_hands))?;
    dispatch_capture();
    to_json(&report)
}

/// The model threw on this frame
#[wasm_bindgen]
pub fn report_detection_failure() -> std::result::Result<String, JsValue> {
    let report = with_session(|session| session.process_source_failure())?;
    dispatch_capture();
    to_json(&report)
}

// ============================================================================
// UI LOOP
// ============================================================================

/// Everything the modal renders; also recomputes the countdown
#[wasm_bindgen]
pub fn poll_capture_state() -> std::result::Result<String, JsValue> {
    let snapshot = with_session(|session| Ok(session.poll()))?;
    dispatch_capture();
    to_json(&snapshot)
}

#[wasm_bindgen]
pub fn get_pose_state() -> std::result::Result<String, JsValue> {
    let state = with_session(|session| Ok(session.pose_state()))?;
    to_json(&state)
}

#[wasm_bindgen]
pub fn get_countdown_state() -> std::result::Result<String, JsValue> {
    let countdown = with_session(|session| Ok(session.countdown_state()))?;
    dispatch_capture();
    to_json(&countdown)
}

#[wasm_bindgen]
pub fn get_current_pose_instruction() -> std::result::Result<String, JsValue> {
    Ok(with_session(|session| Ok(session.current_pose_instruction()))?)
}

/// Landmark index pairs for drawing the hand overlay, as a JSON array
#[wasm_bindgen]
pub fn get_hand_connections() -> std::result::Result<String, JsValue> {
    to_json(&hand_connections())
}

// ============================================================================
// SEQUENCE CONTROL
// ============================================================================

#[wasm_bindgen]
pub fn start_sequence() -> std::result::Result<(), JsValue> {
    Ok(with_session(|session| {
        session.start_sequence();
        Ok(())
    })?)
}

#[wasm_bindgen]
pub fn reset_sequence() -> std::result::Result<(), JsValue> {
    Ok(with_session(|session| {
        session.reset_sequence();
        Ok(())
    })?)
}

#[wasm_bindgen]
pub fn retake_photo() -> std::result::Result<(), JsValue> {
    Ok(with_session(|session| {
        session.retake();
        Ok(())
    })?)
}

#[wasm_bindgen]
pub fn mark_photo_captured() -> std::result::Result<(), JsValue> {
    Ok(with_session(|session| {
        session.finish_capture();
        Ok(())
    })?)
}

/// Video size in pixels, for the focus indicator
#[wasm_bindgen]
pub fn set_frame_size(width: f32, height: f32) -> std::result::Result<(), JsValue> {
    Ok(with_session(|session| {
        session.set_frame_size(width, height);
        Ok(())
    })?)
}

// ============================================================================
// CAPTURE DELIVERY
// ============================================================================

#[wasm_bindgen]
pub fn set_capture_callback(callback: js_sys::Function) {
    CAPTURE_CALLBACK.with(|cell| *cell.borrow_mut() = Some(callback));
    // A capture that fired before registration is delivered now
    dispatch_capture();
}

#[wasm_bindgen]
pub fn clear_capture_callback() {
    CAPTURE_CALLBACK.with(|cell| cell.borrow_mut().take());
}

/// Pending capture event JSON, at most once per run
#[wasm_bindgen]
pub fn take_capture_event() -> std::result::Result<Option<String>, JsValue> {
    match with_session(|session| Ok(session.take_capture_event()))? {
        Some(event) => to_json(&event).map(Some),
        None => Ok(None),
    }
}
