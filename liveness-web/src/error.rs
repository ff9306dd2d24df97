//! Error types for the liveness challenge
//!
//! Only initialization and configuration failures reach the host as errors.
//! Per-frame detection problems are absorbed by the classifier.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced by the liveness subsystem
#[derive(Debug, Error)]
pub enum LivenessError {
    /// The hand-landmark model could not be loaded
    #[error("hand landmark model failed to load: {0}")]
    ModelLoad(String),

    /// A frame was submitted before the model reported ready
    #[error("hand detector not initialized")]
    NotInitialized,

    /// Landmark data did not describe a 21-point hand
    #[error("malformed hand skeleton: {0}")]
    MalformedSkeleton(String),

    /// Configuration could not be parsed or failed validation
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for LivenessError {
    fn from(err: serde_json::Error) -> Self {
        LivenessError::Config(err.to_string())
    }
}

impl From<LivenessError> for JsValue {
    fn from(err: LivenessError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LivenessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_become_config() {
        let err: LivenessError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, LivenessError::Config(_)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            LivenessError::ModelLoad("404".into()).to_string(),
            "hand landmark model failed to load: 404"
        );
        assert_eq!(LivenessError::NotInitialized.to_string(), "hand detector not initialized");
    }
}
