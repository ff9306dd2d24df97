//! Tunable parameters for the liveness challenge
//!
//! Geometric margins are in video pixels (tuned against 640×480 webcam
//! frames). Every field has a default, so a host may send a partial JSON
//! object with only the values it wants to override.

use serde::{Deserialize, Serialize};

use crate::error::{LivenessError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LivenessConfig {
    pub classifier: ClassifierConfig,
    pub sequence: SequenceConfig,
    pub feedback: FeedbackConfig,
}

impl LivenessConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LivenessConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let seq = &self.sequence;
        if !(seq.stability_hold_ms > 0.0) {
            return Err(invalid("sequence.stability_hold_ms must be positive"));
        }
        if !(seq.countdown_step_ms > 0.0) {
            return Err(invalid("sequence.countdown_step_ms must be positive"));
        }
        if seq.countdown_steps == 0 {
            return Err(invalid("sequence.countdown_steps must be at least 1"));
        }
        if !(seq.confidence_threshold >= 0.0) {
            return Err(invalid("sequence.confidence_threshold must be non-negative"));
        }

        let t = &self.classifier.template_thresholds;
        if [t.one, t.two, t.three, t.decoy].iter().any(|v| !(*v >= 0.0)) {
            return Err(invalid("classifier.template_thresholds must be non-negative"));
        }

        let fb = &self.feedback;
        if !(fb.frame_width > 0.0 && fb.frame_height > 0.0) {
            return Err(invalid("feedback frame size must be positive"));
        }
        if fb.focus_min_x > fb.focus_max_x || fb.focus_min_y > fb.focus_max_y {
            return Err(invalid("feedback focus bounds are inverted"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> LivenessError {
    LivenessError::Config(msg.to_string())
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub template_thresholds: TemplateThresholds,
    pub curl_limits: CurlLimits,
    pub finger_count: FingerCountConfig,
    /// Closed-hand single index check run first inside finger counting
    pub strict_index: SingleIndexConfig,
    /// Standalone index finger check run after finger counting
    pub index_check: SingleIndexConfig,
    pub three_finger: ThreeFingerConfig,
    pub bounding_box: BoundingBoxConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            template_thresholds: TemplateThresholds::default(),
            curl_limits: CurlLimits::default(),
            finger_count: FingerCountConfig::default(),
            strict_index: SingleIndexConfig::strict(),
            index_check: SingleIndexConfig::default(),
            three_finger: ThreeFingerConfig::default(),
            bounding_box: BoundingBoxConfig::default(),
        }
    }
}

/// Minimum template score (0-10) per target pose
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateThresholds {
    pub one: f32,
    pub two: f32,
    pub three: f32,
    /// Templates that map to no pose (thumbs up)
    pub decoy: f32,
}

impl Default for TemplateThresholds {
    fn default() -> Self {
        Self {
            one: 7.0,
            two: 7.5,
            three: 8.0,
            decoy: 8.5,
        }
    }
}

/// Angle limits (degrees at the middle joint) separating curl classes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurlLimits {
    pub finger_no_curl_deg: f32,
    pub finger_half_curl_deg: f32,
    pub thumb_no_curl_deg: f32,
    pub thumb_half_curl_deg: f32,
}

impl Default for CurlLimits {
    fn default() -> Self {
        Self {
            finger_no_curl_deg: 130.0,
            finger_half_curl_deg: 60.0,
            thumb_no_curl_deg: 150.0,
            thumb_half_curl_deg: 110.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerCountConfig {
    /// Extra tip reach over knuckle reach, per finger (thumb → pinky)
    pub margins: [f32; 5],
    /// Index/middle tips must sit this far above their knuckle
    pub pointing_up_offset: f32,
    /// Minimum tip gap between two counted neighbouring fingers
    pub min_tip_gap: f32,
    /// Tips closer than this to the wrist count as curled
    pub max_curled_distance: f32,
    pub confidence: f32,
}

impl Default for FingerCountConfig {
    fn default() -> Self {
        Self {
            margins: [20.0, 40.0, 35.0, 25.0, 20.0],
            pointing_up_offset: 25.0,
            min_tip_gap: 30.0,
            max_curled_distance: 65.0,
            confidence: 6.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleIndexConfig {
    /// Index tip must be at least this far from the wrist
    pub min_extension: f32,
    /// Other tips must be closer than this to the wrist, when set
    pub max_other_extension: Option<f32>,
    /// Index tip must outreach every other tip by this much
    pub min_separation: f32,
    /// Index tip must sit this far above the index knuckle
    pub min_upward: f32,
    pub confidence: f32,
}

impl SingleIndexConfig {
    pub fn strict() -> Self {
        Self {
            min_extension: 100.0,
            max_other_extension: Some(70.0),
            min_separation: 40.0,
            min_upward: 30.0,
            confidence: 6.0,
        }
    }
}

impl Default for SingleIndexConfig {
    fn default() -> Self {
        Self {
            min_extension: 90.0,
            max_other_extension: None,
            min_separation: 35.0,
            min_upward: 25.0,
            confidence: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreeFingerConfig {
    pub min_extension: f32,
    pub max_pinky_extension: f32,
    /// Largest allowed reach difference between neighbouring fingers
    pub max_extension_spread: f32,
    pub min_upward: f32,
    pub confidence: f32,
}

impl Default for ThreeFingerConfig {
    fn default() -> Self {
        Self {
            min_extension: 80.0,
            max_pinky_extension: 80.0,
            max_extension_spread: 40.0,
            min_upward: 20.0,
            confidence: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBoxConfig {
    pub padding: f32,
    pub three_finger_padding: f32,
}

impl Default for BoundingBoxConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            three_finger_padding: 30.0,
        }
    }
}

// ============================================================================
// SEQUENCE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Continuous hold required per pose
    pub stability_hold_ms: f64,
    /// Minimum classifier confidence for a frame to count as the target pose
    pub confidence_threshold: f32,
    /// Length of one countdown number
    pub countdown_step_ms: f64,
    /// Countdown starts at this value and captures at 0
    pub countdown_steps: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            stability_hold_ms: 3000.0,
            confidence_threshold: 2.0,
            countdown_step_ms: 1000.0,
            countdown_steps: 3,
        }
    }
}

// ============================================================================
// FEEDBACK
// ============================================================================

/// UI feedback geometry: focus indicator clamp (percent of frame)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub frame_width: f32,
    pub frame_height: f32,
    pub focus_min_x: f32,
    pub focus_max_x: f32,
    pub focus_min_y: f32,
    pub focus_max_y: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            frame_width: 640.0,
            frame_height: 480.0,
            focus_min_x: 15.0,
            focus_max_x: 85.0,
            focus_min_y: 15.0,
            focus_max_y: 75.0,
        }
    }
}
