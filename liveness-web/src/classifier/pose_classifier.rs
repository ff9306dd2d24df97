//! Pose classifier - template matching with geometric fallbacks
//!
//! Pure per-frame classification. Order, first success wins:
//! 1. best gesture template above its pose threshold
//! 2. finger count heuristic
//! 3. single index finger check
//! 4. three finger check
//!
//! Nothing in here returns an error: malformed or missing landmarks are
//! reported as "no hand".

use log::debug;
use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::hand::{HandLandmark, HandSkeleton};

use super::bounding_box::{pose_bounding_box, BoundingBox};
use super::finger_state::HandShape;
use super::heuristics::{count_fingers, single_index_extended, three_fingers_extended};
use super::pose::PoseLabel;
use super::templates::{accept_best, builtin_templates, score_all, GestureTemplate};

/// External hand-landmark oracle (ML model running on the host)
pub trait LandmarkSource {
    type Frame: ?Sized;

    /// Detected hands for one frame; an empty vec when no hand is visible
    fn estimate_hands(&mut self, frame: &Self::Frame) -> Result<Vec<HandSkeleton>>;
}

/// Which stage produced the classification
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum MatchSource {
    Template(&'static str),
    FingerCount,
    IndexFinger,
    ThreeFinger,
    Unrecognized,
    NoHand,
}

/// Result of classifying one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoseClassification {
    pub detected: bool,
    pub pose: PoseLabel,
    pub confidence: f32,
    pub source: MatchSource,
    pub keypoints: Vec<HandLandmark>,
    pub bounding_box: Option<BoundingBox>,
}

impl PoseClassification {
    pub fn no_hand() -> Self {
        Self {
            detected: false,
            pose: PoseLabel::None,
            confidence: 0.0,
            source: MatchSource::NoHand,
            keypoints: Vec::new(),
            bounding_box: None,
        }
    }

    /// Human-readable name of the match, for overlays and logs
    pub fn pose_name(&self) -> String {
        match self.source {
            MatchSource::Template(name) => name.to_string(),
            MatchSource::FingerCount => format!("simple_{}_fingers", self.pose.index()),
            MatchSource::IndexFinger => "index_finger_extended".to_string(),
            MatchSource::ThreeFinger => "three_fingers_extended".to_string(),
            MatchSource::Unrecognized | MatchSource::NoHand => "none".to_string(),
        }
    }
}

pub struct PoseClassifier {
    templates: Vec<GestureTemplate>,
    config: ClassifierConfig,
}

impl PoseClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_templates(config, builtin_templates())
    }

    pub fn with_templates(config: ClassifierConfig, templates: Vec<GestureTemplate>) -> Self {
        Self { templates, config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify the first hand reported by `source` for `frame`
    pub fn detect<S: LandmarkSource>(
        &self,
        source: &mut S,
        frame: &S::Frame,
    ) -> PoseClassification {
        match source.estimate_hands(frame) {
            Ok(hands) => self.classify(hands.first()),
            Err(err) => {
                debug!("landmark source failed, treating as no hand: {}", err);
                PoseClassification::no_hand()
            }
        }
    }

    /// Classify raw `[x, y, z]` keypoints straight from the model
    pub fn classify_raw(&self, points: &[[f32; 3]]) -> PoseClassification {
        if points.is_empty() {
            return PoseClassification::no_hand();
        }
        match HandSkeleton::from_points(points) {
            Ok(hand) => self.classify(Some(&hand)),
            Err(err) => {
                debug!("dropping frame: {}", err);
                PoseClassification::no_hand()
            }
        }
    }

    pub fn classify(&self, hand: Option<&HandSkeleton>) -> PoseClassification {
        let Some(hand) = hand else {
            return PoseClassification::no_hand();
        };

        let (pose, confidence, source) = self.recognize(hand);
        debug!(
            "pose {} via {:?} (confidence {:.2})",
            pose.as_str(),
            source,
            confidence
        );

        PoseClassification {
            detected: true,
            pose,
            confidence,
            source,
            keypoints: hand.landmarks().to_vec(),
            bounding_box: pose_bounding_box(hand, pose, &self.config.bounding_box),
        }
    }

    fn recognize(&self, hand: &HandSkeleton) -> (PoseLabel, f32, MatchSource) {
        let cfg = &self.config;

        let shape = HandShape::estimate(hand, &cfg.curl_limits);
        let matches = score_all(&self.templates, &shape, &cfg.template_thresholds);
        if let Some(best) = accept_best(&matches) {
            if best.pose.is_recognized() {
                return (best.pose, best.score, MatchSource::Template(best.name));
            }
        }

        let counted = count_fingers(hand, &cfg.finger_count, &cfg.strict_index);
        if counted.is_recognized() {
            return (counted, cfg.finger_count.confidence, MatchSource::FingerCount);
        }

        if single_index_extended(hand, &cfg.index_check) {
            return (PoseLabel::One, cfg.index_check.confidence, MatchSource::IndexFinger);
        }

        if three_fingers_extended(hand, &cfg.three_finger) {
            return (PoseLabel::Three, cfg.three_finger.confidence, MatchSource::ThreeFinger);
        }

        (PoseLabel::None, 0.0, MatchSource::Unrecognized)
    }
}

impl Default for PoseClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LivenessError;
    use crate::hand::{fixtures, Finger};

    struct ScriptedSource {
        frames: Vec<Result<Vec<HandSkeleton>>>,
    }

    impl LandmarkSource for ScriptedSource {
        type Frame = ();

        fn estimate_hands(&mut self, _frame: &()) -> Result<Vec<HandSkeleton>> {
            self.frames.remove(0)
        }
    }

    #[test]
    fn test_template_poses() {
        let classifier = PoseClassifier::default();
        for (hand, pose) in [
            (fixtures::pose_one(), PoseLabel::One),
            (fixtures::pose_two(), PoseLabel::Two),
            (fixtures::pose_three(), PoseLabel::Three),
        ] {
            let result = classifier.classify(Some(&hand));
            assert!(result.detected);
            assert_eq!(result.pose, pose);
            assert!(matches!(result.source, MatchSource::Template(_)));
            assert!(result.confidence > 7.0);
            assert_eq!(result.keypoints.len(), 21);
            assert!(result.bounding_box.is_some());
        }
    }

    #[test]
    fn test_hand_without_pose() {
        let classifier = PoseClassifier::default();
        for hand in [fixtures::open_hand(), fixtures::fist(), fixtures::thumbs_up()] {
            let result = classifier.classify(Some(&hand));
            assert!(result.detected);
            assert_eq!(result.pose, PoseLabel::None);
            assert_eq!(result.source, MatchSource::Unrecognized);
            assert_eq!(result.pose_name(), "none");
        }
    }

    #[test]
    fn test_no_hand() {
        let classifier = PoseClassifier::default();
        let result = classifier.classify(None);
        assert!(!result.detected);
        assert_eq!(result.pose, PoseLabel::None);
        assert_eq!(result.confidence, 0.0);
        assert!(result.bounding_box.is_none());
    }

    #[test]
    fn test_malformed_points_are_no_hand() {
        let classifier = PoseClassifier::default();
        assert!(!classifier.classify_raw(&[[1.0, 2.0, 3.0]; 5]).detected);
        let mut points = [[100.0, 100.0, 0.0]; 21];
        points[3][1] = f32::INFINITY;
        assert!(!classifier.classify_raw(&points).detected);
        assert!(!classifier.classify_raw(&[]).detected);
    }

    #[test]
    fn test_fallback_when_templates_miss() {
        // No templates at all: the geometric chain must still see the poses
        let classifier = PoseClassifier::with_templates(ClassifierConfig::default(), Vec::new());

        let two = classifier.classify(Some(&fixtures::pose_two()));
        assert_eq!((two.pose, two.source), (PoseLabel::Two, MatchSource::FingerCount));
        assert_eq!(two.pose_name(), "simple_2_fingers");
        assert_eq!(two.confidence, 6.0);

        let one = classifier.classify(Some(&fixtures::pose_one()));
        assert_eq!((one.pose, one.source), (PoseLabel::One, MatchSource::IndexFinger));
        assert_eq!(one.confidence, 5.0);

        let three = classifier.classify(Some(&fixtures::pose_three()));
        assert_eq!((three.pose, three.source), (PoseLabel::Three, MatchSource::ThreeFinger));
    }

    #[test]
    fn test_source_errors_swallowed() {
        let classifier = PoseClassifier::default();
        let mut source = ScriptedSource {
            frames: vec![
                Err(LivenessError::MalformedSkeleton("truncated tensor".into())),
                Ok(Vec::new()),
                Ok(vec![fixtures::pose_two(), fixtures::hand(&[Finger::Index])]),
            ],
        };

        assert!(!classifier.detect(&mut source, &()).detected);
        assert!(!classifier.detect(&mut source, &()).detected);
        // Only the first hand is used
        assert_eq!(classifier.detect(&mut source, &()).pose, PoseLabel::Two);
    }
}
