//! Classifier module - hand pose recognition for the liveness challenge
//!
//! Landmarks come from the host's ML model; Rust turns one hand skeleton
//! into a pose label with a confidence score.

mod bounding_box;
mod finger_state;
mod heuristics;
mod pose;
mod pose_classifier;
mod templates;

pub use bounding_box::{full_bounding_box, pose_bounding_box, BoundingBox};
pub use finger_state::{FingerCurl, FingerDirection, FingerState, HandShape};
pub use heuristics::{
    count_fingers, extended_fingers, single_index_extended, three_fingers_extended,
};
pub use pose::{PoseLabel, POSE_NAMES};
pub use pose_classifier::{LandmarkSource, MatchSource, PoseClassification, PoseClassifier};
pub use templates::{accept_best, builtin_templates, GestureTemplate, TemplateMatch, MAX_SCORE};
