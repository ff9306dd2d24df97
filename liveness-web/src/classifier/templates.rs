//! Gesture templates - weighted curl/direction constraints per finger
//!
//! A template lists, for some fingers, the curls and directions it accepts
//! together with a weight. Each constrained finger contributes one
//! parameter for curl and one for direction; the score is the matched
//! weight averaged over those parameters and scaled to 0-10.

use serde::Serialize;

use super::finger_state::{FingerCurl, FingerDirection, HandShape};
use super::pose::PoseLabel;
use crate::config::TemplateThresholds;
use crate::hand::Finger;

use FingerCurl::*;
use FingerDirection::*;

/// Maximum template score
pub const MAX_SCORE: f32 = 10.0;

#[derive(Clone, Debug)]
pub struct GestureTemplate {
    name: &'static str,
    pose: PoseLabel,
    curls: Vec<(Finger, Vec<(FingerCurl, f32)>)>,
    directions: Vec<(Finger, Vec<(FingerDirection, f32)>)>,
}

impl GestureTemplate {
    pub fn new(name: &'static str, pose: PoseLabel) -> Self {
        Self {
            name,
            pose,
            curls: Vec::new(),
            directions: Vec::new(),
        }
    }

    /// Accept `curl` for `finger` with `weight` (0-1)
    pub fn curl(mut self, finger: Finger, curl: FingerCurl, weight: f32) -> Self {
        match self.curls.iter_mut().find(|(f, _)| *f == finger) {
            Some((_, options)) => options.push((curl, weight)),
            None => self.curls.push((finger, vec![(curl, weight)])),
        }
        self
    }

    /// Accept `direction` for `finger` with `weight` (0-1)
    pub fn direction(mut self, finger: Finger, direction: FingerDirection, weight: f32) -> Self {
        match self.directions.iter_mut().find(|(f, _)| *f == finger) {
            Some((_, options)) => options.push((direction, weight)),
            None => self.directions.push((finger, vec![(direction, weight)])),
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pose(&self) -> PoseLabel {
        self.pose
    }

    /// Match score 0-10 against an estimated hand shape
    pub fn score(&self, shape: &HandShape) -> f32 {
        let mut total = 0.0f32;
        let mut parameters = 0usize;

        for (finger, options) in &self.curls {
            parameters += 1;
            let detected = shape.curl(*finger);
            if let Some((_, weight)) = options.iter().find(|(c, _)| *c == detected) {
                total += *weight;
            }
        }
        for (finger, options) in &self.directions {
            parameters += 1;
            let detected = shape.direction(*finger);
            if let Some((_, weight)) = options.iter().find(|(d, _)| *d == detected) {
                total += *weight;
            }
        }

        if parameters == 0 {
            return 0.0;
        }
        total / parameters as f32 * MAX_SCORE
    }

    /// Score this template must exceed to be accepted
    pub fn threshold(&self, thresholds: &TemplateThresholds) -> f32 {
        match self.pose {
            PoseLabel::One => thresholds.one,
            PoseLabel::Two => thresholds.two,
            PoseLabel::Three => thresholds.three,
            PoseLabel::None => thresholds.decoy,
        }
    }
}

/// Score of one template against one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TemplateMatch {
    pub name: &'static str,
    pub pose: PoseLabel,
    pub score: f32,
    pub threshold: f32,
}

/// Take the single best-scoring template and accept it only if it clears
/// its own pose threshold. A rejected best match is not replaced by the
/// runner-up.
pub fn accept_best(matches: &[TemplateMatch]) -> Option<TemplateMatch> {
    let best = matches
        .iter()
        .copied()
        .reduce(|best, m| if m.score > best.score { m } else { best })?;
    (best.score > best.threshold).then_some(best)
}

pub fn score_all(
    templates: &[GestureTemplate],
    shape: &HandShape,
    thresholds: &TemplateThresholds,
) -> Vec<TemplateMatch> {
    templates
        .iter()
        .map(|t| TemplateMatch {
            name: t.name(),
            pose: t.pose(),
            score: t.score(shape),
            threshold: t.threshold(thresholds),
        })
        .collect()
}

// ============================================================================
// BUILT-IN TEMPLATES
// ============================================================================

/// Pose 1: index up, other fingers folded, thumb tucked
pub fn one_finger() -> GestureTemplate {
    let mut t = GestureTemplate::new("one_finger", PoseLabel::One)
        .curl(Finger::Index, NoCurl, 0.9)
        .curl(Finger::Index, HalfCurl, 0.3)
        .direction(Finger::Index, VerticalUp, 0.8)
        .direction(Finger::Index, DiagonalUpLeft, 0.6)
        .direction(Finger::Index, DiagonalUpRight, 0.6)
        .direction(Finger::Index, HorizontalLeft, 0.3)
        .direction(Finger::Index, HorizontalRight, 0.3);

    for finger in [Finger::Middle, Finger::Ring, Finger::Pinky] {
        t = t
            .curl(finger, FullCurl, 1.0)
            .curl(finger, HalfCurl, 0.3)
            .curl(finger, NoCurl, 0.0);
    }

    t.curl(Finger::Thumb, FullCurl, 0.8)
        .curl(Finger::Thumb, HalfCurl, 0.5)
        .curl(Finger::Thumb, NoCurl, 0.1)
}

/// Pose 2: index and middle up (peace sign), thumb free
pub fn two_fingers() -> GestureTemplate {
    let mut t = GestureTemplate::new("two_fingers", PoseLabel::Two)
        .curl(Finger::Index, NoCurl, 1.0)
        .curl(Finger::Middle, NoCurl, 1.0);

    for finger in [Finger::Index, Finger::Middle] {
        t = t
            .direction(finger, VerticalUp, 0.8)
            .direction(finger, DiagonalUpLeft, 0.5)
            .direction(finger, DiagonalUpRight, 0.5);
    }
    for finger in [Finger::Ring, Finger::Pinky] {
        t = t.curl(finger, FullCurl, 0.8).curl(finger, HalfCurl, 0.8);
    }

    t.curl(Finger::Thumb, NoCurl, 0.5)
        .curl(Finger::Thumb, HalfCurl, 0.5)
        .curl(Finger::Thumb, FullCurl, 0.5)
}

/// Pose 3: index, middle and ring up, pinky folded
pub fn three_fingers() -> GestureTemplate {
    let mut t = GestureTemplate::new("three_fingers", PoseLabel::Three);

    for finger in [Finger::Index, Finger::Middle, Finger::Ring] {
        t = t
            .curl(finger, NoCurl, 1.0)
            .direction(finger, VerticalUp, 0.8)
            .direction(finger, DiagonalUpLeft, 0.5)
            .direction(finger, DiagonalUpRight, 0.5)
            .direction(finger, HorizontalLeft, 0.3)
            .direction(finger, HorizontalRight, 0.3);
    }

    t.curl(Finger::Pinky, FullCurl, 0.8)
        .curl(Finger::Pinky, HalfCurl, 0.8)
        .curl(Finger::Pinky, NoCurl, 0.2)
        .curl(Finger::Thumb, FullCurl, 0.8)
        .curl(Finger::Thumb, HalfCurl, 0.5)
        .curl(Finger::Thumb, NoCurl, 0.1)
}

/// Generic victory sign, accepted as an alternate pose 2
pub fn victory() -> GestureTemplate {
    GestureTemplate::new("victory", PoseLabel::Two)
        .curl(Finger::Thumb, HalfCurl, 0.5)
        .curl(Finger::Thumb, NoCurl, 0.5)
        .direction(Finger::Thumb, VerticalUp, 1.0)
        .direction(Finger::Thumb, DiagonalUpLeft, 1.0)
        .direction(Finger::Thumb, DiagonalUpRight, 1.0)
        .curl(Finger::Index, NoCurl, 1.0)
        .direction(Finger::Index, VerticalUp, 0.75)
        .direction(Finger::Index, DiagonalUpLeft, 1.0)
        .direction(Finger::Index, DiagonalUpRight, 1.0)
        .curl(Finger::Middle, NoCurl, 1.0)
        .direction(Finger::Middle, VerticalUp, 1.0)
        .direction(Finger::Middle, DiagonalUpLeft, 0.75)
        .direction(Finger::Middle, DiagonalUpRight, 0.75)
        .curl(Finger::Ring, FullCurl, 1.0)
        .curl(Finger::Pinky, FullCurl, 1.0)
}

/// Thumbs up. Maps to no pose; it competes for the best match so a
/// raised thumb is not read as a finger count.
pub fn thumbs_up() -> GestureTemplate {
    let mut t = GestureTemplate::new("thumbs_up", PoseLabel::None)
        .curl(Finger::Thumb, NoCurl, 1.0)
        .direction(Finger::Thumb, VerticalUp, 1.0)
        .direction(Finger::Thumb, DiagonalUpLeft, 0.9)
        .direction(Finger::Thumb, DiagonalUpRight, 0.9);

    for finger in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky] {
        t = t.curl(finger, FullCurl, 1.0).curl(finger, HalfCurl, 0.9);
    }
    t
}

pub fn builtin_templates() -> Vec<GestureTemplate> {
    vec![one_finger(), two_fingers(), three_fingers(), victory(), thumbs_up()]
}
