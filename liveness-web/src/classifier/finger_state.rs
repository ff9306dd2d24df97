//! Per-finger curl and pointing direction
//!
//! Curl comes from the flexion angle at the finger's middle joint
//! (knuckle → PIP → tip; CMC → MCP → tip for the thumb). Direction is the
//! compass octant of the knuckle → tip vector on screen.

use serde::Serialize;

use crate::config::CurlLimits;
use crate::hand::{joint_angle, screen_angle, Finger, HandSkeleton};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FingerCurl {
    NoCurl,
    HalfCurl,
    FullCurl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FingerDirection {
    VerticalUp,
    VerticalDown,
    HorizontalLeft,
    HorizontalRight,
    DiagonalUpLeft,
    DiagonalUpRight,
    DiagonalDownLeft,
    DiagonalDownRight,
}

impl FingerDirection {
    /// Octant for a screen angle in degrees (90 = up)
    pub fn from_angle(deg: f32) -> Self {
        let a = deg;
        if (67.5..=112.5).contains(&a) {
            FingerDirection::VerticalUp
        } else if (22.5..67.5).contains(&a) {
            FingerDirection::DiagonalUpRight
        } else if a > 112.5 && a <= 157.5 {
            FingerDirection::DiagonalUpLeft
        } else if a.abs() < 22.5 {
            FingerDirection::HorizontalRight
        } else if a.abs() > 157.5 {
            FingerDirection::HorizontalLeft
        } else if a > -67.5 && a <= -22.5 {
            FingerDirection::DiagonalDownRight
        } else if a >= -157.5 && a < -112.5 {
            FingerDirection::DiagonalDownLeft
        } else {
            FingerDirection::VerticalDown
        }
    }
}

/// Curl and direction of a single finger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FingerState {
    pub curl: FingerCurl,
    pub direction: FingerDirection,
}

/// Estimated state of all five fingers, indexed thumb → pinky
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HandShape {
    fingers: [FingerState; 5],
}

impl HandShape {
    pub fn estimate(hand: &HandSkeleton, limits: &CurlLimits) -> Self {
        let fingers = Finger::ALL.map(|finger| FingerState {
            curl: estimate_curl(hand, finger, limits),
            direction: estimate_direction(hand, finger),
        });
        Self { fingers }
    }

    pub fn finger(&self, finger: Finger) -> FingerState {
        self.fingers[finger as usize]
    }

    pub fn curl(&self, finger: Finger) -> FingerCurl {
        self.finger(finger).curl
    }

    pub fn direction(&self, finger: Finger) -> FingerDirection {
        self.finger(finger).direction
    }
}

fn estimate_curl(hand: &HandSkeleton, finger: Finger, limits: &CurlLimits) -> FingerCurl {
    let [base, second, _, tip] = finger.joints();
    let angle = joint_angle(hand.point(base), hand.point(second), hand.point(tip));

    let (no_curl, half_curl) = match finger {
        Finger::Thumb => (limits.thumb_no_curl_deg, limits.thumb_half_curl_deg),
        _ => (limits.finger_no_curl_deg, limits.finger_half_curl_deg),
    };

    if angle > no_curl {
        FingerCurl::NoCurl
    } else if angle > half_curl {
        FingerCurl::HalfCurl
    } else {
        FingerCurl::FullCurl
    }
}

fn estimate_direction(hand: &HandSkeleton, finger: Finger) -> FingerDirection {
    let [base, _, _, tip] = finger.joints();
    match screen_angle(hand.point(base), hand.point(tip)) {
        Some(deg) => FingerDirection::from_angle(deg),
        // Tip collapsed onto the knuckle: treat as folded down
        None => FingerDirection::VerticalDown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fixtures;

    #[test]
    fn test_octants() {
        assert_eq!(FingerDirection::from_angle(90.0), FingerDirection::VerticalUp);
        assert_eq!(FingerDirection::from_angle(45.0), FingerDirection::DiagonalUpRight);
        assert_eq!(FingerDirection::from_angle(135.0), FingerDirection::DiagonalUpLeft);
        assert_eq!(FingerDirection::from_angle(0.0), FingerDirection::HorizontalRight);
        assert_eq!(FingerDirection::from_angle(180.0), FingerDirection::HorizontalLeft);
        assert_eq!(FingerDirection::from_angle(-45.0), FingerDirection::DiagonalDownRight);
        assert_eq!(FingerDirection::from_angle(-135.0), FingerDirection::DiagonalDownLeft);
        assert_eq!(FingerDirection::from_angle(-90.0), FingerDirection::VerticalDown);
    }

    #[test]
    fn test_peace_sign_shape() {
        let shape = HandShape::estimate(&fixtures::pose_two(), &CurlLimits::default());
        assert_eq!(shape.curl(Finger::Index), FingerCurl::NoCurl);
        assert_eq!(shape.curl(Finger::Middle), FingerCurl::NoCurl);
        assert_eq!(shape.curl(Finger::Ring), FingerCurl::FullCurl);
        assert_eq!(shape.curl(Finger::Pinky), FingerCurl::FullCurl);
        assert_eq!(shape.curl(Finger::Thumb), FingerCurl::FullCurl);
        assert_eq!(shape.direction(Finger::Index), FingerDirection::VerticalUp);
        assert_eq!(shape.direction(Finger::Ring), FingerDirection::VerticalDown);
    }

    #[test]
    fn test_extended_thumb() {
        let shape = HandShape::estimate(&fixtures::thumbs_up(), &CurlLimits::default());
        assert_eq!(shape.curl(Finger::Thumb), FingerCurl::NoCurl);
        assert_eq!(shape.direction(Finger::Thumb), FingerDirection::DiagonalUpLeft);
    }
}
