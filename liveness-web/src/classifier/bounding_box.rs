//! Highlight box around the fingers being evaluated

use serde::Serialize;

use crate::config::BoundingBoxConfig;
use crate::hand::*;

use super::pose::PoseLabel;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Padded box around `points`; `None` if empty or non-finite
    fn around<I>(points: I, padding: f32) -> Option<Self>
    where
        I: IntoIterator<Item = HandLandmark>,
    {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut any = false;

        for p in points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return None;
            }
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            any = true;
        }

        if !any {
            return None;
        }

        Some(Self {
            x: (min_x - padding).max(0.0),
            y: (min_y - padding).max(0.0),
            width: max_x - min_x + padding * 2.0,
            height: max_y - min_y + padding * 2.0,
        })
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Landmarks that frame each recognized pose: wrist, thumb and the pose's
/// fingers. Poses 1 and 2 keep the pinky as the folded-finger reference.
fn pose_landmarks(pose: PoseLabel) -> Option<Vec<usize>> {
    let fingers: &[Finger] = match pose {
        PoseLabel::One => &[Finger::Index, Finger::Pinky],
        PoseLabel::Two => &[Finger::Index, Finger::Middle, Finger::Pinky],
        PoseLabel::Three => &[Finger::Index, Finger::Middle, Finger::Ring],
        PoseLabel::None => return None,
    };

    let mut indices = vec![WRIST];
    for finger in fingers {
        indices.extend(finger.joints());
    }
    indices.extend(Finger::Thumb.joints());
    Some(indices)
}

/// Box around the whole hand
pub fn full_bounding_box(hand: &HandSkeleton, cfg: &BoundingBoxConfig) -> Option<BoundingBox> {
    BoundingBox::around(hand.landmarks().iter().copied(), cfg.padding)
}

/// Box around the landmarks relevant to `pose`, falling back to the full
/// hand when the pose has no subset or the subset cannot be boxed.
pub fn pose_bounding_box(
    hand: &HandSkeleton,
    pose: PoseLabel,
    cfg: &BoundingBoxConfig,
) -> Option<BoundingBox> {
    let padding = if pose == PoseLabel::Three {
        cfg.three_finger_padding
    } else {
        cfg.padding
    };

    pose_landmarks(pose)
        .and_then(|indices| {
            BoundingBox::around(indices.into_iter().map(|i| hand.point(i)), padding)
        })
        .or_else(|| full_bounding_box(hand, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fixtures;

    #[test]
    fn test_pose_three_excludes_pinky_with_wider_padding() {
        let cfg = BoundingBoxConfig::default();
        let hand = fixtures::pose_three();
        let bbox = pose_bounding_box(&hand, PoseLabel::Three, &cfg).unwrap();

        // Folded thumb MCP at x = 255 is the left edge, ring at x = 345 the right
        assert_eq!(bbox.x, 255.0 - 30.0);
        assert_eq!(bbox.width, 345.0 - 255.0 + 60.0);
        // Index tip y = 210 on top, wrist y = 400 at the bottom
        assert_eq!(bbox.y, 210.0 - 30.0);
        assert_eq!(bbox.height, 400.0 - 210.0 + 60.0);
    }

    #[test]
    fn test_pose_one_keeps_pinky() {
        let cfg = BoundingBoxConfig::default();
        let bbox = pose_bounding_box(&fixtures::pose_one(), PoseLabel::One, &cfg).unwrap();
        // Pinky knuckle at x = 380 is the right edge
        assert_eq!(bbox.x + bbox.width, 380.0 + 20.0);
    }

    #[test]
    fn test_unrecognized_uses_full_hand() {
        let cfg = BoundingBoxConfig::default();
        let hand = fixtures::open_hand();
        assert_eq!(
            pose_bounding_box(&hand, PoseLabel::None, &cfg),
            full_bounding_box(&hand, &cfg)
        );
    }

    #[test]
    fn test_origin_clamped_at_zero() {
        let cfg = BoundingBoxConfig::default();
        let hand = fixtures::with_point(&fixtures::fist(), THUMB_TIP, 5.0, 4.0);
        let bbox = full_bounding_box(&hand, &cfg).unwrap();
        assert_eq!((bbox.x, bbox.y), (0.0, 0.0));
    }
}
