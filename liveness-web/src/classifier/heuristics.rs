//! Geometric fallbacks for frames no template accepted
//!
//! Pure distance rules over wrist-relative reach:
//! - finger counting (one finger, or two adjacent fingers)
//! - single index finger check
//! - three finger check
//!
//! Image y grows downward, so "pointing up" means the tip's y is smaller
//! than its knuckle's.

use crate::config::{FingerCountConfig, SingleIndexConfig, ThreeFingerConfig};
use crate::hand::{distance, Finger, HandSkeleton};

use super::pose::PoseLabel;

/// Distance from the wrist to a fingertip
fn reach(hand: &HandSkeleton, finger: Finger) -> f32 {
    distance(hand.tip(finger), hand.wrist())
}

/// How far the tip sits above `base` (positive = up)
fn rise(hand: &HandSkeleton, finger: Finger, base: usize) -> f32 {
    hand.point(base).y - hand.tip(finger).y
}

/// Finger count heuristic.
///
/// A finger is extended when its tip reaches farther from the wrist than
/// its knuckle by a per-finger margin; index and middle must also point
/// up. The thumb is evaluated but never counted toward the pose.
pub fn count_fingers(
    hand: &HandSkeleton,
    cfg: &FingerCountConfig,
    strict_index: &SingleIndexConfig,
) -> PoseLabel {
    if single_index_extended(hand, strict_index) {
        return PoseLabel::One;
    }

    let extended = extended_fingers(hand, cfg);
    let counted: Vec<Finger> = extended
        .iter()
        .copied()
        .filter(|f| *f != Finger::Thumb)
        .collect();

    match counted.as_slice() {
        [Finger::Index] if others_curled(hand, &[Finger::Index], cfg.max_curled_distance) => {
            PoseLabel::One
        }
        [a, b] if adjacent_and_apart(hand, *a, *b, cfg.min_tip_gap) => PoseLabel::Two,
        _ => PoseLabel::None,
    }
}

/// Neighbouring fingers whose tips are more than `min_gap` apart
fn adjacent_and_apart(hand: &HandSkeleton, a: Finger, b: Finger, min_gap: f32) -> bool {
    (b as usize) == (a as usize) + 1 && distance(hand.tip(a), hand.tip(b)) > min_gap
}

/// Fingers passing the reach test, in thumb → pinky order
pub fn extended_fingers(hand: &HandSkeleton, cfg: &FingerCountConfig) -> Vec<Finger> {
    let wrist = hand.wrist();
    let mut extended = Vec::with_capacity(5);

    for (i, finger) in Finger::ALL.into_iter().enumerate() {
        let tip_distance = reach(hand, finger);
        let mcp_distance = distance(hand.point(finger.mcp()), wrist);
        let mut is_extended = tip_distance > mcp_distance + cfg.margins[i];

        if matches!(finger, Finger::Index | Finger::Middle) {
            is_extended &= rise(hand, finger, finger.vertical_base()) > cfg.pointing_up_offset;
        }

        // One wide finger can read as index + middle; require a real gap
        if finger == Finger::Middle && extended.contains(&Finger::Index) {
            let gap = distance(hand.tip(Finger::Middle), hand.tip(Finger::Index));
            is_extended &= gap > cfg.min_tip_gap;
        }

        if is_extended {
            extended.push(finger);
        }
    }

    extended
}

/// Every finger outside `extended` has its tip near the wrist
pub fn others_curled(hand: &HandSkeleton, extended: &[Finger], max_curled_distance: f32) -> bool {
    Finger::ALL
        .into_iter()
        .filter(|f| !extended.contains(f))
        .all(|f| reach(hand, f) <= max_curled_distance)
}

/// Index clearly outreaching middle, ring and pinky while pointing up
pub fn single_index_extended(hand: &HandSkeleton, cfg: &SingleIndexConfig) -> bool {
    let index = reach(hand, Finger::Index);
    let others = [Finger::Middle, Finger::Ring, Finger::Pinky].map(|f| reach(hand, f));

    let is_extended = index > cfg.min_extension;
    let others_close = cfg
        .max_other_extension
        .map_or(true, |max| others.iter().all(|d| *d < max));
    let separated = others.iter().all(|d| index > d + cfg.min_separation);
    let pointing_up = rise(hand, Finger::Index, Finger::Index.mcp()) > cfg.min_upward;

    is_extended && others_close && separated && pointing_up
}

/// Index, middle and ring raised together with the pinky folded
pub fn three_fingers_extended(hand: &HandSkeleton, cfg: &ThreeFingerConfig) -> bool {
    let raised = [Finger::Index, Finger::Middle, Finger::Ring];
    let [index, middle, ring] = raised.map(|f| reach(hand, f));
    let pinky = reach(hand, Finger::Pinky);

    let all_extended = [index, middle, ring].iter().all(|d| *d > cfg.min_extension);
    let pinky_curled = pinky < cfg.max_pinky_extension;
    let together = (index - middle).abs() < cfg.max_extension_spread
        && (middle - ring).abs() < cfg.max_extension_spread;
    let pointing_up = raised
        .iter()
        .all(|f| rise(hand, *f, f.mcp()) > cfg.min_upward);

    all_extended && pinky_curled && together && pointing_up
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{fixtures, PINKY_TIP};

    fn count(hand: &HandSkeleton) -> PoseLabel {
        count_fingers(hand, &FingerCountConfig::default(), &SingleIndexConfig::strict())
    }

    #[test]
    fn test_count_peace_sign() {
        assert_eq!(
            extended_fingers(&fixtures::pose_two(), &FingerCountConfig::default()),
            vec![Finger::Index, Finger::Middle]
        );
        assert_eq!(count(&fixtures::pose_two()), PoseLabel::Two);
    }

    #[test]
    fn test_count_tight_single_index() {
        let hand = fixtures::with_point(&fixtures::pose_one(), PINKY_TIP, 360.0, 345.0);
        assert_eq!(count(&hand), PoseLabel::One);
    }

    #[test]
    fn test_count_rejects_open_hand_and_fist() {
        assert_eq!(count(&fixtures::open_hand()), PoseLabel::None);
        assert_eq!(count(&fixtures::fist()), PoseLabel::None);
    }

    #[test]
    fn test_count_rejects_merged_index_middle() {
        // Middle tip pressed against the index tip
        let hand =
            fixtures::with_point(&fixtures::pose_two(), crate::hand::MIDDLE_TIP, 285.0, 212.0);
        assert_ne!(count(&hand), PoseLabel::Two);
    }

    #[test]
    fn test_count_rejects_sideways_index() {
        // Index pointing out to the left instead of up
        let hand =
            fixtures::with_point(&fixtures::pose_one(), crate::hand::INDEX_TIP, 140.0, 300.0);
        assert!(!extended_fingers(&hand, &FingerCountConfig::default()).contains(&Finger::Index));
    }

    #[test]
    fn test_count_ring_and_pinky_pair() {
        let hand = fixtures::hand(&[Finger::Ring, Finger::Pinky]);
        assert_eq!(count(&hand), PoseLabel::Two);

        // Pinky tip pressed against the ring tip
        let merged = fixtures::with_point(&hand, PINKY_TIP, 350.0, 212.0);
        assert_eq!(
            extended_fingers(&merged, &FingerCountConfig::default()),
            vec![Finger::Ring, Finger::Pinky]
        );
        assert_eq!(count(&merged), PoseLabel::None);
    }

    #[test]
    fn test_count_rejects_non_adjacent_pair() {
        assert_eq!(count(&fixtures::hand(&[Finger::Index, Finger::Ring])), PoseLabel::None);
    }

    #[test]
    fn test_index_check() {
        let cfg = SingleIndexConfig::default();
        assert!(single_index_extended(&fixtures::pose_one(), &cfg));
        assert!(!single_index_extended(&fixtures::pose_two(), &cfg));
        assert!(!single_index_extended(&fixtures::fist(), &cfg));
    }

    #[test]
    fn test_three_finger_check() {
        let cfg = ThreeFingerConfig::default();
        assert!(three_fingers_extended(&fixtures::pose_three(), &cfg));
        assert!(!three_fingers_extended(&fixtures::pose_two(), &cfg));
        assert!(!three_fingers_extended(&fixtures::open_hand(), &cfg));
    }
}
