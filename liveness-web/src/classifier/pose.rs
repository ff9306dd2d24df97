//! Pose labels for the 1-2-3 finger challenge

use serde::Serialize;

/// Pose label names (order matches `PoseLabel::index`)
pub const POSE_NAMES: [&str; 4] = ["none", "one_finger", "two_fingers", "three_fingers"];

/// Discrete hand pose recognized by the classifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum PoseLabel {
    #[default]
    None,
    One,
    Two,
    Three,
}

impl PoseLabel {
    /// The three challenge poses in sequence order
    pub const SEQUENCE: [PoseLabel; 3] = [PoseLabel::One, PoseLabel::Two, PoseLabel::Three];

    pub fn from_index(idx: u8) -> Self {
        match idx {
            1 => PoseLabel::One,
            2 => PoseLabel::Two,
            3 => PoseLabel::Three,
            _ => PoseLabel::None,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            PoseLabel::None => 0,
            PoseLabel::One => 1,
            PoseLabel::Two => 2,
            PoseLabel::Three => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        POSE_NAMES[self.index() as usize]
    }

    /// Next pose in the challenge, `None` after pose 3
    pub fn next(&self) -> Option<PoseLabel> {
        match self {
            PoseLabel::One => Some(PoseLabel::Two),
            PoseLabel::Two => Some(PoseLabel::Three),
            PoseLabel::Three | PoseLabel::None => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        *self != PoseLabel::None
    }
}

impl From<PoseLabel> for u8 {
    fn from(label: PoseLabel) -> u8 {
        label.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip_and_unknown() {
        for label in PoseLabel::SEQUENCE {
            assert_eq!(PoseLabel::from_index(label.index()), label);
        }
        assert_eq!(PoseLabel::from_index(7), PoseLabel::None);
    }

    #[test]
    fn test_next_stops_after_three() {
        assert_eq!(PoseLabel::One.next(), Some(PoseLabel::Two));
        assert_eq!(PoseLabel::Three.next(), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(PoseLabel::None.as_str(), "none");
        assert_eq!(PoseLabel::Three.as_str(), "three_fingers");
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&PoseLabel::Two).unwrap(), "2");
    }
}
