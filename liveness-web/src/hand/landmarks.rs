//! Hand landmark model
//!
//! 21 keypoints per hand in the MediaPipe/handpose convention:
//! wrist, then thumb, index, middle, ring, pinky (each base → tip).
//! Coordinates are video pixels with y pointing down.

use serde::Serialize;

use crate::error::{LivenessError, Result};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of keypoints in one hand skeleton
pub const LANDMARK_COUNT: usize = 21;

// ============================================================================
// FINGERS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Joint indices ordered base → tip
    pub fn joints(&self) -> [usize; 4] {
        match self {
            Finger::Thumb => [THUMB_CMC, THUMB_MCP, THUMB_IP, THUMB_TIP],
            Finger::Index => [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
            Finger::Middle => [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
            Finger::Ring => [RING_MCP, RING_PIP, RING_DIP, RING_TIP],
            Finger::Pinky => [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
        }
    }

    pub fn tip(&self) -> usize {
        self.joints()[3]
    }

    /// Knuckle used as the "base" reach reference for extension checks
    pub fn mcp(&self) -> usize {
        self.joints()[0]
    }

    /// Joint used for the vertical pointing check.
    /// The thumb's CMC sits on the wrist, so its MCP is used instead.
    pub fn vertical_base(&self) -> usize {
        match self {
            Finger::Thumb => THUMB_MCP,
            other => other.mcp(),
        }
    }
}

/// Bone connections for overlays: wrist to each knuckle, along each
/// finger, then across the knuckle row
pub fn hand_connections() -> Vec<(usize, usize)> {
    let mut edges = Vec::with_capacity(23);
    for finger in Finger::ALL {
        let joints = finger.joints();
        edges.push((WRIST, joints[0]));
        edges.extend(joints.windows(2).map(|w| (w[0], w[1])));
    }
    let knuckles = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
    edges.extend(knuckles.windows(2).map(|w| (w[0], w[1])));
    edges
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single keypoint in video pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl HandLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One detected hand: exactly 21 validated keypoints
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HandSkeleton {
    landmarks: [HandLandmark; LANDMARK_COUNT],
}

impl HandSkeleton {
    pub fn new(landmarks: [HandLandmark; LANDMARK_COUNT]) -> Result<Self> {
        if let Some(i) = landmarks.iter().position(|p| !p.is_finite()) {
            return Err(LivenessError::MalformedSkeleton(format!(
                "landmark {} is not finite",
                i
            )));
        }
        Ok(Self { landmarks })
    }

    /// Build from `[x, y, z]` triples as returned by the landmark model
    pub fn from_points(points: &[[f32; 3]]) -> Result<Self> {
        if points.len() != LANDMARK_COUNT {
            return Err(LivenessError::MalformedSkeleton(format!(
                "expected {} landmarks, got {}",
                LANDMARK_COUNT,
                points.len()
            )));
        }
        let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
        for (slot, [x, y, z]) in landmarks.iter_mut().zip(points) {
            *slot = HandLandmark { x: *x, y: *y, z: *z };
        }
        Self::new(landmarks)
    }

    /// Build from a flat array of `x, y` (stride 2) or `x, y, z` (stride 3)
    pub fn from_flat(data: &[f32], stride: usize) -> Result<Self> {
        if stride != 2 && stride != 3 {
            return Err(LivenessError::MalformedSkeleton(format!(
                "unsupported stride {}",
                stride
            )));
        }
        if data.len() != LANDMARK_COUNT * stride {
            return Err(LivenessError::MalformedSkeleton(format!(
                "expected {} values, got {}",
                LANDMARK_COUNT * stride,
                data.len()
            )));
        }
        let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
        for (slot, chunk) in landmarks.iter_mut().zip(data.chunks_exact(stride)) {
            *slot = HandLandmark {
                x: chunk[0],
                y: chunk[1],
                z: if stride == 3 { chunk[2] } else { 0.0 },
            };
        }
        Self::new(landmarks)
    }

    /// Parse the first hand from a flat `num_hands × 21 × 3` buffer.
    /// Returns `Ok(None)` when no hand was reported. Only the first hand is
    /// read, so `num_hands` past one is not checked against the buffer.
    pub fn from_flat_hands(data: &[f32], num_hands: usize) -> Result<Option<Self>> {
        if num_hands == 0 {
            return Ok(None);
        }
        let per_hand = LANDMARK_COUNT * 3;
        let Some(first) = data.get(..per_hand) else {
            return Err(LivenessError::MalformedSkeleton(format!(
                "first hand needs {} values, got {}",
                per_hand,
                data.len()
            )));
        };
        Self::from_flat(first, 3).map(Some)
    }

    pub fn landmarks(&self) -> &[HandLandmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn point(&self, index: usize) -> HandLandmark {
        self.landmarks[index]
    }

    pub fn wrist(&self) -> HandLandmark {
        self.landmarks[WRIST]
    }

    pub fn tip(&self, finger: Finger) -> HandLandmark {
        self.landmarks[finger.tip()]
    }
}
