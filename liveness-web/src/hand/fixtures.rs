//! Synthetic pixel-space hands for tests
//!
//! Palm facing the camera, wrist at the bottom of a 640×480 frame.
//! Extended fingers point straight up; curled fingers fold back toward
//! the wrist.

use super::landmarks::*;

const WRIST_POS: (f32, f32) = (320.0, 400.0);
const MCP_Y: f32 = 300.0;

/// Knuckle x position per finger (index, middle, ring, pinky)
const KNUCKLE_X: [f32; 4] = [275.0, 310.0, 345.0, 380.0];

fn set(points: &mut [HandLandmark; LANDMARK_COUNT], index: usize, x: f32, y: f32) {
    points[index] = HandLandmark::new(x, y);
}

fn place_finger(points: &mut [HandLandmark; LANDMARK_COUNT], finger: Finger, extended: bool) {
    let slot = match finger {
        Finger::Index => 0,
        Finger::Middle => 1,
        Finger::Ring => 2,
        Finger::Pinky => 3,
        Finger::Thumb => return place_thumb(points, extended),
    };
    let x = KNUCKLE_X[slot];
    let [mcp, pip, dip, tip] = finger.joints();
    set(points, mcp, x, MCP_Y);
    if extended {
        set(points, pip, x, 260.0);
        set(points, dip, x, 235.0);
        set(points, tip, x, 210.0);
    } else {
        set(points, pip, x, 275.0);
        set(points, dip, x - 3.0, 300.0);
        set(points, tip, x - 5.0, 345.0);
    }
}

fn place_thumb(points: &mut [HandLandmark; LANDMARK_COUNT], extended: bool) {
    set(points, THUMB_CMC, 270.0, 385.0);
    if extended {
        set(points, THUMB_MCP, 245.0, 355.0);
        set(points, THUMB_IP, 230.0, 330.0);
        set(points, THUMB_TIP, 218.0, 305.0);
    } else {
        set(points, THUMB_MCP, 255.0, 360.0);
        set(points, THUMB_IP, 275.0, 345.0);
        set(points, THUMB_TIP, 295.0, 350.0);
    }
}

/// Hand with the given fingers extended and the rest curled
pub fn hand(extended: &[Finger]) -> HandSkeleton {
    let mut points = [HandLandmark::default(); LANDMARK_COUNT];
    set(&mut points, WRIST, WRIST_POS.0, WRIST_POS.1);
    for finger in Finger::ALL {
        place_finger(&mut points, finger, extended.contains(&finger));
    }
    HandSkeleton::new(points).expect("fixture landmarks are finite")
}

pub fn pose_one() -> HandSkeleton {
    hand(&[Finger::Index])
}

pub fn pose_two() -> HandSkeleton {
    hand(&[Finger::Index, Finger::Middle])
}

pub fn pose_three() -> HandSkeleton {
    hand(&[Finger::Index, Finger::Middle, Finger::Ring])
}

pub fn open_hand() -> HandSkeleton {
    hand(&Finger::ALL)
}

pub fn fist() -> HandSkeleton {
    hand(&[])
}

pub fn thumbs_up() -> HandSkeleton {
    hand(&[Finger::Thumb])
}

/// Copy of `base` with one landmark moved
pub fn with_point(base: &HandSkeleton, index: usize, x: f32, y: f32) -> HandSkeleton {
    let mut points = *base.landmarks();
    points[index] = HandLandmark::new(x, y);
    HandSkeleton::new(points).expect("fixture landmarks are finite")
}
