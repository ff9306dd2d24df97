//! Planar landmark geometry
//!
//! All checks run in the image plane; landmark depth is ignored.

use nalgebra::Vector2;

use super::landmarks::HandLandmark;

#[inline]
fn to_vec(p: HandLandmark) -> Vector2<f32> {
    Vector2::new(p.x, p.y)
}

/// Euclidean distance in the image plane
pub fn distance(a: HandLandmark, b: HandLandmark) -> f32 {
    (to_vec(a) - to_vec(b)).norm()
}

/// Angle at `joint` between `parent` and `child`, in degrees.
///
/// - 180° = straight joint
/// - small angles = tightly bent joint
pub fn joint_angle(parent: HandLandmark, joint: HandLandmark, child: HandLandmark) -> f32 {
    let v1 = to_vec(parent) - to_vec(joint);
    let v2 = to_vec(child) - to_vec(joint);

    let mag1 = v1.norm();
    let mag2 = v2.norm();

    // Degenerate case: collapsed segment
    if mag1 < 0.0001 || mag2 < 0.0001 {
        return 180.0;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Direction of `from → to` in degrees with y flipped so that 90° is "up"
/// on screen. Range (-180, 180].
pub fn screen_angle(from: HandLandmark, to: HandLandmark) -> Option<f32> {
    let dx = to.x - from.x;
    let dy_up = from.y - to.y;
    if dx.abs() < 0.0001 && dy_up.abs() < 0.0001 {
        return None;
    }
    Some(dy_up.atan2(dx).to_degrees())
}
