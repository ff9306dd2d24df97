//! Hand module - landmark model and planar geometry
//!
//! Re-exports only. All logic in submodules.

mod geometry;
mod landmarks;

#[cfg(test)]
pub(crate) mod fixtures;

pub use geometry::{distance, joint_angle, screen_angle};
pub use landmarks::*;
