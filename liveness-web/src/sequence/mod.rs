//! Sequence module - 1-2-3 pose challenge, countdown and capture
//!
//! Re-exports only. All logic in submodules.

mod countdown;
mod latch;
mod machine;
mod step;

pub use countdown::{countdown_value, CountdownState};
pub use latch::{CaptureEvent, CaptureLatch};
pub use machine::{SequenceMachine, SequenceState, SequenceTick};
pub use step::SequenceStep;
