//! Frame timing.
//!
//! One `FrameClock` lives on the render thread and is ticked once per
//! presented frame; its snapshots feed the frame observers in `frontend`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
