//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Input events (keyboard, touch)
//! - Fixed-step frame pacing

pub mod clock;
pub mod input;
pub mod time;

pub use clock::FrameClock;
pub use input::{KeyPhase, SwipeTracker, command_for_key};
pub use time::now_ms;
