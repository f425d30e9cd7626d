//! Rendering module
//!
//! [`shapes`] turns a [`FrameSnapshot`](crate::game::FrameSnapshot) into a
//! flat list of draw commands; the canvas backend (wasm only) replays them
//! on a 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod palette;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use palette::Palette;
pub use shapes::{DrawCmd, build_scene};
