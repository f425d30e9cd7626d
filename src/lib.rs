//! TEDx Runner - A letter-dodging endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle generation, collisions)
//! - `game`: Owning controller, command queue and host notifications
//! - `security`: Play session tracking and tamper signals
//! - `validator`: Score plausibility checks
//! - `submit`: Score submission pipeline with offline fallback
//! - `persistence`: User records, document store and local cache
//! - `leaderboard`: Top score queries
//! - `platform`: Browser/native platform abstraction
//! - `renderer`: Draw-command scene and Canvas 2D backend
//! - `settings` / `tuning`: Preferences and data-driven game balance

pub mod game;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod security;
pub mod settings;
pub mod sim;
pub mod submit;
pub mod tuning;
pub mod validator;

pub use game::{Game, GameObserver, GameOverReport};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Frames per point of score
    pub const FRAMES_PER_POINT: u64 = 10;

    /// Height of the ground strip at the bottom of the field
    pub const GROUND_HEIGHT: f32 = 80.0;
    /// Player's fixed horizontal position
    pub const PLAYER_X: f32 = 80.0;

    /// Player base size (before device scaling)
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_DUCK_HEIGHT: f32 = 25.0;

    /// Obstacle base sizes (before device scaling)
    pub const GROUND_OBSTACLE_SIZE: (f32, f32) = (35.0, 50.0);
    pub const FLYING_OBSTACLE_SIZE: (f32, f32) = (40.0, 35.0);
    /// Flying obstacle top edge, measured up from ground level
    pub const FLYING_ALTITUDES: [f32; 2] = [65.0, 55.0];
    /// Horizontal offset of the twin in a double spawn
    pub const DOUBLE_SPAWN_OFFSET: f32 = 60.0;

    /// Player hitbox shrink on every side
    pub const COLLISION_MARGIN: f32 = 5.0;
    /// A ducking player clears a flying obstacle whose bottom is above top + this
    pub const DUCK_CLEARANCE: f32 = 10.0;

    /// Flying obstacle bob motion
    pub const BOB_AMPLITUDE: f32 = 5.0;
    pub const BOB_FRAME_RATE: f32 = 0.1;
    pub const BOB_X_RATE: f32 = 0.01;

    /// Hard ceiling for a submitted score
    pub const MAX_SCORE: u32 = 5000;
}

/// Score earned after `frame_count` ticks
#[inline]
pub fn score_for_frame(frame_count: u64) -> u32 {
    (frame_count / consts::FRAMES_PER_POINT) as u32
}

/// Zero-padded five digit score used by the HUD
pub fn format_score(score: u32) -> String {
    format!("{score:05}")
}
