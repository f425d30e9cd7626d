//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, adjusted_rect, bob_offset, find_collision, overlaps_with_margin};
pub use spawn::{FLYING_TEMPLATES, GROUND_SEQUENCE, ObstacleSequenceCursor, ObstacleTemplate};
pub use state::{
    ColorClass, DeviceClass, DifficultyState, Field, GameEvent, GamePhase, GameState, MAX_PARTICLES,
    Obstacle, ObstacleKind, Particle, PlayerBody,
};
pub use tick::{Command, TickInput, autopilot_commands, tick};
