//! Game state and core simulation types
//!
//! All mutable gameplay state lives in [`GameState`], owned by the caller.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::ObstacleSequenceCursor;
use crate::consts::*;
use crate::score_for_frame;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created but never started
    Idle,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended by a collision
    GameOver,
}

/// Layout tier derived from the viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Desktop,
    Tablet,
    Phone,
}

impl DeviceClass {
    pub fn from_viewport_width(width: f32) -> Self {
        if width <= 480.0 {
            DeviceClass::Phone
        } else if width <= 768.0 {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Size multiplier applied to player and obstacle geometry
    pub fn scale(&self) -> f32 {
        match self {
            DeviceClass::Desktop => 1.0,
            DeviceClass::Tablet => 0.85,
            DeviceClass::Phone => 0.7,
        }
    }
}

/// Visible playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(
            width > 0.0 && height > GROUND_HEIGHT,
            "field {width}x{height} has no room above the ground"
        );
        Self {
            width,
            height,
            scale: DeviceClass::from_viewport_width(width).scale(),
        }
    }

    /// Y coordinate of the ground surface (screen space, y grows downward)
    #[inline]
    pub fn ground_level(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Top-left corner
    pub pos: Vec2,
    pub vel_y: f32,
    pub width: f32,
    /// Current height, always `normal_height` or `duck_height`
    pub height: f32,
    pub normal_height: f32,
    pub duck_height: f32,
    pub is_jumping: bool,
    pub is_ducking: bool,
}

impl PlayerBody {
    /// Create a player standing on the ground of `field`
    pub fn new(field: &Field) -> Self {
        let mut player = Self {
            pos: Vec2::new(PLAYER_X, 0.0),
            vel_y: 0.0,
            width: PLAYER_WIDTH * field.scale,
            height: PLAYER_HEIGHT * field.scale,
            normal_height: PLAYER_HEIGHT * field.scale,
            duck_height: PLAYER_DUCK_HEIGHT * field.scale,
            is_jumping: false,
            is_ducking: false,
        };
        player.anchor_to_ground(field);
        player
    }

    /// Place the bottom edge on the ground
    pub fn anchor_to_ground(&mut self, field: &Field) {
        self.pos.y = field.ground_level() - self.height;
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Obstacle placement category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Sits on the ground, must be jumped
    Ground,
    /// Hovers at head height, must be ducked
    Flying,
}

/// Theme-independent color class, resolved by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorClass {
    /// Brand red
    Primary,
    /// Black on light theme, white on dark theme
    Contrast,
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner (before any bob offset)
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    pub color: ColorClass,
    pub glyph: char,
    /// Set once the obstacle is behind the player (not used for scoring)
    #[serde(default)]
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn is_flying(&self) -> bool {
        self.kind == ObstacleKind::Flying
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.width
    }

    /// Entirely past the left edge of the field
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.right_edge() < 0.0
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks
    pub life: u32,
    pub color: ColorClass,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Speed and spawn timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    pub speed: f32,
    pub frame_count: u64,
    pub last_spawn_frame: u64,
}

impl DifficultyState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.initial_speed,
            frame_count: 0,
            last_spawn_frame: 0,
        }
    }

    pub fn score(&self) -> u32 {
        score_for_frame(self.frame_count)
    }

    pub fn frames_since_spawn(&self) -> u64 {
        self.frame_count - self.last_spawn_frame
    }

    /// Accelerate, faster at higher scores, never past the cap
    pub fn ramp_speed(&mut self, tuning: &Tuning) {
        if self.speed < tuning.max_speed {
            let boost = 1.0 + self.score() as f32 / tuning.speed_boost_score;
            self.speed = (self.speed + tuning.speed_increment * boost).min(tuning.max_speed);
        }
    }
}

/// Notifications emitted by a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Current score, sent on every processed tick
    ScoreChanged(u32),
    /// The player hit an obstacle; the run is over
    Collision { score: u32 },
    Paused,
    Resumed,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub field: Field,
    pub phase: GamePhase,
    pub player: PlayerBody,
    /// Live obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub difficulty: DifficultyState,
    pub cursor: ObstacleSequenceCursor,
    /// Particle cap (from settings)
    pub max_particles: usize,
    pub(super) rng: Pcg32,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64, field: Field, tuning: Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "invalid tuning: {tuning:?}");
        Self {
            seed,
            difficulty: DifficultyState::new(&tuning),
            tuning,
            player: PlayerBody::new(&field),
            field,
            phase: GamePhase::Idle,
            obstacles: Vec::new(),
            particles: Vec::new(),
            cursor: ObstacleSequenceCursor::default(),
            max_particles: MAX_PARTICLES,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn score(&self) -> u32 {
        self.difficulty.score()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Reset all gameplay state and enter `Running`
    pub fn start(&mut self) {
        self.difficulty = DifficultyState::new(&self.tuning);
        self.obstacles.clear();
        self.particles.clear();
        self.cursor = ObstacleSequenceCursor::default();
        self.player = PlayerBody::new(&self.field);
        self.phase = GamePhase::Running;
        log::info!("Run started (seed {})", self.seed);
    }

    /// Running -> Paused. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            true
        } else {
            false
        }
    }

    /// Paused -> Running. Returns false if not paused.
    pub fn resume(&mut self) -> bool {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            true
        } else {
            false
        }
    }

    /// Running -> GameOver
    pub fn end_run(&mut self) {
        self.phase = GamePhase::GameOver;
        log::info!("Run over at score {}", self.score());
    }

    /// Recompute the field after a viewport change and rescale the player
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field = Field::new(width, height);
        let player = &mut self.player;
        let ducked = player.height == player.duck_height && player.is_ducking;
        player.width = PLAYER_WIDTH * self.field.scale;
        player.normal_height = PLAYER_HEIGHT * self.field.scale;
        player.duck_height = PLAYER_DUCK_HEIGHT * self.field.scale;
        player.height = if ducked {
            player.duck_height
        } else {
            player.normal_height
        };
        if !player.is_jumping {
            player.anchor_to_ground(&self.field);
        }
        log::debug!("Field resized to {width}x{height} (scale {})", self.field.scale);
    }
}
