//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::find_collision;
use super::particles::{spawn_explosion, spawn_jump_particles, update_particles};
use super::physics::{duck, jump, step_player};
use super::spawn::{spawn_due, spawn_obstacles};
use super::state::{GameEvent, GameState};
use crate::consts::COLLISION_MARGIN;

/// Discrete player/host command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Duck(bool),
    TogglePause,
    /// Pause if running; no-op otherwise
    Pause,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands in arrival order
    pub commands: Vec<Command>,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

impl TickInput {
    pub fn with(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            autopilot: false,
        }
    }
}

/// Apply one command. Jump and duck only act on a running game.
fn apply_command(state: &mut GameState, command: Command, events: &mut Vec<GameEvent>) {
    match command {
        Command::TogglePause => {
            if state.pause() {
                events.push(GameEvent::Paused);
            } else if state.resume() {
                events.push(GameEvent::Resumed);
            }
        }
        Command::Pause => {
            if state.pause() {
                events.push(GameEvent::Paused);
            }
        }
        Command::Jump => {
            if state.is_running() && jump(&mut state.player, &state.tuning) {
                spawn_jump_particles(
                    &mut state.particles,
                    &state.player,
                    state.max_particles,
                    &mut state.rng,
                );
            }
        }
        Command::Duck(engage) => {
            if state.is_running() {
                duck(&mut state.player, &state.field, engage);
            }
        }
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    for &command in &input.commands {
        apply_command(state, command, events);
    }

    // Don't tick unless running
    if !state.is_running() {
        return;
    }

    if input.autopilot {
        for command in autopilot_commands(state) {
            apply_command(state, command, events);
        }
    }

    state.difficulty.frame_count += 1;
    let score = state.score();
    state.difficulty.ramp_speed(&state.tuning);

    step_player(&mut state.player, &state.field, &state.tuning);

    if spawn_due(
        state.difficulty.frames_since_spawn(),
        score,
        &state.tuning,
        &mut state.rng,
    ) {
        spawn_obstacles(
            &mut state.obstacles,
            &mut state.cursor,
            &state.field,
            score,
            &state.tuning,
            &mut state.rng,
        );
        state.difficulty.last_spawn_frame = state.difficulty.frame_count;
    }

    // Scroll and cull
    let speed = state.difficulty.speed;
    let player_x = state.player.pos.x;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= speed;
        if obstacle.right_edge() < player_x {
            obstacle.passed = true;
        }
    }
    state.obstacles.retain(|o| !o.is_offscreen());

    update_particles(&mut state.particles);

    events.push(GameEvent::ScoreChanged(score));

    if let Some(index) = find_collision(
        &state.player,
        &state.obstacles,
        state.difficulty.frame_count,
    ) {
        log::info!(
            "Collision with '{}' at frame {}",
            state.obstacles[index].glyph,
            state.difficulty.frame_count
        );
        state.end_run();
        spawn_explosion(
            &mut state.particles,
            state.player.center(),
            state.max_particles,
            &mut state.rng,
        );
        events.push(GameEvent::Collision { score });
    }
}

/// Ticks of lead before a ground obstacle reaches the player's hitbox
const JUMP_LEAD_TICKS: f32 = 7.0;
/// Ticks of lead to start ducking under a flyer
const DUCK_LEAD_TICKS: f32 = 10.0;

/// Demo-mode decisions based on the nearest obstacle still ahead
pub fn autopilot_commands(state: &GameState) -> Vec<Command> {
    let player = &state.player;
    let speed = state.difficulty.speed;
    let front = player.pos.x + player.width - COLLISION_MARGIN;

    let next = state
        .obstacles
        .iter()
        .filter(|o| o.right_edge() > player.pos.x + COLLISION_MARGIN)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let mut commands = Vec::new();
    match next {
        Some(obstacle) if obstacle.is_flying() => {
            let distance = obstacle.pos.x - front;
            if distance <= speed * DUCK_LEAD_TICKS && !player.is_ducking {
                commands.push(Command::Duck(true));
            }
        }
        Some(obstacle) => {
            if player.is_ducking {
                commands.push(Command::Duck(false));
            }
            let distance = obstacle.pos.x - front;
            if distance > 0.0 && distance <= speed * JUMP_LEAD_TICKS && !player.is_jumping {
                commands.push(Command::Jump);
            }
        }
        None => {
            if player.is_ducking {
                commands.push(Command::Duck(false));
            }
        }
    }
    commands
}
