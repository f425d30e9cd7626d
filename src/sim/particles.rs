//! Cosmetic particle bursts (jump dust, crash explosion)

use glam::Vec2;
use rand::Rng;

use super::state::{ColorClass, Particle, PlayerBody};

const JUMP_PARTICLES: usize = 5;
const JUMP_LIFE: u32 = 30;
const EXPLOSION_PARTICLES: usize = 20;
const EXPLOSION_SPEED: f32 = 5.0;
/// Also the full-opacity life used by the renderer
pub const EXPLOSION_LIFE: u32 = 50;
const PARTICLE_GRAVITY: f32 = 0.3;

fn push_capped(particles: &mut Vec<Particle>, particle: Particle, cap: usize) {
    if particles.len() < cap {
        particles.push(particle);
    }
}

/// Dust kicked up from the player's feet
pub fn spawn_jump_particles<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    player: &PlayerBody,
    cap: usize,
    rng: &mut R,
) {
    for _ in 0..JUMP_PARTICLES {
        let particle = Particle {
            pos: Vec2::new(
                player.pos.x + rng.random::<f32>() * player.width,
                player.bottom(),
            ),
            vel: Vec2::new((rng.random::<f32>() - 0.5) * 4.0, rng.random::<f32>() * 2.0),
            life: JUMP_LIFE,
            color: ColorClass::Primary,
        };
        push_capped(particles, particle, cap);
    }
}

/// Radial burst around `center`
pub fn spawn_explosion<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    center: Vec2,
    cap: usize,
    rng: &mut R,
) {
    for i in 0..EXPLOSION_PARTICLES {
        let angle = std::f32::consts::TAU * i as f32 / EXPLOSION_PARTICLES as f32;
        let color = if rng.random_bool(0.5) {
            ColorClass::Primary
        } else {
            ColorClass::Contrast
        };
        let particle = Particle {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * EXPLOSION_SPEED,
            life: EXPLOSION_LIFE,
            color,
        };
        push_capped(particles, particle, cap);
    }
}

/// Integrate and age particles, dropping the expired ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life = particle.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}
