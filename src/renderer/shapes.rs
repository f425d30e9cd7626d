//! Scene generation for the 2D canvas
//!
//! Pure: builds draw commands from a snapshot, so what the player sees can be
//! checked against the collision geometry without a browser.

use glam::Vec2;

use super::palette::{Palette, TEDX_RED_DEEP};
use crate::consts::GROUND_HEIGHT;
use crate::game::FrameSnapshot;
use crate::sim::particles::EXPLOSION_LIFE;
use crate::sim::{PlayerBody, adjusted_rect};

/// Background watermark text
pub const WATERMARK: &str = "TEDxImScience  ";
const WATERMARK_SPACING: f32 = 1000.0;
const WATERMARK_SCROLL: f32 = 0.3;
const WATERMARK_ALPHA: f32 = 0.12;
const PARTICLE_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        pos: Vec2,
        size: Vec2,
        color: &'static str,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: &'static str,
        alpha: f32,
    },
    /// Text anchored at its horizontal center and bottom edge
    Glyph {
        text: String,
        pos: Vec2,
        size: f32,
        color: &'static str,
        shadow: Option<&'static str>,
    },
    /// Left-aligned, vertically centered text
    Watermark { pos: Vec2, size: f32, alpha: f32 },
    Dot {
        center: Vec2,
        radius: f32,
        color: &'static str,
        alpha: f32,
    },
}

/// The player mark: an X drawn as two strokes, red over a faint outline
fn player_cross(player: &PlayerBody) -> Vec<DrawCmd> {
    let center = player.center();
    let half = player.width.min(player.height) * 0.8 / 2.0;
    let strokes = [
        (center + Vec2::new(-half, -half), center + Vec2::new(half, half)),
        (center + Vec2::new(half, -half), center + Vec2::new(-half, half)),
    ];

    let mut cmds = Vec::with_capacity(4);
    for (from, to) in strokes {
        cmds.push(DrawCmd::Line {
            from,
            to,
            width: 10.0,
            color: "#000000",
            alpha: 0.3,
        });
    }
    for (from, to) in strokes {
        cmds.push(DrawCmd::Line {
            from,
            to,
            width: 8.0,
            color: TEDX_RED_DEEP,
            alpha: 1.0,
        });
    }
    cmds
}

/// Build the full frame, back to front
pub fn build_scene(snapshot: &FrameSnapshot<'_>) -> Vec<DrawCmd> {
    let palette = Palette::for_theme(snapshot.dark_mode);
    let field = snapshot.field;
    let ground = field.ground_level();

    let mut cmds = Vec::with_capacity(
        8 + snapshot.obstacles.len() + snapshot.particles.len(),
    );

    cmds.push(DrawCmd::Rect {
        pos: Vec2::ZERO,
        size: Vec2::new(field.width, field.height),
        color: palette.background,
    });

    let scroll = (snapshot.frame as f32 * WATERMARK_SCROLL) % WATERMARK_SPACING;
    let mut x = -500.0;
    while x < field.width + 500.0 {
        cmds.push(DrawCmd::Watermark {
            pos: Vec2::new(x + scroll, field.height / 2.0 - 50.0),
            size: 100.0,
            alpha: WATERMARK_ALPHA,
        });
        x += WATERMARK_SPACING;
    }

    cmds.push(DrawCmd::Rect {
        pos: Vec2::new(0.0, ground),
        size: Vec2::new(field.width, GROUND_HEIGHT),
        color: palette.ground,
    });
    cmds.push(DrawCmd::Line {
        from: Vec2::new(0.0, ground),
        to: Vec2::new(field.width, ground),
        width: 2.0,
        color: palette.ground_line,
        alpha: 1.0,
    });

    cmds.extend(player_cross(snapshot.player));

    // Same bob as the collision test
    for obstacle in snapshot.obstacles {
        let rect = adjusted_rect(obstacle, snapshot.frame);
        cmds.push(DrawCmd::Glyph {
            text: obstacle.glyph.to_string(),
            pos: Vec2::new(rect.x + rect.width / 2.0, rect.bottom()),
            size: rect.height,
            color: palette.glyph(obstacle.color),
            shadow: obstacle.is_flying().then_some(palette.glyph_shadow),
        });
    }

    for particle in snapshot.particles {
        cmds.push(DrawCmd::Dot {
            center: particle.pos,
            radius: PARTICLE_RADIUS,
            color: palette.particle(particle.color),
            alpha: (particle.life as f32 / EXPLOSION_LIFE as f32).min(1.0),
        });
    }

    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ProfileCache;
    use crate::sim::{ColorClass, Field, Obstacle, ObstacleKind, bob_offset};
    use crate::tuning::Tuning;
    use crate::Game;

    fn game_with_flyer() -> Game {
        let mut game = Game::new(
            3,
            Field::new(1280.0, 720.0),
            Tuning::default(),
            ProfileCache::default(),
        );
        game.start();
        let ground = game.state.field.ground_level();
        game.state.obstacles.push(Obstacle {
            pos: Vec2::new(600.0, ground - 65.0),
            width: 40.0,
            height: 35.0,
            kind: ObstacleKind::Flying,
            color: ColorClass::Contrast,
            glyph: 'x',
            passed: false,
        });
        game.state.difficulty.frame_count = 17;
        game
    }

    #[test]
    fn test_flying_glyph_uses_collision_bob() {
        let game = game_with_flyer();
        let cmds = build_scene(&game.snapshot(false));
        let glyph = cmds
            .iter()
            .find_map(|cmd| match cmd {
                DrawCmd::Glyph { pos, color, shadow, .. } => Some((*pos, *color, *shadow)),
                _ => None,
            })
            .unwrap();

        let ground = game.state.field.ground_level();
        let expected_bottom = ground - 65.0 + 35.0 + bob_offset(17, 600.0);
        assert!((glyph.0.y - expected_bottom).abs() < 1e-4);
        assert_eq!(glyph.0.x, 620.0);
        assert_eq!(glyph.1, "#000000");
        assert!(glyph.2.is_some());
    }

    #[test]
    fn test_dark_mode_background() {
        let game = game_with_flyer();
        let cmds = build_scene(&game.snapshot(true));
        assert_eq!(
            cmds.first(),
            Some(&DrawCmd::Rect {
                pos: Vec2::ZERO,
                size: Vec2::new(1280.0, 720.0),
                color: "#000000",
            })
        );
    }

    #[test]
    fn test_player_cross_is_centered() {
        let game = game_with_flyer();
        let cmds = player_cross(&game.state.player);
        assert_eq!(cmds.len(), 4);
        let center = game.state.player.center();
        if let DrawCmd::Line { from, to, .. } = &cmds[2] {
            assert!(((*from + *to) / 2.0 - center).length() < 1e-4);
        } else {
            panic!("expected a line");
        }
    }
}
