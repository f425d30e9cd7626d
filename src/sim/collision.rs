//! Forgiving axis-aligned collision between the player and obstacles

use super::state::{Obstacle, PlayerBody};
use crate::consts::*;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn of_player(player: &PlayerBody) -> Self {
        Self::new(player.pos.x, player.pos.y, player.width, player.height)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Overlap test with `a` shrunk by `margin` on every side
pub fn overlaps_with_margin(a: &Rect, b: &Rect, margin: f32) -> bool {
    a.x + margin < b.x + b.width
        && a.x + a.width - margin > b.x
        && a.y + margin < b.y + b.height
        && a.y + a.height - margin > b.y
}

/// Vertical bob of a flying obstacle. The renderer draws with the same offset.
#[inline]
pub fn bob_offset(frame_count: u64, x: f32) -> f32 {
    (frame_count as f32 * BOB_FRAME_RATE + x * BOB_X_RATE).sin() * BOB_AMPLITUDE
}

/// Obstacle box as it appears this frame
pub fn adjusted_rect(obstacle: &Obstacle, frame_count: u64) -> Rect {
    let y = if obstacle.is_flying() {
        obstacle.pos.y + bob_offset(frame_count, obstacle.pos.x)
    } else {
        obstacle.pos.y
    };
    Rect::new(obstacle.pos.x, y, obstacle.width, obstacle.height)
}

/// A ducking player slips under a flying obstacle that is high enough
pub fn duck_clears(player: &PlayerBody, obstacle: &Obstacle, obstacle_bottom: f32) -> bool {
    player.is_ducking && obstacle.is_flying() && obstacle_bottom < player.top() + DUCK_CLEARANCE
}

/// Does this obstacle end the run?
pub fn player_hits(player: &PlayerBody, obstacle: &Obstacle, frame_count: u64) -> bool {
    let rect = adjusted_rect(obstacle, frame_count);
    if duck_clears(player, obstacle, rect.bottom()) {
        return false;
    }
    overlaps_with_margin(&Rect::of_player(player), &rect, COLLISION_MARGIN)
}

/// Index of the first obstacle the player collides with
pub fn find_collision(player: &PlayerBody, obstacles: &[Obstacle], frame_count: u64) -> Option<usize> {
    obstacles
        .iter()
        .position(|obstacle| player_hits(player, obstacle, frame_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ColorClass, Field, ObstacleKind};
    use glam::Vec2;
    use proptest::prelude::*;

    fn obstacle(x: f32, y: f32, w: f32, h: f32, kind: ObstacleKind) -> Obstacle {
        Obstacle {
            pos: Vec2::new(x, y),
            width: w,
            height: h,
            kind,
            color: ColorClass::Primary,
            glyph: 'T',
            passed: false,
        }
    }

    fn player() -> PlayerBody {
        PlayerBody::new(&Field::new(1280.0, 720.0))
    }

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert!(overlaps_with_margin(&a, &Rect::new(20.0, 20.0, 10.0, 10.0), 5.0));
        assert!(!overlaps_with_margin(&a, &Rect::new(100.0, 0.0, 10.0, 10.0), 5.0));
    }

    #[test]
    fn test_margin_boundary_is_not_a_hit() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        // True edges overlap by 3 units, shrunk edges do not
        let b = Rect::new(47.0, 0.0, 20.0, 50.0);
        assert!(overlaps_with_margin(&a, &b, 0.0));
        assert!(!overlaps_with_margin(&a, &b, 5.0));
        // Exactly touching the shrunk edge is still a miss
        let c = Rect::new(45.0, 0.0, 20.0, 50.0);
        assert!(!overlaps_with_margin(&a, &c, 5.0));
        let d = Rect::new(44.0, 0.0, 20.0, 50.0);
        assert!(overlaps_with_margin(&a, &d, 5.0));
    }

    #[test]
    fn test_ground_obstacle_under_player_hits() {
        let p = player();
        let o = obstacle(p.pos.x, p.bottom() - 50.0, 35.0, 50.0, ObstacleKind::Ground);
        assert!(player_hits(&p, &o, 0));
        assert_eq!(find_collision(&p, &[o], 0), Some(0));
    }

    #[test]
    fn test_first_collision_wins() {
        let p = player();
        let far = obstacle(900.0, p.pos.y, 35.0, 50.0, ObstacleKind::Ground);
        let near = obstacle(p.pos.x, p.pos.y, 35.0, 50.0, ObstacleKind::Ground);
        let near2 = obstacle(p.pos.x + 10.0, p.pos.y, 35.0, 50.0, ObstacleKind::Ground);
        assert_eq!(find_collision(&p, &[far, near, near2], 0), Some(1));
    }

    #[test]
    fn test_bob_offset_is_bounded_and_deterministic() {
        for frame in 0..500 {
            let offset = bob_offset(frame, 300.0);
            assert!(offset.abs() <= BOB_AMPLITUDE);
            assert_eq!(offset, bob_offset(frame, 300.0));
        }
        let o = obstacle(300.0, 100.0, 40.0, 35.0, ObstacleKind::Flying);
        assert_eq!(adjusted_rect(&o, 7).y, 100.0 + bob_offset(7, 300.0));
        let g = obstacle(300.0, 100.0, 40.0, 35.0, ObstacleKind::Ground);
        assert_eq!(adjusted_rect(&g, 7).y, 100.0);
    }

    #[test]
    fn test_duck_under_high_flyer() {
        let field = Field::new(1280.0, 720.0);
        let mut p = PlayerBody::new(&field);
        let ground = field.ground_level();
        // Head-height flyer: bottom at ground - 30, bob keeps it within +-5
        let flyer = obstacle(p.pos.x, ground - 65.0, 40.0, 35.0, ObstacleKind::Flying);

        assert!(player_hits(&p, &flyer, 0), "standing player is hit");

        crate::sim::physics::duck(&mut p, &field, true);
        for frame in 0..200 {
            assert!(!player_hits(&p, &flyer, frame), "ducking clears at frame {frame}");
        }
    }

    #[test]
    fn test_duck_does_not_clear_ground_obstacle() {
        let field = Field::new(1280.0, 720.0);
        let mut p = PlayerBody::new(&field);
        crate::sim::physics::duck(&mut p, &field, true);
        let rock = obstacle(p.pos.x, field.ground_level() - 50.0, 35.0, 50.0, ObstacleKind::Ground);
        assert!(player_hits(&p, &rock, 0));
    }

    #[test]
    fn test_duck_does_not_clear_low_flyer() {
        let field = Field::new(1280.0, 720.0);
        let mut p = PlayerBody::new(&field);
        crate::sim::physics::duck(&mut p, &field, true);
        // Bottom edge sits on the ground: far below the ducked head
        let low = obstacle(p.pos.x, field.ground_level() - 35.0, 40.0, 35.0, ObstacleKind::Flying);
        assert!(player_hits(&p, &low, 0));
    }

    proptest! {
        #[test]
        fn duck_suppression_rule(
            ducking in any::<bool>(),
            flying in any::<bool>(),
            bottom_delta in -40.0f32..40.0,
        ) {
            let mut p = player();
            p.is_ducking = ducking;
            let kind = if flying { ObstacleKind::Flying } else { ObstacleKind::Ground };
            let o = obstacle(p.pos.x, 0.0, 40.0, 35.0, kind);
            let h = p.top() + bottom_delta;
            prop_assert_eq!(duck_clears(&p, &o, h), ducking && flying && h < p.top() + DUCK_CLEARANCE);
        }

        #[test]
        fn shrunk_separation_never_collides(gap in 0.0f32..4.99, y in -100.0f32..100.0) {
            let a = Rect::new(0.0, 0.0, 50.0, 50.0);
            // b starts inside a's true right edge but at or past its shrunk edge
            let b = Rect::new(50.0 - gap, y, 30.0, 30.0);
            prop_assert!(!overlaps_with_margin(&a, &b, COLLISION_MARGIN));
        }
    }
}
