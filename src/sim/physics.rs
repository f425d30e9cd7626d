//! Player kinematics
//!
//! All quantities are per tick; one call to [`step_player`] is one frame.

use super::state::{Field, PlayerBody};
use crate::tuning::Tuning;

/// Advance the player by one tick: gravity, landing, duck geometry
pub fn step_player(player: &mut PlayerBody, field: &Field, tuning: &Tuning) {
    let rest_y = field.ground_level() - player.height;

    // Airborne or still ascending
    if player.pos.y < rest_y || player.vel_y < 0.0 {
        player.vel_y += tuning.gravity;
        player.pos.y += player.vel_y;
    }

    // Landing
    if player.pos.y >= rest_y {
        player.pos.y = rest_y;
        player.vel_y = 0.0;
        player.is_jumping = false;
    }

    player.height = if player.is_ducking && !player.is_jumping {
        player.duck_height
    } else {
        player.normal_height
    };

    // Keep the feet planted when the height changes on the ground
    if !player.is_jumping {
        player.anchor_to_ground(field);
    }

    debug_assert!(
        player.height == player.normal_height || player.height == player.duck_height,
        "player height {} is neither normal nor ducked",
        player.height
    );
    debug_assert!(player.pos.y.is_finite(), "player y is not finite");
}

/// Start a jump. Returns false (no-op) while airborne or ducking.
pub fn jump(player: &mut PlayerBody, tuning: &Tuning) -> bool {
    if player.is_jumping || player.is_ducking {
        return false;
    }
    player.vel_y = tuning.jump_force;
    player.is_jumping = true;
    true
}

/// Engage or release duck. On the ground the geometry snaps immediately;
/// in the air it waits for landing.
pub fn duck(player: &mut PlayerBody, field: &Field, engage: bool) {
    player.is_ducking = engage;
    if !player.is_jumping {
        player.height = if engage {
            player.duck_height
        } else {
            player.normal_height
        };
        player.anchor_to_ground(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (PlayerBody, Field, Tuning) {
        let field = Field::new(1280.0, 720.0);
        (PlayerBody::new(&field), field, Tuning::default())
    }

    #[test]
    fn test_grounded_player_stays_put() {
        let (mut player, field, tuning) = setup();
        let y = player.pos.y;
        for _ in 0..10 {
            step_player(&mut player, &field, &tuning);
        }
        assert_eq!(player.pos.y, y);
        assert_eq!(player.vel_y, 0.0);
    }

    #[test]
    fn test_jump_arc_lands() {
        let (mut player, field, tuning) = setup();
        let ground_y = player.pos.y;
        assert!(jump(&mut player, &tuning));
        assert!(!jump(&mut player, &tuning), "no double jump");

        step_player(&mut player, &field, &tuning);
        assert!(player.pos.y < ground_y);
        assert!(player.is_jumping);

        let mut peak = player.pos.y;
        for _ in 0..60 {
            step_player(&mut player, &field, &tuning);
            peak = peak.min(player.pos.y);
        }
        assert!(!player.is_jumping);
        assert_eq!(player.pos.y, ground_y);
        // v0 = 12, g = 0.6 -> roughly 120 units of rise
        assert!(ground_y - peak > 100.0);
    }

    #[test]
    fn test_cannot_jump_while_ducking() {
        let (mut player, field, tuning) = setup();
        duck(&mut player, &field, true);
        assert!(!jump(&mut player, &tuning));
        assert!(!player.is_jumping);
    }

    #[test]
    fn test_duck_snaps_to_ground() {
        let (mut player, field, tuning) = setup();
        duck(&mut player, &field, true);
        assert_eq!(player.height, player.duck_height);
        assert_eq!(player.bottom(), field.ground_level());

        step_player(&mut player, &field, &tuning);
        assert_eq!(player.height, player.duck_height);
        assert_eq!(player.bottom(), field.ground_level());

        duck(&mut player, &field, false);
        assert_eq!(player.height, player.normal_height);
        step_player(&mut player, &field, &tuning);
        assert_eq!(player.height, player.normal_height);
        assert_eq!(player.bottom(), field.ground_level());
    }

    #[test]
    fn test_jump_right_after_releasing_duck() {
        let (mut player, field, tuning) = setup();
        duck(&mut player, &field, true);
        step_player(&mut player, &field, &tuning);
        duck(&mut player, &field, false);
        assert!(jump(&mut player, &tuning));
        step_player(&mut player, &field, &tuning);
        assert!(player.is_jumping, "jump must not be swallowed by the height change");
    }

    #[test]
    fn test_duck_in_air_waits_for_landing() {
        let (mut player, field, tuning) = setup();
        jump(&mut player, &tuning);
        step_player(&mut player, &field, &tuning);
        duck(&mut player, &field, true);
        assert_eq!(player.height, player.normal_height);

        for _ in 0..60 {
            step_player(&mut player, &field, &tuning);
        }
        assert_eq!(player.height, player.duck_height);
        assert_eq!(player.bottom(), field.ground_level());
    }

    proptest! {
        #[test]
        fn height_is_always_normal_or_ducked(actions in proptest::collection::vec(0u8..4, 1..300)) {
            let (mut player, field, tuning) = setup();
            for action in actions {
                match action {
                    0 => { jump(&mut player, &tuning); }
                    1 => duck(&mut player, &field, true),
                    2 => duck(&mut player, &field, false),
                    _ => {}
                }
                step_player(&mut player, &field, &tuning);
                prop_assert!(player.height == player.normal_height || player.height == player.duck_height);
                prop_assert!(player.bottom() <= field.ground_level() + 1e-3);
            }
        }
    }
}
