//! Keyboard and touch mapping to game commands

use crate::sim::Command;

/// Vertical travel (px) separating a tap from a swipe
pub const SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Map a `KeyboardEvent.key` value to a command
pub fn command_for_key(key: &str, phase: KeyPhase) -> Option<Command> {
    match (phase, key) {
        (KeyPhase::Down, " " | "ArrowUp" | "w" | "W") => Some(Command::Jump),
        (KeyPhase::Down, "ArrowDown" | "s" | "S") => Some(Command::Duck(true)),
        (KeyPhase::Up, "ArrowDown" | "s" | "S") => Some(Command::Duck(false)),
        (KeyPhase::Down, "Escape") => Some(Command::TogglePause),
        _ => None,
    }
}

/// Single-finger gesture state: swipe down ducks, tap jumps
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start_y: Option<f32>,
    ducked: bool,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, y: f32) {
        self.start_y = Some(y);
        self.ducked = false;
    }

    /// Duck once the finger has travelled far enough down
    pub fn touch_move(&mut self, y: f32) -> Option<Command> {
        let start = self.start_y?;
        if !self.ducked && y - start > SWIPE_THRESHOLD {
            self.ducked = true;
            Some(Command::Duck(true))
        } else {
            None
        }
    }

    /// A short vertical travel is a tap (jump); any release stands back up
    pub fn touch_end(&mut self, y: f32) -> Vec<Command> {
        let Some(start) = self.start_y.take() else {
            return Vec::new();
        };
        self.ducked = false;

        let mut commands = Vec::with_capacity(2);
        if (y - start).abs() < SWIPE_THRESHOLD {
            commands.push(Command::Jump);
        }
        commands.push(Command::Duck(false));
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        for key in [" ", "ArrowUp", "w", "W"] {
            assert_eq!(command_for_key(key, KeyPhase::Down), Some(Command::Jump));
            assert_eq!(command_for_key(key, KeyPhase::Up), None);
        }
        for key in ["ArrowDown", "s", "S"] {
            assert_eq!(command_for_key(key, KeyPhase::Down), Some(Command::Duck(true)));
            assert_eq!(command_for_key(key, KeyPhase::Up), Some(Command::Duck(false)));
        }
        assert_eq!(command_for_key("Escape", KeyPhase::Down), Some(Command::TogglePause));
        assert_eq!(command_for_key("Escape", KeyPhase::Up), None);
        assert_eq!(command_for_key("Enter", KeyPhase::Down), None);
    }

    #[test]
    fn test_tap_jumps() {
        let mut tracker = SwipeTracker::new();
        tracker.touch_start(300.0);
        assert_eq!(tracker.touch_move(320.0), None);
        assert_eq!(
            tracker.touch_end(310.0),
            vec![Command::Jump, Command::Duck(false)]
        );
        assert!(tracker.touch_end(310.0).is_empty(), "gesture already finished");
    }

    #[test]
    fn test_swipe_down_ducks_once() {
        let mut tracker = SwipeTracker::new();
        tracker.touch_start(100.0);
        assert_eq!(tracker.touch_move(151.0), Some(Command::Duck(true)));
        assert_eq!(tracker.touch_move(200.0), None);
        assert_eq!(tracker.touch_end(200.0), vec![Command::Duck(false)]);
    }

    #[test]
    fn test_swipe_up_is_not_a_tap() {
        let mut tracker = SwipeTracker::new();
        tracker.touch_start(300.0);
        assert_eq!(tracker.touch_move(200.0), None);
        assert_eq!(tracker.touch_end(200.0), vec![Command::Duck(false)]);
    }

    #[test]
    fn test_end_without_start_is_ignored() {
        let mut tracker = SwipeTracker::new();
        assert_eq!(tracker.touch_move(500.0), None);
        assert!(tracker.touch_end(500.0).is_empty());
    }
}
