//! Frame-time accumulator
//!
//! Converts variable display refresh into whole simulation steps of
//! [`SIM_DT`], so gameplay speed does not depend on the monitor.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Largest frame delta honored (seconds); longer gaps are dropped
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a timestamp in ms (e.g. from `requestAnimationFrame`).
    /// Returns how many simulation steps to run now.
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(time_ms);
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop backlog the substep cap could not absorb
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Forget the last timestamp (after a pause or hidden tab)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_nothing() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1_000.0), 0);
    }

    #[test]
    fn test_sixty_hz_is_one_step_per_frame() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let mut total = 0;
        for i in 1..=120 {
            total += clock.advance(i as f64 * 1000.0 / 60.0 + 0.01);
        }
        assert!((119..=120).contains(&total), "got {total}");
    }

    #[test]
    fn test_high_refresh_runs_fewer_steps() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let mut total = 0;
        for i in 1..=240 {
            total += clock.advance(i as f64 * 1000.0 / 120.0);
        }
        assert!((119..=120).contains(&total), "got {total}");
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(5_000.0), MAX_SUBSTEPS);
        assert!(clock.advance(5_000.0) <= 1);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.reset();
        assert_eq!(clock.advance(10_000.0), 0);
    }
}
