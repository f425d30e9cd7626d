//! Data-driven game balance
//!
//! Everything a designer may want to retune lives here. Fixed geometry and
//! protocol limits stay in [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or checking tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` is invalid: {value}")]
    Invalid { field: &'static str, value: f32 },
}

/// Gameplay balance values (per-tick units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward velocity added each airborne tick
    pub gravity: f32,
    /// Initial vertical velocity of a jump (negative is up)
    pub jump_force: f32,

    pub initial_speed: f32,
    /// Base per-tick speed increase (scaled up by score)
    pub speed_increment: f32,
    pub max_speed: f32,
    /// Score at which the speed increment is doubled
    pub speed_boost_score: f32,

    /// Spawn gap bounds in frames at score 0
    pub min_gap: f32,
    pub max_gap: f32,
    /// Frames of gap removed per point of score
    pub gap_decrease_rate: f32,
    /// Floors the gap bounds never shrink below
    pub min_gap_floor: f32,
    pub max_gap_floor: f32,
    /// Minimum spread kept between the bounds
    pub gap_variety: f32,

    /// Chance a spawn picks a flying obstacle
    pub flying_chance: f32,
    /// Score where double spawns begin
    pub double_spawn_start: u32,
    /// Score where the double spawn chance reaches its cap
    pub double_spawn_full: u32,
    pub double_spawn_max_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_force: -12.0,

            initial_speed: 8.0,
            speed_increment: 0.015,
            max_speed: 22.0,
            speed_boost_score: 500.0,

            min_gap: 120.0,
            max_gap: 350.0,
            gap_decrease_rate: 1.0,
            min_gap_floor: 80.0,
            max_gap_floor: 300.0,
            gap_variety: 50.0,

            flying_chance: 0.35,
            double_spawn_start: 10,
            double_spawn_full: 70,
            double_spawn_max_chance: 0.6,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Host-supplied overrides; bad or missing data falls back to defaults
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {e}");
                Self::default()
            }
        }
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let non_negative = [
            ("gravity", self.gravity),
            ("initial_speed", self.initial_speed),
            ("speed_increment", self.speed_increment),
            ("min_gap", self.min_gap),
            ("gap_decrease_rate", self.gap_decrease_rate),
            ("min_gap_floor", self.min_gap_floor),
            ("gap_variety", self.gap_variety),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid { field, value });
            }
        }

        if !self.jump_force.is_finite() || self.jump_force >= 0.0 {
            return Err(TuningError::Invalid {
                field: "jump_force",
                value: self.jump_force,
            });
        }
        if !self.max_speed.is_finite() || self.max_speed < self.initial_speed {
            return Err(TuningError::Invalid {
                field: "max_speed",
                value: self.max_speed,
            });
        }
        if !self.speed_boost_score.is_finite() || self.speed_boost_score <= 0.0 {
            return Err(TuningError::Invalid {
                field: "speed_boost_score",
                value: self.speed_boost_score,
            });
        }
        if !self.max_gap.is_finite() || self.max_gap < self.min_gap {
            return Err(TuningError::Invalid {
                field: "max_gap",
                value: self.max_gap,
            });
        }
        if !self.max_gap_floor.is_finite() || self.max_gap_floor < self.min_gap_floor {
            return Err(TuningError::Invalid {
                field: "max_gap_floor",
                value: self.max_gap_floor,
            });
        }
        for (field, value) in [
            ("flying_chance", self.flying_chance),
            ("double_spawn_max_chance", self.double_spawn_max_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid { field, value });
            }
        }
        if self.double_spawn_full <= self.double_spawn_start {
            return Err(TuningError::Invalid {
                field: "double_spawn_full",
                value: self.double_spawn_full as f32,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_override() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.8, "max_speed": 30.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.max_speed, 30.0);
        assert_eq!(tuning.jump_force, -12.0);
    }

    #[test]
    fn test_from_json_rejects_upward_gravity() {
        let err = Tuning::from_json(r#"{ "gravity": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "gravity", .. }));
    }

    #[test]
    fn test_from_json_rejects_nan_and_garbage() {
        let mut tuning = Tuning::default();
        tuning.speed_increment = f32::NAN;
        assert!(tuning.validate().is_err());

        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides_fall_back_to_defaults() {
        assert_eq!(Tuning::from_json_or_default(None), Tuning::default());
        assert_eq!(Tuning::from_json_or_default(Some("  \n")), Tuning::default());
        assert_eq!(
            Tuning::from_json_or_default(Some(r#"{ "jump_force": 3.0 }"#)),
            Tuning::default()
        );
        assert_eq!(
            Tuning::from_json_or_default(Some(r#"{ "flying_chance": 0.5 }"#)).flying_chance,
            0.5
        );
    }

    #[test]
    fn test_rejects_inverted_gap_bounds() {
        let tuning = Tuning {
            min_gap: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "max_gap", .. })
        ));
    }
}
