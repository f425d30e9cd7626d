//! Persisted user record

use serde::{Deserialize, Serialize};

/// One player as stored by the score service and cached locally
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub uid: String,
    #[serde(alias = "fullName")]
    pub display_name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub department: String,
    pub high_score: u32,
    pub games_played: u32,
    /// Unix timestamp (ms) of the last finished game
    pub last_played_at: Option<f64>,
}

impl UserRecord {
    pub fn new(
        uid: impl Into<String>,
        display_name: impl Into<String>,
        class_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            class_name: class_name.into(),
            department: department.into(),
            ..Self::default()
        }
    }

    /// Count a finished game, raising the high score if beaten.
    /// Returns true on a new record.
    pub fn record_play(&mut self, score: u32, now: f64) -> bool {
        self.games_played = self.games_played.saturating_add(1);
        self.last_played_at = Some(now);
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }
}
