//! Leaderboard of per-user high scores

use serde::{Deserialize, Serialize};

use crate::persistence::{ServiceError, UserRecord};

/// Default number of rows shown
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub display_name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub department: String,
    pub score: u32,
}

impl LeaderboardEntry {
    /// Secondary line under the name, e.g. "TE • Computer"
    pub fn details(&self) -> String {
        format!("{} • {}", self.class_name, self.department)
    }

    /// Plain-text cells for a display row: rank, name, details, score.
    /// Hosts must insert these as text, never as markup.
    pub fn cells(&self, rank: usize) -> [String; 4] {
        [
            rank.to_string(),
            self.display_name.clone(),
            self.details(),
            self.score.to_string(),
        ]
    }
}

impl From<&UserRecord> for LeaderboardEntry {
    fn from(record: &UserRecord) -> Self {
        Self {
            display_name: record.display_name.clone(),
            class_name: record.class_name.clone(),
            department: record.department.clone(),
            score: record.high_score,
        }
    }
}

/// Source of the top scores
pub trait Leaderboard {
    /// At most `n` entries, highest score first
    fn top_scores(&self, n: usize) -> Result<Vec<LeaderboardEntry>, ServiceError>;
}

/// Sort descending by score and keep the first `n`. Ties keep input order.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>, n: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(n);
    entries
}
