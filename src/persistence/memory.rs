//! In-process score service
//!
//! Backs the native demo and the tests. Availability can be toggled to
//! exercise the offline path.

use std::collections::BTreeMap;

use super::{ScoreService, ServiceError, SubmitReceipt, UserRecord};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, rank_entries};

#[derive(Debug, Clone)]
pub struct MemoryStore {
    users: BTreeMap<String, UserRecord>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            available: true,
        }
    }

    /// Insert or replace a user record
    pub fn register(&mut self, record: UserRecord) {
        log::info!("Registered user {} ({})", record.uid, record.display_name);
        self.users.insert(record.uid.clone(), record);
    }

    pub fn record(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.get(user_id)
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    fn check_available(&self) -> Result<(), ServiceError> {
        if self.available {
            Ok(())
        } else {
            Err(ServiceError::Unavailable("store offline".to_string()))
        }
    }
}

impl ScoreService for MemoryStore {
    fn submit_score(
        &mut self,
        user_id: &str,
        score: u32,
        now: f64,
    ) -> Result<SubmitReceipt, ServiceError> {
        self.check_available()?;
        let record = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| ServiceError::UnknownUser(user_id.to_string()))?;

        let is_new_record = record.record_play(score, now);
        log::debug!(
            "Stored score {score} for {user_id}: high {} (new record: {is_new_record})",
            record.high_score
        );
        Ok(SubmitReceipt {
            accepted: true,
            high_score: record.high_score,
            is_new_record,
            games_played: record.games_played,
        })
    }
}

impl Leaderboard for MemoryStore {
    fn top_scores(&self, n: usize) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        self.check_available()?;
        let entries = self.users.values().map(LeaderboardEntry::from).collect();
        Ok(rank_entries(entries, n))
    }
}
