//! Player records and the score service boundary
//!
//! The document store itself is an external dependency. This module defines
//! the shape the game exchanges with it, an in-process [`MemoryStore`] that
//! stands in for it, and the [`ProfileCache`] kept in LocalStorage for
//! offline play.

pub mod cache;
pub mod memory;
pub mod record;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::ProfileCache;
pub use memory::MemoryStore;
pub use record::UserRecord;

/// Failures at the persistence boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("score service unavailable: {0}")]
    Unavailable(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
}

/// Result of a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    /// The service recorded the play
    pub accepted: bool,
    /// Stored high score after the call
    pub high_score: u32,
    pub is_new_record: bool,
    pub games_played: u32,
}

/// Remote store of per-user high scores
pub trait ScoreService {
    /// Record one finished game. Replaces the stored high score only when
    /// `score` is strictly greater; always counts the play.
    fn submit_score(
        &mut self,
        user_id: &str,
        score: u32,
        now: f64,
    ) -> Result<SubmitReceipt, ServiceError>;
}
