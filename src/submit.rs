//! Score submission pipeline
//!
//! validate -> service -> local cache, with the cache as the fallback when
//! the service is unreachable. A rejected score touches nothing.

use serde::Serialize;

use crate::persistence::{ProfileCache, ScoreService, SubmitReceipt};
use crate::security::GameSession;
use crate::validator::{RejectReason, validate_score};

/// What happened to a submitted score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmitOutcome {
    /// Stored by the service and mirrored locally
    Synced(SubmitReceipt),
    /// Service unreachable; kept in the local cache only
    Offline { high_score: u32, is_new_record: bool },
    /// Refused by the validator
    Rejected { reason: RejectReason, high_score: u32 },
    /// Nobody signed in; nothing to store against
    NoUser { high_score: u32 },
}

impl SubmitOutcome {
    /// High score to display after the run
    pub fn high_score(&self) -> u32 {
        match *self {
            SubmitOutcome::Synced(receipt) => receipt.high_score,
            SubmitOutcome::Offline { high_score, .. }
            | SubmitOutcome::Rejected { high_score, .. }
            | SubmitOutcome::NoUser { high_score } => high_score,
        }
    }

    pub fn is_new_record(&self) -> bool {
        match *self {
            SubmitOutcome::Synced(receipt) => receipt.is_new_record,
            SubmitOutcome::Offline { is_new_record, .. } => is_new_record,
            SubmitOutcome::Rejected { .. } | SubmitOutcome::NoUser { .. } => false,
        }
    }

    pub fn synced(&self) -> bool {
        matches!(self, SubmitOutcome::Synced(_))
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match *self {
            SubmitOutcome::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Submit a finished run's score
pub fn submit_score<S: ScoreService + ?Sized>(
    session: &mut GameSession,
    service: &mut S,
    cache: &mut ProfileCache,
    user_id: Option<&str>,
    score: u32,
    now: f64,
) -> SubmitOutcome {
    let Some(user_id) = user_id else {
        log::info!("No user signed in, score {score} not submitted");
        return SubmitOutcome::NoUser {
            high_score: cache.high_score(),
        };
    };

    if let Err(reason) = validate_score(score, session, now) {
        return SubmitOutcome::Rejected {
            reason,
            high_score: cache.high_score(),
        };
    }

    match service.submit_score(user_id, score, now) {
        Ok(receipt) => {
            cache.apply_receipt(&receipt, now);
            cache.save();
            log::info!(
                "Score {score} saved (high score {}, new record: {})",
                receipt.high_score,
                receipt.is_new_record
            );
            SubmitOutcome::Synced(receipt)
        }
        Err(e) => {
            log::warn!("Score service failed ({e}), keeping score locally");
            let (high_score, is_new_record) = cache.apply_offline(score, now);
            cache.save();
            SubmitOutcome::Offline {
                high_score,
                is_new_record,
            }
        }
    }
}
