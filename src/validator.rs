//! Score plausibility checks
//!
//! There is no server-side replay, so a submitted score is only checked
//! against the session's tamper state and a hard ceiling.

use serde::Serialize;
use thiserror::Error;

use crate::consts::MAX_SCORE;
use crate::security::GameSession;

/// Why a score was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
pub enum RejectReason {
    #[error("invalid session detected - console tampering detected")]
    InvalidSession,
    #[error("score too high (max: {max})")]
    AboveCeiling { max: u32 },
}

impl RejectReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::InvalidSession => "invalid_session",
            RejectReason::AboveCeiling { .. } => "above_ceiling",
        }
    }
}

/// Decide without side effects. Session validity is checked first.
pub fn check_score(score: u32, session: &GameSession) -> Result<(), RejectReason> {
    if !session.is_valid() {
        return Err(RejectReason::InvalidSession);
    }
    if score > MAX_SCORE {
        return Err(RejectReason::AboveCeiling { max: MAX_SCORE });
    }
    Ok(())
}

/// Check and, on acceptance, log the score in the session history
pub fn validate_score(score: u32, session: &mut GameSession, now: f64) -> Result<(), RejectReason> {
    match check_score(score, session) {
        Ok(()) => {
            session.record_score_update(score, now);
            Ok(())
        }
        Err(reason) => {
            log::warn!("Score {score} rejected: {reason}");
            Err(reason)
        }
    }
}
