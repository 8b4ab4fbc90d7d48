// src/engine/progression.rs

use async_trait::async_trait;

use crate::{
    engine::{EngineError, scoring::ScoreResult},
    models::{attempt::Attempt, user::UserId},
};

/// Everything needed to record one scored submission.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub user_id: UserId,
    pub domain: String,
    pub step_index: u32,

    /// Step count of the domain, used to cap the unlocked index.
    pub total_steps: u32,

    pub answers: Vec<Option<usize>>,
    pub outcome: ScoreResult,
}

/// Per (user, domain) progression state and the attempt history behind it.
///
/// Implementations must serialize `record_attempt` per (user, domain): the
/// lock check, the append and the unlock happen as one unit, and a rejected
/// call leaves no trace.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Highest step index the user may submit for. 1 when nothing is recorded.
    async fn get_progress(&self, user: &UserId, domain: &str) -> Result<u32, EngineError>;

    /// Appends an attempt, advancing the unlocked index on a pass at the frontier.
    /// Fails with `StepLocked` (recording nothing) past the frontier.
    async fn record_attempt(&self, attempt: NewAttempt) -> Result<Attempt, EngineError>;

    /// Attempts ordered by submission time ascending, optionally for one domain.
    async fn list_attempts(
        &self,
        user: &UserId,
        domain: Option<&str>,
    ) -> Result<Vec<Attempt>, EngineError>;
}

/// Rejects submissions for steps beyond the unlocked frontier.
pub fn ensure_unlocked(attempt: &NewAttempt, unlocked_index: u32) -> Result<(), EngineError> {
    if attempt.step_index > unlocked_index {
        tracing::warn!(
            user = %attempt.user_id,
            domain = %attempt.domain,
            step_index = attempt.step_index,
            unlocked_index,
            "Rejected submission for a locked step"
        );
        return Err(EngineError::StepLocked {
            domain: attempt.domain.clone(),
            step_index: attempt.step_index,
            unlocked_index,
        });
    }
    Ok(())
}

/// Unlocked index after an accepted attempt.
///
/// Only a pass on the frontier step moves it, by exactly one and never past
/// the domain's step count. The result is never below `unlocked_index`.
pub fn advance_frontier(
    unlocked_index: u32,
    step_index: u32,
    passed: bool,
    total_steps: u32,
) -> u32 {
    if passed && step_index == unlocked_index {
        (step_index + 1).min(total_steps).max(unlocked_index)
    } else {
        unlocked_index
    }
}
