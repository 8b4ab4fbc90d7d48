// src/engine/assessment.rs

use crate::{
    engine::{
        EngineError,
        progression::{NewAttempt, ProgressStore},
        scoring::{PassThreshold, ScoreResult, normalize_answers, score},
    },
    models::{assessment::SubmitAssessmentRequest, attempt::Attempt, catalog::Catalog, user::UserId},
};

/// Scores a submission and records it.
///
/// Catalog lookups and answer-shape checks run first; the lock check happens
/// inside the store together with the write.
pub async fn submit_assessment(
    store: &dyn ProgressStore,
    catalog: &Catalog,
    threshold: PassThreshold,
    user: &UserId,
    request: &SubmitAssessmentRequest,
) -> Result<ScoreResult, EngineError> {
    let total_steps = catalog.total_steps(&request.domain)?;
    let step = catalog.step(&request.domain, request.step_index)?;
    let mut answers = normalize_answers(&request.answers)?;

    let outcome = score(&step.quiz, &answers, threshold);
    // Entries past the last question are not scored and not stored.
    answers.truncate(outcome.total as usize);

    let attempt = store
        .record_attempt(NewAttempt {
            user_id: user.clone(),
            domain: request.domain.clone(),
            step_index: step.index,
            total_steps,
            answers,
            outcome: outcome.clone(),
        })
        .await?;

    tracing::info!(
        user = %user,
        domain = %attempt.domain,
        step_index = attempt.step_index,
        score = attempt.score,
        total = attempt.total,
        passed = attempt.passed,
        "Recorded assessment attempt {}",
        attempt.id
    );

    Ok(outcome)
}

/// The caller's attempts, oldest first, optionally for a single domain.
pub async fn attempt_history(
    store: &dyn ProgressStore,
    catalog: &Catalog,
    user: &UserId,
    domain: Option<&str>,
) -> Result<Vec<Attempt>, EngineError> {
    if let Some(domain) = domain {
        catalog.domain(domain)?;
    }
    store.list_attempts(user, domain).await
}
