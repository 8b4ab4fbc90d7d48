// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, types::Json};

/// One recorded quiz submission. Immutable once stored; the list of attempts
/// for a user is their audit history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    pub id: i64,
    pub user_id: String,
    pub domain: String,
    pub step_index: u32,

    /// Submitted choice indices after normalization; `None` is "unanswered".
    pub answers: Vec<Option<usize>>,

    /// Per-question correctness, aligned with the quiz's questions.
    pub results: Vec<bool>,

    pub score: u32,
    pub total: u32,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Represents the 'attempts' table in the database.
#[derive(Debug, FromRow)]
pub struct AttemptRow {
    pub id: i64,
    pub user_id: String,
    pub domain: String,
    pub step_index: i32,
    pub answers: Json<Vec<Option<usize>>>,
    pub results: Json<Vec<bool>>,
    pub score: i32,
    pub total: i32,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

impl From<AttemptRow> for Attempt {
    fn from(row: AttemptRow) -> Self {
        // CHECK constraints keep these columns non-negative.
        let unsigned = |v: i32| u32::try_from(v).unwrap_or_default();
        Self {
            id: row.id,
            user_id: row.user_id,
            domain: row.domain,
            step_index: unsigned(row.step_index),
            answers: row.answers.0,
            results: row.results.0,
            score: unsigned(row.score),
            total: unsigned(row.total),
            passed: row.passed,
            submitted_at: row.submitted_at,
        }
    }
}

/// Compact attempt entry for the dashboard history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptSummary {
    pub domain: String,
    pub step_index: u32,
    pub score: u32,
    pub total: u32,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

impl From<Attempt> for AttemptSummary {
    fn from(attempt: Attempt) -> Self {
        Self {
            domain: attempt.domain,
            step_index: attempt.step_index,
            score: attempt.score,
            total: attempt.total,
            passed: attempt.passed,
            submitted_at: attempt.submitted_at,
        }
    }
}
