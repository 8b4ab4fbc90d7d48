// src/engine/scoring.rs

use serde::Serialize;
use serde_json::Value;

use crate::{engine::EngineError, models::catalog::QuizDefinition};

/// Minimum fraction of correct answers for a passing attempt, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassThreshold(f64);

impl PassThreshold {
    pub fn new(fraction: f64) -> Result<Self, String> {
        if fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 {
            Ok(Self(fraction))
        } else {
            Err(format!("pass threshold must be in (0, 1], got {}", fraction))
        }
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    /// An empty quiz never passes.
    pub fn is_met(self, score: u32, total: u32) -> bool {
        total > 0 && (score as f64 / total as f64) >= self.0
    }
}

/// Outcome of scoring one submission. Doubles as the `/assessment/submit` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub passed: bool,
    pub score: u32,
    pub total: u32,
    pub results: Vec<bool>,
}

/// Scores submitted answers against a quiz.
///
/// Answers are matched by position. Missing or `None` entries count as wrong,
/// entries beyond the last question are ignored. Pure and deterministic.
pub fn score(
    quiz: &QuizDefinition,
    answers: &[Option<usize>],
    threshold: PassThreshold,
) -> ScoreResult {
    let results: Vec<bool> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, question)| answers.get(i).copied().flatten() == Some(question.correct))
        .collect();

    let score = results.iter().filter(|correct| **correct).count() as u32;
    let total = results.len() as u32;

    ScoreResult {
        passed: threshold.is_met(score, total),
        score,
        total,
        results,
    }
}

/// Turns a raw `answers` payload into choice indices.
///
/// Non-negative integers become `Some(index)`; `null` and any other value are
/// treated as unanswered. Only a payload that is not a list is an error.
pub fn normalize_answers(value: &Value) -> Result<Vec<Option<usize>>, EngineError> {
    let entries = value
        .as_array()
        .ok_or_else(|| EngineError::InvalidAnswerShape(json_kind(value).to_string()))?;

    Ok(entries
        .iter()
        .map(|entry| entry.as_u64().and_then(|i| usize::try_from(i).ok()))
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
