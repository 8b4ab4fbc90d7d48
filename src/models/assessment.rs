// src/models/assessment.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::attempt::Attempt;

/// DTO for `POST /assessment/submit`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAssessmentRequest {
    #[validate(length(min = 1))]
    pub domain: String,

    /// 1-based step index. Signed so that bogus values surface as `StepNotFound`
    /// instead of a deserialization failure.
    pub step_index: i64,

    /// Raw answers payload, expected to be a list of choice indices or nulls.
    /// Normalized by the scoring engine; anything that is not a list is rejected.
    #[serde(default)]
    pub answers: serde_json::Value,
}

/// Query parameters for `GET /assessment/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub attempts: Vec<Attempt>,
}
