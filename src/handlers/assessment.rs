// src/handlers/assessment.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    config::Config,
    engine::{
        ProgressStore,
        assessment::{attempt_history, submit_assessment},
    },
    error::AppError,
    models::{
        assessment::{HistoryParams, HistoryResponse, SubmitAssessmentRequest},
        catalog::Catalog,
        user::UserId,
    },
};

/// Submits answers for one step's quiz.
///
/// * Scores positionally against the step's answer key.
/// * Records the attempt and unlocks the next step on a pass at the frontier.
/// * Rejects steps beyond the caller's unlocked index with 403.
pub async fn submit(
    State(store): State<Arc<dyn ProgressStore>>,
    State(catalog): State<Arc<Catalog>>,
    State(config): State<Config>,
    Extension(user): Extension<UserId>,
    payload: Result<Json<SubmitAssessmentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let result = submit_assessment(
        store.as_ref(),
        &catalog,
        config.pass_threshold,
        &user,
        &req,
    )
    .await?;

    Ok(Json(result))
}

/// Lists the caller's attempts, oldest first. `?domain=` narrows to one domain.
pub async fn history(
    State(store): State<Arc<dyn ProgressStore>>,
    State(catalog): State<Arc<Catalog>>,
    Extension(user): Extension<UserId>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let attempts =
        attempt_history(store.as_ref(), &catalog, &user, params.domain.as_deref()).await?;
    Ok(Json(HistoryResponse { attempts }))
}
